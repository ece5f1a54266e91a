// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use chrono::{DateTime, Datelike, Months, NaiveDateTime, NaiveTime, TimeDelta, Timelike, Utc, Weekday};

use super::calendar::{Calendar, from_millis};

pub(crate) const MILLISECOND: i64 = 1;
pub(crate) const SECOND: i64 = 1_000;
pub(crate) const MINUTE: i64 = 60 * SECOND;
pub(crate) const HOUR: i64 = 60 * MINUTE;
pub(crate) const DAY: i64 = 24 * HOUR;
pub(crate) const WEEK: i64 = 7 * DAY;
pub(crate) const MONTH: i64 = 30 * DAY;
pub(crate) const YEAR: i64 = 365 * DAY;

/// The base unit of a [`TimeInterval`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimeUnit {
    /// Milliseconds.
    Millisecond,
    /// Seconds.
    Second,
    /// Minutes.
    Minute,
    /// Hours.
    Hour,
    /// Calendar days, starting at midnight.
    Day,
    /// Weeks starting on the given weekday.
    Week(Weekday),
    /// Calendar months.
    Month,
    /// Calendar years.
    Year,
}

impl TimeUnit {
    /// Nominal length in milliseconds; months are 30 days, years 365.
    #[must_use]
    pub fn duration_ms(self) -> i64 {
        match self {
            Self::Millisecond => MILLISECOND,
            Self::Second => SECOND,
            Self::Minute => MINUTE,
            Self::Hour => HOUR,
            Self::Day => DAY,
            Self::Week(_) => WEEK,
            Self::Month => MONTH,
            Self::Year => YEAR,
        }
    }

    fn fixed_ms(self) -> Option<i64> {
        match self {
            Self::Millisecond | Self::Second | Self::Minute | Self::Hour => {
                Some(self.duration_ms())
            }
            _ => None,
        }
    }
}

/// A calendar interval: a way of flooring instants to unit boundaries and
/// stepping between them.
///
/// Sub-day units step by a fixed number of milliseconds. Days, weeks,
/// months and years step on the wall clock of the interval's [`Calendar`],
/// so a day is not always 24 hours in a calendar with daylight saving.
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use strata_scale::time::TimeInterval;
///
/// let t = Utc.with_ymd_and_hms(2011, 5, 17, 13, 45, 0).unwrap();
/// let month = TimeInterval::month();
/// assert_eq!(month.floor(t), Utc.with_ymd_and_hms(2011, 5, 1, 0, 0, 0).unwrap());
/// assert_eq!(month.ceil(t), Utc.with_ymd_and_hms(2011, 6, 1, 0, 0, 0).unwrap());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeInterval {
    unit: TimeUnit,
    step: u32,
    calendar: Calendar,
}

impl TimeInterval {
    /// Creates an interval of one `unit` in UTC.
    #[must_use]
    pub const fn new(unit: TimeUnit) -> Self {
        Self {
            unit,
            step: 1,
            calendar: Calendar::Utc,
        }
    }

    /// Milliseconds.
    #[must_use]
    pub const fn millisecond() -> Self {
        Self::new(TimeUnit::Millisecond)
    }

    /// Seconds.
    #[must_use]
    pub const fn second() -> Self {
        Self::new(TimeUnit::Second)
    }

    /// Minutes.
    #[must_use]
    pub const fn minute() -> Self {
        Self::new(TimeUnit::Minute)
    }

    /// Hours.
    #[must_use]
    pub const fn hour() -> Self {
        Self::new(TimeUnit::Hour)
    }

    /// Days.
    #[must_use]
    pub const fn day() -> Self {
        Self::new(TimeUnit::Day)
    }

    /// Weeks starting on `start`.
    #[must_use]
    pub const fn week(start: Weekday) -> Self {
        Self::new(TimeUnit::Week(start))
    }

    /// Weeks starting on Sunday.
    #[must_use]
    pub const fn sunday() -> Self {
        Self::week(Weekday::Sun)
    }

    /// Weeks starting on Monday.
    #[must_use]
    pub const fn monday() -> Self {
        Self::week(Weekday::Mon)
    }

    /// Months.
    #[must_use]
    pub const fn month() -> Self {
        Self::new(TimeUnit::Month)
    }

    /// Years.
    #[must_use]
    pub const fn year() -> Self {
        Self::new(TimeUnit::Year)
    }

    /// Returns the same interval evaluated in `calendar`.
    #[must_use]
    pub const fn in_calendar(mut self, calendar: Calendar) -> Self {
        self.calendar = calendar;
        self
    }

    /// The base unit.
    #[must_use]
    pub const fn unit(&self) -> TimeUnit {
        self.unit
    }

    /// How many base units one step spans.
    #[must_use]
    pub const fn step(&self) -> u32 {
        self.step
    }

    /// The calendar the interval is evaluated in.
    #[must_use]
    pub const fn calendar(&self) -> Calendar {
        self.calendar
    }

    /// Returns this unit stepped every `step` units, or `None` unless `step`
    /// floors to a positive finite integer.
    ///
    /// Boundaries are aligned to the parent unit: `minute().every(15)`
    /// yields `:00`, `:15`, `:30` and `:45`. Years align to multiples of
    /// `step`, milliseconds to multiples of `step` since the epoch, and
    /// weeks to whole `step`-week periods counted from the epoch.
    #[must_use]
    pub fn every(self, step: f64) -> Option<Self> {
        let step = step.floor();
        if !step.is_finite() || step < 1.0 || step > f64::from(u32::MAX) {
            return None;
        }
        #[expect(
            clippy::cast_possible_truncation,
            reason = "step is a positive integer within u32 range"
        )]
        let step = step as u32;
        Some(Self { step, ..self })
    }

    /// Returns the latest boundary at or before `t`.
    #[must_use]
    pub fn floor(&self, t: DateTime<Utc>) -> DateTime<Utc> {
        match (self.unit, self.step) {
            (_, 1) => self.base_floor(t),
            (TimeUnit::Millisecond, k) => {
                let k = i64::from(k);
                from_millis(t.timestamp_millis().div_euclid(k) * k)
            }
            (TimeUnit::Year, k) => {
                let k = i32::try_from(k).unwrap_or(i32::MAX);
                let year = self.calendar.to_naive(t).year().div_euclid(k) * k;
                self.start_of_year(year).unwrap_or(t)
            }
            _ => {
                let mut d = self.base_floor(t);
                while !self.matches(d) && d != DateTime::<Utc>::MIN_UTC {
                    d = self.base_floor(from_millis(d.timestamp_millis() - 1));
                }
                d
            }
        }
    }

    /// Returns the earliest boundary at or after `t`.
    #[must_use]
    pub fn ceil(&self, t: DateTime<Utc>) -> DateTime<Utc> {
        let floored = self.floor(from_millis(t.timestamp_millis().saturating_sub(1)));
        self.offset(floored, 1)
    }

    /// Returns the nearer of [`floor`](Self::floor) and
    /// [`ceil`](Self::ceil); ties go to the ceiling.
    #[must_use]
    pub fn round(&self, t: DateTime<Utc>) -> DateTime<Utc> {
        let floor = self.floor(t);
        let ceil = self.ceil(t);
        if t - floor < ceil - t { floor } else { ceil }
    }

    /// Moves `t` by `steps` intervals without flooring it first.
    #[must_use]
    pub fn offset(&self, t: DateTime<Utc>, steps: i64) -> DateTime<Utc> {
        match (self.unit, self.step) {
            (_, 1) => self.base_offset(t, steps),
            (TimeUnit::Millisecond | TimeUnit::Year, k) => {
                self.base_offset(t, steps.saturating_mul(i64::from(k)))
            }
            _ => {
                let direction = steps.signum();
                let mut d = t;
                for _ in 0..steps.unsigned_abs() {
                    loop {
                        let next = self.base_offset(d, direction);
                        if next == d {
                            return d;
                        }
                        d = next;
                        if self.matches(d) {
                            break;
                        }
                    }
                }
                d
            }
        }
    }

    /// Returns every boundary in `[start, stop)`, taking every `step`-th.
    ///
    /// Empty when `start >= stop` or `step < 1`.
    #[must_use]
    pub fn range(&self, start: DateTime<Utc>, stop: DateTime<Utc>, step: i64) -> Vec<DateTime<Utc>> {
        let mut out = Vec::new();
        let mut current = self.ceil(start);
        if current >= stop || step < 1 {
            return out;
        }
        loop {
            out.push(current);
            let previous = current;
            current = self.floor(self.offset(current, step));
            if !(previous < current && current < stop) {
                break;
            }
        }
        out
    }

    /// Counts base-unit boundaries in `(start, end]`, after flooring both
    /// ends to the base unit.
    #[must_use]
    pub fn count(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
        let (start, end) = (self.base_floor(start), self.base_floor(end));
        match self.unit {
            TimeUnit::Millisecond | TimeUnit::Second | TimeUnit::Minute | TimeUnit::Hour => {
                (end - start).num_milliseconds() / self.unit.duration_ms()
            }
            TimeUnit::Day => self.day_span(start, end),
            TimeUnit::Week(_) => self.day_span(start, end).div_euclid(7),
            TimeUnit::Month => {
                let (a, b) = (self.calendar.to_naive(start), self.calendar.to_naive(end));
                i64::from(b.year() - a.year()) * 12 + i64::from(b.month0())
                    - i64::from(a.month0())
            }
            TimeUnit::Year => {
                let (a, b) = (self.calendar.to_naive(start), self.calendar.to_naive(end));
                i64::from(b.year() - a.year())
            }
        }
    }

    fn day_span(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
        let a = self.calendar.to_naive(start).date();
        let b = self.calendar.to_naive(end).date();
        (b - a).num_days()
    }

    /// Whether `t` is a boundary of the stepped interval.
    fn matches(&self, t: DateTime<Utc>) -> bool {
        let step = i64::from(self.step);
        let naive = self.calendar.to_naive(t);
        let field = match self.unit {
            // Seconds align to the UTC second, which every offset agrees on.
            TimeUnit::Second => i64::from(t.second()),
            TimeUnit::Minute => i64::from(naive.minute()),
            TimeUnit::Hour => i64::from(naive.hour()),
            TimeUnit::Day => i64::from(naive.day0()),
            TimeUnit::Month => i64::from(naive.month0()),
            TimeUnit::Week(_) => self.count(DateTime::<Utc>::UNIX_EPOCH, t),
            TimeUnit::Millisecond => t.timestamp_millis(),
            TimeUnit::Year => i64::from(naive.year()),
        };
        field.rem_euclid(step) == 0
    }

    fn base_floor(&self, t: DateTime<Utc>) -> DateTime<Utc> {
        if let Some(unit) = self.unit.fixed_ms() {
            let offset = i64::from(self.calendar.offset_seconds(t)) * SECOND;
            let local = t.timestamp_millis().saturating_add(offset);
            return from_millis(local.div_euclid(unit) * unit - offset);
        }
        let naive = self.calendar.to_naive(t);
        let date = naive.date();
        let start = match self.unit {
            TimeUnit::Week(start) => {
                let back = (7 + date.weekday().num_days_from_sunday()
                    - start.num_days_from_sunday())
                    % 7;
                date.checked_sub_signed(TimeDelta::days(i64::from(back)))
            }
            TimeUnit::Month => date.with_day(1),
            TimeUnit::Year => date.with_day(1).and_then(|d| d.with_month(1)),
            _ => Some(date),
        };
        start.map_or(t, |d| self.calendar.from_naive(d.and_time(NaiveTime::MIN)))
    }

    fn base_offset(&self, t: DateTime<Utc>, steps: i64) -> DateTime<Utc> {
        if let Some(unit) = self.unit.fixed_ms() {
            return from_millis(t.timestamp_millis().saturating_add(steps.saturating_mul(unit)));
        }
        let naive = self.calendar.to_naive(t);
        let shifted = match self.unit {
            TimeUnit::Day => add_days(naive, steps),
            TimeUnit::Week(_) => add_days(naive, steps.saturating_mul(7)),
            TimeUnit::Month => add_months(naive, steps),
            TimeUnit::Year => add_months(naive, steps.saturating_mul(12)),
            _ => Some(naive),
        };
        match shifted {
            Some(naive) => self.calendar.from_naive(naive),
            None if steps < 0 => DateTime::<Utc>::MIN_UTC,
            None => DateTime::<Utc>::MAX_UTC,
        }
    }

    fn start_of_year(&self, year: i32) -> Option<DateTime<Utc>> {
        let date = chrono::NaiveDate::from_ymd_opt(year, 1, 1)?;
        Some(self.calendar.from_naive(date.and_time(NaiveTime::MIN)))
    }
}

fn add_days(naive: NaiveDateTime, days: i64) -> Option<NaiveDateTime> {
    naive.checked_add_signed(TimeDelta::try_days(days)?)
}

fn add_months(naive: NaiveDateTime, months: i64) -> Option<NaiveDateTime> {
    let magnitude = u32::try_from(months.unsigned_abs()).ok()?;
    if months < 0 {
        naive.checked_sub_months(Months::new(magnitude))
    } else {
        naive.checked_add_months(Months::new(magnitude))
    }
}
