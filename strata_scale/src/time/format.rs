// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::fmt::Write as _;

use chrono::{DateTime, Datelike, Timelike, Utc};

use super::calendar::Calendar;
use super::interval::TimeInterval;

/// Names and composite formats for one language.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeLocale {
    /// Expansion of `%c`.
    pub date_time: &'static str,
    /// Expansion of `%x`.
    pub date: &'static str,
    /// Expansion of `%X`.
    pub time: &'static str,
    /// `%p` before and after noon.
    pub periods: [&'static str; 2],
    /// `%A`, from Sunday.
    pub days: [&'static str; 7],
    /// `%a`, from Sunday.
    pub short_days: [&'static str; 7],
    /// `%B`, from January.
    pub months: [&'static str; 12],
    /// `%b`, from January.
    pub short_months: [&'static str; 12],
}

impl Default for TimeLocale {
    /// United States English.
    fn default() -> Self {
        Self {
            date_time: "%x, %X",
            date: "%-m/%-d/%Y",
            time: "%-I:%M:%S %p",
            periods: ["AM", "PM"],
            days: [
                "Sunday",
                "Monday",
                "Tuesday",
                "Wednesday",
                "Thursday",
                "Friday",
                "Saturday",
            ],
            short_days: ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"],
            months: [
                "January",
                "February",
                "March",
                "April",
                "May",
                "June",
                "July",
                "August",
                "September",
                "October",
                "November",
                "December",
            ],
            short_months: [
                "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
            ],
        }
    }
}

impl TimeLocale {
    /// Simplified Chinese.
    #[must_use]
    pub fn zh_cn() -> Self {
        Self {
            date_time: "%x, %X",
            date: "%Y-%-m-%-d",
            time: "%-I:%M:%S %p",
            periods: ["AM", "PM"],
            days: ["周日", "周一", "周二", "周三", "周四", "周五", "周六"],
            short_days: ["周日", "周一", "周二", "周三", "周四", "周五", "周六"],
            months: [
                "一月",
                "二月",
                "三月",
                "四月",
                "五月",
                "六月",
                "七月",
                "八月",
                "九月",
                "十月",
                "十一月",
                "十二月",
            ],
            short_months: [
                "1月", "2月", "3月", "4月", "5月", "6月", "7月", "8月", "9月", "10月", "11月",
                "12月",
            ],
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Pad {
    Default,
    Zero,
    Space,
    None,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Piece {
    Literal(String),
    Field(char, Pad),
}

/// A parsed `strftime`-style format.
///
/// | Directive | Output |
/// |-----------|--------|
/// | `%a` `%A` | abbreviated / full weekday name |
/// | `%b` `%B` | abbreviated / full month name |
/// | `%c` `%x` `%X` | the locale's date-time, date and time formats |
/// | `%d` `%e` | day of month, zero / space padded |
/// | `%f` `%L` | microseconds, milliseconds |
/// | `%H` `%I` | hour, 24 / 12 hour clock |
/// | `%j` | day of year |
/// | `%m` `%M` `%S` | month, minute, second |
/// | `%p` | AM or PM |
/// | `%Q` `%s` | milliseconds / seconds since the epoch |
/// | `%u` `%w` | weekday, Monday = 1 / Sunday = 0 |
/// | `%y` `%Y` | two / four digit year |
/// | `%Z` | offset from UTC, `+hhmm` |
/// | `%%` | a percent sign |
///
/// A `0`, `_` or `-` between the `%` and the directive pads with zeros,
/// pads with spaces, or does not pad.
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use strata_scale::time::{TimeFormat, TimeLocale};
///
/// let format = TimeFormat::new("%B %-d, %Y", &TimeLocale::default());
/// let t = Utc.with_ymd_and_hms(2011, 1, 2, 0, 0, 0).unwrap();
/// assert_eq!(format.format(t), "January 2, 2011");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimeFormat {
    pieces: Vec<Piece>,
    locale: TimeLocale,
    calendar: Calendar,
}

impl TimeFormat {
    /// Parses `specifier` for `locale`, formatting in UTC.
    #[must_use]
    pub fn new(specifier: &str, locale: &TimeLocale) -> Self {
        let mut pieces = Vec::new();
        parse(specifier, locale, 0, &mut pieces);
        Self {
            pieces,
            locale: *locale,
            calendar: Calendar::Utc,
        }
    }

    /// Formats on the wall clock of `calendar` instead.
    #[must_use]
    pub fn with_calendar(mut self, calendar: Calendar) -> Self {
        self.calendar = calendar;
        self
    }

    /// Formats `t`.
    #[must_use]
    pub fn format(&self, t: DateTime<Utc>) -> String {
        let mut out = String::new();
        for piece in &self.pieces {
            match piece {
                Piece::Literal(text) => out.push_str(text),
                Piece::Field(directive, pad) => self.field(&mut out, *directive, *pad, t),
            }
        }
        out
    }

    fn field(&self, out: &mut String, directive: char, pad: Pad, t: DateTime<Utc>) {
        let n = self.calendar.to_naive(t);
        let locale = &self.locale;
        let weekday = n.weekday().num_days_from_sunday() as usize;
        let month0 = n.month0() as usize;
        match directive {
            'a' => out.push_str(locale.short_days[weekday]),
            'A' => out.push_str(locale.days[weekday]),
            'b' => out.push_str(locale.short_months[month0]),
            'B' => out.push_str(locale.months[month0]),
            'd' => padded(out, n.day().into(), pad, '0', 2),
            'e' => padded(out, n.day().into(), pad, ' ', 2),
            'f' => padded(out, (n.nanosecond() / 1_000).min(999_999).into(), pad, '0', 6),
            'H' => padded(out, n.hour().into(), pad, '0', 2),
            'I' => padded(out, n.hour12().1.into(), pad, '0', 2),
            'j' => padded(out, n.ordinal().into(), pad, '0', 3),
            'L' => padded(out, (n.nanosecond() / 1_000_000).min(999).into(), pad, '0', 3),
            'm' => padded(out, n.month().into(), pad, '0', 2),
            'M' => padded(out, n.minute().into(), pad, '0', 2),
            'p' => out.push_str(locale.periods[usize::from(n.hour() >= 12)]),
            'Q' => {
                let _ = write!(out, "{}", t.timestamp_millis());
            }
            's' => {
                let _ = write!(out, "{}", t.timestamp_millis().div_euclid(1_000));
            }
            'S' => padded(out, n.second().into(), pad, '0', 2),
            'u' => {
                let _ = write!(out, "{}", n.weekday().number_from_monday());
            }
            'w' => {
                let _ = write!(out, "{weekday}");
            }
            'y' => padded(out, n.year().rem_euclid(100).into(), pad, '0', 2),
            'Y' => padded(out, (n.year() % 10_000).into(), pad, '0', 4),
            'Z' => {
                let offset = self.calendar.offset_seconds(t);
                let minutes = offset.unsigned_abs() / 60;
                out.push(if offset < 0 { '-' } else { '+' });
                padded(out, (minutes / 60).into(), Pad::Zero, '0', 2);
                padded(out, (minutes % 60).into(), Pad::Zero, '0', 2);
            }
            other => out.push(other),
        }
    }
}

/// Appends `value`, left-filled to `width` digits after any sign.
fn padded(out: &mut String, value: i64, pad: Pad, default: char, width: usize) {
    let fill = match pad {
        Pad::Default => default,
        Pad::Zero => '0',
        Pad::Space => ' ',
        Pad::None => {
            let _ = write!(out, "{value}");
            return;
        }
    };
    if value < 0 {
        out.push('-');
    }
    let digits = value.unsigned_abs().to_string();
    for _ in digits.len()..width {
        out.push(fill);
    }
    out.push_str(&digits);
}

fn parse(specifier: &str, locale: &TimeLocale, depth: u8, pieces: &mut Vec<Piece>) {
    let mut literal = String::new();
    let mut chars = specifier.chars();
    while let Some(c) = chars.next() {
        if c != '%' {
            literal.push(c);
            continue;
        }
        let Some(mut directive) = chars.next() else {
            literal.push('%');
            break;
        };
        let mut pad = Pad::Default;
        if let Some(modifier) = match directive {
            '0' => Some(Pad::Zero),
            '_' => Some(Pad::Space),
            '-' => Some(Pad::None),
            _ => None,
        } {
            pad = modifier;
            let Some(next) = chars.next() else {
                literal.push(directive);
                break;
            };
            directive = next;
        }
        let nested = match directive {
            'c' => Some(locale.date_time),
            'x' => Some(locale.date),
            'X' => Some(locale.time),
            '%' => {
                literal.push('%');
                continue;
            }
            _ => None,
        };
        if !literal.is_empty() {
            pieces.push(Piece::Literal(std::mem::take(&mut literal)));
        }
        match nested {
            Some(nested) if depth < 2 => parse(nested, locale, depth + 1, pieces),
            Some(_) => {}
            None => pieces.push(Piece::Field(directive, pad)),
        }
    }
    if !literal.is_empty() {
        pieces.push(Piece::Literal(literal));
    }
}

/// Formats axis ticks at the coarsest precision that shows them exactly.
///
/// A tick on a year boundary prints the year, one on a month boundary the
/// month name, and so on down to milliseconds.
#[derive(Clone, Debug)]
pub struct TickFormat {
    calendar: Calendar,
    millisecond: TimeFormat,
    second: TimeFormat,
    minute: TimeFormat,
    hour: TimeFormat,
    day: TimeFormat,
    week: TimeFormat,
    month: TimeFormat,
    year: TimeFormat,
}

impl TickFormat {
    /// Creates a tick format for `locale` evaluated in `calendar`.
    #[must_use]
    pub fn new(locale: &TimeLocale, calendar: Calendar) -> Self {
        let format = |spec: &str| TimeFormat::new(spec, locale).with_calendar(calendar);
        Self {
            calendar,
            millisecond: format(".%L"),
            second: format(":%S"),
            minute: format("%I:%M"),
            hour: format("%I %p"),
            day: format("%a %d"),
            week: format("%b %d"),
            month: format("%B"),
            year: format("%Y"),
        }
    }

    /// Formats one tick.
    #[must_use]
    pub fn format(&self, t: DateTime<Utc>) -> String {
        let below = |interval: TimeInterval| interval.in_calendar(self.calendar).floor(t) < t;
        let format = if below(TimeInterval::second()) {
            &self.millisecond
        } else if below(TimeInterval::minute()) {
            &self.second
        } else if below(TimeInterval::hour()) {
            &self.minute
        } else if below(TimeInterval::day()) {
            &self.hour
        } else if below(TimeInterval::month()) {
            if below(TimeInterval::sunday()) {
                &self.day
            } else {
                &self.week
            }
        } else if below(TimeInterval::year()) {
            &self.month
        } else {
            &self.year
        };
        format.format(t)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, TimeZone};

    use super::*;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn numeric_directives() {
        let t = at(2011, 1, 2, 3, 4, 5) + chrono::TimeDelta::milliseconds(6);
        let format = TimeFormat::new("%Y-%m-%d %H:%M:%S.%L", &TimeLocale::default());
        assert_eq!(format.format(t), "2011-01-02 03:04:05.006");
        let format = TimeFormat::new("%j %y %u %w %f %Q", &TimeLocale::default());
        assert_eq!(format.format(t), "002 11 7 0 006000 1293937445006");
    }

    #[test]
    fn names_and_padding() {
        let t = at(2011, 1, 2, 13, 4, 0);
        let format = TimeFormat::new("%a %b %e %-I %p|%_H|%0e", &TimeLocale::default());
        assert_eq!(format.format(t), "Sun Jan  2 1 PM|13|02");
    }

    #[test]
    fn locale_composites() {
        let t = at(2011, 1, 2, 13, 4, 5);
        let en = TimeFormat::new("%c", &TimeLocale::default());
        assert_eq!(en.format(t), "1/2/2011, 1:04:05 PM");
        let zh = TimeFormat::new("%x %A %b", &TimeLocale::zh_cn());
        assert_eq!(zh.format(t), "2011-1-2 周日 1月");
    }

    #[test]
    fn percent_and_unknown_directives() {
        let format = TimeFormat::new("100%% %q %", &TimeLocale::default());
        assert_eq!(format.format(at(2011, 1, 1, 0, 0, 0)), "100% q %");
    }

    #[test]
    fn zone_and_calendar() {
        let minus = Calendar::Fixed(FixedOffset::west_opt(5 * 3600 + 30 * 60).unwrap());
        let format = TimeFormat::new("%H:%M %Z", &TimeLocale::default()).with_calendar(minus);
        assert_eq!(format.format(at(2011, 1, 2, 12, 0, 0)), "06:30 -0530");
        let utc = TimeFormat::new("%Z", &TimeLocale::default());
        assert_eq!(utc.format(at(2011, 1, 2, 12, 0, 0)), "+0000");
    }

    #[test]
    fn tick_format_picks_precision() {
        let f = TickFormat::new(&TimeLocale::default(), Calendar::Utc);
        assert_eq!(f.format(at(2011, 1, 1, 0, 0, 0)), "2011");
        assert_eq!(f.format(at(2011, 2, 1, 0, 0, 0)), "February");
        assert_eq!(f.format(at(2011, 1, 2, 0, 0, 0)), "Jan 02");
        assert_eq!(f.format(at(2011, 1, 3, 0, 0, 0)), "Mon 03");
        assert_eq!(f.format(at(2011, 1, 3, 13, 0, 0)), "01 PM");
        assert_eq!(f.format(at(2011, 1, 3, 13, 30, 0)), "01:30");
        assert_eq!(f.format(at(2011, 1, 3, 13, 30, 45)), ":45");
        let t = at(2011, 1, 3, 13, 30, 45) + chrono::TimeDelta::milliseconds(250);
        assert_eq!(f.format(t), ".250");
    }
}
