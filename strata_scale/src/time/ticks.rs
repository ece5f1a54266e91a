// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use chrono::{DateTime, Utc};

use super::calendar::{Calendar, from_millis};
use super::interval::{DAY, HOUR, MINUTE, MONTH, SECOND, TimeInterval, TimeUnit, WEEK, YEAR};
use crate::bisect::bisect_right;
use crate::ticks::tick_step;

/// Candidate tick intervals, by nominal duration.
const TICK_INTERVALS: [(TimeUnit, u32, i64); 18] = [
    (TimeUnit::Second, 1, SECOND),
    (TimeUnit::Second, 5, 5 * SECOND),
    (TimeUnit::Second, 15, 15 * SECOND),
    (TimeUnit::Second, 30, 30 * SECOND),
    (TimeUnit::Minute, 1, MINUTE),
    (TimeUnit::Minute, 5, 5 * MINUTE),
    (TimeUnit::Minute, 15, 15 * MINUTE),
    (TimeUnit::Minute, 30, 30 * MINUTE),
    (TimeUnit::Hour, 1, HOUR),
    (TimeUnit::Hour, 3, 3 * HOUR),
    (TimeUnit::Hour, 6, 6 * HOUR),
    (TimeUnit::Hour, 12, 12 * HOUR),
    (TimeUnit::Day, 1, DAY),
    (TimeUnit::Day, 2, 2 * DAY),
    (TimeUnit::Week(chrono::Weekday::Sun), 1, WEEK),
    (TimeUnit::Month, 1, MONTH),
    (TimeUnit::Month, 3, 3 * MONTH),
    (TimeUnit::Year, 1, YEAR),
];

/// Picks the calendar interval whose nominal length is closest (by ratio)
/// to `|stop - start| / count`.
///
/// Spans longer than the largest candidate step in whole years chosen by
/// [`tick_step`]; spans shorter than a second step in milliseconds.
/// An empty span yields a one-millisecond interval, so its only tick is
/// `start`. Returns `None` for a zero `count`.
#[must_use]
pub fn time_tick_interval(
    start: DateTime<Utc>,
    stop: DateTime<Utc>,
    count: usize,
    calendar: Calendar,
) -> Option<TimeInterval> {
    if count == 0 {
        return None;
    }
    let (start_ms, stop_ms) = (start.timestamp_millis() as f64, stop.timestamp_millis() as f64);
    let target = (stop_ms - start_ms).abs() / count as f64;
    let durations = TICK_INTERVALS.map(|(_, _, ms)| ms as f64);
    let i = bisect_right(&durations, &target);
    let interval = if i == TICK_INTERVALS.len() {
        let year = YEAR as f64;
        TimeInterval::year().every(tick_step(start_ms / year, stop_ms / year, count))
    } else if i == 0 {
        TimeInterval::millisecond().every(tick_step(start_ms, stop_ms, count).max(1.0))
    } else {
        let nearer = if target / durations[i - 1] < durations[i] / target {
            i - 1
        } else {
            i
        };
        let (unit, step, _) = TICK_INTERVALS[nearer];
        TimeInterval::new(unit).every(f64::from(step))
    };
    interval.map(|interval| interval.in_calendar(calendar))
}

/// Returns about `count` calendar-aligned ticks between `start` and `stop`,
/// inclusive.
///
/// The ticks descend when `stop < start`.
#[must_use]
pub fn time_ticks(
    start: DateTime<Utc>,
    stop: DateTime<Utc>,
    count: usize,
    calendar: Calendar,
) -> Vec<DateTime<Utc>> {
    let (lo, hi) = if stop < start { (stop, start) } else { (start, stop) };
    match time_tick_interval(lo, hi, count, calendar) {
        Some(interval) => time_ticks_every(start, stop, &interval),
        None => Vec::new(),
    }
}

/// Returns the boundaries of `interval` between `start` and `stop`,
/// inclusive.
///
/// The ticks descend when `stop < start`.
#[must_use]
pub fn time_ticks_every(
    start: DateTime<Utc>,
    stop: DateTime<Utc>,
    interval: &TimeInterval,
) -> Vec<DateTime<Utc>> {
    let reverse = stop < start;
    let (lo, hi) = if reverse { (stop, start) } else { (start, stop) };
    let mut ticks = interval.range(lo, from_millis(hi.timestamp_millis().saturating_add(1)), 1);
    if reverse {
        ticks.reverse();
    }
    ticks
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn seconds_for_a_ten_second_span() {
        let start = utc(2011, 1, 1, 12, 0, 0);
        let ticks = time_ticks(start, utc(2011, 1, 1, 12, 0, 10), 10, Calendar::Utc);
        assert_eq!(ticks.len(), 11);
        assert_eq!(ticks[0], start);
        assert_eq!(ticks[10], utc(2011, 1, 1, 12, 0, 10));
    }

    #[test]
    fn six_hours_for_a_day_in_four() {
        let ticks = time_ticks(utc(2011, 1, 1, 0, 0, 0), utc(2011, 1, 2, 0, 0, 0), 4, Calendar::Utc);
        assert_eq!(
            ticks,
            [
                utc(2011, 1, 1, 0, 0, 0),
                utc(2011, 1, 1, 6, 0, 0),
                utc(2011, 1, 1, 12, 0, 0),
                utc(2011, 1, 1, 18, 0, 0),
                utc(2011, 1, 2, 0, 0, 0),
            ]
        );
    }

    #[test]
    fn quarters_for_a_year() {
        let ticks = time_ticks(utc(2011, 1, 1, 0, 0, 0), utc(2012, 1, 1, 0, 0, 0), 4, Calendar::Utc);
        assert_eq!(
            ticks,
            [
                utc(2011, 1, 1, 0, 0, 0),
                utc(2011, 4, 1, 0, 0, 0),
                utc(2011, 7, 1, 0, 0, 0),
                utc(2011, 10, 1, 0, 0, 0),
                utc(2012, 1, 1, 0, 0, 0),
            ]
        );
    }

    #[test]
    fn decades_beyond_the_table() {
        let ticks = time_ticks(utc(2000, 1, 1, 0, 0, 0), utc(2050, 1, 1, 0, 0, 0), 5, Calendar::Utc);
        let years: Vec<i32> = ticks.iter().map(chrono::Datelike::year).collect();
        assert_eq!(years, [2000, 2010, 2020, 2030, 2040, 2050]);
    }

    #[test]
    fn milliseconds_below_the_table() {
        let start = from_millis(1_000);
        let interval = time_tick_interval(start, from_millis(1_100), 10, Calendar::Utc).unwrap();
        assert_eq!(interval.unit(), TimeUnit::Millisecond);
        assert_eq!(interval.step(), 10);
        assert_eq!(time_ticks(start, from_millis(1_100), 10, Calendar::Utc).len(), 11);
    }

    #[test]
    fn reversed_span_descends() {
        let ticks = time_ticks(utc(2011, 1, 2, 0, 0, 0), utc(2011, 1, 1, 0, 0, 0), 4, Calendar::Utc);
        assert_eq!(ticks.first(), Some(&utc(2011, 1, 2, 0, 0, 0)));
        assert_eq!(ticks.last(), Some(&utc(2011, 1, 1, 0, 0, 0)));
    }

    #[test]
    fn empty_span_ticks_once() {
        let t = utc(2011, 1, 1, 12, 0, 0);
        let interval = time_tick_interval(t, t, 10, Calendar::Utc).unwrap();
        assert_eq!(interval.unit(), TimeUnit::Millisecond);
        assert_eq!(interval.step(), 1);
        assert_eq!(time_ticks(t, t, 10, Calendar::Utc), vec![t]);
    }

    #[test]
    fn zero_count_yields_nothing() {
        let t = utc(2011, 1, 1, 0, 0, 0);
        assert!(time_tick_interval(t, utc(2012, 1, 1, 0, 0, 0), 0, Calendar::Utc).is_none());
    }
}
