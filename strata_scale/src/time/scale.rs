// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use chrono::{DateTime, Utc};

use super::calendar::Calendar;
use super::format::{TickFormat, TimeLocale};
use super::interval::TimeInterval;
use super::ticks::{time_tick_interval, time_ticks, time_ticks_every};
use crate::ScaleError;
use crate::continuous::{ContinuousScale, RangeValue, forward_continuous};

/// A continuous scale over instants.
///
/// Mapping is linear in milliseconds since the epoch. Ticks and
/// [`nice`](Self::nice) follow calendar boundaries in the scale's
/// [`Calendar`], UTC unless changed with
/// [`with_calendar`](Self::with_calendar).
#[derive(Clone, Debug)]
pub struct TimeScale<R> {
    scale: ContinuousScale<DateTime<Utc>, R>,
    calendar: Calendar,
}

/// Creates a time scale.
///
/// # Errors
///
/// Fails if either side has fewer than two stops or their lengths differ.
pub fn scale_time<R: RangeValue>(
    domain: Vec<DateTime<Utc>>,
    range: Vec<R>,
) -> Result<TimeScale<R>, ScaleError> {
    Ok(TimeScale {
        scale: ContinuousScale::standard(domain, range, None)?,
        calendar: Calendar::Utc,
    })
}

/// Creates a time scale whose color range interpolates through a gamma
/// curve.
///
/// # Errors
///
/// As [`scale_time`].
pub fn scale_time_with_gamma<R: RangeValue>(
    domain: Vec<DateTime<Utc>>,
    range: Vec<R>,
    gamma: f64,
) -> Result<TimeScale<R>, ScaleError> {
    Ok(TimeScale {
        scale: ContinuousScale::standard(domain, range, Some(gamma))?,
        calendar: Calendar::Utc,
    })
}

impl<R: Clone> TimeScale<R> {
    /// Evaluates ticks, `nice` and tick formats in `calendar`.
    #[must_use]
    pub fn with_calendar(mut self, calendar: Calendar) -> Self {
        self.calendar = calendar;
        self
    }

    /// The calendar ticks are aligned in.
    #[must_use]
    pub fn calendar(&self) -> Calendar {
        self.calendar
    }

    forward_continuous!(DateTime<Utc>);

    /// Returns about `count` calendar-aligned ticks spanning the domain.
    #[must_use]
    pub fn ticks(&self, count: usize) -> Vec<DateTime<Utc>> {
        let (first, last) = self.ends();
        time_ticks(first, last, count, self.calendar)
    }

    /// Returns the boundaries of `interval` spanning the domain.
    #[must_use]
    pub fn ticks_every(&self, interval: &TimeInterval) -> Vec<DateTime<Utc>> {
        let (first, last) = self.ends();
        time_ticks_every(first, last, interval)
    }

    /// Extends the outer domain stops to the boundaries of the tick
    /// interval chosen for `count` ticks.
    pub fn nice(&mut self, count: usize) -> &mut Self {
        let (first, last) = self.ends();
        let (lo, hi) = if last < first { (last, first) } else { (first, last) };
        if let Some(interval) = time_tick_interval(lo, hi, count, self.calendar) {
            self.nice_interval(&interval);
        }
        self
    }

    /// Extends the outer domain stops to boundaries of `interval`.
    pub fn nice_interval(&mut self, interval: &TimeInterval) -> &mut Self {
        let mut domain = self.scale.domain().to_vec();
        let last = domain.len() - 1;
        let (i0, i1) = if domain[last] < domain[0] { (last, 0) } else { (0, last) };
        domain[i0] = interval.floor(domain[i0]);
        domain[i1] = interval.ceil(domain[i1]);
        self.scale.replace_domain(domain);
        self
    }

    /// Returns a formatter that labels ticks at their natural precision.
    #[must_use]
    pub fn tick_format(&self, locale: &TimeLocale) -> TickFormat {
        TickFormat::new(locale, self.calendar)
    }

    /// Returns an independent copy.
    #[must_use]
    pub fn copy(&self) -> Self {
        self.clone()
    }

    fn ends(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        let domain = self.scale.domain();
        (domain[0], domain[domain.len() - 1])
    }
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, TimeZone};

    use super::*;
    use crate::Clamp;
    use crate::color::Rgba;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    #[test]
    fn maps_and_inverts_instants() {
        let s = scale_time(vec![at(2009, 1, 1, 0, 0), at(2010, 1, 1, 0, 0)], vec![0.0, 365.0]).unwrap();
        assert!((s.scale(at(2009, 7, 1, 0, 0)) - 181.0).abs() < 1e-9);
        assert_eq!(s.invert(181.0), Some(at(2009, 7, 1, 0, 0)));
    }

    #[test]
    fn clamps_to_the_domain() {
        let mut s = scale_time(vec![at(2009, 1, 1, 0, 0), at(2009, 1, 2, 0, 0)], vec![0.0, 24.0]).unwrap();
        s.clamp(Clamp::Domain);
        assert_eq!(s.scale(at(2009, 1, 3, 0, 0)), 24.0);
        assert_eq!(s.invert(-10.0), Some(at(2009, 1, 1, 0, 0)));
    }

    #[test]
    fn nice_rounds_to_three_hours() {
        let mut s = scale_time(vec![at(2009, 1, 1, 0, 17), at(2009, 1, 1, 23, 42)], vec![0.0, 1.0]).unwrap();
        s.nice(10);
        assert_eq!(s.domain(), [at(2009, 1, 1, 0, 0), at(2009, 1, 2, 0, 0)]);
    }

    #[test]
    fn nice_with_an_interval_keeps_direction() {
        let mut s = scale_time(vec![at(2009, 3, 14, 0, 0), at(2009, 1, 20, 0, 0)], vec![0.0, 1.0]).unwrap();
        s.nice_interval(&TimeInterval::month());
        assert_eq!(s.domain(), [at(2009, 4, 1, 0, 0), at(2009, 1, 1, 0, 0)]);
    }

    #[test]
    fn ticks_follow_the_calendar() {
        let plus8 = Calendar::Fixed(FixedOffset::east_opt(8 * 3600).unwrap());
        let s = scale_time(vec![at(2011, 1, 1, 0, 0), at(2011, 1, 4, 0, 0)], vec![0.0, 1.0])
            .unwrap()
            .with_calendar(plus8);
        // Local midnights at +08:00 fall on 16:00 UTC.
        assert_eq!(
            s.ticks(3),
            [at(2011, 1, 1, 16, 0), at(2011, 1, 2, 16, 0), at(2011, 1, 3, 16, 0)]
        );
        let hours = s.ticks_every(&TimeInterval::hour().every(12.0).unwrap());
        assert_eq!(hours.len(), 7, "{hours:?}");
    }

    #[test]
    fn color_ranges_and_labels() {
        let s = scale_time_with_gamma(
            vec![at(2011, 1, 1, 0, 0), at(2012, 1, 1, 0, 0)],
            vec![Rgba::rgb(0.0, 0.0, 0.0), Rgba::rgb(255.0, 255.0, 255.0)],
            1.0,
        )
        .unwrap();
        assert_eq!(s.scale(at(2011, 1, 1, 0, 0)), Rgba::rgb(0.0, 0.0, 0.0));
        assert!(!s.as_continuous().is_invertible());

        let fmt = s.tick_format(&TimeLocale::default());
        let labels: Vec<String> = s.ticks(4).into_iter().map(|t| fmt.format(t)).collect();
        assert_eq!(labels, ["2011", "April", "July", "October", "2012"]);
    }

    #[test]
    fn copies_are_independent() {
        let s = scale_time(vec![at(2011, 1, 1, 0, 0), at(2011, 1, 2, 0, 0)], vec![0.0, 1.0]).unwrap();
        let mut c = s.copy();
        c.set_domain(vec![at(2011, 1, 1, 0, 0), at(2011, 1, 3, 0, 0)]).unwrap();
        assert_eq!(s.domain()[1], at(2011, 1, 2, 0, 0));
        assert_eq!(c.scale(at(2011, 1, 2, 0, 0)), 0.5);
    }
}
