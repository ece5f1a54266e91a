// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Evenly spaced, human-friendly tick values.
//!
//! Steps are 1, 2, 5 or 10 times a power of ten, chosen so that roughly
//! `count` ticks cover `[start, stop]`. Ticks are computed as integer
//! multiples of the step (or integer quotients, for steps below one) so
//! that values such as `0.2` come out exactly rather than as accumulated
//! sums.

const E10: f64 = 7.071_067_811_865_476; // sqrt(50)
const E5: f64 = 3.162_277_660_168_379_5; // sqrt(10)
const E2: f64 = core::f64::consts::SQRT_2;

/// Rounds half up, as `Math.round` does.
pub(crate) fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor()
}

/// Returns `(i1, i2, inc)`: ticks are `i * inc` for `i in i1..=i2` when
/// `inc > 0`, and `i / -inc` when `inc < 0`.
fn tick_spec(start: f64, stop: f64, count: f64) -> (f64, f64, f64) {
    let step = (stop - start) / count.max(0.0);
    let power = step.log10().floor();
    let error = step / 10_f64.powf(power);
    let factor = if error >= E10 {
        10.0
    } else if error >= E5 {
        5.0
    } else if error >= E2 {
        2.0
    } else {
        1.0
    };
    let (mut i1, mut i2, inc);
    if power < 0.0 {
        let scale = 10_f64.powf(-power) / factor;
        i1 = round_half_up(start * scale);
        i2 = round_half_up(stop * scale);
        if i1 / scale < start {
            i1 += 1.0;
        }
        if i2 / scale > stop {
            i2 -= 1.0;
        }
        inc = -scale;
    } else {
        let step = 10_f64.powf(power) * factor;
        i1 = round_half_up(start / step);
        i2 = round_half_up(stop / step);
        if i1 * step < start {
            i1 += 1.0;
        }
        if i2 * step > stop {
            i2 -= 1.0;
        }
        inc = step;
    }
    if i2 < i1 && (0.5..2.0).contains(&count) {
        return tick_spec(start, stop, count * 2.0);
    }
    (i1, i2, inc)
}

/// Returns about `count` nice values between `start` and `stop`, inclusive.
///
/// The ticks are in descending order when `stop < start`. A zero `count`
/// yields no ticks; `start == stop` yields `[start]`.
#[must_use]
pub fn ticks(start: f64, stop: f64, count: usize) -> Vec<f64> {
    if count == 0 || start.is_nan() || stop.is_nan() {
        return Vec::new();
    }
    if start == stop {
        return vec![start];
    }
    let reverse = stop < start;
    let (lo, hi) = if reverse { (stop, start) } else { (start, stop) };
    let (i1, i2, inc) = tick_spec(lo, hi, count as f64);
    if i1.is_nan() || i2.is_nan() || i2 < i1 {
        return Vec::new();
    }
    #[expect(
        clippy::cast_possible_truncation,
        reason = "i2 - i1 is a small non-negative integer"
    )]
    let n = (i2 - i1) as usize + 1;
    let value = |i: f64| if inc < 0.0 { i / -inc } else { i * inc };
    (0..n)
        .map(|k| {
            let k = k as f64;
            if reverse { value(i2 - k) } else { value(i1 + k) }
        })
        .collect()
}

/// Returns the tick increment for the interval.
///
/// Positive results are the step itself. Steps below one are returned as
/// the negated reciprocal (`-5` for a step of `0.2`) so they stay exact.
#[must_use]
pub fn tick_increment(start: f64, stop: f64, count: usize) -> f64 {
    tick_spec(start, stop, count as f64).2
}

/// Returns the signed distance between adjacent ticks.
#[must_use]
pub fn tick_step(start: f64, stop: f64, count: usize) -> f64 {
    let reverse = stop < start;
    let inc = if reverse {
        tick_increment(stop, start, count)
    } else {
        tick_increment(start, stop, count)
    };
    let step = if inc < 0.0 { 1.0 / -inc } else { inc };
    if reverse { -step } else { step }
}

/// Extends `[start, stop]` outward to multiples of the tick step.
///
/// Returns the widened bounds, or `None` when no finite step exists. The
/// step is recomputed on the widened interval until it stops changing, at
/// most ten times.
#[must_use]
pub fn nice(start: f64, stop: f64, count: usize) -> Option<(f64, f64)> {
    let (mut start, mut stop) = (start, stop);
    let mut previous = None;
    for _ in 0..10 {
        let step = tick_increment(start, stop, count);
        if previous == Some(step) {
            return Some((start, stop));
        }
        if step > 0.0 {
            start = (start / step).floor() * step;
            stop = (stop / step).ceil() * step;
        } else if step < 0.0 {
            start = (start * step).ceil() / step;
            stop = (stop * step).floor() / step;
        } else {
            return None;
        }
        previous = Some(step);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_interval_in_fifths() {
        assert_eq!(ticks(0.0, 1.0, 5), [0.0, 0.2, 0.4, 0.6, 0.8, 1.0]);
    }

    #[test]
    fn integer_steps() {
        assert_eq!(
            ticks(0.0, 10.0, 10),
            [0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0]
        );
        assert_eq!(ticks(0.0, 100.0, 5), [0.0, 20.0, 40.0, 60.0, 80.0, 100.0]);
        assert_eq!(ticks(-10.0, 10.0, 4), [-10.0, -5.0, 0.0, 5.0, 10.0]);
    }

    #[test]
    fn reversed_interval_descends() {
        assert_eq!(ticks(1.0, 0.0, 5), [1.0, 0.8, 0.6, 0.4, 0.2, 0.0]);
    }

    #[test]
    fn degenerate_inputs() {
        assert!(ticks(0.0, 1.0, 0).is_empty());
        assert_eq!(ticks(3.0, 3.0, 10), [3.0]);
        assert!(ticks(f64::NAN, 1.0, 5).is_empty());
    }

    #[test]
    fn ticks_stay_inside_bounds() {
        let t = ticks(0.13, 0.87, 5);
        assert_eq!(t, [0.2, 0.4, 0.6, 0.8]);
    }

    #[test]
    fn increments_and_steps() {
        assert_eq!(tick_increment(0.0, 1.0, 10), -10.0);
        assert_eq!(tick_increment(0.0, 100.0, 10), 10.0);
        assert_eq!(tick_step(0.0, 1.0, 10), 0.1);
        assert_eq!(tick_step(100.0, 0.0, 10), -10.0);
    }

    #[test]
    fn nice_widens_to_steps() {
        assert_eq!(nice(0.201_479_5, 0.996_679_7, 10), Some((0.2, 1.0)));
        assert_eq!(nice(1.1, 10.9, 10), Some((1.0, 11.0)));
        assert_eq!(nice(0.0, 0.0, 10), None);
    }
}
