// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Linear scales over numeric domains.

use crate::continuous::{ContinuousScale, RangeValue};
use crate::{ScaleError, ticks};

/// A continuous scale over `f64`.
pub type LinearScale<R> = ContinuousScale<f64, R>;

/// Creates a linear scale.
///
/// Numeric ranges interpolate linearly and are invertible; color ranges
/// (`String` or [`Rgba`](crate::color::Rgba)) interpolate in RGB.
///
/// # Errors
///
/// Fails if either side has fewer than two stops or their lengths differ.
pub fn scale_linear<R: RangeValue>(
    domain: Vec<f64>,
    range: Vec<R>,
) -> Result<LinearScale<R>, ScaleError> {
    ContinuousScale::standard(domain, range, None)
}

/// Creates a linear scale whose color range interpolates through a gamma
/// curve. The gamma has no effect on numeric ranges.
///
/// # Errors
///
/// As [`scale_linear`].
pub fn scale_linear_with_gamma<R: RangeValue>(
    domain: Vec<f64>,
    range: Vec<R>,
    gamma: f64,
) -> Result<LinearScale<R>, ScaleError> {
    ContinuousScale::standard(domain, range, Some(gamma))
}

impl<R: Clone> ContinuousScale<f64, R> {
    /// Returns about `count` nice tick values spanning the domain, in domain
    /// order.
    #[must_use]
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let domain = self.domain();
        ticks::ticks(domain[0], domain[domain.len() - 1], count)
    }

    /// Extends the first and last domain stops outward to multiples of the
    /// tick step for `count` ticks.
    ///
    /// Inner stops are untouched. A domain for which no step can be found
    /// (a zero-width or non-finite domain) is left as it is.
    pub fn nice(&mut self, count: usize) -> &mut Self {
        let mut domain = self.domain().to_vec();
        let last = domain.len() - 1;
        let (i0, i1) = if domain[last] < domain[0] {
            (last, 0)
        } else {
            (0, last)
        };
        if let Some((start, stop)) = ticks::nice(domain[i0], domain[i1], count) {
            domain[i0] = start;
            domain[i1] = stop;
            self.replace_domain(domain);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba;

    #[test]
    fn ticks_follow_the_domain() {
        let s = scale_linear(vec![0.0, 1.0], vec![0.0, 100.0]).unwrap();
        assert_eq!(s.ticks(5), [0.0, 0.2, 0.4, 0.6, 0.8, 1.0]);
        let r = scale_linear(vec![1.0, 0.0], vec![0.0, 100.0]).unwrap();
        assert_eq!(r.ticks(5), [1.0, 0.8, 0.6, 0.4, 0.2, 0.0]);
    }

    #[test]
    fn nice_rounds_outer_stops() {
        let mut s = scale_linear(vec![0.201_479_5, 0.996_679_7], vec![0.0, 1.0]).unwrap();
        s.nice(10);
        assert_eq!(s.domain(), [0.2, 1.0]);

        let mut d = scale_linear(vec![10.9, 5.0, 1.1], vec![0.0, 1.0, 2.0]).unwrap();
        d.nice(10);
        assert_eq!(d.domain(), [11.0, 5.0, 1.0], "descending, inner stop kept");
    }

    #[test]
    fn nice_leaves_degenerate_domains() {
        let mut s = scale_linear(vec![3.0, 3.0], vec![0.0, 1.0]).unwrap();
        s.nice(10);
        assert_eq!(s.domain(), [3.0, 3.0]);
    }

    #[test]
    fn nice_rebuilds_the_mapping() {
        let mut s = scale_linear(vec![0.0, 9.5], vec![0.0, 1.0]).unwrap();
        assert_eq!(s.scale(9.5), 1.0);
        s.nice(10);
        assert_eq!(s.domain(), [0.0, 10.0]);
        assert_eq!(s.scale(5.0), 0.5);
    }

    #[test]
    fn gamma_color_ranges() {
        let black = Rgba::BLACK;
        let white = Rgba::rgb(255.0, 255.0, 255.0);
        let plain = scale_linear(vec![0.0, 1.0], vec![black, white]).unwrap();
        let bright = scale_linear_with_gamma(vec![0.0, 1.0], vec![black, white], 2.2).unwrap();
        assert_eq!(plain.scale(0.5), Rgba::rgb(128.0, 128.0, 128.0));
        assert!(bright.scale(0.5).r > 128.0);
    }

    #[test]
    fn multi_stop_color_gradient() {
        let s = scale_linear(
            vec![0.0, 0.2, 1.0],
            vec!["red".to_owned(), "white".to_owned(), "blue".to_owned()],
        )
        .unwrap();
        assert_eq!(s.scale(0.1), "rgba(255, 128, 128, 1)");
        assert_eq!(s.scale(0.6), "rgba(128, 128, 255, 1)");
    }
}
