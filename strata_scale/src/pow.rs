// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Power scales.
//!
//! A power scale applies `sign(x) * |x|^k` to the domain and to every input
//! before mapping linearly, so it is a linear scale in transformed space.
//! Negative inputs mirror positive ones.

use std::rc::Rc;

use crate::continuous::{ContinuousScale, Mapping, RangeValue, forward_continuous};
use crate::ScaleError;

/// A power scale over `f64`.
#[derive(Clone, Debug)]
pub struct PowScale<R> {
    scale: ContinuousScale<f64, R>,
    exponent: f64,
    gamma: Option<f64>,
}

fn signed_pow(exponent: f64) -> Mapping<f64> {
    Rc::new(move |x: &f64| {
        if *x < 0.0 {
            -(-x).powf(exponent)
        } else {
            x.powf(exponent)
        }
    })
}

fn transforms(exponent: f64) -> Option<(Mapping<f64>, Mapping<f64>)> {
    if exponent == 1.0 {
        None
    } else if exponent == 0.5 {
        Some((
            Rc::new(|x: &f64| if *x < 0.0 { -(-x).sqrt() } else { x.sqrt() }),
            Rc::new(|x: &f64| if *x < 0.0 { -x * x } else { x * x }),
        ))
    } else {
        Some((signed_pow(exponent), signed_pow(1.0 / exponent)))
    }
}

/// Creates a power scale with the given exponent.
///
/// # Errors
///
/// Fails if either side has fewer than two stops or their lengths differ.
pub fn pow_scale<R: RangeValue>(
    domain: Vec<f64>,
    range: Vec<R>,
    exponent: f64,
) -> Result<PowScale<R>, ScaleError> {
    PowScale::build(domain, range, exponent, None)
}

/// Creates a power scale whose color range interpolates through a gamma
/// curve.
///
/// # Errors
///
/// As [`pow_scale`].
pub fn pow_scale_with_gamma<R: RangeValue>(
    domain: Vec<f64>,
    range: Vec<R>,
    exponent: f64,
    gamma: f64,
) -> Result<PowScale<R>, ScaleError> {
    PowScale::build(domain, range, exponent, Some(gamma))
}

/// Creates a square-root scale.
///
/// # Errors
///
/// As [`pow_scale`].
pub fn sqrt_scale<R: RangeValue>(
    domain: Vec<f64>,
    range: Vec<R>,
) -> Result<PowScale<R>, ScaleError> {
    pow_scale(domain, range, 0.5)
}

impl<R: RangeValue> PowScale<R> {
    fn build(
        domain: Vec<f64>,
        range: Vec<R>,
        exponent: f64,
        gamma: Option<f64>,
    ) -> Result<Self, ScaleError> {
        let mut scale = ContinuousScale::standard(domain, range, gamma)?;
        if let Some((forward, inverse)) = transforms(exponent) {
            scale = scale.with_transform(forward, inverse);
        }
        Ok(Self {
            scale,
            exponent,
            gamma,
        })
    }

    /// The exponent.
    #[must_use]
    pub fn exponent(&self) -> f64 {
        self.exponent
    }

    /// Rebuilds the scale with a new exponent, keeping stops and clamping.
    pub fn set_exponent(&mut self, exponent: f64) -> &mut Self {
        let mut scale = ContinuousScale::standard(
            self.scale.domain().to_vec(),
            self.scale.range().to_vec(),
            self.gamma,
        )
        .unwrap_or_else(|_| self.scale.clone());
        if let Some((forward, inverse)) = transforms(exponent) {
            scale = scale.with_transform(forward, inverse);
        }
        scale.clamp(self.scale.clamp_mode().clone());
        self.scale = scale;
        self.exponent = exponent;
        self
    }

    forward_continuous!(f64);

    /// Returns about `count` nice tick values spanning the domain.
    ///
    /// Ticks are spaced evenly in the untransformed domain.
    #[must_use]
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        self.scale.ticks(count)
    }

    /// Extends the outer domain stops to multiples of the tick step.
    pub fn nice(&mut self, count: usize) -> &mut Self {
        self.scale.nice(count);
        self
    }

    /// Returns an independent copy.
    #[must_use]
    pub fn copy(&self) -> Self {
        self.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Clamp;

    const EPS: f64 = 1e-12;

    #[test]
    fn square_scale() {
        let s = pow_scale(vec![0.0, 10.0], vec![0.0, 100.0], 2.0).unwrap();
        assert!((s.scale(5.0) - 25.0).abs() < EPS);
        let back = s.invert(25.0).unwrap();
        assert!((back - 5.0).abs() < EPS, "{back}");
    }

    #[test]
    fn sqrt_scale_mirrors_negatives() {
        let s = sqrt_scale(vec![-100.0, 100.0], vec![-10.0, 10.0]).unwrap();
        assert!((s.scale(25.0) - 5.0).abs() < EPS);
        assert!((s.scale(-25.0) + 5.0).abs() < EPS);
        assert!((s.invert(-5.0).unwrap() + 25.0).abs() < EPS);
    }

    #[test]
    fn exponent_one_is_linear() {
        let s = pow_scale(vec![0.0, 4.0], vec![0.0, 1.0], 1.0).unwrap();
        assert_eq!(s.scale(1.0), 0.25);
    }

    #[test]
    fn set_exponent_keeps_stops_and_clamp() {
        let mut s = pow_scale(vec![0.0, 2.0], vec![0.0, 8.0], 1.0).unwrap();
        s.clamp(Clamp::Domain);
        s.set_exponent(3.0);
        assert_eq!(s.exponent(), 3.0);
        assert!((s.scale(1.0) - 1.0).abs() < EPS);
        assert!((s.scale(5.0) - 8.0).abs() < EPS, "still clamped");
    }

    #[test]
    fn ticks_and_nice_use_the_raw_domain() {
        let mut s = pow_scale(vec![0.0, 0.96], vec![0.0, 1.0], 2.0).unwrap();
        s.nice(5);
        assert_eq!(s.domain(), [0.0, 1.0]);
        assert_eq!(s.ticks(5), [0.0, 0.2, 0.4, 0.6, 0.8, 1.0]);
    }
}
