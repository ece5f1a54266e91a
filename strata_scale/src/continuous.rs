// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The generic continuous scale.
//!
//! A [`ContinuousScale`] is assembled from two factories:
//!
//! - a **normalize factory**, which for two domain stops `a`, `b` returns a
//!   function mapping `a..=b` onto `0..=1`;
//! - an **interpolator factory**, which for two range stops returns a
//!   function mapping `0..=1` back onto them.
//!
//! With two stops the scale is one normalize/interpolate pair. With more,
//! each adjacent pair of stops forms a segment and an input is routed to its
//! segment by [`bisect_right`](crate::bisect::bisect_right), which allows
//! uneven multi-stop gradients. The mapping is built on first use and
//! rebuilt after the domain or range changes.
//!
//! A scale is invertible when it also carries a normalize factory for the
//! range and an interpolator factory for the domain; see
//! [`with_invert`](ContinuousScale::with_invert).

use std::cell::OnceCell;
use std::fmt;
use std::rc::Rc;

use chrono::{DateTime, Utc};

use crate::ScaleError;
use crate::bisect::bisect_right;
use crate::color::Rgba;
use crate::interpolate::{InterpolateRgb, interpolate_date, interpolate_number};

/// Maps a value between two stops onto `0..=1`.
pub type Normalizer<T> = Box<dyn Fn(&T) -> f64>;

/// Builds a [`Normalizer`] for two stops.
pub type NormalizeFactory<T> = Rc<dyn Fn(&T, &T) -> Normalizer<T>>;

/// Maps `0..=1` onto a value between two stops.
pub type Interpolator<T> = Box<dyn Fn(f64) -> T>;

/// Builds an [`Interpolator`] for two stops.
pub type InterpolatorFactory<T> = Rc<dyn Fn(&T, &T) -> Interpolator<T>>;

/// A value-to-value mapping, used for domain transforms and custom clamps.
pub type Mapping<T> = Rc<dyn Fn(&T) -> T>;

/// Returns a function mapping `a..=b` onto `0..=1`.
///
/// A zero-width interval maps everything to `0.5`; a `NaN` width maps
/// everything to `NaN`.
pub fn normalize(a: f64, b: f64) -> impl Fn(f64) -> f64 + Clone {
    let width = b - a;
    move |x| {
        if width.is_nan() {
            f64::NAN
        } else if width == 0.0 {
            0.5
        } else {
            (x - a) / width
        }
    }
}

/// Values that can serve as a scale domain.
pub trait DomainValue: Clone + PartialOrd + 'static {
    /// The value on the number line normalization works in.
    fn to_f64(&self) -> f64;

    /// Interpolates between two domain values.
    fn interpolator(a: &Self, b: &Self) -> Interpolator<Self>;
}

impl DomainValue for f64 {
    fn to_f64(&self) -> f64 {
        *self
    }

    fn interpolator(a: &Self, b: &Self) -> Interpolator<Self> {
        Box::new(interpolate_number(*a, *b))
    }
}

impl DomainValue for DateTime<Utc> {
    fn to_f64(&self) -> f64 {
        self.timestamp_millis() as f64
    }

    fn interpolator(a: &Self, b: &Self) -> Interpolator<Self> {
        Box::new(interpolate_date(*a, *b))
    }
}

/// The [`normalize`] factory over any [`DomainValue`].
#[must_use]
pub fn normalize_factory<T: DomainValue>() -> NormalizeFactory<T> {
    Rc::new(|a: &T, b: &T| {
        let f = normalize(a.to_f64(), b.to_f64());
        Box::new(move |x: &T| f(x.to_f64())) as Normalizer<T>
    })
}

/// The [`DomainValue::interpolator`] factory.
#[must_use]
pub fn domain_interpolator_factory<T: DomainValue>() -> InterpolatorFactory<T> {
    Rc::new(|a: &T, b: &T| T::interpolator(a, b))
}

/// Values that can serve as a scale range.
pub trait RangeValue: Clone + 'static {
    /// The interpolator factory, with an optional gamma for colors.
    fn interpolator_factory(gamma: Option<f64>) -> InterpolatorFactory<Self>;

    /// The normalize factory used to invert the scale, if the range is
    /// numeric.
    fn normalize_factory() -> Option<NormalizeFactory<Self>> {
        None
    }
}

impl RangeValue for f64 {
    fn interpolator_factory(_gamma: Option<f64>) -> InterpolatorFactory<Self> {
        domain_interpolator_factory()
    }

    fn normalize_factory() -> Option<NormalizeFactory<Self>> {
        Some(normalize_factory())
    }
}

/// CSS colors, interpolated in RGB and serialized as `rgba(...)`.
impl RangeValue for String {
    fn interpolator_factory(gamma: Option<f64>) -> InterpolatorFactory<Self> {
        let rgb = InterpolateRgb::gamma(gamma.unwrap_or(1.0));
        Rc::new(move |a: &Self, b: &Self| {
            Box::new(rgb.interpolate_str(a, b)) as Interpolator<Self>
        })
    }
}

impl RangeValue for Rgba {
    fn interpolator_factory(gamma: Option<f64>) -> InterpolatorFactory<Self> {
        let rgb = InterpolateRgb::gamma(gamma.unwrap_or(1.0));
        Rc::new(move |a: &Self, b: &Self| Box::new(rgb.rgba(a, b)) as Interpolator<Self>)
    }
}

/// Input clamping.
#[derive(Clone, Default)]
pub enum Clamp<D> {
    /// Inputs outside the domain extrapolate.
    #[default]
    None,
    /// Inputs are bounded by the first and last domain stops, as they are
    /// at the time of the call.
    Domain,
    /// Inputs pass through a custom function.
    Custom(Mapping<D>),
}

impl<D> fmt::Debug for Clamp<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Domain => f.write_str("Domain"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// A mapping from `X` to `Y` over one or more segments.
struct Piecewise<X, Y> {
    /// Segment starts after the first; empty for a single segment.
    breaks: Vec<X>,
    segments: Vec<(Normalizer<X>, Interpolator<Y>)>,
}

impl<X: Clone + PartialOrd, Y: Clone> Piecewise<X, Y> {
    fn new(
        domain: &[X],
        range: &[Y],
        normalize: &NormalizeFactory<X>,
        interpolate: &InterpolatorFactory<Y>,
    ) -> Self {
        let len = domain.len().min(range.len());
        let mut domain = domain[..len].to_vec();
        let mut range = range[..len].to_vec();
        if domain[len - 1] < domain[0] {
            domain.reverse();
            range.reverse();
        }
        let segments = domain
            .windows(2)
            .zip(range.windows(2))
            .map(|(d, r)| (normalize(&d[0], &d[1]), interpolate(&r[0], &r[1])))
            .collect();
        let breaks = if len > 2 {
            domain[1..len - 1].to_vec()
        } else {
            Vec::new()
        };
        Self { breaks, segments }
    }

    fn eval(&self, x: &X) -> Y {
        let i = bisect_right(&self.breaks, x);
        let (normalize, interpolate) = &self.segments[i];
        interpolate(normalize(x))
    }
}

/// A scale from an ordered domain `D` onto a range `R`.
///
/// ```
/// use strata_scale::linear::scale_linear;
///
/// // Uneven three-stop scale.
/// let scale = scale_linear(vec![0.0, 10.0, 30.0], vec![0.0, 1.0, 2.0]).unwrap();
/// assert_eq!(scale.scale(10.0), 1.0);
/// assert_eq!(scale.scale(20.0), 1.5);
/// ```
pub struct ContinuousScale<D, R> {
    domain: Vec<D>,
    range: Vec<R>,
    normalize: NormalizeFactory<D>,
    interpolate: InterpolatorFactory<R>,
    transform: Option<(Mapping<D>, Mapping<D>)>,
    inverse: Option<(NormalizeFactory<R>, InterpolatorFactory<D>)>,
    clamp: Clamp<D>,
    output: OnceCell<Piecewise<D, R>>,
    input: OnceCell<Piecewise<R, D>>,
}

impl<D: fmt::Debug, R: fmt::Debug> fmt::Debug for ContinuousScale<D, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContinuousScale")
            .field("domain", &self.domain)
            .field("range", &self.range)
            .field("transformed", &self.transform.is_some())
            .field("invertible", &self.inverse.is_some())
            .field("clamp", &self.clamp)
            .finish_non_exhaustive()
    }
}

impl<D: Clone, R: Clone> Clone for ContinuousScale<D, R> {
    fn clone(&self) -> Self {
        Self {
            domain: self.domain.clone(),
            range: self.range.clone(),
            normalize: Rc::clone(&self.normalize),
            interpolate: Rc::clone(&self.interpolate),
            transform: self.transform.clone(),
            inverse: self.inverse.clone(),
            clamp: self.clamp.clone(),
            output: OnceCell::new(),
            input: OnceCell::new(),
        }
    }
}

impl<D: Clone + PartialOrd, R: Clone> ContinuousScale<D, R> {
    /// Creates a scale from parallel domain and range stops.
    ///
    /// # Errors
    ///
    /// Fails if either side has fewer than two stops or their lengths
    /// differ.
    pub fn new(
        domain: Vec<D>,
        range: Vec<R>,
        normalize: NormalizeFactory<D>,
        interpolate: InterpolatorFactory<R>,
    ) -> Result<Self, ScaleError> {
        ScaleError::check(domain.len(), range.len())?;
        Ok(Self {
            domain,
            range,
            normalize,
            interpolate,
            transform: None,
            inverse: None,
            clamp: Clamp::None,
            output: OnceCell::new(),
            input: OnceCell::new(),
        })
    }

    /// Applies `forward` to the domain and to every input, and `inverse` to
    /// every inverted output.
    #[must_use]
    pub fn with_transform(mut self, forward: Mapping<D>, inverse: Mapping<D>) -> Self {
        self.transform = Some((forward, inverse));
        self.invalidate();
        self
    }

    /// Makes the scale invertible.
    #[must_use]
    pub fn with_invert(
        mut self,
        range_normalize: NormalizeFactory<R>,
        domain_interpolate: InterpolatorFactory<D>,
    ) -> Self {
        self.inverse = Some((range_normalize, domain_interpolate));
        self.invalidate();
        self
    }

    /// Maps a domain value onto the range.
    pub fn scale(&self, x: D) -> R {
        let x = self.forward(self.clamped(x));
        self.output
            .get_or_init(|| {
                Piecewise::new(
                    &self.transformed_domain(),
                    &self.range,
                    &self.normalize,
                    &self.interpolate,
                )
            })
            .eval(&x)
    }

    /// Maps a range value back onto the domain.
    ///
    /// Returns `None` if the scale is not invertible.
    pub fn invert(&self, y: R) -> Option<D>
    where
        R: PartialOrd,
    {
        let (range_normalize, domain_interpolate) = self.inverse.as_ref()?;
        let x = self
            .input
            .get_or_init(|| {
                Piecewise::new(
                    &self.range,
                    &self.transformed_domain(),
                    range_normalize,
                    domain_interpolate,
                )
            })
            .eval(&y);
        Some(self.clamped(self.backward(x)))
    }

    /// Returns whether [`invert`](Self::invert) is available.
    #[must_use]
    pub fn is_invertible(&self) -> bool {
        self.inverse.is_some()
    }

    /// The domain stops.
    #[must_use]
    pub fn domain(&self) -> &[D] {
        &self.domain
    }

    /// Replaces the domain stops.
    ///
    /// # Errors
    ///
    /// As [`new`](Self::new); the scale is unchanged on error.
    pub fn set_domain(&mut self, domain: Vec<D>) -> Result<&mut Self, ScaleError> {
        ScaleError::check(domain.len(), self.range.len())?;
        self.replace_domain(domain);
        Ok(self)
    }

    /// The range stops.
    #[must_use]
    pub fn range(&self) -> &[R] {
        &self.range
    }

    /// Replaces the range stops.
    ///
    /// # Errors
    ///
    /// As [`new`](Self::new); the scale is unchanged on error.
    pub fn set_range(&mut self, range: Vec<R>) -> Result<&mut Self, ScaleError> {
        ScaleError::check(self.domain.len(), range.len())?;
        self.range = range;
        self.invalidate();
        Ok(self)
    }

    /// Sets input clamping.
    pub fn clamp(&mut self, clamp: Clamp<D>) -> &mut Self {
        self.clamp = clamp;
        self
    }

    /// Returns the current clamp mode.
    #[must_use]
    pub fn clamp_mode(&self) -> &Clamp<D> {
        &self.clamp
    }

    /// Returns an independent copy with the same stops, factories and
    /// clamping.
    #[must_use]
    pub fn copy(&self) -> Self {
        self.clone()
    }

    /// Replaces the domain without validation. The length must not change.
    pub(crate) fn replace_domain(&mut self, domain: Vec<D>) {
        debug_assert_eq!(domain.len(), self.domain.len(), "domain length changed");
        self.domain = domain;
        self.invalidate();
    }

    fn invalidate(&mut self) {
        self.output = OnceCell::new();
        self.input = OnceCell::new();
    }

    fn clamped(&self, x: D) -> D {
        match &self.clamp {
            Clamp::None => x,
            Clamp::Custom(f) => f(&x),
            Clamp::Domain => {
                let (mut lo, mut hi) = (&self.domain[0], &self.domain[self.domain.len() - 1]);
                if hi < lo {
                    core::mem::swap(&mut lo, &mut hi);
                }
                if x < *lo {
                    lo.clone()
                } else if x > *hi {
                    hi.clone()
                } else {
                    x
                }
            }
        }
    }

    fn forward(&self, x: D) -> D {
        match &self.transform {
            Some((forward, _)) => forward(&x),
            None => x,
        }
    }

    fn backward(&self, x: D) -> D {
        match &self.transform {
            Some((_, inverse)) => inverse(&x),
            None => x,
        }
    }

    fn transformed_domain(&self) -> Vec<D> {
        match &self.transform {
            Some((forward, _)) => self.domain.iter().map(forward.as_ref()).collect(),
            None => self.domain.clone(),
        }
    }
}

impl<D: DomainValue, R: RangeValue> ContinuousScale<D, R> {
    /// Creates a scale with the standard factories for `D` and `R`,
    /// invertible when `R` is numeric.
    ///
    /// # Errors
    ///
    /// As [`new`](Self::new).
    pub fn standard(
        domain: Vec<D>,
        range: Vec<R>,
        gamma: Option<f64>,
    ) -> Result<Self, ScaleError> {
        let scale = Self::new(
            domain,
            range,
            normalize_factory(),
            R::interpolator_factory(gamma),
        )?;
        Ok(match R::normalize_factory() {
            Some(range_normalize) => {
                scale.with_invert(range_normalize, domain_interpolator_factory())
            }
            None => scale,
        })
    }
}

/// Generates the domain and range accessors of a scale wrapping a
/// `ContinuousScale` in a field named `scale`.
macro_rules! forward_continuous {
    ($domain:ty) => {
        /// Maps a domain value onto the range.
        pub fn scale(&self, x: $domain) -> R {
            self.scale.scale(x)
        }

        /// Maps a range value back onto the domain, if the range is numeric.
        pub fn invert(&self, y: R) -> Option<$domain>
        where
            R: PartialOrd,
        {
            self.scale.invert(y)
        }

        /// The domain stops.
        #[must_use]
        pub fn domain(&self) -> &[$domain] {
            self.scale.domain()
        }

        /// Replaces the domain stops.
        ///
        /// # Errors
        ///
        /// Fails on fewer than two stops or a length mismatch with the range.
        pub fn set_domain(
            &mut self,
            domain: Vec<$domain>,
        ) -> Result<&mut Self, $crate::ScaleError> {
            self.scale.set_domain(domain)?;
            Ok(self)
        }

        /// The range stops.
        #[must_use]
        pub fn range(&self) -> &[R] {
            self.scale.range()
        }

        /// Replaces the range stops.
        ///
        /// # Errors
        ///
        /// Fails on fewer than two stops or a length mismatch with the domain.
        pub fn set_range(&mut self, range: Vec<R>) -> Result<&mut Self, $crate::ScaleError> {
            self.scale.set_range(range)?;
            Ok(self)
        }

        /// Sets input clamping.
        pub fn clamp(&mut self, clamp: $crate::Clamp<$domain>) -> &mut Self {
            self.scale.clamp(clamp);
            self
        }

        /// The underlying continuous scale.
        #[must_use]
        pub fn as_continuous(&self) -> &$crate::ContinuousScale<$domain, R> {
            &self.scale
        }
    };
}

pub(crate) use forward_continuous;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linear::scale_linear;

    #[test]
    fn two_stop_forward_and_inverse() {
        let s = scale_linear(vec![0.0, 100.0], vec![0.0, 1.0]).unwrap();
        assert_eq!(s.scale(50.0), 0.5);
        assert_eq!(s.invert(0.5), Some(50.0));
        assert_eq!(s.scale(150.0), 1.5, "extrapolates without clamping");
    }

    #[test]
    fn piecewise_routes_by_segment() {
        let s = scale_linear(vec![0.0, 10.0, 30.0], vec![0.0, 1.0, 2.0]).unwrap();
        assert_eq!(s.scale(20.0), 1.5);
        assert_eq!(s.scale(10.0), 1.0);
        assert_eq!(s.scale(5.0), 0.5);
        assert_eq!(s.invert(1.5), Some(20.0));
    }

    #[test]
    fn descending_domains() {
        let two = scale_linear(vec![100.0, 0.0], vec![0.0, 1.0]).unwrap();
        assert_eq!(two.scale(25.0), 0.75);
        let three = scale_linear(vec![30.0, 10.0, 0.0], vec![2.0, 1.0, 0.0]).unwrap();
        assert_eq!(three.scale(20.0), 1.5);
    }

    #[test]
    fn clamp_modes() {
        let mut s = scale_linear(vec![0.0, 10.0], vec![0.0, 100.0]).unwrap();
        s.clamp(Clamp::Domain);
        assert_eq!(s.scale(-5.0), 0.0);
        assert_eq!(s.scale(50.0), 100.0);
        assert_eq!(s.invert(500.0), Some(10.0));

        // Domain clamping follows later domain changes.
        s.set_domain(vec![0.0, 20.0]).unwrap();
        assert_eq!(s.scale(50.0), 100.0);
        assert_eq!(s.scale(15.0), 75.0);

        s.clamp(Clamp::Custom(Rc::new(|x: &f64| x.max(5.0))));
        assert_eq!(s.scale(0.0), 25.0);
        s.clamp(Clamp::None);
        assert_eq!(s.scale(-20.0), -100.0);
    }

    #[test]
    fn setters_rebuild_the_mapping() {
        let mut s = scale_linear(vec![0.0, 1.0], vec![0.0, 10.0]).unwrap();
        assert_eq!(s.scale(0.5), 5.0);
        s.set_range(vec![0.0, 100.0]).unwrap();
        assert_eq!(s.scale(0.5), 50.0);
        assert_eq!(s.invert(50.0), Some(0.5));
    }

    #[test]
    fn invalid_stops_are_rejected() {
        assert_eq!(
            scale_linear(vec![0.0], vec![0.0, 1.0]).unwrap_err(),
            ScaleError::DomainTooShort(1)
        );
        assert_eq!(
            scale_linear(vec![0.0, 1.0, 2.0], vec![0.0, 1.0]).unwrap_err(),
            ScaleError::LengthMismatch { domain: 3, range: 2 }
        );
        let mut s = scale_linear(vec![0.0, 1.0], vec![0.0, 1.0]).unwrap();
        assert!(s.set_range(vec![1.0]).is_err());
        assert_eq!(s.range(), [0.0, 1.0], "unchanged on error");
    }

    #[test]
    fn zero_width_domain_maps_to_middle() {
        let s = scale_linear(vec![5.0, 5.0], vec![0.0, 10.0]).unwrap();
        assert_eq!(s.scale(5.0), 5.0);
        assert_eq!(s.scale(99.0), 5.0);
    }

    #[test]
    fn color_ranges_do_not_invert() {
        let range = vec![String::from("black"), String::from("white")];
        let s = scale_linear(vec![0.0, 1.0], range).unwrap();
        assert_eq!(s.scale(0.5), "rgba(128, 128, 128, 1)");
        assert!(!s.is_invertible());
        assert_eq!(s.invert(String::from("red")), None);
    }

    #[test]
    fn copies_are_independent() {
        let mut s = scale_linear(vec![0.0, 10.0], vec![0.0, 1.0]).unwrap();
        s.clamp(Clamp::Domain);
        let mut c = s.copy();
        c.set_domain(vec![0.0, 20.0]).unwrap();
        assert_eq!(s.scale(10.0), 1.0);
        assert_eq!(c.scale(10.0), 0.5);
        assert_eq!(c.scale(40.0), 1.0, "clamping is copied");
    }

    #[test]
    fn custom_factories() {
        let step: InterpolatorFactory<f64> = Rc::new(|a: &f64, b: &f64| {
            let (a, b) = (*a, *b);
            Box::new(move |t: f64| if t < 0.5 { a } else { b }) as Interpolator<f64>
        });
        let s = ContinuousScale::new(vec![0.0, 1.0], vec![0.0, 1.0], normalize_factory(), step)
            .unwrap();
        assert_eq!(s.scale(0.4), 0.0);
        assert_eq!(s.scale(0.6), 1.0);
        assert_eq!(s.invert(0.5), None);
    }
}
