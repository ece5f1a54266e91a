// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! 2-D affine transform used to position nodes.
//!
//! [`Transformer`] stores the six coefficients `a b c d e f` in the same order
//! as the canvas `setTransform(a, b, c, d, e, f)` call and as
//! [`kurbo::Affine::as_coeffs`], so a point maps as
//!
//! ```text
//!   x' = a·x + c·y + e
//!   y' = b·x + d·y + f
//! ```
//!
//! Mutating operations update the matrix in place and return `&mut Self` for
//! chaining. Use [`copy`](Transformer::copy) when an independent value is
//! needed before composing.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Affine, Point};

/// A 2×3 affine matrix.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transformer {
    /// Horizontal scaling / first column of the linear part.
    pub a: f64,
    /// Vertical skewing.
    pub b: f64,
    /// Horizontal skewing.
    pub c: f64,
    /// Vertical scaling / second column of the linear part.
    pub d: f64,
    /// Horizontal translation.
    pub e: f64,
    /// Vertical translation.
    pub f: f64,
}

impl Default for Transformer {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transformer {
    /// The identity transform.
    pub const IDENTITY: Self = Self {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    /// Creates the identity transform.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self::IDENTITY
    }

    /// Creates a transform from its six coefficients.
    #[inline]
    #[must_use]
    pub const fn from_values(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    /// Returns `[a, b, c, d, e, f]`.
    #[inline]
    #[must_use]
    pub const fn matrix_values(&self) -> [f64; 6] {
        [self.a, self.b, self.c, self.d, self.e, self.f]
    }

    /// Returns an independent copy of this transform.
    #[inline]
    #[must_use]
    pub const fn copy(&self) -> Self {
        *self
    }

    /// Resets to the identity.
    pub fn reset(&mut self) -> &mut Self {
        *self = Self::IDENTITY;
        self
    }

    /// Adds `(tx, ty)` to the translation.
    pub fn translate(&mut self, tx: f64, ty: f64) -> &mut Self {
        self.e += tx;
        self.f += ty;
        self
    }

    /// Adds `tx` to the horizontal translation.
    pub fn translate_x(&mut self, tx: f64) -> &mut Self {
        self.e += tx;
        self
    }

    /// Adds `ty` to the vertical translation.
    pub fn translate_y(&mut self, ty: f64) -> &mut Self {
        self.f += ty;
        self
    }

    /// Rotates the linear part by `radians`.
    ///
    /// Translation is left untouched.
    pub fn rotate(&mut self, radians: f64) -> &mut Self {
        let (sin, cos) = radians.sin_cos();
        let Self { a, b, c, d, .. } = *self;
        self.a = a * cos - b * sin;
        self.b = a * sin + b * cos;
        self.c = c * cos - d * sin;
        self.d = c * sin + d * cos;
        self
    }

    /// Multiplies `a` by `sx` and `d` by `sy`.
    ///
    /// `b` and `c` are not affected, so scaling is meant to be applied before
    /// any rotation or skew.
    pub fn scale(&mut self, sx: f64, sy: f64) -> &mut Self {
        self.a *= sx;
        self.d *= sy;
        self
    }

    /// Applies a shear with horizontal factor `sx` and vertical factor `sy`.
    pub fn skew(&mut self, sx: f64, sy: f64) -> &mut Self {
        let Self { a, b, c, d, .. } = *self;
        self.a = a + b * sy;
        self.b = a * sx + b;
        self.c = c + d * sy;
        self.d = c * sx + d;
        self
    }

    /// Composes `other` after `self`, in place.
    ///
    /// The result maps a point through `self` first and then through
    /// `other`, including the translation terms. A node's absolute transform
    /// is `local.multiply(&parent_absolute)`.
    pub fn multiply(&mut self, other: &Self) -> &mut Self {
        *self = Self::from(Affine::from(*other) * Affine::from(*self));
        self
    }

    /// Maps a point through this transform.
    #[inline]
    #[must_use]
    pub fn apply(&self, p: Point) -> Point {
        Point::new(
            self.a * p.x + self.c * p.y + self.e,
            self.b * p.x + self.d * p.y + self.f,
        )
    }

    /// Returns the inverse transform, or `None` if the matrix is singular.
    #[must_use]
    pub fn invert(&self) -> Option<Self> {
        let det = self.a * self.d - self.b * self.c;
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        Some(Self::from(Affine::from(*self).inverse()))
    }

    /// Returns `true` if this is exactly the identity.
    #[inline]
    #[must_use]
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }
}

impl From<Transformer> for Affine {
    #[inline]
    fn from(t: Transformer) -> Self {
        Self::new(t.matrix_values())
    }
}

impl From<Affine> for Transformer {
    #[inline]
    fn from(affine: Affine) -> Self {
        let [a, b, c, d, e, f] = affine.as_coeffs();
        Self { a, b, c, d, e, f }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(t: &Transformer, expected: [f64; 6]) -> bool {
        let eps = 1e-9;
        t.matrix_values()
            .iter()
            .zip(expected)
            .all(|(x, y)| (x - y).abs() < eps)
    }

    #[test]
    fn identity_on_construction() {
        let t = Transformer::new();
        assert_eq!(t.matrix_values(), [1.0, 0.0, 0.0, 1.0, 0.0, 0.0]);
        assert!(t.is_identity());
    }

    #[test]
    fn translate_accumulates() {
        let mut t = Transformer::new();
        t.translate(10.0, 5.0).translate_x(1.0).translate_y(-2.0);
        assert_eq!(t.e, 11.0);
        assert_eq!(t.f, 3.0);
    }

    #[test]
    fn rotate_quarter_turn() {
        let mut t = Transformer::new();
        t.rotate(core::f64::consts::FRAC_PI_2);
        assert!(approx(&t, [0.0, 1.0, -1.0, 0.0, 0.0, 0.0]), "got {t:?}");
        let p = t.apply(Point::new(1.0, 0.0));
        assert!((p.x - 0.0).abs() < 1e-9 && (p.y - 1.0).abs() < 1e-9);
    }

    #[test]
    fn scale_touches_diagonal_only() {
        let mut t = Transformer::from_values(1.0, 2.0, 3.0, 4.0, 5.0, 6.0);
        t.scale(2.0, 3.0);
        assert_eq!(t.matrix_values(), [2.0, 2.0, 3.0, 12.0, 5.0, 6.0]);
    }

    #[test]
    fn skew_shears_linear_part() {
        let mut t = Transformer::new();
        t.skew(0.5, 0.25);
        assert_eq!(t.matrix_values(), [1.0, 0.5, 0.25, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn multiply_translations_sum() {
        let mut child = Transformer::new();
        child.translate(3.0, 4.0);
        let mut parent = Transformer::new();
        parent.translate(10.0, 20.0);
        child.multiply(&parent);
        assert_eq!(child.e, 13.0);
        assert_eq!(child.f, 24.0);
    }

    #[test]
    fn multiply_applies_self_then_other() {
        let mut local = Transformer::new();
        local.translate(1.0, 0.0);
        let mut parent = Transformer::new();
        parent.rotate(core::f64::consts::FRAC_PI_2);
        local.multiply(&parent);
        // (0, 0) → (1, 0) → rotated to (0, 1).
        let p = local.apply(Point::ORIGIN);
        assert!((p.x - 0.0).abs() < 1e-9, "x = {}", p.x);
        assert!((p.y - 1.0).abs() < 1e-9, "y = {}", p.y);
    }

    #[test]
    fn copy_is_independent() {
        let mut a = Transformer::new();
        let mut b = a.copy();
        b.translate(5.0, 5.0);
        assert!(a.is_identity());
        a.reset();
        assert!(!b.is_identity());
    }

    #[test]
    fn invert_round_trips() {
        let mut t = Transformer::new();
        t.scale(2.0, 4.0).rotate(0.3).translate(7.0, -3.0);
        let inv = t.invert().expect("invertible");
        let p = inv.apply(t.apply(Point::new(3.0, 9.0)));
        assert!((p.x - 3.0).abs() < 1e-9 && (p.y - 9.0).abs() < 1e-9);
        assert!(
            Transformer::from_values(0.0, 0.0, 0.0, 0.0, 1.0, 1.0)
                .invert()
                .is_none()
        );
    }

    #[test]
    fn kurbo_round_trip() {
        let t = Transformer::from_values(1.0, 2.0, 3.0, 4.0, 5.0, 6.0);
        let affine: Affine = t.into();
        assert_eq!(Transformer::from(affine), t);
    }
}
