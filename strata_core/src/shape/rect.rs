// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rectangles.

use kurbo::RoundedRect;

use super::PaintContext;
use crate::surface::Surface;

/// A rectangle covering the node's `width × height` box.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    /// Corner radius; `0.0` draws square corners.
    pub corner_radius: f64,
}

impl Rect {
    /// A square-cornered rectangle.
    #[must_use]
    pub const fn new() -> Self {
        Self { corner_radius: 0.0 }
    }

    /// A rectangle with rounded corners.
    #[must_use]
    pub const fn rounded(corner_radius: f64) -> Self {
        Self { corner_radius }
    }

    pub(crate) fn build_path(&self, surface: &mut dyn Surface, ctx: &PaintContext) {
        let width = ctx.width.unwrap_or(0.0);
        let height = ctx.height.unwrap_or(0.0);
        let rect = kurbo::Rect::new(0.0, 0.0, width, height);
        if self.corner_radius > 0.0 {
            // Radii larger than half a side would overlap.
            let radius = self
                .corner_radius
                .min(rect.width().abs() / 2.0)
                .min(rect.height().abs() / 2.0);
            surface.round_rect(RoundedRect::from_rect(rect, radius));
        } else {
            surface.rect(rect);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DrawCommand, RecordingSurface};
    use crate::transform::Transformer;

    fn ctx(width: Option<f64>, height: Option<f64>) -> PaintContext {
        PaintContext {
            transform: Transformer::IDENTITY,
            opacity: 1.0,
            width,
            height,
        }
    }

    #[test]
    fn missing_size_draws_empty_rect() {
        let mut surface = RecordingSurface::default();
        Rect::new().build_path(&mut surface, &ctx(None, None));
        assert_eq!(surface.commands(), &[DrawCommand::Rect(kurbo::Rect::ZERO)]);
    }

    #[test]
    fn corner_radius_is_clamped() {
        let mut surface = RecordingSurface::default();
        Rect::rounded(50.0).build_path(&mut surface, &ctx(Some(40.0), Some(10.0)));
        let [DrawCommand::RoundRect(rr)] = surface.commands() else {
            panic!("expected one rounded rect, got {:?}", surface.commands());
        };
        assert!((rr.radii().top_left - 5.0).abs() < 1e-12, "radius limited by height");
    }
}
