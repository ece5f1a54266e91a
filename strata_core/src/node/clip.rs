// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Clip regions for containers.

use kurbo::{Rect, RoundedRect};

use crate::surface::Surface;

/// A region, in the container's local coordinates, outside of which nothing
/// in the container's subtree is painted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ClipShape {
    /// An axis-aligned rectangle.
    Rect(Rect),
    /// A rectangle with rounded corners.
    RoundedRect(RoundedRect),
}

impl ClipShape {
    /// Creates a rectangular clip from an origin and size.
    #[must_use]
    pub fn from_xywh(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::Rect(Rect::new(x, y, x + width, y + height))
    }

    /// Emits the clip path and clips to it.
    pub(crate) fn apply(&self, surface: &mut dyn Surface) {
        surface.begin_path();
        match *self {
            Self::Rect(rect) => surface.rect(rect),
            Self::RoundedRect(rect) => surface.round_rect(rect),
        }
        surface.clip();
    }
}
