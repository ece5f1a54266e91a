// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Web backend for strata.
//!
//! This crate connects a [`Stage`](strata_core::node::Stage) to the browser:
//!
//! - [`CanvasSurface`]: a [`Surface`](strata_core::surface::Surface) over a
//!   `<canvas>` element's 2D context
//! - [`RafScheduler`]: a [`FrameScheduler`](strata_core::frame::FrameScheduler)
//!   backed by `requestAnimationFrame`
//! - [`WebStage`]: mounts a stage into the DOM, one canvas per layer

#![no_std]

extern crate alloc;

mod canvas;
mod mount;
mod raf;

pub use canvas::CanvasSurface;
pub use mount::{MountError, MountTarget, WebStage};
pub use raf::RafScheduler;

/// Returns the current host time from `performance.now()`, in microseconds.
#[must_use]
pub fn now() -> u64 {
    ms_to_us(raf::performance_now())
}

/// Converts a `DOMHighResTimeStamp` to whole microseconds.
pub(crate) fn ms_to_us(ms: f64) -> u64 {
    #[expect(
        clippy::cast_possible_truncation,
        reason = "host timestamps are small positive f64; µs fits in u64"
    )]
    let us = (ms.max(0.0) * 1000.0) as u64;
    us
}

/// Converts a CSS pixel length to a canvas backing-store dimension.
pub(crate) fn px(length: f64) -> u32 {
    #[expect(
        clippy::cast_possible_truncation,
        reason = "canvas dimensions are clamped to the u32 range first"
    )]
    let px = length.round().clamp(0.0, f64::from(u32::MAX)) as u32;
    px
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamps_convert_to_microseconds() {
        assert_eq!(ms_to_us(16.5), 16_500);
        assert_eq!(ms_to_us(-3.0), 0);
    }

    #[test]
    fn pixel_lengths_round_and_clamp() {
        assert_eq!(px(299.6), 300);
        assert_eq!(px(-4.0), 0);
        assert_eq!(px(f64::INFINITY), u32::MAX);
    }
}
