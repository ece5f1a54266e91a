// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scales, ticks and interpolators.
//!
//! A scale maps an ordered *domain* onto a *range*:
//!
//! ```text
//!   x ──► clamp ──► transform ──► segment lookup ──► normalize ──► interpolate ──► y
//!                                 (bisect_right)      (0..=1)
//! ```
//!
//! **[`continuous`]**: The generic [`ContinuousScale`], built from a
//! normalize factory and an interpolator factory. Domains and ranges with more
//! than two stops map piecewise.
//!
//! **[`linear`]**, **[`pow`]**, **[`time`]**: Numeric, power and calendar
//! scales with tick generation and domain rounding (`nice`).
//!
//! **[`ticks`]**: Evenly spaced 1/2/5 × 10ⁿ tick values.
//!
//! **[`interpolate`]**: Number, string, date and color interpolators.
//!
//! **[`color`]**: The [`Rgba`](color::Rgba) color type and CSS color parsing.
//!
//! **[`bisect`]**: Binary search over sorted slices.
//!
//! # Example
//!
//! ```
//! use strata_scale::linear::scale_linear;
//!
//! let scale = scale_linear(vec![0.0, 100.0], vec![0.0, 1.0]).unwrap();
//! assert_eq!(scale.scale(50.0), 0.5);
//! assert_eq!(scale.invert(0.5), Some(50.0));
//! ```

pub mod bisect;
pub mod color;
pub mod continuous;
pub mod interpolate;
pub mod linear;
pub mod pow;
pub mod ticks;
pub mod time;

mod error;

pub use continuous::{Clamp, ContinuousScale};
pub use error::ScaleError;
