// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Observable values and cached derived values.
//!
//! A [`Runtime`] owns one dependency graph. [`Observable`] cells are the
//! leaves; [`Computed`] values are derived from any mix of observables and
//! other computed values. Reading a value while a computed value evaluates
//! records an edge, so the graph is discovered rather than declared.
//!
//! ```text
//!   width ──┐
//!           ├──► area ──► label
//!   height ─┘
//! ```
//!
//! Writing `width` marks `area` and `label` stale in one eager pass over the
//! graph. Neither recomputes until it is read, and each recomputes at most
//! once no matter how many writes happened in between.

mod computed;
mod observable;
mod runtime;

pub use computed::Computed;
pub use observable::{Observable, Subscription};
pub use runtime::Runtime;
