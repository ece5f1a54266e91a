// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Time scales, calendar intervals, time ticks and time formatting.
//!
//! Instants are [`DateTime<Utc>`](chrono::DateTime). Where day, month and
//! year boundaries fall depends on a [`Calendar`]: UTC, the host's local
//! zone, or a fixed offset.

mod calendar;
mod format;
mod interval;
mod scale;
mod ticks;

pub use calendar::Calendar;
pub use format::{TickFormat, TimeFormat, TimeLocale};
pub use interval::{TimeInterval, TimeUnit};
pub use scale::{TimeScale, scale_time, scale_time_with_gamma};
pub use ticks::{time_tick_interval, time_ticks, time_ticks_every};
