// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Retained-mode 2D scene graph with reactive invalidation.
//!
//! `strata_core` keeps a tree of drawable nodes, recomputes what changed on
//! the next animation frame, and replays the tree onto 2D drawing surfaces.
//! It is `no_std` compatible (with `alloc`) and stores nodes in
//! struct-of-arrays form behind generational handles.
//!
//! # Architecture
//!
//! ```text
//!   NodeMut / Stage::set ──► mark dirty channel ──► Stage::batch_draw
//!                                                        │
//!                               FrameScheduler::request_frame (once)
//!                                                        │
//!   host frame ──► Stage::run_frame(FrameTick)           ▼
//!                        │
//!                        ├─► NodeStore::evaluate ──► SceneChanges
//!                        │
//!                        └─► per pending layer: clear ──► draw subtree
//!                                                             │
//!                                                             ▼
//!                                                      dyn Surface
//! ```
//!
//! **[`node`]**: The [`Stage`](node::Stage), its layers, groups and shapes.
//! Options are written by the caller; absolute transforms, effective opacity
//! and visibility are computed by evaluation.
//!
//! **[`shape`]**: Rectangles, polylines and wrapped text.
//!
//! **[`text`]**: Font descriptions and the line-breaking layout used by text
//! shapes.
//!
//! **[`surface`]**: The [`Surface`](surface::Surface) trait that backends
//! implement, plus a [`RecordingSurface`](surface::RecordingSurface) for
//! headless use.
//!
//! **[`frame`]**: Animation-frame scheduling.
//!
//! **[`reactive`]**: [`Observable`](reactive::Observable) cells and lazily
//! cached [`Computed`](reactive::Computed) values.
//!
//! **[`dirty`]**: Channel constants for `understory_dirty`.
//!
//! **[`transform`]**: The 2D affine [`Transformer`](transform::Transformer).
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types for
//! frame instrumentation, with a zero-overhead [`Tracer`](trace::Tracer)
//! wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).
//! - `trace-rich` (disabled by default, implies `trace`): Gates per-node
//!   change and text-layout events.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod dirty;
pub mod frame;
pub mod node;
pub mod reactive;
pub mod shape;
pub mod surface;
pub mod text;
pub mod trace;
pub mod transform;
