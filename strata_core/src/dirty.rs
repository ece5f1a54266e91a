// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty-tracking channel constants.
//!
//! Strata uses multi-channel dirty tracking (via [`understory_dirty`]) for two
//! independent graphs: the node arena inside a [`Stage`](crate::node::Stage)
//! and the value graph of a reactive [`Runtime`](crate::reactive::Runtime).
//!
//! # Propagation semantics
//!
//! - **Propagating**: [`TRANSFORM`] and [`OPACITY`] use
//!   [`EagerPolicy`](understory_dirty::EagerPolicy) with dependency edges from
//!   child to parent. Marking a node dirty marks its whole subtree, because
//!   absolute transforms, effective opacity and effective visibility are
//!   inherited. Visibility changes are routed through [`TRANSFORM`].
//!
//! - **Local-only**: [`CONTENT`] is marked with the default policy. It
//!   covers per-node state such as a text node's cached line layout.
//!
//! - **Structural**: [`TOPOLOGY`] is marked on add/remove/sort and on node
//!   creation and destruction. It triggers a traversal-order rebuild.
//!
//! - **Reactive**: [`VALUE`] carries edges from a computed value to each
//!   observable or computed it read during its last evaluation. Writes mark
//!   eagerly, so every transitive dependent is invalidated at once.

use understory_dirty::Channel;

/// Position, scale, rotation, skew, offset or visibility changed; requires
/// absolute-transform recomputation for the subtree.
pub const TRANSFORM: Channel = Channel::new(0);

/// Opacity changed; requires effective-opacity recomputation for the subtree.
pub const OPACITY: Channel = Channel::new(1);

/// Content changed (text, font, size constraints). No propagation.
pub const CONTENT: Channel = Channel::new(2);

/// Tree topology or child order changed.
pub const TOPOLOGY: Channel = Channel::new(3);

/// A reactive value changed.
pub const VALUE: Channel = Channel::new(4);
