// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Animation-frame scheduling.
//!
//! Layers never draw on mutation. [`batch_draw`](crate::node::Stage::batch_draw)
//! asks a [`FrameScheduler`] for one animation frame; the host answers by
//! calling [`Stage::run_frame`](crate::node::Stage::run_frame) with a
//! [`FrameTick`] once that frame arrives. In a browser the scheduler wraps
//! `requestAnimationFrame`; headless code uses [`ManualScheduler`].

use alloc::rc::Rc;
use core::cell::Cell;

/// Delivered by the host when a requested animation frame arrives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameTick {
    /// Monotonic frame counter.
    pub frame_index: u64,
    /// Host timestamp in microseconds.
    pub timestamp_us: u64,
}

/// Identifies one outstanding frame request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameRequestId(pub u64);

/// Source of animation-frame callbacks.
pub trait FrameScheduler {
    /// Requests one animation frame.
    fn request_frame(&mut self) -> FrameRequestId;

    /// Withdraws a request that has not been answered yet.
    ///
    /// Cancelling an answered or unknown request does nothing.
    fn cancel_frame(&mut self, id: FrameRequestId);
}

#[derive(Debug, Default)]
struct ManualState {
    next_id: Cell<u64>,
    requested: Cell<u64>,
    cancelled: Cell<u64>,
    outstanding: Cell<u64>,
}

/// A [`FrameScheduler`] driven by hand.
///
/// Clones share counters, so a test can keep one clone as a probe after
/// handing another to a stage. Frames are delivered by calling
/// [`Stage::run_frame`](crate::node::Stage::run_frame) directly; call
/// [`take_pending`](Self::take_pending) to consume the outstanding requests
/// first.
#[derive(Clone, Debug, Default)]
pub struct ManualScheduler {
    state: Rc<ManualState>,
}

impl ManualScheduler {
    /// Creates a scheduler with no requests.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of requests made.
    #[must_use]
    pub fn requested(&self) -> u64 {
        self.state.requested.get()
    }

    /// Total number of requests cancelled before being answered.
    #[must_use]
    pub fn cancelled(&self) -> u64 {
        self.state.cancelled.get()
    }

    /// Number of requests waiting for a frame.
    #[must_use]
    pub fn pending(&self) -> u64 {
        self.state.outstanding.get()
    }

    /// Marks every outstanding request answered and returns how many there
    /// were.
    pub fn take_pending(&self) -> u64 {
        self.state.outstanding.replace(0)
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> FrameRequestId {
        let id = self.state.next_id.get();
        self.state.next_id.set(id + 1);
        self.state.requested.set(self.state.requested.get() + 1);
        self.state.outstanding.set(self.state.outstanding.get() + 1);
        FrameRequestId(id)
    }

    fn cancel_frame(&mut self, id: FrameRequestId) {
        _ = id;
        let outstanding = self.state.outstanding.get();
        if outstanding > 0 {
            self.state.outstanding.set(outstanding - 1);
            self.state.cancelled.set(self.state.cancelled.get() + 1);
        }
    }
}
