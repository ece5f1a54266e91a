// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the draw loop.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that
//! [`Stage::run_frame`](crate::node::Stage::run_frame) calls at each stage of
//! a frame. All method bodies default to no-ops, so implementing only the
//! events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing. When **on**, each
//! method performs a single `Option` branch before dispatching.
//!
//! [`FrameSummaryBuilder`] accumulates per-layer counts during a frame and
//! produces a [`FrameSummary`] at the end.
//!
//! # Crate features
//!
//! - `trace`: enables the `Tracer` method bodies.
//! - `trace-rich` (implies `trace`): gates [`NodeChange`] and
//!   [`TextLayoutRecord`] events plus the corresponding `TraceSink` methods.

use crate::frame::FrameTick;
use crate::node::SceneChanges;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Which category of node state changed.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeField {
    /// Local or absolute transform (including visibility).
    Transform,
    /// Opacity.
    Opacity,
    /// Content such as text or size constraints.
    Content,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted when the host delivers an animation frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameTickEvent {
    /// Monotonic frame counter.
    pub frame_index: u64,
    /// Host timestamp in microseconds.
    pub timestamp_us: u64,
}

impl From<&FrameTick> for FrameTickEvent {
    fn from(tick: &FrameTick) -> Self {
        Self {
            frame_index: tick.frame_index,
            timestamp_us: tick.timestamp_us,
        }
    }
}

/// Emitted after the scene has been evaluated for a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EvaluateEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Nodes whose absolute transform was recomputed.
    pub transforms: u32,
    /// Nodes whose effective opacity was recomputed.
    pub opacities: u32,
    /// Nodes whose content was invalidated.
    pub content: u32,
    /// Whether the traversal order was rebuilt.
    pub topology_changed: bool,
}

impl EvaluateEvent {
    /// Summarizes a set of scene changes.
    #[must_use]
    pub fn new(frame_index: u64, changes: &SceneChanges) -> Self {
        Self {
            frame_index,
            transforms: saturating_len(changes.transforms.len()),
            opacities: saturating_len(changes.opacities.len()),
            content: saturating_len(changes.content.len()),
            topology_changed: changes.topology_changed,
        }
    }
}

/// Emitted after one layer has been drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LayerDrawEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Slot index of the layer node.
    pub layer_index: u32,
    /// Whether the surface was cleared first.
    pub cleared: bool,
    /// Visible nodes visited, including containers.
    pub nodes_visited: u32,
    /// Shapes that issued paint commands.
    pub shapes_painted: u32,
    /// Lines of text drawn.
    pub text_lines: u32,
}

/// Per-frame summary produced by [`FrameSummaryBuilder`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameSummary {
    /// Frame counter.
    pub frame_index: u64,
    /// Host timestamp in microseconds.
    pub timestamp_us: u64,
    /// Draw requests absorbed by an already pending frame since the previous
    /// frame.
    pub requests_coalesced: u32,
    /// Absolute transforms recomputed during evaluation.
    pub transforms_recomputed: u32,
    /// Layers drawn.
    pub layers_drawn: u32,
    /// Shapes that issued paint commands across all layers.
    pub shapes_painted: u32,
}

/// A per-frame node change record.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NodeChange {
    /// Slot index of the node.
    pub node_index: u32,
    /// Which state changed.
    pub field: NodeField,
}

/// Result of laying out one text node.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextLayoutRecord {
    /// Slot index of the text node.
    pub node_index: u32,
    /// Lines produced.
    pub lines: u32,
    /// Whether the text was cut short with an ellipsis.
    pub truncated: bool,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the draw loop.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when a frame begins.
    fn on_frame_tick(&mut self, e: &FrameTickEvent) {
        _ = e;
    }

    /// Called after scene evaluation.
    fn on_evaluate(&mut self, e: &EvaluateEvent) {
        _ = e;
    }

    /// Called after each layer draw.
    fn on_layer_draw(&mut self, e: &LayerDrawEvent) {
        _ = e;
    }

    /// Called with the per-frame summary.
    fn on_frame_summary(&mut self, s: &FrameSummary) {
        _ = s;
    }

    /// Called with per-frame node changes (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    fn on_node_changes(&mut self, frame_index: u64, changes: &[NodeChange]) {
        _ = (frame_index, changes);
    }

    /// Called with text layouts recomputed during a frame (requires
    /// `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    fn on_text_layouts(&mut self, frame_index: u64, layouts: &[TextLayoutRecord]) {
        _ = (frame_index, layouts);
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`FrameTickEvent`].
    #[inline]
    pub fn frame_tick(&mut self, e: &FrameTickEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_frame_tick(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits an [`EvaluateEvent`].
    #[inline]
    pub fn evaluate(&mut self, e: &EvaluateEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_evaluate(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`LayerDrawEvent`].
    #[inline]
    pub fn layer_draw(&mut self, e: &LayerDrawEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_layer_draw(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`FrameSummary`].
    #[inline]
    pub fn frame_summary(&mut self, s: &FrameSummary) {
        #[cfg(feature = "trace")]
        if let Some(sink) = &mut self.sink {
            sink.on_frame_summary(s);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = s;
        }
    }

    /// Returns `true` if events reach a sink.
    ///
    /// Lets callers skip building rich event buffers nobody will see.
    #[inline]
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        #[cfg(feature = "trace")]
        {
            self.sink.is_some()
        }
        #[cfg(not(feature = "trace"))]
        {
            false
        }
    }

    /// Emits node changes (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn node_changes(&mut self, frame_index: u64, changes: &[NodeChange]) {
        if let Some(s) = &mut self.sink {
            s.on_node_changes(frame_index, changes);
        }
    }

    /// Emits text layout records (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn text_layouts(&mut self, frame_index: u64, layouts: &[TextLayoutRecord]) {
        if let Some(s) = &mut self.sink {
            s.on_text_layouts(frame_index, layouts);
        }
    }
}

// ---------------------------------------------------------------------------
// FrameSummaryBuilder
// ---------------------------------------------------------------------------

/// Accumulates counts during a frame and produces a [`FrameSummary`].
#[derive(Debug)]
pub struct FrameSummaryBuilder {
    summary: FrameSummary,
}

impl FrameSummaryBuilder {
    /// Starts building a summary for the given tick.
    #[must_use]
    pub fn new(tick: &FrameTickEvent) -> Self {
        Self {
            summary: FrameSummary {
                frame_index: tick.frame_index,
                timestamp_us: tick.timestamp_us,
                ..FrameSummary::default()
            },
        }
    }

    /// Records the number of coalesced draw requests.
    pub fn set_requests_coalesced(&mut self, n: u32) {
        self.summary.requests_coalesced = n;
    }

    /// Records the evaluation pass.
    pub fn record_evaluate(&mut self, e: &EvaluateEvent) {
        self.summary.transforms_recomputed += e.transforms;
    }

    /// Records one drawn layer.
    pub fn record_layer(&mut self, e: &LayerDrawEvent) {
        self.summary.layers_drawn += 1;
        self.summary.shapes_painted += e.shapes_painted;
    }

    /// Consumes the builder and produces the final [`FrameSummary`].
    #[must_use]
    pub fn finish(self) -> FrameSummary {
        self.summary
    }
}

pub(crate) fn saturating_len(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
