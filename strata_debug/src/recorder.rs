// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as fixed-size little-endian records. [`decode`] reads them back
//! as an iterator of [`RecordedEvent`].
//!
//! Rich events ([`on_node_changes`](TraceSink::on_node_changes),
//! [`on_text_layouts`](TraceSink::on_text_layouts)) store only counts.

use strata_core::trace::{
    EvaluateEvent, FrameSummary, FrameTickEvent, LayerDrawEvent, NodeChange, TextLayoutRecord,
    TraceSink,
};

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_FRAME_TICK: u8 = 1;
const TAG_EVALUATE: u8 = 2;
const TAG_LAYER_DRAW: u8 = 3;
const TAG_FRAME_SUMMARY: u8 = 4;
const TAG_NODE_CHANGES_COUNT: u8 = 5;
const TAG_TEXT_LAYOUTS_COUNT: u8 = 6;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: Vec<u8>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_bool(&mut self, v: bool) {
        self.write_u8(u8::from(v));
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_count(&mut self, len: usize) {
        self.write_u32(u32::try_from(len).unwrap_or(u32::MAX));
    }
}

impl TraceSink for RecorderSink {
    fn on_frame_tick(&mut self, e: &FrameTickEvent) {
        self.write_u8(TAG_FRAME_TICK);
        self.write_u64(e.frame_index);
        self.write_u64(e.timestamp_us);
    }

    fn on_evaluate(&mut self, e: &EvaluateEvent) {
        self.write_u8(TAG_EVALUATE);
        self.write_u64(e.frame_index);
        self.write_u32(e.transforms);
        self.write_u32(e.opacities);
        self.write_u32(e.content);
        self.write_bool(e.topology_changed);
    }

    fn on_layer_draw(&mut self, e: &LayerDrawEvent) {
        self.write_u8(TAG_LAYER_DRAW);
        self.write_u64(e.frame_index);
        self.write_u32(e.layer_index);
        self.write_bool(e.cleared);
        self.write_u32(e.nodes_visited);
        self.write_u32(e.shapes_painted);
        self.write_u32(e.text_lines);
    }

    fn on_frame_summary(&mut self, s: &FrameSummary) {
        self.write_u8(TAG_FRAME_SUMMARY);
        self.write_u64(s.frame_index);
        self.write_u64(s.timestamp_us);
        self.write_u32(s.requests_coalesced);
        self.write_u32(s.transforms_recomputed);
        self.write_u32(s.layers_drawn);
        self.write_u32(s.shapes_painted);
    }

    fn on_node_changes(&mut self, frame_index: u64, changes: &[NodeChange]) {
        self.write_u8(TAG_NODE_CHANGES_COUNT);
        self.write_u64(frame_index);
        self.write_count(changes.len());
    }

    fn on_text_layouts(&mut self, frame_index: u64, layouts: &[TextLayoutRecord]) {
        self.write_u8(TAG_TEXT_LAYOUTS_COUNT);
        self.write_u64(frame_index);
        self.write_count(layouts.len());
        self.write_count(layouts.iter().filter(|l| l.truncated).count());
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecordedEvent {
    /// A [`FrameTickEvent`].
    FrameTick(FrameTickEvent),
    /// An [`EvaluateEvent`].
    Evaluate(EvaluateEvent),
    /// A [`LayerDrawEvent`].
    LayerDraw(LayerDrawEvent),
    /// A [`FrameSummary`].
    FrameSummary(FrameSummary),
    /// Node-change count for a frame.
    NodeChangesCount {
        /// Frame counter.
        frame_index: u64,
        /// Number of node changes.
        count: u32,
    },
    /// Text layouts recomputed during a frame.
    TextLayoutsCount {
        /// Frame counter.
        frame_index: u64,
        /// Number of text nodes laid out.
        count: u32,
        /// How many of them were cut short with an ellipsis.
        truncated: u32,
    },
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`].
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn take<const N: usize>(&mut self) -> Option<[u8; N]> {
        let bytes = self.data.get(self.pos..self.pos + N)?.try_into().ok()?;
        self.pos += N;
        Some(bytes)
    }

    fn read_u8(&mut self) -> Option<u8> {
        self.take::<1>().map(|[v]| v)
    }

    fn read_bool(&mut self) -> Option<bool> {
        self.read_u8().map(|v| v != 0)
    }

    fn read_u32(&mut self) -> Option<u32> {
        self.take().map(u32::from_le_bytes)
    }

    fn read_u64(&mut self) -> Option<u64> {
        self.take().map(u64::from_le_bytes)
    }

    fn decode_frame_tick(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::FrameTick(FrameTickEvent {
            frame_index: self.read_u64()?,
            timestamp_us: self.read_u64()?,
        }))
    }

    fn decode_evaluate(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Evaluate(EvaluateEvent {
            frame_index: self.read_u64()?,
            transforms: self.read_u32()?,
            opacities: self.read_u32()?,
            content: self.read_u32()?,
            topology_changed: self.read_bool()?,
        }))
    }

    fn decode_layer_draw(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::LayerDraw(LayerDrawEvent {
            frame_index: self.read_u64()?,
            layer_index: self.read_u32()?,
            cleared: self.read_bool()?,
            nodes_visited: self.read_u32()?,
            shapes_painted: self.read_u32()?,
            text_lines: self.read_u32()?,
        }))
    }

    fn decode_frame_summary(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::FrameSummary(FrameSummary {
            frame_index: self.read_u64()?,
            timestamp_us: self.read_u64()?,
            requests_coalesced: self.read_u32()?,
            transforms_recomputed: self.read_u32()?,
            layers_drawn: self.read_u32()?,
            shapes_painted: self.read_u32()?,
        }))
    }

    fn decode_node_changes_count(&mut self) -> Option<RecordedEvent> {
        let frame_index = self.read_u64()?;
        let count = self.read_u32()?;
        Some(RecordedEvent::NodeChangesCount { frame_index, count })
    }

    fn decode_text_layouts_count(&mut self) -> Option<RecordedEvent> {
        let frame_index = self.read_u64()?;
        let count = self.read_u32()?;
        let truncated = self.read_u32()?;
        Some(RecordedEvent::TextLayoutsCount {
            frame_index,
            count,
            truncated,
        })
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        match self.read_u8()? {
            TAG_FRAME_TICK => self.decode_frame_tick(),
            TAG_EVALUATE => self.decode_evaluate(),
            TAG_LAYER_DRAW => self.decode_layer_draw(),
            TAG_FRAME_SUMMARY => self.decode_frame_summary(),
            TAG_NODE_CHANGES_COUNT => self.decode_node_changes_count(),
            TAG_TEXT_LAYOUTS_COUNT => self.decode_text_layouts_count(),
            _ => None, // unknown tag → stop iteration
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use strata_core::trace::NodeField;

    use super::*;

    fn sample_layer_draw() -> LayerDrawEvent {
        LayerDrawEvent {
            frame_index: 7,
            layer_index: 2,
            cleared: true,
            nodes_visited: 12,
            shapes_painted: 9,
            text_lines: 4,
        }
    }

    #[test]
    fn frame_events_decode_in_order() {
        let mut rec = RecorderSink::new();
        let tick = FrameTickEvent {
            frame_index: 7,
            timestamp_us: 1_016_667,
        };
        let eval = EvaluateEvent {
            frame_index: 7,
            transforms: 3,
            opacities: 1,
            content: 2,
            topology_changed: true,
        };
        let summary = FrameSummary {
            frame_index: 7,
            timestamp_us: 1_016_667,
            requests_coalesced: 49,
            transforms_recomputed: 3,
            layers_drawn: 1,
            shapes_painted: 9,
        };
        rec.on_frame_tick(&tick);
        rec.on_evaluate(&eval);
        rec.on_layer_draw(&sample_layer_draw());
        rec.on_frame_summary(&summary);

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert_eq!(
            events,
            [
                RecordedEvent::FrameTick(tick),
                RecordedEvent::Evaluate(eval),
                RecordedEvent::LayerDraw(sample_layer_draw()),
                RecordedEvent::FrameSummary(summary),
            ]
        );
    }

    #[test]
    fn rich_events_store_counts() {
        let mut rec = RecorderSink::new();
        rec.on_node_changes(
            42,
            &[
                NodeChange {
                    node_index: 0,
                    field: NodeField::Transform,
                },
                NodeChange {
                    node_index: 3,
                    field: NodeField::Content,
                },
            ],
        );
        rec.on_text_layouts(
            42,
            &[
                TextLayoutRecord {
                    node_index: 3,
                    lines: 2,
                    truncated: true,
                },
                TextLayoutRecord {
                    node_index: 4,
                    lines: 1,
                    truncated: false,
                },
            ],
        );

        let events: Vec<_> = decode(&rec.into_bytes()).collect();
        assert_eq!(
            events,
            [
                RecordedEvent::NodeChangesCount {
                    frame_index: 42,
                    count: 2
                },
                RecordedEvent::TextLayoutsCount {
                    frame_index: 42,
                    count: 2,
                    truncated: 1
                },
            ]
        );
    }

    #[test]
    fn truncated_record_stops_decoding() {
        let mut rec = RecorderSink::new();
        rec.on_layer_draw(&sample_layer_draw());
        rec.on_layer_draw(&sample_layer_draw());
        let bytes = rec.as_bytes();
        let events: Vec<_> = decode(&bytes[..bytes.len() - 1]).collect();
        assert_eq!(events.len(), 1, "partial trailing record is dropped");
    }

    #[test]
    fn empty_buffer_decodes_to_nothing() {
        assert_eq!(decode(&[]).count(), 0);
    }
}
