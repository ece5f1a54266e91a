// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads recorded bytes from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes [Chrome Trace Event Format][spec] JSON to the given writer.
//!
//! Only frame ticks carry a host timestamp. Every other event is placed at
//! the timestamp of the most recent tick, so a frame's events line up under
//! it in the viewer.
//!
//! [spec]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use crate::recorder::{RecordedEvent, decode};

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
/// Layer draws appear on a track per layer.
pub fn export(bytes: &[u8], writer: &mut dyn Write) -> io::Result<()> {
    let mut events: Vec<Value> = Vec::new();
    let mut ts = 0_u64;

    for recorded in decode(bytes) {
        match recorded {
            RecordedEvent::FrameTick(e) => {
                ts = e.timestamp_us;
                events.push(json!({
                    "ph": "i",
                    "name": "FrameTick",
                    "cat": "Scheduler",
                    "ts": ts,
                    "pid": 0,
                    "tid": 0,
                    "s": "g",
                    "args": {
                        "frame_index": e.frame_index,
                    }
                }));
            }
            RecordedEvent::Evaluate(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "Evaluate",
                    "cat": "Frame",
                    "ts": ts,
                    "pid": 0,
                    "tid": 0,
                    "s": "t",
                    "args": {
                        "frame_index": e.frame_index,
                        "transforms": e.transforms,
                        "opacities": e.opacities,
                        "content": e.content,
                        "topology_changed": e.topology_changed,
                    }
                }));
            }
            RecordedEvent::LayerDraw(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "LayerDraw",
                    "cat": "Frame",
                    "ts": ts,
                    "pid": 0,
                    "tid": e.layer_index,
                    "s": "t",
                    "args": {
                        "frame_index": e.frame_index,
                        "cleared": e.cleared,
                        "nodes_visited": e.nodes_visited,
                        "shapes_painted": e.shapes_painted,
                        "text_lines": e.text_lines,
                    }
                }));
            }
            RecordedEvent::FrameSummary(s) => {
                events.push(json!({
                    "ph": "i",
                    "name": "FrameSummary",
                    "cat": "Summary",
                    "ts": s.timestamp_us,
                    "pid": 0,
                    "tid": 0,
                    "s": "g",
                    "args": {
                        "frame_index": s.frame_index,
                        "requests_coalesced": s.requests_coalesced,
                        "transforms_recomputed": s.transforms_recomputed,
                        "layers_drawn": s.layers_drawn,
                        "shapes_painted": s.shapes_painted,
                    }
                }));
                events.push(json!({
                    "ph": "C",
                    "name": "Shapes",
                    "ts": s.timestamp_us,
                    "pid": 0,
                    "args": {
                        "painted": s.shapes_painted,
                    }
                }));
            }
            RecordedEvent::NodeChangesCount { frame_index, count } => {
                events.push(json!({
                    "ph": "i",
                    "name": "NodeChanges",
                    "cat": "Rich",
                    "ts": ts,
                    "pid": 0,
                    "tid": 0,
                    "s": "p",
                    "args": {
                        "frame_index": frame_index,
                        "count": count,
                    }
                }));
            }
            RecordedEvent::TextLayoutsCount {
                frame_index,
                count,
                truncated,
            } => {
                events.push(json!({
                    "ph": "i",
                    "name": "TextLayouts",
                    "cat": "Rich",
                    "ts": ts,
                    "pid": 0,
                    "tid": 0,
                    "s": "p",
                    "args": {
                        "frame_index": frame_index,
                        "count": count,
                        "truncated": truncated,
                    }
                }));
            }
        }
    }

    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use strata_core::trace::{FrameSummary, FrameTickEvent, LayerDrawEvent, TraceSink};

    use super::*;
    use crate::recorder::RecorderSink;

    fn exported(rec: &RecorderSink) -> Vec<Value> {
        let mut out = Vec::new();
        export(rec.as_bytes(), &mut out).unwrap();
        serde_json::from_slice(&out).unwrap()
    }

    #[test]
    fn export_produces_valid_json() {
        let mut rec = RecorderSink::new();
        rec.on_frame_tick(&FrameTickEvent {
            frame_index: 0,
            timestamp_us: 16_000,
        });
        rec.on_layer_draw(&LayerDrawEvent {
            frame_index: 0,
            layer_index: 3,
            shapes_painted: 2,
            ..LayerDrawEvent::default()
        });
        rec.on_frame_summary(&FrameSummary {
            frame_index: 0,
            timestamp_us: 16_000,
            layers_drawn: 1,
            shapes_painted: 2,
            ..FrameSummary::default()
        });

        let parsed = exported(&rec);
        assert_eq!(parsed.len(), 4);

        assert_eq!(parsed[0]["ph"], "i");
        assert_eq!(parsed[0]["name"], "FrameTick");

        // Layer draws inherit the tick's timestamp and get their own track.
        assert_eq!(parsed[1]["name"], "LayerDraw");
        assert_eq!(parsed[1]["ts"], 16_000);
        assert_eq!(parsed[1]["tid"], 3);

        assert_eq!(parsed[2]["name"], "FrameSummary");
        assert_eq!(parsed[3]["ph"], "C");
        assert_eq!(parsed[3]["args"]["painted"], 2);
    }

    #[test]
    fn export_empty_recording() {
        let parsed = exported(&RecorderSink::new());
        assert!(parsed.is_empty());
    }
}
