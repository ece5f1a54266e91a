// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr).

use std::io::Write;

use strata_core::trace::{
    EvaluateEvent, FrameSummary, FrameTickEvent, LayerDrawEvent, NodeChange, NodeField,
    TextLayoutRecord, TraceSink,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the sink and returns its writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn field_name(field: NodeField) -> &'static str {
    match field {
        NodeField::Transform => "transform",
        NodeField::Opacity => "opacity",
        NodeField::Content => "content",
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_frame_tick(&mut self, e: &FrameTickEvent) {
        let _ = writeln!(
            self.writer,
            "[tick] frame={} at {}µs",
            e.frame_index, e.timestamp_us,
        );
    }

    fn on_evaluate(&mut self, e: &EvaluateEvent) {
        let topology = if e.topology_changed { " topology" } else { "" };
        let _ = writeln!(
            self.writer,
            "[eval] frame={} transforms={} opacities={} content={}{topology}",
            e.frame_index, e.transforms, e.opacities, e.content,
        );
    }

    fn on_layer_draw(&mut self, e: &LayerDrawEvent) {
        let cleared = if e.cleared { "cleared" } else { "kept" };
        let _ = writeln!(
            self.writer,
            "[draw] frame={} layer={} {cleared} visited={} painted={} lines={}",
            e.frame_index, e.layer_index, e.nodes_visited, e.shapes_painted, e.text_lines,
        );
    }

    fn on_frame_summary(&mut self, s: &FrameSummary) {
        let _ = writeln!(
            self.writer,
            "[summary] frame={} coalesced={} transforms={} layers={} shapes={}",
            s.frame_index,
            s.requests_coalesced,
            s.transforms_recomputed,
            s.layers_drawn,
            s.shapes_painted,
        );
    }

    fn on_node_changes(&mut self, frame_index: u64, changes: &[NodeChange]) {
        let mut counts = [0_usize; 3];
        for change in changes {
            counts[change.field as usize] += 1;
        }
        let _ = write!(self.writer, "[nodes] frame={frame_index}");
        for field in [NodeField::Transform, NodeField::Opacity, NodeField::Content] {
            let _ = write!(
                self.writer,
                " {}={}",
                field_name(field),
                counts[field as usize]
            );
        }
        let _ = writeln!(self.writer);
    }

    fn on_text_layouts(&mut self, frame_index: u64, layouts: &[TextLayoutRecord]) {
        let lines: u32 = layouts.iter().map(|l| l.lines).sum();
        let truncated = layouts.iter().filter(|l| l.truncated).count();
        let _ = writeln!(
            self.writer,
            "[text] frame={frame_index} layouts={} lines={lines} truncated={truncated}",
            layouts.len(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(sink: PrettyPrintSink<Vec<u8>>) -> String {
        String::from_utf8(sink.into_inner()).unwrap()
    }

    #[test]
    fn pretty_print_tick() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_frame_tick(&FrameTickEvent {
            frame_index: 1,
            timestamp_us: 16_667,
        });
        let output = output(sink);
        assert!(output.contains("[tick]"), "got: {output}");
        assert!(output.contains("frame=1"), "got: {output}");
    }

    #[test]
    fn one_line_per_event() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_evaluate(&EvaluateEvent {
            frame_index: 2,
            transforms: 4,
            opacities: 0,
            content: 1,
            topology_changed: true,
        });
        sink.on_layer_draw(&LayerDrawEvent {
            frame_index: 2,
            shapes_painted: 3,
            ..LayerDrawEvent::default()
        });
        let output = output(sink);
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines.len(), 2, "got: {output}");
        assert_eq!(
            lines[0],
            "[eval] frame=2 transforms=4 opacities=0 content=1 topology"
        );
        assert!(lines[1].contains("painted=3"), "got: {output}");
    }

    #[test]
    fn node_changes_are_tallied_by_field() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        let change = |node_index, field| NodeChange { node_index, field };
        sink.on_node_changes(
            5,
            &[
                change(0, NodeField::Transform),
                change(1, NodeField::Transform),
                change(1, NodeField::Content),
            ],
        );
        assert_eq!(
            output(sink),
            "[nodes] frame=5 transform=2 opacity=0 content=1\n"
        );
    }
}
