// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Headless time axis that exercises the scene graph and the tracing
//! pipeline.
//!
//! Builds a stage with one [`RecordingSurface`] layer holding a time axis
//! (baseline, tick marks and tick labels from a
//! [`TimeScale`](strata_scale::time::TimeScale)), then pans the axis one
//! month per frame for a year. Every frame is traced to both a
//! [`PrettyPrintSink`](strata_debug::pretty::PrettyPrintSink) and a
//! [`RecorderSink`](strata_debug::recorder::RecorderSink); the recording is
//! exported as a Chrome trace JSON file.

use std::fs::File;
use std::io::BufWriter;

use chrono::{DateTime, Months, TimeZone, Utc};
use strata_core::frame::{FrameTick, ManualScheduler};
use strata_core::node::{LayerOptions, NodeId, NodeOptions, Stage, StageOptions};
use strata_core::shape::{Line, Shape, ShapeStyle, Text};
use strata_core::surface::RecordingSurface;
use strata_core::trace::{
    EvaluateEvent, FrameSummary, FrameTickEvent, LayerDrawEvent, NodeChange, TextLayoutRecord,
    TraceSink, Tracer,
};
use strata_scale::time::{TimeLocale, TimeScale, scale_time};

use strata_debug::pretty::PrettyPrintSink;
use strata_debug::recorder::RecorderSink;

const WIDTH: f64 = 640.0;
const HEIGHT: f64 = 60.0;
const MARGIN: f64 = 40.0;
const TICK_COUNT: usize = 8;
/// Upper bound on tick slots; unused slots are hidden.
const SLOTS: usize = 16;
const FRAME_COUNT: u64 = 12;
/// 16.6ms refresh interval in microseconds (≈60 Hz).
const REFRESH_INTERVAL_US: u64 = 16_667;

/// Forwards every event to two sinks.
struct Tee<'a> {
    a: &'a mut dyn TraceSink,
    b: &'a mut dyn TraceSink,
}

impl TraceSink for Tee<'_> {
    fn on_frame_tick(&mut self, e: &FrameTickEvent) {
        self.a.on_frame_tick(e);
        self.b.on_frame_tick(e);
    }

    fn on_evaluate(&mut self, e: &EvaluateEvent) {
        self.a.on_evaluate(e);
        self.b.on_evaluate(e);
    }

    fn on_layer_draw(&mut self, e: &LayerDrawEvent) {
        self.a.on_layer_draw(e);
        self.b.on_layer_draw(e);
    }

    fn on_frame_summary(&mut self, s: &FrameSummary) {
        self.a.on_frame_summary(s);
        self.b.on_frame_summary(s);
    }

    fn on_node_changes(&mut self, frame_index: u64, changes: &[NodeChange]) {
        self.a.on_node_changes(frame_index, changes);
        self.b.on_node_changes(frame_index, changes);
    }

    fn on_text_layouts(&mut self, frame_index: u64, layouts: &[TextLayoutRecord]) {
        self.a.on_text_layouts(frame_index, layouts);
        self.b.on_text_layouts(frame_index, layouts);
    }
}

/// One tick mark with its label.
struct TickSlot {
    group: NodeId,
    label: NodeId,
}

fn main() {
    let probe = ManualScheduler::new();
    let mut stage: Stage<RecordingSurface> =
        Stage::new(StageOptions::new(WIDTH, HEIGHT), probe.clone());
    let layer = stage.add_layer(RecordingSurface::default(), LayerOptions::default());

    let axis = stage.create_group(NodeOptions::at(0.0, 20.0).with_name("axis"));
    stage.add(layer, axis);
    let baseline = stage.create_shape(
        Shape::new(
            Line::new(vec![MARGIN, 0.0, WIDTH - MARGIN, 0.0]).expect("even point count"),
            ShapeStyle::stroke("#333", 1.0),
        ),
        NodeOptions::default(),
    );
    stage.add(axis, baseline);

    let slots: Vec<TickSlot> = (0..SLOTS)
        .map(|_| {
            let group = stage.create_group(NodeOptions::default());
            let mark = stage.create_shape(
                Shape::new(
                    Line::new(vec![0.0, 0.0, 0.0, 6.0]).expect("even point count"),
                    ShapeStyle::stroke("#333", 1.0),
                ),
                NodeOptions::default(),
            );
            let label = stage.create_shape(
                Shape::new(Text::new(""), ShapeStyle::fill("#333")),
                NodeOptions::at(-30.0, 9.0).with_size(60.0, 14.0),
            );
            stage.add_all(group, [mark, label]);
            stage.add(axis, group);
            TickSlot { group, label }
        })
        .collect();

    let locale = TimeLocale::default();
    let start = Utc.with_ymd_and_hms(2011, 1, 1, 0, 0, 0).unwrap();

    let mut pretty = PrettyPrintSink::new(Box::new(std::io::stdout()));
    let mut recorder = RecorderSink::new();
    let mut timestamp_us = 1_000_000;

    for frame_index in 0..FRAME_COUNT {
        let months = Months::new(u32::try_from(frame_index).unwrap());
        let from = start.checked_add_months(months).unwrap();
        let to = from.checked_add_months(Months::new(12)).unwrap();
        let mut scale = scale_time(vec![from, to], vec![MARGIN, WIDTH - MARGIN]).unwrap();
        scale.nice(TICK_COUNT);
        layout_axis(&mut stage, &slots, &scale, &locale);
        stage.batch_draw(layer);

        // The host answers the pending request with one animation frame.
        probe.take_pending();
        stage.surface_mut(layer).take_commands();
        let tick = FrameTick {
            frame_index,
            timestamp_us,
        };
        let mut tee = Tee {
            a: &mut pretty,
            b: &mut recorder,
        };
        let summary = stage.run_frame(tick, &mut Tracer::new(&mut tee));
        assert_eq!(summary.layers_drawn, 1, "the axis layer redraws every frame");

        timestamp_us += REFRESH_INTERVAL_US;
    }

    let labels = stage.surface(layer).filled_text();
    println!("last frame labels: {labels:?}");

    // -- export Chrome trace -----------------------------------------------
    let path = "trace.json";
    let file = File::create(path).expect("failed to create trace.json");
    let mut writer = BufWriter::new(file);
    strata_debug::chrome::export(recorder.as_bytes(), &mut writer)
        .expect("failed to write Chrome trace");

    println!("Wrote {path} ({FRAME_COUNT} frames)");
}

/// Moves tick slots to the scale's current ticks and relabels them.
fn layout_axis(
    stage: &mut Stage<RecordingSurface>,
    slots: &[TickSlot],
    scale: &TimeScale<f64>,
    locale: &TimeLocale,
) {
    let ticks: Vec<DateTime<Utc>> = scale.ticks(TICK_COUNT);
    let format = scale.tick_format(locale);
    for (i, slot) in slots.iter().enumerate() {
        match ticks.get(i) {
            Some(&t) => {
                stage.node_mut(slot.group).x(scale.scale(t)).visible(true);
                stage.node_mut(slot.label).text(format.format(t));
            }
            None => {
                stage.node_mut(slot.group).visible(false);
            }
        }
    }
}
