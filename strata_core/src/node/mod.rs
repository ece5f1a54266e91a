// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scene tree data model.
//!
//! A *node* is a slot in a [`NodeStore`] owned by a [`Stage`]. Each node has:
//!
//! - An identity ([`NodeId`]): a generational handle that becomes stale when
//!   the node is destroyed, preventing use-after-free bugs at the API level.
//! - A [`NodeKind`]: the stage, a layer, a group, or a shape.
//! - Topology: parent, first-child, and sibling links forming an ordered tree.
//! - **Options** set by the caller ([`NodeOptions`]), written through
//!   [`Stage::set`], [`Stage::update`] or the chaining setters of
//!   [`Stage::node_mut`].
//! - **Computed state** produced by evaluation: the absolute transform
//!   (local transform multiplied by every ancestor's), effective opacity and
//!   effective visibility.
//!
//! # Dirty tracking
//!
//! Option writes mark the corresponding dirty channel (see
//! [`dirty`](crate::dirty)):
//!
//! - **TRANSFORM** / **OPACITY**: propagate to all descendants, since
//!   absolute transforms, opacity and visibility are inherited.
//! - **CONTENT**: local-only; size and shape edits drop the cached text
//!   layout.
//! - **TOPOLOGY**: structural changes that trigger a traversal-order
//!   rebuild.
//!
//! Nothing is recomputed until the tree is evaluated, which happens at the
//! start of every frame and on [`Stage::absolute_transform`].

mod clip;
mod draw;
mod evaluate;
mod handle;
mod id;
mod options;
mod stage;
mod store;
mod traverse;

pub use clip::ClipShape;
pub use evaluate::SceneChanges;
pub use handle::NodeMut;
pub use id::{INVALID, NodeId, NodeKind};
pub use options::{LayerOptions, NodeOptions, NodePatch, StageOptions};
pub use stage::Stage;
pub use store::NodeStore;
pub use traverse::{Ancestors, Children, Descendants, NodeRef};

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec;
    use alloc::vec::Vec;

    use kurbo::Size;

    use super::*;
    use crate::frame::{FrameTick, ManualScheduler};
    use crate::shape::{Line, Rect, Shape, ShapeStyle, Text};
    use crate::surface::{DrawCommand, RecordingSurface};
    use crate::trace::Tracer;

    const EPS: f64 = 1e-9;

    fn stage() -> (Stage<RecordingSurface>, NodeId, ManualScheduler) {
        let probe = ManualScheduler::new();
        let mut stage = Stage::new(StageOptions::new(200.0, 100.0), probe.clone());
        let layer = stage.add_layer(RecordingSurface::default(), LayerOptions::default());
        (stage, layer, probe)
    }

    fn tick(frame_index: u64) -> FrameTick {
        FrameTick {
            frame_index,
            timestamp_us: frame_index * 16_667,
        }
    }

    fn run(stage: &mut Stage<RecordingSurface>, frame_index: u64) -> crate::trace::FrameSummary {
        stage.run_frame(tick(frame_index), &mut Tracer::none())
    }

    #[test]
    fn layer_surface_takes_stage_size() {
        let (stage, layer, _) = stage();
        assert_eq!(stage.surface(layer).size(), Size::new(200.0, 100.0));
        assert_eq!(stage.layer_of(layer), Some(layer));
        assert_eq!(stage.layer_of(stage.root()), None);
    }

    #[test]
    fn depth_three_absolute_translation() {
        let (mut stage, layer, _) = stage();
        let g1 = stage.create_group(NodeOptions::at(10.0, 5.0));
        let g2 = stage.create_group(NodeOptions {
            offset: kurbo::Vec2::new(1.0, 1.0),
            ..NodeOptions::at(20.0, 6.0)
        });
        let leaf = stage.create_shape(Rect::new(), NodeOptions::at(30.0, 7.0));
        stage.add(layer, g1);
        stage.add(g1, g2);
        stage.add(g2, leaf);

        let [.., e, f] = stage.absolute_transform(leaf).matrix_values();
        assert!((e - 61.0).abs() < EPS, "e = {e}");
        assert!((f - 19.0).abs() < EPS, "f = {f}");

        // An ancestor write is visible on the next read.
        stage.node_mut(g1).x(110.0);
        let [.., e, _] = stage.absolute_transform(leaf).matrix_values();
        assert!((e - 161.0).abs() < EPS, "e = {e}");
    }

    #[test]
    fn mutation_burst_requests_one_frame() {
        let (mut stage, layer, probe) = stage();
        let rect = stage.create_shape(Rect::new(), NodeOptions::default());
        stage.add(layer, rect);
        for i in 0..50 {
            stage.node_mut(rect).x(f64::from(i)).y(1.0);
        }
        assert_eq!(probe.requested(), 1, "one frame for the whole burst");
        assert!(stage.is_draw_pending(layer));

        let summary = run(&mut stage, 1);
        assert_eq!(summary.layers_drawn, 1);
        assert!(summary.requests_coalesced > 0);
        assert!(!stage.is_draw_pending(layer));

        // A write after the frame schedules a new one.
        stage.node_mut(rect).x(3.0);
        assert_eq!(probe.requested(), 2);
    }

    #[test]
    fn auto_draw_off_does_not_schedule() {
        let (mut stage, layer, probe) = stage();
        let rect = stage.create_shape(
            Rect::new(),
            NodeOptions {
                auto_draw: false,
                ..NodeOptions::default()
            },
        );
        stage.add(layer, rect);
        stage.node_mut(rect).x(4.0);
        assert_eq!(probe.requested(), 0);
        stage.batch_draw(layer);
        assert_eq!(probe.requested(), 1);
    }

    #[test]
    fn frame_clears_then_paints() {
        let (mut stage, layer, _) = stage();
        let rect = stage.create_shape(
            Shape::new(Rect::new(), ShapeStyle::fill("red")),
            NodeOptions::at(5.0, 5.0).with_size(10.0, 10.0),
        );
        stage.add(layer, rect);
        let _ = stage.surface_mut(layer).take_commands();
        let _ = run(&mut stage, 1);

        let cmds = stage.surface(layer).commands();
        assert_eq!(
            cmds.first(),
            Some(&DrawCommand::ClearRect(kurbo::Rect::new(0.0, 0.0, 200.0, 100.0)))
        );
        assert!(cmds.contains(&DrawCommand::Rect(kurbo::Rect::new(0.0, 0.0, 10.0, 10.0))));
        assert!(cmds.contains(&DrawCommand::Fill));
    }

    #[test]
    fn clear_before_draw_can_be_disabled() {
        let probe = ManualScheduler::new();
        let mut stage: Stage<RecordingSurface> =
            Stage::new(StageOptions::new(10.0, 10.0), probe);
        let layer = stage.add_layer(
            RecordingSurface::default(),
            LayerOptions {
                clear_before_draw: false,
                ..LayerOptions::default()
            },
        );
        stage.batch_draw(layer);
        let _ = run(&mut stage, 1);
        assert!(
            !stage
                .surface(layer)
                .commands()
                .iter()
                .any(|c| matches!(c, DrawCommand::ClearRect(_)))
        );
    }

    #[test]
    fn hidden_subtree_is_skipped() {
        let (mut stage, layer, _) = stage();
        let group = stage.create_group(NodeOptions::default());
        let rect = stage.create_shape(
            Shape::new(Rect::new(), ShapeStyle::fill("red")),
            NodeOptions::default(),
        );
        stage.add(layer, group);
        stage.add(group, rect);
        stage.node_mut(group).visible(false);
        let event = stage.draw(layer);
        assert_eq!(event.shapes_painted, 0);
        assert!(!stage.surface(layer).commands().contains(&DrawCommand::Fill));
    }

    #[test]
    fn opacity_multiplies_into_global_alpha() {
        let (mut stage, layer, _) = stage();
        let group = stage.create_group(NodeOptions {
            opacity: 0.5,
            ..NodeOptions::default()
        });
        let rect = stage.create_shape(
            Shape::new(Rect::new(), ShapeStyle::fill("red")),
            NodeOptions {
                opacity: 0.5,
                ..NodeOptions::default()
            },
        );
        stage.add(layer, group);
        stage.add(group, rect);
        let _ = stage.draw(layer);
        assert!(stage.surface(layer).commands().contains(&DrawCommand::GlobalAlpha(0.25)));
    }

    #[test]
    fn clip_wraps_children() {
        let (mut stage, layer, _) = stage();
        let group = stage.create_group(NodeOptions {
            clip: Some(ClipShape::from_xywh(0.0, 0.0, 50.0, 50.0)),
            ..NodeOptions::default()
        });
        let line = stage.create_shape(
            Shape::new(
                Line::new(vec![0.0, 0.0, 100.0, 100.0]).expect("pairs"),
                ShapeStyle::stroke("black", 1.0),
            ),
            NodeOptions::default(),
        );
        stage.add(layer, group);
        stage.add(group, line);
        let _ = stage.surface_mut(layer).take_commands();
        let _ = stage.draw(layer);
        let cmds = stage.surface(layer).commands();
        let clip = cmds.iter().position(|c| *c == DrawCommand::Clip).expect("clip");
        let stroke = cmds.iter().position(|c| *c == DrawCommand::Stroke).expect("stroke");
        assert!(clip < stroke, "clip applies before the child paints");
        assert_eq!(cmds.last(), Some(&DrawCommand::Restore));
    }

    #[test]
    fn children_draw_in_order_and_sort_by_z_index() {
        let (mut stage, layer, _) = stage();
        let labels = ["a", "b", "c"];
        let zs = [2, 0, 1];
        let ids: Vec<NodeId> = labels
            .iter()
            .zip(zs)
            .map(|(label, z)| {
                let shape = Shape::new(
                    Text::new(*label),
                    ShapeStyle {
                        fill_style: Some("black".into()),
                        z_index: z,
                        ..ShapeStyle::default()
                    },
                );
                stage.create_shape(shape, NodeOptions::default())
            })
            .collect();
        stage.add_all(layer, ids.iter().copied());

        let _ = stage.draw(layer);
        assert_eq!(stage.surface(layer).filled_text(), ["a", "b", "c"]);

        stage.sort_children_by_z_index(layer);
        let _ = stage.surface_mut(layer).take_commands();
        let _ = stage.draw(layer);
        assert_eq!(stage.surface(layer).filled_text(), ["b", "c", "a"]);
    }

    #[test]
    fn text_wraps_to_node_width() {
        let (mut stage, layer, _) = stage();
        let text = "the quick brown fox jumps over the lazy dog";
        let node = stage.create_shape(
            Shape::new(Text::new(text), ShapeStyle::fill("black")),
            NodeOptions::default().with_size(60.0, 1000.0),
        );
        stage.add(layer, node);
        let event = stage.draw(layer);
        let lines: Vec<String> = stage
            .surface(layer)
            .filled_text()
            .into_iter()
            .map(String::from)
            .collect();
        assert!(lines.len() > 1);
        assert_eq!(event.text_lines as usize, lines.len());
        // Recording glyphs are 6 px wide.
        assert!(lines.iter().all(|l| l.chars().count() * 6 <= 60));
        assert_eq!(lines.concat(), text);
        assert!(stage.nodes().text_layout(node).is_some());

        // Resizing drops the cached layout.
        stage.node_mut(node).width(120.0);
        let _ = stage.absolute_transform(node);
        assert!(stage.nodes().text_layout(node).is_none());
    }

    #[test]
    fn add_reparents_and_is_idempotent() {
        let (mut stage, layer, _) = stage();
        let g1 = stage.create_group(NodeOptions::default());
        let g2 = stage.create_group(NodeOptions::default());
        let leaf = stage.create_shape(Rect::new(), NodeOptions::default());
        stage.add_all(layer, [g1, g2]);
        stage.add(g1, leaf);
        stage.add(g1, leaf);
        assert_eq!(stage.children(g1).count(), 1);
        stage.add(g2, leaf);
        assert_eq!(stage.children(g1).count(), 0);
        assert_eq!(stage.parent(leaf), Some(g2));
    }

    #[test]
    fn remove_children_detaches_members_only() {
        let (mut stage, layer, _) = stage();
        let g = stage.create_group(NodeOptions::default());
        let a = stage.create_group(NodeOptions::default());
        let b = stage.create_group(NodeOptions::default());
        let stray = stage.create_group(NodeOptions::default());
        stage.add(layer, g);
        stage.add_all(g, [a, b]);
        stage.add(layer, stray);
        stage.remove_children(g, [a, stray]);
        let kids: Vec<_> = stage.children(g).collect();
        assert_eq!(kids, vec![b]);
        assert_eq!(stage.parent(stray), Some(layer), "non-member untouched");
        stage.remove_all_children(g);
        assert_eq!(stage.children(g).count(), 0);
        assert!(stage.nodes().is_alive(a), "removed nodes stay alive");
    }

    #[test]
    fn descendants_and_ancestors_via_stage() {
        let (mut stage, layer, _) = stage();
        let g = stage.create_group(NodeOptions::default());
        let leaf = stage.create_shape(Rect::new(), NodeOptions::default());
        stage.add(layer, g);
        stage.add(g, leaf);
        let up: Vec<_> = stage.ancestors(leaf, false).collect();
        assert_eq!(up, vec![g, layer, stage.root()]);
        let down: Vec<_> = stage.descendants(layer, false).collect();
        assert_eq!(down, vec![g, leaf]);
        let mut seen = 0;
        stage.each(layer, true, |_| seen += 1);
        assert_eq!(seen, 3);
    }

    #[test]
    fn destroying_layer_cancels_pending_frame() {
        let (mut stage, layer, probe) = stage();
        stage.batch_draw(layer);
        assert_eq!(probe.pending(), 1);
        stage.destroy(layer);
        assert_eq!(probe.cancelled(), 1);
        assert_eq!(probe.pending(), 0);
        assert_eq!(stage.layers().count(), 0);
        let summary = run(&mut stage, 1);
        assert_eq!(summary.layers_drawn, 0);
    }

    #[test]
    fn removed_layer_stops_drawing() {
        let (mut stage, layer, probe) = stage();
        let rect = stage.create_shape(Rect::new(), NodeOptions::default());
        stage.add(layer, rect);
        assert_eq!(probe.pending(), 1);

        stage.remove(layer);
        assert_eq!(probe.cancelled(), 1);
        assert_eq!(probe.pending(), 0);
        stage.node_mut(rect).x(5.0);
        stage.batch_draw(layer);
        assert_eq!(probe.pending(), 0, "a detached layer is not scheduled");
        assert_eq!(run(&mut stage, 1).layers_drawn, 0);

        stage.add(stage.root(), layer);
        assert_eq!(probe.pending(), 1);
        assert_eq!(run(&mut stage, 2).layers_drawn, 1);
    }

    #[test]
    fn destroy_frees_subtree() {
        let (mut stage, layer, _) = stage();
        let g = stage.create_group(NodeOptions::default());
        let leaf = stage.create_shape(Rect::new(), NodeOptions::default());
        stage.add(layer, g);
        stage.add(g, leaf);
        stage.destroy(g);
        assert!(!stage.nodes().is_alive(g));
        assert!(!stage.nodes().is_alive(leaf));
        assert_eq!(stage.children(layer).count(), 0);
    }

    #[test]
    fn set_layer_size_resizes_surface() {
        let (mut stage, layer, _) = stage();
        stage.set_layer_size(layer, Size::new(50.0, 40.0));
        assert_eq!(stage.surface(layer).size(), Size::new(50.0, 40.0));
        assert_eq!(stage.options(layer).width, Some(50.0));
        stage.set_size(Size::new(300.0, 300.0));
        assert_eq!(stage.surface(layer).size(), Size::new(300.0, 300.0));
        assert_eq!(stage.size(), Size::new(300.0, 300.0));
    }

    #[test]
    fn patch_and_update_write_options() {
        let (mut stage, layer, _) = stage();
        let g = stage.create_group(NodeOptions::default());
        stage.add(layer, g);
        stage.set(
            g,
            NodePatch {
                name: Some(Some("axis".into())),
                rotation: Some(0.5),
                ..NodePatch::default()
            },
        );
        stage.update(g, |o| o.tag = Some("t".into()));
        stage.node_mut(g).rotation_deg(90.0).scale_x(2.0).offset_y(3.0);
        let o = stage.options(g);
        assert_eq!(o.name.as_deref(), Some("axis"));
        assert_eq!(o.tag.as_deref(), Some("t"));
        assert!((o.rotation - core::f64::consts::FRAC_PI_2).abs() < EPS);
        assert_eq!(o.scale, kurbo::Vec2::new(2.0, 1.0));
        assert_eq!(o.offset, kurbo::Vec2::new(0.0, 3.0));
    }

    #[test]
    fn text_setter_replaces_content() {
        let (mut stage, layer, _) = stage();
        let node = stage.create_shape(
            Shape::new(Text::new("old"), ShapeStyle::fill("black")),
            NodeOptions::default(),
        );
        stage.add(layer, node);
        stage.node_mut(node).text("new");
        let _ = stage.draw(layer);
        assert_eq!(stage.surface(layer).filled_text(), ["new"]);
    }

    #[test]
    #[should_panic(expected = "cannot add children to a shape")]
    fn adding_under_a_shape_panics() {
        let (mut stage, layer, _) = stage();
        let leaf = stage.create_shape(Rect::new(), NodeOptions::default());
        let g = stage.create_group(NodeOptions::default());
        stage.add(layer, leaf);
        stage.add(leaf, g);
    }

    #[test]
    #[should_panic(expected = "only layers may be added")]
    fn adding_a_group_to_the_stage_panics() {
        let (mut stage, _, _) = stage();
        let g = stage.create_group(NodeOptions::default());
        let root = stage.root();
        stage.add(root, g);
    }

    #[test]
    #[should_panic(expected = "own subtree")]
    fn cycles_panic() {
        let (mut stage, layer, _) = stage();
        let a = stage.create_group(NodeOptions::default());
        let b = stage.create_group(NodeOptions::default());
        stage.add(layer, a);
        stage.add(a, b);
        stage.add(b, a);
    }

    #[test]
    #[should_panic(expected = "stale NodeId")]
    fn destroyed_handle_panics() {
        let (mut stage, layer, _) = stage();
        let g = stage.create_group(NodeOptions::default());
        stage.add(layer, g);
        stage.destroy(g);
        stage.node_mut(g).x(1.0);
    }

    #[test]
    #[should_panic(expected = "not a layer")]
    fn batch_draw_on_group_panics() {
        let (mut stage, _, _) = stage();
        let g = stage.create_group(NodeOptions::default());
        stage.batch_draw(g);
    }
}
