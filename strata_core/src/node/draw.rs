// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Painting a subtree onto a surface.

#[cfg(feature = "trace-rich")]
use alloc::vec::Vec;

use super::id::{INVALID, NodeKind};
use super::store::NodeStore;
use crate::shape::PaintContext;
use crate::surface::Surface;
#[cfg(feature = "trace-rich")]
use crate::trace::TextLayoutRecord;

/// Counts gathered while drawing one layer.
#[derive(Debug, Default)]
pub(crate) struct DrawStats {
    pub(crate) nodes_visited: u32,
    pub(crate) shapes_painted: u32,
    pub(crate) text_lines: u32,
    #[cfg(feature = "trace-rich")]
    pub(crate) layouts: Vec<TextLayoutRecord>,
}

impl NodeStore {
    /// Paints the subtree rooted at `idx`.
    ///
    /// Hidden subtrees are skipped. Containers with a clip wrap their
    /// children in a save / clip / restore. Shapes paint with their
    /// absolute transform and effective opacity, so the surface transform
    /// is never accumulated across nodes.
    ///
    /// Must run after an evaluation.
    pub(crate) fn draw_node(&mut self, idx: u32, surface: &mut dyn Surface, stats: &mut DrawStats) {
        let i = idx as usize;
        if self.effective_hidden[i] {
            return;
        }
        stats.nodes_visited += 1;

        if self.kind[i] == NodeKind::Shape {
            let Some(shape) = &self.shape[i] else {
                return;
            };
            let options = &self.options[i];
            let ctx = PaintContext {
                transform: self.absolute_transform[i],
                opacity: self.effective_opacity[i],
                width: options.width,
                height: options.height,
            };
            let outcome = shape.paint(surface, &ctx, &mut self.text_layout[i]);
            if outcome.painted {
                stats.shapes_painted += 1;
                stats.text_lines += outcome.text_lines;
            }
            #[cfg(feature = "trace-rich")]
            if let (Some(truncated), Some(layout)) = (outcome.relayout, &self.text_layout[i]) {
                stats.layouts.push(TextLayoutRecord {
                    node_index: idx,
                    lines: crate::trace::saturating_len(layout.lines.len()),
                    truncated,
                });
            }
            return;
        }

        let clip = self.options[i].clip;
        if let Some(clip) = clip {
            surface.save();
            surface.set_transform(&self.absolute_transform[i]);
            clip.apply(surface);
        }
        let mut child = self.first_child[i];
        while child != INVALID {
            self.draw_node(child, surface, stats);
            child = self.next_sibling[child as usize];
        }
        if clip.is_some() {
            surface.restore();
        }
    }
}
