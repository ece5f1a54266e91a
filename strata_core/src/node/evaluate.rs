// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scene evaluation and change tracking.
//!
//! Evaluation follows a drain-recompute pattern for each dirty channel:
//!
//! 1. **TRANSFORM**: Drain dirty indices, recompute each node's
//!    `absolute_transform` as `local.multiply(parent_absolute)` and
//!    `effective_hidden` as `parent_effective_hidden || !visible`.
//! 2. **OPACITY**: Drain dirty indices, recompute each node's
//!    `effective_opacity` as `parent_effective * opacity`.
//! 3. **CONTENT**: Drain dirty indices and drop cached text layouts.
//! 4. **TOPOLOGY**: Drain and discard (the traversal order was already
//!    rebuilt at the start of evaluation if needed).
//!
//! Draining yields dirty nodes parent-first, so each recomputation reads an
//! up-to-date parent value.

use alloc::vec::Vec;

use super::id::INVALID;
use super::store::NodeStore;
use crate::dirty;
use crate::transform::Transformer;

/// The changes produced by evaluating a [`NodeStore`].
///
/// Each list holds raw slot indices.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SceneChanges {
    /// Nodes whose absolute transform and visibility were recomputed.
    pub transforms: Vec<u32>,
    /// Nodes whose effective opacity was recomputed.
    pub opacities: Vec<u32>,
    /// Nodes whose content changed.
    pub content: Vec<u32>,
    /// Whether the traversal order was rebuilt.
    pub topology_changed: bool,
}

impl SceneChanges {
    /// Clears all change lists.
    pub fn clear(&mut self) {
        self.transforms.clear();
        self.opacities.clear();
        self.content.clear();
        self.topology_changed = false;
    }

    /// Returns `true` if nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
            && self.opacities.is_empty()
            && self.content.is_empty()
            && !self.topology_changed
    }
}

impl NodeStore {
    /// Evaluates the tree, recomputing dirty state and returning the
    /// changes.
    pub(crate) fn evaluate(&mut self) -> SceneChanges {
        let mut changes = SceneChanges::default();
        self.evaluate_into(&mut changes);
        changes
    }

    /// Like [`evaluate`](Self::evaluate), but appends to a caller-provided
    /// buffer, so changes from several evaluations between frames
    /// accumulate.
    pub(crate) fn evaluate_into(&mut self, changes: &mut SceneChanges) {
        if self.traversal_dirty {
            self.rebuild_traversal_order();
            changes.topology_changed = true;
            self.traversal_dirty = false;
        }

        let dirty_transforms: Vec<u32> = self
            .dirty
            .drain(dirty::TRANSFORM)
            .affected()
            .deterministic()
            .run()
            .collect();
        for &idx in &dirty_transforms {
            let i = idx as usize;
            let parent_idx = self.parent[i];
            let (parent_abs, parent_hidden) = if parent_idx != INVALID {
                (
                    self.absolute_transform[parent_idx as usize],
                    self.effective_hidden[parent_idx as usize],
                )
            } else {
                (Transformer::IDENTITY, false)
            };
            let mut absolute = self.options[i].local_transform();
            absolute.multiply(&parent_abs);
            self.absolute_transform[i] = absolute;
            self.effective_hidden[i] = parent_hidden || !self.options[i].visible;
        }
        changes.transforms.extend_from_slice(&dirty_transforms);

        let dirty_opacities: Vec<u32> = self
            .dirty
            .drain(dirty::OPACITY)
            .affected()
            .deterministic()
            .run()
            .collect();
        for &idx in &dirty_opacities {
            let i = idx as usize;
            let parent_opacity = if self.parent[i] != INVALID {
                self.effective_opacity[self.parent[i] as usize]
            } else {
                1.0
            };
            self.effective_opacity[i] = parent_opacity * self.options[i].opacity;
        }
        changes.opacities.extend_from_slice(&dirty_opacities);

        let dirty_content: Vec<u32> = self
            .dirty
            .drain(dirty::CONTENT)
            .deterministic()
            .run()
            .collect();
        for &idx in &dirty_content {
            self.text_layout[idx as usize] = None;
        }
        changes.content.extend_from_slice(&dirty_content);

        // Topology changes are structural; the order was rebuilt above.
        let _: Vec<u32> = self
            .dirty
            .drain(dirty::TOPOLOGY)
            .deterministic()
            .run()
            .collect();
    }

    /// Returns the current traversal order (depth-first pre-order over every
    /// tree in the store).
    ///
    /// Only valid after an evaluation.
    #[must_use]
    pub fn traversal_order(&self) -> &[u32] {
        &self.traversal_order
    }

    /// Rebuilds the depth-first pre-order traversal of all live nodes.
    fn rebuild_traversal_order(&mut self) {
        self.traversal_order.clear();
        for idx in 0..self.len {
            if self.parent[idx as usize] == INVALID && !self.free_list.contains(&idx) {
                self.dfs_collect(idx);
            }
        }
    }

    /// Depth-first pre-order collection starting from `idx`.
    fn dfs_collect(&mut self, idx: u32) {
        self.traversal_order.push(idx);
        let mut child = self.first_child[idx as usize];
        while child != INVALID {
            self.dfs_collect(child);
            child = self.next_sibling[child as usize];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::id::{NodeId, NodeKind};
    use crate::node::options::{Affected, NodeOptions};

    const EPS: f64 = 1e-9;

    fn group(store: &mut NodeStore, options: NodeOptions) -> NodeId {
        store.create(NodeKind::Group, options, None)
    }

    fn translation(store: &NodeStore, id: NodeId) -> (f64, f64) {
        let [.., e, f] = store.cached_absolute_transform(id).matrix_values();
        (e, f)
    }

    #[test]
    fn depth_three_translations_sum() {
        let mut store = NodeStore::new();
        let a = group(&mut store, NodeOptions::at(10.0, 1.0));
        let b = group(
            &mut store,
            NodeOptions {
                offset: kurbo::Vec2::new(5.0, 5.0),
                ..NodeOptions::at(20.0, 2.0)
            },
        );
        let c = group(&mut store, NodeOptions::at(30.0, 3.0));
        let _ = store.attach(a, b);
        let _ = store.attach(b, c);
        let _ = store.evaluate();

        let (x, y) = translation(&store, c);
        assert!((x - 65.0).abs() < EPS, "x = {x}");
        assert!((y - 11.0).abs() < EPS, "y = {y}");
    }

    #[test]
    fn ancestor_change_reaches_descendants() {
        let mut store = NodeStore::new();
        let a = group(&mut store, NodeOptions::default());
        let b = group(&mut store, NodeOptions::at(1.0, 0.0));
        let _ = store.attach(a, b);
        let _ = store.evaluate();

        store.options_mut(a).x = 100.0;
        store.mark(a, Affected { transform: true, ..Affected::default() });
        let changes = store.evaluate();
        assert!(changes.transforms.contains(&b.idx), "child recomputed");
        let (x, _) = translation(&store, b);
        assert!((x - 101.0).abs() < EPS);
    }

    #[test]
    fn parent_scale_scales_child_offset() {
        let mut store = NodeStore::new();
        let a = group(
            &mut store,
            NodeOptions {
                scale: kurbo::Vec2::new(2.0, 2.0),
                ..NodeOptions::default()
            },
        );
        let b = group(&mut store, NodeOptions::at(3.0, 4.0));
        let _ = store.attach(a, b);
        let _ = store.evaluate();
        let p = store
            .cached_absolute_transform(b)
            .apply(kurbo::Point::new(1.0, 0.0));
        assert!((p.x - 8.0).abs() < EPS && (p.y - 8.0).abs() < EPS, "{p:?}");
    }

    #[test]
    fn effective_opacity_multiplies() {
        let mut store = NodeStore::new();
        let a = group(
            &mut store,
            NodeOptions {
                opacity: 0.5,
                ..NodeOptions::default()
            },
        );
        let b = group(
            &mut store,
            NodeOptions {
                opacity: 0.8,
                ..NodeOptions::default()
            },
        );
        let _ = store.attach(a, b);
        let _ = store.evaluate();
        assert!((store.effective_opacity(a) - 0.5).abs() < EPS);
        assert!((store.effective_opacity(b) - 0.4).abs() < EPS);
    }

    #[test]
    fn hidden_ancestor_hides_subtree() {
        let mut store = NodeStore::new();
        let a = group(&mut store, NodeOptions::default());
        let b = group(&mut store, NodeOptions::default());
        let _ = store.attach(a, b);
        let _ = store.evaluate();
        assert!(!store.effective_hidden(b));

        store.options_mut(a).visible = false;
        store.mark(a, Affected { transform: true, ..Affected::default() });
        let _ = store.evaluate();
        assert!(store.effective_hidden(b));
    }

    #[test]
    fn no_change_evaluate_returns_empty() {
        let mut store = NodeStore::new();
        let _ = group(&mut store, NodeOptions::default());
        let _ = store.evaluate();
        assert!(store.evaluate().is_empty());
    }

    #[test]
    fn detached_node_uses_local_transform() {
        let mut store = NodeStore::new();
        let a = group(&mut store, NodeOptions::at(50.0, 0.0));
        let b = group(&mut store, NodeOptions::at(1.0, 0.0));
        let _ = store.attach(a, b);
        let _ = store.evaluate();
        let _ = store.detach(b);
        let _ = store.evaluate();
        assert_eq!(translation(&store, b), (1.0, 0.0));
    }

    #[test]
    fn traversal_order_is_depth_first() {
        let mut store = NodeStore::new();
        let a = group(&mut store, NodeOptions::default());
        let b = group(&mut store, NodeOptions::default());
        let c = group(&mut store, NodeOptions::default());
        let d = group(&mut store, NodeOptions::default());
        // Tree: a -> [b -> [d], c]
        let _ = store.attach(a, b);
        let _ = store.attach(a, c);
        let _ = store.attach(b, d);
        let changes = store.evaluate();
        assert!(changes.topology_changed);
        assert_eq!(store.traversal_order(), &[a.idx, b.idx, d.idx, c.idx]);
    }

    #[test]
    fn content_changes_are_reported() {
        let mut store = NodeStore::new();
        let a = group(&mut store, NodeOptions::default());
        let _ = store.evaluate();
        store.mark(a, Affected { content: true, ..Affected::default() });
        let changes = store.evaluate();
        assert_eq!(changes.content, [a.idx]);
        assert!(changes.transforms.is_empty());
    }
}
