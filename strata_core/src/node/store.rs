// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Struct-of-arrays node storage with allocation, topology, and option
//! management.

use alloc::vec::Vec;

use understory_dirty::{CycleHandling, DirtyTracker, EagerPolicy};

use super::id::{INVALID, NodeId, NodeKind};
use super::options::{Affected, NodeOptions};
use super::traverse::{Ancestors, Children, Descendants, NodeRef};
use crate::dirty;
use crate::shape::Shape;
use crate::text::TextLayout;
use crate::transform::Transformer;

/// Struct-of-arrays storage for every node of a [`Stage`](super::Stage).
///
/// Nodes are addressed by [`NodeId`] handles. Each node occupies a slot in
/// parallel arrays; destroyed nodes are recycled via a free list, and
/// generation counters make stale handles panic instead of aliasing a new
/// node.
///
/// The store is read through [`Stage::nodes`](super::Stage::nodes). All
/// mutation goes through the [`Stage`](super::Stage), which schedules
/// redraws.
#[derive(Debug)]
pub struct NodeStore {
    // -- Topology --
    pub(crate) parent: Vec<u32>,
    pub(crate) first_child: Vec<u32>,
    pub(crate) next_sibling: Vec<u32>,
    pub(crate) prev_sibling: Vec<u32>,

    // -- Local state (set by callers) --
    pub(crate) kind: Vec<NodeKind>,
    pub(crate) options: Vec<NodeOptions>,
    pub(crate) shape: Vec<Option<Shape>>,

    // -- Computed state (written by evaluate and draw) --
    pub(crate) absolute_transform: Vec<Transformer>,
    pub(crate) effective_opacity: Vec<f64>,
    pub(crate) effective_hidden: Vec<bool>,
    pub(crate) text_layout: Vec<Option<TextLayout>>,

    // -- Allocation --
    pub(crate) generation: Vec<u32>,
    pub(crate) free_list: Vec<u32>,
    pub(crate) len: u32,

    // -- Dirty tracking --
    pub(crate) dirty: DirtyTracker<u32>,

    // -- Traversal cache --
    pub(crate) traversal_order: Vec<u32>,
    pub(crate) traversal_dirty: bool,
}

impl NodeStore {
    /// Creates an empty store.
    pub(crate) fn new() -> Self {
        Self {
            parent: Vec::new(),
            first_child: Vec::new(),
            next_sibling: Vec::new(),
            prev_sibling: Vec::new(),
            kind: Vec::new(),
            options: Vec::new(),
            shape: Vec::new(),
            absolute_transform: Vec::new(),
            effective_opacity: Vec::new(),
            effective_hidden: Vec::new(),
            text_layout: Vec::new(),
            generation: Vec::new(),
            free_list: Vec::new(),
            len: 0,
            dirty: DirtyTracker::with_cycle_handling(CycleHandling::Error),
            traversal_order: Vec::new(),
            traversal_dirty: true,
        }
    }

    // -- Allocation --

    /// Creates a detached node and returns its handle.
    pub(crate) fn create(
        &mut self,
        kind: NodeKind,
        options: NodeOptions,
        shape: Option<Shape>,
    ) -> NodeId {
        let idx = if let Some(idx) = self.free_list.pop() {
            // Reuse a freed slot; the generation was bumped on destroy.
            let i = idx as usize;
            self.parent[i] = INVALID;
            self.first_child[i] = INVALID;
            self.next_sibling[i] = INVALID;
            self.prev_sibling[i] = INVALID;
            self.kind[i] = kind;
            self.options[i] = options;
            self.shape[i] = shape;
            self.absolute_transform[i] = Transformer::IDENTITY;
            self.effective_opacity[i] = 1.0;
            self.effective_hidden[i] = false;
            self.text_layout[i] = None;
            idx
        } else {
            let idx = self.len;
            self.len += 1;
            self.parent.push(INVALID);
            self.first_child.push(INVALID);
            self.next_sibling.push(INVALID);
            self.prev_sibling.push(INVALID);
            self.kind.push(kind);
            self.options.push(options);
            self.shape.push(shape);
            self.absolute_transform.push(Transformer::IDENTITY);
            self.effective_opacity.push(1.0);
            self.effective_hidden.push(false);
            self.text_layout.push(None);
            self.generation.push(0);
            idx
        };

        self.mark_inherited(idx);
        self.traversal_dirty = true;
        self.dirty.mark(idx, dirty::TOPOLOGY);

        NodeId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    /// Detaches `id`, then frees it and its whole subtree.
    ///
    /// Returns the freed slot indices, children before parents.
    pub(crate) fn destroy_subtree(&mut self, id: NodeId) -> Vec<u32> {
        self.validate(id);
        if self.parent[id.idx as usize] != INVALID {
            self.detach(id);
        }
        let mut freed = Vec::new();
        self.free_recursive(id.idx, &mut freed);
        self.traversal_dirty = true;
        freed
    }

    fn free_recursive(&mut self, idx: u32, freed: &mut Vec<u32>) {
        let mut child = self.first_child[idx as usize];
        while child != INVALID {
            let next = self.next_sibling[child as usize];
            self.free_recursive(child, freed);
            child = next;
        }

        let i = idx as usize;
        self.parent[i] = INVALID;
        self.first_child[i] = INVALID;
        self.next_sibling[i] = INVALID;
        self.prev_sibling[i] = INVALID;
        self.shape[i] = None;
        self.text_layout[i] = None;

        self.dirty.remove_key(idx);
        // Bump generation so old handles immediately fail validation.
        self.generation[i] += 1;
        self.free_list.push(idx);
        freed.push(idx);
    }

    /// Returns whether the given handle refers to a live node.
    #[must_use]
    pub fn is_alive(&self, id: NodeId) -> bool {
        (id.idx < self.len)
            && self.generation[id.idx as usize] == id.generation
            && !self.free_list.contains(&id.idx)
    }

    /// Number of live nodes.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.len as usize - self.free_list.len()
    }

    // -- Topology --

    /// Appends `child` to `parent`'s children, detaching it from any other
    /// parent first.
    ///
    /// Returns the previous parent's slot when the child moved.
    pub(crate) fn attach(&mut self, parent: NodeId, child: NodeId) -> Option<u32> {
        let p = parent.idx;
        let c = child.idx;
        let old = self.parent[c as usize];
        if old == p {
            return None;
        }
        if old != INVALID {
            self.unlink_from_parent(c);
            self.dirty.remove_dependency(c, old, dirty::TRANSFORM);
            self.dirty.remove_dependency(c, old, dirty::OPACITY);
            self.dirty.mark(old, dirty::TOPOLOGY);
        }

        self.parent[c as usize] = p;
        self.prev_sibling[c as usize] = INVALID;
        self.next_sibling[c as usize] = INVALID;

        if self.first_child[p as usize] == INVALID {
            self.first_child[p as usize] = c;
        } else {
            // Walk to last child.
            let mut last = self.first_child[p as usize];
            while self.next_sibling[last as usize] != INVALID {
                last = self.next_sibling[last as usize];
            }
            self.next_sibling[last as usize] = c;
            self.prev_sibling[c as usize] = last;
        }

        // Child depends on parent for TRANSFORM and OPACITY.
        let _ = self.dirty.add_dependency(c, p, dirty::TRANSFORM);
        let _ = self.dirty.add_dependency(c, p, dirty::OPACITY);

        self.mark_inherited(c);
        self.traversal_dirty = true;
        self.dirty.mark(p, dirty::TOPOLOGY);
        (old != INVALID).then_some(old)
    }

    /// Removes `child` from its parent and drops its dependency edges.
    ///
    /// # Panics
    ///
    /// Panics if the node has no parent.
    pub(crate) fn detach(&mut self, child: NodeId) -> u32 {
        let c = child.idx;
        let p = self.parent[c as usize];
        assert!(p != INVALID, "node has no parent");

        self.unlink_from_parent(c);
        self.dirty.remove_dependency(c, p, dirty::TRANSFORM);
        self.dirty.remove_dependency(c, p, dirty::OPACITY);

        self.mark_inherited(c);
        self.traversal_dirty = true;
        self.dirty.mark(p, dirty::TOPOLOGY);
        p
    }

    /// Relinks `parent`'s children in the order given.
    ///
    /// `order` must be a permutation of the current children.
    pub(crate) fn relink_children(&mut self, parent: u32, order: &[u32]) {
        let mut prev = INVALID;
        for &c in order {
            self.prev_sibling[c as usize] = prev;
            if prev == INVALID {
                self.first_child[parent as usize] = c;
            } else {
                self.next_sibling[prev as usize] = c;
            }
            prev = c;
        }
        if prev == INVALID {
            self.first_child[parent as usize] = INVALID;
        } else {
            self.next_sibling[prev as usize] = INVALID;
        }
        self.traversal_dirty = true;
        self.dirty.mark(parent, dirty::TOPOLOGY);
    }

    /// Returns `true` if `ancestor` is `node` or one of its ancestors.
    pub(crate) fn is_ancestor_or_self(&self, ancestor: u32, node: u32) -> bool {
        let mut cur = node;
        while cur != INVALID {
            if cur == ancestor {
                return true;
            }
            cur = self.parent[cur as usize];
        }
        false
    }

    // -- Reads --

    /// Returns what kind of node `id` is.
    #[must_use]
    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.validate(id);
        self.kind[id.idx as usize]
    }

    /// Returns the options of a node.
    #[must_use]
    pub fn options(&self, id: NodeId) -> &NodeOptions {
        self.validate(id);
        &self.options[id.idx as usize]
    }

    /// Returns the shape payload of a shape node.
    #[must_use]
    pub fn shape(&self, id: NodeId) -> Option<&Shape> {
        self.validate(id);
        self.shape[id.idx as usize].as_ref()
    }

    /// Returns the cached text layout of a text node, if it has been drawn
    /// since its content last changed.
    #[must_use]
    pub fn text_layout(&self, id: NodeId) -> Option<&TextLayout> {
        self.validate(id);
        self.text_layout[id.idx as usize].as_ref()
    }

    /// Returns the parent of a node, if any.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.validate(id);
        self.handle(self.parent[id.idx as usize])
    }

    /// Returns an iterator over the direct children of a node, in order.
    #[must_use]
    pub fn children(&self, id: NodeId) -> Children<'_> {
        self.validate(id);
        Children::new(self, self.first_child[id.idx as usize])
    }

    /// Returns an iterator from `id` (or its parent) up to the root.
    #[must_use]
    pub fn ancestors(&self, id: NodeId, include_self: bool) -> Ancestors<'_> {
        self.validate(id);
        let start = if include_self {
            id.idx
        } else {
            self.parent[id.idx as usize]
        };
        Ancestors::new(self, start)
    }

    /// Returns a pre-order iterator over the subtree rooted at `id`.
    #[must_use]
    pub fn descendants(&self, id: NodeId, include_self: bool) -> Descendants<'_> {
        self.validate(id);
        Descendants::new(self, id.idx, include_self)
    }

    /// Calls `f` for every node of the subtree rooted at `id`, in pre-order.
    pub fn each(&self, id: NodeId, include_self: bool, mut f: impl FnMut(NodeRef<'_>)) {
        for node in self.descendants(id, include_self) {
            f(NodeRef::new(self, node));
        }
    }

    /// Returns a read view of a node.
    #[must_use]
    pub fn get(&self, id: NodeId) -> NodeRef<'_> {
        self.validate(id);
        NodeRef::new(self, id)
    }

    /// Returns the nearest layer at or above `id`.
    ///
    /// A layer returns itself; the stage and detached subtrees have none.
    #[must_use]
    pub fn layer_of(&self, id: NodeId) -> Option<NodeId> {
        self.ancestors(id, true)
            .find(|&n| self.kind[n.idx as usize] == NodeKind::Layer)
    }

    /// Returns the absolute transform computed by the last evaluation.
    ///
    /// [`Stage::absolute_transform`](super::Stage::absolute_transform)
    /// evaluates first and is always current.
    #[must_use]
    pub fn cached_absolute_transform(&self, id: NodeId) -> Transformer {
        self.validate(id);
        self.absolute_transform[id.idx as usize]
    }

    /// Returns the opacity after multiplying in every ancestor's opacity.
    ///
    /// Only valid after an evaluation.
    #[must_use]
    pub fn effective_opacity(&self, id: NodeId) -> f64 {
        self.validate(id);
        self.effective_opacity[id.idx as usize]
    }

    /// Returns whether the node or an ancestor is invisible.
    ///
    /// Only valid after an evaluation.
    #[must_use]
    pub fn effective_hidden(&self, id: NodeId) -> bool {
        self.validate(id);
        self.effective_hidden[id.idx as usize]
    }

    // -- Raw-index accessors --
    //
    // These accept raw slot indices (as found in `SceneChanges`) rather than
    // `NodeId` handles, skipping generation validation.

    /// Returns the absolute transform at raw slot `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.len`.
    #[must_use]
    pub fn absolute_transform_at(&self, idx: u32) -> Transformer {
        assert!(
            idx < self.len,
            "slot index {idx} out of range (len {})",
            self.len
        );
        self.absolute_transform[idx as usize]
    }

    /// Returns the options at raw slot `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.len`.
    #[must_use]
    pub fn options_at(&self, idx: u32) -> &NodeOptions {
        assert!(
            idx < self.len,
            "slot index {idx} out of range (len {})",
            self.len
        );
        &self.options[idx as usize]
    }

    // -- Writes --

    pub(crate) fn options_mut(&mut self, id: NodeId) -> &mut NodeOptions {
        self.validate(id);
        &mut self.options[id.idx as usize]
    }

    pub(crate) fn shape_mut(&mut self, id: NodeId) -> Option<&mut Shape> {
        self.validate(id);
        self.shape[id.idx as usize].as_mut()
    }

    /// Marks the channels a write touched.
    pub(crate) fn mark(&mut self, id: NodeId, affected: Affected) {
        if affected.transform {
            self.dirty.mark_with(id.idx, dirty::TRANSFORM, &EagerPolicy);
        }
        if affected.opacity {
            self.dirty.mark_with(id.idx, dirty::OPACITY, &EagerPolicy);
        }
        if affected.content {
            self.dirty.mark(id.idx, dirty::CONTENT);
        }
    }

    // -- Internal helpers --

    /// Panics if the handle is stale.
    pub(crate) fn validate(&self, id: NodeId) {
        assert!(
            id.idx < self.len && self.generation[id.idx as usize] == id.generation,
            "stale NodeId: {id:?} (current gen: {})",
            if id.idx < self.len {
                self.generation[id.idx as usize]
            } else {
                u32::MAX
            }
        );
    }

    /// Builds a handle for a live raw slot, or `None` for [`INVALID`].
    pub(crate) fn handle(&self, idx: u32) -> Option<NodeId> {
        (idx != INVALID).then(|| NodeId {
            idx,
            generation: self.generation[idx as usize],
        })
    }

    /// Removes `idx` from its parent's child list without touching dirty state.
    fn unlink_from_parent(&mut self, idx: u32) {
        let p = self.parent[idx as usize];
        let prev = self.prev_sibling[idx as usize];
        let next = self.next_sibling[idx as usize];

        if prev != INVALID {
            self.next_sibling[prev as usize] = next;
        } else {
            // Was first child.
            self.first_child[p as usize] = next;
        }

        if next != INVALID {
            self.prev_sibling[next as usize] = prev;
        }

        self.parent[idx as usize] = INVALID;
        self.prev_sibling[idx as usize] = INVALID;
        self.next_sibling[idx as usize] = INVALID;
    }

    /// Marks the subtree rooted at `idx` dirty for inherited channels.
    ///
    /// `TRANSFORM` also carries effective visibility.
    fn mark_inherited(&mut self, idx: u32) {
        self.dirty.mark_with(idx, dirty::TRANSFORM, &EagerPolicy);
        self.dirty.mark_with(idx, dirty::OPACITY, &EagerPolicy);
    }
}
