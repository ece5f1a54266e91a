// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The stage: root of the node tree, owner of layers and their surfaces.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::cmp::Ordering;

use kurbo::{Point, Size};

use super::draw::DrawStats;
use super::evaluate::SceneChanges;
use super::handle::NodeMut;
use super::id::{NodeId, NodeKind};
use super::options::{Affected, LayerOptions, NodeOptions, NodePatch, StageOptions};
use super::store::NodeStore;
use super::traverse::{Ancestors, Children, Descendants, NodeRef};
use crate::frame::{FrameRequestId, FrameScheduler, FrameTick};
use crate::shape::Shape;
use crate::surface::Surface;
#[cfg(feature = "trace-rich")]
use crate::trace::{NodeChange, NodeField};
use crate::trace::{
    EvaluateEvent, FrameSummary, FrameSummaryBuilder, FrameTickEvent, LayerDrawEvent, Tracer,
};
use crate::transform::Transformer;

/// A layer node and the surface it draws into.
#[derive(Debug)]
struct LayerSlot<S> {
    node: NodeId,
    surface: S,
    clear_before_draw: bool,
    draw_pending: bool,
    request: Option<FrameRequestId>,
}

/// The root of a scene.
///
/// A stage owns every node (in a [`NodeStore`]) and one surface per layer.
/// The tree always has the shape
///
/// ```text
/// Stage
/// ├── Layer ── surface
/// │   ├── Group
/// │   │   └── Shape
/// │   └── Shape
/// └── Layer ── surface
///     └── ...
/// ```
///
/// Writes never draw. They mark the node's derived state dirty and, when the
/// node's `auto_draw` option is set, call [`batch_draw`](Self::batch_draw)
/// on its layer. A burst of writes therefore costs one frame request per
/// layer; the host answers it by calling [`run_frame`](Self::run_frame).
///
/// # Panics
///
/// Structural misuse is a programmer error and panics: using a destroyed
/// [`NodeId`], adding children to a shape, adding anything but a layer to
/// the stage, adding a layer anywhere else, or adding a node to its own
/// subtree.
pub struct Stage<S: Surface> {
    store: NodeStore,
    root: NodeId,
    layers: Vec<LayerSlot<S>>,
    scheduler: Box<dyn FrameScheduler>,
    changes: SceneChanges,
    coalesced: u32,
}

impl<S: Surface + core::fmt::Debug> core::fmt::Debug for Stage<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Stage")
            .field("store", &self.store)
            .field("root", &self.root)
            .field("layers", &self.layers)
            .field("changes", &self.changes)
            .field("coalesced", &self.coalesced)
            .finish_non_exhaustive()
    }
}

impl<S: Surface> Stage<S> {
    /// Creates a stage with no layers.
    pub fn new(options: StageOptions, scheduler: impl FrameScheduler + 'static) -> Self {
        let mut store = NodeStore::new();
        let root = store.create(
            NodeKind::Stage,
            NodeOptions {
                width: Some(options.size.width),
                height: Some(options.size.height),
                ..NodeOptions::default()
            },
            None,
        );
        Self {
            store,
            root,
            layers: Vec::new(),
            scheduler: Box::new(scheduler),
            changes: SceneChanges::default(),
            coalesced: 0,
        }
    }

    /// The stage node.
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Read access to every node.
    #[must_use]
    pub fn nodes(&self) -> &NodeStore {
        &self.store
    }

    /// The stage size.
    #[must_use]
    pub fn size(&self) -> Size {
        let options = self.store.options(self.root);
        Size::new(
            options.width.unwrap_or(0.0),
            options.height.unwrap_or(0.0),
        )
    }

    // -- Construction --

    /// Adds a layer drawing into `surface` as the last child of the stage.
    ///
    /// The surface is resized to the layer size.
    pub fn add_layer(&mut self, mut surface: S, options: LayerOptions) -> NodeId {
        let size = options.size.unwrap_or_else(|| self.size());
        surface.set_size(size);
        let node = self.store.create(
            NodeKind::Layer,
            NodeOptions {
                width: Some(size.width),
                height: Some(size.height),
                ..options.node
            },
            None,
        );
        let _ = self.store.attach(self.root, node);
        self.layers.push(LayerSlot {
            node,
            surface,
            clear_before_draw: options.clear_before_draw,
            draw_pending: false,
            request: None,
        });
        node
    }

    /// Creates a detached group.
    pub fn create_group(&mut self, options: NodeOptions) -> NodeId {
        self.store.create(NodeKind::Group, options, None)
    }

    /// Creates a detached shape.
    pub fn create_shape(&mut self, shape: impl Into<Shape>, options: NodeOptions) -> NodeId {
        self.store.create(NodeKind::Shape, options, Some(shape.into()))
    }

    // -- Topology --

    /// Appends `child` to `parent`'s children.
    ///
    /// A child parented elsewhere is moved. Adding a current child again
    /// does nothing.
    ///
    /// # Panics
    ///
    /// Panics on stale handles and on the structural misuse listed on
    /// [`Stage`].
    pub fn add(&mut self, parent: NodeId, child: NodeId) {
        self.store.validate(parent);
        self.store.validate(child);
        let parent_kind = self.store.kind(parent);
        let child_kind = self.store.kind(child);
        assert!(
            parent_kind.is_container(),
            "cannot add children to a shape: {parent:?}"
        );
        assert!(
            child_kind != NodeKind::Stage,
            "the stage cannot be added to a container"
        );
        assert!(
            (parent_kind == NodeKind::Stage) == (child_kind == NodeKind::Layer),
            "layers belong directly to the stage and only layers may be added to it: \
             {child_kind:?} into {parent_kind:?}"
        );
        assert!(
            !self.store.is_ancestor_or_self(child.idx, parent.idx),
            "cannot add a node to its own subtree: {child:?} into {parent:?}"
        );

        let old_layer = self.store.layer_of(child);
        if let Some(old) = self.store.attach(parent, child)
            && let Some(old) = self.store.handle(old)
        {
            self.request_draw_of(old, old_layer);
        }
        self.request_draw(child);
    }

    /// Appends every node of `children` to `parent`, in order.
    ///
    /// # Panics
    ///
    /// As [`add`](Self::add).
    pub fn add_all(&mut self, parent: NodeId, children: impl IntoIterator<Item = NodeId>) {
        for child in children {
            self.add(parent, child);
        }
    }

    /// Detaches `id` from its parent, if it has one.
    ///
    /// The node and its subtree stay alive and can be added again. A removed
    /// layer keeps its surface but stops drawing, and its pending frame
    /// request is cancelled, until it is added back to the stage.
    pub fn remove(&mut self, id: NodeId) {
        self.store.validate(id);
        let Some(parent) = self.store.parent(id) else {
            return;
        };
        let layer = self.store.layer_of(parent);
        let _ = self.store.detach(id);
        if self.store.kind(id) == NodeKind::Layer {
            let idx = self.slot_index(id);
            let slot = &mut self.layers[idx];
            slot.draw_pending = false;
            if let Some(request) = slot.request.take() {
                self.scheduler.cancel_frame(request);
            }
        }
        self.request_draw_of(parent, layer);
    }

    /// Detaches each of `children` that is a child of `parent`.
    pub fn remove_children(&mut self, parent: NodeId, children: impl IntoIterator<Item = NodeId>) {
        for child in children {
            if self.store.parent(child) == Some(parent) {
                self.remove(child);
            }
        }
    }

    /// Detaches every child of `parent`.
    pub fn remove_all_children(&mut self, parent: NodeId) {
        let children: Vec<NodeId> = self.store.children(parent).collect();
        self.remove_children(parent, children);
    }

    /// Reorders `parent`'s children with a stable sort.
    pub fn sort_children(
        &mut self,
        parent: NodeId,
        mut compare: impl FnMut(NodeRef<'_>, NodeRef<'_>) -> Ordering,
    ) {
        let mut order: Vec<NodeId> = self.store.children(parent).collect();
        let store = &self.store;
        order.sort_by(|&a, &b| compare(NodeRef::new(store, a), NodeRef::new(store, b)));
        let order: Vec<u32> = order.iter().map(|id| id.idx).collect();
        self.store.relink_children(parent.idx, &order);
        self.request_draw(parent);
    }

    /// Reorders `parent`'s children by shape z-index, keeping insertion
    /// order among equals. Containers count as z-index `0`.
    pub fn sort_children_by_z_index(&mut self, parent: NodeId) {
        self.sort_children(parent, |a, b| a.z_index().cmp(&b.z_index()));
    }

    /// Destroys `id` and its whole subtree. Handles into it become stale.
    ///
    /// Destroying a layer drops its surface and cancels its pending frame
    /// request.
    ///
    /// # Panics
    ///
    /// Panics if `id` is the stage or stale.
    pub fn destroy(&mut self, id: NodeId) {
        assert!(id != self.root, "cannot destroy the stage");
        self.store.validate(id);
        if let Some(parent) = self.store.parent(id) {
            let layer = self.store.layer_of(parent);
            self.request_draw_of(parent, layer);
        }
        let freed = self.store.destroy_subtree(id);
        let scheduler = &mut self.scheduler;
        self.layers.retain(|slot| {
            if !freed.contains(&slot.node.idx) {
                return true;
            }
            if let Some(request) = slot.request {
                scheduler.cancel_frame(request);
            }
            false
        });
    }

    // -- Options --

    /// Returns a handle with chaining setters for one node.
    #[must_use = "setters are applied through the returned handle"]
    pub fn node_mut(&mut self, id: NodeId) -> NodeMut<'_, S> {
        self.store.validate(id);
        NodeMut::new(self, id)
    }

    /// Applies a partial update.
    pub fn set(&mut self, id: NodeId, patch: NodePatch) {
        let affected = patch.apply(self.store.options_mut(id));
        self.store.mark(id, affected);
        self.request_draw(id);
    }

    /// Mutates the options in place.
    ///
    /// Every derived value of the node is recomputed.
    pub fn update(&mut self, id: NodeId, f: impl FnOnce(&mut NodeOptions)) {
        f(self.store.options_mut(id));
        self.store.mark(id, Affected::ALL);
        self.request_draw(id);
    }

    /// Mutates the shape payload of a shape node.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not a shape.
    pub fn update_shape(&mut self, id: NodeId, f: impl FnOnce(&mut Shape)) {
        let Some(shape) = self.store.shape_mut(id) else {
            panic!("not a shape: {id:?}");
        };
        f(shape);
        self.store.mark(
            id,
            Affected {
                content: true,
                ..Affected::default()
            },
        );
        self.request_draw(id);
    }

    /// Returns a node's options.
    #[must_use]
    pub fn options(&self, id: NodeId) -> &NodeOptions {
        self.store.options(id)
    }

    /// Returns a shape node's payload.
    #[must_use]
    pub fn shape(&self, id: NodeId) -> Option<&Shape> {
        self.store.shape(id)
    }

    /// Returns the node's transform relative to the stage.
    ///
    /// Evaluates pending changes first, recomputing only dirty nodes.
    pub fn absolute_transform(&mut self, id: NodeId) -> Transformer {
        self.store.validate(id);
        self.store.evaluate_into(&mut self.changes);
        self.store.cached_absolute_transform(id)
    }

    // -- Reads --

    /// Returns the parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.store.parent(id)
    }

    /// Returns an iterator over the children of a node.
    #[must_use]
    pub fn children(&self, id: NodeId) -> Children<'_> {
        self.store.children(id)
    }

    /// Returns an iterator from a node up to the root.
    #[must_use]
    pub fn ancestors(&self, id: NodeId, include_self: bool) -> Ancestors<'_> {
        self.store.ancestors(id, include_self)
    }

    /// Returns a pre-order iterator over a subtree.
    #[must_use]
    pub fn descendants(&self, id: NodeId, include_self: bool) -> Descendants<'_> {
        self.store.descendants(id, include_self)
    }

    /// Calls `f` for every node of a subtree, in pre-order.
    pub fn each(&self, id: NodeId, include_self: bool, f: impl FnMut(NodeRef<'_>)) {
        self.store.each(id, include_self, f);
    }

    /// Returns the nearest layer at or above `id`.
    #[must_use]
    pub fn layer_of(&self, id: NodeId) -> Option<NodeId> {
        self.store.layer_of(id)
    }

    // -- Layers --

    /// Returns the layers in creation order.
    pub fn layers(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.layers.iter().map(|slot| slot.node)
    }

    /// Returns a layer's surface.
    ///
    /// # Panics
    ///
    /// Panics if `layer` is not a layer.
    #[must_use]
    pub fn surface(&self, layer: NodeId) -> &S {
        &self.slot(layer).surface
    }

    /// Returns a layer's surface mutably.
    ///
    /// # Panics
    ///
    /// Panics if `layer` is not a layer.
    pub fn surface_mut(&mut self, layer: NodeId) -> &mut S {
        &mut self.slot_mut(layer).surface
    }

    /// Resizes a layer and its surface.
    pub fn set_layer_size(&mut self, layer: NodeId, size: Size) {
        self.slot_mut(layer).surface.set_size(size);
        self.set(
            layer,
            NodePatch {
                width: Some(Some(size.width)),
                height: Some(Some(size.height)),
                ..NodePatch::default()
            },
        );
    }

    /// Resizes the stage and every layer.
    pub fn set_size(&mut self, size: Size) {
        {
            let options = self.store.options_mut(self.root);
            options.width = Some(size.width);
            options.height = Some(size.height);
        }
        let layers: Vec<NodeId> = self.layers().collect();
        for layer in layers {
            self.set_layer_size(layer, size);
        }
    }

    /// Schedules one redraw of `layer`.
    ///
    /// While a redraw is pending further calls do nothing, so any number of
    /// calls before the next frame cost a single frame request. A layer
    /// removed from the stage is not scheduled.
    ///
    /// # Panics
    ///
    /// Panics if `layer` is not a layer.
    pub fn batch_draw(&mut self, layer: NodeId) {
        let idx = self.slot_index(layer);
        if self.store.parent(layer).is_none() {
            return;
        }
        let slot = &mut self.layers[idx];
        if slot.draw_pending {
            self.coalesced = self.coalesced.saturating_add(1);
            return;
        }
        slot.draw_pending = true;
        slot.request = Some(self.scheduler.request_frame());
    }

    /// Returns whether a redraw of `layer` is scheduled.
    #[must_use]
    pub fn is_draw_pending(&self, layer: NodeId) -> bool {
        self.slot(layer).draw_pending
    }

    /// Answers an animation frame: evaluates the tree, then clears and draws
    /// every layer with a pending redraw.
    pub fn run_frame(&mut self, tick: FrameTick, tracer: &mut Tracer<'_>) -> FrameSummary {
        let tick_event = FrameTickEvent::from(&tick);
        tracer.frame_tick(&tick_event);
        let mut summary = FrameSummaryBuilder::new(&tick_event);
        summary.set_requests_coalesced(core::mem::take(&mut self.coalesced));

        self.store.evaluate_into(&mut self.changes);
        let changes = core::mem::take(&mut self.changes);
        let evaluate = EvaluateEvent::new(tick.frame_index, &changes);
        tracer.evaluate(&evaluate);
        summary.record_evaluate(&evaluate);

        #[cfg(feature = "trace-rich")]
        if tracer.is_enabled() {
            let node_changes = node_changes(&changes);
            tracer.node_changes(tick.frame_index, &node_changes);
        }

        #[cfg(feature = "trace-rich")]
        let mut layouts = Vec::new();

        for slot in &mut self.layers {
            if !slot.draw_pending {
                continue;
            }
            slot.draw_pending = false;
            slot.request = None;
            let (event, _stats) = draw_layer(&mut self.store, slot, tick.frame_index);
            tracer.layer_draw(&event);
            summary.record_layer(&event);
            #[cfg(feature = "trace-rich")]
            layouts.extend(_stats.layouts);
        }

        #[cfg(feature = "trace-rich")]
        if !layouts.is_empty() {
            tracer.text_layouts(tick.frame_index, &layouts);
        }

        let summary = summary.finish();
        tracer.frame_summary(&summary);
        summary
    }

    /// Draws `layer` immediately, outside the frame cycle.
    ///
    /// A pending redraw stays pending.
    pub fn draw(&mut self, layer: NodeId) -> LayerDrawEvent {
        let idx = self.slot_index(layer);
        self.store.evaluate_into(&mut self.changes);
        draw_layer(&mut self.store, &mut self.layers[idx], 0).0
    }

    // -- Internal helpers --

    /// Schedules a redraw of the layer holding `id`, if `id` wants one.
    fn request_draw(&mut self, id: NodeId) {
        let layer = self.store.layer_of(id);
        self.request_draw_of(id, layer);
    }

    fn request_draw_of(&mut self, id: NodeId, layer: Option<NodeId>) {
        if let Some(layer) = layer
            && self.store.options(id).auto_draw
        {
            self.batch_draw(layer);
        }
    }

    fn slot_index(&self, layer: NodeId) -> usize {
        self.store.validate(layer);
        self.layers
            .iter()
            .position(|slot| slot.node == layer)
            .unwrap_or_else(|| panic!("not a layer: {layer:?}"))
    }

    fn slot(&self, layer: NodeId) -> &LayerSlot<S> {
        &self.layers[self.slot_index(layer)]
    }

    fn slot_mut(&mut self, layer: NodeId) -> &mut LayerSlot<S> {
        let idx = self.slot_index(layer);
        &mut self.layers[idx]
    }
}

fn draw_layer<S: Surface>(
    store: &mut NodeStore,
    slot: &mut LayerSlot<S>,
    frame_index: u64,
) -> (LayerDrawEvent, DrawStats) {
    if slot.clear_before_draw {
        let size = slot.surface.size();
        slot.surface
            .clear_rect(kurbo::Rect::from_origin_size(Point::ORIGIN, size));
    }
    let mut stats = DrawStats::default();
    store.draw_node(slot.node.idx, &mut slot.surface, &mut stats);
    let event = LayerDrawEvent {
        frame_index,
        layer_index: slot.node.idx,
        cleared: slot.clear_before_draw,
        nodes_visited: stats.nodes_visited,
        shapes_painted: stats.shapes_painted,
        text_lines: stats.text_lines,
    };
    (event, stats)
}

#[cfg(feature = "trace-rich")]
fn node_changes(changes: &SceneChanges) -> Vec<NodeChange> {
    let tagged = |ids: &[u32], field: NodeField| {
        ids.iter()
            .map(move |&node_index| NodeChange { node_index, field })
            .collect::<Vec<_>>()
    };
    let mut out = tagged(&changes.transforms, NodeField::Transform);
    out.extend(tagged(&changes.opacities, NodeField::Opacity));
    out.extend(tagged(&changes.content, NodeField::Content));
    out
}
