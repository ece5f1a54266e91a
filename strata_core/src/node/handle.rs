// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chaining setters for one node.

use alloc::string::String;

use kurbo::Vec2;

use super::clip::ClipShape;
use super::id::NodeId;
use super::options::NodePatch;
use super::stage::Stage;
use crate::surface::Surface;

/// Chaining setters for one node, returned by
/// [`Stage::node_mut`](super::Stage::node_mut).
///
/// Every setter is a separate write, with the same redraw scheduling as
/// [`Stage::set`](super::Stage::set):
///
/// ```
/// # use strata_core::frame::ManualScheduler;
/// # use strata_core::node::{NodeOptions, Stage, StageOptions};
/// # use strata_core::shape::Rect;
/// # use strata_core::surface::RecordingSurface;
/// let mut stage: Stage<RecordingSurface> =
///     Stage::new(StageOptions::new(100.0, 100.0), ManualScheduler::new());
/// let rect = stage.create_shape(Rect::new(), NodeOptions::default());
/// stage
///     .node_mut(rect)
///     .position(10.0, 20.0)
///     .size(30.0, 40.0)
///     .fill_style("steelblue");
/// assert_eq!(stage.options(rect).x, 10.0);
/// ```
pub struct NodeMut<'a, S: Surface> {
    stage: &'a mut Stage<S>,
    id: NodeId,
}

impl<S: Surface> core::fmt::Debug for NodeMut<'_, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("NodeMut").field("id", &self.id).finish_non_exhaustive()
    }
}

impl<'a, S: Surface> NodeMut<'a, S> {
    pub(crate) fn new(stage: &'a mut Stage<S>, id: NodeId) -> Self {
        Self { stage, id }
    }

    /// The node being edited.
    #[must_use]
    pub fn node_id(&self) -> NodeId {
        self.id
    }

    /// Applies a partial update.
    pub fn patch(self, patch: NodePatch) -> Self {
        self.stage.set(self.id, patch);
        self
    }

    fn with(self, f: impl FnOnce(&mut NodePatch)) -> Self {
        let mut patch = NodePatch::default();
        f(&mut patch);
        self.patch(patch)
    }

    /// Sets the horizontal position.
    pub fn x(self, x: f64) -> Self {
        self.with(|p| p.x = Some(x))
    }

    /// Sets the vertical position.
    pub fn y(self, y: f64) -> Self {
        self.with(|p| p.y = Some(y))
    }

    /// Sets both coordinates.
    pub fn position(self, x: f64, y: f64) -> Self {
        self.with(|p| {
            p.x = Some(x);
            p.y = Some(y);
        })
    }

    /// Sets the box width.
    pub fn width(self, width: f64) -> Self {
        self.with(|p| p.width = Some(Some(width)))
    }

    /// Sets the box height.
    pub fn height(self, height: f64) -> Self {
        self.with(|p| p.height = Some(Some(height)))
    }

    /// Sets the box size.
    pub fn size(self, width: f64, height: f64) -> Self {
        self.with(|p| {
            p.width = Some(Some(width));
            p.height = Some(Some(height));
        })
    }

    /// Sets both scale factors.
    pub fn scale(self, sx: f64, sy: f64) -> Self {
        self.with(|p| p.scale = Some(Vec2::new(sx, sy)))
    }

    /// Sets the horizontal scale factor.
    pub fn scale_x(self, sx: f64) -> Self {
        let sy = self.stage.options(self.id).scale.y;
        self.scale(sx, sy)
    }

    /// Sets the vertical scale factor.
    pub fn scale_y(self, sy: f64) -> Self {
        let sx = self.stage.options(self.id).scale.x;
        self.scale(sx, sy)
    }

    /// Sets the rotation in radians.
    pub fn rotation(self, radians: f64) -> Self {
        self.with(|p| p.rotation = Some(radians))
    }

    /// Sets the rotation in degrees.
    pub fn rotation_deg(self, degrees: f64) -> Self {
        self.rotation(degrees.to_radians())
    }

    /// Sets the horizontal skew.
    pub fn skew_x(self, kx: f64) -> Self {
        let ky = self.stage.options(self.id).skew.y;
        self.with(|p| p.skew = Some(Vec2::new(kx, ky)))
    }

    /// Sets the vertical skew.
    pub fn skew_y(self, ky: f64) -> Self {
        let kx = self.stage.options(self.id).skew.x;
        self.with(|p| p.skew = Some(Vec2::new(kx, ky)))
    }

    /// Sets both offset components.
    pub fn offset(self, ox: f64, oy: f64) -> Self {
        self.with(|p| p.offset = Some(Vec2::new(ox, oy)))
    }

    /// Sets the horizontal offset.
    pub fn offset_x(self, ox: f64) -> Self {
        let oy = self.stage.options(self.id).offset.y;
        self.offset(ox, oy)
    }

    /// Sets the vertical offset.
    pub fn offset_y(self, oy: f64) -> Self {
        let ox = self.stage.options(self.id).offset.x;
        self.offset(ox, oy)
    }

    /// Sets the opacity.
    pub fn opacity(self, opacity: f64) -> Self {
        self.with(|p| p.opacity = Some(opacity))
    }

    /// Shows or hides the node and its subtree.
    pub fn visible(self, visible: bool) -> Self {
        self.with(|p| p.visible = Some(visible))
    }

    /// Sets whether the node takes part in hit testing.
    pub fn listening(self, listening: bool) -> Self {
        self.with(|p| p.listening = Some(listening))
    }

    /// Sets whether the node can be dragged.
    pub fn draggable(self, draggable: bool) -> Self {
        self.with(|p| p.draggable = Some(draggable))
    }

    /// Sets the drag threshold.
    pub fn drag_distance(self, distance: f64) -> Self {
        self.with(|p| p.drag_distance = Some(distance))
    }

    /// Sets whether writes schedule redraws.
    pub fn auto_draw(self, auto_draw: bool) -> Self {
        self.with(|p| p.auto_draw = Some(auto_draw))
    }

    /// Sets the application identifier.
    pub fn id(self, id: impl Into<String>) -> Self {
        let id = id.into();
        self.with(|p| p.id = Some(Some(id)))
    }

    /// Sets the name.
    pub fn name(self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.with(|p| p.name = Some(Some(name)))
    }

    /// Sets the tag.
    pub fn tag(self, tag: impl Into<String>) -> Self {
        let tag = tag.into();
        self.with(|p| p.tag = Some(Some(tag)))
    }

    /// Sets or clears the clip region.
    pub fn clip(self, clip: Option<ClipShape>) -> Self {
        self.with(|p| p.clip = Some(clip))
    }

    /// Sets the fill style of a shape.
    ///
    /// # Panics
    ///
    /// Panics if the node is not a shape.
    pub fn fill_style(self, color: impl Into<String>) -> Self {
        let color = color.into();
        self.stage
            .update_shape(self.id, |s| s.style.fill_style = Some(color));
        self
    }

    /// Sets the stroke style of a shape.
    ///
    /// # Panics
    ///
    /// Panics if the node is not a shape.
    pub fn stroke_style(self, color: impl Into<String>) -> Self {
        let color = color.into();
        self.stage
            .update_shape(self.id, |s| s.style.stroke_style = Some(color));
        self
    }

    /// Sets the stroke width of a shape.
    ///
    /// # Panics
    ///
    /// Panics if the node is not a shape.
    pub fn line_width(self, width: f64) -> Self {
        self.stage
            .update_shape(self.id, |s| s.style.line_width = Some(width));
        self
    }

    /// Sets the z-index of a shape.
    ///
    /// # Panics
    ///
    /// Panics if the node is not a shape.
    pub fn z_index(self, z_index: i32) -> Self {
        self.stage
            .update_shape(self.id, |s| s.style.z_index = z_index);
        self
    }

    /// Replaces the text of a text shape.
    ///
    /// # Panics
    ///
    /// Panics if the node is not a text shape.
    pub fn text(self, text: impl Into<String>) -> Self {
        let text = text.into();
        let id = self.id;
        self.stage.update_shape(id, |s| {
            let Some(t) = s.as_text_mut() else {
                panic!("not a text shape: {id:?}");
            };
            t.text = Some(text);
        });
        self
    }
}
