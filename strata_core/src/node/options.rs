// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node, layer and stage configuration.

use alloc::string::String;

use kurbo::{Size, Vec2};

use super::clip::ClipShape;
use crate::transform::Transformer;

/// Per-node options.
///
/// Position, scale, skew, rotation and offset make up the local transform
/// (see [`local_transform`](Self::local_transform)). Width and height are
/// the node's box: a rectangle's extent, a text block's wrapping width and
/// line budget.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeOptions {
    /// Application identifier.
    pub id: Option<String>,
    /// Application name.
    pub name: Option<String>,
    /// Application tag.
    pub tag: Option<String>,
    /// Horizontal position in the parent's coordinates.
    pub x: f64,
    /// Vertical position in the parent's coordinates.
    pub y: f64,
    /// Box width.
    pub width: Option<f64>,
    /// Box height.
    pub height: Option<f64>,
    /// Whether the node and its subtree are drawn.
    pub visible: bool,
    /// Whether the node takes part in hit testing.
    pub listening: bool,
    /// Opacity in `0.0..=1.0`, multiplied down the tree.
    pub opacity: f64,
    /// Scale factors.
    pub scale: Vec2,
    /// Rotation in radians.
    pub rotation: f64,
    /// Skew factors.
    pub skew: Vec2,
    /// Added to the position.
    pub offset: Vec2,
    /// Whether the node can be dragged.
    pub draggable: bool,
    /// Pointer travel before a drag starts, in pixels.
    pub drag_distance: f64,
    /// Whether writes to this node schedule a redraw of its layer.
    pub auto_draw: bool,
    /// Clip region for a container's subtree.
    pub clip: Option<ClipShape>,
}

impl Default for NodeOptions {
    fn default() -> Self {
        Self {
            id: None,
            name: None,
            tag: None,
            x: 0.0,
            y: 0.0,
            width: None,
            height: None,
            visible: true,
            listening: true,
            opacity: 1.0,
            scale: Vec2::new(1.0, 1.0),
            rotation: 0.0,
            skew: Vec2::ZERO,
            offset: Vec2::ZERO,
            draggable: false,
            drag_distance: 0.0,
            auto_draw: true,
            clip: None,
        }
    }
}

impl NodeOptions {
    /// Default options at a position.
    #[must_use]
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            ..Self::default()
        }
    }

    /// Returns the options with the box size set.
    #[must_use]
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Returns the options with a name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Composes the local transform: scale, then skew, then rotation, then
    /// translation by position plus offset.
    #[must_use]
    pub fn local_transform(&self) -> Transformer {
        let mut t = Transformer::new();
        t.scale(self.scale.x, self.scale.y)
            .skew(self.skew.x, self.skew.y)
            .rotate(self.rotation)
            .translate(self.x + self.offset.x, self.y + self.offset.y);
        t
    }
}

/// Which derived state a write invalidated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Affected {
    pub(crate) transform: bool,
    pub(crate) opacity: bool,
    pub(crate) content: bool,
}

impl Affected {
    pub(crate) const ALL: Self = Self {
        transform: true,
        opacity: true,
        content: true,
    };
}

/// A partial update of [`NodeOptions`].
///
/// Fields left `None` are unchanged. Optional options take a nested
/// `Option`, so `width: Some(None)` clears the width.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodePatch {
    /// See [`NodeOptions::id`].
    pub id: Option<Option<String>>,
    /// See [`NodeOptions::name`].
    pub name: Option<Option<String>>,
    /// See [`NodeOptions::tag`].
    pub tag: Option<Option<String>>,
    /// See [`NodeOptions::x`].
    pub x: Option<f64>,
    /// See [`NodeOptions::y`].
    pub y: Option<f64>,
    /// See [`NodeOptions::width`].
    pub width: Option<Option<f64>>,
    /// See [`NodeOptions::height`].
    pub height: Option<Option<f64>>,
    /// See [`NodeOptions::visible`].
    pub visible: Option<bool>,
    /// See [`NodeOptions::listening`].
    pub listening: Option<bool>,
    /// See [`NodeOptions::opacity`].
    pub opacity: Option<f64>,
    /// See [`NodeOptions::scale`].
    pub scale: Option<Vec2>,
    /// See [`NodeOptions::rotation`].
    pub rotation: Option<f64>,
    /// See [`NodeOptions::skew`].
    pub skew: Option<Vec2>,
    /// See [`NodeOptions::offset`].
    pub offset: Option<Vec2>,
    /// See [`NodeOptions::draggable`].
    pub draggable: Option<bool>,
    /// See [`NodeOptions::drag_distance`].
    pub drag_distance: Option<f64>,
    /// See [`NodeOptions::auto_draw`].
    pub auto_draw: Option<bool>,
    /// See [`NodeOptions::clip`].
    pub clip: Option<Option<ClipShape>>,
}

impl NodePatch {
    /// Writes the set fields into `options`.
    pub(crate) fn apply(self, options: &mut NodeOptions) -> Affected {
        let mut affected = Affected::default();

        affected.transform |= set(&mut options.x, self.x);
        affected.transform |= set(&mut options.y, self.y);
        affected.transform |= set(&mut options.visible, self.visible);
        affected.transform |= set(&mut options.scale, self.scale);
        affected.transform |= set(&mut options.rotation, self.rotation);
        affected.transform |= set(&mut options.skew, self.skew);
        affected.transform |= set(&mut options.offset, self.offset);
        affected.opacity |= set(&mut options.opacity, self.opacity);
        affected.content |= set(&mut options.width, self.width);
        affected.content |= set(&mut options.height, self.height);

        set(&mut options.id, self.id);
        set(&mut options.name, self.name);
        set(&mut options.tag, self.tag);
        set(&mut options.listening, self.listening);
        set(&mut options.draggable, self.draggable);
        set(&mut options.drag_distance, self.drag_distance);
        set(&mut options.auto_draw, self.auto_draw);
        set(&mut options.clip, self.clip);

        affected
    }

    /// Returns `true` if no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Writes `value` into `slot` if present and reports whether it did.
fn set<T>(slot: &mut T, value: Option<T>) -> bool {
    match value {
        Some(value) => {
            *slot = value;
            true
        }
        None => false,
    }
}

/// Options for [`Stage::new`](super::Stage::new).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StageOptions {
    /// Stage size; layers default to it.
    pub size: Size,
}

impl StageOptions {
    /// A stage of the given size.
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self {
            size: Size::new(width, height),
        }
    }
}

/// Options for [`Stage::add_layer`](super::Stage::add_layer).
#[derive(Clone, Debug, PartialEq)]
pub struct LayerOptions {
    /// Whether the surface is cleared before each draw.
    pub clear_before_draw: bool,
    /// Surface size; the stage size when `None`.
    pub size: Option<Size>,
    /// Options of the layer node itself.
    pub node: NodeOptions,
}

impl Default for LayerOptions {
    fn default() -> Self {
        Self {
            clear_before_draw: true,
            size: None,
            node: NodeOptions::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn default_local_transform_is_identity() {
        assert!(NodeOptions::default().local_transform().is_identity());
    }

    #[test]
    fn position_and_offset_translate() {
        let opts = NodeOptions {
            offset: Vec2::new(-2.0, 3.0),
            ..NodeOptions::at(10.0, 20.0)
        };
        let [a, b, c, d, e, f] = opts.local_transform().matrix_values();
        assert_eq!([a, b, c, d], [1.0, 0.0, 0.0, 1.0]);
        assert!((e - 8.0).abs() < EPS);
        assert!((f - 23.0).abs() < EPS);
    }

    #[test]
    fn scale_applies_before_translation() {
        let opts = NodeOptions {
            scale: Vec2::new(2.0, 3.0),
            ..NodeOptions::at(5.0, 5.0)
        };
        let p = opts.local_transform().apply(kurbo::Point::new(1.0, 1.0));
        assert!((p.x - 7.0).abs() < EPS);
        assert!((p.y - 8.0).abs() < EPS);
    }

    #[test]
    fn patch_reports_affected_channels() {
        let mut opts = NodeOptions::default();
        let affected = NodePatch {
            x: Some(4.0),
            opacity: Some(0.5),
            name: Some(Some("n".into())),
            ..NodePatch::default()
        }
        .apply(&mut opts);
        assert_eq!(
            affected,
            Affected {
                transform: true,
                opacity: true,
                content: false,
            }
        );
        assert_eq!(opts.x, 4.0);
        assert_eq!(opts.name.as_deref(), Some("n"));

        let affected = NodePatch {
            width: Some(Some(10.0)),
            ..NodePatch::default()
        }
        .apply(&mut opts);
        assert!(affected.content && !affected.transform);
        assert_eq!(opts.width, Some(10.0));
    }

    #[test]
    fn empty_patch_changes_nothing() {
        let patch = NodePatch::default();
        assert!(patch.is_empty());
        let mut opts = NodeOptions::at(1.0, 2.0);
        assert_eq!(patch.apply(&mut opts), Affected::default());
        assert_eq!(opts, NodeOptions::at(1.0, 2.0));
    }
}
