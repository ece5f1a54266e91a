// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Leaf nodes that paint.
//!
//! A [`Shape`] pairs a [`ShapeStyle`] with one of the concrete kinds
//! ([`Rect`], [`Line`], [`Text`]). Every shape paints the same way:
//!
//! 1. save the surface state and apply the node's absolute transform,
//! 2. apply opacity and the fill / stroke / line-width style,
//! 3. build the kind's path (or lay out text),
//! 4. fill if a fill style is set, then stroke if a stroke style is set,
//! 5. restore.

mod line;
mod rect;
mod text;

use alloc::string::String;

use crate::surface::Surface;
use crate::text::TextLayout;
use crate::transform::Transformer;

pub use line::Line;
pub use rect::Rect;
pub use text::{Text, TextDecoration, VerticalAlign};

/// Errors raised when constructing shapes from malformed input.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ShapeError {
    /// A point list must hold `x, y` pairs.
    #[error("line points must come in x, y pairs, got {0} values")]
    OddPointCount(usize),
}

/// Paint style shared by every shape kind.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ShapeStyle {
    /// CSS color used to fill the path, if any.
    pub fill_style: Option<String>,
    /// CSS color used to stroke the path, if any.
    pub stroke_style: Option<String>,
    /// Stroke width; the surface default when `None`.
    pub line_width: Option<f64>,
    /// Sort key used by
    /// [`Stage::sort_children_by_z_index`](crate::node::Stage::sort_children_by_z_index).
    pub z_index: i32,
}

impl ShapeStyle {
    /// A style that only fills.
    #[must_use]
    pub fn fill(color: impl Into<String>) -> Self {
        Self {
            fill_style: Some(color.into()),
            ..Self::default()
        }
    }

    /// A style that only strokes.
    #[must_use]
    pub fn stroke(color: impl Into<String>, width: f64) -> Self {
        Self {
            stroke_style: Some(color.into()),
            line_width: Some(width),
            ..Self::default()
        }
    }
}

/// The concrete geometry of a shape.
#[derive(Clone, Debug, PartialEq)]
pub enum ShapeKind {
    /// A rectangle covering the node's box.
    Rect(Rect),
    /// A polyline.
    Line(Line),
    /// A block of text.
    Text(Text),
}

/// A paintable leaf node payload.
#[derive(Clone, Debug, PartialEq)]
pub struct Shape {
    /// Fill, stroke and ordering.
    pub style: ShapeStyle,
    /// Geometry.
    pub kind: ShapeKind,
}

impl Shape {
    /// Creates a shape with the given style.
    #[must_use]
    pub fn new(kind: impl Into<ShapeKind>, style: ShapeStyle) -> Self {
        Self {
            style,
            kind: kind.into(),
        }
    }

    /// Returns the text payload, if this is a text shape.
    #[must_use]
    pub fn as_text(&self) -> Option<&Text> {
        match &self.kind {
            ShapeKind::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Returns the text payload mutably, if this is a text shape.
    pub fn as_text_mut(&mut self) -> Option<&mut Text> {
        match &mut self.kind {
            ShapeKind::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Paints the shape onto `surface`.
    ///
    /// `text_cache` holds the text layout from a previous paint; it is
    /// filled in when empty.
    pub(crate) fn paint(
        &self,
        surface: &mut dyn Surface,
        ctx: &PaintContext,
        text_cache: &mut Option<TextLayout>,
    ) -> PaintOutcome {
        if let ShapeKind::Text(text) = &self.kind
            && text.is_empty()
        {
            return PaintOutcome::default();
        }

        surface.save();
        surface.set_transform(&ctx.transform);
        if ctx.opacity < 1.0 {
            surface.set_global_alpha(ctx.opacity);
        }
        if let Some(fill) = &self.style.fill_style {
            surface.set_fill_style(fill);
        }
        if let Some(stroke) = &self.style.stroke_style {
            surface.set_stroke_style(stroke);
        }
        if let Some(width) = self.style.line_width {
            surface.set_line_width(width);
        }

        let outcome = match &self.kind {
            ShapeKind::Rect(rect) => {
                surface.begin_path();
                rect.build_path(surface, ctx);
                fill_and_stroke(surface, &self.style);
                PaintOutcome::painted()
            }
            ShapeKind::Line(line) => {
                surface.begin_path();
                line.build_path(surface);
                fill_and_stroke(surface, &self.style);
                PaintOutcome::painted()
            }
            ShapeKind::Text(text) => text.paint(surface, &self.style, ctx, text_cache),
        };

        surface.restore();
        outcome
    }
}

impl From<Rect> for ShapeKind {
    fn from(rect: Rect) -> Self {
        Self::Rect(rect)
    }
}

impl From<Line> for ShapeKind {
    fn from(line: Line) -> Self {
        Self::Line(line)
    }
}

impl From<Text> for ShapeKind {
    fn from(text: Text) -> Self {
        Self::Text(text)
    }
}

impl From<ShapeKind> for Shape {
    fn from(kind: ShapeKind) -> Self {
        Self::new(kind, ShapeStyle::default())
    }
}

impl From<Rect> for Shape {
    fn from(rect: Rect) -> Self {
        Self::new(rect, ShapeStyle::default())
    }
}

impl From<Line> for Shape {
    fn from(line: Line) -> Self {
        Self::new(line, ShapeStyle::default())
    }
}

impl From<Text> for Shape {
    fn from(text: Text) -> Self {
        Self::new(text, ShapeStyle::default())
    }
}

/// Node state a shape needs while painting.
#[derive(Clone, Copy, Debug)]
pub(crate) struct PaintContext {
    pub(crate) transform: Transformer,
    pub(crate) opacity: f64,
    pub(crate) width: Option<f64>,
    pub(crate) height: Option<f64>,
}

/// What a paint call did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct PaintOutcome {
    pub(crate) painted: bool,
    pub(crate) text_lines: u32,
    /// `Some(truncated)` when the text layout was recomputed.
    pub(crate) relayout: Option<bool>,
}

impl PaintOutcome {
    fn painted() -> Self {
        Self {
            painted: true,
            ..Self::default()
        }
    }
}

fn fill_and_stroke(surface: &mut dyn Surface, style: &ShapeStyle) {
    if style.fill_style.is_some() {
        surface.fill();
    }
    if style.stroke_style.is_some() {
        surface.stroke();
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use alloc::vec::Vec;

    use kurbo::{Point, Size};

    use super::*;
    use crate::surface::{DrawCommand, RecordingSurface};

    fn ctx() -> PaintContext {
        let mut transform = Transformer::new();
        transform.translate(10.0, 20.0);
        PaintContext {
            transform,
            opacity: 1.0,
            width: Some(30.0),
            height: Some(40.0),
        }
    }

    #[test]
    fn rect_fills_then_strokes_inside_save_restore() {
        let shape = Shape::new(
            Rect::new(),
            ShapeStyle {
                fill_style: Some("red".into()),
                stroke_style: Some("blue".into()),
                line_width: Some(2.0),
                z_index: 0,
            },
        );
        let mut surface = RecordingSurface::new(Size::new(100.0, 100.0));
        let outcome = shape.paint(&mut surface, &ctx(), &mut None);
        assert!(outcome.painted);

        let mut expected_transform = Transformer::new();
        expected_transform.translate(10.0, 20.0);
        assert_eq!(
            surface.commands(),
            &[
                DrawCommand::Save,
                DrawCommand::SetTransform(expected_transform),
                DrawCommand::FillStyle("red".into()),
                DrawCommand::StrokeStyle("blue".into()),
                DrawCommand::LineWidth(2.0),
                DrawCommand::BeginPath,
                DrawCommand::Rect(kurbo::Rect::new(0.0, 0.0, 30.0, 40.0)),
                DrawCommand::Fill,
                DrawCommand::Stroke,
                DrawCommand::Restore,
            ]
        );
    }

    #[test]
    fn unstyled_shape_builds_path_without_painting() {
        let shape: Shape = Line::new(vec![0.0, 0.0, 5.0, 5.0]).expect("even").into();
        let mut surface = RecordingSurface::default();
        let _ = shape.paint(&mut surface, &ctx(), &mut None);
        let cmds = surface.commands();
        assert!(!cmds.contains(&DrawCommand::Fill));
        assert!(!cmds.contains(&DrawCommand::Stroke));
        assert!(cmds.contains(&DrawCommand::LineTo(Point::new(5.0, 5.0))));
    }

    #[test]
    fn translucent_shape_sets_global_alpha() {
        let shape = Shape::new(Rect::new(), ShapeStyle::fill("black"));
        let mut surface = RecordingSurface::default();
        let mut c = ctx();
        c.opacity = 0.25;
        let _ = shape.paint(&mut surface, &c, &mut None);
        assert!(surface.commands().contains(&DrawCommand::GlobalAlpha(0.25)));
    }

    #[test]
    fn empty_text_short_circuits() {
        let shape = Shape::new(Text::default(), ShapeStyle::fill("black"));
        let mut surface = RecordingSurface::default();
        let outcome = shape.paint(&mut surface, &ctx(), &mut None);
        assert!(!outcome.painted);
        let cmds: Vec<_> = surface.take_commands();
        assert!(cmds.is_empty(), "no commands for empty text, got {cmds:?}");
    }
}
