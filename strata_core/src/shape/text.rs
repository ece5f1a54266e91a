// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text blocks.

use alloc::string::String;

use kurbo::Point;

use super::{PaintContext, PaintOutcome, ShapeStyle};
use crate::surface::{Direction, Surface, TextAlign, TextBaseline, TextState};
use crate::text::{FontOptions, LayoutConstraints, TextLayout, TextLine, layout_text};
use crate::trace::saturating_len;

/// Vertical placement of a text block inside the node's height.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum VerticalAlign {
    /// Against the top edge.
    #[default]
    Top,
    /// Centered.
    Middle,
    /// Against the bottom edge.
    Bottom,
}

/// Lines drawn across each line of text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TextDecoration {
    /// Below the glyphs.
    pub underline: bool,
    /// Above the glyphs.
    pub overline: bool,
    /// Through the middle of the glyphs.
    pub line_through: bool,
}

impl TextDecoration {
    /// No decoration.
    pub const NONE: Self = Self {
        underline: false,
        overline: false,
        line_through: false,
    };

    /// Underline only.
    pub const UNDERLINE: Self = Self {
        underline: true,
        overline: false,
        line_through: false,
    };

    /// Returns `true` if nothing is drawn.
    #[must_use]
    pub const fn is_none(self) -> bool {
        !(self.underline || self.overline || self.line_through)
    }
}

/// A block of text laid out inside the node's box.
///
/// The node's width, when set, is the wrapping width and its height, when
/// set, bounds the number of lines. Both are reduced by
/// [`padding`](Self::padding) on each side.
///
/// Lines are positioned from the top of the box, so the default
/// [`baseline`](Self::baseline) is [`TextBaseline::Top`].
#[derive(Clone, Debug, PartialEq)]
pub struct Text {
    /// The text. `None` or empty draws nothing.
    pub text: Option<String>,
    /// Font.
    pub font: FontOptions,
    /// Horizontal alignment inside the box.
    pub align: TextAlign,
    /// Vertical alignment inside the box.
    pub vertical_align: VerticalAlign,
    /// Baseline each line is anchored to.
    pub baseline: TextBaseline,
    /// Direction.
    pub direction: Direction,
    /// Extra space between letters, in pixels.
    pub letter_spacing: f64,
    /// Extra space between words, in pixels.
    pub word_spacing: f64,
    /// Inset applied on every side of the box.
    pub padding: f64,
    /// Whether lines wrap at the box width.
    pub wrap: bool,
    /// Whether overflowing text ends in an ellipsis.
    pub ellipsis: bool,
    /// Decoration lines.
    pub decoration: TextDecoration,
}

impl Default for Text {
    fn default() -> Self {
        Self {
            text: None,
            font: FontOptions::default(),
            align: TextAlign::Start,
            vertical_align: VerticalAlign::Top,
            baseline: TextBaseline::Top,
            direction: Direction::Inherit,
            letter_spacing: 0.0,
            word_spacing: 0.0,
            padding: 0.0,
            wrap: true,
            ellipsis: true,
            decoration: TextDecoration::NONE,
        }
    }
}

impl Text {
    /// Creates a text block with default styling.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    /// Returns `true` if there is nothing to draw.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.as_deref().is_none_or(str::is_empty)
    }

    /// The text state applied to the surface before measuring or drawing.
    #[must_use]
    pub fn text_state(&self) -> TextState {
        TextState {
            font: self.font.css(),
            align: self.align,
            baseline: self.baseline,
            direction: self.direction,
            letter_spacing: self.letter_spacing,
            word_spacing: self.word_spacing,
        }
    }

    /// Layout limits for a box of the given size.
    #[must_use]
    pub fn constraints(&self, width: Option<f64>, height: Option<f64>) -> LayoutConstraints {
        let inset = 2.0 * self.padding;
        LayoutConstraints {
            max_width: width.map(|w| (w - inset).max(0.0)),
            max_height: height.map(|h| (h - inset).max(0.0)),
            line_height: self.font.line_height_px(),
            wrap: self.wrap,
            ellipsis: self.ellipsis,
        }
    }

    pub(crate) fn paint(
        &self,
        surface: &mut dyn Surface,
        style: &ShapeStyle,
        ctx: &PaintContext,
        cache: &mut Option<TextLayout>,
    ) -> PaintOutcome {
        let Some(content) = self.text.as_deref() else {
            return PaintOutcome::default();
        };
        surface.set_text_state(&self.text_state());

        let mut relayout = None;
        let layout = cache.get_or_insert_with(|| {
            let constraints = self.constraints(ctx.width, ctx.height);
            let layout = layout_text(content, &constraints, &mut |s: &str| {
                surface.measure_text(s).width
            });
            relayout = Some(layout.truncated);
            layout
        });

        let fill = style.fill_style.is_some();
        let stroke = style.stroke_style.is_some();
        if !(fill || stroke) {
            return PaintOutcome {
                relayout,
                ..PaintOutcome::default()
            };
        }

        let inner_width = ctx
            .width
            .map_or_else(|| layout.width(), |w| w - 2.0 * self.padding);
        let anchor_x = self.padding + align_shift(self.align, inner_width);
        let top = self.padding
            + match (self.vertical_align, ctx.height) {
                (VerticalAlign::Middle, Some(h)) => (h - 2.0 * self.padding - layout.height()) / 2.0,
                (VerticalAlign::Bottom, Some(h)) => h - 2.0 * self.padding - layout.height(),
                _ => 0.0,
            };

        for (i, line) in layout.lines.iter().enumerate() {
            let origin = Point::new(anchor_x, top + i as f64 * layout.line_height);
            if fill {
                surface.fill_text(&line.text, origin);
            }
            if stroke {
                surface.stroke_text(&line.text, origin);
            }
            if !self.decoration.is_none() && !line.text.is_empty() {
                self.decorate(surface, style, line, origin);
            }
        }

        PaintOutcome {
            painted: true,
            text_lines: saturating_len(layout.lines.len()),
            relayout,
        }
    }

    fn decorate(&self, surface: &mut dyn Surface, style: &ShapeStyle, line: &TextLine, origin: Point) {
        let metrics = surface.measure_text(&line.text);
        let left = origin.x - align_shift(self.align, line.width);
        let right = left + line.width;

        if style.stroke_style.is_none()
            && let Some(fill) = &style.fill_style
        {
            surface.set_stroke_style(fill);
        }

        let offsets = [
            (self.decoration.underline, metrics.actual_descent),
            (self.decoration.overline, -metrics.actual_ascent),
            (
                self.decoration.line_through,
                (metrics.actual_descent - metrics.actual_ascent) / 2.0,
            ),
        ];
        for (enabled, dy) in offsets {
            if enabled {
                let y = origin.y + dy;
                surface.begin_path();
                surface.move_to(Point::new(left, y));
                surface.line_to(Point::new(right, y));
                surface.stroke();
            }
        }
    }
}

/// Distance from the box's start edge to the surface's text anchor.
fn align_shift(align: TextAlign, width: f64) -> f64 {
    match align {
        TextAlign::Center => width / 2.0,
        TextAlign::Right | TextAlign::End => width,
        TextAlign::Left | TextAlign::Start => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use kurbo::Size;

    use super::*;
    use crate::surface::{DrawCommand, RecordingSurface};
    use crate::transform::Transformer;

    fn ctx(width: Option<f64>, height: Option<f64>) -> PaintContext {
        PaintContext {
            transform: Transformer::IDENTITY,
            opacity: 1.0,
            width,
            height,
        }
    }

    fn origins(surface: &RecordingSurface) -> Vec<Point> {
        surface
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::FillText(_, p) => Some(*p),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn lines_step_by_line_height() {
        // 6 px glyphs, 12 px lines.
        let text = Text::new("aaaaabbbbbccc");
        let mut surface = RecordingSurface::new(Size::new(100.0, 100.0));
        let mut cache = None;
        let outcome = text.paint(
            &mut surface,
            &ShapeStyle::fill("black"),
            &ctx(Some(30.0), None),
            &mut cache,
        );
        assert_eq!(surface.filled_text(), ["aaaaa", "bbbbb", "ccc"]);
        assert_eq!(outcome.text_lines, 3);
        assert_eq!(outcome.relayout, Some(false));
        let ys: Vec<f64> = origins(&surface).iter().map(|p| p.y).collect();
        assert_eq!(ys, [0.0, 12.0, 24.0]);
    }

    #[test]
    fn cached_layout_is_reused() {
        let text = Text::new("hello");
        let mut surface = RecordingSurface::default();
        let mut cache = None;
        let style = ShapeStyle::fill("black");
        let first = text.paint(&mut surface, &style, &ctx(None, None), &mut cache);
        let second = text.paint(&mut surface, &style, &ctx(None, None), &mut cache);
        assert_eq!(first.relayout, Some(false));
        assert_eq!(second.relayout, None, "second paint hits the cache");
    }

    #[test]
    fn center_and_middle_alignment() {
        let text = Text {
            align: TextAlign::Center,
            vertical_align: VerticalAlign::Middle,
            ..Text::new("ab")
        };
        let mut surface = RecordingSurface::default();
        let _ = text.paint(
            &mut surface,
            &ShapeStyle::fill("black"),
            &ctx(Some(100.0), Some(40.0)),
            &mut None,
        );
        // One 12 px line centered in 40 px.
        assert_eq!(origins(&surface), [Point::new(50.0, 14.0)]);
    }

    #[test]
    fn padding_insets_wrap_width() {
        let text = Text {
            padding: 5.0,
            ..Text::new("abcdef")
        };
        let mut surface = RecordingSurface::default();
        let _ = text.paint(
            &mut surface,
            &ShapeStyle::fill("black"),
            &ctx(Some(28.0), None),
            &mut None,
        );
        // 18 px available: three 6 px glyphs per line.
        assert_eq!(surface.filled_text(), ["abc", "def"]);
        assert_eq!(origins(&surface)[0], Point::new(5.0, 5.0));
    }

    #[test]
    fn underline_spans_the_line() {
        let text = Text {
            decoration: TextDecoration::UNDERLINE,
            ..Text::new("abcd")
        };
        let mut surface = RecordingSurface::default();
        let _ = text.paint(
            &mut surface,
            &ShapeStyle::fill("red"),
            &ctx(None, None),
            &mut None,
        );
        let cmds = surface.commands();
        assert!(cmds.contains(&DrawCommand::StrokeStyle("red".into())), "falls back to fill color");
        // Descent of the recording surface is 3 px.
        assert!(cmds.contains(&DrawCommand::MoveTo(Point::new(0.0, 3.0))));
        assert!(cmds.contains(&DrawCommand::LineTo(Point::new(24.0, 3.0))));
        assert!(cmds.contains(&DrawCommand::Stroke));
    }

    #[test]
    fn unstyled_text_lays_out_but_draws_nothing() {
        let text = Text::new("abc");
        let mut surface = RecordingSurface::default();
        let mut cache = None;
        let outcome = text.paint(&mut surface, &ShapeStyle::default(), &ctx(None, None), &mut cache);
        assert!(!outcome.painted);
        assert!(cache.is_some());
        assert!(surface.filled_text().is_empty());
    }

    #[test]
    fn font_reaches_the_surface() {
        let text = Text {
            font: FontOptions::new(20.0, "serif"),
            ..Text::new("x")
        };
        let state = text.text_state();
        assert_eq!(state.font, "normal normal normal normal 20px/1 serif");
        assert_eq!(state.baseline, TextBaseline::Top);
    }
}
