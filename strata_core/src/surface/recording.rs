// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A headless surface that records every call.

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use kurbo::{Point, Rect, RoundedRect, Size};
use unicode_segmentation::UnicodeSegmentation;

use super::{Surface, TextMetrics, TextState};
use crate::transform::Transformer;

/// One recorded [`Surface`] call.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    /// [`Surface::set_size`].
    SetSize(Size),
    /// [`Surface::save`].
    Save,
    /// [`Surface::restore`].
    Restore,
    /// [`Surface::set_transform`].
    SetTransform(Transformer),
    /// [`Surface::translate`].
    Translate(f64, f64),
    /// [`Surface::clear_rect`].
    ClearRect(Rect),
    /// [`Surface::set_fill_style`].
    FillStyle(String),
    /// [`Surface::set_stroke_style`].
    StrokeStyle(String),
    /// [`Surface::set_line_width`].
    LineWidth(f64),
    /// [`Surface::set_global_alpha`].
    GlobalAlpha(f64),
    /// [`Surface::begin_path`].
    BeginPath,
    /// [`Surface::move_to`].
    MoveTo(Point),
    /// [`Surface::line_to`].
    LineTo(Point),
    /// [`Surface::rect`].
    Rect(Rect),
    /// [`Surface::round_rect`].
    RoundRect(RoundedRect),
    /// [`Surface::close_path`].
    ClosePath,
    /// [`Surface::clip`].
    Clip,
    /// [`Surface::fill`].
    Fill,
    /// [`Surface::stroke`].
    Stroke,
    /// [`Surface::set_text_state`].
    TextState(TextState),
    /// [`Surface::fill_text`].
    FillText(String, Point),
    /// [`Surface::stroke_text`].
    StrokeText(String, Point),
}

/// A [`Surface`] that appends every call to a command list.
///
/// Text is measured as if every grapheme had the same advance, which makes
/// wrapping deterministic in tests.
#[derive(Clone, Debug)]
pub struct RecordingSurface {
    size: Size,
    commands: Vec<DrawCommand>,
    advance: f64,
    ascent: f64,
    descent: f64,
    letter_spacing: f64,
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self::new(Size::ZERO)
    }
}

impl RecordingSurface {
    /// Creates an empty surface of the given size.
    ///
    /// Glyphs measure 6 px wide, 9 px above and 3 px below the baseline.
    #[must_use]
    pub fn new(size: Size) -> Self {
        Self {
            size,
            commands: Vec::new(),
            advance: 6.0,
            ascent: 9.0,
            descent: 3.0,
            letter_spacing: 0.0,
        }
    }

    /// Overrides the fixed glyph metrics.
    #[must_use]
    pub fn with_metrics(mut self, advance: f64, ascent: f64, descent: f64) -> Self {
        self.advance = advance;
        self.ascent = ascent;
        self.descent = descent;
        self
    }

    /// Returns the commands recorded so far.
    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Removes and returns the recorded commands.
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        core::mem::take(&mut self.commands)
    }

    /// Returns the strings passed to [`Surface::fill_text`], in order.
    #[must_use]
    pub fn filled_text(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::FillText(text, _) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> Size {
        self.size
    }

    fn set_size(&mut self, size: Size) {
        self.size = size;
        self.push(DrawCommand::SetSize(size));
    }

    fn save(&mut self) {
        self.push(DrawCommand::Save);
    }

    fn restore(&mut self) {
        self.push(DrawCommand::Restore);
    }

    fn set_transform(&mut self, transform: &Transformer) {
        self.push(DrawCommand::SetTransform(*transform));
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.push(DrawCommand::Translate(dx, dy));
    }

    fn clear_rect(&mut self, rect: Rect) {
        self.push(DrawCommand::ClearRect(rect));
    }

    fn set_fill_style(&mut self, style: &str) {
        self.push(DrawCommand::FillStyle(style.to_string()));
    }

    fn set_stroke_style(&mut self, style: &str) {
        self.push(DrawCommand::StrokeStyle(style.to_string()));
    }

    fn set_line_width(&mut self, width: f64) {
        self.push(DrawCommand::LineWidth(width));
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        self.push(DrawCommand::GlobalAlpha(alpha));
    }

    fn begin_path(&mut self) {
        self.push(DrawCommand::BeginPath);
    }

    fn move_to(&mut self, p: Point) {
        self.push(DrawCommand::MoveTo(p));
    }

    fn line_to(&mut self, p: Point) {
        self.push(DrawCommand::LineTo(p));
    }

    fn rect(&mut self, rect: Rect) {
        self.push(DrawCommand::Rect(rect));
    }

    fn round_rect(&mut self, rect: RoundedRect) {
        self.push(DrawCommand::RoundRect(rect));
    }

    fn close_path(&mut self) {
        self.push(DrawCommand::ClosePath);
    }

    fn clip(&mut self) {
        self.push(DrawCommand::Clip);
    }

    fn fill(&mut self) {
        self.push(DrawCommand::Fill);
    }

    fn stroke(&mut self) {
        self.push(DrawCommand::Stroke);
    }

    fn set_text_state(&mut self, state: &TextState) {
        self.letter_spacing = state.letter_spacing;
        self.push(DrawCommand::TextState(state.clone()));
    }

    fn measure_text(&mut self, text: &str) -> TextMetrics {
        let graphemes = text.graphemes(true).count() as f64;
        TextMetrics {
            width: graphemes * (self.advance + self.letter_spacing),
            actual_ascent: self.ascent,
            actual_descent: self.descent,
            font_ascent: self.ascent,
            font_descent: self.descent,
        }
    }

    fn fill_text(&mut self, text: &str, origin: Point) {
        self.push(DrawCommand::FillText(text.to_string(), origin));
    }

    fn stroke_text(&mut self, text: &str, origin: Point) {
        self.push(DrawCommand::StrokeText(text.to_string(), origin));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn measures_graphemes_with_letter_spacing() {
        let mut surface = RecordingSurface::default().with_metrics(5.0, 8.0, 2.0);
        // "é" as e + combining acute is one grapheme.
        assert_eq!(surface.measure_text("ae\u{301}c").width, 15.0);
        surface.set_text_state(&TextState {
            letter_spacing: 1.0,
            ..TextState::default()
        });
        let metrics = surface.measure_text("ab");
        assert_eq!(metrics.width, 12.0);
        assert_eq!(metrics.actual_ascent, 8.0);
        assert_eq!(metrics.font_descent, 2.0);
    }

    #[test]
    fn take_commands_drains_the_log() {
        let mut surface = RecordingSurface::new(Size::new(10.0, 10.0));
        surface.fill_text("hi", Point::new(1.0, 2.0));
        surface.stroke_text("ho", Point::ORIGIN);
        assert_eq!(surface.filled_text(), ["hi"]);
        assert_eq!(surface.take_commands().len(), 2);
        assert!(surface.commands().is_empty(), "log is empty after take");
    }
}
