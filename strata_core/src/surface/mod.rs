// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The drawing surface a layer paints into.
//!
//! [`Surface`] is the subset of a canvas 2D context the scene graph uses.
//! Backends implement it over a native context (see `strata_backend_web`);
//! [`RecordingSurface`] implements it headlessly by recording
//! [`DrawCommand`]s, which is what tests and diagnostics use.
//!
//! All operations are infallible. A backend whose native calls can fail is
//! expected to swallow or log those failures so that a frame always runs to
//! completion.

mod recording;

use alloc::string::String;

use kurbo::{Point, Rect, RoundedRect, Size};

use crate::transform::Transformer;

pub use recording::{DrawCommand, RecordingSurface};

/// Horizontal text alignment relative to the drawing position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TextAlign {
    /// Direction-dependent start edge.
    #[default]
    Start,
    /// Direction-dependent end edge.
    End,
    /// Left edge.
    Left,
    /// Right edge.
    Right,
    /// Centered.
    Center,
}

impl TextAlign {
    /// Returns the canvas keyword for this alignment.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::End => "end",
            Self::Left => "left",
            Self::Right => "right",
            Self::Center => "center",
        }
    }
}

/// Vertical anchor of drawn text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TextBaseline {
    /// Top of the em square.
    Top,
    /// Hanging baseline.
    Hanging,
    /// Middle of the em square.
    Middle,
    /// Alphabetic baseline.
    #[default]
    Alphabetic,
    /// Ideographic baseline.
    Ideographic,
    /// Bottom of the em square.
    Bottom,
}

impl TextBaseline {
    /// Returns the canvas keyword for this baseline.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Hanging => "hanging",
            Self::Middle => "middle",
            Self::Alphabetic => "alphabetic",
            Self::Ideographic => "ideographic",
            Self::Bottom => "bottom",
        }
    }
}

/// Text direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Inherit from the surface.
    #[default]
    Inherit,
    /// Left to right.
    Ltr,
    /// Right to left.
    Rtl,
}

impl Direction {
    /// Returns the canvas keyword for this direction.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Inherit => "inherit",
            Self::Ltr => "ltr",
            Self::Rtl => "rtl",
        }
    }
}

/// Measured extent of a run of text.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TextMetrics {
    /// Advance width.
    pub width: f64,
    /// Distance from the baseline to the top of the drawn glyphs.
    pub actual_ascent: f64,
    /// Distance from the baseline to the bottom of the drawn glyphs.
    pub actual_descent: f64,
    /// Distance from the baseline to the top of the font's bounding box.
    pub font_ascent: f64,
    /// Distance from the baseline to the bottom of the font's bounding box.
    pub font_descent: f64,
}

/// Text state applied before measuring or drawing text.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TextState {
    /// CSS font shorthand.
    pub font: String,
    /// Horizontal alignment.
    pub align: TextAlign,
    /// Vertical anchor.
    pub baseline: TextBaseline,
    /// Direction.
    pub direction: Direction,
    /// Extra space between letters, in pixels.
    pub letter_spacing: f64,
    /// Extra space between words, in pixels.
    pub word_spacing: f64,
}

/// A 2D drawing context.
pub trait Surface {
    /// Returns the pixel size of the surface.
    fn size(&self) -> Size;

    /// Resizes the surface. Contents are discarded.
    fn set_size(&mut self, size: Size);

    /// Pushes the current drawing state.
    fn save(&mut self);

    /// Pops the drawing state pushed by the matching [`save`](Self::save).
    fn restore(&mut self);

    /// Replaces the current transform.
    fn set_transform(&mut self, transform: &Transformer);

    /// Translates the current transform.
    fn translate(&mut self, dx: f64, dy: f64);

    /// Clears `rect` to transparent, in surface pixels.
    fn clear_rect(&mut self, rect: Rect);

    /// Sets the fill style (any CSS color).
    fn set_fill_style(&mut self, style: &str);

    /// Sets the stroke style (any CSS color).
    fn set_stroke_style(&mut self, style: &str);

    /// Sets the stroke width.
    fn set_line_width(&mut self, width: f64);

    /// Sets the global alpha used by subsequent paint calls.
    fn set_global_alpha(&mut self, alpha: f64);

    /// Starts a new path.
    fn begin_path(&mut self);

    /// Begins a subpath at `p`.
    fn move_to(&mut self, p: Point);

    /// Adds a straight segment to `p`.
    fn line_to(&mut self, p: Point);

    /// Adds a rectangle subpath.
    fn rect(&mut self, rect: Rect);

    /// Adds a rounded rectangle subpath.
    fn round_rect(&mut self, rect: RoundedRect);

    /// Closes the current subpath.
    fn close_path(&mut self);

    /// Intersects the clip region with the current path.
    fn clip(&mut self);

    /// Fills the current path.
    fn fill(&mut self);

    /// Strokes the current path.
    fn stroke(&mut self);

    /// Applies font, alignment and spacing for text calls.
    fn set_text_state(&mut self, state: &TextState);

    /// Measures `text` with the current text state.
    fn measure_text(&mut self, text: &str) -> TextMetrics;

    /// Fills `text` at `origin`.
    fn fill_text(&mut self, text: &str, origin: Point);

    /// Strokes `text` at `origin`.
    fn stroke_text(&mut self, text: &str, origin: Point);
}
