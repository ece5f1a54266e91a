// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Greedy line breaking with ellipsis truncation.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use unicode_segmentation::UnicodeSegmentation;

/// Appended to the last kept line when text is cut short.
pub const ELLIPSIS: &str = "...";

/// Limits a [`TextLayout`] must respect.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutConstraints {
    /// Available width. Lines wrap at this width when [`wrap`](Self::wrap)
    /// is set.
    pub max_width: Option<f64>,
    /// Available height. Lines that would overflow it are dropped.
    pub max_height: Option<f64>,
    /// Height of one line in pixels.
    pub line_height: f64,
    /// Whether to break lines that exceed [`max_width`](Self::max_width).
    pub wrap: bool,
    /// Whether to mark dropped lines with [`ELLIPSIS`].
    pub ellipsis: bool,
}

impl Default for LayoutConstraints {
    fn default() -> Self {
        Self {
            max_width: None,
            max_height: None,
            line_height: 12.0,
            wrap: true,
            ellipsis: true,
        }
    }
}

impl LayoutConstraints {
    /// Number of lines that fit in [`max_height`](Self::max_height).
    ///
    /// At least one line is always kept.
    #[must_use]
    pub fn max_lines(&self) -> usize {
        match self.max_height {
            Some(height) if self.line_height > 0.0 => {
                let lines = (height / self.line_height + 1e-9).floor();
                if lines < 1.0 {
                    1
                } else if lines >= usize::MAX as f64 {
                    usize::MAX
                } else {
                    #[expect(
                        clippy::cast_possible_truncation,
                        reason = "range checked above and the value is integral"
                    )]
                    let lines = lines as usize;
                    lines
                }
            }
            _ => usize::MAX,
        }
    }
}

/// One laid-out line.
#[derive(Clone, Debug, PartialEq)]
pub struct TextLine {
    /// The text drawn on this line.
    pub text: String,
    /// Measured width of [`text`](Self::text).
    pub width: f64,
}

/// The result of [`layout_text`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TextLayout {
    /// Lines in drawing order.
    pub lines: Vec<TextLine>,
    /// Whether some text did not fit and was dropped.
    pub truncated: bool,
    /// Height of one line.
    pub line_height: f64,
}

impl TextLayout {
    /// Width of the widest line.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.lines.iter().fold(0.0, |w, line| w.max(line.width))
    }

    /// Height of the whole block.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.lines.len() as f64 * self.line_height
    }
}

/// Breaks `text` into lines.
///
/// The text is split on `'\n'` first. When wrapping is on and a width is set,
/// each paragraph is cut at the longest grapheme prefix whose measured width
/// fits, found by binary search, and the remainder continues on the next
/// line. A line always holds at least one grapheme, so a single glyph wider
/// than the limit still makes progress.
///
/// When the lines would exceed [`LayoutConstraints::max_lines`] the rest is
/// dropped. With [`ellipsis`](LayoutConstraints::ellipsis) set, graphemes
/// are removed from the end of the last kept line until it plus
/// [`ELLIPSIS`] fits the width, and [`ELLIPSIS`] is appended.
///
/// `measure` returns the advance width of a string.
pub fn layout_text(
    text: &str,
    constraints: &LayoutConstraints,
    measure: &mut dyn FnMut(&str) -> f64,
) -> TextLayout {
    let max_lines = constraints.max_lines();
    let wrap_width = if constraints.wrap {
        constraints.max_width
    } else {
        None
    };

    let mut lines = Vec::new();
    let mut truncated = false;

    'paragraphs: for paragraph in text.split('\n') {
        let mut rest = paragraph;
        loop {
            if lines.len() == max_lines {
                truncated = true;
                break 'paragraphs;
            }
            let width = measure(rest);
            match wrap_width {
                Some(max) if width > max && !rest.is_empty() => {
                    let (line, tail) = split_fitting(rest, max, measure);
                    lines.push(line);
                    rest = tail;
                    if rest.is_empty() {
                        break;
                    }
                }
                _ => {
                    lines.push(TextLine {
                        text: String::from(rest),
                        width,
                    });
                    break;
                }
            }
        }
    }

    if truncated
        && constraints.ellipsis
        && let Some(last) = lines.last_mut()
    {
        append_ellipsis(last, constraints.max_width, measure);
    }

    TextLayout {
        lines,
        truncated,
        line_height: constraints.line_height,
    }
}

/// Splits off the longest prefix of `text` that fits in `max`.
fn split_fitting<'t>(
    text: &'t str,
    max: f64,
    measure: &mut dyn FnMut(&str) -> f64,
) -> (TextLine, &'t str) {
    let ends: Vec<usize> = text
        .grapheme_indices(true)
        .map(|(start, g)| start + g.len())
        .collect();

    // Largest grapheme count whose prefix fits.
    let (mut lo, mut hi) = (0_usize, ends.len());
    let mut lo_width = 0.0;
    while lo < hi {
        let mid = (lo + hi).div_ceil(2);
        let width = measure(&text[..ends[mid - 1]]);
        if width <= max {
            lo = mid;
            lo_width = width;
        } else {
            hi = mid - 1;
        }
    }

    if lo == 0 {
        lo = 1;
        lo_width = measure(&text[..ends[0]]);
    }
    let end = ends[lo - 1];
    (
        TextLine {
            text: String::from(&text[..end]),
            width: lo_width,
        },
        &text[end..],
    )
}

fn append_ellipsis(line: &mut TextLine, max: Option<f64>, measure: &mut dyn FnMut(&str) -> f64) {
    let mut kept = core::mem::take(&mut line.text);
    loop {
        let candidate = format!("{kept}{ELLIPSIS}");
        let width = measure(&candidate);
        if kept.is_empty() || max.is_none_or(|max| width <= max) {
            line.text = candidate;
            line.width = width;
            return;
        }
        let cut = kept
            .grapheme_indices(true)
            .next_back()
            .map_or(0, |(start, _)| start);
        kept.truncate(cut);
    }
}
