// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Font description.

use alloc::format;
use alloc::string::String;

/// The parts of a CSS `font` shorthand.
#[derive(Clone, Debug, PartialEq)]
pub struct FontOptions {
    /// `normal`, `italic` or `oblique`.
    pub style: String,
    /// `normal` or `small-caps`.
    pub variant: String,
    /// `normal`, `bold` or a numeric weight.
    pub weight: String,
    /// `normal`, `condensed`, `expanded` and so on.
    pub stretch: String,
    /// Size in pixels.
    pub size: f64,
    /// Line height as a multiple of [`size`](Self::size).
    pub line_height: f64,
    /// Family list.
    pub family: String,
}

impl Default for FontOptions {
    fn default() -> Self {
        Self {
            style: String::from("normal"),
            variant: String::from("normal"),
            weight: String::from("normal"),
            stretch: String::from("normal"),
            size: 12.0,
            line_height: 1.0,
            family: String::from("caption"),
        }
    }
}

impl FontOptions {
    /// A default font at `size` pixels in `family`.
    #[must_use]
    pub fn new(size: f64, family: impl Into<String>) -> Self {
        Self {
            size,
            family: family.into(),
            ..Self::default()
        }
    }

    /// Returns the CSS `font` shorthand.
    #[must_use]
    pub fn css(&self) -> String {
        format!(
            "{} {} {} {} {}px/{} {}",
            self.style,
            self.variant,
            self.weight,
            self.stretch,
            self.size,
            self.line_height,
            self.family
        )
    }

    /// Height of one line in pixels.
    #[must_use]
    pub fn line_height_px(&self) -> f64 {
        self.size * self.line_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_css() {
        assert_eq!(
            FontOptions::default().css(),
            "normal normal normal normal 12px/1 caption"
        );
    }

    #[test]
    fn custom_css_and_line_height() {
        let font = FontOptions {
            weight: "bold".into(),
            line_height: 1.5,
            ..FontOptions::new(16.0, "sans-serif")
        };
        assert_eq!(font.css(), "normal normal bold normal 16px/1.5 sans-serif");
        assert!((font.line_height_px() - 24.0).abs() < 1e-12);
    }
}
