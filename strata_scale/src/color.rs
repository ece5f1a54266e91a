// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! RGBA colors and CSS color parsing.
//!
//! Accepted forms are `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`,
//! `rgb(r, g, b)`, `rgba(r, g, b, a)`, `hsl(h, s%, l%)`, `hsla(h, s%, l%, a)`
//! and a handful of named colors. Parsing is case-insensitive and ignores
//! surrounding whitespace.

use core::fmt;
use core::str::FromStr;

use crate::ticks::round_half_up;

/// Errors from [`Rgba::parse`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ColorParseError {
    /// The input was empty.
    #[error("empty color string")]
    Empty,
    /// A `#` color with the wrong length or a non-hex digit.
    #[error("invalid hex color `{0}`")]
    InvalidHex(String),
    /// An `rgb()`, `rgba()`, `hsl()` or `hsla()` form that did not parse.
    #[error("invalid color function `{0}`")]
    InvalidFunction(String),
    /// A name missing from the named-color table.
    #[error("unknown color name `{0}`")]
    UnknownName(String),
}

/// A color with `0..=255` channels and a `0..=1` alpha.
///
/// Channels are kept as `f64` so interpolated colors need not be rounded
/// until they are serialized.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct Rgba {
    /// Red, `0..=255`.
    pub r: f64,
    /// Green, `0..=255`.
    pub g: f64,
    /// Blue, `0..=255`.
    pub b: f64,
    /// Alpha, `0..=1`.
    pub a: f64,
}

impl Default for Rgba {
    fn default() -> Self {
        Self::BLACK
    }
}

const NAMED: &[(&str, [u8; 3])] = &[
    ("black", [0, 0, 0]),
    ("white", [255, 255, 255]),
    ("red", [255, 0, 0]),
    ("green", [0, 128, 0]),
    ("blue", [0, 0, 255]),
    ("yellow", [255, 255, 0]),
    ("cyan", [0, 255, 255]),
    ("magenta", [255, 0, 255]),
    ("gray", [128, 128, 128]),
    ("grey", [128, 128, 128]),
    ("orange", [255, 165, 0]),
    ("purple", [128, 0, 128]),
    ("steelblue", [70, 130, 180]),
];

impl Rgba {
    /// Opaque black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Creates a color from channels.
    #[must_use]
    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Creates an opaque color.
    #[must_use]
    pub const fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Parses a CSS color.
    pub fn parse(input: &str) -> Result<Self, ColorParseError> {
        let s = input.trim().to_ascii_lowercase();
        if s.is_empty() {
            return Err(ColorParseError::Empty);
        }
        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(|| ColorParseError::InvalidHex(s.clone()));
        }
        if s.starts_with("rgb") {
            return parse_rgb(&s).ok_or_else(|| ColorParseError::InvalidFunction(s.clone()));
        }
        if s.starts_with("hsl") {
            return parse_hsl(&s).ok_or_else(|| ColorParseError::InvalidFunction(s.clone()));
        }
        if s == "transparent" {
            return Ok(Self::TRANSPARENT);
        }
        NAMED
            .iter()
            .find(|(name, _)| *name == s)
            .map(|(_, [r, g, b])| Self::rgb(f64::from(*r), f64::from(*g), f64::from(*b)))
            .ok_or(ColorParseError::UnknownName(s))
    }

    /// Parses a CSS color, falling back to opaque black.
    #[must_use]
    pub fn parse_or_black(input: &str) -> Self {
        Self::parse(input).unwrap_or(Self::BLACK)
    }

    /// This color with channels rounded to integers. Alpha is unchanged.
    #[must_use]
    pub fn rounded(self) -> Self {
        Self::new(
            round_half_up(self.r),
            round_half_up(self.g),
            round_half_up(self.b),
            self.a,
        )
    }

    /// `rgba(r, g, b, a)`.
    #[must_use]
    pub fn to_rgba_string(&self) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }

    /// `rgb(r, g, b)`, dropping alpha.
    #[must_use]
    pub fn to_rgb_string(&self) -> String {
        format!("rgb({}, {}, {})", self.r, self.g, self.b)
    }

    /// `#rrggbb`, or `#rrggbbaa` when not opaque.
    #[must_use]
    pub fn to_hex(&self) -> String {
        let mut out = format!(
            "#{:02x}{:02x}{:02x}",
            to_byte(self.r),
            to_byte(self.g),
            to_byte(self.b)
        );
        if self.a < 1.0 {
            out.push_str(&format!("{:02x}", to_byte(self.a * 255.0)));
        }
        out
    }

    /// `hsl(h, s%, l%)` with rounded components, dropping alpha.
    #[must_use]
    pub fn to_hsl(&self) -> String {
        let (r, g, b) = (self.r / 255.0, self.g / 255.0, self.b / 255.0);
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let delta = max - min;
        let l = (max + min) / 2.0;
        let (mut h, mut s) = (0.0, 0.0);
        if delta != 0.0 {
            s = delta / (1.0 - (2.0 * l - 1.0).abs());
            h = if max == r {
                (g - b) / delta + if g < b { 6.0 } else { 0.0 }
            } else if max == g {
                (b - r) / delta + 2.0
            } else {
                (r - g) / delta + 4.0
            };
            h /= 6.0;
        }
        format!(
            "hsl({}, {}%, {}%)",
            round_half_up(h * 360.0),
            round_half_up(s * 100.0),
            round_half_up(l * 100.0)
        )
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_rgba_string())
    }
}

impl FromStr for Rgba {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "clamped to 0..=255 before the cast"
)]
fn to_byte(v: f64) -> u8 {
    round_half_up(v).clamp(0.0, 255.0) as u8
}

fn parse_hex(hex: &str) -> Option<Rgba> {
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let digit = |i: usize| u8::from_str_radix(&hex[i..=i], 16).ok().map(|d| d * 17);
    let pair = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    let (r, g, b, a) = match hex.len() {
        3 => (digit(0)?, digit(1)?, digit(2)?, 255),
        4 => (digit(0)?, digit(1)?, digit(2)?, digit(3)?),
        6 => (pair(0)?, pair(2)?, pair(4)?, 255),
        8 => (pair(0)?, pair(2)?, pair(4)?, pair(6)?),
        _ => return None,
    };
    let alpha = if a == 255 { 1.0 } else { f64::from(a) / 255.0 };
    Some(Rgba::new(f64::from(r), f64::from(g), f64::from(b), alpha))
}

/// Splits `name(a, b, c[, d])` into its arguments.
fn arguments<'a>(s: &'a str, names: &[&str]) -> Option<Vec<&'a str>> {
    let open = s.find('(')?;
    if !names.contains(&s[..open].trim_end()) {
        return None;
    }
    let inner = s[open + 1..].trim_end().strip_suffix(')')?;
    let args: Vec<&str> = inner.split(',').map(str::trim).collect();
    matches!(args.len(), 3 | 4).then_some(args)
}

fn alpha(args: &[&str]) -> Option<f64> {
    args.get(3).map_or(Some(1.0), |a| a.parse().ok())
}

fn parse_rgb(s: &str) -> Option<Rgba> {
    let args = arguments(s, &["rgb", "rgba"])?;
    let channel = |i: usize| args[i].parse::<f64>().ok();
    Some(Rgba::new(channel(0)?, channel(1)?, channel(2)?, alpha(&args)?))
}

fn parse_hsl(s: &str) -> Option<Rgba> {
    let args = arguments(s, &["hsl", "hsla"])?;
    let percent = |i: usize| {
        args[i]
            .strip_suffix('%')
            .and_then(|p| p.trim().parse::<f64>().ok())
            .map(|p| p / 100.0)
    };
    let h: f64 = args[0].parse().ok()?;
    let (r, g, b) = hsl_to_rgb(h, percent(1)?, percent(2)?);
    Some(Rgba::new(r, g, b, alpha(&args)?))
}

fn hsl_to_rgb(h: f64, s: f64, l: f64) -> (f64, f64, f64) {
    let h = h.rem_euclid(360.0);
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = l - c / 2.0;
    let (r, g, b) = match h {
        h if h < 60.0 => (c, x, 0.0),
        h if h < 120.0 => (x, c, 0.0),
        h if h < 180.0 => (0.0, c, x),
        h if h < 240.0 => (0.0, x, c),
        h if h < 300.0 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let to_channel = |v: f64| round_half_up((v + m) * 255.0);
    (to_channel(r), to_channel(g), to_channel(b))
}
