// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Interpolators: functions from `t` in `0..=1` to a value between two ends.
//!
//! Each factory returns a closure. `t` outside `0..=1` extrapolates.

use chrono::{DateTime, Utc};

use crate::color::Rgba;
use crate::ticks::round_half_up;

/// Linear interpolation between two numbers.
pub fn interpolate_number(a: f64, b: f64) -> impl Fn(f64) -> f64 + Clone {
    move |t| a * (1.0 - t) + b * t
}

/// [`interpolate_number`], rounded half up.
pub fn interpolate_round(a: f64, b: f64) -> impl Fn(f64) -> f64 + Clone {
    let lerp = interpolate_number(a, b);
    move |t| round_half_up(lerp(t))
}

/// Element-wise interpolation of two arrays.
///
/// The result has `b`'s length. Elements of `b` past the end of `a` are held
/// constant.
pub fn interpolate_number_array(a: &[f64], b: &[f64]) -> impl Fn(f64) -> Vec<f64> + Clone + use<> {
    let a = a.to_vec();
    let b = b.to_vec();
    move |t| {
        b.iter()
            .enumerate()
            .map(|(i, &end)| {
                a.get(i)
                    .map_or(end, |&start| interpolate_number(start, end)(t))
            })
            .collect()
    }
}

/// Linear interpolation between two instants, on millisecond timestamps.
///
/// Each call returns a new value.
pub fn interpolate_date(
    a: DateTime<Utc>,
    b: DateTime<Utc>,
) -> impl Fn(f64) -> DateTime<Utc> + Clone {
    let lerp = interpolate_number(a.timestamp_millis() as f64, b.timestamp_millis() as f64);
    move |t| datetime_from_millis(lerp(t))
}

/// Converts a millisecond timestamp to an instant, saturating at chrono's
/// supported range.
pub(crate) fn datetime_from_millis(ms: f64) -> DateTime<Utc> {
    #[expect(
        clippy::cast_possible_truncation,
        reason = "saturating float to int conversion is intended"
    )]
    let ms = round_half_up(ms) as i64;
    DateTime::from_timestamp_millis(ms).unwrap_or(if ms < 0 {
        DateTime::<Utc>::MIN_UTC
    } else {
        DateTime::<Utc>::MAX_UTC
    })
}

#[derive(Clone, Debug)]
enum Token {
    Text(String),
    Fixed(String),
    Number(f64, f64),
}

/// Interpolates the numbers embedded in two strings.
///
/// `b` is split into text and numbers. The n-th number of `b` interpolates
/// from the n-th number of `a`; text, and numbers of `b` with no counterpart
/// in `a`, are taken from `b` unchanged.
///
/// ```
/// use strata_scale::interpolate::interpolate_string;
///
/// let f = interpolate_string("translate(0, 10)", "translate(100, 20)");
/// assert_eq!(f(0.5), "translate(50, 15)");
/// ```
pub fn interpolate_string(a: &str, b: &str) -> impl Fn(f64) -> String + Clone + use<> {
    let a_numbers: Vec<f64> = number_spans(a)
        .into_iter()
        .filter_map(|(s, e)| a[s..e].parse().ok())
        .collect();
    let mut tokens = Vec::new();
    let mut cursor = 0;
    for (n, (start, end)) in number_spans(b).into_iter().enumerate() {
        if start > cursor {
            tokens.push(Token::Text(b[cursor..start].to_owned()));
        }
        let literal = &b[start..end];
        tokens.push(match (a_numbers.get(n), literal.parse::<f64>()) {
            (Some(&from), Ok(to)) => Token::Number(from, to),
            _ => Token::Fixed(literal.to_owned()),
        });
        cursor = end;
    }
    if cursor < b.len() {
        tokens.push(Token::Text(b[cursor..].to_owned()));
    }

    move |t| {
        let mut out = String::new();
        for token in &tokens {
            match token {
                Token::Text(s) | Token::Fixed(s) => out.push_str(s),
                Token::Number(from, to) => {
                    out.push_str(&format_number(interpolate_number(*from, *to)(t)));
                }
            }
        }
        out
    }
}

/// Formats a number the way it reads in CSS and SVG attributes.
fn format_number(v: f64) -> String {
    if v == 0.0 {
        // Avoids "-0".
        return "0".to_owned();
    }
    format!("{v}")
}

/// Byte spans of the numbers in `s`.
///
/// A number is an optional sign, digits with an optional fraction (or a
/// fraction alone), and an optional exponent.
fn number_spans(s: &str) -> Vec<(usize, usize)> {
    let bytes = s.as_bytes();
    let digits = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };
    let mut spans = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        let start = i;
        let mut j = i;
        if matches!(bytes[j], b'+' | b'-') {
            j += 1;
        }
        let int_end = digits(j);
        let body_end = if int_end > j {
            // \d+\.?\d*
            if int_end < bytes.len() && bytes[int_end] == b'.' {
                digits(int_end + 1)
            } else {
                int_end
            }
        } else if j < bytes.len() && bytes[j] == b'.' && digits(j + 1) > j + 1 {
            // \.\d+
            digits(j + 1)
        } else {
            i += 1;
            continue;
        };
        let mut end = body_end;
        if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
            let mut k = end + 1;
            if k < bytes.len() && matches!(bytes[k], b'+' | b'-') {
                k += 1;
            }
            let exp_end = digits(k);
            if exp_end > k {
                end = exp_end;
            }
        }
        spans.push((start, end));
        i = end;
    }
    spans
}

/// Per-channel interpolation curve.
#[derive(Clone, Copy, Debug)]
enum Curve {
    Constant(f64),
    Linear { a: f64, d: f64 },
    Exponential { a: f64, b: f64, inv_y: f64 },
}

impl Curve {
    fn new(a: f64, b: f64, gamma: f64) -> Self {
        let d = b - a;
        if d == 0.0 || d.is_nan() {
            return Self::Constant(if a.is_nan() { b } else { a });
        }
        if gamma == 1.0 {
            Self::Linear { a, d }
        } else {
            let a_y = a.powf(gamma);
            Self::Exponential {
                a: a_y,
                b: b.powf(gamma) - a_y,
                inv_y: 1.0 / gamma,
            }
        }
    }

    fn at(self, t: f64) -> f64 {
        match self {
            Self::Constant(v) => v,
            Self::Linear { a, d } => a + t * d,
            Self::Exponential { a, b, inv_y } => (a + t * b).powf(inv_y),
        }
    }
}

/// RGB color interpolation with an optional gamma curve.
///
/// With a gamma of `1` channels interpolate linearly. Otherwise each channel
/// is raised to the gamma, interpolated, and raised back, which brightens
/// (`gamma > 1`) or darkens the middle of the ramp.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InterpolateRgb {
    gamma: f64,
}

impl Default for InterpolateRgb {
    fn default() -> Self {
        Self { gamma: 1.0 }
    }
}

impl InterpolateRgb {
    /// Linear color interpolation.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Color interpolation through a gamma curve.
    #[must_use]
    pub fn gamma(gamma: f64) -> Self {
        Self { gamma }
    }

    /// The gamma exponent.
    #[must_use]
    pub fn gamma_value(&self) -> f64 {
        self.gamma
    }

    /// Interpolates between two colors. Color channels of the result are
    /// rounded; alpha is not.
    pub fn rgba(&self, a: &Rgba, b: &Rgba) -> impl Fn(f64) -> Rgba + Clone + use<> {
        let r = Curve::new(a.r, b.r, self.gamma);
        let g = Curve::new(a.g, b.g, self.gamma);
        let bl = Curve::new(a.b, b.b, self.gamma);
        let al = Curve::new(a.a, b.a, self.gamma);
        move |t| Rgba::new(r.at(t), g.at(t), bl.at(t), al.at(t)).rounded()
    }

    /// Interpolates between two colors, serialized as `rgba(r, g, b, a)`.
    pub fn interpolate(&self, a: &Rgba, b: &Rgba) -> impl Fn(f64) -> String + Clone + use<> {
        let rgba = self.rgba(a, b);
        move |t| rgba(t).to_rgba_string()
    }

    /// Interpolates between two CSS colors. Unparseable colors are black.
    pub fn interpolate_str(&self, a: &str, b: &str) -> impl Fn(f64) -> String + Clone + use<> {
        self.interpolate(&Rgba::parse_or_black(a), &Rgba::parse_or_black(b))
    }
}

/// Linear interpolation between two CSS colors, serialized as
/// `rgba(r, g, b, a)`.
///
/// ```
/// use strata_scale::interpolate::interpolate_rgb;
///
/// let f = interpolate_rgb("rgb(0, 0, 0)", "rgb(255, 255, 255)");
/// assert_eq!(f(0.5), "rgba(128, 128, 128, 1)");
/// ```
pub fn interpolate_rgb(a: &str, b: &str) -> impl Fn(f64) -> String + Clone + use<> {
    InterpolateRgb::new().interpolate_str(a, b)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn numbers() {
        let f = interpolate_number(10.0, 20.0);
        assert_eq!(f(0.0), 10.0);
        assert_eq!(f(0.5), 15.0);
        assert_eq!(f(1.0), 20.0);
        assert_eq!(f(2.0), 30.0, "extrapolates");
        let r = interpolate_round(0.0, 3.0);
        assert_eq!(r(0.5), 2.0);
    }

    #[test]
    fn arrays_hold_extra_elements() {
        let f = interpolate_number_array(&[0.0, 10.0], &[10.0, 20.0, 30.0]);
        assert_eq!(f(0.5), [5.0, 15.0, 30.0]);
        let g = interpolate_number_array(&[0.0, 10.0, 99.0], &[10.0]);
        assert_eq!(g(0.5), [5.0]);
    }

    #[test]
    fn strings_interpolate_embedded_numbers() {
        let f = interpolate_string("M0,0L10,-5", "M100,50L20,5");
        assert_eq!(f(0.5), "M50,25L15,0");
        let g = interpolate_string("1.5e2px", "2.5e2px");
        assert_eq!(g(0.5), "200px");
    }

    #[test]
    fn string_token_mismatch_holds_b() {
        let f = interpolate_string("width: 10", "width: 20, height: 30");
        assert_eq!(f(0.5), "width: 15, height: 30");
        let g = interpolate_string("no numbers", "a 1 b 2");
        assert_eq!(g(0.25), "a 1 b 2");
    }

    #[test]
    fn number_spans_follow_css_grammar() {
        let s = "a-1.5e+3 .5 7. x+e";
        let spans: Vec<&str> = number_spans(s).into_iter().map(|(a, b)| &s[a..b]).collect();
        assert_eq!(spans, ["-1.5e+3", ".5", "7."]);
    }

    #[test]
    fn dates_are_fresh_values() {
        let a = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let b = Utc.with_ymd_and_hms(2024, 1, 3, 0, 0, 0).unwrap();
        let f = interpolate_date(a, b);
        let mid = f(0.5);
        let end = f(1.0);
        assert_eq!(mid, Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap());
        assert_eq!(end, b);
        assert_ne!(mid, end, "earlier results are not overwritten");
    }

    #[test]
    fn rgb_midpoint_is_rounded() {
        let f = interpolate_rgb("rgb(0,0,0)", "rgb(255,255,255)");
        assert_eq!(f(0.5), "rgba(128, 128, 128, 1)");
        assert_eq!(f(0.0), "rgba(0, 0, 0, 1)");
    }

    #[test]
    fn rgb_gamma_brightens_the_middle() {
        let black = Rgba::BLACK;
        let white = Rgba::rgb(255.0, 255.0, 255.0);
        let linear = InterpolateRgb::new().rgba(&black, &white)(0.5);
        let gamma = InterpolateRgb::gamma(2.2).rgba(&black, &white)(0.5);
        assert!(gamma.r > linear.r, "{} <= {}", gamma.r, linear.r);
        assert_eq!(InterpolateRgb::gamma(2.2).rgba(&black, &white)(1.0), white);
    }

    #[test]
    fn rgb_alpha_interpolates_unrounded() {
        let f = InterpolateRgb::new().interpolate(&Rgba::TRANSPARENT, &Rgba::BLACK);
        assert_eq!(f(0.5), "rgba(0, 0, 0, 0.5)");
    }
}
