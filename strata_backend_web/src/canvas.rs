// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canvas 2D surface.

use alloc::format;

use kurbo::{PathEl, Point, Rect, RoundedRect, Shape, Size};
use strata_core::surface::{Surface, TextMetrics, TextState};
use strata_core::transform::Transformer;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::px;

/// Flattening tolerance for rounded-rectangle corners.
const ROUND_RECT_TOLERANCE: f64 = 0.1;

// Newer text properties that not every `web-sys` release exposes.
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(method, setter = letterSpacing)]
    fn set_letter_spacing_css(this: &CanvasRenderingContext2d, value: &str);

    #[wasm_bindgen(method, setter = wordSpacing)]
    fn set_word_spacing_css(this: &CanvasRenderingContext2d, value: &str);

    #[wasm_bindgen(method, setter = direction)]
    fn set_direction_keyword(this: &CanvasRenderingContext2d, value: &str);
}

/// A [`Surface`] drawing into a `<canvas>` element.
///
/// Native calls that can throw (a non-invertible transform, text with a
/// detached context) are ignored so a frame always completes.
#[derive(Debug)]
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    size: Size,
}

impl CanvasSurface {
    /// Wraps a canvas and its 2D context.
    ///
    /// Returns `None` if the canvas cannot provide a 2D context.
    #[must_use]
    pub fn new(canvas: HtmlCanvasElement) -> Option<Self> {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        let size = Size::new(f64::from(canvas.width()), f64::from(canvas.height()));
        Some(Self { canvas, ctx, size })
    }

    /// The underlying canvas element.
    #[must_use]
    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    /// The underlying 2D context.
    #[must_use]
    pub fn context(&self) -> &CanvasRenderingContext2d {
        &self.ctx
    }
}

impl Surface for CanvasSurface {
    fn size(&self) -> Size {
        self.size
    }

    fn set_size(&mut self, size: Size) {
        self.size = size;
        self.canvas.set_width(px(size.width));
        self.canvas.set_height(px(size.height));
        let style = self.canvas.style();
        let _ = style.set_property("width", &format!("{}px", size.width));
        let _ = style.set_property("height", &format!("{}px", size.height));
    }

    fn save(&mut self) {
        self.ctx.save();
    }

    fn restore(&mut self) {
        self.ctx.restore();
    }

    fn set_transform(&mut self, transform: &Transformer) {
        let [a, b, c, d, e, f] = transform.matrix_values();
        let _ = self.ctx.set_transform(a, b, c, d, e, f);
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        let _ = self.ctx.translate(dx, dy);
    }

    fn clear_rect(&mut self, rect: Rect) {
        self.ctx
            .clear_rect(rect.x0, rect.y0, rect.width(), rect.height());
    }

    fn set_fill_style(&mut self, style: &str) {
        self.ctx.set_fill_style_str(style);
    }

    fn set_stroke_style(&mut self, style: &str) {
        self.ctx.set_stroke_style_str(style);
    }

    fn set_line_width(&mut self, width: f64) {
        self.ctx.set_line_width(width);
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        self.ctx.set_global_alpha(alpha);
    }

    fn begin_path(&mut self) {
        self.ctx.begin_path();
    }

    fn move_to(&mut self, p: Point) {
        self.ctx.move_to(p.x, p.y);
    }

    fn line_to(&mut self, p: Point) {
        self.ctx.line_to(p.x, p.y);
    }

    fn rect(&mut self, rect: Rect) {
        self.ctx.rect(rect.x0, rect.y0, rect.width(), rect.height());
    }

    fn round_rect(&mut self, rect: RoundedRect) {
        // `roundRect` is too recent to rely on; trace kurbo's outline instead.
        for el in rect.path_elements(ROUND_RECT_TOLERANCE) {
            match el {
                PathEl::MoveTo(p) => self.ctx.move_to(p.x, p.y),
                PathEl::LineTo(p) => self.ctx.line_to(p.x, p.y),
                PathEl::QuadTo(c, p) => self.ctx.quadratic_curve_to(c.x, c.y, p.x, p.y),
                PathEl::CurveTo(c1, c2, p) => {
                    self.ctx.bezier_curve_to(c1.x, c1.y, c2.x, c2.y, p.x, p.y);
                }
                PathEl::ClosePath => self.ctx.close_path(),
            }
        }
    }

    fn close_path(&mut self) {
        self.ctx.close_path();
    }

    fn clip(&mut self) {
        self.ctx.clip();
    }

    fn fill(&mut self) {
        self.ctx.fill();
    }

    fn stroke(&mut self) {
        self.ctx.stroke();
    }

    fn set_text_state(&mut self, state: &TextState) {
        self.ctx.set_font(&state.font);
        self.ctx.set_text_align(state.align.as_str());
        self.ctx.set_text_baseline(state.baseline.as_str());
        self.ctx.set_direction_keyword(state.direction.as_str());
        self.ctx
            .set_letter_spacing_css(&format!("{}px", state.letter_spacing));
        self.ctx
            .set_word_spacing_css(&format!("{}px", state.word_spacing));
    }

    fn measure_text(&mut self, text: &str) -> TextMetrics {
        match self.ctx.measure_text(text) {
            Ok(m) => TextMetrics {
                width: m.width(),
                actual_ascent: m.actual_bounding_box_ascent(),
                actual_descent: m.actual_bounding_box_descent(),
                font_ascent: m.font_bounding_box_ascent(),
                font_descent: m.font_bounding_box_descent(),
            },
            Err(_) => TextMetrics::default(),
        }
    }

    fn fill_text(&mut self, text: &str, origin: Point) {
        let _ = self.ctx.fill_text(text, origin.x, origin.y);
    }

    fn stroke_text(&mut self, text: &str, origin: Point) {
        let _ = self.ctx.stroke_text(text, origin.x, origin.y);
    }
}
