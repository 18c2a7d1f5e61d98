//! Canvas 2D backend

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::shapes;
use crate::settings::Settings;
use crate::view::FrameView;

pub struct CanvasRenderer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    pub size: (u32, u32),
}

impl CanvasRenderer {
    /// `None` if the canvas has no 2D context
    pub fn new(canvas: HtmlCanvasElement) -> Option<Self> {
        let ctx = canvas
            .get_context("2d")
            .ok()??
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some(Self {
            canvas,
            ctx,
            size: (0, 0),
        })
    }

    /// Match the backing store to the CSS size at the given pixel ratio.
    /// Drawing stays in CSS pixels.
    pub fn resize(&mut self, css_width: f64, css_height: f64, dpr: f64) {
        let width = (css_width * dpr) as u32;
        let height = (css_height * dpr) as u32;
        if width == 0 || height == 0 {
            return;
        }
        self.size = (width, height);
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        if self.ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0).is_err() {
            log::warn!("Canvas transform rejected");
        }
    }

    pub fn render(&self, view: &FrameView, settings: &Settings) {
        for f in shapes::frame(view, settings) {
            self.ctx.set_fill_style_str(f.color);
            self.ctx.fill_rect(
                f.rect.min.x as f64,
                f.rect.min.y as f64,
                f.rect.size.x as f64,
                f.rect.size.y as f64,
            );
        }
    }
}
