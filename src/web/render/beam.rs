use super::helpers::{rgba, rounded_rect_path};
use crate::core::constants::BEAM_SPRITE_SIZE;
use crate::core::{BeamParticleField, FrameTask, GlowBand, ScannerError};
use std::cell::RefCell;
use std::f64::consts::TAU;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys as web;

fn context_2d(canvas: &web::HtmlCanvasElement) -> Option<web::CanvasRenderingContext2d> {
    canvas
        .get_context("2d")
        .ok()
        .flatten()
        .and_then(|c| c.dyn_into::<web::CanvasRenderingContext2d>().ok())
}

/// Pre-rendered soft dot, stamped once per particle per frame.
fn build_sprite(document: &web::Document) -> Result<web::HtmlCanvasElement, ScannerError> {
    let sprite = document
        .create_element("canvas")
        .ok()
        .and_then(|e| e.dyn_into::<web::HtmlCanvasElement>().ok())
        .ok_or(ScannerError::ContextUnavailable("sprite canvas"))?;
    sprite.set_width(BEAM_SPRITE_SIZE);
    sprite.set_height(BEAM_SPRITE_SIZE);
    let ctx = context_2d(&sprite).ok_or(ScannerError::ContextUnavailable("sprite 2d"))?;

    let half = BEAM_SPRITE_SIZE as f64 * 0.5;
    let gradient = ctx
        .create_radial_gradient(half, half, 0.0, half, half, half)
        .map_err(|_| ScannerError::ContextUnavailable("radial gradient"))?;
    _ = gradient.add_color_stop(0.0, "rgba(255, 255, 255, 1)");
    _ = gradient.add_color_stop(0.3, "rgba(196, 181, 253, 0.8)");
    _ = gradient.add_color_stop(0.7, "rgba(139, 92, 246, 0.4)");
    _ = gradient.add_color_stop(1.0, "transparent");
    ctx.set_fill_style_canvas_gradient(&gradient);
    ctx.begin_path();
    _ = ctx.arc(half, half, half, 0.0, TAU);
    ctx.fill();
    Ok(sprite)
}

/// 2D-canvas presentation of the beam field.
pub struct BeamCanvas {
    field: Rc<RefCell<BeamParticleField>>,
    canvas: web::HtmlCanvasElement,
    ctx: web::CanvasRenderingContext2d,
    sprite: web::HtmlCanvasElement,
}

impl BeamCanvas {
    pub fn new(
        document: &web::Document,
        canvas: web::HtmlCanvasElement,
        field: Rc<RefCell<BeamParticleField>>,
    ) -> Result<Self, ScannerError> {
        let ctx = context_2d(&canvas).ok_or(ScannerError::ContextUnavailable("2d"))?;
        let sprite = build_sprite(document)?;
        let renderer = Self {
            field,
            canvas,
            ctx,
            sprite,
        };
        renderer.apply_size();
        Ok(renderer)
    }

    /// Viewport changed: recentre the beam and resize the backing store.
    pub fn resize(&mut self, viewport_width: f32) {
        self.field.borrow_mut().resize(viewport_width);
        self.apply_size();
    }

    fn apply_size(&self) {
        let field = self.field.borrow();
        self.canvas.set_width(field.width().max(0.0) as u32);
        self.canvas.set_height(field.height().max(0.0) as u32);
    }

    fn fill_band(&self, band: &GlowBand, height: f64) {
        let left = band.left as f64;
        let width = band.width as f64;
        let gradient = self.ctx.create_linear_gradient(left, 0.0, left + width, 0.0);
        for (offset, rgb, alpha) in band.stops.iter() {
            _ = gradient.add_color_stop(*offset, &rgba(*rgb, *alpha));
        }
        self.ctx.set_global_alpha(band.alpha.clamp(0.0, 1.0) as f64);
        self.ctx.set_fill_style_canvas_gradient(&gradient);
        rounded_rect_path(&self.ctx, left, 0.0, width, height, band.corner_radius as f64);
        self.ctx.fill();
    }

    fn draw(&self, field: &BeamParticleField) {
        let w = field.width() as f64;
        let h = field.height() as f64;
        let ctx = &self.ctx;
        _ = ctx.set_global_composite_operation("source-over");
        ctx.set_global_alpha(1.0);
        ctx.clear_rect(0.0, 0.0, w, h);

        // bar and glow halos, additive
        _ = ctx.set_global_composite_operation("lighter");
        for band in field.glow_bands().iter() {
            self.fill_band(band, h);
        }

        // vertical fade applied to the bar only
        _ = ctx.set_global_composite_operation("destination-in");
        ctx.set_global_alpha(1.0);
        let (top, bottom) = field.mask_stops();
        let mask = ctx.create_linear_gradient(0.0, 0.0, 0.0, h);
        _ = mask.add_color_stop(0.0, "rgba(255, 255, 255, 0)");
        _ = mask.add_color_stop(top, "rgba(255, 255, 255, 1)");
        _ = mask.add_color_stop(bottom, "rgba(255, 255, 255, 1)");
        _ = mask.add_color_stop(1.0, "rgba(255, 255, 255, 0)");
        ctx.set_fill_style_canvas_gradient(&mask);
        ctx.fill_rect(0.0, 0.0, w, h);

        _ = ctx.set_global_composite_operation("lighter");
        for p in field.particles() {
            let alpha = field.draw_alpha(p);
            if alpha <= 0.0 {
                continue;
            }
            let r = p.radius as f64;
            ctx.set_global_alpha(alpha as f64);
            _ = ctx.draw_image_with_html_canvas_element_and_dw_and_dh(
                &self.sprite,
                p.pos.x as f64 - r,
                p.pos.y as f64 - r,
                r * 2.0,
                r * 2.0,
            );
        }
        _ = ctx.set_global_composite_operation("source-over");
        ctx.set_global_alpha(1.0);
    }
}

impl FrameTask for BeamCanvas {
    fn frame(&mut self, _timestamp_ms: f64) {
        let mut field = self.field.borrow_mut();
        field.step();
        self.draw(&field);
    }
}
