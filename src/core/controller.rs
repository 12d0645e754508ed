//! Card stream coordinator.
//!
//! Each frame: advance the strip, read every card's bounds, compute reveal
//! boundaries against the beam band, hand them to the surface in one write
//! pass and tell the beam field whether anything is under it.

use super::beam::BeamParticleField;
use super::codegen::{code_dimensions, generate_code};
use super::config::StreamTuning;
use super::error::ScannerError;
use super::reveal::{compute_reveals, BeamBand, CardBounds, CardReveal};
use super::schedule::FrameTask;
use super::strip::{Direction, Release, StripMotion};
use rand::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;

/// Presentation side of the strip. The controller never touches styles
/// directly; everything it decides goes through here.
pub trait StripSurface {
    /// Width of the container the strip lives in.
    fn container_width(&self) -> f32;
    /// Width the beam band is centred on.
    fn viewport_width(&self) -> f32;
    fn card_count(&self) -> usize;
    fn set_offset(&mut self, offset_px: f32);
    /// Read pass: current screen bounds of every card, in strip order.
    fn read_card_bounds(&self, out: &mut Vec<CardBounds>);
    /// Write pass: one reveal per card, same order as the read pass.
    fn write_reveals(&mut self, reveals: &[CardReveal]);
    fn set_decoded_text(&mut self, index: usize, text: &str);
    fn set_dragging(&mut self, _dragging: bool) {}
    fn set_speed_readout(&mut self, _velocity: u32) {}
}

pub struct CardStreamController<S: StripSurface> {
    motion: StripMotion,
    surface: S,
    beam: Rc<RefCell<BeamParticleField>>,
    tuning: StreamTuning,
    container_width: f32,
    bounds: Vec<CardBounds>,
    reveals: Vec<CardReveal>,
    scanned: Vec<bool>,
    any_scanning: bool,
    rng: StdRng,
}

impl<S: StripSurface> CardStreamController<S> {
    /// Refuses a zero-width container; the caller leaves the stream inert.
    pub fn new(
        surface: S,
        beam: Rc<RefCell<BeamParticleField>>,
        tuning: StreamTuning,
        seed: u64,
    ) -> Result<Self, ScannerError> {
        let container_width = surface.container_width();
        if !(container_width > 0.0) || surface.card_count() == 0 {
            return Err(ScannerError::EmptyContainer);
        }
        let mut ctl = Self {
            motion: StripMotion::new(&tuning),
            surface,
            beam,
            tuning,
            container_width,
            bounds: Vec::new(),
            reveals: Vec::new(),
            scanned: Vec::new(),
            any_scanning: false,
            rng: StdRng::seed_from_u64(seed),
        };
        ctl.sync();
        Ok(ctl)
    }

    pub fn motion(&self) -> &StripMotion {
        &self.motion
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn reveals(&self) -> &[CardReveal] {
        &self.reveals
    }

    pub fn any_scanning(&self) -> bool {
        self.any_scanning
    }

    /// Auto drift for one step, then a full sync.
    pub fn tick(&mut self) {
        self.motion.advance(self.tuning.step_sec);
        self.sync();
    }

    /// Push the position, run the read/write passes and signal the beam.
    pub fn sync(&mut self) {
        self.surface.set_offset(self.motion.position());

        self.bounds.clear();
        self.surface.read_card_bounds(&mut self.bounds);
        let band = BeamBand::centered(self.surface.viewport_width(), self.tuning.scan_band_width);
        self.any_scanning =
            compute_reveals(&self.bounds, band, &mut self.scanned, &mut self.reveals);
        self.surface.write_reveals(&self.reveals);

        // sent every frame, changed or not
        self.beam.borrow_mut().set_scanning_active(self.any_scanning);
        self.surface
            .set_speed_readout(self.motion.velocity().round().max(0.0) as u32);
    }

    pub fn begin_drag(&mut self, pointer_x: f32, timestamp_ms: f64) {
        self.motion.begin_drag(pointer_x, timestamp_ms);
        self.surface.set_dragging(true);
    }

    pub fn drag_to(&mut self, pointer_x: f32, timestamp_ms: f64) {
        if self.motion.drag_to(pointer_x, timestamp_ms) {
            self.sync();
        }
    }

    pub fn end_drag(&mut self) -> Option<Release> {
        let release = self.motion.end_drag()?;
        self.surface.set_dragging(false);
        log::debug!("[stream] drag released: {:?}", release);
        Some(release)
    }

    pub fn wheel(&mut self, delta_x: f32, delta_y: f32) {
        self.motion.wheel(delta_x, delta_y);
        log::debug!("[stream] wheel nudge parked the strip");
        self.sync();
    }

    pub fn toggle_animation(&mut self) -> bool {
        self.motion.toggle_animation()
    }

    pub fn reset_position(&mut self) {
        self.motion.reset(self.container_width);
        self.surface.set_dragging(false);
        self.sync();
    }

    pub fn change_direction(&mut self) -> Direction {
        self.motion.reverse();
        self.surface
            .set_speed_readout(self.motion.velocity().round().max(0.0) as u32);
        self.motion.direction()
    }

    /// The container changed size. A zero width is ignored.
    pub fn resize(&mut self, container_width: f32) {
        if container_width > 0.0 {
            self.container_width = container_width;
        }
    }

    /// Timer tick: give each decoded face a chance at fresh filler text.
    /// Returns how many faces were rewritten.
    pub fn regenerate_faces(&mut self) -> usize {
        let dims = code_dimensions(self.tuning.card_width, self.tuning.card_height);
        let mut rewritten = 0;
        for i in 0..self.surface.card_count() {
            if self.rng.gen::<f32>() < self.tuning.regen_probability {
                let text = generate_code(dims.columns, dims.rows, &mut self.rng);
                self.surface.set_decoded_text(i, &text);
                rewritten += 1;
            }
        }
        rewritten
    }
}

impl<S: StripSurface> FrameTask for CardStreamController<S> {
    fn frame(&mut self, _timestamp_ms: f64) {
        self.tick();
    }
}
