//! Background point field: soft dots drifting left to right across the full
//! viewport width, independent of the scanner.

use super::config::AmbientTuning;
use super::constants::{
    AMBIENT_CAMERA_Z, AMBIENT_MAX_VELOCITY, AMBIENT_MIN_VELOCITY, AMBIENT_PHASE_SPACING,
};
use super::schedule::FrameTask;
use glam::{Mat4, Vec2, Vec3};
use rand::prelude::*;

#[derive(Clone, Copy, Debug)]
pub struct AmbientParticle {
    /// World position; x spans [-w/2, w/2] on screen, y spans [-h/2, h/2].
    pub pos: Vec2,
    /// Horizontal drift in px/s.
    pub velocity: f32,
    pub alpha: f32,
    pub size: f32,
    pub phase: f32,
}

pub struct AmbientParticleField {
    tuning: AmbientTuning,
    width: f32,
    particles: Vec<AmbientParticle>,
    rng: StdRng,
}

impl AmbientParticleField {
    pub fn new(viewport_width: f32, tuning: AmbientTuning, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let width = viewport_width.max(0.0);
        let h = tuning.height;
        let particles = (0..tuning.count)
            .map(|i| {
                let orbit = rng.gen_range(100.0..300.0);
                AmbientParticle {
                    pos: Vec2::new(
                        (rng.gen::<f32>() - 0.5) * width * 2.0,
                        (rng.gen::<f32>() - 0.5) * h,
                    ),
                    velocity: rng.gen_range(AMBIENT_MIN_VELOCITY..AMBIENT_MAX_VELOCITY),
                    alpha: rng.gen_range(0.2..1.0),
                    size: (rng.gen::<f32>() * (orbit - 60.0) + 60.0) / 8.0,
                    phase: i as f32 * AMBIENT_PHASE_SPACING,
                }
            })
            .collect();
        Self {
            tuning,
            width,
            particles,
            rng,
        }
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.tuning.height
    }

    pub fn point_size(&self) -> f32 {
        self.tuning.point_size
    }

    pub fn particles(&self) -> &[AmbientParticle] {
        &self.particles
    }

    /// x beyond which a particle wraps back to the left edge.
    pub fn exit_x(&self) -> f32 {
        self.width * 0.5 + self.tuning.exit_margin
    }

    pub fn entry_x(&self) -> f32 {
        -self.width * 0.5 - self.tuning.exit_margin
    }

    pub fn resize(&mut self, viewport_width: f32) {
        self.width = viewport_width.max(0.0);
    }

    /// Advance one fixed step. `elapsed_sec` feeds the vertical wobble.
    pub fn step(&mut self, elapsed_sec: f32) {
        let exit = self.exit_x();
        let entry = self.entry_x();
        let h = self.tuning.height;
        let dt = self.tuning.step_sec;
        let wobble = self.tuning.wobble;
        let alpha_step = self.tuning.alpha_step;
        for p in self.particles.iter_mut() {
            p.pos.x += p.velocity * dt;
            if p.pos.x > exit {
                p.pos.x = entry;
                p.pos.y = (self.rng.gen::<f32>() - 0.5) * h;
            }
            p.pos.y += (elapsed_sec + p.phase).sin() * wobble;

            // 1 in 10 dims, 1 in 10 brightens, the rest hold.
            match self.rng.gen_range(0..10) {
                1 if p.alpha > 0.0 => p.alpha -= alpha_step,
                2 if p.alpha < 1.0 => p.alpha += alpha_step,
                _ => {}
            }
            p.alpha = p.alpha.clamp(0.0, 1.0);
        }
    }

    /// Orthographic view-projection keeping the field edge to edge.
    pub fn view_projection(&self) -> Mat4 {
        let hw = self.width.max(1.0) * 0.5;
        let hh = self.tuning.height * 0.5;
        let proj = Mat4::orthographic_rh(-hw, hw, -hh, hh, 1.0, 1000.0);
        let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, AMBIENT_CAMERA_Z), Vec3::ZERO, Vec3::Y);
        proj * view
    }
}

impl FrameTask for AmbientParticleField {
    fn frame(&mut self, timestamp_ms: f64) {
        self.step((timestamp_ms * 0.001) as f32);
    }
}
