//! Light-beam particle field.
//!
//! A vertical glowing bar at the horizontal centre of the surface with a haze
//! of particles streaming rightward from it. The only inbound signal is
//! [`BeamParticleField::set_scanning_active`]; every tunable eases toward the
//! idle or scanning level set over the following frames.

use super::config::{BeamLevels, BeamTuning};
use super::constants::{
    BEAM_CULL_PER_FRAME, BEAM_CULL_SLACK, BEAM_RECYCLE_MARGIN, SPAWN_BOOSTS, SPAWN_SIZE_GAIN,
    SPAWN_SPEED_GAIN,
};
use super::schedule::FrameTask;
use glam::Vec2;
use rand::prelude::*;
use smallvec::SmallVec;

#[derive(Clone, Copy, Debug, Default)]
pub struct BeamParticle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub alpha: f32,
    pub base_alpha: f32,
    pub decay: f32,
    /// Remaining life, 1.0 at spawn.
    pub life: f32,
    /// Frames since the last (re)spawn; drives the twinkle phase.
    pub age: u32,
    pub twinkle_speed: f32,
    pub twinkle_amount: f32,
}

/// Smoothed values the renderer reads each frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BeamState {
    pub intensity: f32,
    pub max_particles: f32,
    pub fade_zone: f32,
    pub glow: f32,
}

impl From<BeamLevels> for BeamState {
    fn from(l: BeamLevels) -> Self {
        Self {
            intensity: l.intensity,
            max_particles: l.max_particles,
            fade_zone: l.fade_zone,
            glow: l.glow,
        }
    }
}

/// Colour stops are (offset, rgb, alpha) across the band's width.
#[derive(Clone, Debug, PartialEq)]
pub struct GlowBand {
    pub left: f32,
    pub width: f32,
    pub corner_radius: f32,
    pub alpha: f32,
    pub stops: SmallVec<[(f32, [u8; 3], f32); 5]>,
}

const WHITE: [u8; 3] = [255, 255, 255];
const LAVENDER: [u8; 3] = [196, 181, 253];
const VIOLET: [u8; 3] = [139, 92, 246];

#[inline]
fn ease(current: f32, target: f32, rate: f32) -> f32 {
    current + (target - current) * rate
}

pub struct BeamParticleField {
    tuning: BeamTuning,
    width: f32,
    beam_x: f32,
    scanning: bool,
    state: BeamState,
    particles: Vec<BeamParticle>,
    rng: StdRng,
}

impl BeamParticleField {
    pub fn new(width: f32, tuning: BeamTuning, seed: u64) -> Self {
        let state = BeamState::from(tuning.idle);
        let capacity = tuning.capacity;
        let mut field = Self {
            tuning,
            width: width.max(0.0),
            beam_x: width.max(0.0) * 0.5,
            scanning: false,
            state,
            particles: Vec::with_capacity(capacity),
            rng: StdRng::seed_from_u64(seed),
        };
        let initial = (field.state.max_particles as usize).min(capacity);
        for _ in 0..initial {
            field.spawn();
        }
        field
    }

    /// Flip the smoothing targets. Nothing changes until the next frame.
    pub fn set_scanning_active(&mut self, active: bool) {
        self.scanning = active;
    }

    pub fn is_scanning(&self) -> bool {
        self.scanning
    }

    /// New surface width. Live particles keep their positions; only the beam
    /// centre and the recycle bound move.
    pub fn resize(&mut self, width: f32) {
        self.width = width.max(0.0);
        self.beam_x = self.width * 0.5;
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.tuning.surface_height
    }

    pub fn beam_x(&self) -> f32 {
        self.beam_x
    }

    pub fn bar_width(&self) -> f32 {
        self.tuning.bar_width
    }

    pub fn state(&self) -> BeamState {
        self.state
    }

    pub fn targets(&self) -> BeamLevels {
        if self.scanning {
            self.tuning.scanning
        } else {
            self.tuning.idle
        }
    }

    pub fn particles(&self) -> &[BeamParticle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Smoothed particle budget, floored the way the spawn/cull checks use it.
    pub fn max_particles(&self) -> usize {
        self.state.max_particles.max(0.0) as usize
    }

    #[inline]
    fn intensity_ratio(&self) -> f32 {
        let base = self.tuning.idle.intensity;
        if base > 0.0 {
            self.state.intensity / base
        } else {
            1.0
        }
    }

    /// Advance one frame: ease parameters, move particles, spawn, cull.
    pub fn step(&mut self) {
        self.ease_toward_targets();
        self.update_particles();
        self.spawn_for_frame();
        self.cull_overshoot();
    }

    pub fn ease_toward_targets(&mut self) {
        let target = self.targets();
        let rate = self.tuning.transition_rate;
        self.state.intensity = ease(self.state.intensity, target.intensity, rate);
        self.state.max_particles = ease(self.state.max_particles, target.max_particles, rate);
        self.state.fade_zone = ease(self.state.fade_zone, target.fade_zone, rate);
        self.state.glow = ease(self.state.glow, target.glow, rate);
    }

    fn update_particles(&mut self) {
        let ratio = self.intensity_ratio();
        let bound = self.width + BEAM_RECYCLE_MARGIN;
        let (beam_x, bar_w, h) = (self.beam_x, self.tuning.bar_width, self.tuning.surface_height);
        for p in self.particles.iter_mut() {
            p.pos += p.vel;
            p.age = p.age.wrapping_add(1);
            p.alpha = p.base_alpha * p.life
                + (p.age as f32 * p.twinkle_speed).sin() * p.twinkle_amount;
            p.life -= p.decay;
            if p.life <= 0.0 || p.pos.x > bound {
                respawn(p, &mut self.rng, beam_x, bar_w, h, ratio);
            }
        }
    }

    /// Up to five spawns: one base roll gated by the budget, then one extra
    /// roll per boost threshold the intensity ratio has passed.
    fn spawn_for_frame(&mut self) -> usize {
        let mut spawned = 0;
        let ratio = self.intensity_ratio();
        if self.rng.gen::<f32>() < self.state.intensity && self.len() < self.max_particles() {
            spawned += self.spawn() as usize;
        }
        for (threshold, offset, gain) in SPAWN_BOOSTS {
            if ratio > threshold && self.rng.gen::<f32>() < (ratio - offset) * gain {
                spawned += self.spawn() as usize;
            }
        }
        spawned
    }

    fn spawn(&mut self) -> bool {
        if self.particles.len() >= self.tuning.capacity {
            return false;
        }
        let ratio = self.intensity_ratio();
        let mut p = BeamParticle::default();
        respawn(
            &mut p,
            &mut self.rng,
            self.beam_x,
            self.tuning.bar_width,
            self.tuning.surface_height,
            ratio,
        );
        self.particles.push(p);
        true
    }

    /// Trim the arena tail when the live count runs well past the budget.
    /// Returns how many particles were dropped.
    pub fn cull_overshoot(&mut self) -> usize {
        let max = self.max_particles();
        let count = self.particles.len();
        if count <= max + BEAM_CULL_SLACK {
            return 0;
        }
        let excess = BEAM_CULL_PER_FRAME.min(count - max);
        self.particles.truncate(count - excess);
        excess
    }

    /// Vertical edge fade: 0 at the top/bottom edge, 1 past the fade zone.
    pub fn fade_alpha(&self, y: f32) -> f32 {
        let fz = self.state.fade_zone;
        let h = self.tuning.surface_height;
        if fz <= 0.0 {
            return 1.0;
        }
        let a = if y < fz {
            y / fz
        } else if y > h - fz {
            (h - y) / fz
        } else {
            1.0
        };
        a.clamp(0.0, 1.0)
    }

    /// Opacity a particle is drawn with after twinkle and edge fade.
    pub fn draw_alpha(&self, p: &BeamParticle) -> f32 {
        if p.life <= 0.0 {
            return 0.0;
        }
        (p.alpha * self.fade_alpha(p.pos.y)).clamp(0.0, 1.0)
    }

    /// Fractions of the height where the bar mask reaches full opacity.
    pub fn mask_stops(&self) -> (f32, f32) {
        let h = self.tuning.surface_height.max(1.0);
        let f = (self.state.fade_zone / h).clamp(0.0, 0.5);
        (f, 1.0 - f)
    }

    /// Nested bands for the bar, innermost first. The widest band only shows
    /// while scanning.
    pub fn glow_bands(&self) -> SmallVec<[GlowBand; 4]> {
        let lw = self.tuning.bar_width;
        let g = self.state.glow;
        let x = self.beam_x;
        let scanning = self.scanning;
        let mut bands = SmallVec::new();

        bands.push(GlowBand {
            left: x - lw * 0.5,
            width: lw,
            corner_radius: 15.0,
            alpha: 1.0,
            stops: SmallVec::from_slice(&[
                (0.0, WHITE, 0.0),
                (0.3, WHITE, 0.9 * g),
                (0.5, WHITE, g),
                (0.7, WHITE, 0.9 * g),
                (1.0, WHITE, 0.0),
            ]),
        });
        bands.push(GlowBand {
            left: x - lw * 2.0,
            width: lw * 4.0,
            corner_radius: 25.0,
            alpha: if scanning { 1.0 } else { 0.8 },
            stops: SmallVec::from_slice(&[
                (0.0, VIOLET, 0.0),
                (0.5, LAVENDER, 0.8 * g),
                (1.0, VIOLET, 0.0),
            ]),
        });
        bands.push(GlowBand {
            left: x - lw * 4.0,
            width: lw * 8.0,
            corner_radius: 35.0,
            alpha: if scanning { 0.8 } else { 0.6 },
            stops: SmallVec::from_slice(&[
                (0.0, VIOLET, 0.0),
                (0.5, VIOLET, 0.4 * g),
                (1.0, VIOLET, 0.0),
            ]),
        });
        if scanning {
            bands.push(GlowBand {
                left: x - lw * 8.0,
                width: lw * 16.0,
                corner_radius: 45.0,
                alpha: 0.6,
                stops: SmallVec::from_slice(&[
                    (0.0, VIOLET, 0.0),
                    (0.5, VIOLET, 0.2),
                    (1.0, VIOLET, 0.0),
                ]),
            });
        }
        bands
    }
}

impl FrameTask for BeamParticleField {
    fn frame(&mut self, _timestamp_ms: f64) {
        self.step();
    }
}

/// Shared by fresh spawns and recycling: new position on the bar, new motion.
fn respawn(
    p: &mut BeamParticle,
    rng: &mut StdRng,
    beam_x: f32,
    bar_width: f32,
    height: f32,
    intensity_ratio: f32,
) {
    let speed = 1.0 + (intensity_ratio - 1.0) * SPAWN_SPEED_GAIN;
    let size = 1.0 + (intensity_ratio - 1.0) * SPAWN_SIZE_GAIN;
    let half = bar_width * 0.5;

    p.pos = Vec2::new(
        beam_x + rng.gen_range(-half..=half),
        rng.gen_range(0.0..height.max(f32::EPSILON)),
    );
    p.vel = Vec2::new(
        rng.gen_range(0.2..1.0) * speed,
        rng.gen_range(-0.15..0.15) * speed,
    );
    p.radius = rng.gen_range(0.4..1.0) * size;
    p.alpha = rng.gen_range(0.6..1.0);
    p.base_alpha = p.alpha;
    p.decay = rng.gen_range(0.005..0.025) * (2.0 - intensity_ratio * 0.5).max(0.1);
    p.life = 1.0;
    p.age = 0;
    p.twinkle_speed = rng.gen_range(0.02..0.08) * speed;
    p.twinkle_amount = rng.gen_range(0.1..0.25);
}
