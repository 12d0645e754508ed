use super::constants::*;
use super::error::ScannerError;

/// One set of beam targets. The field eases between the idle and scanning sets.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BeamLevels {
    pub intensity: f32,
    pub max_particles: f32,
    pub fade_zone: f32,
    pub glow: f32,
}

impl BeamLevels {
    pub const IDLE: BeamLevels = BeamLevels {
        intensity: IDLE_INTENSITY,
        max_particles: IDLE_MAX_PARTICLES,
        fade_zone: IDLE_FADE_ZONE,
        glow: IDLE_GLOW,
    };

    pub const SCANNING: BeamLevels = BeamLevels {
        intensity: SCAN_INTENSITY,
        max_particles: SCAN_MAX_PARTICLES,
        fade_zone: SCAN_FADE_ZONE,
        glow: SCAN_GLOW,
    };
}

#[derive(Clone, Debug)]
pub struct BeamTuning {
    pub idle: BeamLevels,
    pub scanning: BeamLevels,
    pub transition_rate: f32,
    pub bar_width: f32,
    pub surface_height: f32,
    pub capacity: usize,
}

impl Default for BeamTuning {
    fn default() -> Self {
        Self {
            idle: BeamLevels::IDLE,
            scanning: BeamLevels::SCANNING,
            transition_rate: BEAM_TRANSITION_RATE,
            bar_width: LIGHT_BAR_WIDTH,
            surface_height: BEAM_SURFACE_HEIGHT,
            capacity: BEAM_PARTICLE_CAPACITY,
        }
    }
}

#[derive(Clone, Debug)]
pub struct AmbientTuning {
    pub count: usize,
    pub height: f32,
    pub exit_margin: f32,
    pub step_sec: f32,
    pub wobble: f32,
    pub alpha_step: f32,
    /// On-screen point size in px.
    pub point_size: f32,
}

impl Default for AmbientTuning {
    fn default() -> Self {
        Self {
            count: AMBIENT_PARTICLE_COUNT,
            height: AMBIENT_FIELD_HEIGHT,
            exit_margin: AMBIENT_EXIT_MARGIN,
            step_sec: AMBIENT_STEP_SEC,
            wobble: AMBIENT_WOBBLE,
            alpha_step: AMBIENT_ALPHA_STEP,
            point_size: AMBIENT_POINT_SIZE,
        }
    }
}

#[derive(Clone, Debug)]
pub struct StreamTuning {
    pub card_width: f32,
    pub card_height: f32,
    pub card_gap: f32,
    pub card_count: usize,
    /// Number of distinct card images; one full cycle is the wrap modulus.
    pub distinct_cards: usize,
    pub cruise_velocity: f32,
    pub min_release_velocity: f32,
    pub step_sec: f32,
    pub wheel_scale: f32,
    pub scan_band_width: f32,
    pub regen_interval_ms: u32,
    pub regen_probability: f32,
    /// Resume cruising after this much wheel-idle time. `None` keeps the strip
    /// parked after a wheel nudge until a drag, pause toggle or reset.
    pub wheel_resume_after_sec: Option<f32>,
}

impl Default for StreamTuning {
    fn default() -> Self {
        Self {
            card_width: CARD_WIDTH,
            card_height: CARD_HEIGHT,
            card_gap: CARD_GAP,
            card_count: CARD_COUNT,
            distinct_cards: CARD_IMAGE_URLS.len(),
            cruise_velocity: DEFAULT_CRUISE_VELOCITY,
            min_release_velocity: MIN_RELEASE_VELOCITY,
            step_sec: STRIP_STEP_SEC,
            wheel_scale: WHEEL_SCALE,
            scan_band_width: SCAN_BAND_WIDTH,
            regen_interval_ms: REGEN_INTERVAL_MS,
            regen_probability: REGEN_PROBABILITY,
            wheel_resume_after_sec: None,
        }
    }
}

impl StreamTuning {
    /// Width of one full image cycle.
    #[inline]
    pub fn pattern_width(&self) -> f32 {
        (self.card_width + self.card_gap) * self.distinct_cards as f32
    }
}

#[derive(Clone, Debug, Default)]
pub struct ScannerConfig {
    pub beam: BeamTuning,
    pub stream: StreamTuning,
    pub ambient: AmbientTuning,
}

impl ScannerConfig {
    pub fn validate(&self) -> Result<(), ScannerError> {
        let s = &self.stream;
        if s.card_width <= 0.0 || s.card_height <= 0.0 || s.card_gap < 0.0 {
            return Err(ScannerError::InvalidTuning(format!(
                "card geometry {}x{} gap {}",
                s.card_width, s.card_height, s.card_gap
            )));
        }
        if s.distinct_cards == 0 || s.card_count == 0 {
            return Err(ScannerError::InvalidTuning("empty card set".into()));
        }
        if self.beam.surface_height <= 0.0 || self.beam.bar_width <= 0.0 {
            return Err(ScannerError::InvalidTuning("beam surface".into()));
        }
        let peak = self.beam.idle.max_particles.max(self.beam.scanning.max_particles);
        if (peak as usize) > self.beam.capacity {
            return Err(ScannerError::InvalidTuning(format!(
                "max particles {} above arena capacity {}",
                peak, self.beam.capacity
            )));
        }
        if self.ambient.height <= 0.0 {
            return Err(ScannerError::InvalidTuning("ambient height".into()));
        }
        Ok(())
    }
}
