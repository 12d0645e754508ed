//! Tuning constants for the scanner strip.
//!
//! Everything numeric the three components agree on lives here so the
//! config defaults, the browser glue and the tests read the same values.

// ---------------- Light beam field ----------------

// Drawing surface height (px); width follows the host element
pub const BEAM_SURFACE_HEIGHT: f32 = 300.0;
// Core bar width (px); glow bands are multiples of this
pub const LIGHT_BAR_WIDTH: f32 = 3.0;
// Single-pole smoothing factor applied once per frame
pub const BEAM_TRANSITION_RATE: f32 = 0.05;

// Idle (nothing under the beam)
pub const IDLE_INTENSITY: f32 = 0.8;
pub const IDLE_MAX_PARTICLES: f32 = 800.0;
pub const IDLE_FADE_ZONE: f32 = 60.0;
pub const IDLE_GLOW: f32 = 1.0;

// Scanning (at least one card under the beam)
pub const SCAN_INTENSITY: f32 = 1.8;
pub const SCAN_MAX_PARTICLES: f32 = 2500.0;
pub const SCAN_FADE_ZONE: f32 = 35.0;
pub const SCAN_GLOW: f32 = 3.5;

// Particles past surface width + margin are recycled
pub const BEAM_RECYCLE_MARGIN: f32 = 10.0;
// Overshoot tolerated before culling kicks in, and the per-frame cull cap
pub const BEAM_CULL_SLACK: usize = 200;
pub const BEAM_CULL_PER_FRAME: usize = 15;
// Hard arena bound; comfortably above scan max + slack + one frame of spawns
pub const BEAM_PARTICLE_CAPACITY: usize = 3072;

// Extra spawn rolls once intensity ratio passes a threshold:
// (threshold, offset, gain) -> p = (ratio - offset) * gain
pub const SPAWN_BOOSTS: [(f32, f32, f32); 4] = [
    (1.1, 1.0, 1.2),
    (1.3, 1.3, 1.4),
    (1.5, 1.5, 1.8),
    (2.0, 2.0, 2.0),
];

// Speed/size growth per unit of intensity ratio above 1
pub const SPAWN_SPEED_GAIN: f32 = 1.2;
pub const SPAWN_SIZE_GAIN: f32 = 0.7;

// Particle sprite (radial gradient) edge length in px
pub const BEAM_SPRITE_SIZE: u32 = 16;

// ---------------- Ambient field ----------------

pub const AMBIENT_PARTICLE_COUNT: usize = 400;
pub const AMBIENT_FIELD_HEIGHT: f32 = 250.0;
// Distance past the right edge before a particle wraps to the left
pub const AMBIENT_EXIT_MARGIN: f32 = 100.0;
pub const AMBIENT_STEP_SEC: f32 = 0.016;
// Vertical wobble per frame (px)
pub const AMBIENT_WOBBLE: f32 = 0.5;
// Per-particle phase spacing for the wobble
pub const AMBIENT_PHASE_SPACING: f32 = 0.1;
pub const AMBIENT_ALPHA_STEP: f32 = 0.05;
pub const AMBIENT_MIN_VELOCITY: f32 = 30.0;
pub const AMBIENT_MAX_VELOCITY: f32 = 90.0;
// Every point is drawn at this size; the per-particle size is not rendered
pub const AMBIENT_POINT_SIZE: f32 = 15.0;
// Camera sits at +Z looking at the origin plane
pub const AMBIENT_CAMERA_Z: f32 = 100.0;

// ---------------- Card stream ----------------

pub const CARD_WIDTH: f32 = 400.0;
pub const CARD_HEIGHT: f32 = 250.0;
pub const CARD_GAP: f32 = 60.0;
pub const CARD_COUNT: usize = 30;

pub const CARD_IMAGE_URLS: [&str; 5] = [
    "https://cdn.prod.website-files.com/68789c86c8bc802d61932544/689f20b55e654d1341fb06f8_4.1.png",
    "https://cdn.prod.website-files.com/68789c86c8bc802d61932544/689f20b5a080a31ee7154b19_1.png",
    "https://cdn.prod.website-files.com/68789c86c8bc802d61932544/689f20b5c1e4919fd69672b8_3.png",
    "https://cdn.prod.website-files.com/68789c86c8bc802d61932544/689f20b5f6a5e232e7beb4be_2.png",
    "https://cdn.prod.website-files.com/68789c86c8bc802d61932544/689f20b5bea2f1b07392d936_4.png",
];

// Fill used when a card image fails to load
pub const CARD_FALLBACK_FILL: &str = "linear-gradient(45deg, #667eea, #764ba2)";

// Strip motion (px, px/s)
pub const DEFAULT_CRUISE_VELOCITY: f32 = 120.0;
pub const MIN_RELEASE_VELOCITY: f32 = 30.0;
pub const STRIP_STEP_SEC: f32 = 0.016;
pub const WHEEL_SCALE: f32 = -0.5;
// Velocity estimate when two pointer samples share a timestamp
pub const DRAG_FALLBACK_RATE_HZ: f32 = 60.0;

// Beam band the cards are tested against (px, centred on the viewport)
pub const SCAN_BAND_WIDTH: f32 = 8.0;

// Decoded-face refresh
pub const REGEN_INTERVAL_MS: u32 = 200;
pub const REGEN_PROBABILITY: f32 = 0.15;

// ---------------- Filler code text ----------------

pub const CODE_FONT_SIZE_PX: f32 = 11.0;
pub const CODE_LINE_HEIGHT_PX: f32 = 13.0;
pub const CODE_CHAR_WIDTH_PX: f32 = 6.0;
