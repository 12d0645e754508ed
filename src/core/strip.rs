//! Strip motion: one position scalar fed by auto drift, pointer drag and wheel.

use super::config::StreamTuning;
use super::constants::DRAG_FALLBACK_RATE_HZ;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Direction::Left => -1.0,
            Direction::Right => 1.0,
        }
    }

    #[inline]
    pub fn reversed(self) -> Self {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    fn of(v: f32) -> Self {
        if v > 0.0 {
            Direction::Right
        } else {
            Direction::Left
        }
    }
}

/// Wrap into (-pattern_width, 0].
#[inline]
pub fn wrap_position(position: f32, pattern_width: f32) -> f32 {
    if pattern_width <= 0.0 || !position.is_finite() {
        return 0.0;
    }
    let r = position.rem_euclid(pattern_width);
    if r == 0.0 {
        0.0
    } else {
        let wrapped = r - pattern_width;
        // a tiny remainder minus the modulus can round to exactly -modulus
        if wrapped <= -pattern_width {
            0.0
        } else {
            wrapped
        }
    }
}

/// What a drag release turned into.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Release {
    /// Fast enough: the fling becomes the new cruise velocity.
    Fling { velocity: f32, direction: Direction },
    /// Too slow: back to the default cruise speed.
    Settle { velocity: f32 },
}

#[derive(Clone, Debug)]
pub struct StripMotion {
    position: f32,
    velocity: f32,
    direction: Direction,
    animating: bool,
    dragging: bool,
    last_pointer_x: f32,
    last_pointer_ms: f64,
    pointer_velocity: f32,
    /// Seconds since the last wheel stop, while parked by the wheel.
    wheel_idle: Option<f32>,
    pattern_width: f32,
    cruise_velocity: f32,
    min_release_velocity: f32,
    wheel_scale: f32,
    wheel_resume_after_sec: Option<f32>,
}

impl StripMotion {
    pub fn new(tuning: &StreamTuning) -> Self {
        Self {
            position: 0.0,
            velocity: tuning.cruise_velocity,
            direction: Direction::Left,
            animating: true,
            dragging: false,
            last_pointer_x: 0.0,
            last_pointer_ms: 0.0,
            pointer_velocity: 0.0,
            wheel_idle: None,
            pattern_width: tuning.pattern_width(),
            cruise_velocity: tuning.cruise_velocity,
            min_release_velocity: tuning.min_release_velocity,
            wheel_scale: tuning.wheel_scale,
            wheel_resume_after_sec: tuning.wheel_resume_after_sec,
        }
    }

    pub fn position(&self) -> f32 {
        self.position
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn is_animating(&self) -> bool {
        self.animating
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn pointer_velocity(&self) -> f32 {
        self.pointer_velocity
    }

    pub fn pattern_width(&self) -> f32 {
        self.pattern_width
    }

    pub fn is_wheel_parked(&self) -> bool {
        self.wheel_idle.is_some()
    }

    fn nudge(&mut self, delta: f32) {
        self.position = wrap_position(self.position + delta, self.pattern_width);
    }

    /// One frame of auto drift. Returns true if the position moved.
    pub fn advance(&mut self, dt_sec: f32) -> bool {
        if let (Some(idle), Some(after)) = (self.wheel_idle, self.wheel_resume_after_sec) {
            let idle = idle + dt_sec;
            if idle >= after {
                self.wheel_idle = None;
                self.velocity = self.cruise_velocity;
                self.animating = true;
                log::debug!("[strip] resuming after wheel idle {:.2}s", idle);
            } else {
                self.wheel_idle = Some(idle);
            }
        }
        if !self.animating || self.dragging {
            return false;
        }
        self.nudge(self.velocity * self.direction.sign() * dt_sec);
        true
    }

    pub fn begin_drag(&mut self, pointer_x: f32, timestamp_ms: f64) {
        self.dragging = true;
        self.animating = false;
        self.wheel_idle = None;
        self.last_pointer_x = pointer_x;
        self.last_pointer_ms = timestamp_ms;
        self.pointer_velocity = 0.0;
    }

    /// Follow the pointer. Returns false when no drag is in progress.
    pub fn drag_to(&mut self, pointer_x: f32, timestamp_ms: f64) -> bool {
        if !self.dragging {
            return false;
        }
        let dx = pointer_x - self.last_pointer_x;
        let dt_sec = ((timestamp_ms - self.last_pointer_ms) * 0.001) as f32;
        self.pointer_velocity = if dt_sec > 0.0 {
            dx / dt_sec
        } else {
            dx * DRAG_FALLBACK_RATE_HZ
        };
        self.last_pointer_x = pointer_x;
        self.last_pointer_ms = timestamp_ms;
        self.nudge(dx);
        true
    }

    pub fn end_drag(&mut self) -> Option<Release> {
        if !self.dragging {
            return None;
        }
        self.dragging = false;
        self.animating = true;
        let v = self.pointer_velocity;
        let release = if v.abs() > self.min_release_velocity {
            self.velocity = v.abs();
            self.direction = Direction::of(v);
            Release::Fling {
                velocity: self.velocity,
                direction: self.direction,
            }
        } else {
            self.velocity = self.cruise_velocity;
            Release::Settle {
                velocity: self.velocity,
            }
        };
        Some(release)
    }

    /// Horizontal delta wins when present, vertical otherwise. Parks the strip.
    pub fn wheel(&mut self, delta_x: f32, delta_y: f32) {
        let delta = if delta_x != 0.0 { delta_x } else { delta_y };
        self.nudge(delta * self.wheel_scale);
        self.velocity = 0.0;
        self.animating = false;
        self.wheel_idle = Some(0.0);
    }

    /// Returns the new animating state.
    pub fn toggle_animation(&mut self) -> bool {
        self.animating = !self.animating;
        self.wheel_idle = None;
        self.animating
    }

    pub fn reset(&mut self, container_width: f32) {
        self.position = wrap_position(container_width, self.pattern_width);
        self.velocity = self.cruise_velocity;
        self.direction = Direction::Left;
        self.animating = true;
        self.dragging = false;
        self.wheel_idle = None;
    }

    pub fn reverse(&mut self) {
        self.direction = self.direction.reversed();
    }
}
