//! Simulation Clock
//!
//! Time only moves when the frame driver says so. Nothing in the simulation
//! reads the system clock, which keeps charge and cooldown behaviour
//! reproducible under test.

use serde::{Serialize, Deserialize};

/// Seconds since an actor came into existence, advanced once per tick.
///
/// Frame deltas arrive as `f32` but are summed in `f64`, so the reading does
/// not drift away from the frame count over a long session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Clock {
    now: f64,
}

impl Clock {
    /// A clock reading zero.
    pub const fn new() -> Self {
        Self { now: 0.0 }
    }

    /// Current reading in seconds.
    #[inline]
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Advance by `dt` seconds and return the progress actually applied.
    ///
    /// Negative or NaN deltas (pause/resume glitches) apply zero progress.
    #[inline]
    pub fn advance(&mut self, dt: f32) -> f32 {
        let step = clamp_delta(dt);
        self.now += f64::from(step);
        step
    }
}

/// Clamp a frame delta to non-negative progress.
#[inline]
pub fn clamp_delta(dt: f32) -> f32 {
    if dt > 0.0 {
        dt
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_advances() {
        let mut clock = Clock::new();
        clock.advance(0.25);
        clock.advance(0.5);
        assert_eq!(clock.now(), 0.75);
    }

    #[test]
    fn test_negative_delta_is_clamped() {
        let mut clock = Clock::new();
        clock.advance(1.0);
        assert_eq!(clock.advance(-3.0), 0.0);
        assert_eq!(clock.advance(f32::NAN), 0.0);
        assert_eq!(clock.now(), 1.0);
    }

    #[test]
    fn test_sixty_hertz_frames_sum_to_whole_seconds() {
        let mut clock = Clock::new();
        for _ in 0..45 {
            clock.advance(1.0 / 60.0);
        }
        assert!((clock.now() - 0.75).abs() < 1e-6);
    }
}
