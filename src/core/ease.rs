//! Interpolation Primitives
//!
//! Pure easing functions shared by the timed action states and by facing
//! steering. All of them work on anything that can be scaled and added,
//! so the same curve drives an angle (`f32`) or a position (`Vec2`).
//!
//! ```text
//! ease_in(t)  = delta·(t/d)² + start              slow start, fast finish
//! ease_out(t) = −delta·(t/d)·((t/d) − 2) + start  fast start, slow finish
//! smooth(p)   = old·(1 − p/100) + new·(p/100)     asymptotic approach
//! ```

use super::vec2::Vec2;

/// Values that the easing curves can operate on.
pub trait Interpolate: Copy {
    /// `self * factor`
    fn scaled(self, factor: f32) -> Self;
    /// `self + other`
    fn plus(self, other: Self) -> Self;
}

impl Interpolate for f32 {
    #[inline]
    fn scaled(self, factor: f32) -> Self {
        self * factor
    }

    #[inline]
    fn plus(self, other: Self) -> Self {
        self + other
    }
}

impl Interpolate for Vec2 {
    #[inline]
    fn scaled(self, factor: f32) -> Self {
        self.scale(factor)
    }

    #[inline]
    fn plus(self, other: Self) -> Self {
        self + other
    }
}

/// Elapsed fraction `t / duration`. A non-positive duration counts as done.
#[inline]
fn fraction(t: f32, duration: f32) -> f32 {
    if duration <= 0.0 {
        1.0
    } else {
        t / duration
    }
}

/// Quadratic ease-in: `delta·(t/duration)² + start`.
#[inline]
pub fn ease_in<T: Interpolate>(t: f32, start: T, delta: T, duration: f32) -> T {
    let f = fraction(t, duration);
    delta.scaled(f * f).plus(start)
}

/// Quadratic ease-out: `−delta·(t/duration)·((t/duration) − 2) + start`.
#[inline]
pub fn ease_out<T: Interpolate>(t: f32, start: T, delta: T, duration: f32) -> T {
    let f = fraction(t, duration);
    delta.scaled(-f * (f - 2.0)).plus(start)
}

/// Weighted running average toward a target.
///
/// Each application keeps `1 − p` of the old value and takes `p` of the new
/// one, so repeated application approaches the target but never lands on it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Smoothing {
    new_weight: f32,
}

impl Smoothing {
    /// Blend `old` toward `new`.
    #[inline]
    pub fn apply<T: Interpolate>(&self, old: T, new: T) -> T {
        old.scaled(1.0 - self.new_weight).plus(new.scaled(self.new_weight))
    }
}

/// Build a smoothing function taking `percentage` percent of the new value.
pub fn smooth(percentage: f32) -> Smoothing {
    Smoothing {
        new_weight: percentage / 100.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_ease_in_midpoint() {
        // Quarter of the change at half the time
        assert_eq!(ease_in(0.5, 0.0_f32, 8.0, 1.0), 2.0);
    }

    #[test]
    fn test_ease_out_midpoint() {
        // Three quarters of the change at half the time
        assert_eq!(ease_out(0.5, 0.0_f32, 8.0, 1.0), 6.0);
    }

    #[test]
    fn test_ease_on_vectors() {
        let start = Vec2::new(1.0, 1.0);
        let delta = Vec2::new(4.0, 0.0);
        assert_eq!(ease_out(0.25, start, delta, 0.25), Vec2::new(5.0, 1.0));
        assert_eq!(ease_in(0.0, start, delta, 0.25), start);
    }

    #[test]
    fn test_zero_duration_is_complete() {
        assert_eq!(ease_in(0.0, 1.0_f32, 2.0, 0.0), 3.0);
        assert_eq!(ease_out(0.0, 1.0_f32, 2.0, 0.0), 3.0);
    }

    #[test]
    fn test_smooth_never_snaps() {
        let s = smooth(12.0);
        let mut value = 0.0_f32;
        for _ in 0..50 {
            value = s.apply(value, 1.0);
        }
        assert!(value > 0.99);
        assert!(value < 1.0);
    }

    #[test]
    fn test_smooth_weights() {
        let s = smooth(10.0);
        assert!((s.apply(0.0_f32, 10.0) - 1.0).abs() < 1e-6);
        assert!((s.apply(10.0_f32, 0.0) - 9.0).abs() < 1e-5);
    }

    proptest! {
        #[test]
        fn ease_boundaries(
            start in -100.0f32..100.0,
            delta in -100.0f32..100.0,
            duration in 0.01f32..10.0,
        ) {
            prop_assert_eq!(ease_in(0.0, start, delta, duration), start);
            prop_assert_eq!(ease_out(0.0, start, delta, duration), start);
            prop_assert_eq!(ease_in(duration, start, delta, duration), start + delta);
            prop_assert_eq!(ease_out(duration, start, delta, duration), start + delta);
        }
    }
}
