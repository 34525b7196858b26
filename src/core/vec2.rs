//! 2D Vector
//!
//! Plain `f32` vector used for positions, facings and impulses.
//! Rotation is expressed in degrees, counter-clockwise.

use std::fmt;
use std::ops::{Add, AddAssign, Mul, Neg, Sub};
use serde::{Serialize, Deserialize};

/// 2D vector with `f32` components.
#[derive(Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
}

impl Vec2 {
    /// Zero vector
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Unit vector pointing right (+X)
    pub const RIGHT: Self = Self { x: 1.0, y: 0.0 };

    /// Unit vector pointing up (+Y)
    pub const UP: Self = Self { x: 0.0, y: 1.0 };

    /// Create a new vector.
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Scale by a scalar.
    #[inline]
    pub fn scale(self, scalar: f32) -> Self {
        Self {
            x: self.x * scalar,
            y: self.y * scalar,
        }
    }

    /// Squared length (avoids sqrt - prefer this for comparisons).
    #[inline]
    pub fn length_squared(self) -> f32 {
        self.x * self.x + self.y * self.y
    }

    /// Length (magnitude).
    #[inline]
    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    /// Squared distance to another point.
    #[inline]
    pub fn distance_squared(self, other: Self) -> f32 {
        (self - other).length_squared()
    }

    /// Distance to another point.
    #[inline]
    pub fn distance(self, other: Self) -> f32 {
        self.distance_squared(other).sqrt()
    }

    /// Is this the zero vector?
    #[inline]
    pub fn is_zero(self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    /// Normalize to unit length.
    /// Returns ZERO if length is zero.
    #[inline]
    pub fn normalize(self) -> Self {
        let len = self.length();
        if len == 0.0 {
            return Self::ZERO;
        }
        self.scale(1.0 / len)
    }

    /// Rescale to the given length, keeping direction.
    #[inline]
    pub fn scale_to(self, length: f32) -> Self {
        self.normalize().scale(length)
    }

    /// Rotate counter-clockwise by `degrees`.
    pub fn rotate(self, degrees: f32) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Self {
            x: self.x * cos - self.y * sin,
            y: self.x * sin + self.y * cos,
        }
    }

    /// Approximate equality, component-wise.
    #[inline]
    pub fn approx_eq(self, other: Self, epsilon: f32) -> bool {
        (self.x - other.x).abs() <= epsilon && (self.y - other.y).abs() <= epsilon
    }
}

impl Add for Vec2 {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: f32) -> Self {
        self.scale(rhs)
    }
}

impl Neg for Vec2 {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

impl fmt::Debug for Vec2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Vec2({:.3}, {:.3})", self.x, self.y)
    }
}

impl fmt::Display for Vec2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec2_add_sub() {
        let a = Vec2::new(3.0, 4.0);
        let b = Vec2::new(1.0, 2.0);
        assert_eq!(a + b, Vec2::new(4.0, 6.0));
        assert_eq!(a - b, Vec2::new(2.0, 2.0));
        assert_eq!(-a, Vec2::new(-3.0, -4.0));
    }

    #[test]
    fn test_vec2_length() {
        // 3-4-5 triangle
        let v = Vec2::new(3.0, 4.0);
        assert_eq!(v.length_squared(), 25.0);
        assert_eq!(v.length(), 5.0);
        assert_eq!(Vec2::ZERO.distance(v), 5.0);
    }

    #[test]
    fn test_vec2_normalize() {
        let norm = Vec2::new(3.0, 4.0).normalize();
        assert!((norm.length() - 1.0).abs() < 1e-6);

        // Zero vector normalizes to zero
        assert_eq!(Vec2::ZERO.normalize(), Vec2::ZERO);
    }

    #[test]
    fn test_vec2_rotate() {
        let up = Vec2::RIGHT.rotate(90.0);
        assert!(up.approx_eq(Vec2::UP, 1e-6));

        let back = Vec2::UP.rotate(-90.0);
        assert!(back.approx_eq(Vec2::RIGHT, 1e-6));
    }

    #[test]
    fn test_vec2_scale_to() {
        let v = Vec2::new(0.0, 10.0).scale_to(2.5);
        assert!(v.approx_eq(Vec2::new(0.0, 2.5), 1e-6));
    }
}
