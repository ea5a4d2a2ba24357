// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Two dimensional vector math
//!
//! `Vec2` is a plain `Copy` value. Every operation returns a new vector,
//! nothing mutates in place.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

/// A 2D vector with `f64` components
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    /// X component
    pub x: f64,
    /// Y component
    pub y: f64,
}

impl Vec2 {
    /// The zero vector
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    /// Create a new vector
    pub const fn new(x: f64, y: f64) -> Self {
        Vec2 { x, y }
    }

    /// Shorthand for [`Vec2::ZERO`]
    pub const fn zero() -> Self {
        Self::ZERO
    }

    /// Unit vector pointing at `angle` radians
    pub fn from_angle(angle: f64) -> Self {
        Vec2::new(angle.cos(), angle.sin())
    }

    /// Random direction with the given length
    ///
    /// Uses the thread-local generator. Callers that need reproducible
    /// output should use [`Vec2::random_with`].
    pub fn random(magnitude: f64) -> Self {
        Self::random_with(&mut rand::thread_rng(), magnitude)
    }

    /// Random direction with the given length, drawn from `rng`
    pub fn random_with<R: Rng + ?Sized>(rng: &mut R, magnitude: f64) -> Self {
        let angle = rng.gen::<f64>() * TAU;
        Self::from_angle(angle).scale(magnitude)
    }

    /// Componentwise average; zero for an empty input
    pub fn average<I>(points: I) -> Self
    where
        I: IntoIterator<Item = Vec2>,
    {
        let mut sum = Vec2::ZERO;
        let mut count = 0usize;
        for p in points {
            sum = sum + p;
            count += 1;
        }
        if count == 0 {
            Vec2::ZERO
        } else {
            sum.scale(1.0 / count as f64)
        }
    }

    /// Multiply both components by `s`
    pub fn scale(self, s: f64) -> Self {
        Vec2::new(self.x * s, self.y * s)
    }

    /// Dot product
    pub fn dot(self, other: Vec2) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Squared length
    pub fn length_squared(self) -> f64 {
        self.dot(self)
    }

    /// Euclidean length
    pub fn length(self) -> f64 {
        self.length_squared().sqrt()
    }

    /// Unit vector in the same direction; the zero vector maps to itself
    pub fn normalize(self) -> Self {
        let len = self.length();
        if len == 0.0 {
            Vec2::ZERO
        } else {
            self.scale(1.0 / len)
        }
    }

    /// Angle from the positive x axis, `atan2(y, x)`
    pub fn angle(self) -> f64 {
        self.y.atan2(self.x)
    }

    /// Rotate counter-clockwise by `angle` radians
    pub fn rotate(self, angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Vec2::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }

    /// Linear interpolation towards `other`
    pub fn lerp(self, other: Vec2, t: f64) -> Self {
        self + (other - self).scale(t)
    }

    /// True when both components are finite
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl fmt::Display for Vec2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        *self = *self + rhs;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Vec2 {
    fn sub_assign(&mut self, rhs: Vec2) {
        *self = *self - rhs;
    }
}

impl Mul<f64> for Vec2 {
    type Output = Vec2;
    fn mul(self, rhs: f64) -> Vec2 {
        self.scale(rhs)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;
    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

impl From<(f64, f64)> for Vec2 {
    fn from((x, y): (f64, f64)) -> Self {
        Vec2::new(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_normalize_zero_is_zero() {
        assert_eq!(Vec2::ZERO.normalize(), Vec2::ZERO);
        let n = Vec2::new(3.0, 4.0).normalize();
        assert_relative_eq!(n.length(), 1.0);
    }

    #[test]
    fn test_add_then_sub_restores() {
        let a = Vec2::new(3.0, -7.0);
        let b = Vec2::new(11.0, 2.0);
        assert_eq!(a + b - b, a);

        let a = Vec2::new(0.1, 0.2);
        let b = Vec2::new(0.7, -0.3);
        let back = a + b - b;
        assert_relative_eq!(back.x, a.x, epsilon = 1e-12);
        assert_relative_eq!(back.y, a.y, epsilon = 1e-12);

        let mut c = a;
        c += b;
        c -= b;
        assert_eq!(c, a + b - b);
    }

    #[test]
    fn test_average() {
        assert_eq!(Vec2::average(Vec::new()), Vec2::ZERO);
        let v = Vec2::new(2.0, 5.0);
        assert_eq!(Vec2::average([v]), v);
        let avg = Vec2::average([Vec2::new(0.0, 0.0), Vec2::new(10.0, 4.0)]);
        assert_eq!(avg, Vec2::new(5.0, 2.0));
    }

    #[test]
    fn test_angle_quadrants() {
        assert_eq!(Vec2::new(1.0, 0.0).angle(), 0.0);
        assert_relative_eq!(Vec2::new(0.0, 1.0).angle(), FRAC_PI_2);
        assert_relative_eq!(Vec2::new(-1.0, 0.0).angle(), PI);
        assert_relative_eq!(Vec2::new(0.0, -1.0).angle(), -FRAC_PI_2);
    }

    #[test]
    fn test_random_has_requested_length() {
        for m in [0.0, 0.5, 1.0, 42.0] {
            assert_relative_eq!(Vec2::random(m).length(), m, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_dot_and_rotate() {
        assert_eq!(Vec2::new(1.0, 2.0).dot(Vec2::new(3.0, 4.0)), 11.0);
        let r = Vec2::new(1.0, 0.0).rotate(FRAC_PI_2);
        assert_relative_eq!(r.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(r.y, 1.0, epsilon = 1e-12);
    }
}
