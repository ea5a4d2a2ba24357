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
//! Particle records and emission parameters

use crate::body::Body;
use crate::display::Color;
use crate::vec::Vec2;

/// Inclusive numeric range sampled uniformly
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    /// Lower bound
    pub min: f64,
    /// Upper bound
    pub max: f64,
}

impl Range {
    /// Range from `min` to `max`
    pub fn new(min: f64, max: f64) -> Self {
        Range { min, max }
    }

    /// Degenerate range holding one value
    pub fn constant(value: f64) -> Self {
        Range {
            min: value,
            max: value,
        }
    }

    /// Map a unit sample `t` in `[0, 1)` into the range
    pub(crate) fn at(&self, t: f64) -> f64 {
        self.min + t * (self.max - self.min)
    }
}

/// Particle scale over its life
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scale {
    /// Same scale for the whole life
    Constant(f64),
    /// Interpolated from `start` at birth to `end` at death
    Range {
        /// Scale at birth
        start: f64,
        /// Scale at death
        end: f64,
    },
}

impl Scale {
    pub(crate) fn endpoints(&self) -> (f64, f64) {
        match *self {
            Scale::Constant(s) => (s, s),
            Scale::Range { start, end } => (start, end),
        }
    }
}

impl Default for Scale {
    fn default() -> Self {
        Scale::Constant(1.0)
    }
}

impl From<f64> for Scale {
    fn from(s: f64) -> Self {
        Scale::Constant(s)
    }
}

/// Start and end colors of a particle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorRange {
    /// Color at birth
    pub start: Color,
    /// Color at death
    pub end: Color,
}

impl ColorRange {
    /// Fade from `start` to `end`
    pub fn new(start: Color, end: Color) -> Self {
        ColorRange { start, end }
    }

    /// One color for the whole life
    pub fn constant(color: Color) -> Self {
        ColorRange {
            start: color,
            end: color,
        }
    }
}

/// Parameters for a burst of particles
#[derive(Debug, Clone)]
pub struct ParticleEmissionOptions {
    /// Number of particles to emit
    pub num_particles: usize,
    /// Emission center
    pub position: Vec2,
    /// Each particle is offset by up to half this value on both axes
    pub position_jitter: f64,
    /// Lifetime in frames
    pub particle_lifetime: Range,
    /// Initial speed; direction is uniformly random
    pub initial_velocity: Range,
    /// Constant per-frame acceleration
    pub acceleration: Vec2,
    /// Scale over life
    pub scale: Scale,
    /// Shape drawn for each particle
    pub body: Body,
    /// Color over life
    pub color: ColorRange,
    /// Rotate each particle's body to face its initial velocity
    pub orient_to_direction: bool,
}

impl ParticleEmissionOptions {
    /// Burst of `num_particles` at `position`
    ///
    /// Optional settings start at their defaults: no jitter, no
    /// acceleration, scale 1, no orientation.
    pub fn new(
        num_particles: usize,
        position: Vec2,
        particle_lifetime: Range,
        initial_velocity: Range,
        body: Body,
        color: ColorRange,
    ) -> Self {
        ParticleEmissionOptions {
            num_particles,
            position,
            position_jitter: 0.0,
            particle_lifetime,
            initial_velocity,
            acceleration: Vec2::ZERO,
            scale: Scale::default(),
            body,
            color,
            orient_to_direction: false,
        }
    }

    /// Set the position jitter
    pub fn with_jitter(mut self, jitter: f64) -> Self {
        self.position_jitter = jitter;
        self
    }

    /// Set the constant acceleration
    pub fn with_acceleration(mut self, acceleration: Vec2) -> Self {
        self.acceleration = acceleration;
        self
    }

    /// Set the scale over life
    pub fn with_scale(mut self, scale: impl Into<Scale>) -> Self {
        self.scale = scale.into();
        self
    }

    /// Orient bodies along their initial velocity
    pub fn oriented(mut self) -> Self {
        self.orient_to_direction = true;
        self
    }
}

/// Live particle state; never exposed outside the particle system
#[derive(Debug, Clone)]
pub(crate) struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    pub acceleration: Vec2,
    pub color: Color,
    pub start_color: Color,
    pub end_color: Color,
    pub body: Body,
    pub scale: f64,
    pub start_scale: f64,
    pub end_scale: f64,
    pub lifetime: f64,
    pub age: u32,
}

impl Particle {
    pub fn blank(body: &Body) -> Self {
        Particle {
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            acceleration: Vec2::ZERO,
            color: Color::WHITE,
            start_color: Color::WHITE,
            end_color: Color::WHITE,
            body: body.clone(),
            scale: 1.0,
            start_scale: 1.0,
            end_scale: 1.0,
            lifetime: 0.0,
            age: 0,
        }
    }

    /// Advance one frame; returns false once the particle has expired
    pub fn step(&mut self) -> bool {
        self.age += 1;
        let age = self.age as f64;
        if age >= self.lifetime {
            return false;
        }

        self.velocity += self.acceleration;
        self.position += self.velocity;

        let life_ratio = age / self.lifetime;
        self.scale = self.start_scale + (self.end_scale - self.start_scale) * life_ratio;
        self.color = self.start_color.lerp(&self.end_color, life_ratio);
        true
    }
}

/// Read-only snapshot of a live particle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleView {
    /// Current position
    pub position: Vec2,
    /// Current velocity
    pub velocity: Vec2,
    /// Interpolated color
    pub color: Color,
    /// Interpolated scale
    pub scale: f64,
    /// Frames lived
    pub age: u32,
    /// Frames until expiry, counted from birth
    pub lifetime: f64,
    /// Body rotation
    pub rotation: f64,
}

impl From<&Particle> for ParticleView {
    fn from(p: &Particle) -> Self {
        ParticleView {
            position: p.position,
            velocity: p.velocity,
            color: p.color,
            scale: p.scale,
            age: p.age,
            lifetime: p.lifetime,
            rotation: p.body.rotation,
        }
    }
}
