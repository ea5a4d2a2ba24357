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
//! Continuous per-entity emission

use crate::body::Body;
use crate::particles::particle::{ColorRange, ParticleEmissionOptions, Range, Scale};
use crate::vec::Vec2;

/// Configuration of a particle trail left behind an entity
#[derive(Debug, Clone)]
pub struct TrailOptions {
    /// Frames between emissions; values below 1 are treated as 1
    pub interval: u32,
    /// Lifetime of each particle in frames
    pub particle_lifetime: f64,
    /// Constant per-frame acceleration of each particle
    pub acceleration: Vec2,
    /// Scale over life
    pub scale: Scale,
    /// Shape of each particle
    pub body: Body,
    /// Color over life
    pub color: ColorRange,
    /// Rotate particles to face their velocity
    pub orient_to_direction: bool,
    /// Random offset from the emitter position
    pub position_jitter: f64,
}

impl TrailOptions {
    /// Trail emitting one particle every `interval` frames
    pub fn new(body: Body, color: ColorRange, interval: u32, particle_lifetime: f64) -> Self {
        TrailOptions {
            interval,
            particle_lifetime,
            acceleration: Vec2::ZERO,
            scale: Scale::default(),
            body,
            color,
            orient_to_direction: false,
            position_jitter: 0.0,
        }
    }

    /// Set the particle acceleration
    pub fn with_acceleration(mut self, acceleration: Vec2) -> Self {
        self.acceleration = acceleration;
        self
    }

    /// Set the scale over life
    pub fn with_scale(mut self, scale: impl Into<Scale>) -> Self {
        self.scale = scale.into();
        self
    }

    /// Set the position jitter
    pub fn with_jitter(mut self, jitter: f64) -> Self {
        self.position_jitter = jitter;
        self
    }

    /// Orient particles along their velocity
    pub fn oriented(mut self) -> Self {
        self.orient_to_direction = true;
        self
    }

    /// Single stationary particle at `position`
    pub(crate) fn emission_at(&self, position: Vec2) -> ParticleEmissionOptions {
        ParticleEmissionOptions {
            num_particles: 1,
            position,
            position_jitter: self.position_jitter,
            particle_lifetime: Range::constant(self.particle_lifetime),
            initial_velocity: Range::constant(0.0),
            acceleration: self.acceleration,
            scale: self.scale,
            body: self.body.clone(),
            color: self.color,
            orient_to_direction: self.orient_to_direction,
        }
    }
}

/// A trail plus its emission timer
///
/// This is what the trail component stores. The frame counter is private
/// to the particle system.
#[derive(Debug, Clone)]
pub struct TrailEmitter {
    /// Trail configuration
    pub options: TrailOptions,
    frames_since_emit: u32,
}

impl TrailEmitter {
    /// Emitter that fires for the first time after `options.interval` frames
    pub fn new(options: TrailOptions) -> Self {
        TrailEmitter {
            options,
            frames_since_emit: 0,
        }
    }

    /// Count one frame; true when a particle is due
    pub(crate) fn tick(&mut self) -> bool {
        self.frames_since_emit += 1;
        if self.frames_since_emit >= self.options.interval.max(1) {
            self.frames_since_emit = 0;
            true
        } else {
            false
        }
    }
}

impl From<TrailOptions> for TrailEmitter {
    fn from(options: TrailOptions) -> Self {
        TrailEmitter::new(options)
    }
}
