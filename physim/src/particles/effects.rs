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
//! Ready-made emission presets

use crate::body::{create_circle, Body};
use crate::display::Color;
use crate::particles::particle::{ColorRange, ParticleEmissionOptions, Range, Scale};
use crate::vec::Vec2;

/// Parameters for [`create_fire_effect`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FireEffectOptions {
    /// Center of the fire
    pub position: Vec2,
    /// Overall size multiplier
    pub size: f64,
    /// Particles per burst
    pub count: usize,
    /// Vertical acceleration per unit size; negative rises on a y-down canvas
    pub updraft: f64,
}

impl FireEffectOptions {
    /// Fire at `position` with size 1, 50 particles and an updraft of -0.015
    pub fn new(position: Vec2) -> Self {
        FireEffectOptions {
            position,
            size: 1.0,
            count: 50,
            updraft: -0.015,
        }
    }
}

/// Orange embers fading to transparent smoke
pub fn create_fire_effect(options: &FireEffectOptions) -> ParticleEmissionOptions {
    let size = options.size;
    ParticleEmissionOptions {
        num_particles: options.count,
        position: options.position,
        position_jitter: 10.0 * size,
        particle_lifetime: Range::new(60.0, 120.0),
        initial_velocity: Range::new(0.5 * size, 1.5 * size),
        acceleration: Vec2::new(0.0, options.updraft * size),
        scale: Scale::Range {
            start: 0.5 * size,
            end: 0.0,
        },
        body: Body::from_shape(create_circle(5.0 * size), 0.0),
        color: ColorRange::new(
            Color::from_rgba(255.0, 150.0, 50.0, 1.0),
            Color::from_rgba(50.0, 50.0, 50.0, 0.0),
        ),
        orient_to_direction: false,
    }
}
