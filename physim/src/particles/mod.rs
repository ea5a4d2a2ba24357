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
//! Visual-only particles
//!
//! Particles are not entities. They live inside the [`ParticleSystem`],
//! take no part in physics or collision, and are recycled through a
//! [`Pool`](crate::pool::Pool) when they expire.
//!
//! Each [`ParticleSystem::update`]:
//!
//! 1. ages every particle by one frame and retires the expired ones
//! 2. integrates the survivors (`velocity += acceleration`, then
//!    `position += velocity`) and interpolates scale and color by age
//! 3. counts down every trail attached to an entity and emits one
//!    stationary particle at the entity when a trail is due
//!
//! # Example
//!
//! ```rust
//! use physim::particles::{create_fire_effect, FireEffectOptions, ParticleSystem};
//! use physim::{Vec2, World};
//!
//! let mut world = World::new();
//! let mut particles = ParticleSystem::with_seed(&mut world, 7);
//!
//! particles.emit(&create_fire_effect(&FireEffectOptions::new(Vec2::ZERO)));
//! assert_eq!(particles.active_count(), 50);
//!
//! for _ in 0..120 {
//!     particles.update(&mut world);
//! }
//! assert_eq!(particles.active_count(), 0);
//! ```

mod effects;
mod particle;
mod system;
mod trail;

pub use effects::{create_fire_effect, FireEffectOptions};
pub use particle::{ColorRange, ParticleEmissionOptions, ParticleView, Range, Scale};
pub use system::ParticleSystem;
pub use trail::{TrailEmitter, TrailOptions};
