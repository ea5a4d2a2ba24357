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
//! The particle system

use crate::display::{Camera, Surface};
use crate::ecs::{Component, World};
use crate::particles::particle::{Particle, ParticleEmissionOptions, ParticleView};
use crate::particles::trail::TrailEmitter;
use crate::pool::{Pool, PoolConfig, PoolStats};
use crate::vec::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Pooled, non-physical particles plus entity trails
pub struct ParticleSystem {
    active: Vec<Particle>,
    pool: Pool<Particle>,
    trail: Component<Vec<TrailEmitter>>,
    rng: StdRng,
}

impl ParticleSystem {
    /// Create a particle system, registering its trail component in `world`
    pub fn new(world: &mut World) -> Self {
        Self::build(world, StdRng::from_entropy(), PoolConfig::default())
    }

    /// Particle system with a deterministic random source
    pub fn with_seed(world: &mut World, seed: u64) -> Self {
        Self::build(world, StdRng::seed_from_u64(seed), PoolConfig::default())
    }

    /// Particle system with custom pool settings
    pub fn with_pool_config(world: &mut World, config: PoolConfig) -> Self {
        Self::build(world, StdRng::from_entropy(), config)
    }

    /// Particle system with optional seed and custom pool settings
    pub fn with_options(world: &mut World, seed: Option<u64>, config: PoolConfig) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::build(world, rng, config)
    }

    fn build(world: &mut World, rng: StdRng, config: PoolConfig) -> Self {
        ParticleSystem {
            active: Vec::with_capacity(config.initial_capacity),
            pool: Pool::with_config(config),
            trail: world.component::<Vec<TrailEmitter>>(),
            rng,
        }
    }

    /// Component holding the trails attached to an entity
    pub fn trail_component(&self) -> Component<Vec<TrailEmitter>> {
        self.trail
    }

    /// Number of live particles
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Number of retired particles waiting for reuse
    pub fn pool_len(&self) -> usize {
        self.pool.len()
    }

    /// Pool hit/miss counters
    pub fn pool_stats(&self) -> &PoolStats {
        self.pool.stats()
    }

    /// Snapshot of every live particle, in storage order
    pub fn particles(&self) -> impl Iterator<Item = ParticleView> + '_ {
        self.active.iter().map(ParticleView::from)
    }

    /// Spawn `options.num_particles` particles
    ///
    /// Lifetime and speed are sampled uniformly from their ranges, the
    /// direction uniformly from the full circle.
    pub fn emit(&mut self, options: &ParticleEmissionOptions) {
        let (start_scale, end_scale) = options.scale.endpoints();
        for _ in 0..options.num_particles {
            let lifetime = options.particle_lifetime.at(self.rng.gen());
            let jitter = Vec2::new(
                (self.rng.gen::<f64>() - 0.5) * options.position_jitter,
                (self.rng.gen::<f64>() - 0.5) * options.position_jitter,
            );
            let speed = options.initial_velocity.at(self.rng.gen());
            let velocity = Vec2::random_with(&mut self.rng, speed);

            let mut particle = self.pool.acquire_or_else(|| Particle::blank(&options.body));
            particle.position = options.position + jitter;
            particle.velocity = velocity;
            particle.acceleration = options.acceleration;
            particle.color = options.color.start;
            particle.start_color = options.color.start;
            particle.end_color = options.color.end;
            particle.body = if options.orient_to_direction {
                options.body.with_rotation(velocity.angle())
            } else {
                options.body.clone()
            };
            particle.scale = start_scale;
            particle.start_scale = start_scale;
            particle.end_scale = end_scale;
            particle.lifetime = lifetime;
            particle.age = 0;
            self.active.push(particle);
        }
    }

    /// Age, move and expire particles, then service trails
    pub fn update(&mut self, world: &mut World) {
        for i in (0..self.active.len()).rev() {
            if !self.active[i].step() {
                let dead = self.active.swap_remove(i);
                self.pool.release(dead);
            }
        }

        let mut due = Vec::new();
        for entity in world.entities_with(self.trail) {
            let pos = world.pos(entity);
            if let Some(trails) = world.get_comp_mut(entity, self.trail) {
                for emitter in trails.iter_mut() {
                    if emitter.tick() {
                        due.push(emitter.options.emission_at(pos));
                    }
                }
            }
        }
        for options in &due {
            self.emit(options);
        }
    }

    /// Draw every live particle through the camera transform
    pub fn draw(&self, camera: &Camera, surface: &mut dyn Surface) {
        camera.apply_transforms(surface);
        for p in &self.active {
            p.body
                .draw(surface, p.position, p.color, true, 1.0, p.scale);
        }
        camera.remove_transforms(surface);
    }
}
