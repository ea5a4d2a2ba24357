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
//! Mutual Newtonian attraction between massive entities
//!
//! For each entity with a `mass`, every other massive entity contributes
//!
//! ```text
//! F = G * m1 * m2 / d²
//! ```
//!
//! along the line between them, and `F / m1` is added to the entity's
//! acceleration. Each ordered pair is evaluated once per visited entity,
//! so a full pass is O(n²). Coincident bodies (`d² == 0`) exert no force
//! on each other.
//!
//! The pass reads a snapshot of `(entity, position, mass)` taken at the
//! first gravity evaluation of each frame. Gravity runs at the default
//! priority, before any built-in force moves an entity, so the snapshot
//! matches what a live read would see.
//!
//! # Parallelization
//!
//! With the `parallel` feature the inner sum over other bodies is split
//! across the Rayon pool once the body count reaches
//! [`PARALLEL_THRESHOLD`]. Results match the sequential path up to
//! floating point summation order.

use crate::ecs::{Component, Entity, World};
use crate::physics::Physics;
use crate::vec::Vec2;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Body count at which the inner sum switches to Rayon
pub const PARALLEL_THRESHOLD: usize = 256;

#[derive(Debug, Clone, Copy)]
struct MassiveBody {
    entity: Entity,
    pos: Vec2,
    mass: f64,
}

#[derive(Default)]
struct Snapshot {
    frame: Option<u64>,
    bodies: Vec<MassiveBody>,
}

impl Snapshot {
    fn refresh(&mut self, world: &World, mass: Component<f64>) {
        if self.frame == Some(world.frame()) {
            return;
        }
        self.frame = Some(world.frame());
        self.bodies.clear();
        self.bodies.extend(world.query(mass).into_iter().map(|(entity, m)| MassiveBody {
            entity,
            pos: world.pos(entity),
            mass: m,
        }));
    }
}

/// Acceleration contributed to a body at `pos` by `other`
///
/// Equivalent to `(G * m1 * m2 / d²) / m1` along the normalized separation,
/// with `m1` cancelled so a massless probe still feels the pull.
fn pull(g: f64, pos: Vec2, other: &MassiveBody) -> Vec2 {
    let d = other.pos - pos;
    let dist_sq = d.dot(d);
    if dist_sq == 0.0 {
        return Vec2::ZERO;
    }
    d.normalize().scale(g * other.mass / dist_sq)
}

#[cfg(feature = "parallel")]
fn total_pull(g: f64, entity: Entity, pos: Vec2, bodies: &[MassiveBody]) -> Vec2 {
    if bodies.len() >= PARALLEL_THRESHOLD {
        bodies
            .par_iter()
            .filter(|b| b.entity != entity)
            .map(|b| pull(g, pos, b))
            .reduce(|| Vec2::ZERO, |a, b| a + b)
    } else {
        sequential_pull(g, entity, pos, bodies)
    }
}

#[cfg(not(feature = "parallel"))]
fn total_pull(g: f64, entity: Entity, pos: Vec2, bodies: &[MassiveBody]) -> Vec2 {
    sequential_pull(g, entity, pos, bodies)
}

fn sequential_pull(g: f64, entity: Entity, pos: Vec2, bodies: &[MassiveBody]) -> Vec2 {
    bodies
        .iter()
        .filter(|b| b.entity != entity)
        .fold(Vec2::ZERO, |acc, b| acc + pull(g, pos, b))
}

/// Register mutual gravitation over `physics.mass()` at the default priority
///
/// `g` is the gravitational constant in simulation units.
///
/// # Panics
///
/// Panics if `g` is not finite.
pub fn init_gravity_force(physics: &mut Physics, g: f64) {
    assert!(g.is_finite(), "gravitational constant must be finite");

    let mass = physics.mass();
    let acceleration = physics.acceleration();
    let mut snapshot = Snapshot::default();

    physics.register_force(mass, move |world: &mut World, entity, _m: f64| {
        snapshot.refresh(world, mass);
        let added = total_pull(g, entity, world.pos(entity), &snapshot.bodies);
        if !added.is_finite() {
            log::warn!("gravity produced a non-finite acceleration for {}, skipping", entity);
            return;
        }
        let current = world.get_comp(entity, acceleration).copied().unwrap_or_default();
        world.add_comp(entity, acceleration, current + added);
    });
    log::debug!("gravity force registered with G = {}", g);
}
