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
//! Force pipeline
//!
//! [`Physics`] owns the built-in `velocity`, `acceleration` and `mass`
//! components and a list of forces. A force is a component set plus a
//! function applied to every entity carrying that set. Each call to
//! [`Physics::update`] runs every force once, in ascending priority order.
//!
//! Two forces are registered up front:
//!
//! | priority | force |
//! |---|---|
//! | 1 | `velocity += acceleration`, then `acceleration = 0` |
//! | 2 | `pos += velocity` |
//!
//! Anything registered at the default priority (0) therefore runs before
//! acceleration is folded into velocity. Ties keep registration order.
//!
//! # Example
//!
//! ```rust
//! use physim::{Physics, Vec2, World};
//!
//! let mut world = World::new();
//! let mut physics = Physics::new(&mut world);
//!
//! let player = world.spawn(Vec2::ZERO);
//! world.add_comp(player, physics.velocity(), Vec2::new(1.0, 0.0));
//!
//! physics.update(&mut world);
//! assert_eq!(world.pos(player), Vec2::new(1.0, 0.0));
//! ```

use crate::ecs::{Component, ComponentSet, Dispatcher, Entity, World};
use crate::vec::Vec2;

/// Priority used by [`Physics::register_force`]
pub const DEFAULT_FORCE_PRIORITY: i32 = 0;

/// Priority of the built-in acceleration to velocity force
pub const ACCELERATION_PRIORITY: i32 = 1;

/// Priority of the built-in velocity to position force
pub const VELOCITY_PRIORITY: i32 = 2;

type ForceFn = dyn FnMut(&mut World, Entity);

struct Force {
    priority: i32,
    dispatcher: Dispatcher<ForceFn>,
}

/// Priority-ordered force pipeline
pub struct Physics {
    velocity: Component<Vec2>,
    acceleration: Component<Vec2>,
    mass: Component<f64>,
    forces: Vec<Force>,
    needs_sort: bool,
}

impl Physics {
    /// Create the built-in components in `world` and register the default forces
    pub fn new(world: &mut World) -> Self {
        let mut physics = Physics {
            velocity: world.component::<Vec2>(),
            acceleration: world.component::<Vec2>(),
            mass: world.component::<f64>(),
            forces: Vec::new(),
            needs_sort: false,
        };

        let velocity = physics.velocity;
        let acceleration = physics.acceleration;
        physics.register_force_with_priority(
            acceleration,
            ACCELERATION_PRIORITY,
            move |world, entity, acc: Vec2| {
                let vel = world.get_comp(entity, velocity).copied().unwrap_or_default();
                world.add_comp(entity, velocity, vel + acc);
                world.add_comp(entity, acceleration, Vec2::ZERO);
            },
        );
        physics.register_force_with_priority(velocity, VELOCITY_PRIORITY, |world, entity, vel: Vec2| {
            world.translate(entity, vel);
        });

        physics
    }

    /// Velocity component, in world units per frame
    pub fn velocity(&self) -> Component<Vec2> {
        self.velocity
    }

    /// Acceleration component, accumulated by forces and consumed each frame
    pub fn acceleration(&self) -> Component<Vec2> {
        self.acceleration
    }

    /// Mass component
    pub fn mass(&self) -> Component<f64> {
        self.mass
    }

    /// Register a force over one component at the default priority
    pub fn register_force<T, F>(&mut self, component: Component<T>, force: F)
    where
        T: Clone + 'static,
        F: FnMut(&mut World, Entity, T) + 'static,
    {
        self.register_force_with_priority(component, DEFAULT_FORCE_PRIORITY, force);
    }

    /// Register a force over one component
    pub fn register_force_with_priority<T, F>(
        &mut self,
        component: Component<T>,
        priority: i32,
        force: F,
    ) where
        T: Clone + 'static,
        F: FnMut(&mut World, Entity, T) + 'static,
    {
        self.register_force_multi(component, priority, force);
    }

    /// Register a force over a set of components
    ///
    /// The force receives the per-entity tuple (or array) of values, aligned
    /// with the order of `components`.
    pub fn register_force_multi<S, F>(&mut self, components: S, priority: i32, mut force: F)
    where
        S: ComponentSet,
        F: FnMut(&mut World, Entity, S::Item) + 'static,
    {
        let callback = move |world: &mut World, entity: Entity| {
            if let Some(item) = components.fetch(world, entity) {
                force(world, entity, item);
            }
        };
        self.forces.push(Force {
            priority,
            dispatcher: Dispatcher::new(components.ids(), Box::new(callback)),
        });
        self.needs_sort = true;
        log::debug!(
            "registered force #{} at priority {}",
            self.forces.len() - 1,
            priority
        );
    }

    /// Number of registered forces, including the two defaults
    pub fn force_count(&self) -> usize {
        self.forces.len()
    }

    /// Advance the simulation by one frame
    pub fn update(&mut self, world: &mut World) {
        let frame = world.advance_frame();
        if self.needs_sort {
            // stable: equal priorities keep registration order
            self.forces.sort_by_key(|f| f.priority);
            self.needs_sort = false;
        }

        for force in &mut self.forces {
            for entity in force.dispatcher.targets(world) {
                (force.dispatcher.callback_mut())(world, entity);
            }
        }
        log::trace!("physics frame {} complete", frame);
    }
}
