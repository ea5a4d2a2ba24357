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
//! Collision detection and response through a rigid-body engine
//!
//! Entities carrying a [`Body`](crate::body::Body) are mirrored into a
//! [`RigidBodyBackend`]. The engine resolves contacts; the resulting
//! velocities and rotations flow back into the entities, and every new
//! contact becomes a [`CollisionEvent`] on both entities involved.
//!
//! Enable the `rapier` feature for [`RapierBackend`], a backend built on
//! `rapier2d`. Any other engine can be plugged in by implementing
//! [`RigidBodyBackend`].
//!
//! # Example
//!
//! ```rust,ignore
//! use physim::forces::collision::{init_collision_force, DefaultCollisionProperties, RapierBackend};
//!
//! let body = world.component::<Body>();
//! let collisions = init_collision_force(
//!     &mut physics,
//!     &mut world,
//!     body,
//!     RapierBackend::new(),
//!     DefaultCollisionProperties::default(),
//! )?;
//! collisions.add_collision_callback(|_world, event| {
//!     println!("{} hit {}", event.entity_a, event.entity_b);
//! });
//! ```

pub mod backend;
mod bridge;
mod events;
pub mod inertia;
#[cfg(feature = "rapier")]
mod rapier;

pub use backend::{
    interaction_groups, split_groups, BodyHandle, BodyType, ColliderDesc, ColliderHandle,
    ColliderShape, DefaultCollisionProperties, MassProperties, RigidBodyBackend, RigidBodyDesc,
};
pub use bridge::{
    collider_descs, init_collision_force, CollisionHandle, COLLISION_PRIORITY,
    RING_COLLIDER_SEGMENTS,
};
pub(crate) use bridge::validate_properties;
pub use events::CollisionEvent;
#[cfg(feature = "rapier")]
pub use rapier::RapierBackend;
