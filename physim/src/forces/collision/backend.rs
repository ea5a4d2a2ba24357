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
//! Rigid-body engine abstraction
//!
//! The collision force never talks to a physics engine directly. It drives
//! a [`RigidBodyBackend`], which owns bodies and colliders and reports
//! which collider pairs started touching during the last step.

use crate::error::Result;
use crate::vec::Vec2;
use serde::{Deserialize, Serialize};

/// Opaque rigid-body handle issued by a backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyHandle(pub u64);

/// Opaque collider handle issued by a backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColliderHandle(pub u64);

/// How the engine moves a body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyType {
    /// Moved by contacts and velocity
    #[default]
    Dynamic,
    /// Never moves
    Static,
    /// Moved by setting its position
    KinematicPositionBased,
    /// Moved by setting its velocity
    KinematicVelocityBased,
}

/// Pack collision or solver groups into one bitmask
///
/// Memberships occupy the high 16 bits and the filter the low 16 bits. Two
/// colliders interact when each one's memberships intersect the other's
/// filter.
pub fn interaction_groups(memberships: u16, filter: u16) -> u32 {
    ((memberships as u32) << 16) | filter as u32
}

/// Split a packed group mask into `(memberships, filter)`
pub fn split_groups(groups: u32) -> (u16, u16) {
    ((groups >> 16) as u16, (groups & 0xffff) as u16)
}

/// Collision settings applied to every managed entity
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultCollisionProperties {
    /// Body type for entities not marked static
    pub body_type: BodyType,
    /// Mass used when the entity has no mass component
    pub mass: Option<f64>,
    /// Coulomb friction coefficient
    pub friction: Option<f64>,
    /// Bounciness
    pub restitution: Option<f64>,
    /// Report contacts without generating a response
    pub sensor: Option<bool>,
    /// Packed collision groups, see [`interaction_groups`]
    pub collision_groups: Option<u32>,
    /// Packed solver groups, see [`interaction_groups`]
    pub solver_groups: Option<u32>,
}

/// Mass and angular inertia added to a body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MassProperties {
    /// Total mass
    pub mass: f64,
    /// Moment of inertia about the body origin
    pub inertia: f64,
}

/// Parameters for [`RigidBodyBackend::create_body`]
#[derive(Debug, Clone, PartialEq)]
pub struct RigidBodyDesc {
    /// Motion type
    pub body_type: BodyType,
    /// World position
    pub translation: Vec2,
    /// Rotation in radians
    pub rotation: f64,
    /// Extra mass; colliders themselves carry no density
    pub mass_properties: Option<MassProperties>,
}

/// Collider geometry in body-local space
#[derive(Debug, Clone, PartialEq)]
pub enum ColliderShape {
    /// Disc
    Ball {
        /// Radius
        radius: f64,
    },
    /// Convex hull of the given points
    ConvexHull {
        /// Hull input points
        points: Vec<Vec2>,
    },
    /// Box
    Cuboid {
        /// Half width and half height
        half_extents: Vec2,
    },
}

/// Parameters for [`RigidBodyBackend::add_collider`]
#[derive(Debug, Clone, PartialEq)]
pub struct ColliderDesc {
    /// Geometry
    pub shape: ColliderShape,
    /// Offset from the body origin
    pub translation: Vec2,
    /// Rotation relative to the body
    pub rotation: f64,
    /// Coulomb friction coefficient
    pub friction: Option<f64>,
    /// Bounciness
    pub restitution: Option<f64>,
    /// Sensor flag
    pub sensor: Option<bool>,
    /// Packed collision groups
    pub collision_groups: Option<u32>,
    /// Packed solver groups
    pub solver_groups: Option<u32>,
}

impl ColliderDesc {
    /// Collider with `shape` at `translation`, settings taken from `props`
    pub fn new(
        shape: ColliderShape,
        translation: Vec2,
        rotation: f64,
        props: &DefaultCollisionProperties,
    ) -> Self {
        ColliderDesc {
            shape,
            translation,
            rotation,
            friction: props.friction,
            restitution: props.restitution,
            sensor: props.sensor,
            collision_groups: props.collision_groups,
            solver_groups: props.solver_groups,
        }
    }
}

/// A rigid-body engine the collision force can drive
///
/// Implementations own all engine state. The collision force pushes entity
/// state in before [`step`](RigidBodyBackend::step) and reads velocity and
/// rotation back out afterwards.
pub trait RigidBodyBackend {
    /// Create a body with no colliders
    fn create_body(&mut self, desc: &RigidBodyDesc) -> BodyHandle;

    /// Attach a collider to `body`
    fn add_collider(&mut self, body: BodyHandle, desc: &ColliderDesc) -> Result<ColliderHandle>;

    /// Remove a body and every collider attached to it
    fn remove_body(&mut self, body: BodyHandle);

    /// Teleport a body
    fn set_translation(&mut self, body: BodyHandle, translation: Vec2);

    /// Set a body's linear velocity
    fn set_linvel(&mut self, body: BodyHandle, linvel: Vec2);

    /// Set a body's rotation
    fn set_rotation(&mut self, body: BodyHandle, rotation: f64);

    /// Current linear velocity
    fn linvel(&self, body: BodyHandle) -> Vec2;

    /// Current rotation
    fn rotation(&self, body: BodyHandle) -> f64;

    /// Motion type the body was created with
    fn body_kind(&self, body: BodyHandle) -> BodyType;

    /// Advance the engine by one step
    fn step(&mut self);

    /// Collider pairs that began touching since the last drain
    fn drain_collision_starts(&mut self) -> Vec<(ColliderHandle, ColliderHandle)>;

    /// First contact point of a touching pair, in world space
    fn contact_point(&self, a: ColliderHandle, b: ColliderHandle) -> Option<Vec2>;
}
