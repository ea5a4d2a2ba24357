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
//! [`RigidBodyBackend`] over `rapier2d`
//!
//! The rapier world runs with zero gravity; gravity, if any, comes from
//! the force pipeline. Colliders have zero density so a body's mass is
//! exactly what the collision force hands over as additional mass.

use crate::error::{Error, Result};
use crate::forces::collision::backend::{
    split_groups, BodyHandle, BodyType, ColliderDesc, ColliderHandle, ColliderShape,
    RigidBodyBackend, RigidBodyDesc,
};
use crate::vec::Vec2;
use rapier2d::prelude::*;
use std::sync::Mutex;

/// Records the collider pairs whose contact started during a step
#[derive(Default)]
struct StartCollector {
    started: Mutex<Vec<(rapier2d::geometry::ColliderHandle, rapier2d::geometry::ColliderHandle)>>,
}

impl EventHandler for StartCollector {
    fn handle_collision_event(
        &self,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        event: rapier2d::geometry::CollisionEvent,
        _contact_pair: Option<&ContactPair>,
    ) {
        if event.started() {
            if let Ok(mut started) = self.started.lock() {
                started.push((event.collider1(), event.collider2()));
            }
        }
    }

    fn handle_contact_force_event(
        &self,
        _dt: Real,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        _contact_pair: &ContactPair,
        _total_force_magnitude: Real,
    ) {
    }
}

/// A `rapier2d` physics world
pub struct RapierBackend {
    pipeline: PhysicsPipeline,
    integration_parameters: IntegrationParameters,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    events: StartCollector,
}

impl RapierBackend {
    /// Empty world with default integration parameters
    pub fn new() -> Self {
        RapierBackend {
            pipeline: PhysicsPipeline::new(),
            integration_parameters: IntegrationParameters::default(),
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            events: StartCollector::default(),
        }
    }

    /// Number of rigid bodies in the rapier world
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    fn body(&self, handle: BodyHandle) -> Option<&RigidBody> {
        self.bodies.get(to_rapier_body(handle))
    }

    fn body_mut(&mut self, handle: BodyHandle) -> Option<&mut RigidBody> {
        self.bodies.get_mut(to_rapier_body(handle))
    }
}

impl Default for RapierBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn pack(parts: (u32, u32)) -> u64 {
    ((parts.0 as u64) << 32) | parts.1 as u64
}

fn unpack(raw: u64) -> (u32, u32) {
    ((raw >> 32) as u32, raw as u32)
}

fn to_rapier_body(handle: BodyHandle) -> RigidBodyHandle {
    let (index, generation) = unpack(handle.0);
    RigidBodyHandle::from_raw_parts(index, generation)
}

fn to_rapier_collider(handle: ColliderHandle) -> rapier2d::geometry::ColliderHandle {
    let (index, generation) = unpack(handle.0);
    rapier2d::geometry::ColliderHandle::from_raw_parts(index, generation)
}

fn from_rapier_collider(handle: rapier2d::geometry::ColliderHandle) -> ColliderHandle {
    ColliderHandle(pack(handle.into_raw_parts()))
}

fn groups(packed: u32) -> InteractionGroups {
    let (memberships, filter) = split_groups(packed);
    InteractionGroups::new(
        Group::from_bits_truncate(memberships as u32),
        Group::from_bits_truncate(filter as u32),
    )
}

fn rigid_body_type(body_type: BodyType) -> RigidBodyType {
    match body_type {
        BodyType::Dynamic => RigidBodyType::Dynamic,
        BodyType::Static => RigidBodyType::Fixed,
        BodyType::KinematicPositionBased => RigidBodyType::KinematicPositionBased,
        BodyType::KinematicVelocityBased => RigidBodyType::KinematicVelocityBased,
    }
}

impl RigidBodyBackend for RapierBackend {
    fn create_body(&mut self, desc: &RigidBodyDesc) -> BodyHandle {
        let mut builder = RigidBodyBuilder::new(rigid_body_type(desc.body_type))
            .translation(vector![desc.translation.x as Real, desc.translation.y as Real])
            .rotation(desc.rotation as Real);
        if let Some(mp) = desc.mass_properties {
            builder = builder.additional_mass_properties(rapier2d::dynamics::MassProperties::new(
                point![0.0, 0.0],
                mp.mass as Real,
                mp.inertia as Real,
            ));
        }
        let handle = self.bodies.insert(builder.build());
        BodyHandle(pack(handle.into_raw_parts()))
    }

    fn add_collider(&mut self, body: BodyHandle, desc: &ColliderDesc) -> Result<ColliderHandle> {
        let mut builder = match &desc.shape {
            ColliderShape::Ball { radius } => ColliderBuilder::ball(*radius as Real),
            ColliderShape::Cuboid { half_extents } => {
                ColliderBuilder::cuboid(half_extents.x as Real, half_extents.y as Real)
            }
            ColliderShape::ConvexHull { points } => {
                let points: Vec<Point<Real>> = points
                    .iter()
                    .map(|p| point![p.x as Real, p.y as Real])
                    .collect();
                ColliderBuilder::convex_hull(&points)
                    .ok_or_else(|| Error::Backend("failed to create polygon collider".into()))?
            }
        };
        builder = builder
            .translation(vector![desc.translation.x as Real, desc.translation.y as Real])
            .rotation(desc.rotation as Real)
            .density(0.0)
            .active_events(ActiveEvents::COLLISION_EVENTS);
        if let Some(friction) = desc.friction {
            builder = builder.friction(friction as Real);
        }
        if let Some(restitution) = desc.restitution {
            builder = builder.restitution(restitution as Real);
        }
        if let Some(sensor) = desc.sensor {
            builder = builder.sensor(sensor);
        }
        if let Some(g) = desc.collision_groups {
            builder = builder.collision_groups(groups(g));
        }
        if let Some(g) = desc.solver_groups {
            builder = builder.solver_groups(groups(g));
        }

        let parent = to_rapier_body(body);
        if self.bodies.get(parent).is_none() {
            return Err(Error::Backend(format!("unknown rigid body {}", body.0)));
        }
        let handle = self
            .colliders
            .insert_with_parent(builder.build(), parent, &mut self.bodies);
        Ok(from_rapier_collider(handle))
    }

    fn remove_body(&mut self, body: BodyHandle) {
        self.bodies.remove(
            to_rapier_body(body),
            &mut self.islands,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
    }

    fn set_translation(&mut self, body: BodyHandle, translation: Vec2) {
        if let Some(rb) = self.body_mut(body) {
            rb.set_translation(vector![translation.x as Real, translation.y as Real], true);
        }
    }

    fn set_linvel(&mut self, body: BodyHandle, linvel: Vec2) {
        if let Some(rb) = self.body_mut(body) {
            rb.set_linvel(vector![linvel.x as Real, linvel.y as Real], true);
        }
    }

    fn set_rotation(&mut self, body: BodyHandle, rotation: f64) {
        if let Some(rb) = self.body_mut(body) {
            rb.set_rotation(Rotation::new(rotation as Real), true);
        }
    }

    fn linvel(&self, body: BodyHandle) -> Vec2 {
        self.body(body)
            .map(|rb| Vec2::new(rb.linvel().x as f64, rb.linvel().y as f64))
            .unwrap_or_default()
    }

    fn rotation(&self, body: BodyHandle) -> f64 {
        self.body(body).map_or(0.0, |rb| rb.rotation().angle() as f64)
    }

    fn body_kind(&self, body: BodyHandle) -> BodyType {
        match self.body(body).map(|rb| rb.body_type()) {
            Some(RigidBodyType::Fixed) => BodyType::Static,
            Some(RigidBodyType::KinematicPositionBased) => BodyType::KinematicPositionBased,
            Some(RigidBodyType::KinematicVelocityBased) => BodyType::KinematicVelocityBased,
            _ => BodyType::Dynamic,
        }
    }

    fn step(&mut self) {
        self.pipeline.step(
            &vector![0.0, 0.0],
            &self.integration_parameters,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &self.events,
        );
    }

    fn drain_collision_starts(&mut self) -> Vec<(ColliderHandle, ColliderHandle)> {
        match self.events.started.lock() {
            Ok(mut started) => started
                .drain(..)
                .map(|(a, b)| (from_rapier_collider(a), from_rapier_collider(b)))
                .collect(),
            Err(_) => Vec::new(),
        }
    }

    fn contact_point(&self, a: ColliderHandle, b: ColliderHandle) -> Option<Vec2> {
        let pair = self
            .narrow_phase
            .contact_pair(to_rapier_collider(a), to_rapier_collider(b))?;
        let manifold = pair.manifolds.iter().find(|m| !m.points.is_empty())?;
        let collider = self.colliders.get(pair.collider1)?;
        let world_point = collider.position() * manifold.points[0].local_p1;
        Some(Vec2::new(world_point.x as f64, world_point.y as f64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forces::collision::backend::{DefaultCollisionProperties, MassProperties};

    fn ball_at(backend: &mut RapierBackend, x: f64, vx: f64) -> (BodyHandle, ColliderHandle) {
        let body = backend.create_body(&RigidBodyDesc {
            body_type: BodyType::Dynamic,
            translation: Vec2::new(x, 0.0),
            rotation: 0.0,
            mass_properties: Some(MassProperties {
                mass: 1.0,
                inertia: 0.5,
            }),
        });
        let collider = backend
            .add_collider(
                body,
                &ColliderDesc::new(
                    ColliderShape::Ball { radius: 1.0 },
                    Vec2::ZERO,
                    0.0,
                    &DefaultCollisionProperties::default(),
                ),
            )
            .unwrap();
        backend.set_linvel(body, Vec2::new(vx, 0.0));
        (body, collider)
    }

    #[test]
    fn test_handles_round_trip() {
        assert_eq!(unpack(pack((7, 3))), (7, 3));
    }

    #[test]
    fn test_approaching_balls_report_start() {
        let mut backend = RapierBackend::new();
        let (a, _) = ball_at(&mut backend, -1.5, 30.0);
        let (b, _) = ball_at(&mut backend, 1.5, -30.0);

        let mut starts = Vec::new();
        for _ in 0..10 {
            backend.step();
            starts.extend(backend.drain_collision_starts());
        }
        assert!(!starts.is_empty());
        assert_eq!(backend.body_kind(a), BodyType::Dynamic);

        backend.remove_body(b);
        assert_eq!(backend.body_count(), 1);
    }

    #[test]
    fn test_unknown_body_is_an_error() {
        let mut backend = RapierBackend::new();
        let desc = ColliderDesc::new(
            ColliderShape::Ball { radius: 1.0 },
            Vec2::ZERO,
            0.0,
            &DefaultCollisionProperties::default(),
        );
        let missing = BodyHandle(pack((99, 0)));
        assert!(matches!(backend.add_collider(missing, &desc), Err(Error::Backend(_))));
    }
}
