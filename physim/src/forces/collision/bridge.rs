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
//! Entity to rigid-body synchronization

use crate::body::{Body, BodyPart, Gap, Shape};
use crate::ecs::{Component, Entity, World};
use crate::error::{Error, Result};
use crate::forces::collision::backend::{
    BodyHandle, BodyType, ColliderDesc, ColliderHandle, ColliderShape, DefaultCollisionProperties,
    MassProperties, RigidBodyBackend, RigidBodyDesc,
};
use crate::forces::collision::events::CollisionEvent;
use crate::forces::collision::inertia::approximate_inertia;
use crate::physics::Physics;
use crate::vec::Vec2;
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::f64::consts::{FRAC_PI_2, TAU};
use std::rc::Rc;

/// Priority of the collision force; runs before gravity and user forces
pub const COLLISION_PRIORITY: i32 = -1;

/// Number of box colliders approximating a full ring
pub const RING_COLLIDER_SEGMENTS: usize = 16;

type CollisionCallback = dyn FnMut(&mut World, &CollisionEvent);

struct Managed {
    body: BodyHandle,
    colliders: Vec<ColliderHandle>,
}

struct CollisionState {
    backend: Box<dyn RigidBodyBackend>,
    props: DefaultCollisionProperties,
    body: Component<Body>,
    events: Component<Vec<CollisionEvent>>,
    statics: Component<bool>,
    velocity: Component<Vec2>,
    mass: Component<f64>,
    managed: BTreeMap<Entity, Managed>,
    owners: HashMap<ColliderHandle, Entity>,
    rejected: HashMap<Entity, Body>,
    with_events: Vec<Entity>,
    last_frame: Option<u64>,
    callbacks: Vec<Box<CollisionCallback>>,
}

impl CollisionState {
    fn sync_membership(&mut self, world: &World) {
        let gone: Vec<Entity> = self
            .managed
            .keys()
            .copied()
            .filter(|e| !world.has_comp(*e, self.body))
            .collect();
        for entity in gone {
            if let Some(managed) = self.managed.remove(&entity) {
                self.backend.remove_body(managed.body);
                for c in &managed.colliders {
                    self.owners.remove(c);
                }
                log::debug!("{} left the collision world", entity);
            }
        }
        let body = self.body;
        self.rejected
            .retain(|e, rejected| world.get_comp(*e, body) == Some(&*rejected));

        for entity in world.entities_with(self.body) {
            if self.managed.contains_key(&entity) || self.rejected.contains_key(&entity) {
                continue;
            }
            if let Err(err) = self.add_entity(world, entity) {
                log::warn!("cannot add {} to the collision world: {}", entity, err);
                if let Some(body) = world.get_comp(entity, self.body) {
                    self.rejected.insert(entity, body.clone());
                }
            }
        }
    }

    fn add_entity(&mut self, world: &World, entity: Entity) -> Result<()> {
        let body = world
            .get_comp(entity, self.body)
            .ok_or(Error::MissingComponent {
                entity: entity.id(),
                component: "body",
            })?;
        let colliders = collider_descs(body, &self.props)?;
        let is_static = world.get_comp(entity, self.statics).copied().unwrap_or(false);
        let mass = world
            .get_comp(entity, self.mass)
            .copied()
            .or(self.props.mass)
            .unwrap_or(0.0);
        let desc = body_desc(body, world.pos(entity), is_static, mass, &self.props);

        let handle = self.backend.create_body(&desc);
        let mut attached = Vec::with_capacity(colliders.len());
        for collider in &colliders {
            match self.backend.add_collider(handle, collider) {
                Ok(c) => attached.push(c),
                Err(err) => {
                    self.backend.remove_body(handle);
                    return Err(err);
                }
            }
        }
        for c in &attached {
            self.owners.insert(*c, entity);
        }
        log::debug!(
            "{} joined the collision world as {:?} with {} colliders",
            entity,
            desc.body_type,
            attached.len()
        );
        self.managed.insert(
            entity,
            Managed {
                body: handle,
                colliders: attached,
            },
        );
        Ok(())
    }

    fn step(&mut self, world: &mut World) -> Vec<CollisionEvent> {
        self.sync_membership(world);

        for entity in self.with_events.drain(..) {
            if let Some(events) = world.get_comp_mut(entity, self.events) {
                events.clear();
            }
        }

        for (entity, managed) in &self.managed {
            let velocity = world.get_comp(*entity, self.velocity).copied().unwrap_or_default();
            let rotation = world.get_comp(*entity, self.body).map_or(0.0, |b| b.rotation);
            self.backend.set_translation(managed.body, world.pos(*entity));
            self.backend.set_linvel(managed.body, velocity);
            self.backend.set_rotation(managed.body, rotation);
        }

        self.backend.step();

        for (entity, managed) in &self.managed {
            match self.backend.body_kind(managed.body) {
                BodyType::Static => continue,
                BodyType::Dynamic => {
                    world.add_comp(*entity, self.velocity, self.backend.linvel(managed.body));
                }
                _ => {}
            }
            let rotation = self.backend.rotation(managed.body);
            if let Some(body) = world.get_comp_mut(*entity, self.body) {
                body.rotation = rotation;
            }
        }

        let mut fired = Vec::new();
        for (c1, c2) in self.backend.drain_collision_starts() {
            let (Some(&a), Some(&b)) = (self.owners.get(&c1), self.owners.get(&c2)) else {
                continue;
            };
            let position = self
                .backend
                .contact_point(c1, c2)
                .unwrap_or_else(|| world.pos(a));
            fired.push(CollisionEvent {
                entity_a: a,
                entity_b: b,
                position,
            });
        }

        for event in &fired {
            for entity in [event.entity_a, event.entity_b] {
                match world.get_comp_mut(entity, self.events) {
                    Some(events) => events.push(*event),
                    None => world.add_comp(entity, self.events, vec![*event]),
                }
                if !self.with_events.contains(&entity) {
                    self.with_events.push(entity);
                }
            }
        }
        if !fired.is_empty() {
            log::trace!("collision step produced {} events", fired.len());
        }
        fired
    }
}

fn body_desc(
    body: &Body,
    translation: Vec2,
    is_static: bool,
    mass: f64,
    props: &DefaultCollisionProperties,
) -> RigidBodyDesc {
    let body_type = if is_static {
        BodyType::Static
    } else {
        props.body_type
    };
    let mass_properties = (mass > 0.0 && body_type != BodyType::Static).then(|| MassProperties {
        mass,
        inertia: approximate_inertia(body, mass),
    });
    RigidBodyDesc {
        body_type,
        translation,
        rotation: body.rotation,
        mass_properties,
    }
}

/// Colliders for every part of `body`, in part order
///
/// Circles map to balls and polygons to convex hulls. Rings are split
/// into [`RING_COLLIDER_SEGMENTS`] boxes along the mid radius; a segment
/// whose center angle falls inside a gap is left out.
pub fn collider_descs(body: &Body, props: &DefaultCollisionProperties) -> Result<Vec<ColliderDesc>> {
    let mut descs = Vec::new();
    for part in body.parts() {
        part.shape.validate()?;
        match &part.shape {
            Shape::Circle { radius } => descs.push(ColliderDesc::new(
                ColliderShape::Ball { radius: *radius },
                part.position,
                part.rotation,
                props,
            )),
            Shape::Polygon { vertices } => descs.push(ColliderDesc::new(
                ColliderShape::ConvexHull {
                    points: vertices.clone(),
                },
                part.position,
                part.rotation,
                props,
            )),
            Shape::Ring {
                inner_radius,
                outer_radius,
                gaps,
            } => descs.extend(ring_segments(part, *inner_radius, *outer_radius, gaps, props)),
        }
    }
    Ok(descs)
}

fn ring_segments<'a>(
    part: &'a BodyPart,
    inner: f64,
    outer: f64,
    gaps: &'a [Gap],
    props: &'a DefaultCollisionProperties,
) -> impl Iterator<Item = ColliderDesc> + 'a {
    let theta = TAU / RING_COLLIDER_SEGMENTS as f64;
    let mid = (outer + inner) / 2.0;
    let half_extents = Vec2::new(mid * theta / 2.0, (outer - inner) / 2.0);

    (0..RING_COLLIDER_SEGMENTS).filter_map(move |i| {
        let center_angle = theta * i as f64 + theta / 2.0;
        if gaps.iter().any(|g| g.contains(center_angle)) {
            return None;
        }
        let center = Vec2::from_angle(center_angle)
            .scale(mid)
            .rotate(part.rotation)
            + part.position;
        Some(ColliderDesc::new(
            ColliderShape::Cuboid { half_extents },
            center,
            part.rotation + center_angle + FRAC_PI_2,
            props,
        ))
    })
}

/// Access to a running collision force
///
/// Cloning the handle shares the same collision world.
#[derive(Clone)]
pub struct CollisionHandle {
    state: Rc<RefCell<CollisionState>>,
    events: Component<Vec<CollisionEvent>>,
    statics: Component<bool>,
}

impl CollisionHandle {
    /// Per-entity list of events from the most recent collision step
    pub fn events_component(&self) -> Component<Vec<CollisionEvent>> {
        self.events
    }

    /// Marks an entity as immovable; read when the entity joins the
    /// collision world
    pub fn static_component(&self) -> Component<bool> {
        self.statics
    }

    /// Call `callback` for every collision event, after events are stored
    pub fn add_collision_callback<F>(&self, callback: F)
    where
        F: FnMut(&mut World, &CollisionEvent) + 'static,
    {
        self.state.borrow_mut().callbacks.push(Box::new(callback));
    }

    /// Number of entities currently mirrored in the backend
    pub fn managed_count(&self) -> usize {
        self.state.borrow().managed.len()
    }

    /// True when `entity` has a rigid body in the backend
    pub fn is_managed(&self, entity: Entity) -> bool {
        self.state.borrow().managed.contains_key(&entity)
    }

    /// Entities left out because their body could not be built, ordered by id
    ///
    /// An entity drops off this list once its body component is replaced
    /// or removed.
    pub fn rejected_entities(&self) -> Vec<Entity> {
        let mut rejected: Vec<Entity> = self.state.borrow().rejected.keys().copied().collect();
        rejected.sort_unstable();
        rejected
    }
}

/// Mirror every entity carrying `body` into `backend` and report contacts
///
/// Registers a force at [`COLLISION_PRIORITY`]. Once per physics tick it
///
/// 1. adds entities that gained a body and removes those that lost it
/// 2. clears the previous tick's events
/// 3. pushes position, velocity and rotation into the backend
/// 4. steps the backend
/// 5. copies velocity (dynamic bodies only) and rotation back
/// 6. stores each new contact on both entities and runs the callbacks
///
/// Entities whose body cannot be turned into colliders are logged and
/// left out until their body component is replaced.
pub fn init_collision_force<B>(
    physics: &mut Physics,
    world: &mut World,
    body: Component<Body>,
    backend: B,
    props: DefaultCollisionProperties,
) -> Result<CollisionHandle>
where
    B: RigidBodyBackend + 'static,
{
    validate_properties(&props)?;

    let events = world.component::<Vec<CollisionEvent>>();
    let statics = world.component::<bool>();
    let state = Rc::new(RefCell::new(CollisionState {
        backend: Box::new(backend),
        props,
        body,
        events,
        statics,
        velocity: physics.velocity(),
        mass: physics.mass(),
        managed: BTreeMap::new(),
        owners: HashMap::new(),
        rejected: HashMap::new(),
        with_events: Vec::new(),
        last_frame: None,
        callbacks: Vec::new(),
    }));

    let shared = Rc::clone(&state);
    physics.register_force_with_priority(
        body,
        COLLISION_PRIORITY,
        move |world: &mut World, _entity, _body: Body| {
            let frame = world.frame();
            if shared.borrow().last_frame == Some(frame) {
                return;
            }
            shared.borrow_mut().last_frame = Some(frame);

            let fired = shared.borrow_mut().step(world);
            if fired.is_empty() {
                return;
            }
            let mut callbacks = std::mem::take(&mut shared.borrow_mut().callbacks);
            for event in &fired {
                for callback in callbacks.iter_mut() {
                    callback(world, event);
                }
            }
            let mut state = shared.borrow_mut();
            callbacks.append(&mut state.callbacks);
            state.callbacks = callbacks;
        },
    );
    log::debug!("collision force registered");

    Ok(CollisionHandle {
        state,
        events,
        statics,
    })
}

pub(crate) fn validate_properties(props: &DefaultCollisionProperties) -> Result<()> {
    let checks = [
        ("mass", props.mass),
        ("friction", props.friction),
        ("restitution", props.restitution),
    ];
    for (name, value) in checks {
        if let Some(v) = value {
            if !(v.is_finite() && v >= 0.0) {
                return Err(Error::Config(format!(
                    "collision {name} must be a non-negative number, got {v}"
                )));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::{create_circle, create_rectangle, create_ring};
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_full_ring_segments() {
        let body = Body::from_shape(create_ring(8.0, 12.0, vec![]), 0.0);
        let descs = collider_descs(&body, &DefaultCollisionProperties::default()).unwrap();
        assert_eq!(descs.len(), RING_COLLIDER_SEGMENTS);

        let theta = TAU / 16.0;
        match descs[0].shape {
            ColliderShape::Cuboid { half_extents } => {
                assert_relative_eq!(half_extents.x, 10.0 * theta / 2.0);
                assert_relative_eq!(half_extents.y, 2.0);
            }
            ref other => panic!("unexpected shape {other:?}"),
        }
        for d in &descs {
            assert_relative_eq!(d.translation.length(), 10.0, epsilon = 1e-9);
        }
        assert_relative_eq!(descs[0].rotation, theta / 2.0 + FRAC_PI_2);
    }

    #[test]
    fn test_ring_gap_skips_segments() {
        // covers the centers of segments 0..4
        let gaps = vec![Gap::new(0.0, PI / 2.0)];
        let body = Body::from_shape(create_ring(1.0, 2.0, gaps), 0.0);
        let descs = collider_descs(&body, &DefaultCollisionProperties::default()).unwrap();
        assert_eq!(descs.len(), RING_COLLIDER_SEGMENTS - 4);
    }

    #[test]
    fn test_part_offset_and_settings() {
        let props = DefaultCollisionProperties {
            friction: Some(0.3),
            sensor: Some(true),
            ..Default::default()
        };
        let part = BodyPart::new(create_circle(2.0), Vec2::new(1.0, 2.0), 0.25);
        let body = Body::new(vec![part, create_rectangle(2.0, 2.0).into()], 0.0);
        let descs = collider_descs(&body, &props).unwrap();

        assert_eq!(descs.len(), 2);
        assert_eq!(descs[0].shape, ColliderShape::Ball { radius: 2.0 });
        assert_eq!(descs[0].translation, Vec2::new(1.0, 2.0));
        assert_eq!(descs[0].rotation, 0.25);
        assert_eq!(descs[0].friction, Some(0.3));
        assert_eq!(descs[1].sensor, Some(true));
        assert!(matches!(descs[1].shape, ColliderShape::ConvexHull { ref points } if points.len() == 4));
    }

    #[test]
    fn test_degenerate_ring_rejected() {
        let body = Body::from_shape(create_ring(3.0, 3.0, vec![]), 0.0);
        let err = collider_descs(&body, &DefaultCollisionProperties::default()).unwrap_err();
        assert!(matches!(err, Error::InvalidShape(_)));
    }

    #[test]
    fn test_body_desc_mass_rules() {
        let body = Body::from_shape(create_circle(1.0), 0.5);
        let props = DefaultCollisionProperties::default();

        let dynamic = body_desc(&body, Vec2::new(1.0, 1.0), false, 2.0, &props);
        assert_eq!(dynamic.body_type, BodyType::Dynamic);
        assert_eq!(dynamic.rotation, 0.5);
        let mp = dynamic.mass_properties.unwrap();
        assert_relative_eq!(mp.inertia, 1.0);

        let fixed = body_desc(&body, Vec2::ZERO, true, 2.0, &props);
        assert_eq!(fixed.body_type, BodyType::Static);
        assert!(fixed.mass_properties.is_none());

        let massless = body_desc(&body, Vec2::ZERO, false, 0.0, &props);
        assert!(massless.mass_properties.is_none());
    }

    #[test]
    fn test_invalid_properties() {
        let props = DefaultCollisionProperties {
            restitution: Some(-1.0),
            ..Default::default()
        };
        assert!(matches!(validate_properties(&props), Err(Error::Config(_))));
        assert!(validate_properties(&DefaultCollisionProperties::default()).is_ok());
    }
}
