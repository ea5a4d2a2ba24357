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
//! Collision bridging driven by a scripted in-memory backend
//!
//! The fake engine only knows balls. It reports a collision start the
//! first step two balls of different bodies overlap, and bounces dynamic
//! bodies by reversing their velocity.

use approx::assert_relative_eq;
use physim::body::{create_circle, create_rectangle, create_ring, Body};
use physim::error::{Error, Result};
use physim::forces::collision::{
    init_collision_force, BodyHandle, BodyType, ColliderDesc, ColliderHandle, ColliderShape,
    CollisionHandle, DefaultCollisionProperties, RigidBodyBackend, RigidBodyDesc,
};
use physim::{Component, Physics, Vec2, World};
use std::cell::RefCell;
use std::collections::{BTreeMap, HashSet};
use std::rc::Rc;

struct FakeBody {
    desc: RigidBodyDesc,
    translation: Vec2,
    linvel: Vec2,
    rotation: f64,
}

#[derive(Default)]
struct FakeState {
    next_handle: u64,
    bodies: BTreeMap<u64, FakeBody>,
    // collider -> (owning body, offset, radius)
    colliders: BTreeMap<u64, (u64, Vec2, f64)>,
    touching: HashSet<(u64, u64)>,
    started: Vec<(ColliderHandle, ColliderHandle)>,
    steps: u32,
    removed: Vec<u64>,
}

#[derive(Clone, Default)]
struct FakeBackend {
    state: Rc<RefCell<FakeState>>,
}

impl FakeState {
    fn handle(&mut self) -> u64 {
        self.next_handle += 1;
        self.next_handle
    }

    fn center(&self, collider: u64) -> (Vec2, f64) {
        let (body, offset, radius) = self.colliders[&collider];
        (self.bodies[&body].translation + offset, radius)
    }
}

impl RigidBodyBackend for FakeBackend {
    fn create_body(&mut self, desc: &RigidBodyDesc) -> BodyHandle {
        let mut state = self.state.borrow_mut();
        let handle = state.handle();
        state.bodies.insert(
            handle,
            FakeBody {
                desc: desc.clone(),
                translation: desc.translation,
                linvel: Vec2::ZERO,
                rotation: desc.rotation,
            },
        );
        BodyHandle(handle)
    }

    fn add_collider(&mut self, body: BodyHandle, desc: &ColliderDesc) -> Result<ColliderHandle> {
        let mut state = self.state.borrow_mut();
        let radius = match desc.shape {
            ColliderShape::Ball { radius } => radius,
            _ => return Err(Error::Backend("fake engine only supports balls".to_string())),
        };
        let handle = state.handle();
        state.colliders.insert(handle, (body.0, desc.translation, radius));
        Ok(ColliderHandle(handle))
    }

    fn remove_body(&mut self, body: BodyHandle) {
        let mut state = self.state.borrow_mut();
        state.bodies.remove(&body.0);
        state.colliders.retain(|_, (owner, _, _)| *owner != body.0);
        state.removed.push(body.0);
    }

    fn set_translation(&mut self, body: BodyHandle, translation: Vec2) {
        if let Some(b) = self.state.borrow_mut().bodies.get_mut(&body.0) {
            b.translation = translation;
        }
    }

    fn set_linvel(&mut self, body: BodyHandle, linvel: Vec2) {
        if let Some(b) = self.state.borrow_mut().bodies.get_mut(&body.0) {
            b.linvel = linvel;
        }
    }

    fn set_rotation(&mut self, body: BodyHandle, rotation: f64) {
        if let Some(b) = self.state.borrow_mut().bodies.get_mut(&body.0) {
            b.rotation = rotation;
        }
    }

    fn linvel(&self, body: BodyHandle) -> Vec2 {
        self.state.borrow().bodies[&body.0].linvel
    }

    fn rotation(&self, body: BodyHandle) -> f64 {
        self.state.borrow().bodies[&body.0].rotation
    }

    fn body_kind(&self, body: BodyHandle) -> BodyType {
        self.state.borrow().bodies[&body.0].desc.body_type
    }

    fn step(&mut self) {
        let mut state = self.state.borrow_mut();
        state.steps += 1;

        let ids: Vec<u64> = state.colliders.keys().copied().collect();
        let mut now = HashSet::new();
        for (i, &a) in ids.iter().enumerate() {
            for &b in &ids[i + 1..] {
                if state.colliders[&a].0 == state.colliders[&b].0 {
                    continue;
                }
                let (pa, ra) = state.center(a);
                let (pb, rb) = state.center(b);
                if (pa - pb).length() < ra + rb {
                    now.insert((a, b));
                }
            }
        }

        let mut bounced = HashSet::new();
        for &(a, b) in &now {
            if !state.touching.contains(&(a, b)) {
                state.started.push((ColliderHandle(a), ColliderHandle(b)));
            }
            bounced.insert(state.colliders[&a].0);
            bounced.insert(state.colliders[&b].0);
        }
        for body in bounced {
            let b = state.bodies.get_mut(&body).unwrap();
            if b.desc.body_type == BodyType::Dynamic {
                b.linvel = -b.linvel;
            }
        }
        state.touching = now;
    }

    fn drain_collision_starts(&mut self) -> Vec<(ColliderHandle, ColliderHandle)> {
        std::mem::take(&mut self.state.borrow_mut().started)
    }

    fn contact_point(&self, a: ColliderHandle, b: ColliderHandle) -> Option<Vec2> {
        let state = self.state.borrow();
        let (pa, _) = state.center(a.0);
        let (pb, _) = state.center(b.0);
        Some((pa + pb).scale(0.5))
    }
}

struct Scene {
    world: World,
    physics: Physics,
    body: Component<Body>,
    collisions: CollisionHandle,
    engine: FakeBackend,
}

fn scene() -> Scene {
    let mut world = World::new();
    let mut physics = Physics::new(&mut world);
    let body = world.component::<Body>();
    let engine = FakeBackend::default();
    let collisions = init_collision_force(
        &mut physics,
        &mut world,
        body,
        engine.clone(),
        DefaultCollisionProperties::default(),
    )
    .unwrap();
    Scene {
        world,
        physics,
        body,
        collisions,
        engine,
    }
}

fn ball(scene: &mut Scene, pos: Vec2, velocity: Vec2) -> physim::Entity {
    let e = scene.world.spawn(pos);
    scene.world.add_comp(e, scene.body, Body::from_shape(create_circle(1.0), 0.0));
    scene.world.add_comp(e, scene.physics.velocity(), velocity);
    e
}

#[test]
fn test_approaching_balls_collide_and_bounce() {
    let mut s = scene();
    let a = ball(&mut s, Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0));
    let b = ball(&mut s, Vec2::new(3.0, 0.0), Vec2::new(-1.0, 0.0));
    let events = s.collisions.events_component();

    s.physics.update(&mut s.world);
    assert!(s.world.get_comp(a, events).is_none());

    s.physics.update(&mut s.world);
    let on_a = s.world.get_comp(a, events).unwrap().clone();
    let on_b = s.world.get_comp(b, events).unwrap().clone();
    assert_eq!(on_a.len(), 1);
    assert_eq!(on_a, on_b);
    assert_eq!(on_a[0].other(a), b);
    assert_relative_eq!(on_a[0].position.x, 1.5);
    assert_relative_eq!(on_a[0].position.y, 0.0);

    let velocity = s.physics.velocity();
    assert_eq!(s.world.get_comp(a, velocity), Some(&Vec2::new(-1.0, 0.0)));
    assert_eq!(s.world.get_comp(b, velocity), Some(&Vec2::new(1.0, 0.0)));

    // apart again: last tick's events are cleared
    s.physics.update(&mut s.world);
    assert!(s.world.get_comp(a, events).unwrap().is_empty());
    assert!(s.world.get_comp(b, events).unwrap().is_empty());
}

#[test]
fn test_static_body_keeps_its_state() {
    let mut s = scene();
    let a = ball(&mut s, Vec2::new(0.0, 0.0), Vec2::new(0.5, 0.0));
    let wall = s.world.spawn(Vec2::new(1.5, 0.0));
    s.world.add_comp(wall, s.body, Body::from_shape(create_circle(1.0), 0.0));
    s.world.add_comp(wall, s.collisions.static_component(), true);

    s.physics.update(&mut s.world);

    let velocity = s.physics.velocity();
    assert_eq!(s.world.get_comp(a, velocity), Some(&Vec2::new(-0.5, 0.0)));
    assert!(!s.world.has_comp(wall, velocity));
    assert_eq!(s.world.pos(wall), Vec2::new(1.5, 0.0));

    let kinds: Vec<BodyType> = s
        .engine
        .state
        .borrow()
        .bodies
        .values()
        .map(|b| b.desc.body_type)
        .collect();
    assert_eq!(kinds, vec![BodyType::Dynamic, BodyType::Static]);
}

#[test]
fn test_engine_steps_once_per_tick() {
    let mut s = scene();
    for i in 0..3 {
        ball(&mut s, Vec2::new(10.0 * i as f64, 0.0), Vec2::ZERO);
    }
    for _ in 0..4 {
        s.physics.update(&mut s.world);
    }
    assert_eq!(s.engine.state.borrow().steps, 4);
    assert_eq!(s.collisions.managed_count(), 3);
}

#[test]
fn test_callbacks_see_every_event() {
    let mut s = scene();
    let hits = s.world.component::<u32>();
    s.collisions.add_collision_callback(move |world, event| {
        for entity in [event.entity_a, event.entity_b] {
            let count = world.get_comp(entity, hits).copied().unwrap_or(0);
            world.add_comp(entity, hits, count + 1);
        }
    });

    let a = ball(&mut s, Vec2::new(0.0, 0.0), Vec2::ZERO);
    let b = ball(&mut s, Vec2::new(1.0, 0.0), Vec2::ZERO);
    let far = ball(&mut s, Vec2::new(50.0, 0.0), Vec2::ZERO);

    // resting contact starts once
    for _ in 0..3 {
        s.physics.update(&mut s.world);
    }
    assert_eq!(s.world.get_comp(a, hits), Some(&1));
    assert_eq!(s.world.get_comp(b, hits), Some(&1));
    assert_eq!(s.world.get_comp(far, hits), None);
}

#[test]
fn test_removed_body_leaves_engine() {
    let mut s = scene();
    let a = ball(&mut s, Vec2::ZERO, Vec2::ZERO);
    let b = ball(&mut s, Vec2::new(10.0, 0.0), Vec2::ZERO);
    s.physics.update(&mut s.world);
    assert!(s.collisions.is_managed(a));

    s.world.remove_comp(a, s.body);
    s.physics.update(&mut s.world);

    assert!(!s.collisions.is_managed(a));
    assert!(s.collisions.is_managed(b));
    assert_eq!(s.engine.state.borrow().removed.len(), 1);
    assert_eq!(s.engine.state.borrow().bodies.len(), 1);
}

#[test]
fn test_unusable_bodies_are_skipped() {
    let mut s = scene();
    let good = ball(&mut s, Vec2::ZERO, Vec2::ZERO);

    let bad_ring = s.world.spawn(Vec2::new(20.0, 0.0));
    s.world
        .add_comp(bad_ring, s.body, Body::from_shape(create_ring(5.0, 2.0, vec![]), 0.0));
    // the fake engine has no boxes
    let crate_box = s.world.spawn(Vec2::new(40.0, 0.0));
    s.world
        .add_comp(crate_box, s.body, Body::from_shape(create_rectangle(2.0, 2.0), 0.0));

    s.physics.update(&mut s.world);
    s.physics.update(&mut s.world);

    assert!(s.collisions.is_managed(good));
    assert!(!s.collisions.is_managed(bad_ring));
    assert!(!s.collisions.is_managed(crate_box));
    // the half-built body for the box was torn down
    assert_eq!(s.engine.state.borrow().bodies.len(), 1);
    assert_eq!(s.collisions.rejected_entities(), vec![bad_ring, crate_box]);

    // replacing the body lets the entity join
    s.world
        .add_comp(crate_box, s.body, Body::from_shape(create_circle(1.0), 0.0));
    s.world.remove_comp(bad_ring, s.body);
    s.physics.update(&mut s.world);
    assert!(s.collisions.is_managed(crate_box));
    assert!(s.collisions.rejected_entities().is_empty());
}

#[test]
fn test_mass_reaches_engine() {
    let mut s = scene();
    let heavy = ball(&mut s, Vec2::ZERO, Vec2::ZERO);
    s.world.add_comp(heavy, s.physics.mass(), 4.0);
    ball(&mut s, Vec2::new(10.0, 0.0), Vec2::ZERO);

    s.physics.update(&mut s.world);

    let state = s.engine.state.borrow();
    let masses: Vec<Option<f64>> = state
        .bodies
        .values()
        .map(|b| b.desc.mass_properties.map(|m| m.mass))
        .collect();
    assert_eq!(masses, vec![Some(4.0), None]);
}

#[test]
fn test_invalid_defaults_rejected() {
    let mut world = World::new();
    let mut physics = Physics::new(&mut world);
    let body = world.component::<Body>();
    let result = init_collision_force(
        &mut physics,
        &mut world,
        body,
        FakeBackend::default(),
        DefaultCollisionProperties {
            restitution: Some(f64::NAN),
            ..Default::default()
        },
    );
    assert!(matches!(result, Err(Error::Config(_))));
}
