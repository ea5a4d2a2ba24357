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
//! Force pipeline behavior across whole frames

use physim::physics::{ACCELERATION_PRIORITY, DEFAULT_FORCE_PRIORITY, VELOCITY_PRIORITY};
use physim::{Physics, Vec2, World};
use std::cell::RefCell;
use std::rc::Rc;

#[test]
fn test_constant_acceleration_accumulates() {
    let mut world = World::new();
    let mut physics = Physics::new(&mut world);
    let accel = physics.acceleration();
    let e = world.spawn(Vec2::ZERO);

    // a force that pushes +1 in x every frame
    physics.register_force(accel, move |world: &mut World, entity, _a: Vec2| {
        let current = world.get_comp(entity, accel).copied().unwrap_or_default();
        world.add_comp(entity, accel, current + Vec2::new(1.0, 0.0));
    });
    world.add_comp(e, accel, Vec2::ZERO);

    for _ in 0..3 {
        physics.update(&mut world);
    }
    // velocities 1, 2, 3 summed
    assert_eq!(world.pos(e), Vec2::new(6.0, 0.0));
    assert_eq!(world.get_comp(e, physics.velocity()), Some(&Vec2::new(3.0, 0.0)));
    assert_eq!(world.get_comp(e, accel), Some(&Vec2::ZERO));
}

#[test]
fn test_priorities_order_forces_within_a_frame() {
    let mut world = World::new();
    let mut physics = Physics::new(&mut world);
    let tag = world.component::<()>();
    let e = world.spawn(Vec2::ZERO);
    world.add_comp(e, tag, ());
    world.add_comp(e, physics.velocity(), Vec2::new(1.0, 0.0));

    let seen = Rc::new(RefCell::new(Vec::new()));
    for (label, priority) in [("late", VELOCITY_PRIORITY + 1), ("early", -5), ("default", DEFAULT_FORCE_PRIORITY)] {
        let seen = Rc::clone(&seen);
        physics.register_force_with_priority(tag, priority, move |world: &mut World, entity, _| {
            seen.borrow_mut().push((label, world.pos(entity).x));
        });
    }
    assert!(DEFAULT_FORCE_PRIORITY < ACCELERATION_PRIORITY);

    physics.update(&mut world);
    assert_eq!(
        *seen.borrow(),
        vec![("early", 0.0), ("default", 0.0), ("late", 1.0)]
    );
}

#[test]
fn test_multi_component_force_sees_only_full_matches() {
    let mut world = World::new();
    let mut physics = Physics::new(&mut world);
    let charge = world.component::<f64>();
    let field = world.component::<Vec2>();
    let accel = physics.acceleration();

    let both = world.spawn(Vec2::ZERO);
    world.add_comp(both, charge, 2.0);
    world.add_comp(both, field, Vec2::new(0.0, 0.5));
    let charge_only = world.spawn(Vec2::ZERO);
    world.add_comp(charge_only, charge, 2.0);

    physics.register_force_multi((charge, field), DEFAULT_FORCE_PRIORITY, move |world: &mut World, entity, (q, f): (f64, Vec2)| {
        world.add_comp(entity, accel, f.scale(q));
    });

    physics.update(&mut world);
    assert_eq!(world.pos(both), Vec2::new(0.0, 1.0));
    assert_eq!(world.pos(charge_only), Vec2::ZERO);
}

#[test]
fn test_force_registered_mid_run_joins_next_frame() {
    let mut world = World::new();
    let mut physics = Physics::new(&mut world);
    let e = world.spawn(Vec2::ZERO);
    world.add_comp(e, physics.velocity(), Vec2::new(1.0, 1.0));

    physics.update(&mut world);
    let velocity = physics.velocity();
    physics.register_force_with_priority(velocity, -1, move |world: &mut World, entity, _v: Vec2| {
        world.add_comp(entity, velocity, Vec2::ZERO);
    });
    physics.update(&mut world);
    physics.update(&mut world);

    assert_eq!(world.pos(e), Vec2::new(1.0, 1.0));
    assert_eq!(physics.force_count(), 3);
    assert_eq!(world.frame(), 3);
}
