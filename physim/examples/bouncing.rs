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
//! Balls bouncing inside a ring, resolved by rapier2d
//!
//! The ring is a static body with a gap at the top; the balls are
//! dynamic bodies with full restitution. Every collision is counted
//! through a collision callback and makes the camera shake.
//!
//! # Running
//!
//! ```bash
//! cargo run --example bouncing --features rapier
//! ```

use physim::body::{create_circle, create_ring, Body, Gap};
use physim::display::{Color, RecordingSurface};
use physim::forces::collision::{init_collision_force, BodyType, DefaultCollisionProperties, RapierBackend};
use physim::graphics::{init_body_display_component, BodyDisplay};
use physim::host::RecordingHost;
use physim::{Simulation, Vec2};
use std::cell::Cell;
use std::f64::consts::FRAC_PI_2;
use std::rc::Rc;

const BALLS: usize = 8;
const FRAMES: u64 = 600;

fn main() -> physim::Result<()> {
    env_logger::init();

    println!("==========================================================");
    println!("       Bouncing (rapier2d)");
    println!("==========================================================");

    let mut sim = Simulation::new();
    let body = sim.world.component::<Body>();
    let looks = init_body_display_component(&mut sim.world, &mut sim.display, body);

    let props = DefaultCollisionProperties {
        body_type: BodyType::Dynamic,
        restitution: Some(1.0),
        friction: Some(0.0),
        mass: Some(1.0),
        ..Default::default()
    };
    let collisions = init_collision_force(
        &mut sim.physics,
        &mut sim.world,
        body,
        RapierBackend::new(),
        props,
    )?;

    let hits = Rc::new(Cell::new(0u32));
    let counter = Rc::clone(&hits);
    collisions.add_collision_callback(move |_world, event| {
        counter.set(counter.get() + 1);
        log::debug!("{} hit {} at {}", event.entity_a, event.entity_b, event.position);
    });

    // the gap is centered straight up (negative y)
    let gap = Gap::new(-FRAC_PI_2 - 0.3, 0.6);
    let arena = sim.world.spawn(Vec2::ZERO);
    sim.world.add_comp(arena, body, Body::from_shape(create_ring(180.0, 200.0, vec![gap]), 0.0));
    sim.world.add_comp(arena, collisions.static_component(), true);
    sim.world.add_comp(arena, looks, BodyDisplay::outline(Color::WHITE, 2.0));

    let velocity = sim.physics.velocity();
    for k in 0..BALLS {
        let angle = k as f64 * std::f64::consts::TAU / BALLS as f64;
        let ball = sim.world.spawn(Vec2::from_angle(angle).scale(80.0));
        sim.world.add_comp(ball, body, Body::from_shape(create_circle(10.0), 0.0));
        sim.world.add_comp(ball, velocity, Vec2::from_angle(angle * 3.0).scale(4.0));
        sim.world.add_comp(ball, looks, BodyDisplay::new(Color::from_hsv(45.0 * k as f64, 0.8, 1.0, 1.0)));
    }

    let events = collisions.events_component();
    let mut host = RecordingHost::new();
    let mut surface = RecordingSurface::default();
    let mut escaped = 0;
    sim.run(&mut host, &mut surface, FRAMES, |sim, _| {
        let collided = sim.world.query(events).iter().any(|(_, list)| !list.is_empty());
        if collided {
            sim.camera.shake(4, 2.0);
        }
        escaped = sim
            .world
            .entities_with(velocity)
            .into_iter()
            .filter(|e| sim.world.pos(*e).length() > 220.0)
            .count();
        Ok(())
    })?;

    println!("Managed bodies: {}", collisions.managed_count());
    println!("Collisions:     {}", hits.get());
    println!("Escaped balls:  {}", escaped);
    println!("Frames:         {}", sim.world.frame());
    Ok(())
}
