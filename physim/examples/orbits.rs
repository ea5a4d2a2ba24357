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
//! Orbiting bodies under mutual gravity
//!
//! A heavy sun with a few light planets on circular starting orbits. The
//! camera follows the sun; every frame is drawn to an in-memory surface.
//! At the end each planet's distance from the sun is compared with its
//! starting radius.
//!
//! # Running
//!
//! ```bash
//! cargo run --example orbits --release
//!
//! # Longer run, settings from a TOML file
//! cargo run --example orbits --release -- --frames 2000 --config orbits.toml
//! ```

use physim::config::SimConfig;
use physim::display::{Color, RecordingSurface};
use physim::graphics::{init_point_display_component, PointDisplay};
use physim::host::RecordingHost;
use physim::{Entity, Simulation, Vec2};

const G: f64 = 1.0;
const SUN_MASS: f64 = 5000.0;

struct Planet {
    name: &'static str,
    radius: f64,
    mass: f64,
    color: &'static str,
}

static PLANETS: [Planet; 3] = [
    Planet { name: "inner", radius: 80.0, mass: 1.0, color: "tomato" },
    Planet { name: "middle", radius: 150.0, mass: 2.0, color: "steelblue" },
    Planet { name: "outer", radius: 240.0, mass: 0.5, color: "gold" },
];

fn main() -> physim::Result<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let mut frames: u64 = 600;
    let mut config = SimConfig::default().with_background("black").with_gravity(G);

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--frames" if i + 1 < args.len() => {
                match args[i + 1].parse() {
                    Ok(n) => frames = n,
                    Err(_) => eprintln!("Warning: invalid frame count '{}', using {}", args[i + 1], frames),
                }
                i += 2;
            }
            "--config" if i + 1 < args.len() => {
                config = SimConfig::load(&args[i + 1])?;
                if config.gravity.is_none() {
                    config.gravity = Some(G);
                }
                i += 2;
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                std::process::exit(1);
            }
        }
    }

    println!("==========================================================");
    println!("       Orbits");
    println!("==========================================================");
    println!("  G = {}", config.gravity.unwrap_or(G));
    println!("  frames = {}", frames);
    println!();

    let mut sim = Simulation::from_config(&config)?;
    let dots = init_point_display_component(&mut sim.world, &mut sim.display);
    let mass = sim.physics.mass();
    let velocity = sim.physics.velocity();
    let g = config.gravity.unwrap_or(G);

    let sun = sim.world.spawn(Vec2::ZERO);
    sim.world.add_comp(sun, mass, SUN_MASS);
    sim.world.add_comp(sun, dots, PointDisplay::new(Color::from_string("yellow")?, 12.0));

    let mut planets: Vec<(Entity, &Planet)> = Vec::new();
    for (k, planet) in PLANETS.iter().enumerate() {
        let angle = k as f64 * 2.1;
        let e = sim.world.spawn(Vec2::from_angle(angle).scale(planet.radius));
        let speed = (g * SUN_MASS / planet.radius).sqrt();
        sim.world.add_comp(e, mass, planet.mass);
        sim.world.add_comp(e, velocity, Vec2::from_angle(angle + std::f64::consts::FRAC_PI_2).scale(speed));
        sim.world.add_comp(e, dots, PointDisplay::new(Color::from_string(planet.color)?, 4.0));
        planets.push((e, planet));
    }
    sim.camera.follow(sun);

    let mut host = RecordingHost::new();
    let (width, height) = sim.size();
    let mut surface = RecordingSurface::new(width, height);
    sim.run(&mut host, &mut surface, frames, |_, _| Ok(()))?;

    println!("{:<10} {:>12} {:>12} {:>10}", "planet", "start r", "final r", "drift %");
    for (e, planet) in &planets {
        let r = (sim.world.pos(*e) - sim.world.pos(sun)).length();
        let drift = (r - planet.radius) / planet.radius * 100.0;
        println!("{:<10} {:>12.2} {:>12.2} {:>10.2}", planet.name, planet.radius, r, drift);
    }
    println!();
    println!("Drew {} shapes over {} frames", surface.shape_count(), sim.world.frame());
    println!("Host finished: {}", host.finished);
    Ok(())
}
