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
//! Fireworks: trails, bursts and a chime per explosion
//!
//! Rockets are entities with a velocity, a constant downward pull and a
//! trail. When a rocket starts falling it is removed from the trail and
//! physics components and a colored burst is emitted where it stood,
//! together with the next note of a short melody.
//!
//! # Running
//!
//! ```bash
//! RUST_LOG=physim=debug cargo run --example fireworks
//! ```

use physim::assets::{fetch_asset, AssetResolver};
use physim::audio::NoteSeries;
use physim::body::{create_circle, create_rectangle, Body};
use physim::config::SimConfig;
use physim::display::{Color, RecordingSurface};
use physim::host::{HostServices, RecordingHost};
use physim::particles::{
    create_fire_effect, ColorRange, FireEffectOptions, ParticleEmissionOptions, Range, Scale,
    TrailEmitter, TrailOptions,
};
use physim::{Simulation, Vec2, World};

const ROCKETS: usize = 5;
const FRAMES: u64 = 360;
const PULL: f64 = 0.08;

fn main() -> physim::Result<()> {
    env_logger::init();

    println!("==========================================================");
    println!("       Fireworks");
    println!("==========================================================");

    let config = SimConfig::default()
        .with_size(640.0, 480.0)
        .with_background("#050510")
        .with_seed(2025);
    let mut sim = Simulation::from_config(&config)?;

    let mut host = RecordingHost::new();
    let mut resolver = AssetResolver::new();
    let font = fetch_asset("https://example.com/soundfonts/celesta.sf2");
    let mut melody = NoteSeries::new(&["C5", "E5", "G5", "C6"], font, &mut host, &mut resolver)?;

    // rockets pull themselves down
    let fuse = sim.world.component::<Color>();
    let acceleration = sim.physics.acceleration();
    sim.physics.register_force(fuse, move |world: &mut World, entity, _c: Color| {
        world.add_comp(entity, acceleration, Vec2::new(0.0, PULL));
    });

    let velocity = sim.physics.velocity();
    let trail = sim.particles.trail_component();
    for k in 0..ROCKETS {
        let x = -200.0 + 100.0 * k as f64;
        let rocket = sim.world.spawn(Vec2::new(x, 220.0));
        let color = Color::from_hsl(72.0 * k as f64, 0.9, 0.6, 1.0);
        sim.world.add_comp(rocket, velocity, Vec2::new(0.0, -6.0 - k as f64 * 0.5));
        sim.world.add_comp(rocket, fuse, color);

        let sparks = TrailOptions::new(
            Body::from_shape(create_rectangle(1.0, 3.0), 0.0),
            ColorRange::new(color, color.with_alpha(0.0)),
            2,
            25.0,
        )
        .with_jitter(2.0)
        .with_scale(Scale::Range { start: 1.0, end: 0.2 });
        sim.world.add_comp(rocket, trail, vec![TrailEmitter::new(sparks)]);
    }

    let mut surface = RecordingSurface::new(config.width, config.height);
    let mut bursts = 0;
    let mut peak_particles = 0;
    sim.run(&mut host, &mut surface, FRAMES, |sim, host: &mut dyn HostServices| {
        for rocket in sim.world.entities_with(fuse) {
            let falling = sim.world.get_comp(rocket, velocity).map_or(false, |v| v.y >= 0.0);
            if !falling {
                continue;
            }
            let Some(color) = sim.world.remove_comp(rocket, fuse) else {
                continue;
            };
            sim.world.remove_comp(rocket, velocity);
            sim.world.remove_comp(rocket, trail);

            let pos = sim.world.pos(rocket);
            let burst = ParticleEmissionOptions::new(
                120,
                pos,
                Range::new(40.0, 80.0),
                Range::new(1.0, 3.5),
                Body::from_shape(create_circle(1.5), 0.0),
                ColorRange::new(color, Color::from_rgba(255.0, 255.0, 255.0, 0.0)),
            )
            .with_acceleration(Vec2::new(0.0, PULL / 4.0))
            .with_scale(Scale::Range { start: 1.0, end: 0.0 });
            sim.particles.emit(&burst);
            sim.particles.emit(&create_fire_effect(&FireEffectOptions {
                count: 20,
                ..FireEffectOptions::new(pos)
            }));
            sim.camera.shake(8, 3.0);
            melody.play_next(host)?;
            bursts += 1;
        }
        peak_particles = peak_particles.max(sim.particles.active_count());
        Ok(())
    })?;

    println!("Rockets burst:       {}/{}", bursts, ROCKETS);
    println!("Peak live particles: {}", peak_particles);
    println!("Particles left:      {}", sim.particles.active_count());
    println!("Pool hit rate:       {:.1}%", sim.particles.pool_stats().hit_rate());
    println!("Notes played:        {}", host.played.len());
    println!("Assets fetched:      {}", host.fetched.len());
    println!("Shapes drawn:        {}", surface.shape_count());
    Ok(())
}
