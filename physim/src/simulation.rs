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
//! Frame-driven simulation aggregate
//!
//! A [`Simulation`] bundles a world with its force pipeline, particle
//! system, draw pipeline and camera, and advances them together:
//!
//! 1. physics update (forces in priority order)
//! 2. particle update
//! 3. display draw (camera update, clear, registrations)
//! 4. particle draw, through the same camera
//!
//! ```
//! use physim::display::RecordingSurface;
//! use physim::host::RecordingHost;
//! use physim::{Simulation, Vec2};
//!
//! let mut sim = Simulation::new();
//! let ball = sim.world.spawn(Vec2::ZERO);
//! let velocity = sim.physics.velocity();
//! sim.world.add_comp(ball, velocity, Vec2::new(1.0, 0.0));
//!
//! let mut host = RecordingHost::new();
//! let mut surface = RecordingSurface::new(800.0, 600.0);
//! sim.run(&mut host, &mut surface, 10, |_, _| Ok(()))?;
//!
//! assert_eq!(sim.world.pos(ball), Vec2::new(10.0, 0.0));
//! assert!(host.finished);
//! # Ok::<(), physim::Error>(())
//! ```

use crate::config::SimConfig;
use crate::display::{Camera, Display, Surface};
use crate::ecs::World;
use crate::error::Result;
use crate::forces::gravity::init_gravity_force;
use crate::host::HostServices;
use crate::particles::ParticleSystem;
use crate::physics::Physics;

/// World, forces, particles, drawing and camera advanced as one
pub struct Simulation {
    /// Entities and components
    pub world: World,
    /// Force pipeline
    pub physics: Physics,
    /// Draw pipeline
    pub display: Display,
    /// View onto the world
    pub camera: Camera,
    /// Particle effects
    pub particles: ParticleSystem,
    size: (f64, f64),
}

impl Simulation {
    /// Simulation with default settings and no gravity
    pub fn new() -> Self {
        let mut world = World::new();
        let physics = Physics::new(&mut world);
        let particles = ParticleSystem::new(&mut world);
        let defaults = SimConfig::default();
        Simulation {
            world,
            physics,
            display: Display::new(),
            camera: Camera::new(),
            particles,
            size: (defaults.width, defaults.height),
        }
    }

    /// Simulation built from validated settings
    ///
    /// Installs the gravity force when `config.gravity` is set. Collision
    /// defaults are not applied here since they need a backend; pass
    /// `config.collision` to
    /// [`init_collision_force`](crate::forces::collision::init_collision_force).
    pub fn from_config(config: &SimConfig) -> Result<Self> {
        config.validate()?;

        let mut world = World::new();
        let mut physics = Physics::new(&mut world);
        if let Some(g) = config.gravity {
            init_gravity_force(&mut physics, g);
        }

        let particles =
            ParticleSystem::with_options(&mut world, config.seed, config.particle_pool.clone());

        log::debug!(
            "simulation configured: {}x{}, gravity {:?}",
            config.width,
            config.height,
            config.gravity
        );
        Ok(Simulation {
            world,
            physics,
            display: Display::with_background(config.background_color()?),
            camera: Camera::new(),
            particles,
            size: (config.width, config.height),
        })
    }

    /// Canvas size requested from the host by [`Simulation::run`]
    pub fn size(&self) -> (f64, f64) {
        self.size
    }

    /// Advance and render one frame
    pub fn frame(&mut self, surface: &mut dyn Surface) {
        self.physics.update(&mut self.world);
        self.particles.update(&mut self.world);
        self.display.draw(&self.world, Some(&mut self.camera), surface);
        self.particles.draw(&self.camera, surface);
    }

    /// Run `frames` frames, then tell the host the simulation is done
    ///
    /// The canvas is resized to [`Simulation::size`] first. `on_update`
    /// runs after every frame.
    ///
    /// # Errors
    ///
    /// Stops at the first error returned by `on_update`; `finish` is not
    /// called in that case.
    pub fn run<F>(
        &mut self,
        host: &mut dyn HostServices,
        surface: &mut dyn Surface,
        frames: u64,
        mut on_update: F,
    ) -> Result<()>
    where
        F: FnMut(&mut Simulation, &mut dyn HostServices) -> Result<()>,
    {
        let (width, height) = self.size;
        host.resize_canvas(width, height);
        surface.resize_canvas(width, height);

        for _ in 0..frames {
            self.frame(surface);
            on_update(self, host)?;
        }

        log::debug!("simulation finished after {} frames", self.world.frame());
        host.finish();
        Ok(())
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::{Color, DrawCommand, RecordingSurface};
    use crate::error::Error;
    use crate::host::RecordingHost;
    use crate::vec::Vec2;

    #[test]
    fn test_from_config_applies_settings() {
        let config = SimConfig::default()
            .with_size(320.0, 200.0)
            .with_background("red")
            .with_gravity(1.0);
        let sim = Simulation::from_config(&config).unwrap();

        assert_eq!(sim.size(), (320.0, 200.0));
        assert_eq!(sim.display.background(), Color::RED);
        // two built-in forces plus gravity
        assert_eq!(sim.physics.force_count(), 3);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = SimConfig::default().with_background("nope");
        assert!(matches!(Simulation::from_config(&config), Err(Error::Config(_))));
    }

    #[test]
    fn test_frame_draws_after_physics() {
        let mut sim = Simulation::new();
        let radius = sim.world.component::<f64>();
        let e = sim.world.spawn(Vec2::ZERO);
        sim.world.add_comp(e, radius, 1.0);
        let velocity = sim.physics.velocity();
        sim.world.add_comp(e, velocity, Vec2::new(2.0, 0.0));
        sim.display.register_draw(radius, |world, surface, entity, r| {
            surface.circle(world.pos(entity), r, Color::WHITE);
        });

        let mut surface = RecordingSurface::new(100.0, 100.0);
        sim.frame(&mut surface);

        let centers: Vec<Vec2> = surface
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Circle { center, .. } => Some(*center),
                _ => None,
            })
            .collect();
        assert_eq!(centers, vec![Vec2::new(2.0, 0.0)]);
        assert_eq!(surface.depth(), 0);
    }

    #[test]
    fn test_run_counts_frames_and_finishes() {
        let mut sim = Simulation::new();
        let mut host = RecordingHost::new();
        let mut surface = RecordingSurface::new(10.0, 10.0);
        let mut calls = 0;

        sim.run(&mut host, &mut surface, 5, |sim, _| {
            calls += 1;
            assert_eq!(sim.world.frame(), calls);
            Ok(())
        })
        .unwrap();

        assert_eq!(calls, 5);
        assert!(host.finished);
        assert_eq!(host.canvas, Some((800.0, 600.0)));
    }

    #[test]
    fn test_run_stops_on_callback_error() {
        let mut sim = Simulation::new();
        let mut host = RecordingHost::new();
        let mut surface = RecordingSurface::new(10.0, 10.0);

        let result = sim.run(&mut host, &mut surface, 5, |sim, _| {
            if sim.world.frame() == 2 {
                return Err(Error::Host("gone".to_string()));
            }
            Ok(())
        });

        assert!(result.is_err());
        assert_eq!(sim.world.frame(), 2);
        assert!(!host.finished);
    }
}
