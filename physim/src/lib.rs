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
//! # physim
//!
//! A frame-driven 2D simulation kernel built around an entity/component
//! store.
//!
//! ## Features
//!
//! - **Component Queries**: Typed component handles and a query/dispatch primitive shared by forces and drawing
//! - **Force Pipeline**: Priority-ordered forces over velocity, acceleration and mass
//! - **Gravity**: Pairwise Newtonian attraction, parallelized with Rayon when the `parallel` feature is on
//! - **Collisions**: Bridging to a rigid-body engine (`rapier` feature) with per-entity collision events
//! - **Rendering**: A draw pipeline over an injected drawing surface, with a following, shaking camera
//! - **Particles**: Pooled particles, trails and preset effects
//! - **Extensibility**: Versioned plugins installed in dependency order
//!
//! ## Example
//!
//! ```rust
//! use physim::{Physics, Vec2, World};
//!
//! let mut world = World::new();
//! let mut physics = Physics::new(&mut world);
//!
//! let ball = world.spawn(Vec2::ZERO);
//! world.add_comp(ball, physics.acceleration(), Vec2::new(0.0, 1.0));
//!
//! physics.update(&mut world);
//! assert_eq!(world.pos(ball), Vec2::new(0.0, 1.0));
//! ```

#![warn(missing_docs)]

/// 2D vectors
pub mod vec;

/// Entity Component System implementation
pub mod ecs;

/// Force pipeline and built-in physical components
pub mod physics;

/// Forces built on the physics pipeline
pub mod forces;

/// Draw pipeline, camera, colors and the drawing surface contract
pub mod display;

/// Rigid shapes made of polygon and circle parts
pub mod body;

/// Ready-made draw components
pub mod graphics;

/// Particle effects
pub mod particles;

/// Memory pooling for reducing allocation churn
pub mod pool;

/// Plugin system for extensibility
pub mod plugins;

/// Services supplied by the embedding program
pub mod host;

/// Sounds, notes and MIDI
pub mod audio;

/// Local and fetched asset references
pub mod assets;

/// Frame driver tying physics, particles and drawing together
pub mod simulation;

/// Simulation settings loaded from TOML
pub mod config;

/// Error types
pub mod error;

pub use body::Body;
pub use display::{Camera, Color, Display};
pub use ecs::{Component, Entity, World};
pub use error::{Error, Result};
pub use particles::ParticleSystem;
pub use physics::Physics;
pub use simulation::Simulation;
pub use vec::Vec2;
