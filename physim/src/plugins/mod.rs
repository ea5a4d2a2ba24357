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
//! Plugin system
//!
//! Plugins package setup code (components, entities, forces) behind a
//! name and a version so simulations can be assembled from parts.
//!
//! ```rust,ignore
//! use physim::plugins::{Plugin, PluginContext};
//!
//! struct Wind(Vec2);
//!
//! impl Plugin for Wind {
//!     fn name(&self) -> &str { "wind" }
//!     fn version(&self) -> &str { "1.0.0" }
//!     fn dependencies(&self) -> Vec<&str> { vec!["gravity"] }
//!     fn install(&mut self, ctx: &mut PluginContext<'_>) -> physim::Result<()> {
//!         let push = self.0;
//!         let physics = ctx.physics();
//!         let acceleration = physics.acceleration();
//!         physics.register_force(physics.velocity(), move |world, e, _v| {
//!             let a = world.get_comp(e, acceleration).copied().unwrap_or_default();
//!             world.add_comp(e, acceleration, a + push);
//!         });
//!         Ok(())
//!     }
//!     fn as_any(&self) -> &dyn std::any::Any { self }
//! }
//! ```
//!
//! # Version Compatibility
//!
//! The plugin API follows semantic versioning. For a 0.x API the minor
//! version is breaking; from 1.0 on a plugin may target an older minor
//! version of the same major.

pub mod api;
pub mod gravity;
pub mod registry;

pub use api::{Plugin, PluginContext, PLUGIN_API_VERSION};
pub use gravity::{GravityPlugin, DEFAULT_G};
pub use registry::PluginRegistry;
