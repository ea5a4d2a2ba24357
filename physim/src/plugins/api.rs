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
//! Plugin API traits and context
//!
//! A plugin is a named, versioned bundle of setup code. When installed it
//! gets mutable access to the world and the force pipeline, so it can mint
//! components, spawn entities and register forces.

use crate::ecs::World;
use crate::error::Result;
use crate::physics::Physics;
use std::any::Any;

/// Version of the plugin API
///
/// Plugins built against a different minor version of a 0.x API, or a
/// different major version, are rejected at registration.
pub const PLUGIN_API_VERSION: &str = "0.2.0";

/// Scoped access to the engine handed to [`Plugin::install`]
pub struct PluginContext<'a> {
    world: &'a mut World,
    physics: &'a mut Physics,
}

impl<'a> PluginContext<'a> {
    /// Wrap a world and its force pipeline
    pub fn new(world: &'a mut World, physics: &'a mut Physics) -> Self {
        PluginContext { world, physics }
    }

    /// The entity world
    pub fn world(&mut self) -> &mut World {
        &mut *self.world
    }

    /// The force pipeline
    pub fn physics(&mut self) -> &mut Physics {
        &mut *self.physics
    }

    /// Both at once, for setup that needs the two together
    pub fn split(&mut self) -> (&mut World, &mut Physics) {
        (&mut *self.world, &mut *self.physics)
    }
}

/// An installable engine extension
pub trait Plugin {
    /// Unique name
    fn name(&self) -> &str;

    /// Plugin version, semantic versioning
    fn version(&self) -> &str;

    /// Plugin API version this plugin was built against
    fn api_version(&self) -> &str {
        PLUGIN_API_VERSION
    }

    /// Names of plugins that must be installed first
    fn dependencies(&self) -> Vec<&str> {
        Vec::new()
    }

    /// Register components, entities and forces
    ///
    /// Called exactly once, after every dependency has been installed.
    fn install(&mut self, context: &mut PluginContext<'_>) -> Result<()>;

    /// Allow downcasting to the concrete plugin type
    fn as_any(&self) -> &dyn Any;
}
