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
//! Mutual gravitation as a plugin
//!
//! Installs [`init_gravity_force`](crate::forces::init_gravity_force) with
//! a configured constant.

use crate::error::{Error, Result};
use crate::forces::init_gravity_force;
use crate::plugins::{Plugin, PluginContext};
use std::any::Any;

/// Gravitational constant in simulation units used by [`GravityPlugin::default`]
pub const DEFAULT_G: f64 = 1.0;

/// Registers gravity between every entity with a mass
///
/// # Example
///
/// ```rust
/// use physim::plugins::{GravityPlugin, PluginRegistry};
/// use physim::{Physics, World};
///
/// let mut world = World::new();
/// let mut physics = Physics::new(&mut world);
///
/// let mut registry = PluginRegistry::new();
/// registry.register(Box::new(GravityPlugin::new(0.5))).unwrap();
/// registry.install_all(&mut world, &mut physics).unwrap();
/// assert_eq!(physics.force_count(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GravityPlugin {
    g: f64,
}

impl GravityPlugin {
    /// Gravity with constant `g`
    pub fn new(g: f64) -> Self {
        GravityPlugin { g }
    }

    /// The gravitational constant
    pub fn g(&self) -> f64 {
        self.g
    }
}

impl Default for GravityPlugin {
    fn default() -> Self {
        Self::new(DEFAULT_G)
    }
}

impl Plugin for GravityPlugin {
    fn name(&self) -> &str {
        "gravity"
    }

    fn version(&self) -> &str {
        env!("CARGO_PKG_VERSION")
    }

    fn install(&mut self, context: &mut PluginContext<'_>) -> Result<()> {
        if !self.g.is_finite() {
            return Err(Error::Config(format!(
                "gravitational constant must be finite, got {}",
                self.g
            )));
        }
        init_gravity_force(context.physics(), self.g);
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::PluginRegistry;
    use crate::{Physics, Vec2, World};

    #[test]
    fn test_installed_gravity_pulls() {
        let mut world = World::new();
        let mut physics = Physics::new(&mut world);
        let mut registry = PluginRegistry::new();
        registry.register(Box::new(GravityPlugin::new(1.0))).unwrap();
        registry.install_all(&mut world, &mut physics).unwrap();

        let a = world.spawn(Vec2::ZERO);
        let b = world.spawn(Vec2::new(10.0, 0.0));
        world.add_comp(a, physics.mass(), 1.0);
        world.add_comp(b, physics.mass(), 100.0);
        physics.update(&mut world);

        assert!(world.pos(a).x > 0.0);
        let plugin = registry.get_as::<GravityPlugin>("gravity").unwrap();
        assert_eq!(plugin.g(), 1.0);
    }

    #[test]
    fn test_non_finite_constant_rejected() {
        let mut world = World::new();
        let mut physics = Physics::new(&mut world);
        let mut registry = PluginRegistry::new();
        registry.register(Box::new(GravityPlugin::new(f64::NAN))).unwrap();
        assert!(registry.install_all(&mut world, &mut physics).is_err());
    }
}
