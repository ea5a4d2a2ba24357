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
//! Plugin registry
//!
//! The registry:
//! - rejects duplicate names and incompatible API versions at registration
//! - verifies that every dependency is registered
//! - installs plugins in dependency order, rejecting cycles

use crate::ecs::World;
use crate::error::{Error, Result};
use crate::physics::Physics;
use crate::plugins::api::{Plugin, PluginContext, PLUGIN_API_VERSION};
use semver::Version;
use std::collections::{HashMap, VecDeque};

/// Registered plugins and their install state
pub struct PluginRegistry {
    plugins: Vec<Box<dyn Plugin>>,
    load_order: Vec<String>,
    installed: bool,
}

impl PluginRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        PluginRegistry {
            plugins: Vec::new(),
            load_order: Vec::new(),
            installed: false,
        }
    }

    /// Add a plugin
    ///
    /// # Errors
    ///
    /// - a plugin with the same name is already registered
    /// - the plugin's API version is incompatible with [`PLUGIN_API_VERSION`]
    /// - the registry has already been installed
    pub fn register(&mut self, plugin: Box<dyn Plugin>) -> Result<()> {
        if self.installed {
            return Err(Error::Plugin(
                "cannot register plugins after installation".to_string(),
            ));
        }

        let name = plugin.name().to_string();
        if self.plugins.iter().any(|p| p.name() == name) {
            return Err(Error::Plugin(format!("plugin '{}' is already registered", name)));
        }

        let api_version = plugin.api_version();
        if !is_version_compatible(api_version, PLUGIN_API_VERSION) {
            return Err(Error::PluginIncompatible {
                name,
                required: api_version.to_string(),
                provided: PLUGIN_API_VERSION.to_string(),
            });
        }

        log::debug!("registered plugin '{}' v{}", name, plugin.version());
        self.plugins.push(plugin);
        Ok(())
    }

    /// Install every registered plugin into `world` and `physics`
    ///
    /// Plugins without a dependency relation keep registration order.
    ///
    /// # Errors
    ///
    /// - a dependency is not registered
    /// - the dependency graph has a cycle
    /// - a plugin's `install` fails; plugins installed before it stay installed
    pub fn install_all(&mut self, world: &mut World, physics: &mut Physics) -> Result<()> {
        if self.installed {
            return Err(Error::Plugin("registry already installed".to_string()));
        }

        let names: Vec<String> = self.plugins.iter().map(|p| p.name().to_string()).collect();
        let mut dependencies: Vec<Vec<String>> = Vec::with_capacity(self.plugins.len());
        for plugin in &self.plugins {
            let deps: Vec<String> = plugin.dependencies().iter().map(|s| s.to_string()).collect();
            for dep in &deps {
                if !names.contains(dep) {
                    return Err(Error::Plugin(format!(
                        "plugin '{}' depends on '{}' which is not registered",
                        plugin.name(),
                        dep
                    )));
                }
            }
            dependencies.push(deps);
        }

        let order = topological_sort(&names, &dependencies)?;

        let mut context = PluginContext::new(world, physics);
        for index in order {
            let plugin = &mut self.plugins[index];
            plugin
                .install(&mut context)
                .map_err(|e| Error::Plugin(format!("failed to install plugin '{}': {}", names[index], e)))?;
            log::info!("installed plugin '{}' v{}", names[index], plugin.version());
            self.load_order.push(names[index].clone());
        }

        self.installed = true;
        Ok(())
    }

    /// Get a plugin by name
    pub fn get(&self, name: &str) -> Option<&dyn Plugin> {
        self.plugins.iter().find(|p| p.name() == name).map(|p| p.as_ref())
    }

    /// Get a plugin by name as its concrete type
    pub fn get_as<P: Plugin + 'static>(&self, name: &str) -> Option<&P> {
        self.get(name)?.as_any().downcast_ref::<P>()
    }

    /// Number of registered plugins
    pub fn plugin_count(&self) -> usize {
        self.plugins.len()
    }

    /// True once [`PluginRegistry::install_all`] has succeeded
    pub fn is_installed(&self) -> bool {
        self.installed
    }

    /// Names of installed plugins in installation order
    pub fn load_order(&self) -> &[String] {
        &self.load_order
    }
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Check if a plugin API version is compatible with the engine
///
/// Uses semantic versioning rules:
/// - Major version must match
/// - For major version 0.x.y, minor versions must match (breaking changes)
/// - For major version >= 1, minor version can be less than or equal
/// - Patch version is ignored
fn is_version_compatible(plugin_version: &str, engine_version: &str) -> bool {
    let (Ok(plugin_ver), Ok(engine_ver)) =
        (Version::parse(plugin_version), Version::parse(engine_version))
    else {
        return false;
    };

    if plugin_ver.major != engine_ver.major {
        return false;
    }
    if plugin_ver.major != 0 {
        plugin_ver.minor <= engine_ver.minor
    } else {
        plugin_ver.minor == engine_ver.minor
    }
}

/// Kahn's algorithm over plugin indices
///
/// Ready plugins are taken in registration order.
fn topological_sort(names: &[String], dependencies: &[Vec<String>]) -> Result<Vec<usize>> {
    let index: HashMap<&str, usize> = names
        .iter()
        .enumerate()
        .map(|(i, n)| (n.as_str(), i))
        .collect();
    let mut in_degree = vec![0usize; names.len()];
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); names.len()];

    for (dependent, deps) in dependencies.iter().enumerate() {
        for dep in deps {
            if let Some(&d) = index.get(dep.as_str()) {
                dependents[d].push(dependent);
                in_degree[dependent] += 1;
            }
        }
    }

    let mut queue: VecDeque<usize> = (0..names.len()).filter(|&i| in_degree[i] == 0).collect();
    let mut sorted = Vec::with_capacity(names.len());
    while let Some(node) = queue.pop_front() {
        sorted.push(node);
        for &next in &dependents[node] {
            in_degree[next] -= 1;
            if in_degree[next] == 0 {
                queue.push_back(next);
            }
        }
    }

    if sorted.len() != names.len() {
        let stuck: Vec<&str> = (0..names.len())
            .filter(|i| in_degree[*i] > 0)
            .map(|i| names[i].as_str())
            .collect();
        return Err(Error::Plugin(format!(
            "circular dependency detected among plugins: {}",
            stuck.join(", ")
        )));
    }
    Ok(sorted)
}
