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
//! Simulation settings loadable from TOML
//!
//! ```toml
//! width = 800.0
//! height = 600.0
//! background = "midnightblue"
//! gravity = 0.5
//! seed = 7
//!
//! [particle_pool]
//! max_pool_size = 2048
//!
//! [collision]
//! body_type = "dynamic"
//! restitution = 0.9
//! ```
//!
//! Every key is optional; missing keys take their [`Default`] values.

use crate::display::Color;
use crate::error::{Error, Result};
use crate::forces::collision::{validate_properties, DefaultCollisionProperties};
use crate::pool::PoolConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tunables for a [`Simulation`](crate::simulation::Simulation)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Canvas width in pixels
    pub width: f64,
    /// Canvas height in pixels
    pub height: f64,
    /// Background color, any string [`Color::from_string`] accepts
    pub background: String,
    /// Gravitational constant; no gravity force when unset
    pub gravity: Option<f64>,
    /// Seed for particle randomness; entropy when unset
    pub seed: Option<u64>,
    /// Particle pool sizing
    pub particle_pool: PoolConfig,
    /// Defaults for collision-managed entities
    pub collision: DefaultCollisionProperties,
}

impl Default for SimConfig {
    fn default() -> Self {
        SimConfig {
            width: 800.0,
            height: 600.0,
            background: "black".to_string(),
            gravity: None,
            seed: None,
            particle_pool: PoolConfig::default(),
            collision: DefaultCollisionProperties::default(),
        }
    }
}

impl SimConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: SimConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        log::debug!("loaded configuration from {}", path.display());
        Self::from_toml_str(&text)
    }

    /// Render as TOML
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))
    }

    /// Canvas size
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Background color string
    pub fn with_background(mut self, background: impl Into<String>) -> Self {
        self.background = background.into();
        self
    }

    /// Enable Newtonian gravity with constant `g`
    pub fn with_gravity(mut self, g: f64) -> Self {
        self.gravity = Some(g);
        self
    }

    /// Deterministic particle randomness
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Collision defaults
    pub fn with_collision(mut self, collision: DefaultCollisionProperties) -> Self {
        self.collision = collision;
        self
    }

    /// Parsed background color
    pub fn background_color(&self) -> Result<Color> {
        Color::from_string(&self.background)
    }

    /// Check every value is in range
    pub fn validate(&self) -> Result<()> {
        if !(self.width.is_finite() && self.width > 0.0 && self.height.is_finite() && self.height > 0.0) {
            return Err(Error::Config(format!(
                "canvas size must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if let Some(g) = self.gravity {
            if !g.is_finite() {
                return Err(Error::Config(format!("gravity must be finite, got {g}")));
            }
        }
        if self.particle_pool.initial_capacity > self.particle_pool.max_pool_size {
            return Err(Error::Config(format!(
                "particle pool initial capacity {} exceeds max size {}",
                self.particle_pool.initial_capacity, self.particle_pool.max_pool_size
            )));
        }
        self.background_color()
            .map_err(|e| Error::Config(format!("background: {e}")))?;
        validate_properties(&self.collision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forces::collision::BodyType;

    #[test]
    fn test_empty_document_is_default() {
        assert_eq!(SimConfig::from_toml_str("").unwrap(), SimConfig::default());
    }

    #[test]
    fn test_parse_full_document() {
        let config = SimConfig::from_toml_str(
            r##"
            width = 320.0
            height = 240.0
            background = "#102030"
            gravity = 0.5
            seed = 7

            [particle_pool]
            max_pool_size = 2048

            [collision]
            body_type = "kinematic_position_based"
            restitution = 0.9
            "##,
        )
        .unwrap();

        assert_eq!((config.width, config.height), (320.0, 240.0));
        assert_eq!(config.gravity, Some(0.5));
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.particle_pool.max_pool_size, 2048);
        assert_eq!(config.particle_pool.initial_capacity, PoolConfig::default().initial_capacity);
        assert_eq!(config.collision.body_type, BodyType::KinematicPositionBased);
        assert_eq!(config.collision.restitution, Some(0.9));
        assert_eq!(config.background_color().unwrap(), Color::from_rgb(16.0, 32.0, 48.0));
    }

    #[test]
    fn test_rejects_bad_values() {
        let bad = [
            SimConfig::default().with_size(0.0, 100.0),
            SimConfig::default().with_gravity(f64::NAN),
            SimConfig::default().with_background("not-a-color"),
            SimConfig::default().with_collision(DefaultCollisionProperties {
                friction: Some(-1.0),
                ..Default::default()
            }),
        ];
        for config in bad {
            assert!(matches!(config.validate(), Err(Error::Config(_))), "{config:?}");
        }
    }

    #[test]
    fn test_syntax_error_is_config_error() {
        assert!(matches!(SimConfig::from_toml_str("width = ="), Err(Error::Config(_))));
    }

    #[test]
    fn test_toml_round_trip() {
        let config = SimConfig::default().with_gravity(2.0).with_seed(3);
        let text = config.to_toml_string().unwrap();
        assert_eq!(SimConfig::from_toml_str(&text).unwrap(), config);
    }
}
