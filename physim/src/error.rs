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
//! Crate-wide error type
//!
//! Errors fall into two domains. Input errors mean the caller handed us
//! something malformed (a bad color string, a degenerate shape) and the
//! operation failed without touching any state. System errors come from
//! collaborators outside the kernel: the host harness, the rigid-body
//! backend, the filesystem.

use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by the simulation kernel and its collaborators
#[derive(Debug, Error)]
pub enum Error {
    /// A color string could not be parsed
    #[error("failed to parse color string: \"{input}\"{}", detail_suffix(.detail))]
    InvalidColor {
        /// The offending input, verbatim
        input: String,
        /// Optional extra context
        detail: Option<String>,
    },

    /// A shape cannot be represented (e.g. ring with outer <= inner radius)
    #[error("invalid shape: {0}")]
    InvalidShape(String),

    /// A note name such as "C4" could not be converted to MIDI
    #[error("invalid note: {0}")]
    InvalidNote(String),

    /// An entity was expected to carry a component it does not have
    #[error("entity {entity} is missing required component '{component}'")]
    MissingComponent {
        /// Entity id
        entity: u64,
        /// Human readable component name
        component: &'static str,
    },

    /// A sound was built without a source
    #[error("sound source is not set")]
    MissingSource,

    /// Plugin API version mismatch
    #[error("plugin '{name}' requires API {required}, engine provides {provided}")]
    PluginIncompatible {
        /// Plugin name
        name: String,
        /// Version the plugin was built against
        required: String,
        /// Version the engine exposes
        provided: String,
    },

    /// Plugin dependency graph problem (missing dependency, cycle, duplicate)
    #[error("plugin error: {0}")]
    Plugin(String),

    /// The rigid-body backend rejected an operation
    #[error("collision backend error: {0}")]
    Backend(String),

    /// The host harness failed to service a request
    #[error("host error: {0}")]
    Host(String),

    /// Configuration could not be parsed or is out of range
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O failure
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn detail_suffix(detail: &Option<String>) -> String {
    match detail {
        Some(d) => format!(" ({d})"),
        None => String::new(),
    }
}

impl Error {
    pub(crate) fn invalid_color(input: &str) -> Self {
        Error::InvalidColor {
            input: input.to_string(),
            detail: None,
        }
    }

    pub(crate) fn invalid_color_with(input: &str, detail: impl Into<String>) -> Self {
        Error::InvalidColor {
            input: input.to_string(),
            detail: Some(detail.into()),
        }
    }

    /// True when the failure was caused by caller-supplied input rather
    /// than an unavailable or failing collaborator.
    pub fn is_input(&self) -> bool {
        matches!(
            self,
            Error::InvalidColor { .. }
                | Error::InvalidShape(_)
                | Error::InvalidNote(_)
                | Error::MissingComponent { .. }
                | Error::MissingSource
                | Error::PluginIncompatible { .. }
                | Error::Plugin(_)
                | Error::Config(_)
        )
    }

    /// Inverse of [`Error::is_input`]
    pub fn is_system(&self) -> bool {
        !self.is_input()
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_error_names_input() {
        let err = Error::invalid_color("nope");
        assert_eq!(err.to_string(), "failed to parse color string: \"nope\"");

        let err = Error::invalid_color_with("#12", "expected 3, 4, 6 or 8 hex digits");
        assert!(err.to_string().contains("#12"));
        assert!(err.to_string().contains("hex digits"));
    }

    #[test]
    fn test_error_domains() {
        assert!(Error::InvalidShape("ring".into()).is_input());
        assert!(Error::Backend("bad collider".into()).is_system());
        assert!(Error::Host("closed".into()).is_system());
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        assert!(Error::from(io).is_system());
    }
}
