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
//! Asset references resolved through the host

use crate::error::Result;
use crate::host::HostServices;
use std::collections::HashMap;

/// A file the host can load
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Asset {
    /// Path the host already knows about
    Local(String),
    /// Remote file the host must download first
    Fetch(String),
}

impl Asset {
    /// Local asset at `path`
    pub fn local(path: impl Into<String>) -> Self {
        Asset::Local(path.into())
    }
}

/// Remote asset at `url`
pub fn fetch_asset(url: impl Into<String>) -> Asset {
    Asset::Fetch(url.into())
}

impl From<&str> for Asset {
    fn from(path: &str) -> Self {
        Asset::Local(path.to_string())
    }
}

/// Turns assets into names the host can load
///
/// Each distinct URL is registered with the host once, under a generated
/// name `fetchasset_<n>`; later requests for the same URL reuse that name.
#[derive(Debug, Default)]
pub struct AssetResolver {
    names: HashMap<String, String>,
    next_id: u64,
}

impl AssetResolver {
    /// Empty resolver
    pub fn new() -> Self {
        Self::default()
    }

    /// Host-side name for `asset`
    ///
    /// # Errors
    ///
    /// Propagates a failed host download. The URL is not cached, so a
    /// later call retries.
    pub fn resolve(&mut self, host: &mut dyn HostServices, asset: &Asset) -> Result<String> {
        match asset {
            Asset::Local(path) => Ok(path.clone()),
            Asset::Fetch(url) => {
                if let Some(name) = self.names.get(url) {
                    return Ok(name.clone());
                }
                let name = format!("fetchasset_{}", self.next_id);
                self.next_id += 1;
                log::debug!("fetching {} as {}", url, name);
                host.add_fetch_asset(&name, url)?;
                self.names.insert(url.clone(), name.clone());
                Ok(name)
            }
        }
    }

    /// Number of distinct URLs registered with the host
    pub fn fetched_count(&self) -> usize {
        self.names.len()
    }
}
