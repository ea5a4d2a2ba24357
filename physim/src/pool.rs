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
//! Object pooling for reducing allocation churn
//!
//! A [`Pool`] is a free list of retired records. Short-lived objects such
//! as particles are handed back on death and reused on the next spawn, so
//! a steady-state effect stops allocating after warm-up.
//!
//! The pool never hands out references into itself: `acquire` moves a
//! record out, `release` moves it back. Callers always overwrite every
//! field of an acquired record before use.

use serde::{Deserialize, Serialize};

/// Configuration for pool behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Records preallocated in the free list's backing storage
    pub initial_capacity: usize,
    /// Maximum number of retired records kept; extras are dropped
    pub max_pool_size: usize,
    /// Whether to log misses (fresh allocations)
    pub log_resize_events: bool,
}

impl Default for PoolConfig {
    fn default() -> Self {
        PoolConfig {
            initial_capacity: 256,
            max_pool_size: 16_384,
            log_resize_events: false,
        }
    }
}

impl PoolConfig {
    /// Create a new pool configuration with custom settings
    pub fn new(initial_capacity: usize, max_pool_size: usize) -> Self {
        PoolConfig {
            initial_capacity,
            max_pool_size,
            log_resize_events: false,
        }
    }

    /// Enable logging for misses
    pub fn with_logging(mut self) -> Self {
        self.log_resize_events = true;
        self
    }
}

/// Statistics for monitoring pool performance
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PoolStats {
    /// Number of acquisitions served from the free list
    pub hits: usize,
    /// Number of acquisitions that had to allocate
    pub misses: usize,
    /// Records dropped because the pool was full
    pub discarded: usize,
    /// Current number of records in the free list
    pub pool_size: usize,
    /// Largest the free list has ever been
    pub peak_size: usize,
}

impl PoolStats {
    /// Calculate the hit rate as a percentage
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}

/// Free list of reusable records
#[derive(Debug)]
pub struct Pool<T> {
    free: Vec<T>,
    config: PoolConfig,
    stats: PoolStats,
}

impl<T> Pool<T> {
    /// Create a pool with default configuration
    pub fn new() -> Self {
        Self::with_config(PoolConfig::default())
    }

    /// Create a pool with custom configuration
    pub fn with_config(config: PoolConfig) -> Self {
        Pool {
            free: Vec::with_capacity(config.initial_capacity.min(config.max_pool_size)),
            config,
            stats: PoolStats::default(),
        }
    }

    /// Take a retired record, or build one with `create` when the list is empty
    pub fn acquire_or_else(&mut self, create: impl FnOnce() -> T) -> T {
        match self.free.pop() {
            Some(record) => {
                self.stats.hits += 1;
                self.stats.pool_size = self.free.len();
                record
            }
            None => {
                self.stats.misses += 1;
                if self.config.log_resize_events {
                    log::debug!(
                        "pool miss, allocating (hit rate: {:.1}%)",
                        self.stats.hit_rate()
                    );
                }
                create()
            }
        }
    }

    /// Retire a record for later reuse
    pub fn release(&mut self, record: T) {
        if self.free.len() >= self.config.max_pool_size {
            self.stats.discarded += 1;
            return;
        }
        self.free.push(record);
        self.stats.pool_size = self.free.len();
        self.stats.peak_size = self.stats.peak_size.max(self.free.len());
    }

    /// Current pool statistics
    pub fn stats(&self) -> &PoolStats {
        &self.stats
    }

    /// Number of records in the free list
    pub fn len(&self) -> usize {
        self.free.len()
    }

    /// Check if the free list is empty
    pub fn is_empty(&self) -> bool {
        self.free.is_empty()
    }

    /// Drop every retired record
    pub fn clear(&mut self) {
        self.free.clear();
        self.stats.pool_size = 0;
    }

    /// Configuration in effect
    pub fn config(&self) -> &PoolConfig {
        &self.config
    }
}

impl<T> Default for Pool<T> {
    fn default() -> Self {
        Self::new()
    }
}
