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
//! Entity handles
//!
//! Entities are lightweight identifiers. The owning [`World`](crate::ecs::World)
//! stores each entity's position; everything else an entity "has" lives in
//! components keyed by this handle.

use std::fmt;

/// Unique identifier for an entity
///
/// Entities are never destroyed, so ids are issued in increasing order and
/// never reused. Ordering by id is the order in which entities were spawned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Entity(u64);

impl Entity {
    pub(crate) fn new(id: u64) -> Self {
        Entity(id)
    }

    /// Get the raw id
    pub fn id(&self) -> u64 {
        self.0
    }

    pub(crate) fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_identity() {
        let e1 = Entity::new(1);
        let e2 = Entity::new(1);
        let e3 = Entity::new(2);
        assert_eq!(e1, e2);
        assert_ne!(e1, e3);
        assert!(e1 < e3);
        assert_eq!(e3.to_string(), "Entity(2)");
    }
}
