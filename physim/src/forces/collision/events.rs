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

use crate::ecs::Entity;
use crate::vec::Vec2;

/// Two entities started touching during the last collision step
///
/// The same event is delivered to both entities.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionEvent {
    /// Owner of the first collider
    pub entity_a: Entity,
    /// Owner of the second collider
    pub entity_b: Entity,
    /// Contact point in world space, or `entity_a`'s position when the
    /// engine reported no contact point
    pub position: Vec2,
}

impl CollisionEvent {
    /// The entity on the other side of the collision from `me`
    pub fn other(&self, me: Entity) -> Entity {
        if self.entity_a == me {
            self.entity_b
        } else {
            self.entity_a
        }
    }
}
