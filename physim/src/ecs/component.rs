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
//! Component handles and storage
//!
//! A component is a sparse map from entity to a typed value. Having an
//! entry *is* the "entity has this component" predicate. Handles are cheap
//! `Copy` tokens; the values themselves live in the world's type-erased
//! storage table.

use crate::ecs::Entity;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;

/// Index of a component's storage inside its world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(pub(crate) usize);

/// Typed handle to a component registered with a [`World`](crate::ecs::World)
///
/// Created by [`World::component`](crate::ecs::World::component). The handle
/// remembers which world minted it; using it with another world panics.
pub struct Component<T> {
    id: ComponentId,
    world: u64,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Component<T> {
    pub(crate) fn new(id: ComponentId, world: u64) -> Self {
        Component {
            id,
            world,
            _marker: PhantomData,
        }
    }

    /// Storage index of this component
    pub fn id(&self) -> ComponentId {
        self.id
    }

    pub(crate) fn world_id(&self) -> u64 {
        self.world
    }
}

impl<T> Clone for Component<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Component<T> {}

impl<T> PartialEq for Component<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.world == other.world
    }
}

impl<T> Eq for Component<T> {}

impl<T> fmt::Debug for Component<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Component")
            .field("id", &self.id.0)
            .field("type", &std::any::type_name::<T>())
            .finish()
    }
}

/// Storage interface for a single component's values
pub trait ComponentStorage {
    /// The value type this storage manages
    type Item;

    /// Insert or overwrite the value for `entity`
    fn insert(&mut self, entity: Entity, value: Self::Item);

    /// Remove the value for `entity`
    fn remove(&mut self, entity: Entity) -> Option<Self::Item>;

    /// Get a reference to the value for `entity`
    fn get(&self, entity: Entity) -> Option<&Self::Item>;

    /// Get a mutable reference to the value for `entity`
    fn get_mut(&mut self, entity: Entity) -> Option<&mut Self::Item>;

    /// Check if `entity` has a value
    fn contains(&self, entity: Entity) -> bool;

    /// Number of stored values
    fn len(&self) -> usize;

    /// True when nothing is stored
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clear all values
    fn clear(&mut self);
}

/// HashMap-backed component storage
pub struct HashMapStorage<T> {
    components: HashMap<Entity, T>,
}

impl<T> HashMapStorage<T> {
    /// Create a new empty storage
    pub fn new() -> Self {
        HashMapStorage {
            components: HashMap::new(),
        }
    }

    /// Iterate over stored `(entity, value)` pairs in unspecified order
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> {
        self.components.iter().map(|(e, v)| (*e, v))
    }

    /// Entities with a value, in unspecified order
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.components.keys().copied()
    }
}

impl<T> Default for HashMapStorage<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ComponentStorage for HashMapStorage<T> {
    type Item = T;

    fn insert(&mut self, entity: Entity, value: T) {
        self.components.insert(entity, value);
    }

    fn remove(&mut self, entity: Entity) -> Option<T> {
        self.components.remove(&entity)
    }

    fn get(&self, entity: Entity) -> Option<&T> {
        self.components.get(&entity)
    }

    fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        self.components.get_mut(&entity)
    }

    fn contains(&self, entity: Entity) -> bool {
        self.components.contains_key(&entity)
    }

    fn len(&self) -> usize {
        self.components.len()
    }

    fn clear(&mut self) {
        self.components.clear();
    }
}

/// Type-erased view of a storage, enough to intersect key sets
pub(crate) trait AnyStorage {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn has(&self, entity: Entity) -> bool;
    fn keys(&self) -> Vec<Entity>;
}

impl<T: 'static> AnyStorage for HashMapStorage<T> {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn has(&self, entity: Entity) -> bool {
        self.contains(entity)
    }

    fn keys(&self) -> Vec<Entity> {
        self.components.keys().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hashmap_storage() {
        let mut storage = HashMapStorage::<f64>::new();
        let e1 = Entity::new(1);
        let e2 = Entity::new(2);

        storage.insert(e1, 3.0);
        assert!(storage.contains(e1));
        assert!(!storage.contains(e2));
        assert_eq!(storage.get(e1), Some(&3.0));

        *storage.get_mut(e1).unwrap() = 4.0;
        assert_eq!(storage.remove(e1), Some(4.0));
        assert!(storage.is_empty());
    }

    #[test]
    fn test_erased_keys() {
        let mut storage = HashMapStorage::<u8>::new();
        storage.insert(Entity::new(7), 1);
        storage.insert(Entity::new(3), 2);
        let erased: &dyn AnyStorage = &storage;
        let mut keys = erased.keys();
        keys.sort();
        assert_eq!(keys, vec![Entity::new(3), Entity::new(7)]);
    }
}
