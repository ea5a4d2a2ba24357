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
//! World: entity positions plus every component's storage

use crate::ecs::component::{AnyStorage, ComponentId};
use crate::ecs::query::{self, ComponentSet};
use crate::ecs::{Component, ComponentStorage, Entity, HashMapStorage};
use crate::vec::Vec2;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_WORLD_ID: AtomicU64 = AtomicU64::new(0);

/// Container for entities and their components
///
/// The world owns every entity's position and one storage per component
/// handle it has minted. Subsystems (physics, display, particles) hold
/// `Component` handles and read or write through the world.
pub struct World {
    id: u64,
    positions: Vec<Vec2>,
    storages: Vec<Box<dyn AnyStorage>>,
    frame: u64,
}

impl World {
    /// Create a new empty world
    pub fn new() -> Self {
        World {
            id: NEXT_WORLD_ID.fetch_add(1, Ordering::Relaxed),
            positions: Vec::new(),
            storages: Vec::new(),
            frame: 0,
        }
    }

    /// Create an entity at `pos`
    pub fn spawn(&mut self, pos: Vec2) -> Entity {
        let entity = Entity::new(self.positions.len() as u64);
        self.positions.push(pos);
        entity
    }

    /// Number of entities ever spawned
    pub fn entity_count(&self) -> usize {
        self.positions.len()
    }

    /// All entities in spawn order
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        (0..self.positions.len() as u64).map(Entity::new)
    }

    /// Position of `entity`
    ///
    /// # Panics
    ///
    /// Panics if the entity was not spawned by this world.
    pub fn pos(&self, entity: Entity) -> Vec2 {
        self.positions[entity.index()]
    }

    /// Overwrite the position of `entity`
    pub fn set_pos(&mut self, entity: Entity, pos: Vec2) {
        self.positions[entity.index()] = pos;
    }

    /// Move `entity` by `delta`
    pub fn translate(&mut self, entity: Entity, delta: Vec2) {
        let p = &mut self.positions[entity.index()];
        *p = *p + delta;
    }

    /// Register a new component of type `T`
    ///
    /// Each call mints an independent component, even for the same `T`:
    /// two `Component<Vec2>` handles never share entries.
    pub fn component<T: 'static>(&mut self) -> Component<T> {
        let id = ComponentId(self.storages.len());
        self.storages.push(Box::new(HashMapStorage::<T>::new()));
        log::debug!(
            "world {}: registered component #{} ({})",
            self.id,
            id.0,
            std::any::type_name::<T>()
        );
        Component::new(id, self.id)
    }

    /// Attach `value` to `entity`, replacing any previous value
    pub fn add_comp<T: 'static>(&mut self, entity: Entity, component: Component<T>, value: T) {
        self.storage_mut(component).insert(entity, value);
    }

    /// Value of `component` on `entity`, if present
    pub fn get_comp<T: 'static>(&self, entity: Entity, component: Component<T>) -> Option<&T> {
        self.storage(component).get(entity)
    }

    /// Mutable value of `component` on `entity`, if present
    pub fn get_comp_mut<T: 'static>(
        &mut self,
        entity: Entity,
        component: Component<T>,
    ) -> Option<&mut T> {
        self.storage_mut(component).get_mut(entity)
    }

    /// Detach `component` from `entity`, returning the old value
    pub fn remove_comp<T: 'static>(&mut self, entity: Entity, component: Component<T>) -> Option<T> {
        self.storage_mut(component).remove(entity)
    }

    /// Check whether `entity` carries `component`
    pub fn has_comp<T: 'static>(&self, entity: Entity, component: Component<T>) -> bool {
        self.storage(component).contains(entity)
    }

    /// Entities carrying `component`, ordered by id
    pub fn entities_with<T: 'static>(&self, component: Component<T>) -> Vec<Entity> {
        query::matching_entities(self, &[component.id()])
    }

    /// Number of entities carrying `component`
    pub fn component_len<T: 'static>(&self, component: Component<T>) -> usize {
        self.storage(component).len()
    }

    /// Snapshot of every entity matching `set` together with cloned values
    pub fn query<S: ComponentSet>(&self, set: S) -> Vec<(Entity, S::Item)> {
        query::matching_entities(self, &set.ids())
            .into_iter()
            .filter_map(|e| set.fetch(self, e).map(|item| (e, item)))
            .collect()
    }

    /// Typed storage behind `component`
    pub fn storage<T: 'static>(&self, component: Component<T>) -> &HashMapStorage<T> {
        self.check_owner(component.world_id());
        self.storages[component.id().0]
            .as_any()
            .downcast_ref::<HashMapStorage<T>>()
            .unwrap_or_else(|| panic!("component #{} has mismatched type", component.id().0))
    }

    /// Mutable typed storage behind `component`
    pub fn storage_mut<T: 'static>(&mut self, component: Component<T>) -> &mut HashMapStorage<T> {
        self.check_owner(component.world_id());
        self.storages[component.id().0]
            .as_any_mut()
            .downcast_mut::<HashMapStorage<T>>()
            .unwrap_or_else(|| panic!("component #{} has mismatched type", component.id().0))
    }

    /// Frames advanced so far by physics updates
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub(crate) fn advance_frame(&mut self) -> u64 {
        self.frame += 1;
        self.frame
    }

    pub(crate) fn erased(&self, id: ComponentId) -> &dyn AnyStorage {
        self.storages[id.0].as_ref()
    }

    fn check_owner(&self, world: u64) {
        assert!(
            world == self.id,
            "component handle belongs to world {} but was used with world {}",
            world,
            self.id
        );
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_get_remove() {
        let mut world = World::new();
        let health = world.component::<i32>();
        let e = world.spawn(Vec2::ZERO);

        world.add_comp(e, health, 10);
        assert_eq!(world.get_comp(e, health), Some(&10));

        world.remove_comp(e, health);
        assert_eq!(world.get_comp(e, health), None);
        assert!(!world.has_comp(e, health));
    }

    #[test]
    fn test_components_are_independent() {
        let mut world = World::new();
        let a = world.component::<Vec2>();
        let b = world.component::<Vec2>();
        let e1 = world.spawn(Vec2::ZERO);
        let e2 = world.spawn(Vec2::ZERO);

        world.add_comp(e1, a, Vec2::new(1.0, 0.0));
        world.add_comp(e1, b, Vec2::new(0.0, 1.0));
        world.add_comp(e2, a, Vec2::new(5.0, 5.0));

        assert_eq!(world.get_comp(e1, a), Some(&Vec2::new(1.0, 0.0)));
        assert_eq!(world.get_comp(e1, b), Some(&Vec2::new(0.0, 1.0)));
        assert_eq!(world.get_comp(e2, a), Some(&Vec2::new(5.0, 5.0)));
        assert_eq!(world.get_comp(e2, b), None);
    }

    #[test]
    fn test_positions() {
        let mut world = World::new();
        let e = world.spawn(Vec2::new(1.0, 2.0));
        world.translate(e, Vec2::new(1.0, 1.0));
        assert_eq!(world.pos(e), Vec2::new(2.0, 3.0));
        world.set_pos(e, Vec2::ZERO);
        assert_eq!(world.pos(e), Vec2::ZERO);
        assert_eq!(world.entity_count(), 1);
    }

    #[test]
    #[should_panic(expected = "component handle belongs to world")]
    fn test_foreign_handle_panics() {
        let mut w1 = World::new();
        let mut w2 = World::new();
        let c = w1.component::<u32>();
        let e = w2.spawn(Vec2::ZERO);
        w2.add_comp(e, c, 1);
    }
}
