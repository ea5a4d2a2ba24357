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
//! Multi-component queries and per-entity dispatch
//!
//! This is the one primitive shared by the force pipeline and the draw
//! pipeline: intersect the key sets of one or more components, then call
//! a function for each entity in the intersection with that entity's
//! values.
//!
//! A [`ComponentSet`] describes what to intersect and how to fetch the
//! per-entity item:
//!
//! - a single `Component<T>` yields the bare `T`
//! - a tuple `(Component<A>, Component<B>, ..)` yields `(A, B, ..)`
//! - an array `[Component<T>; N]` yields `[T; N]`
//!
//! Items are cloned out of storage before the callback runs so the
//! callback is free to mutate the world, including the very components it
//! was matched on.

use crate::ecs::component::ComponentId;
use crate::ecs::{Component, Entity, World};

/// A set of components that can be intersected and fetched together
pub trait ComponentSet: Copy + 'static {
    /// Per-entity value handed to callbacks
    type Item;

    /// Storage ids in registration order
    fn ids(&self) -> Vec<ComponentId>;

    /// Fetch the item for `entity`, or `None` if any component is missing
    fn fetch(&self, world: &World, entity: Entity) -> Option<Self::Item>;
}

impl<T: Clone + 'static> ComponentSet for Component<T> {
    type Item = T;

    fn ids(&self) -> Vec<ComponentId> {
        vec![self.id()]
    }

    fn fetch(&self, world: &World, entity: Entity) -> Option<T> {
        world.get_comp(entity, *self).cloned()
    }
}

macro_rules! impl_component_set_tuple {
    ($($name:ident : $idx:tt),+) => {
        impl<$($name: Clone + 'static),+> ComponentSet for ($(Component<$name>,)+) {
            type Item = ($($name,)+);

            fn ids(&self) -> Vec<ComponentId> {
                vec![$(self.$idx.id()),+]
            }

            fn fetch(&self, world: &World, entity: Entity) -> Option<Self::Item> {
                Some(($(world.get_comp(entity, self.$idx)?.clone(),)+))
            }
        }
    };
}

impl_component_set_tuple!(A: 0, B: 1);
impl_component_set_tuple!(A: 0, B: 1, C: 2);
impl_component_set_tuple!(A: 0, B: 1, C: 2, D: 3);

impl<T: Clone + 'static, const N: usize> ComponentSet for [Component<T>; N] {
    type Item = [T; N];

    fn ids(&self) -> Vec<ComponentId> {
        self.iter().map(|c| c.id()).collect()
    }

    fn fetch(&self, world: &World, entity: Entity) -> Option<[T; N]> {
        let values = self
            .iter()
            .map(|c| world.get_comp(entity, *c).cloned())
            .collect::<Option<Vec<T>>>()?;
        values.try_into().ok()
    }
}

/// Entities present in every listed storage, ordered by id
///
/// # Panics
///
/// Panics if `ids` is empty; an intersection over nothing is meaningless.
pub fn matching_entities(world: &World, ids: &[ComponentId]) -> Vec<Entity> {
    let (first, rest) = ids
        .split_first()
        .unwrap_or_else(|| panic!("a component query needs at least one component"));

    let mut entities: Vec<Entity> = world
        .erased(*first)
        .keys()
        .into_iter()
        .filter(|e| rest.iter().all(|id| world.erased(*id).has(*e)))
        .collect();
    entities.sort_unstable();
    entities
}

/// A component set paired with a type-erased per-entity callback
///
/// `F` is the erased callback shape, e.g. `dyn FnMut(&mut World, Entity)`
/// for forces. The closure stored here captures the typed set and fetches
/// its own item, so the dispatcher only needs the storage ids.
pub struct Dispatcher<F: ?Sized> {
    components: Vec<ComponentId>,
    callback: Box<F>,
}

impl<F: ?Sized> Dispatcher<F> {
    /// Pair `components` with `callback`
    pub fn new(components: Vec<ComponentId>, callback: Box<F>) -> Self {
        assert!(
            !components.is_empty(),
            "a component query needs at least one component"
        );
        Dispatcher {
            components,
            callback,
        }
    }

    /// Entities matched by this dispatcher right now
    pub fn targets(&self, world: &World) -> Vec<Entity> {
        matching_entities(world, &self.components)
    }

    /// The stored callback
    pub fn callback_mut(&mut self) -> &mut F {
        &mut self.callback
    }

    /// Storage ids this dispatcher intersects
    pub fn components(&self) -> &[ComponentId] {
        &self.components
    }
}
