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
//! Entity Component data model
//!
//! Entities are identifiers with a position. Components are sparse typed
//! maps from entity to value, minted by and stored in a [`World`]. The
//! [`query`] module provides the intersection/dispatch primitive used by
//! physics and display alike.

pub mod component;
pub mod entity;
pub mod query;
pub mod world;

pub use component::{Component, ComponentId, ComponentStorage, HashMapStorage};
pub use entity::Entity;
pub use query::{ComponentSet, Dispatcher};
pub use world::World;
