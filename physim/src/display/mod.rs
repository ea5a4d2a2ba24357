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
//! Draw pipeline
//!
//! [`Display`] holds draw registrations: a component set plus a function
//! that paints one matching entity. [`Display::draw`] runs one frame:
//!
//! 1. update the camera (follow target, shake)
//! 2. clear the canvas to the background color
//! 3. push the camera transform
//! 4. dispatch every registration, in registration order
//! 5. pop the camera transform
//!
//! # Example
//!
//! ```rust
//! use physim::display::{Color, Display, RecordingSurface, Surface};
//! use physim::{Vec2, World};
//!
//! let mut world = World::new();
//! let radius = world.component::<f64>();
//! let e = world.spawn(Vec2::new(3.0, 4.0));
//! world.add_comp(e, radius, 2.0);
//!
//! let mut display = Display::new();
//! display.register_draw(radius, |world, surface, entity, r| {
//!     surface.circle(world.pos(entity), r, Color::WHITE);
//! });
//!
//! let mut surface = RecordingSurface::new(640.0, 480.0);
//! display.draw(&world, None, &mut surface);
//! assert_eq!(surface.shape_count(), 1);
//! ```

pub mod camera;
pub mod color;
pub mod surface;

pub use camera::{Camera, CameraTarget};
pub use color::Color;
pub use surface::{DrawCommand, RecordingSurface, Surface, TextAlign, TextBaseline, TextStyle};

use crate::ecs::{Component, ComponentSet, Dispatcher, Entity, World};

type DrawFn = dyn FnMut(&World, &mut dyn Surface, Entity);

/// Registration-ordered draw pipeline
pub struct Display {
    background: Color,
    registrations: Vec<Dispatcher<DrawFn>>,
}

impl Display {
    /// Display with a black background
    pub fn new() -> Self {
        Self::with_background(Color::BLACK)
    }

    /// Display clearing to `background` each frame
    pub fn with_background(background: Color) -> Self {
        Display {
            background,
            registrations: Vec::new(),
        }
    }

    /// Background color used by [`Display::draw`]
    pub fn background(&self) -> Color {
        self.background
    }

    /// Change the background color
    pub fn set_background(&mut self, color: Color) {
        self.background = color;
    }

    /// Register a draw function over a single component
    pub fn register_draw<T, F>(&mut self, component: Component<T>, draw: F)
    where
        T: Clone + 'static,
        F: FnMut(&World, &mut dyn Surface, Entity, T) + 'static,
    {
        self.register_draw_multi(component, draw);
    }

    /// Register a draw function over a set of components
    pub fn register_draw_multi<S, F>(&mut self, components: S, mut draw: F)
    where
        S: ComponentSet,
        F: FnMut(&World, &mut dyn Surface, Entity, S::Item) + 'static,
    {
        let callback = move |world: &World, surface: &mut dyn Surface, entity: Entity| {
            if let Some(item) = components.fetch(world, entity) {
                draw(world, surface, entity, item);
            }
        };
        self.registrations
            .push(Dispatcher::new(components.ids(), Box::new(callback)));
        log::debug!("registered draw function #{}", self.registrations.len() - 1);
    }

    /// Number of draw registrations
    pub fn registration_count(&self) -> usize {
        self.registrations.len()
    }

    /// Render one frame
    ///
    /// Without a camera a default one (origin, zoom 1) is used.
    pub fn draw(&mut self, world: &World, camera: Option<&mut Camera>, surface: &mut dyn Surface) {
        let mut fallback = Camera::new();
        let camera = camera.unwrap_or(&mut fallback);
        camera.update(world);

        surface.clear(self.background);
        camera.apply_transforms(surface);
        for registration in &mut self.registrations {
            for entity in registration.targets(world) {
                (registration.callback_mut())(world, surface, entity);
            }
        }
        camera.remove_transforms(surface);
    }
}

impl Default for Display {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vec::Vec2;

    #[test]
    fn test_draw_order_and_scope() {
        let mut world = World::new();
        let first = world.component::<u8>();
        let second = world.component::<u8>();
        let e = world.spawn(Vec2::new(1.0, 1.0));
        world.add_comp(e, first, 1);
        world.add_comp(e, second, 2);

        let mut display = Display::with_background(Color::WHITE);
        display.register_draw(second, |world, surface, entity, _| {
            surface.circle(world.pos(entity), 2.0, Color::RED);
        });
        display.register_draw(first, |world, surface, entity, _| {
            surface.circle(world.pos(entity), 1.0, Color::RED);
        });

        let mut surface = RecordingSurface::new(10.0, 10.0);
        display.draw(&world, None, &mut surface);

        let cmds = surface.commands();
        assert_eq!(cmds[0], DrawCommand::Clear { color: Color::WHITE });
        assert_eq!(cmds[1], DrawCommand::Save);
        let radii: Vec<f64> = cmds
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Circle { radius, .. } => Some(*radius),
                _ => None,
            })
            .collect();
        assert_eq!(radii, vec![2.0, 1.0]);
        assert_eq!(cmds.last(), Some(&DrawCommand::Restore));
        assert_eq!(surface.depth(), 0);
    }

    #[test]
    fn test_multi_component_draw() {
        let mut world = World::new();
        let radius = world.component::<f64>();
        let tint = world.component::<Color>();
        let both = world.spawn(Vec2::ZERO);
        let only_radius = world.spawn(Vec2::ZERO);
        world.add_comp(both, radius, 3.0);
        world.add_comp(both, tint, Color::RED);
        world.add_comp(only_radius, radius, 4.0);

        let mut display = Display::new();
        display.register_draw_multi((radius, tint), |world, surface, entity, (r, c)| {
            surface.circle(world.pos(entity), r, c);
        });

        let mut surface = RecordingSurface::default();
        display.draw(&world, None, &mut surface);
        assert_eq!(surface.shape_count(), 1);
    }

    #[test]
    fn test_camera_followed_during_draw() {
        let mut world = World::new();
        let e = world.spawn(Vec2::new(7.0, -2.0));
        let mut camera = Camera::new();
        camera.follow(e);

        let mut display = Display::new();
        let mut surface = RecordingSurface::default();
        display.draw(&world, Some(&mut camera), &mut surface);
        assert_eq!(camera.position, Vec2::new(7.0, -2.0));
        assert!(surface
            .commands()
            .contains(&DrawCommand::Translate { x: -7.0, y: 2.0 }));
    }
}
