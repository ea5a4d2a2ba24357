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
//! View transform with follow and shake
//!
//! Screen coordinates produced by [`Camera::world_to_screen`] are relative
//! to the canvas center: the camera's position maps to `(0, 0)`.

use crate::display::surface::Surface;
use crate::ecs::{Entity, World};
use crate::vec::Vec2;

/// What the camera is following
#[derive(Debug, Clone, PartialEq)]
pub enum CameraTarget {
    /// Track one entity's position
    Entity(Entity),
    /// Track the average position of several entities
    Group(Vec<Entity>),
}

/// A 2D camera
#[derive(Debug, Clone)]
pub struct Camera {
    /// World position at the center of the view
    pub position: Vec2,
    /// Zoom factor; values above 1 magnify
    pub zoom: f64,
    /// Rotation in radians
    pub rotation: f64,
    /// Entities being followed, looked up each update
    pub target: Option<CameraTarget>,
    shake_time: u32,
    shake_intensity: f64,
    shake_offset: Vec2,
}

impl Camera {
    /// Camera at the origin with zoom 1 and no rotation
    pub fn new() -> Self {
        Camera {
            position: Vec2::ZERO,
            zoom: 1.0,
            rotation: 0.0,
            target: None,
            shake_time: 0,
            shake_intensity: 0.0,
            shake_offset: Vec2::ZERO,
        }
    }

    /// Follow a single entity
    pub fn follow(&mut self, entity: Entity) {
        self.target = Some(CameraTarget::Entity(entity));
    }

    /// Follow the average position of `entities`
    pub fn follow_group(&mut self, entities: Vec<Entity>) {
        self.target = Some(CameraTarget::Group(entities));
    }

    /// Stop following
    pub fn unfollow(&mut self) {
        self.target = None;
    }

    /// Shake for `frames` updates with offsets of length `intensity`
    ///
    /// Replaces any shake already in progress.
    pub fn shake(&mut self, frames: u32, intensity: f64) {
        self.shake_time = frames;
        self.shake_intensity = intensity;
    }

    /// Frames of shake remaining
    pub fn shake_time(&self) -> u32 {
        self.shake_time
    }

    /// Offset applied by the current shake
    pub fn shake_offset(&self) -> Vec2 {
        self.shake_offset
    }

    /// Snap to the follow target and advance the shake countdown
    pub fn update(&mut self, world: &World) {
        match &self.target {
            Some(CameraTarget::Entity(e)) => self.position = world.pos(*e),
            Some(CameraTarget::Group(group)) => {
                self.position = Vec2::average(group.iter().map(|e| world.pos(*e)));
            }
            None => {}
        }

        if self.shake_time > 0 {
            self.shake_offset = Vec2::random(self.shake_intensity);
            self.shake_time -= 1;
        } else {
            self.shake_offset = Vec2::ZERO;
        }
    }

    fn eye(&self) -> Vec2 {
        self.position + self.shake_offset
    }

    /// Map a world position to screen space
    pub fn world_to_screen(&self, world_pos: Vec2) -> Vec2 {
        (world_pos - self.eye()).rotate(-self.rotation).scale(self.zoom)
    }

    /// Map a screen position back to world space; inverse of [`Camera::world_to_screen`]
    pub fn screen_to_world(&self, screen_pos: Vec2) -> Vec2 {
        screen_pos.scale(1.0 / self.zoom).rotate(self.rotation) + self.eye()
    }

    /// Push the view transform onto `surface`
    ///
    /// Must be paired with [`Camera::remove_transforms`].
    pub fn apply_transforms(&self, surface: &mut dyn Surface) {
        let (width, height) = surface.size();
        let eye = self.eye();
        surface.save();
        surface.translate(width / 2.0, height / 2.0);
        surface.scale(self.zoom, self.zoom);
        surface.rotate(self.rotation);
        surface.translate(-eye.x, -eye.y);
    }

    /// Pop the transform pushed by [`Camera::apply_transforms`]
    pub fn remove_transforms(&self, surface: &mut dyn Surface) {
        surface.restore();
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::surface::{DrawCommand, RecordingSurface};
    use approx::assert_relative_eq;

    #[test]
    fn test_round_trip() {
        let mut camera = Camera::new();
        for (pos, zoom, rot) in [
            (Vec2::new(0.0, 0.0), 1.0, 0.0),
            (Vec2::new(12.5, -3.0), 2.5, 0.7),
            (Vec2::new(-100.0, 40.0), 0.25, -2.9),
        ] {
            camera.position = pos;
            camera.zoom = zoom;
            camera.rotation = rot;
            for p in [Vec2::new(1.0, 2.0), Vec2::new(-50.0, 0.3), Vec2::ZERO] {
                let back = camera.screen_to_world(camera.world_to_screen(p));
                assert_relative_eq!(back.x, p.x, epsilon = 1e-9);
                assert_relative_eq!(back.y, p.y, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_position_maps_to_origin() {
        let mut camera = Camera::new();
        camera.position = Vec2::new(5.0, 5.0);
        camera.zoom = 3.0;
        assert_eq!(camera.world_to_screen(Vec2::new(5.0, 5.0)), Vec2::ZERO);
        assert_eq!(camera.world_to_screen(Vec2::new(6.0, 5.0)), Vec2::new(3.0, 0.0));
    }

    #[test]
    fn test_follow_single_and_group() {
        let mut world = World::new();
        let a = world.spawn(Vec2::new(2.0, 4.0));
        let b = world.spawn(Vec2::new(6.0, 0.0));
        let mut camera = Camera::new();

        camera.follow(a);
        camera.update(&world);
        assert_eq!(camera.position, Vec2::new(2.0, 4.0));

        camera.follow_group(vec![a, b]);
        camera.update(&world);
        assert_eq!(camera.position, Vec2::new(4.0, 2.0));
    }

    #[test]
    fn test_shake_counts_down() {
        let world = World::new();
        let mut camera = Camera::new();
        camera.shake(1, 3.0);
        camera.update(&world);
        assert_relative_eq!(camera.shake_offset().length(), 3.0, epsilon = 1e-9);
        assert_eq!(camera.shake_time(), 0);
        camera.update(&world);
        assert_eq!(camera.shake_offset(), Vec2::ZERO);
    }

    #[test]
    fn test_shake_replaces() {
        let mut camera = Camera::new();
        camera.shake(10, 1.0);
        camera.shake(2, 5.0);
        assert_eq!(camera.shake_time(), 2);
    }

    #[test]
    fn test_transform_scope() {
        let mut camera = Camera::new();
        camera.position = Vec2::new(10.0, 20.0);
        camera.zoom = 2.0;
        let mut surface = RecordingSurface::new(200.0, 100.0);
        camera.apply_transforms(&mut surface);
        assert_eq!(surface.depth(), 1);
        camera.remove_transforms(&mut surface);
        assert_eq!(surface.depth(), 0);
        assert_eq!(
            surface.commands(),
            &[
                DrawCommand::Save,
                DrawCommand::Translate { x: 100.0, y: 50.0 },
                DrawCommand::Scale { x: 2.0, y: 2.0 },
                DrawCommand::Rotate { angle: 0.0 },
                DrawCommand::Translate { x: -10.0, y: -20.0 },
                DrawCommand::Restore,
            ]
        );
    }
}
