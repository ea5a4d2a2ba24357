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
//! Ready-made draw components
//!
//! Each `init_*` function mints a component, registers a draw function for
//! it on a [`Display`], and returns the handle. Attaching a value of that
//! component to an entity is then enough to make it visible.

use crate::body::Body;
use crate::display::{Color, Display};
use crate::ecs::{Component, World};

/// Draw data for an entity rendered as a dot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointDisplay {
    /// Fill color
    pub color: Color,
    /// Radius in world units
    pub radius: f64,
}

impl PointDisplay {
    /// Dot of `radius` in `color`
    pub fn new(color: Color, radius: f64) -> Self {
        PointDisplay { color, radius }
    }
}

/// Draw data for an entity rendered through its [`Body`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyDisplay {
    /// Fill or stroke color
    pub color: Color,
    /// Filled when true, outlined otherwise
    pub fill: bool,
    /// Stroke width for outlines
    pub line_width: f64,
}

impl BodyDisplay {
    /// Filled body in `color`
    pub fn new(color: Color) -> Self {
        BodyDisplay {
            color,
            fill: true,
            line_width: 1.0,
        }
    }

    /// Outlined body in `color`
    pub fn outline(color: Color, line_width: f64) -> Self {
        BodyDisplay {
            color,
            fill: false,
            line_width,
        }
    }
}

/// Draw every entity carrying the returned component as a circle at its position
pub fn init_point_display_component(
    world: &mut World,
    display: &mut Display,
) -> Component<PointDisplay> {
    let point_display = world.component::<PointDisplay>();
    display.register_draw(point_display, |world, surface, entity, data| {
        surface.circle(world.pos(entity), data.radius, data.color);
    });
    point_display
}

/// Draw every entity carrying both the returned component and `body`
pub fn init_body_display_component(
    world: &mut World,
    display: &mut Display,
    body: Component<Body>,
) -> Component<BodyDisplay> {
    let body_display = world.component::<BodyDisplay>();
    display.register_draw_multi(
        (body_display, body),
        |world, surface, entity, (data, body)| {
            body.draw(surface, world.pos(entity), data.color, data.fill, data.line_width, 1.0);
        },
    );
    body_display
}
