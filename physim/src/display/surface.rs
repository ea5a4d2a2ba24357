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
//! Immediate-mode drawing surface
//!
//! The kernel never rasterizes anything itself. Display code talks to a
//! [`Surface`], which the host provides (a canvas context, a frame
//! encoder, a test recorder). Coordinates passed to the primitives are in
//! whatever space the current transform stack establishes.

use crate::display::color::Color;
use crate::vec::Vec2;
use serde::{Deserialize, Serialize};

/// Horizontal text anchoring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    /// Anchor at the left edge
    Left,
    /// Anchor at the center
    Center,
    /// Anchor at the right edge
    Right,
}

/// Vertical text anchoring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextBaseline {
    /// Anchor at the top
    Top,
    /// Anchor at the middle
    Middle,
    /// Anchor at the alphabetic baseline
    Alphabetic,
    /// Anchor at the bottom
    Bottom,
}

/// Font and placement for [`Surface::text`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    /// CSS font shorthand, e.g. `"16px Arial"`
    pub font: String,
    /// Fill color
    pub color: Color,
    /// Horizontal anchoring
    pub align: TextAlign,
    /// Vertical anchoring
    pub baseline: TextBaseline,
}

impl Default for TextStyle {
    fn default() -> Self {
        TextStyle {
            font: "16px Arial".to_string(),
            color: Color::WHITE,
            align: TextAlign::Center,
            baseline: TextBaseline::Middle,
        }
    }
}

/// A 2D drawing target with a save/restore transform stack
pub trait Surface {
    /// Canvas size in pixels
    fn size(&self) -> (f64, f64);

    /// Change the canvas size
    fn resize_canvas(&mut self, width: f64, height: f64);

    /// Push the current transform
    fn save(&mut self);

    /// Pop back to the last saved transform
    fn restore(&mut self);

    /// Translate the current transform
    fn translate(&mut self, x: f64, y: f64);

    /// Scale the current transform
    fn scale(&mut self, x: f64, y: f64);

    /// Rotate the current transform by `angle` radians
    fn rotate(&mut self, angle: f64);

    /// Fill the whole canvas, ignoring the current transform
    fn clear(&mut self, color: Color);

    /// Filled circle
    fn circle(&mut self, center: Vec2, radius: f64, color: Color);

    /// Closed polygon, filled or stroked
    fn polygon(&mut self, vertices: &[Vec2], color: Color, fill: bool, line_width: f64);

    /// Stroked line segment
    fn line(&mut self, start: Vec2, end: Vec2, color: Color, line_width: f64);

    /// Text at `pos`
    fn text(&mut self, pos: Vec2, text: &str, style: &TextStyle);

    /// Filled axis-aligned rectangle centered on `center`
    fn rect(&mut self, center: Vec2, width: f64, height: f64, color: Color) {
        let hw = width / 2.0;
        let hh = height / 2.0;
        let corners = [
            Vec2::new(center.x - hw, center.y - hh),
            Vec2::new(center.x + hw, center.y - hh),
            Vec2::new(center.x + hw, center.y + hh),
            Vec2::new(center.x - hw, center.y + hh),
        ];
        self.polygon(&corners, color, true, 1.0);
    }

    /// Arrow-less line from `pos` along `vec * scale`
    fn vector(&mut self, pos: Vec2, vec: Vec2, color: Color, scale: f64, line_width: f64) {
        self.line(pos, pos + vec.scale(scale), color, line_width);
    }

    /// A dot at each point
    fn points(&mut self, points: &[Vec2], radius: f64, color: Color) {
        for p in points {
            self.circle(*p, radius, color);
        }
    }
}

/// A drawing call captured by [`RecordingSurface`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    /// `resize_canvas`
    Resize {
        /// New width
        width: f64,
        /// New height
        height: f64,
    },
    /// `save`
    Save,
    /// `restore`
    Restore,
    /// `translate`
    Translate {
        /// X offset
        x: f64,
        /// Y offset
        y: f64,
    },
    /// `scale`
    Scale {
        /// X factor
        x: f64,
        /// Y factor
        y: f64,
    },
    /// `rotate`
    Rotate {
        /// Angle in radians
        angle: f64,
    },
    /// `clear`
    Clear {
        /// Fill color
        color: Color,
    },
    /// `circle`
    Circle {
        /// Center
        center: Vec2,
        /// Radius
        radius: f64,
        /// Fill color
        color: Color,
    },
    /// `polygon`
    Polygon {
        /// Closed vertex loop
        vertices: Vec<Vec2>,
        /// Fill or stroke color
        color: Color,
        /// Filled when true, stroked otherwise
        fill: bool,
        /// Stroke width
        line_width: f64,
    },
    /// `line`
    Line {
        /// Start point
        start: Vec2,
        /// End point
        end: Vec2,
        /// Stroke color
        color: Color,
        /// Stroke width
        line_width: f64,
    },
    /// `text`
    Text {
        /// Anchor position
        pos: Vec2,
        /// Text content
        text: String,
        /// Style
        style: TextStyle,
    },
}

/// In-memory [`Surface`] that records every call
///
/// Tracks the save/restore depth so tests can assert that transform
/// scopes are balanced.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    width: f64,
    height: f64,
    depth: usize,
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    /// Create a recorder with the given canvas size
    pub fn new(width: f64, height: f64) -> Self {
        RecordingSurface {
            width,
            height,
            depth: 0,
            commands: Vec::new(),
        }
    }

    /// Recorded commands, oldest first
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Drain the recorded commands
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Current save depth; zero when every `save` has been restored
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Number of polygon and circle commands recorded
    pub fn shape_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Polygon { .. } | DrawCommand::Circle { .. }))
            .count()
    }
}

impl Default for RecordingSurface {
    fn default() -> Self {
        RecordingSurface::new(800.0, 600.0)
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn resize_canvas(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
        self.commands.push(DrawCommand::Resize { width, height });
    }

    fn save(&mut self) {
        self.depth += 1;
        self.commands.push(DrawCommand::Save);
    }

    fn restore(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        self.commands.push(DrawCommand::Restore);
    }

    fn translate(&mut self, x: f64, y: f64) {
        self.commands.push(DrawCommand::Translate { x, y });
    }

    fn scale(&mut self, x: f64, y: f64) {
        self.commands.push(DrawCommand::Scale { x, y });
    }

    fn rotate(&mut self, angle: f64) {
        self.commands.push(DrawCommand::Rotate { angle });
    }

    fn clear(&mut self, color: Color) {
        self.commands.push(DrawCommand::Clear { color });
    }

    fn circle(&mut self, center: Vec2, radius: f64, color: Color) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            color,
        });
    }

    fn polygon(&mut self, vertices: &[Vec2], color: Color, fill: bool, line_width: f64) {
        if vertices.len() < 2 {
            return;
        }
        self.commands.push(DrawCommand::Polygon {
            vertices: vertices.to_vec(),
            color,
            fill,
            line_width,
        });
    }

    fn line(&mut self, start: Vec2, end: Vec2, color: Color, line_width: f64) {
        self.commands.push(DrawCommand::Line {
            start,
            end,
            color,
            line_width,
        });
    }

    fn text(&mut self, pos: Vec2, text: &str, style: &TextStyle) {
        self.commands.push(DrawCommand::Text {
            pos,
            text: text.to_string(),
            style: style.clone(),
        });
    }
}
