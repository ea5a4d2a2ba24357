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
//! Primitive shapes in part-local space

use crate::error::{Error, Result};
use crate::vec::Vec2;
use std::f64::consts::{PI, TAU};

/// An angular opening in a ring, in radians
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gap {
    /// Angle where the gap begins
    pub start_angle: f64,
    /// Angular width of the gap
    pub size: f64,
}

impl Gap {
    /// Create a gap
    pub fn new(start_angle: f64, size: f64) -> Self {
        Gap { start_angle, size }
    }

    /// True when `angle` falls inside `[start_angle, start_angle + size]`
    pub fn contains(&self, angle: f64) -> bool {
        angle >= self.start_angle && angle <= self.start_angle + self.size
    }
}

/// A geometric shape centered on its local origin
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Disc
    Circle {
        /// Radius
        radius: f64,
    },
    /// Simple polygon, vertices in order
    Polygon {
        /// Vertices in local space
        vertices: Vec<Vec2>,
    },
    /// Annulus with optional angular gaps
    Ring {
        /// Inner radius
        inner_radius: f64,
        /// Outer radius
        outer_radius: f64,
        /// Openings in the ring
        gaps: Vec<Gap>,
    },
}

impl Shape {
    /// Planar area; ring gaps are subtracted as annular sectors
    pub fn area(&self) -> f64 {
        match self {
            Shape::Circle { radius } => PI * radius * radius,
            Shape::Polygon { vertices } => {
                let n = vertices.len();
                let twice: f64 = (0..n)
                    .map(|i| {
                        let a = vertices[i];
                        let b = vertices[(i + 1) % n];
                        a.x * b.y - b.x * a.y
                    })
                    .sum();
                twice.abs() / 2.0
            }
            Shape::Ring {
                inner_radius,
                outer_radius,
                gaps,
            } => {
                let band = outer_radius * outer_radius - inner_radius * inner_radius;
                let gap_area: f64 = gaps.iter().map(|g| 0.5 * band * g.size).sum();
                PI * band - gap_area
            }
        }
    }

    /// Check that the shape can be turned into geometry
    pub fn validate(&self) -> Result<()> {
        match self {
            Shape::Circle { radius } if !(radius.is_finite() && *radius > 0.0) => Err(
                Error::InvalidShape(format!("circle radius must be positive, got {radius}")),
            ),
            Shape::Polygon { vertices } if vertices.len() < 3 => Err(Error::InvalidShape(
                format!("polygon needs at least 3 vertices, got {}", vertices.len()),
            )),
            Shape::Ring {
                inner_radius,
                outer_radius,
                ..
            } if *inner_radius < 0.0 || outer_radius <= inner_radius => {
                Err(Error::InvalidShape(format!(
                    "ring outer radius ({outer_radius}) must be greater than inner radius ({inner_radius})"
                )))
            }
            _ => Ok(()),
        }
    }
}

/// Circle of the given radius
pub fn create_circle(radius: f64) -> Shape {
    Shape::Circle { radius }
}

/// Axis-aligned rectangle centered on the origin
pub fn create_rectangle(width: f64, height: f64) -> Shape {
    let hw = width / 2.0;
    let hh = height / 2.0;
    Shape::Polygon {
        vertices: vec![
            Vec2::new(-hw, -hh),
            Vec2::new(hw, -hh),
            Vec2::new(hw, hh),
            Vec2::new(-hw, hh),
        ],
    }
}

/// Ring between `inner_radius` and `outer_radius` with optional gaps
pub fn create_ring(inner_radius: f64, outer_radius: f64, gaps: Vec<Gap>) -> Shape {
    Shape::Ring {
        inner_radius,
        outer_radius,
        gaps,
    }
}

/// Angular spans of a full turn not covered by any gap
///
/// Returned as `(start, end)` pairs with `0 <= start < end`; a span that
/// wraps through angle zero has `end > TAU`.
pub(crate) fn solid_arcs(gaps: &[Gap]) -> Vec<(f64, f64)> {
    let mut covered: Vec<(f64, f64)> = Vec::new();
    for gap in gaps.iter().filter(|g| g.size > 0.0) {
        if gap.size >= TAU {
            return Vec::new();
        }
        let start = gap.start_angle.rem_euclid(TAU);
        let end = start + gap.size;
        if end > TAU {
            covered.push((start, TAU));
            covered.push((0.0, end - TAU));
        } else {
            covered.push((start, end));
        }
    }
    if covered.is_empty() {
        return vec![(0.0, TAU)];
    }

    covered.sort_by(|a, b| a.0.total_cmp(&b.0));
    let mut merged: Vec<(f64, f64)> = Vec::new();
    for (s, e) in covered {
        match merged.last_mut() {
            Some(last) if s <= last.1 => last.1 = last.1.max(e),
            _ => merged.push((s, e)),
        }
    }

    let mut arcs = Vec::new();
    let mut cursor = 0.0;
    for (s, e) in &merged {
        if *s > cursor {
            arcs.push((cursor, *s));
        }
        cursor = *e;
    }
    if cursor < TAU {
        arcs.push((cursor, TAU));
    }

    // join the arcs touching 0 and TAU into one span
    if arcs.len() > 1 {
        let first = arcs[0];
        let last = arcs[arcs.len() - 1];
        if first.0 == 0.0 && last.1 == TAU {
            arcs.pop();
            arcs[0] = (last.0, TAU + first.1);
        }
    }
    arcs
}
