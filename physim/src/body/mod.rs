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
//! Physical shape data attached to entities
//!
//! A [`Body`] is an immutable list of [`BodyPart`]s (shape + local offset +
//! local rotation) and a mutable overall rotation. Vertex loops and the
//! bounding box are computed once at construction, in body-local space,
//! and shared between clones.
//!
//! Curved shapes are tessellated: circles into 32 vertices, rings into 128
//! segments per full turn. A ring with gaps yields one closed loop per
//! uninterrupted arc (outer edge forward, inner edge back).

pub mod shape;

pub use shape::{create_circle, create_rectangle, create_ring, Gap, Shape};

use crate::display::{Color, Surface};
use crate::vec::Vec2;
use std::f64::consts::TAU;
use std::sync::Arc;

const CIRCLE_SEGMENTS: usize = 32;
const RING_SEGMENTS: usize = 128;

/// One shape placed inside a body
#[derive(Debug, Clone, PartialEq)]
pub struct BodyPart {
    /// Geometry
    pub shape: Shape,
    /// Offset from the body origin
    pub position: Vec2,
    /// Rotation relative to the body
    pub rotation: f64,
}

impl BodyPart {
    /// Part at `position` with `rotation`
    pub fn new(shape: Shape, position: Vec2, rotation: f64) -> Self {
        BodyPart {
            shape,
            position,
            rotation,
        }
    }
}

impl From<Shape> for BodyPart {
    fn from(shape: Shape) -> Self {
        BodyPart::new(shape, Vec2::ZERO, 0.0)
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Aabb {
    /// Lower corner
    pub min: Vec2,
    /// Upper corner
    pub max: Vec2,
}

impl Aabb {
    fn around(points: impl Iterator<Item = Vec2>) -> Self {
        let mut bounds: Option<Aabb> = None;
        for p in points {
            let b = bounds.get_or_insert(Aabb { min: p, max: p });
            b.min = Vec2::new(b.min.x.min(p.x), b.min.y.min(p.y));
            b.max = Vec2::new(b.max.x.max(p.x), b.max.y.max(p.y));
        }
        bounds.unwrap_or_default()
    }

    /// Width and height
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }
}

/// Multi-part rigid shape with a mutable rotation
#[derive(Debug, Clone)]
pub struct Body {
    parts: Arc<[BodyPart]>,
    loops: Arc<[Vec<Vec2>]>,
    aabb: Aabb,
    /// Current rotation in radians, applied on top of every part's rotation
    pub rotation: f64,
}

impl Body {
    /// Build a body from parts
    pub fn new(parts: Vec<BodyPart>, rotation: f64) -> Self {
        let loops: Vec<Vec<Vec2>> = parts.iter().flat_map(part_loops).collect();
        let aabb = Aabb::around(loops.iter().flatten().copied());
        Body {
            parts: parts.into(),
            loops: loops.into(),
            aabb,
            rotation,
        }
    }

    /// Single-part body with the shape centered on the origin
    pub fn from_shape(shape: Shape, rotation: f64) -> Self {
        Self::new(vec![shape.into()], rotation)
    }

    /// Same parts, different rotation; geometry is shared, not recomputed
    pub fn with_rotation(&self, rotation: f64) -> Self {
        Body {
            rotation,
            ..self.clone()
        }
    }

    /// Parts in construction order
    pub fn parts(&self) -> &[BodyPart] {
        &self.parts
    }

    /// Closed vertex loops in body-local space (rotation not applied)
    pub fn loops(&self) -> &[Vec<Vec2>] {
        &self.loops
    }

    /// Every vertex of every loop
    pub fn vertices(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.loops.iter().flatten().copied()
    }

    /// Local bounding box over all vertices
    pub fn aabb(&self) -> Aabb {
        self.aabb
    }

    /// Paint the body at `pos`
    ///
    /// Each loop is scaled by `scale`, rotated by [`Body::rotation`] and
    /// drawn as one polygon.
    pub fn draw(
        &self,
        surface: &mut dyn Surface,
        pos: Vec2,
        color: Color,
        fill: bool,
        line_width: f64,
        scale: f64,
    ) {
        for lp in self.loops.iter() {
            let placed: Vec<Vec2> = lp
                .iter()
                .map(|v| v.scale(scale).rotate(self.rotation) + pos)
                .collect();
            surface.polygon(&placed, color, fill, line_width);
        }
    }
}

impl PartialEq for Body {
    fn eq(&self, other: &Self) -> bool {
        self.parts == other.parts && self.rotation == other.rotation
    }
}

fn part_loops(part: &BodyPart) -> Vec<Vec<Vec2>> {
    let local: Vec<Vec<Vec2>> = match &part.shape {
        Shape::Circle { radius } => vec![(0..CIRCLE_SEGMENTS)
            .map(|i| Vec2::from_angle(TAU * i as f64 / CIRCLE_SEGMENTS as f64).scale(*radius))
            .collect()],
        Shape::Polygon { vertices } => vec![vertices.clone()],
        Shape::Ring {
            inner_radius,
            outer_radius,
            gaps,
        } => ring_loops(*inner_radius, *outer_radius, gaps),
    };

    local
        .into_iter()
        .map(|lp| {
            lp.into_iter()
                .map(|v| v.rotate(part.rotation) + part.position)
                .collect()
        })
        .collect()
}

fn ring_loops(inner: f64, outer: f64, gaps: &[Gap]) -> Vec<Vec<Vec2>> {
    let arcs = shape::solid_arcs(gaps);
    if arcs.len() == 1 && arcs[0] == (0.0, TAU) {
        let outer_edge = (0..RING_SEGMENTS)
            .map(|i| Vec2::from_angle(TAU * i as f64 / RING_SEGMENTS as f64).scale(outer));
        let inner_edge = (0..RING_SEGMENTS)
            .rev()
            .map(|i| Vec2::from_angle(TAU * i as f64 / RING_SEGMENTS as f64).scale(inner));
        return vec![outer_edge.chain(inner_edge).collect()];
    }

    arcs.into_iter()
        .map(|(start, end)| {
            let span = end - start;
            let steps = ((RING_SEGMENTS as f64 * span / TAU).ceil() as usize).max(1);
            let angle = |i: usize| start + span * i as f64 / steps as f64;
            let outer_edge = (0..=steps).map(|i| Vec2::from_angle(angle(i)).scale(outer));
            let inner_edge = (0..=steps).rev().map(|i| Vec2::from_angle(angle(i)).scale(inner));
            outer_edge.chain(inner_edge).collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::{DrawCommand, RecordingSurface};
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_rectangle_aabb() {
        let body = Body::from_shape(create_rectangle(4.0, 2.0), 0.0);
        assert_eq!(body.aabb().min, Vec2::new(-2.0, -1.0));
        assert_eq!(body.aabb().max, Vec2::new(2.0, 1.0));
        assert_eq!(body.loops().len(), 1);
    }

    #[test]
    fn test_circle_tessellation() {
        let body = Body::from_shape(create_circle(3.0), 0.0);
        assert_eq!(body.vertices().count(), CIRCLE_SEGMENTS);
        for v in body.vertices() {
            assert_relative_eq!(v.length(), 3.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_part_offsets_and_rotation() {
        let part = BodyPart::new(create_rectangle(2.0, 2.0), Vec2::new(10.0, 0.0), FRAC_PI_2);
        let body = Body::new(vec![part], 0.0);
        let aabb = body.aabb();
        assert_relative_eq!(aabb.min.x, 9.0, epsilon = 1e-12);
        assert_relative_eq!(aabb.max.x, 11.0, epsilon = 1e-12);
    }

    #[test]
    fn test_ring_loops() {
        let full = Body::from_shape(create_ring(1.0, 2.0, vec![]), 0.0);
        assert_eq!(full.loops().len(), 1);
        assert_eq!(full.loops()[0].len(), 2 * RING_SEGMENTS);

        let gapped = Body::from_shape(
            create_ring(1.0, 2.0, vec![Gap::new(0.0, 0.5), Gap::new(PI, 0.5)]),
            0.0,
        );
        assert_eq!(gapped.loops().len(), 2);
        for lp in gapped.loops() {
            // outer edge first, inner edge last
            assert_relative_eq!(lp[0].length(), 2.0, epsilon = 1e-12);
            assert_relative_eq!(lp[lp.len() - 1].length(), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_with_rotation_shares_geometry() {
        let body = Body::from_shape(create_circle(1.0), 0.0);
        let turned = body.with_rotation(1.0);
        assert!(Arc::ptr_eq(&body.loops, &turned.loops));
        assert_eq!(turned.rotation, 1.0);
        assert_eq!(body.rotation, 0.0);
    }

    #[test]
    fn test_draw_applies_scale_rotation_and_position() {
        let body = Body::from_shape(create_rectangle(2.0, 2.0), FRAC_PI_2);
        let mut surface = RecordingSurface::default();
        body.draw(&mut surface, Vec2::new(5.0, 5.0), Color::RED, true, 1.0, 2.0);

        match &surface.commands()[0] {
            DrawCommand::Polygon { vertices, fill, .. } => {
                assert!(*fill);
                // (-1,-1) scaled to (-2,-2), rotated a quarter turn to (2,-2)
                assert_relative_eq!(vertices[0].x, 7.0, epsilon = 1e-12);
                assert_relative_eq!(vertices[0].y, 3.0, epsilon = 1e-12);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
