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
//! Approximate moments of inertia for multi-part bodies

use crate::body::{Body, Shape};

/// Moment of inertia of `body` about its origin for a total mass `mass`
///
/// Mass is split between parts in proportion to their area. Each part
/// contributes its own central moment plus the parallel-axis term for its
/// offset:
///
/// | shape | central moment |
/// |---|---|
/// | circle | `m r² / 2` |
/// | polygon | `m (w² + h²) / 12` over its bounding box |
/// | ring | `m (R² + r²) / 2` |
///
/// Returns zero when the body has no area.
pub fn approximate_inertia(body: &Body, mass: f64) -> f64 {
    let areas: Vec<f64> = body.parts().iter().map(|p| p.shape.area()).collect();
    let total_area: f64 = areas.iter().sum();
    if total_area == 0.0 {
        return 0.0;
    }

    body.parts()
        .iter()
        .zip(&areas)
        .map(|(part, area)| {
            let m = mass * (area / total_area);
            let central = match &part.shape {
                Shape::Circle { radius } => 0.5 * m * radius * radius,
                Shape::Polygon { vertices } => {
                    let (mut min_x, mut max_x) = (f64::INFINITY, f64::NEG_INFINITY);
                    let (mut min_y, mut max_y) = (f64::INFINITY, f64::NEG_INFINITY);
                    for v in vertices {
                        min_x = min_x.min(v.x);
                        max_x = max_x.max(v.x);
                        min_y = min_y.min(v.y);
                        max_y = max_y.max(v.y);
                    }
                    let w = max_x - min_x;
                    let h = max_y - min_y;
                    m * (w * w + h * h) / 12.0
                }
                Shape::Ring {
                    inner_radius,
                    outer_radius,
                    ..
                } => m * (outer_radius * outer_radius + inner_radius * inner_radius) / 2.0,
            };
            central + m * part.position.length_squared()
        })
        .sum()
}
