//! Brush footprint queries on the terrain grid.
//!
//! The footprint is found by sampling the bounding square of the brush
//! circle at grid-step intervals and mapping each sample inside the circle
//! to the vertex whose cell contains it. Cost depends on `radius / step`,
//! not on the vertex count.

use std::collections::HashSet;
use std::ops::RangeInclusive;

use glam::Vec3;
use tracing::trace;

use crate::grid::GridLayout;
use crate::types::{AffectedVertex, VertexId};

/// Absorbs rounding in `2r / step` so a radius that is an exact multiple
/// of the step still reaches the far edge of the square.
const SAMPLE_EPSILON: f32 = 1e-4;

/// Collect the vertices inside a circular brush footprint.
///
/// Samples run from `-radius` to `+radius` on both axes in steps of the grid
/// spacing. Each sample strictly inside the circle that maps to a valid
/// vertex is emitted with `weight = dist / radius`, so weights lie in
/// `[0, 1)`. Output is in scan order (X outer, Z inner).
///
/// Repeated ids are not removed: when samples alias onto the same vertex,
/// that vertex appears once per sample.
///
/// Only samples within one grid size of the grid edges are scanned, so a
/// brush far larger than the terrain costs the same as one covering it.
pub fn query_affected(grid: &GridLayout, center: Vec3, radius: f32) -> Vec<AffectedVertex> {
    if !radius.is_finite() || radius <= 0.0 || !center.x.is_finite() || !center.z.is_finite() {
        return Vec::new();
    }

    let step = grid.step_size();
    let steps = ((2.0 * radius) / step + SAMPLE_EPSILON).floor();
    let (Some(x_range), Some(z_range)) = (
        scan_range(grid, center.x, radius, steps),
        scan_range(grid, center.z, radius, steps),
    ) else {
        trace!("query_affected: footprint does not reach the grid");
        return Vec::new();
    };

    let capacity = range_len(&x_range)
        .saturating_mul(range_len(&z_range))
        .min(grid.vertex_count());
    let mut affected = Vec::with_capacity(capacity);

    for i in x_range {
        let dx = -radius + i as f32 * step;
        for j in z_range.clone() {
            let dz = -radius + j as f32 * step;
            let dist = (dx * dx + dz * dz).sqrt();
            if dist >= radius {
                continue;
            }

            if let Some(id) = grid.vertex_id(center.x + dx, center.z + dz) {
                affected.push(AffectedVertex {
                    id,
                    weight: dist / radius,
                });
            }
        }
    }

    trace!(
        "query_affected: center=({:.3}, {:.3}) radius={:.3} -> {} samples",
        center.x,
        center.z,
        radius,
        affected.len()
    );
    affected
}

/// Sample indices along one axis, clipped to one grid size (plus a step)
/// beyond either edge of the grid. `None` if nothing is left.
fn scan_range(
    grid: &GridLayout,
    center: f32,
    radius: f32,
    steps: f32,
) -> Option<RangeInclusive<usize>> {
    let step = f64::from(grid.step_size());
    let reach = f64::from(grid.size()) * 1.5 + step;
    let start = f64::from(center) - f64::from(radius);

    let first = ((-reach - start) / step).ceil().max(0.0);
    let last = ((reach - start) / step).floor().min(f64::from(steps));
    if first > last {
        return None;
    }
    Some(first as usize..=last as usize)
}

fn range_len(range: &RangeInclusive<usize>) -> usize {
    range.end().saturating_sub(*range.start()).saturating_add(1)
}

/// Number of distinct vertices in a footprint
pub fn unique_vertex_count(affected: &[AffectedVertex]) -> usize {
    affected
        .iter()
        .map(|info| info.id)
        .collect::<HashSet<VertexId>>()
        .len()
}
