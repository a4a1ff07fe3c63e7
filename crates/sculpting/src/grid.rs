//! Regular square grid layout.
//!
//! The terrain is a `size × size` square centred at the origin on the XZ
//! plane, sampled by `resolution × resolution` vertices. Vertex `(row, col)`
//! sits at the centre of its cell and has id `row * resolution + col`.

use glam::Vec2;

use crate::error::{SculptError, SculptResult};
use crate::types::VertexId;

/// Maps world XZ coordinates to grid vertex ids.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    size: f32,
    half_size: f32,
    resolution: u32,
    step_size: f32,
}

impl GridLayout {
    /// Create a layout for a square of world extent `size` with `resolution`
    /// vertices per side.
    pub fn new(size: f32, resolution: u32) -> SculptResult<Self> {
        if !size.is_finite() || size <= 0.0 || resolution == 0 {
            return Err(SculptError::InvalidGrid { size, resolution });
        }

        Ok(Self {
            size,
            half_size: size / 2.0,
            resolution,
            step_size: size / resolution as f32,
        })
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    /// World distance between neighbouring vertices
    pub fn step_size(&self) -> f32 {
        self.step_size
    }

    pub fn vertex_count(&self) -> usize {
        self.resolution as usize * self.resolution as usize
    }

    /// Row and column of the cell containing `(x, z)`. May lie outside the grid.
    pub fn cell_at(&self, x: f32, z: f32) -> (i64, i64) {
        let res = self.resolution as f32;
        let row = ((z + self.half_size) / self.size * res).floor() as i64;
        let col = ((x + self.half_size) / self.size * res).floor() as i64;
        (row, col)
    }

    /// Vertex id for world coordinates `(x, z)`.
    ///
    /// Only the flattened id is range-checked: a column just past the right
    /// edge aliases onto the first vertex of the next row, matching how the
    /// brush footprint has always been resolved.
    pub fn vertex_id(&self, x: f32, z: f32) -> Option<VertexId> {
        if !x.is_finite() || !z.is_finite() {
            return None;
        }

        let (row, col) = self.cell_at(x, z);
        let id = row
            .checked_mul(self.resolution as i64)
            .and_then(|offset| offset.checked_add(col))?;
        if id < 0 || id as usize >= self.vertex_count() {
            return None;
        }
        Some(VertexId(id as u32))
    }

    /// World XZ of the centre of cell `(row, col)`
    pub fn cell_center(&self, row: u32, col: u32) -> Vec2 {
        Vec2::new(
            -self.half_size + (col as f32 + 0.5) * self.step_size,
            -self.half_size + (row as f32 + 0.5) * self.step_size,
        )
    }

    /// World XZ of a vertex, or `None` if the id is outside the grid
    pub fn vertex_center(&self, id: VertexId) -> Option<Vec2> {
        if id.index() >= self.vertex_count() {
            return None;
        }
        let row = id.0 / self.resolution;
        let col = id.0 % self.resolution;
        Some(self.cell_center(row, col))
    }
}
