//! Mesh geometry seam.
//!
//! The sculpting core never touches a renderer directly. It reads vertex
//! counts and positions through [`SurfaceGeometry`], writes heights back, and
//! asks the geometry to refresh its normals once per batch of writes. The
//! host decides how a dirty geometry reaches the GPU.
//!
//! [`GridGeometry`] is the CPU reference implementation for regular grid
//! terrain: cell-centred vertices, two triangles per quad, face normals
//! followed by averaged vertex normals.

#[cfg(feature = "bevy")]
use bevy::asset::RenderAssetUsages;
#[cfg(feature = "bevy")]
use bevy::mesh::{Indices, Mesh, PrimitiveTopology};

use glam::Vec3;
use std::fmt;

use crate::grid::GridLayout;
use crate::types::VertexId;

/// The mesh collaborator a layered surface writes into.
pub trait SurfaceGeometry: fmt::Debug {
    /// Number of vertices. Fixed for the lifetime of the geometry.
    fn vertex_count(&self) -> usize;

    /// Current position of a vertex
    fn position(&self, id: VertexId) -> Option<Vec3>;

    /// Set the height of a vertex along the up axis
    fn set_height(&mut self, id: VertexId, height: f32);

    /// Recompute face normals, then vertex normals, over the whole mesh
    fn recompute_normals(&mut self);

    /// Flag the vertex buffers as needing upload
    fn mark_dirty(&mut self);

    /// Return the dirty flag and reset it, for hosts that poll once per frame
    fn take_dirty(&mut self) -> bool;
}

/// CPU grid mesh matching a [`GridLayout`].
#[derive(Debug, Clone)]
pub struct GridGeometry {
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    face_normals: Vec<Vec3>,
    indices: Vec<u32>,
    dirty: bool,
}

impl GridGeometry {
    /// Build a flat grid at height 0 for `layout`
    pub fn new(layout: &GridLayout) -> Self {
        let res = layout.resolution();
        let mut positions = Vec::with_capacity(layout.vertex_count());
        for row in 0..res {
            for col in 0..res {
                let center = layout.cell_center(row, col);
                positions.push(Vec3::new(center.x, 0.0, center.y));
            }
        }

        let quads = (res.saturating_sub(1) as usize).pow(2);
        let mut indices = Vec::with_capacity(quads * 6);
        for row in 0..res.saturating_sub(1) {
            for col in 0..res - 1 {
                let a = row * res + col;
                let b = a + 1;
                let c = a + res;
                let d = c + 1;
                // Counter-clockwise seen from +Y
                indices.extend_from_slice(&[a, c, b, b, c, d]);
            }
        }

        let mut geometry = Self {
            normals: vec![Vec3::Y; positions.len()],
            face_normals: Vec::with_capacity(indices.len() / 3),
            positions,
            indices,
            dirty: true,
        };
        geometry.recompute_normals();
        geometry
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    pub fn face_normals(&self) -> &[Vec3] {
        &self.face_normals
    }

    /// Triangle list indices
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Raw position data for GPU upload
    pub fn positions_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Raw normal data for GPU upload
    pub fn normals_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.normals)
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn recalculate_face_normals(&mut self) {
        self.face_normals.clear();
        for tri in self.indices.chunks_exact(3) {
            let v0 = self.positions[tri[0] as usize];
            let v1 = self.positions[tri[1] as usize];
            let v2 = self.positions[tri[2] as usize];
            let normal = (v1 - v0).cross(v2 - v0).normalize_or_zero();
            self.face_normals.push(normal);
        }
    }

    fn recalculate_vertex_normals(&mut self) {
        let mut sums = vec![Vec3::ZERO; self.positions.len()];
        for (tri, face_normal) in self.indices.chunks_exact(3).zip(&self.face_normals) {
            for &vid in tri {
                sums[vid as usize] += *face_normal;
            }
        }

        for (normal, sum) in self.normals.iter_mut().zip(sums) {
            // Isolated vertices (single-vertex grids) keep pointing up
            *normal = sum.try_normalize().unwrap_or(Vec3::Y);
        }
    }

    /// Convert to a bevy mesh with shared vertices
    #[cfg(feature = "bevy")]
    pub fn to_bevy_mesh(&self) -> Mesh {
        let positions: Vec<[f32; 3]> = self.positions.iter().map(|p| p.to_array()).collect();
        let normals: Vec<[f32; 3]> = self.normals.iter().map(|n| n.to_array()).collect();

        let mut mesh = Mesh::new(
            PrimitiveTopology::TriangleList,
            RenderAssetUsages::default(),
        );
        mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
        mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
        mesh.insert_indices(Indices::U32(self.indices.clone()));
        mesh
    }
}

impl SurfaceGeometry for GridGeometry {
    fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    fn position(&self, id: VertexId) -> Option<Vec3> {
        self.positions.get(id.index()).copied()
    }

    fn set_height(&mut self, id: VertexId, height: f32) {
        if let Some(position) = self.positions.get_mut(id.index()) {
            position.y = height;
        }
    }

    fn recompute_normals(&mut self) {
        self.recalculate_face_normals();
        self.recalculate_vertex_normals();
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}
