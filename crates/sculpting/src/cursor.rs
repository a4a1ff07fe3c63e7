//! Brush cursor preview.
//!
//! The cursor is an open cylinder of unit diameter and unit height, scaled
//! horizontally by the brush size. On every update the bottom ring is
//! projected onto the terrain and the top ring is lifted by the brush amount,
//! so the cursor hugs the surface and its thickness shows sculpt strength.
//!
//! The preview only reads the surface. Rendering, scene attachment and
//! visibility are left to the host, which reads [`CursorPreview::world_vertices`].

use std::f32::consts::TAU;

use glam::{Vec2, Vec3};
use tracing::trace;

use crate::surface::LayeredSurface;

/// Fewer samples than this cannot outline a circle
const MIN_SEGMENTS: u32 = 3;

/// Ring-shaped brush indicator that follows the terrain.
#[derive(Debug, Clone)]
pub struct CursorPreview {
    size: f32,
    amount: f32,
    position: Vec3,
    /// Sample directions on the unit-diameter circle (XZ)
    ring: Vec<Vec2>,
    /// Ring heights in cursor-local space
    bottom: Vec<f32>,
    top: Vec<f32>,
    visible: bool,
    attached: bool,
}

impl CursorPreview {
    /// Create a hidden, detached cursor with `segments` samples per ring.
    pub fn new(size: f32, amount: f32, segments: u32) -> Self {
        let segments = segments.max(MIN_SEGMENTS);
        let ring: Vec<Vec2> = (0..segments)
            .map(|i| {
                let theta = i as f32 / segments as f32 * TAU;
                Vec2::new(theta.sin(), theta.cos()) * 0.5
            })
            .collect();

        Self {
            size,
            amount,
            position: Vec3::ZERO,
            bottom: vec![-0.5; ring.len()],
            top: vec![0.5; ring.len()],
            ring,
            visible: false,
            attached: false,
        }
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn set_size(&mut self, size: f32) {
        self.size = size;
    }

    pub fn amount(&self) -> f32 {
        self.amount
    }

    pub fn set_amount(&mut self, amount: f32) {
        self.amount = amount;
    }

    /// World position of the cursor origin
    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn segments(&self) -> usize {
        self.ring.len()
    }

    pub fn show(&mut self) {
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Mark the cursor as present in the host scene
    pub fn attach(&mut self) {
        self.attached = true;
    }

    /// Mark the cursor as removed from the host scene
    pub fn detach(&mut self) {
        self.attached = false;
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Move the cursor to `center` and conform it to `surface`.
    ///
    /// Each bottom sample takes the composite height of the terrain vertex
    /// under it. Samples that fall off the grid (or every sample, when there
    /// is no surface) keep their previous height. The top ring then sits
    /// `amount` above the bottom ring.
    pub fn update(&mut self, center: Vec3, surface: Option<&LayeredSurface>) {
        self.position = center;

        let mut conformed = 0usize;
        for (i, dir) in self.ring.iter().enumerate() {
            let world_x = dir.x * self.size + center.x;
            let world_z = dir.y * self.size + center.z;

            let terrain_height = surface.and_then(|surface| {
                surface
                    .vertex_id_at(world_x, world_z)
                    .and_then(|id| surface.displacement(id))
            });
            if let Some(height) = terrain_height {
                self.bottom[i] = height - center.y;
                conformed += 1;
            }

            self.top[i] = self.bottom[i] + self.amount;
        }

        trace!(
            "cursor update: {}/{} samples on terrain",
            conformed,
            self.ring.len()
        );
    }

    /// Bottom ring in world space
    pub fn bottom_ring(&self) -> Vec<Vec3> {
        self.ring_to_world(&self.bottom)
    }

    /// Top ring in world space
    pub fn top_ring(&self) -> Vec<Vec3> {
        self.ring_to_world(&self.top)
    }

    /// Top ring followed by bottom ring, in world space
    pub fn world_vertices(&self) -> Vec<Vec3> {
        let mut vertices = self.top_ring();
        vertices.extend(self.bottom_ring());
        vertices
    }

    fn ring_to_world(&self, heights: &[f32]) -> Vec<Vec3> {
        self.ring
            .iter()
            .zip(heights)
            .map(|(dir, &y)| {
                self.position + Vec3::new(dir.x * self.size, y, dir.y * self.size)
            })
            .collect()
    }
}
