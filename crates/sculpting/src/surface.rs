//! Layered displacement surfaces.
//!
//! A [`LayeredSurface`] owns a stack of named [`DisplacementLayer`]s and a
//! cached composite array holding the per-vertex sum across all layers. The
//! composite is what gets written into the mesh as vertex height.
//!
//! Brushes mutate only the current layer and then call
//! [`LayeredSurface::update_partial`] once, which restores
//! `composite[i] == Σ layer.data[i]` for every touched vertex and pushes the
//! new heights into the geometry.

use glam::Vec3;
use tracing::{debug, info, trace};

use crate::error::{EntityKind, SculptError, SculptResult};
use crate::geometry::{GridGeometry, SurfaceGeometry};
use crate::grid::GridLayout;
use crate::layer::DisplacementLayer;
use crate::spatial::query_affected;
use crate::types::{AffectedVertex, VertexId};

/// A single pending write into the current layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LayerEdit {
    /// Add `delta` to the stored value
    Offset { id: VertexId, delta: f32 },
    /// Replace the stored value
    Replace { id: VertexId, value: f32 },
}

/// Sculptable grid terrain with layered displacement.
#[derive(Debug)]
pub struct LayeredSurface {
    grid: GridLayout,
    geometry: Box<dyn SurfaceGeometry>,
    /// Insertion-ordered, names unique
    layers: Vec<DisplacementLayer>,
    current: Option<usize>,
    composite: Vec<f32>,
}

impl LayeredSurface {
    /// Wrap existing geometry laid out as a `size × size` grid with
    /// `resolution` vertices per side.
    pub fn new(
        geometry: Box<dyn SurfaceGeometry>,
        size: f32,
        resolution: u32,
    ) -> SculptResult<Self> {
        let grid = GridLayout::new(size, resolution)?;
        let actual = geometry.vertex_count();
        if actual != grid.vertex_count() {
            return Err(SculptError::VertexCountMismatch {
                expected: grid.vertex_count(),
                actual,
            });
        }

        Ok(Self {
            grid,
            geometry,
            layers: Vec::new(),
            current: None,
            composite: vec![0.0; actual],
        })
    }

    /// Flat terrain backed by a [`GridGeometry`]
    pub fn terrain(size: f32, resolution: u32) -> SculptResult<Self> {
        let grid = GridLayout::new(size, resolution)?;
        Self::new(Box::new(GridGeometry::new(&grid)), size, resolution)
    }

    pub fn grid(&self) -> &GridLayout {
        &self.grid
    }

    pub fn geometry(&self) -> &dyn SurfaceGeometry {
        self.geometry.as_ref()
    }

    /// Whether heights changed since the last call. Resets the flag.
    pub fn take_geometry_dirty(&mut self) -> bool {
        self.geometry.take_dirty()
    }

    pub fn vertex_count(&self) -> usize {
        self.composite.len()
    }

    /// Per-vertex sum across all layers
    pub fn composite(&self) -> &[f32] {
        &self.composite
    }

    /// Composite displacement of a single vertex
    pub fn displacement(&self, id: VertexId) -> Option<f32> {
        self.composite.get(id.index()).copied()
    }

    /// Vertex id under world coordinates `(x, z)`
    pub fn vertex_id_at(&self, x: f32, z: f32) -> Option<VertexId> {
        self.grid.vertex_id(x, z)
    }

    // --- Layers ---

    /// Add a zero-initialized layer and make it current.
    pub fn add_layer(&mut self, name: &str) -> SculptResult<()> {
        if self.layer_index(name).is_some() {
            return Err(SculptError::DuplicateName {
                kind: EntityKind::Layer,
                name: name.to_string(),
            });
        }

        self.layers
            .push(DisplacementLayer::new(name, self.vertex_count()));
        self.current = Some(self.layers.len() - 1);
        info!("Added layer '{}' ({} layers)", name, self.layers.len());
        Ok(())
    }

    /// Remove a layer and refresh every vertex.
    ///
    /// If the removed layer was current, the most recently added remaining
    /// layer becomes current.
    pub fn remove_layer(&mut self, name: &str) -> SculptResult<DisplacementLayer> {
        let index = self.require_layer(name)?;
        let removed = self.layers.remove(index);

        self.current = match self.current {
            Some(current) if current == index => self.layers.len().checked_sub(1),
            Some(current) if current > index => Some(current - 1),
            other => other,
        };

        info!("Removed layer '{}' ({} layers)", name, self.layers.len());
        self.update_all();
        Ok(removed)
    }

    /// Select the layer brushes write into
    pub fn set_current_layer(&mut self, name: &str) -> SculptResult<()> {
        let index = self.require_layer(name)?;
        self.current = Some(index);
        debug!("Current layer set to '{}'", name);
        Ok(())
    }

    pub fn current_layer(&self) -> Option<&DisplacementLayer> {
        self.current.map(|index| &self.layers[index])
    }

    pub fn layer(&self, name: &str) -> Option<&DisplacementLayer> {
        self.layer_index(name).map(|index| &self.layers[index])
    }

    pub fn layers(&self) -> &[DisplacementLayer] {
        &self.layers
    }

    pub fn layer_names(&self) -> impl Iterator<Item = &str> {
        self.layers.iter().map(|layer| layer.name())
    }

    /// Zero the current layer and refresh every vertex
    pub fn clear_current_layer(&mut self) -> SculptResult<()> {
        let index = self.current.ok_or(SculptError::NoCurrentLayer)?;
        self.layers[index].clear();
        debug!("Cleared layer '{}'", self.layers[index].name());
        self.update_all();
        Ok(())
    }

    /// Set every vertex of a layer to `value` and refresh every vertex
    pub fn fill_layer(&mut self, name: &str, value: f32) -> SculptResult<()> {
        let index = self.require_layer(name)?;
        self.layers[index].fill(value);
        self.update_all();
        Ok(())
    }

    // --- Brush support ---

    /// Vertices inside a circular footprint, see [`query_affected`]
    pub fn affected_vertices(&self, center: Vec3, radius: f32) -> Vec<AffectedVertex> {
        query_affected(&self.grid, center, radius)
    }

    /// Add `delta` to the current layer at `id`.
    ///
    /// Composite and mesh are left stale until [`Self::update_partial`].
    pub fn apply_delta(&mut self, id: VertexId, delta: f32) -> SculptResult<()> {
        self.apply_edits(&[LayerEdit::Offset { id, delta }])
    }

    /// Overwrite the current layer at `id`.
    ///
    /// Composite and mesh are left stale until [`Self::update_partial`].
    pub fn overwrite(&mut self, id: VertexId, value: f32) -> SculptResult<()> {
        self.apply_edits(&[LayerEdit::Replace { id, value }])
    }

    /// Apply a batch of edits to the current layer in order.
    ///
    /// Fails before touching anything if there is no current layer. Ids
    /// outside the surface are skipped.
    pub fn apply_edits(&mut self, edits: &[LayerEdit]) -> SculptResult<()> {
        let index = self.current.ok_or(SculptError::NoCurrentLayer)?;
        let data = self.layers[index].data_mut();

        for edit in edits {
            match *edit {
                LayerEdit::Offset { id, delta } => {
                    if let Some(slot) = data.get_mut(id.index()) {
                        *slot += delta;
                    }
                }
                LayerEdit::Replace { id, value } => {
                    if let Some(slot) = data.get_mut(id.index()) {
                        *slot = value;
                    }
                }
            }
        }
        Ok(())
    }

    /// Re-sum the touched vertices, write their heights and refresh normals.
    ///
    /// Call exactly once per brush invocation, after all edits are applied.
    /// Repeated ids are harmless.
    pub fn update_partial(&mut self, affected: &[AffectedVertex]) {
        if affected.is_empty() {
            trace!("update_partial: nothing to update");
            return;
        }

        for info in affected {
            self.refresh_vertex(info.id.index());
        }
        self.commit_geometry();
        trace!("update_partial: {} samples", affected.len());
    }

    /// Re-sum every vertex, write all heights and refresh normals
    pub fn update_all(&mut self) {
        for index in 0..self.composite.len() {
            self.refresh_vertex(index);
        }
        self.commit_geometry();
        trace!("update_all: {} vertices", self.composite.len());
    }

    fn refresh_vertex(&mut self, index: usize) {
        if index >= self.composite.len() {
            return;
        }

        let sum: f32 = self.layers.iter().map(|layer| layer.data()[index]).sum();
        self.composite[index] = sum;
        // Displacement runs along the up axis only, not the surface normal
        self.geometry.set_height(VertexId(index as u32), sum);
    }

    fn commit_geometry(&mut self) {
        self.geometry.recompute_normals();
        self.geometry.mark_dirty();
    }

    fn layer_index(&self, name: &str) -> Option<usize> {
        self.layers.iter().position(|layer| layer.name() == name)
    }

    fn require_layer(&self, name: &str) -> SculptResult<usize> {
        self.layer_index(name).ok_or_else(|| SculptError::NotFound {
            kind: EntityKind::Layer,
            name: name.to_string(),
        })
    }
}
