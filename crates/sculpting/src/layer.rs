//! Displacement layers.

/// A named per-vertex scalar contribution to the final height.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplacementLayer {
    name: String,
    data: Vec<f32>,
}

impl DisplacementLayer {
    /// Create a zero-initialized layer covering `vertex_count` vertices
    pub fn new(name: impl Into<String>, vertex_count: usize) -> Self {
        Self {
            name: name.into(),
            data: vec![0.0; vertex_count],
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Mutable access for the owning surface. Callers must restore the
    /// composite afterwards.
    pub(crate) fn data_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    #[inline]
    pub fn value(&self, index: usize) -> Option<f32> {
        self.data.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Reset every vertex to zero
    pub(crate) fn clear(&mut self) {
        self.fill(0.0);
    }

    pub(crate) fn fill(&mut self, value: f32) {
        self.data.fill(value);
    }
}
