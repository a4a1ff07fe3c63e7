//! Sculpt brushes.
//!
//! A brush pairs an operation ([`BrushKind`]) with a diameter, an intensity
//! and its own cursor preview. Brushes keep no sculpt state between calls:
//! every [`SculptBrush::sculpt`] queries the footprint, stages all layer
//! edits, applies them, and refreshes the mesh once.

use glam::Vec3;
use relief_config::{
    DEFAULT_BRUSH_AMOUNT, DEFAULT_BRUSH_SIZE, DEFAULT_CURSOR_SEGMENTS, FlattenMode,
};
use tracing::{debug, warn};

use crate::cursor::CursorPreview;
use crate::deformation::{additive_edits, flatten_edits};
use crate::error::{SculptError, SculptResult};
use crate::profile::FalloffProfile;
use crate::spatial::unique_vertex_count;
use crate::surface::LayeredSurface;
use crate::types::{BrushKind, SculptOutcome};

/// A brush operation with its size, amount and cursor.
#[derive(Debug, Clone)]
pub struct SculptBrush {
    kind: BrushKind,
    flatten_mode: FlattenMode,
    /// Owns the brush size and amount
    cursor: CursorPreview,
}

impl SculptBrush {
    pub fn new(kind: BrushKind, size: f32, amount: f32, cursor_segments: u32) -> Self {
        Self {
            kind,
            flatten_mode: FlattenMode::default(),
            cursor: CursorPreview::new(size, amount, cursor_segments),
        }
    }

    /// Raise the current layer
    pub fn add() -> Self {
        Self::with_defaults(BrushKind::Add)
    }

    /// Lower the current layer
    pub fn remove() -> Self {
        Self::with_defaults(BrushKind::Remove)
    }

    /// Flatten toward the footprint average
    pub fn flatten() -> Self {
        Self::with_defaults(BrushKind::Flatten)
    }

    fn with_defaults(kind: BrushKind) -> Self {
        Self::new(
            kind,
            DEFAULT_BRUSH_SIZE,
            DEFAULT_BRUSH_AMOUNT,
            DEFAULT_CURSOR_SEGMENTS,
        )
    }

    pub fn kind(&self) -> BrushKind {
        self.kind
    }

    /// Brush diameter in world units
    pub fn size(&self) -> f32 {
        self.cursor.size()
    }

    pub fn set_size(&mut self, size: f32) {
        if size <= 0.0 {
            warn!("{} brush size set to {}, footprint will be empty", self.kind, size);
        }
        self.cursor.set_size(size);
    }

    pub fn radius(&self) -> f32 {
        self.size() / 2.0
    }

    /// Brush intensity
    pub fn amount(&self) -> f32 {
        self.cursor.amount()
    }

    pub fn set_amount(&mut self, amount: f32) {
        self.cursor.set_amount(amount);
    }

    pub fn flatten_mode(&self) -> FlattenMode {
        self.flatten_mode
    }

    pub fn set_flatten_mode(&mut self, mode: FlattenMode) {
        self.flatten_mode = mode;
    }

    pub fn cursor(&self) -> &CursorPreview {
        &self.cursor
    }

    pub fn cursor_mut(&mut self) -> &mut CursorPreview {
        &mut self.cursor
    }

    pub fn show_cursor(&mut self) {
        self.cursor.show();
    }

    pub fn hide_cursor(&mut self) {
        self.cursor.hide();
    }

    /// Move the cursor to `position` and conform it to `surface`
    pub fn update_cursor(&mut self, position: Vec3, surface: Option<&LayeredSurface>) {
        self.cursor.update(position, surface);
    }

    /// Sculpt `surface` at `position` with the given falloff.
    ///
    /// Fails with [`SculptError::NoCurrentLayer`] before any mutation if the
    /// surface has no layers. An empty footprint is not an error.
    pub fn sculpt(
        &self,
        surface: &mut LayeredSurface,
        position: Vec3,
        profile: &dyn FalloffProfile,
    ) -> SculptResult<SculptOutcome> {
        let layer = surface.current_layer().ok_or(SculptError::NoCurrentLayer)?;
        let affected = surface.affected_vertices(position, self.radius());

        let edits = match self.kind {
            BrushKind::Add => additive_edits(&affected, self.amount(), profile),
            BrushKind::Remove => additive_edits(&affected, -self.amount(), profile),
            BrushKind::Flatten => flatten_edits(
                &affected,
                surface.composite(),
                layer.data(),
                profile,
                self.flatten_mode,
            ),
        };

        if edits.is_empty() {
            debug!("{} brush at {:?}: empty footprint", self.kind, position);
            return Ok(SculptOutcome::default());
        }

        surface.apply_edits(&edits)?;
        surface.update_partial(&affected);

        let outcome = SculptOutcome {
            samples: affected.len(),
            unique_vertices: unique_vertex_count(&affected),
        };
        debug!(
            "{} brush at {:?}: {} samples, {} vertices",
            self.kind, position, outcome.samples, outcome.unique_vertices
        );
        Ok(outcome)
    }
}
