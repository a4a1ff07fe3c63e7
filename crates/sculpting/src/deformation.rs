//! Displacement formulas for the brush operations.
//!
//! Each function turns a footprint into a list of [`LayerEdit`]s without
//! touching the surface. The brush applies the whole list and then refreshes
//! the mesh once, so a sculpt call is all-or-nothing.

use relief_config::FlattenMode;

use crate::profile::FalloffProfile;
use crate::surface::LayerEdit;
use crate::types::AffectedVertex;

/// Offset every affected vertex by `amount * profile(weight)`.
///
/// A negative `amount` lowers the surface.
pub fn additive_edits(
    affected: &[AffectedVertex],
    amount: f32,
    profile: &dyn FalloffProfile,
) -> Vec<LayerEdit> {
    affected
        .iter()
        .map(|info| LayerEdit::Offset {
            id: info.id,
            delta: amount * profile.value(info.weight),
        })
        .collect()
}

/// Mean composite displacement over a footprint, counting repeats.
///
/// Returns `None` for an empty footprint.
pub fn average_displacement(affected: &[AffectedVertex], composite: &[f32]) -> Option<f32> {
    if affected.is_empty() {
        return None;
    }

    let total: f32 = affected
        .iter()
        .map(|info| composite.get(info.id.index()).copied().unwrap_or(0.0))
        .sum();
    Some(total / affected.len() as f32)
}

/// Blend each affected vertex toward the footprint average.
///
/// With `m = profile(weight)` the target composite value is
/// `m * average + (1 - m) * current`, all read before any edit is applied.
/// [`FlattenMode::Composite`] stores that target in the current layer as is;
/// [`FlattenMode::LayerScoped`] stores `layer + (target - current)` so the
/// composite reaches the same target without folding in other layers.
pub fn flatten_edits(
    affected: &[AffectedVertex],
    composite: &[f32],
    layer: &[f32],
    profile: &dyn FalloffProfile,
    mode: FlattenMode,
) -> Vec<LayerEdit> {
    let Some(average) = average_displacement(affected, composite) else {
        return Vec::new();
    };

    affected
        .iter()
        .filter_map(|info| {
            let index = info.id.index();
            let current = *composite.get(index)?;
            let modulator = profile.value(info.weight);
            let target = modulator * average + (1.0 - modulator) * current;

            let value = match mode {
                FlattenMode::Composite => target,
                FlattenMode::LayerScoped => *layer.get(index)? + (target - current),
            };
            Some(LayerEdit::Replace { id: info.id, value })
        })
        .collect()
}
