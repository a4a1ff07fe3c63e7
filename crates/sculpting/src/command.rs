//! Serializable control messages for a [`SculptSession`](crate::SculptSession).

use serde::{Deserialize, Serialize};

/// A user action forwarded from the host UI.
///
/// Positions are world-space `[x, y, z]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum SculptCommand {
    /// Select a brush by name
    SetBrush { name: String },
    /// Set the diameter of every brush
    SetBrushSize { size: f32 },
    /// Set the intensity of every brush
    SetBrushAmount { amount: f32 },
    /// Select a falloff profile by name
    SetProfile { name: String },
    SculptAt { position: [f32; 3] },
    UpdateCursor { position: [f32; 3] },
    ShowCursor,
    HideCursor,
    /// Zero the current layer of the current mesh
    ClearLayer,
    AddLayer { name: String },
    SelectLayer { name: String },
}
