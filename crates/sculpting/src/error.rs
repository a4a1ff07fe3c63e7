//! Error types for sculpting operations.

use std::fmt;

/// The kind of named entity an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Mesh,
    Layer,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Mesh => f.write_str("Mesh"),
            EntityKind::Layer => f.write_str("Layer"),
        }
    }
}

/// Errors that can occur while managing or sculpting layered surfaces.
///
/// All of these are reported synchronously to the caller and leave the
/// surface untouched.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SculptError {
    #[error("{kind} name already exists: {name}")]
    DuplicateName { kind: EntityKind, name: String },

    #[error("{kind} name does not exist: {name}")]
    NotFound { kind: EntityKind, name: String },

    #[error("Brush name not recognised: {0}")]
    UnknownBrush(String),

    #[error("Profile name not recognised: {0}")]
    UnknownProfile(String),

    #[error("No mesh selected for sculpting")]
    NoActiveMesh,

    #[error("Mesh has no current layer")]
    NoCurrentLayer,

    #[error("Invalid grid: size={size}, resolution={resolution}")]
    InvalidGrid { size: f32, resolution: u32 },

    #[error("Geometry has {actual} vertices but the grid expects {expected}")]
    VertexCountMismatch { expected: usize, actual: usize },
}

pub type SculptResult<T> = Result<T, SculptError>;
