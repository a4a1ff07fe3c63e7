//! Core sculpting types shared by the query, brush and session layers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SculptError;

/// Type-safe vertex identifier.
///
/// Ids are assigned by the mesh, start at 0, and index every layer and the
/// composite displacement array alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VertexId(pub u32);

impl VertexId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A vertex inside a brush footprint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffectedVertex {
    pub id: VertexId,
    /// Distance from the brush centre divided by the radius, in `[0, 1)`
    pub weight: f32,
}

/// Brush operation, selectable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrushKind {
    /// Raise the current layer
    #[default]
    Add,
    /// Lower the current layer
    Remove,
    /// Pull the footprint toward its average displacement
    Flatten,
}

impl BrushKind {
    /// Registration order. The first entry is the default brush.
    pub const ALL: [BrushKind; 3] = [BrushKind::Add, BrushKind::Remove, BrushKind::Flatten];

    pub fn name(self) -> &'static str {
        match self {
            BrushKind::Add => "add",
            BrushKind::Remove => "remove",
            BrushKind::Flatten => "flatten",
        }
    }

    /// Position in [`BrushKind::ALL`]
    pub fn index(self) -> usize {
        match self {
            BrushKind::Add => 0,
            BrushKind::Remove => 1,
            BrushKind::Flatten => 2,
        }
    }
}

impl fmt::Display for BrushKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BrushKind {
    type Err = SculptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| SculptError::UnknownBrush(s.to_string()))
    }
}

/// Summary of a single sculpt call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SculptOutcome {
    /// Footprint samples that landed on a vertex (repeats included)
    pub samples: usize,
    /// Distinct vertices touched
    pub unique_vertices: usize,
}

impl SculptOutcome {
    pub fn is_empty(&self) -> bool {
        self.samples == 0
    }
}
