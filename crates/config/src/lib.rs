//! Shared configuration for Relief
//!
//! This crate is the single source of truth for brush defaults, cursor
//! resolution, the active falloff profile and flatten behaviour. Hosts load
//! it from JSON or build it in code and hand it to the sculpting session.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[cfg(feature = "bevy")]
use bevy::prelude::Resource;

/// Default brush diameter in world units
pub const DEFAULT_BRUSH_SIZE: f32 = 1.0;

/// Default brush intensity
pub const DEFAULT_BRUSH_AMOUNT: f32 = 1.0;

/// Default number of samples around each cursor ring
pub const DEFAULT_CURSOR_SEGMENTS: u32 = 32;

/// A string identifier that does not name any known variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unrecognised name: {0}")]
pub struct UnknownName(pub String);

/// Built-in falloff profiles, selectable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileKind {
    /// `cos(weight * π/2)`: full strength at the centre, zero at the rim
    #[default]
    Cosine,
    /// Full strength everywhere inside the footprint
    Constant,
}

impl ProfileKind {
    pub const ALL: [ProfileKind; 2] = [ProfileKind::Cosine, ProfileKind::Constant];

    pub fn name(self) -> &'static str {
        match self {
            ProfileKind::Cosine => "cosine",
            ProfileKind::Constant => "constant",
        }
    }
}

impl fmt::Display for ProfileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ProfileKind {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| UnknownName(s.to_string()))
    }
}

/// How the flatten brush writes its result back into the layer stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlattenMode {
    /// Blend the composite displacement toward the footprint average and
    /// store the blended composite value in the current layer. Other layers'
    /// contributions at those vertices end up folded into the current layer.
    #[default]
    Composite,
    /// Same blend target, but only the difference is written to the current
    /// layer so other layers keep their own contributions.
    LayerScoped,
}

/// Sculpting configuration shared between the host and the session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "bevy", derive(Resource))]
#[serde(default)]
pub struct SculptConfig {
    /// Brush diameter applied to every brush on startup
    pub brush_size: f32,
    /// Brush intensity applied to every brush on startup
    pub brush_amount: f32,
    /// Samples per cursor ring
    pub cursor_segments: u32,
    /// Falloff profile active on startup
    pub profile: ProfileKind,
    /// Flatten write-back behaviour
    pub flatten_mode: FlattenMode,
}

impl Default for SculptConfig {
    fn default() -> Self {
        Self {
            brush_size: DEFAULT_BRUSH_SIZE,
            brush_amount: DEFAULT_BRUSH_AMOUNT,
            cursor_segments: DEFAULT_CURSOR_SEGMENTS,
            profile: ProfileKind::default(),
            flatten_mode: FlattenMode::default(),
        }
    }
}

impl SculptConfig {
    /// Parse a config from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize the config to pretty-printed JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Brush radius implied by the configured diameter
    pub fn brush_radius(&self) -> f32 {
        self.brush_size / 2.0
    }
}
