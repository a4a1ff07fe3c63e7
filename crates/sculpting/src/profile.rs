//! Falloff profiles.
//!
//! A profile maps a normalized distance weight (0.0 = brush centre, 1.0 =
//! rim) to a strength multiplier. Brushes only see the [`FalloffProfile`]
//! trait, so hosts can plug in their own curves next to the built-in
//! [`ProfileKind`] variants.

use std::f32::consts::FRAC_PI_2;
use std::fmt;

pub use relief_config::ProfileKind;

use crate::error::{SculptError, SculptResult};

/// Strength multiplier as a function of normalized distance.
pub trait FalloffProfile: fmt::Debug {
    /// Strength at `weight`. Called once per affected vertex per sculpt call.
    fn value(&self, weight: f32) -> f32;
}

impl FalloffProfile for ProfileKind {
    fn value(&self, weight: f32) -> f32 {
        match self {
            ProfileKind::Cosine => (weight * FRAC_PI_2).cos(),
            ProfileKind::Constant => 1.0,
        }
    }
}

/// Look up a built-in profile by name.
pub fn profile_by_name(name: &str) -> SculptResult<ProfileKind> {
    name.parse()
        .map_err(|_| SculptError::UnknownProfile(name.to_string()))
}
