//! Layered displacement sculpting for grid terrain.
//!
//! Heights are the sum of named per-vertex [`DisplacementLayer`]s. A
//! [`LayeredSurface`] keeps that sum cached and writes it back to the mesh
//! along the up axis after every brush call.
//!
//! # Architecture
//!
//! - **Profiles**: falloff curves mapping normalized distance to strength
//! - **Spatial**: circular footprint query over the grid id mapping
//! - **Deformation**: add/remove/flatten formulas, staged as layer edits
//! - **Brush**: footprint + formula + partial mesh update, plus a cursor
//! - **Session**: named meshes, brush/profile selection and command dispatch
//!
//! ```ignore
//! let mut session = SculptSession::new();
//! session.add_mesh("terrain", LayeredSurface::terrain(10.0, 10)?)?;
//! session.add_layer("base")?;
//! session.sculpt_at(Vec3::ZERO)?;
//! ```

pub mod brush;
pub mod command;
pub mod cursor;
pub mod deformation;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod layer;
pub mod profile;
pub mod session;
pub mod spatial;
pub mod surface;
pub mod types;

pub use brush::SculptBrush;
pub use command::SculptCommand;
pub use cursor::CursorPreview;
pub use error::{EntityKind, SculptError, SculptResult};
pub use geometry::{GridGeometry, SurfaceGeometry};
pub use grid::GridLayout;
pub use layer::DisplacementLayer;
pub use profile::{FalloffProfile, ProfileKind};
pub use relief_config::{FlattenMode, SculptConfig};
pub use session::SculptSession;
pub use surface::{LayerEdit, LayeredSurface};
pub use types::{AffectedVertex, BrushKind, SculptOutcome, VertexId};
