//! Top-level sculpting façade.
//!
//! [`SculptSession`] owns the named surfaces, one brush per [`BrushKind`],
//! the active falloff profile and the current mesh/brush selection. Host
//! input goes through its methods or through [`SculptCommand`]s.

use glam::Vec3;
use relief_config::{FlattenMode, SculptConfig};
use tracing::{debug, info};

use crate::brush::SculptBrush;
use crate::command::SculptCommand;
use crate::error::{EntityKind, SculptError, SculptResult};
use crate::profile::{FalloffProfile, ProfileKind, profile_by_name};
use crate::surface::LayeredSurface;
use crate::types::{BrushKind, SculptOutcome};

/// Sculpting state for one editor.
#[derive(Debug)]
pub struct SculptSession {
    /// Insertion-ordered, names unique
    meshes: Vec<NamedMesh>,
    current_mesh: Option<usize>,
    /// One brush per kind, in [`BrushKind::ALL`] order
    brushes: Vec<SculptBrush>,
    current_brush: BrushKind,
    profile: Box<dyn FalloffProfile>,
    /// `None` while a custom profile is active
    profile_kind: Option<ProfileKind>,
}

#[derive(Debug)]
struct NamedMesh {
    name: String,
    surface: LayeredSurface,
}

impl Default for SculptSession {
    fn default() -> Self {
        Self::new()
    }
}

impl SculptSession {
    pub fn new() -> Self {
        Self::with_config(&SculptConfig::default())
    }

    /// Build a session whose brushes, cursors and profile follow `config`.
    pub fn with_config(config: &SculptConfig) -> Self {
        let brushes = BrushKind::ALL
            .iter()
            .map(|&kind| {
                let mut brush = SculptBrush::new(
                    kind,
                    config.brush_size,
                    config.brush_amount,
                    config.cursor_segments,
                );
                brush.set_flatten_mode(config.flatten_mode);
                brush.cursor_mut().attach();
                brush
            })
            .collect();

        Self {
            meshes: Vec::new(),
            current_mesh: None,
            brushes,
            current_brush: BrushKind::ALL[0],
            profile: Box::new(config.profile),
            profile_kind: Some(config.profile),
        }
    }

    // --- Meshes ---

    /// Register a surface under `name` and make it the current mesh.
    pub fn add_mesh(&mut self, name: &str, surface: LayeredSurface) -> SculptResult<()> {
        if self.mesh_index(name).is_some() {
            return Err(SculptError::DuplicateName {
                kind: EntityKind::Mesh,
                name: name.to_string(),
            });
        }

        self.meshes.push(NamedMesh {
            name: name.to_string(),
            surface,
        });
        self.current_mesh = Some(self.meshes.len() - 1);
        info!("Added mesh '{}' ({} meshes)", name, self.meshes.len());
        Ok(())
    }

    pub fn get_mesh(&self, name: &str) -> SculptResult<&LayeredSurface> {
        let index = self.require_mesh(name)?;
        Ok(&self.meshes[index].surface)
    }

    pub fn get_mesh_mut(&mut self, name: &str) -> SculptResult<&mut LayeredSurface> {
        let index = self.require_mesh(name)?;
        Ok(&mut self.meshes[index].surface)
    }

    /// Remove a surface and hand it back. Clears the selection if it was current.
    pub fn remove_mesh(&mut self, name: &str) -> SculptResult<LayeredSurface> {
        let index = self.require_mesh(name)?;
        let removed = self.meshes.remove(index);

        self.current_mesh = match self.current_mesh {
            Some(current) if current == index => None,
            Some(current) if current > index => Some(current - 1),
            other => other,
        };
        info!("Removed mesh '{}' ({} meshes)", name, self.meshes.len());
        Ok(removed.surface)
    }

    pub fn set_current_mesh(&mut self, name: &str) -> SculptResult<()> {
        let index = self.require_mesh(name)?;
        self.current_mesh = Some(index);
        debug!("Current mesh set to '{}'", name);
        Ok(())
    }

    /// Name of the current mesh
    pub fn current_mesh_name(&self) -> Option<&str> {
        self.current_mesh.map(|index| self.meshes[index].name.as_str())
    }

    pub fn current_mesh(&self) -> Option<&LayeredSurface> {
        self.current_mesh.map(|index| &self.meshes[index].surface)
    }

    pub fn current_mesh_mut(&mut self) -> Option<&mut LayeredSurface> {
        self.current_mesh.map(|index| &mut self.meshes[index].surface)
    }

    /// Registered mesh names in insertion order
    pub fn mesh_names(&self) -> impl Iterator<Item = &str> {
        self.meshes.iter().map(|mesh| mesh.name.as_str())
    }

    fn mesh_index(&self, name: &str) -> Option<usize> {
        self.meshes.iter().position(|mesh| mesh.name == name)
    }

    fn require_mesh(&self, name: &str) -> SculptResult<usize> {
        self.mesh_index(name).ok_or_else(|| mesh_not_found(name))
    }

    fn require_current_mesh(&mut self) -> SculptResult<&mut LayeredSurface> {
        self.current_mesh_mut().ok_or(SculptError::NoActiveMesh)
    }

    // --- Brushes ---

    /// Select a brush by name (`"add"`, `"remove"`, `"flatten"`).
    pub fn set_brush(&mut self, name: &str) -> SculptResult<()> {
        let kind: BrushKind = name.parse()?;
        self.select_brush(kind);
        Ok(())
    }

    /// Switch brushes. A visible cursor moves over to the new brush.
    pub fn select_brush(&mut self, kind: BrushKind) {
        if kind == self.current_brush {
            return;
        }

        let previous = self.current_brush;
        let cursor = self.brushes[previous.index()].cursor();
        let (visible, position) = (cursor.is_visible(), cursor.position());

        if visible {
            self.brushes[previous.index()].hide_cursor();
        }
        self.current_brush = kind;
        if visible {
            let surface = self.current_mesh.map(|index| &self.meshes[index].surface);
            let brush = &mut self.brushes[kind.index()];
            brush.update_cursor(position, surface);
            brush.show_cursor();
        }
        info!("Brush switched from {} to {}", previous, kind);
    }

    pub fn current_brush(&self) -> BrushKind {
        self.current_brush
    }

    pub fn brush(&self, kind: BrushKind) -> &SculptBrush {
        &self.brushes[kind.index()]
    }

    fn active_brush(&self) -> &SculptBrush {
        self.brush(self.current_brush)
    }

    fn active_brush_mut(&mut self) -> &mut SculptBrush {
        &mut self.brushes[self.current_brush.index()]
    }

    /// Diameter of the current brush
    pub fn brush_size(&self) -> f32 {
        self.active_brush().size()
    }

    /// Set the diameter of every brush
    pub fn set_brush_size(&mut self, size: f32) {
        for brush in &mut self.brushes {
            brush.set_size(size);
        }
        debug!("Brush size set to {}", size);
    }

    /// Intensity of the current brush
    pub fn brush_amount(&self) -> f32 {
        self.active_brush().amount()
    }

    /// Set the intensity of every brush
    pub fn set_brush_amount(&mut self, amount: f32) {
        for brush in &mut self.brushes {
            brush.set_amount(amount);
        }
        debug!("Brush amount set to {}", amount);
    }

    pub fn set_flatten_mode(&mut self, mode: FlattenMode) {
        for brush in &mut self.brushes {
            brush.set_flatten_mode(mode);
        }
        info!("Flatten mode set to {:?}", mode);
    }

    // --- Profiles ---

    /// Select a built-in profile by name (`"cosine"`, `"constant"`).
    pub fn set_profile(&mut self, name: &str) -> SculptResult<()> {
        let kind = profile_by_name(name)?;
        self.set_profile_kind(kind);
        Ok(())
    }

    pub fn set_profile_kind(&mut self, kind: ProfileKind) {
        self.profile = Box::new(kind);
        self.profile_kind = Some(kind);
        info!("Falloff profile set to {}", kind);
    }

    /// Use a host-supplied falloff curve
    pub fn set_custom_profile(&mut self, profile: Box<dyn FalloffProfile>) {
        info!("Falloff profile set to custom {:?}", profile);
        self.profile = profile;
        self.profile_kind = None;
    }

    pub fn profile(&self) -> &dyn FalloffProfile {
        self.profile.as_ref()
    }

    /// Active built-in profile, `None` for a custom one
    pub fn profile_kind(&self) -> Option<ProfileKind> {
        self.profile_kind
    }

    // --- Sculpting ---

    /// Sculpt the current mesh at `position` with the current brush and profile.
    pub fn sculpt_at(&mut self, position: Vec3) -> SculptResult<SculptOutcome> {
        let index = self.current_mesh.ok_or(SculptError::NoActiveMesh)?;
        let surface = &mut self.meshes[index].surface;
        let brush = &self.brushes[self.current_brush.index()];
        brush.sculpt(surface, position, self.profile.as_ref())
    }

    /// Add a layer to the current mesh and make it current
    pub fn add_layer(&mut self, name: &str) -> SculptResult<()> {
        self.require_current_mesh()?.add_layer(name)
    }

    /// Select a layer on the current mesh
    pub fn set_current_layer(&mut self, name: &str) -> SculptResult<()> {
        self.require_current_mesh()?.set_current_layer(name)
    }

    /// Zero the current layer of the current mesh
    pub fn clear_current_layer(&mut self) -> SculptResult<()> {
        self.require_current_mesh()?.clear_current_layer()
    }

    // --- Cursor ---

    /// Move the current brush's cursor, conforming it to the current mesh if any
    pub fn update_cursor(&mut self, position: Vec3) {
        let surface = self.current_mesh.map(|index| &self.meshes[index].surface);
        self.brushes[self.current_brush.index()].update_cursor(position, surface);
    }

    pub fn show_cursor(&mut self) {
        self.active_brush_mut().show_cursor();
    }

    pub fn hide_cursor(&mut self) {
        self.active_brush_mut().hide_cursor();
    }

    // --- Commands ---

    /// Dispatch a host command. Returns the outcome for `SculptAt`.
    pub fn apply(&mut self, command: SculptCommand) -> SculptResult<Option<SculptOutcome>> {
        debug!("Applying {:?}", command);
        match command {
            SculptCommand::SetBrush { name } => self.set_brush(&name)?,
            SculptCommand::SetBrushSize { size } => self.set_brush_size(size),
            SculptCommand::SetBrushAmount { amount } => self.set_brush_amount(amount),
            SculptCommand::SetProfile { name } => self.set_profile(&name)?,
            SculptCommand::SculptAt { position } => {
                return self.sculpt_at(Vec3::from(position)).map(Some);
            }
            SculptCommand::UpdateCursor { position } => self.update_cursor(Vec3::from(position)),
            SculptCommand::ShowCursor => self.show_cursor(),
            SculptCommand::HideCursor => self.hide_cursor(),
            SculptCommand::ClearLayer => self.clear_current_layer()?,
            SculptCommand::AddLayer { name } => self.add_layer(&name)?,
            SculptCommand::SelectLayer { name } => self.set_current_layer(&name)?,
        }
        Ok(None)
    }
}

fn mesh_not_found(name: &str) -> SculptError {
    SculptError::NotFound {
        kind: EntityKind::Mesh,
        name: name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::VertexId;

    const EPS: f32 = 1e-5;

    fn session_with_terrain() -> SculptSession {
        let mut session = SculptSession::new();
        session
            .add_mesh("terrain", LayeredSurface::terrain(10.0, 10).unwrap())
            .unwrap();
        session.add_layer("base").unwrap();
        session
    }

    #[derive(Debug)]
    struct Linear;

    impl FalloffProfile for Linear {
        fn value(&self, weight: f32) -> f32 {
            1.0 - weight
        }
    }

    #[test]
    fn test_new_session_defaults() {
        let session = SculptSession::new();
        assert_eq!(session.current_brush(), BrushKind::Add);
        assert_eq!(session.profile_kind(), Some(ProfileKind::Cosine));
        assert_eq!(session.brush_size(), 1.0);
        assert_eq!(session.brush_amount(), 1.0);
        assert!(session.current_mesh().is_none());
        for kind in BrushKind::ALL {
            assert!(session.brush(kind).cursor().is_attached());
            assert!(!session.brush(kind).cursor().is_visible());
        }
    }

    #[test]
    fn test_with_config() {
        let config = SculptConfig {
            brush_size: 3.0,
            brush_amount: 0.25,
            cursor_segments: 8,
            profile: ProfileKind::Constant,
            flatten_mode: FlattenMode::LayerScoped,
        };
        let session = SculptSession::with_config(&config);

        assert_eq!(session.profile_kind(), Some(ProfileKind::Constant));
        for kind in BrushKind::ALL {
            let brush = session.brush(kind);
            assert_eq!(brush.size(), 3.0);
            assert_eq!(brush.amount(), 0.25);
            assert_eq!(brush.cursor().segments(), 8);
            assert_eq!(brush.flatten_mode(), FlattenMode::LayerScoped);
        }
    }

    #[test]
    fn test_mesh_registry() {
        let mut session = SculptSession::new();
        session
            .add_mesh("a", LayeredSurface::terrain(10.0, 10).unwrap())
            .unwrap();
        session
            .add_mesh("b", LayeredSurface::terrain(4.0, 4).unwrap())
            .unwrap();
        assert_eq!(session.current_mesh_name(), Some("b"));
        assert_eq!(session.mesh_names().collect::<Vec<_>>(), vec!["a", "b"]);

        let duplicate = session.add_mesh("a", LayeredSurface::terrain(2.0, 2).unwrap());
        assert_eq!(
            duplicate,
            Err(SculptError::DuplicateName {
                kind: EntityKind::Mesh,
                name: "a".to_string(),
            })
        );
        assert_eq!(session.get_mesh("a").unwrap().vertex_count(), 100);

        let missing = SculptError::NotFound {
            kind: EntityKind::Mesh,
            name: "c".to_string(),
        };
        assert_eq!(session.get_mesh("c").unwrap_err(), missing);
        assert_eq!(session.remove_mesh("c").unwrap_err(), missing);
        assert_eq!(session.set_current_mesh("c"), Err(missing));

        session.set_current_mesh("a").unwrap();
        assert_eq!(session.current_mesh().unwrap().vertex_count(), 100);
    }

    #[test]
    fn test_meshes_keep_insertion_order() {
        let mut session = SculptSession::new();
        for name in ["ridge", "basin", "coast"] {
            session
                .add_mesh(name, LayeredSurface::terrain(4.0, 4).unwrap())
                .unwrap();
        }
        assert_eq!(
            session.mesh_names().collect::<Vec<_>>(),
            vec!["ridge", "basin", "coast"]
        );

        // Removing an earlier mesh keeps the selection on the same mesh
        session.remove_mesh("ridge").unwrap();
        assert_eq!(session.current_mesh_name(), Some("coast"));
        assert_eq!(session.mesh_names().collect::<Vec<_>>(), vec!["basin", "coast"]);

        session.set_current_mesh("basin").unwrap();
        session.remove_mesh("coast").unwrap();
        assert_eq!(session.current_mesh_name(), Some("basin"));
    }

    #[test]
    fn test_removing_current_mesh_clears_selection() {
        let mut session = session_with_terrain();
        let removed = session.remove_mesh("terrain").unwrap();
        assert_eq!(removed.layer_names().collect::<Vec<_>>(), vec!["base"]);
        assert!(session.current_mesh().is_none());
        assert_eq!(session.sculpt_at(Vec3::ZERO), Err(SculptError::NoActiveMesh));
    }

    #[test]
    fn test_sculpt_without_mesh() {
        let mut session = SculptSession::new();
        assert_eq!(session.sculpt_at(Vec3::ZERO), Err(SculptError::NoActiveMesh));
        assert_eq!(session.add_layer("base"), Err(SculptError::NoActiveMesh));
        assert_eq!(session.clear_current_layer(), Err(SculptError::NoActiveMesh));
    }

    #[test]
    fn test_sculpt_without_layer() {
        let mut session = SculptSession::new();
        session
            .add_mesh("terrain", LayeredSurface::terrain(10.0, 10).unwrap())
            .unwrap();
        for kind in BrushKind::ALL {
            session.select_brush(kind);
            assert_eq!(session.sculpt_at(Vec3::ZERO), Err(SculptError::NoCurrentLayer));
        }
    }

    #[test]
    fn test_set_brush_by_name() {
        let mut session = SculptSession::new();
        session.set_brush("flatten").unwrap();
        assert_eq!(session.current_brush(), BrushKind::Flatten);
        assert_eq!(
            session.set_brush("smooth"),
            Err(SculptError::UnknownBrush("smooth".to_string()))
        );
        assert_eq!(session.current_brush(), BrushKind::Flatten);
    }

    #[test]
    fn test_size_and_amount_broadcast() {
        let mut session = SculptSession::new();
        session.set_brush_size(4.0);
        session.set_brush_amount(0.5);
        for kind in BrushKind::ALL {
            assert_eq!(session.brush(kind).size(), 4.0);
            assert_eq!(session.brush(kind).amount(), 0.5);
        }
        session.set_brush("remove").unwrap();
        assert_eq!(session.brush_size(), 4.0);
        assert_eq!(session.brush_amount(), 0.5);
    }

    #[test]
    fn test_sculpt_at_center_scenario() {
        let mut session = session_with_terrain();
        session.set_profile("constant").unwrap();
        session.set_brush_size(2.0);
        session.set_brush_amount(1.0);

        let outcome = session.sculpt_at(Vec3::ZERO).unwrap();
        assert_eq!(outcome.unique_vertices, 1);

        let surface = session.current_mesh().unwrap();
        assert_eq!(surface.displacement(VertexId(55)), Some(1.0));
        let height = surface.geometry().position(VertexId(55)).unwrap().y;
        assert!((height - 1.0).abs() < EPS);
    }

    #[test]
    fn test_add_then_remove_via_session() {
        let mut session = session_with_terrain();
        session.set_brush_size(3.0);
        session.set_brush_amount(0.4);
        let position = Vec3::new(-1.0, 0.0, 2.0);

        session.sculpt_at(position).unwrap();
        session.set_brush("remove").unwrap();
        session.sculpt_at(position).unwrap();

        let surface = session.current_mesh().unwrap();
        assert!(surface.composite().iter().all(|&v| v.abs() < EPS));
    }

    #[test]
    fn test_profiles() {
        let mut session = SculptSession::new();
        assert_eq!(
            session.set_profile("gaussian"),
            Err(SculptError::UnknownProfile("gaussian".to_string()))
        );
        assert_eq!(session.profile_kind(), Some(ProfileKind::Cosine));

        session.set_custom_profile(Box::new(Linear));
        assert_eq!(session.profile_kind(), None);
        assert!((session.profile().value(0.25) - 0.75).abs() < EPS);
    }

    #[test]
    fn test_custom_profile_drives_sculpt() {
        let mut session = session_with_terrain();
        session.set_custom_profile(Box::new(Linear));
        session.set_brush_size(4.0);
        session.sculpt_at(Vec3::ZERO).unwrap();

        let surface = session.current_mesh().unwrap();
        assert!((surface.displacement(VertexId(55)).unwrap() - 1.0).abs() < EPS);
        assert!((surface.displacement(VertexId(56)).unwrap() - 0.5).abs() < EPS);
    }

    #[test]
    fn test_cursor_follows_current_brush() {
        let mut session = session_with_terrain();
        session.show_cursor();
        session.update_cursor(Vec3::new(1.0, 0.0, 1.0));
        assert!(session.brush(BrushKind::Add).cursor().is_visible());

        session.set_brush("flatten").unwrap();
        assert!(!session.brush(BrushKind::Add).cursor().is_visible());
        let cursor = session.brush(BrushKind::Flatten).cursor();
        assert!(cursor.is_visible());
        assert_eq!(cursor.position(), Vec3::new(1.0, 0.0, 1.0));

        session.hide_cursor();
        assert!(!session.brush(BrushKind::Flatten).cursor().is_visible());
    }

    #[test]
    fn test_cursor_does_not_touch_surface() {
        let mut session = session_with_terrain();
        session.set_brush_size(2.0);
        session.sculpt_at(Vec3::ZERO).unwrap();
        let before = session.current_mesh().unwrap().composite().to_vec();

        session.update_cursor(Vec3::new(0.0, 5.0, 0.0));
        assert_eq!(session.current_mesh().unwrap().composite(), before.as_slice());

        // No mesh selected: the cursor still moves
        session.remove_mesh("terrain").unwrap();
        session.update_cursor(Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(
            session.brush(BrushKind::Add).cursor().position(),
            Vec3::new(2.0, 0.0, 0.0)
        );
    }

    #[test]
    fn test_two_layer_clear_scenario() {
        let mut session = SculptSession::new();
        session
            .add_mesh("terrain", LayeredSurface::terrain(10.0, 10).unwrap())
            .unwrap();
        session.add_layer("b").unwrap();
        session.add_layer("a").unwrap();

        let surface = session.current_mesh_mut().unwrap();
        surface.fill_layer("a", 2.0).unwrap();
        surface.fill_layer("b", 3.0).unwrap();
        assert!(surface.composite().iter().all(|&v| (v - 5.0).abs() < EPS));

        session.clear_current_layer().unwrap();
        let surface = session.current_mesh().unwrap();
        assert!(surface.composite().iter().all(|&v| (v - 3.0).abs() < EPS));
    }

    #[test]
    fn test_apply_commands() {
        let mut session = session_with_terrain();
        let commands = [
            SculptCommand::SetProfile { name: "constant".to_string() },
            SculptCommand::SetBrushSize { size: 2.0 },
            SculptCommand::SetBrushAmount { amount: 0.5 },
            SculptCommand::AddLayer { name: "detail".to_string() },
            SculptCommand::ShowCursor,
            SculptCommand::UpdateCursor { position: [0.0, 0.0, 0.0] },
        ];
        for command in commands {
            assert_eq!(session.apply(command), Ok(None));
        }

        let outcome = session
            .apply(SculptCommand::SculptAt { position: [0.0, 0.0, 0.0] })
            .unwrap()
            .unwrap();
        assert_eq!(outcome.samples, 1);

        let surface = session.current_mesh().unwrap();
        assert_eq!(surface.layer("detail").unwrap().value(55), Some(0.5));
        assert_eq!(surface.layer("base").unwrap().value(55), Some(0.0));

        session
            .apply(SculptCommand::SelectLayer { name: "base".to_string() })
            .unwrap();
        session.apply(SculptCommand::ClearLayer).unwrap();
        assert_eq!(
            session.apply(SculptCommand::SetBrush { name: "pinch".to_string() }),
            Err(SculptError::UnknownBrush("pinch".to_string()))
        );
        session.apply(SculptCommand::HideCursor).unwrap();
        assert!(!session.brush(BrushKind::Add).cursor().is_visible());
    }

    #[test]
    fn test_far_away_sculpt_changes_nothing() {
        let mut session = session_with_terrain();
        session.current_mesh_mut().unwrap().fill_layer("base", 0.5).unwrap();
        session.set_brush_size(2.0);

        for kind in BrushKind::ALL {
            session.select_brush(kind);
            for position in [
                Vec3::new(0.0, 0.0, 1e30),
                Vec3::new(0.0, 0.0, -1e30),
                Vec3::new(1e30, 0.0, 0.0),
                Vec3::new(-1e30, 0.0, -1e30),
            ] {
                let outcome = session.sculpt_at(position).unwrap();
                assert!(outcome.is_empty(), "{kind} at {position:?}");
            }
        }

        let surface = session.current_mesh().unwrap();
        assert!(surface.composite().iter().all(|&v| (v - 0.5).abs() < EPS));
    }

    #[test]
    fn test_far_away_cursor_keeps_heights() {
        let mut session = session_with_terrain();
        session.show_cursor();
        session.update_cursor(Vec3::new(0.0, 0.0, -1e30));
        session.update_cursor(Vec3::new(1e30, 0.0, 0.0));

        let cursor = session.brush(BrushKind::Add).cursor();
        assert_eq!(cursor.position(), Vec3::new(1e30, 0.0, 0.0));
        assert!(session.current_mesh().unwrap().composite().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_brush_larger_than_terrain() {
        let mut session = session_with_terrain();
        session.set_profile("constant").unwrap();
        session.set_brush_size(1.0e5);

        let outcome = session.sculpt_at(Vec3::ZERO).unwrap();
        assert_eq!(outcome.unique_vertices, 100);
        let surface = session.current_mesh().unwrap();
        assert!(surface.composite().iter().all(|&v| v >= 1.0 - EPS));

        session.set_brush_size(f32::MAX);
        for kind in BrushKind::ALL {
            session.select_brush(kind);
            session.sculpt_at(Vec3::ZERO).unwrap();
        }
    }
}
