// SPDX-License-Identifier: MIT OR Apache-2.0
//! Editing session for one ship design.
//!
//! Wraps a [`ShipHullGraph`] with the design's identity and settings. Edits
//! go through the session so they land in the edit history used for learning
//! and mark the design as modified.

use crate::elements::{
    ControlPoint, ElementId, Hardpoint, InteriorSection, ShipLight, VisualFeature,
};
use crate::hull_data::{HullDataError, ShipHullData};
use crate::hull_graph::ShipHullGraph;
use crate::learning::{EditKind, EditRecord, ProfileLibrary};
use crate::mesh::MeshData;
use crate::settings::GenerationSettings;
use glam::Vec3;
use hullforge_graph::{CompileError, ExecuteError};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Failure while rebuilding the ship mesh
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerateError {
    /// Graph did not compile
    #[error(transparent)]
    Compile(#[from] CompileError),

    /// Graph did not execute
    #[error(transparent)]
    Execute(#[from] ExecuteError),
}

/// One ship being edited
#[derive(Debug, Clone)]
pub struct ShipEditSession {
    ship_id: String,
    ship_name: String,
    ship_class: String,
    seed: u64,
    graph: ShipHullGraph,
    settings: GenerationSettings,
    dirty: bool,
}

impl ShipEditSession {
    /// Start a new design from seeded defaults and the standard pipeline
    pub fn new_ship(class: &str, seed: u64, settings: GenerationSettings) -> Self {
        let mut graph = ShipHullGraph::new();
        graph.generate_with_settings(seed, class, &settings);
        graph.setup_default_pipeline(settings.hull_segments);

        let ship_id = Uuid::new_v4().to_string();
        tracing::info!("New {} ship {} (seed {})", class, ship_id, seed);

        Self {
            ship_name: format!("New {class}"),
            ship_id,
            ship_class: class.to_string(),
            seed,
            graph,
            settings,
            dirty: true,
        }
    }

    /// Open a saved design
    pub fn load(data: &ShipHullData, settings: GenerationSettings) -> Result<Self, HullDataError> {
        if !data.is_valid() {
            return Err(HullDataError::Invalid(data.ship_id.clone()));
        }

        let mut graph = ShipHullGraph::new();
        graph.import_hull_data(data);
        graph.setup_default_pipeline(settings.hull_segments);
        tracing::info!("Opened ship '{}' ({})", data.ship_name, data.ship_id);

        Ok(Self {
            ship_id: data.ship_id.clone(),
            ship_name: data.ship_name.clone(),
            ship_class: data.ship_class.clone(),
            seed: data.seed,
            graph,
            settings,
            dirty: false,
        })
    }

    /// Snapshot the design, including the last generated mesh
    pub fn export(&self) -> ShipHullData {
        ShipHullData {
            ship_id: self.ship_id.clone(),
            ship_name: self.ship_name.clone(),
            ship_class: self.ship_class.clone(),
            seed: self.seed,
            ..self.graph.export_hull_data()
        }
    }

    /// Save the design into a library directory and mark it clean
    pub fn save_to_dir(&mut self, dir: &Path) -> Result<PathBuf, HullDataError> {
        let data = self.export();
        let path = data.file_path(dir);
        data.save(&path)?;
        self.dirty = false;
        Ok(path)
    }

    /// Compile if needed, execute, and return the output mesh
    pub fn compile_and_generate(&mut self) -> Result<&MeshData, GenerateError> {
        if !self.graph.is_compiled() {
            self.graph.compile()?;
        }
        self.graph.execute()?;

        let mesh = self.graph.output();
        if let Some(mesh) = mesh {
            tracing::debug!(
                "Generated {}: {} vertices, {} triangles",
                self.ship_name,
                mesh.vertex_count(),
                mesh.triangle_count()
            );
        }
        // a pipeline without an Output node executes but yields nothing
        Ok(mesh.unwrap_or(&EMPTY_MESH))
    }

    /// Add a control point at the end of the spine
    pub fn add_control_point(&mut self, cp: ControlPoint) -> ElementId {
        self.dirty = true;
        self.graph.add_control_point(cp)
    }

    /// Remove a control point
    pub fn remove_control_point(&mut self, id: ElementId) -> bool {
        let old = self.graph.remove_control_point(id).map(|cp| cp.position);
        self.record(EditKind::RemoveElement, id, old, Vec3::ZERO)
    }

    /// Add a hardpoint
    pub fn add_hardpoint(&mut self, hp: Hardpoint) -> ElementId {
        let position = hp.position;
        let id = self.graph.add_hardpoint(hp);
        self.record(EditKind::AddHardpoint, id, Some(Vec3::ZERO), position);
        id
    }

    /// Remove a hardpoint
    pub fn remove_hardpoint(&mut self, id: ElementId) -> bool {
        let old = self.graph.remove_hardpoint(id).map(|hp| hp.position);
        self.record(EditKind::RemoveElement, id, old, Vec3::ZERO)
    }

    /// Add a light
    pub fn add_light(&mut self, light: ShipLight) -> ElementId {
        let position = light.position;
        let id = self.graph.add_light(light);
        self.record(EditKind::AddLight, id, Some(Vec3::ZERO), position);
        id
    }

    /// Remove a light
    pub fn remove_light(&mut self, id: ElementId) -> bool {
        let old = self.graph.remove_light(id).map(|light| light.position);
        self.record(EditKind::RemoveElement, id, old, Vec3::ZERO)
    }

    /// Add an interior section
    pub fn add_interior(&mut self, section: InteriorSection) -> ElementId {
        self.dirty = true;
        self.graph.add_interior(section)
    }

    /// Remove an interior section; the edit is recorded at its center
    pub fn remove_interior(&mut self, id: ElementId) -> bool {
        let old = self.graph.remove_interior(id).map(|room| room.center());
        self.record(EditKind::RemoveElement, id, old, Vec3::ZERO)
    }

    /// Add a visual feature
    pub fn add_visual_feature(&mut self, feature: VisualFeature) -> ElementId {
        self.dirty = true;
        self.graph.add_visual_feature(feature)
    }

    /// Remove a visual feature
    pub fn remove_visual_feature(&mut self, id: ElementId) -> bool {
        let old = self.graph.remove_visual_feature(id).map(|f| f.position);
        self.record(EditKind::RemoveElement, id, old, Vec3::ZERO)
    }

    /// Drag a control point
    pub fn move_control_point(&mut self, id: ElementId, position: Vec3) -> bool {
        let old = self.graph.move_control_point(id, position);
        self.record(EditKind::MoveControlPoint, id, old, position)
    }

    /// Drag a hardpoint
    pub fn move_hardpoint(&mut self, id: ElementId, position: Vec3) -> bool {
        let old = self.graph.move_hardpoint(id, position);
        self.record(EditKind::MoveHardpoint, id, old, position)
    }

    /// Drag a light
    pub fn move_light(&mut self, id: ElementId, position: Vec3) -> bool {
        let old = self.graph.move_light(id, position);
        self.record(EditKind::MoveLight, id, old, position)
    }

    /// Resize a control point; radii are recorded in the X component
    pub fn set_control_point_radius(&mut self, id: ElementId, radius: f32) -> bool {
        let old = self
            .graph
            .set_control_point_radius(id, radius)
            .map(|r| Vec3::new(r, 0.0, 0.0));
        self.record(
            EditKind::ResizeControlPoint,
            id,
            old,
            Vec3::new(radius, 0.0, 0.0),
        )
    }

    fn record(&mut self, kind: EditKind, id: ElementId, old: Option<Vec3>, new: Vec3) -> bool {
        let Some(old) = old else {
            tracing::warn!("Ignored {:?}: no element {}", kind, id);
            return false;
        };
        let record = EditRecord::new(kind, self.ship_class.clone(), id, old, new);
        self.graph.record_edit(record);
        self.dirty = true;
        true
    }

    /// Whether any interior section offers a cockpit view
    pub fn has_cockpit(&self) -> bool {
        self.graph.interiors().iter().any(|section| section.has_cockpit)
    }

    /// Fold the current design into the library
    pub fn learn_into(&self, library: &mut ProfileLibrary) {
        library.incorporate(&self.export());
    }

    /// Nudge the hull towards the learned profile for this class
    pub fn apply_learning(&mut self, library: &ProfileLibrary) -> bool {
        let Some(profile) = library.get(&self.ship_class) else {
            return false;
        };
        self.graph
            .apply_learning_profile(profile, self.settings.clamped_blend());
        self.dirty = true;
        true
    }

    /// Rename the design
    pub fn rename(&mut self, name: impl Into<String>) {
        self.ship_name = name.into();
        self.dirty = true;
    }

    /// Whether the design changed since it was opened or last marked clean
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Mark the design as saved
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// One-line description: class, name, element counts and a
    /// `(modified)` marker for unsaved changes
    pub fn summary(&self) -> String {
        let mut summary = self.ship_class.clone();
        if !self.ship_name.is_empty() {
            summary.push_str(&format!(" '{}'", self.ship_name));
        }
        summary.push_str(&format!(
            ": {} hull points, {} hardpoints, {} lights, {} rooms, {} features",
            self.graph.control_points().len(),
            self.graph.hardpoints().len(),
            self.graph.lights().len(),
            self.graph.interiors().len(),
            self.graph.visual_features().len()
        ));
        if self.dirty {
            summary.push_str(" (modified)");
        }
        summary
    }

    /// Design ID
    pub fn ship_id(&self) -> &str {
        &self.ship_id
    }

    /// Display name
    pub fn ship_name(&self) -> &str {
        &self.ship_name
    }

    /// Class name
    pub fn ship_class(&self) -> &str {
        &self.ship_class
    }

    /// Generation seed
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Ship graph
    pub fn graph(&self) -> &ShipHullGraph {
        &self.graph
    }

    /// Mutable ship graph for structural edits; these bypass dirty tracking
    pub fn graph_mut(&mut self) -> &mut ShipHullGraph {
        &mut self.graph
    }

    /// Active settings
    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }
}

static EMPTY_MESH: MeshData = MeshData {
    vertices: Vec::new(),
    normals: Vec::new(),
    indices: Vec::new(),
};
