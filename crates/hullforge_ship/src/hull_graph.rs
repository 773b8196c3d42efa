// SPDX-License-Identifier: MIT OR Apache-2.0
//! Ship hull graph: a node graph over the ship's element stores.
//!
//! The graph decides how meshes are assembled; the element stores decide what
//! is assembled. Editing either side invalidates the compiled schedule.

use crate::defaults;
use crate::elements::{
    ControlPoint, Element, ElementId, ElementStores, Hardpoint, IdAllocator, InteriorSection,
    ShipLight, VisualFeature,
};
use crate::hull_data::ShipHullData;
use crate::learning::{EditRecord, LearningProfile};
use crate::mesh::MeshData;
use crate::nodes::{ShipNodeKind, SEGMENTS_PROPERTY};
use crate::settings::GenerationSettings;
use glam::Vec3;
use hullforge_graph::{CompileError, Edge, ExecuteError, Graph, Node, NodeId, PortIndex};

/// Node IDs of the standard assembly pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultPipeline {
    /// Hull loft
    pub hull: NodeId,
    /// Turret mounts
    pub turrets: NodeId,
    /// Light markers
    pub lights: NodeId,
    /// Interior rooms
    pub interiors: NodeId,
    /// Visual features
    pub visuals: NodeId,
    /// Merge chain, hull side first
    pub merges: [NodeId; 4],
    /// Final output
    pub output: NodeId,
}

/// Node graph plus the editable elements it assembles
#[derive(Debug, Clone)]
pub struct ShipHullGraph {
    graph: Graph<ShipNodeKind>,
    elements: ElementStores,
    edit_history: Vec<EditRecord>,
}

impl ShipHullGraph {
    /// Create an empty ship graph
    pub fn new() -> Self {
        Self {
            graph: Graph::new("Ship Hull"),
            elements: ElementStores::default(),
            edit_history: Vec::new(),
        }
    }

    /// Underlying node graph
    pub fn graph(&self) -> &Graph<ShipNodeKind> {
        &self.graph
    }

    /// Element stores
    pub fn elements(&self) -> &ElementStores {
        &self.elements
    }

    // Nodes and edges

    /// Add a node
    pub fn add_node(&mut self, kind: ShipNodeKind) -> NodeId {
        self.graph.add_node(kind)
    }

    /// Set a node property; returns whether the node exists
    pub fn set_node_property(
        &mut self,
        node_id: NodeId,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> bool {
        self.graph.set_node_property(node_id, key, value)
    }

    /// Remove a node and every edge touching it
    pub fn remove_node(&mut self, node_id: NodeId) -> Option<Node<ShipNodeKind>> {
        self.graph.remove_node(node_id)
    }

    /// Add an edge; endpoints are checked at compile time
    pub fn add_edge(&mut self, edge: Edge) {
        self.graph.add_edge(edge);
    }

    /// Connect `from:from_port` to `to:to_port`
    pub fn connect(&mut self, from: NodeId, from_port: PortIndex, to: NodeId, to_port: PortIndex) {
        self.graph.add_edge(Edge::new(from, from_port, to, to_port));
    }

    /// Remove an edge
    pub fn remove_edge(&mut self, edge: &Edge) -> bool {
        self.graph.remove_edge(edge)
    }

    /// Number of nodes
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Compile the node graph
    pub fn compile(&mut self) -> Result<(), CompileError> {
        self.graph.compile()
    }

    /// Whether the graph is compiled
    pub fn is_compiled(&self) -> bool {
        self.graph.is_compiled()
    }

    /// Run the compiled graph against the current elements
    pub fn execute(&mut self) -> Result<(), ExecuteError> {
        self.graph.execute(&self.elements)
    }

    /// Mesh produced by the first `Output` node in the last execution
    pub fn output(&self) -> Option<&MeshData> {
        let output = self
            .graph
            .nodes()
            .find(|node| node.kind == ShipNodeKind::Output)?;
        self.graph.output(output.id, 0)
    }

    /// Replace the node graph with the standard ten-node assembly.
    ///
    /// Generators feed a chain of merges in the order hull, turrets, lights,
    /// interiors, visuals; the last merge feeds the output.
    pub fn setup_default_pipeline(&mut self, segments: u32) -> DefaultPipeline {
        self.graph = Graph::new("Ship Hull");

        let hull = self.add_node(ShipNodeKind::HullSpline);
        self.set_node_property(hull, SEGMENTS_PROPERTY, segments.to_string());
        let turrets = self.add_node(ShipNodeKind::TurretMount);
        let lights = self.add_node(ShipNodeKind::LightFixture);
        let interiors = self.add_node(ShipNodeKind::InteriorVolume);
        let visuals = self.add_node(ShipNodeKind::VisualAttachment);
        let merges = [
            self.add_node(ShipNodeKind::Merge),
            self.add_node(ShipNodeKind::Merge),
            self.add_node(ShipNodeKind::Merge),
            self.add_node(ShipNodeKind::Merge),
        ];
        let output = self.add_node(ShipNodeKind::Output);

        self.connect(hull, 0, merges[0], 0);
        self.connect(turrets, 0, merges[0], 1);
        for (pair, source) in merges.windows(2).zip([lights, interiors, visuals]) {
            self.connect(pair[0], 0, pair[1], 0);
            self.connect(source, 0, pair[1], 1);
        }
        self.connect(merges[3], 0, output, 0);

        DefaultPipeline {
            hull,
            turrets,
            lights,
            interiors,
            visuals,
            merges,
            output,
        }
    }

    // Control points

    /// Add a control point
    pub fn add_control_point(&mut self, cp: ControlPoint) -> ElementId {
        self.graph.invalidate();
        self.elements.control_points.insert(cp, &mut self.elements.ids)
    }

    /// Move a control point, returning its previous position
    pub fn move_control_point(&mut self, id: ElementId, position: Vec3) -> Option<Vec3> {
        let old = self.elements.control_points.move_to(id, position)?;
        self.graph.invalidate();
        Some(old)
    }

    /// Change a control point's radius, returning the previous radius
    pub fn set_control_point_radius(&mut self, id: ElementId, radius: f32) -> Option<f32> {
        let cp = self.elements.control_points.get_mut(id)?;
        let old = std::mem::replace(&mut cp.radius, radius);
        self.graph.invalidate();
        Some(old)
    }

    /// Remove a control point
    pub fn remove_control_point(&mut self, id: ElementId) -> Option<ControlPoint> {
        let removed = self.elements.control_points.remove(id)?;
        self.graph.invalidate();
        Some(removed)
    }

    /// Control points in spine order
    pub fn control_points(&self) -> &[ControlPoint] {
        self.elements.control_points.as_slice()
    }

    /// Get a control point
    pub fn control_point(&self, id: ElementId) -> Option<&ControlPoint> {
        self.elements.control_points.get(id)
    }

    // Hardpoints

    /// Add a hardpoint
    pub fn add_hardpoint(&mut self, hp: Hardpoint) -> ElementId {
        self.graph.invalidate();
        self.elements.hardpoints.insert(hp, &mut self.elements.ids)
    }

    /// Move a hardpoint, returning its previous position
    pub fn move_hardpoint(&mut self, id: ElementId, position: Vec3) -> Option<Vec3> {
        let old = self.elements.hardpoints.move_to(id, position)?;
        self.graph.invalidate();
        Some(old)
    }

    /// Remove a hardpoint
    pub fn remove_hardpoint(&mut self, id: ElementId) -> Option<Hardpoint> {
        let removed = self.elements.hardpoints.remove(id)?;
        self.graph.invalidate();
        Some(removed)
    }

    /// All hardpoints
    pub fn hardpoints(&self) -> &[Hardpoint] {
        self.elements.hardpoints.as_slice()
    }

    // Lights

    /// Add a light
    pub fn add_light(&mut self, light: ShipLight) -> ElementId {
        self.graph.invalidate();
        self.elements.lights.insert(light, &mut self.elements.ids)
    }

    /// Move a light, returning its previous position
    pub fn move_light(&mut self, id: ElementId, position: Vec3) -> Option<Vec3> {
        let old = self.elements.lights.move_to(id, position)?;
        self.graph.invalidate();
        Some(old)
    }

    /// Remove a light
    pub fn remove_light(&mut self, id: ElementId) -> Option<ShipLight> {
        let removed = self.elements.lights.remove(id)?;
        self.graph.invalidate();
        Some(removed)
    }

    /// All lights
    pub fn lights(&self) -> &[ShipLight] {
        self.elements.lights.as_slice()
    }

    // Interiors

    /// Add an interior section
    pub fn add_interior(&mut self, section: InteriorSection) -> ElementId {
        self.graph.invalidate();
        self.elements.interiors.insert(section, &mut self.elements.ids)
    }

    /// Remove an interior section
    pub fn remove_interior(&mut self, id: ElementId) -> Option<InteriorSection> {
        let removed = self.elements.interiors.remove(id)?;
        self.graph.invalidate();
        Some(removed)
    }

    /// All interior sections
    pub fn interiors(&self) -> &[InteriorSection] {
        self.elements.interiors.as_slice()
    }

    // Visual features

    /// Add a visual feature
    pub fn add_visual_feature(&mut self, feature: VisualFeature) -> ElementId {
        self.graph.invalidate();
        self.elements.visual_features.insert(feature, &mut self.elements.ids)
    }

    /// Remove a visual feature
    pub fn remove_visual_feature(&mut self, id: ElementId) -> Option<VisualFeature> {
        let removed = self.elements.visual_features.remove(id)?;
        self.graph.invalidate();
        Some(removed)
    }

    /// All visual features
    pub fn visual_features(&self) -> &[VisualFeature] {
        self.elements.visual_features.as_slice()
    }

    // Generation

    /// Replace every element with the seeded defaults for `class`
    pub fn generate_from_seed(&mut self, seed: u64, class: &str) {
        self.generate_with_settings(seed, class, &GenerationSettings::default());
    }

    /// Replace every element with seeded defaults using explicit slot counts
    /// and default features.
    ///
    /// Generated elements get fresh IDs from the graph's allocator, so IDs
    /// handed out before generation are never reused.
    pub fn generate_with_settings(
        &mut self,
        seed: u64,
        class: &str,
        settings: &GenerationSettings,
    ) {
        let ids = &mut self.elements.ids;

        self.elements.control_points.replace(stamp(
            defaults::generate_default_control_points(seed, class),
            ids,
        ));
        self.elements.hardpoints.replace(stamp(
            defaults::generate_default_hardpoints(
                seed,
                class,
                settings.turret_slots,
                settings.launcher_slots,
            ),
            ids,
        ));
        self.elements
            .interiors
            .replace(stamp(defaults::generate_default_interiors(class), ids));
        self.elements
            .lights
            .replace(stamp(defaults::generate_default_lights(class), ids));
        self.elements
            .visual_features
            .replace(stamp(settings.default_features.clone(), ids));

        self.graph.invalidate();
        tracing::info!(
            "Generated {} elements for {} (seed {})",
            self.elements.element_count(),
            class,
            seed
        );
    }

    // Learning

    /// Append an edit to the history
    pub fn record_edit(&mut self, record: EditRecord) {
        self.edit_history.push(record);
    }

    /// Edits in the order they were recorded
    pub fn edit_history(&self) -> &[EditRecord] {
        &self.edit_history
    }

    /// Scale control point radii towards the profile's average width.
    ///
    /// `blend` of 0 leaves the hull unchanged, 1 matches the learned width.
    /// Nothing happens without samples, control points, or a positive width
    /// on both sides.
    pub fn apply_learning_profile(&mut self, profile: &LearningProfile, blend: f32) {
        if !profile.has_samples() || self.elements.control_points.is_empty() {
            return;
        }

        let max_radius = self
            .elements
            .control_points
            .iter()
            .map(|cp| cp.radius)
            .fold(0.0_f32, f32::max);
        if max_radius <= 0.0 || profile.avg_hull_width <= 0.0 {
            return;
        }

        let scale = (profile.avg_hull_width / 2.0) / max_radius;
        let factor = 1.0 + blend * (scale - 1.0);
        for cp in self.elements.control_points.iter_mut() {
            cp.radius *= factor;
        }
        self.graph.invalidate();
        tracing::debug!(
            "Applied {} profile ({} samples): radius x{:.3}",
            profile.ship_class,
            profile.sample_count,
            factor
        );
    }

    // Import and export

    /// Snapshot the elements and the last output mesh.
    ///
    /// Ship metadata (ID, name, class, seed) is left empty for the caller.
    pub fn export_hull_data(&self) -> ShipHullData {
        ShipHullData {
            control_points: self.control_points().to_vec(),
            hardpoints: self.hardpoints().to_vec(),
            lights: self.lights().to_vec(),
            interiors: self.interiors().to_vec(),
            visual_features: self.visual_features().to_vec(),
            generated_mesh: self.output().cloned().unwrap_or_default(),
            ..ShipHullData::default()
        }
    }

    /// Replace every element with the design's elements.
    ///
    /// Imported elements get fresh IDs from the graph's allocator, so a file
    /// with duplicate IDs still loads into a consistent store and IDs handed
    /// out before the import are never reused.
    pub fn import_hull_data(&mut self, data: &ShipHullData) {
        let ids = &mut self.elements.ids;
        self.elements
            .control_points
            .replace(stamp(data.control_points.clone(), ids));
        self.elements
            .hardpoints
            .replace(stamp(data.hardpoints.clone(), ids));
        self.elements.lights.replace(stamp(data.lights.clone(), ids));
        self.elements
            .interiors
            .replace(stamp(data.interiors.clone(), ids));
        self.elements
            .visual_features
            .replace(stamp(data.visual_features.clone(), ids));

        self.graph.invalidate();
        tracing::debug!("Imported {} elements", self.elements.element_count());
    }
}

impl Default for ShipHullGraph {
    fn default() -> Self {
        Self::new()
    }
}

fn stamp<T: Element>(mut items: Vec<T>, ids: &mut IdAllocator) -> Vec<T> {
    for item in &mut items {
        item.set_id(ids.allocate());
    }
    items
}
