// SPDX-License-Identifier: MIT OR Apache-2.0
//! Ship hull node kinds and their evaluation.

use crate::elements::ElementStores;
use crate::mesh::MeshData;
use crate::primitives;
use hullforge_graph::{Node, NodeEvaluator, NodeKind, NodeOutput, Port, PortType};
use serde::{Deserialize, Serialize};

/// Property read by [`ShipNodeKind::HullSpline`]
pub const SEGMENTS_PROPERTY: &str = "segments";
/// Ring resolution when `segments` is unset or malformed
pub const DEFAULT_SEGMENTS: i32 = 8;

const NO_PORTS: &[Port] = &[];
const MESH_OUT: &[Port] = &[Port::new("Mesh", PortType::Mesh)];
const MERGE_IN: &[Port] = &[
    Port::new("A", PortType::Mesh),
    Port::new("B", PortType::Mesh),
];
const OUTPUT_IN: &[Port] = &[Port::new("Mesh", PortType::Mesh)];

/// Node kinds of the ship hull graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShipNodeKind {
    /// Lofts the hull from the control points
    HullSpline,
    /// One mount mesh per hardpoint
    TurretMount,
    /// One marker per light
    LightFixture,
    /// One inward box per interior section
    InteriorVolume,
    /// One wedge per visual feature
    VisualAttachment,
    /// Concatenates input A then input B
    Merge,
    /// Final mesh of the graph
    Output,
}

impl NodeKind for ShipNodeKind {
    type Value = MeshData;

    fn name(&self) -> &'static str {
        match self {
            ShipNodeKind::HullSpline => "Hull Spline",
            ShipNodeKind::TurretMount => "Turret Mount",
            ShipNodeKind::LightFixture => "Light Fixture",
            ShipNodeKind::InteriorVolume => "Interior Volume",
            ShipNodeKind::VisualAttachment => "Visual Attachment",
            ShipNodeKind::Merge => "Merge",
            ShipNodeKind::Output => "Output",
        }
    }

    fn inputs(&self) -> &'static [Port] {
        match self {
            ShipNodeKind::Merge => MERGE_IN,
            ShipNodeKind::Output => OUTPUT_IN,
            _ => NO_PORTS,
        }
    }

    fn outputs(&self) -> &'static [Port] {
        MESH_OUT
    }
}

/// Element stores drive every generator node; graph inputs are only read by
/// `Merge` and `Output`.
impl NodeEvaluator<ShipNodeKind> for ElementStores {
    fn evaluate(&self, node: &Node<ShipNodeKind>, inputs: &[MeshData]) -> NodeOutput<MeshData> {
        let input = |index: usize| inputs.get(index).cloned().unwrap_or_default();

        let mesh = match node.kind {
            ShipNodeKind::HullSpline => {
                let segments = node.parse_property(SEGMENTS_PROPERTY, DEFAULT_SEGMENTS);
                let segments = usize::try_from(segments).unwrap_or(0);
                primitives::hull_from_control_points(self.control_points.as_slice(), segments)
            }
            ShipNodeKind::TurretMount => self
                .hardpoints
                .iter()
                .map(|hp| primitives::turret_mount(hp.position, hp.direction, hp.size))
                .collect(),
            ShipNodeKind::LightFixture => self
                .lights
                .iter()
                .map(|light| primitives::light_fixture(light.position, light.interior))
                .collect(),
            ShipNodeKind::InteriorVolume => self
                .interiors
                .iter()
                .map(|room| primitives::interior_volume(room.bounds_min, room.bounds_max))
                .collect(),
            ShipNodeKind::VisualAttachment => self
                .visual_features
                .iter()
                .map(primitives::visual_feature)
                .collect(),
            ShipNodeKind::Merge => match inputs {
                [a, b, ..] => MeshData::merged(a, b),
                _ => input(0),
            },
            ShipNodeKind::Output => input(0),
        };

        NodeOutput::single(mesh)
    }
}
