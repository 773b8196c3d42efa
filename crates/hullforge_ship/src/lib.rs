// SPDX-License-Identifier: MIT OR Apache-2.0
//! Procedural ship hulls for Hullforge.
//!
//! A ship is a set of editable elements (control points, hardpoints, lights,
//! interior sections, visual features) plus a node graph that assembles them
//! into one mesh.
//!
//! ## Architecture
//!
//! - [`primitives`]: pure mesh synthesis (hull loft, boxes, markers, mounts)
//! - [`defaults`]: seeded per-class element layouts
//! - [`nodes`]: ship node kinds and their evaluator
//! - [`ShipHullGraph`]: graph + element stores + edit history
//! - [`learning`]: running per-class averages fed back into generation
//! - [`ShipEditSession`]: one design being edited, with identity and settings

pub mod mesh;
pub mod elements;
pub mod rng;
pub mod primitives;
pub mod defaults;
pub mod nodes;
pub mod hull_graph;
pub mod hull_data;
pub mod learning;
pub mod settings;
pub mod session;

pub use glam::Vec3;
pub use mesh::MeshData;
pub use elements::{
    ControlPoint, ElementId, FeatureKind, Hardpoint, InteriorSection, LightKind, MountSize,
    ShipLight, VisualFeature, WeaponType,
};
pub use defaults::{HullProfile, ShipClass};
pub use nodes::ShipNodeKind;
pub use hull_graph::{DefaultPipeline, ShipHullGraph};
pub use hull_data::{HullDataError, ShipHullData};
pub use learning::{EditKind, EditRecord, LearningProfile, ProfileLibrary};
pub use settings::{GenerationSettings, SettingsError};
pub use session::{GenerateError, ShipEditSession};
