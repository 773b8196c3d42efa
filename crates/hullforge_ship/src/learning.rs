// SPDX-License-Identifier: MIT OR Apache-2.0
//! Edit history and learned generation profiles.
//!
//! Finished designs are folded into per-class running averages. Those
//! averages nudge freshly generated hulls towards what users ended up
//! building.

use crate::elements::ElementId;
use crate::hull_data::ShipHullData;
use glam::Vec3;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

/// Default weight of the learned profile when applied to a new hull
pub const DEFAULT_LEARNING_BLEND: f32 = 0.3;

/// What a user edit changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditKind {
    /// Control point dragged
    MoveControlPoint,
    /// Control point radius changed
    ResizeControlPoint,
    /// Hardpoint dragged
    MoveHardpoint,
    /// Light dragged
    MoveLight,
    /// Hardpoint added
    AddHardpoint,
    /// Light added
    AddLight,
    /// Element removed
    RemoveElement,
}

/// A single user edit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditRecord {
    /// Kind of edit
    pub kind: EditKind,
    /// Class of the ship being edited
    pub ship_class: String,
    /// Element the edit applied to
    pub target: ElementId,
    /// Value before the edit
    pub old_value: Vec3,
    /// Value after the edit
    pub new_value: Vec3,
    /// Seconds since the Unix epoch
    pub timestamp: u64,
}

impl EditRecord {
    /// Record an edit made now
    pub fn new(
        kind: EditKind,
        ship_class: impl Into<String>,
        target: ElementId,
        old_value: Vec3,
        new_value: Vec3,
    ) -> Self {
        Self {
            kind,
            ship_class: ship_class.into(),
            target,
            old_value,
            new_value,
            timestamp: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default()
                .as_secs(),
        }
    }
}

/// Running averages over finished designs of one class
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LearningProfile {
    /// Class the profile was learned from
    pub ship_class: String,
    /// Mean control point count
    pub avg_control_point_count: f32,
    /// Mean hull length along X
    pub avg_hull_length: f32,
    /// Mean hull width (twice the largest radius)
    pub avg_hull_width: f32,
    /// Mean hardpoint count
    pub avg_turret_count: f32,
    /// Mean light count
    pub avg_light_count: f32,
    /// Mean interior section count
    pub avg_interior_count: f32,
    /// Designs folded in so far
    pub sample_count: u32,
}

impl LearningProfile {
    /// Create an empty profile for a class
    pub fn new(ship_class: impl Into<String>) -> Self {
        Self {
            ship_class: ship_class.into(),
            ..Self::default()
        }
    }

    /// Fold one design into the running averages.
    ///
    /// Hull extents are only updated when the design has control points; the
    /// sample is counted either way.
    pub fn incorporate(&mut self, hull: &ShipHullData) {
        let n = self.sample_count as f32;
        let mean = |avg: f32, x: f32| (avg * n + x) / (n + 1.0);

        self.avg_control_point_count =
            mean(self.avg_control_point_count, hull.control_points.len() as f32);
        self.avg_turret_count = mean(self.avg_turret_count, hull.hardpoints.len() as f32);
        self.avg_light_count = mean(self.avg_light_count, hull.lights.len() as f32);
        self.avg_interior_count = mean(self.avg_interior_count, hull.interiors.len() as f32);

        if let (Some(length), Some(width)) = (hull.hull_length(), hull.hull_width()) {
            self.avg_hull_length = mean(self.avg_hull_length, length);
            self.avg_hull_width = mean(self.avg_hull_width, width);
        }

        self.sample_count += 1;
    }

    /// Whether any design has been folded in
    pub fn has_samples(&self) -> bool {
        self.sample_count > 0
    }
}

/// Learned profiles keyed by ship class
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProfileLibrary {
    profiles: IndexMap<String, LearningProfile>,
}

impl ProfileLibrary {
    /// Create an empty library
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a design into its class's profile
    pub fn incorporate(&mut self, hull: &ShipHullData) {
        self.profiles
            .entry(hull.ship_class.clone())
            .or_insert_with(|| LearningProfile::new(hull.ship_class.clone()))
            .incorporate(hull);
        tracing::debug!(
            "Learned from ship '{}' ({})",
            hull.ship_name,
            hull.ship_class
        );
    }

    /// Profile for a class
    pub fn get(&self, ship_class: &str) -> Option<&LearningProfile> {
        self.profiles.get(ship_class)
    }

    /// Profiles in first-learned order
    pub fn iter(&self) -> impl Iterator<Item = &LearningProfile> {
        self.profiles.values()
    }

    /// Number of classes with a profile
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// Whether nothing has been learned
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Load a library from a file
    pub fn load(path: &Path) -> std::io::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        ron::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
    }

    /// Save the library to a file
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let config = ron::ser::PrettyConfig::default().struct_names(true);
        let content = ron::ser::to_string_pretty(self, config)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        std::fs::write(path, content)
    }
}
