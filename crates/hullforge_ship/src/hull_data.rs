// SPDX-License-Identifier: MIT OR Apache-2.0
//! Complete ship hull definition and its RON file format.
//!
//! Element data is the persistence boundary: the node graph itself is rebuilt
//! from the default pipeline when a design is loaded.

use crate::elements::{ControlPoint, Hardpoint, InteriorSection, ShipLight, VisualFeature};
use crate::mesh::MeshData;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File extension for saved ship designs
pub const HULL_FILE_EXTENSION: &str = "ship.ron";

/// Everything needed to rebuild or render one ship design
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ShipHullData {
    /// Design identifier
    pub ship_id: String,
    /// Display name
    pub ship_name: String,
    /// Class name ("Frigate", "Cruiser", ...)
    pub ship_class: String,
    /// Seed the defaults were generated from
    pub seed: u64,
    /// Hull spine
    pub control_points: Vec<ControlPoint>,
    /// Weapon mounts
    pub hardpoints: Vec<Hardpoint>,
    /// Lights
    pub lights: Vec<ShipLight>,
    /// Walkable sections
    pub interiors: Vec<InteriorSection>,
    /// Hull attachments
    pub visual_features: Vec<VisualFeature>,
    /// Mesh from the last graph execution
    #[serde(default)]
    pub generated_mesh: MeshData,
}

impl ShipHullData {
    /// A design needs an ID and at least one control point
    pub fn is_valid(&self) -> bool {
        !self.control_points.is_empty() && !self.ship_id.is_empty()
    }

    /// Extent of the control points along X
    pub fn hull_length(&self) -> Option<f32> {
        let mut xs = self.control_points.iter().map(|cp| cp.position.x);
        let first = xs.next()?;
        let (min, max) = xs.fold((first, first), |(lo, hi), x| (lo.min(x), hi.max(x)));
        Some(max - min)
    }

    /// Twice the largest control point radius
    pub fn hull_width(&self) -> Option<f32> {
        if self.control_points.is_empty() {
            return None;
        }
        let max_radius = self
            .control_points
            .iter()
            .map(|cp| cp.radius)
            .fold(0.0_f32, f32::max);
        Some(max_radius * 2.0)
    }

    /// Serialize to RON format
    pub fn to_ron(&self) -> Result<String, HullDataError> {
        let config = ron::ser::PrettyConfig::default()
            .struct_names(true)
            .enumerate_arrays(false);
        Ok(ron::ser::to_string_pretty(self, config)?)
    }

    /// Deserialize from RON format
    pub fn from_ron(s: &str) -> Result<Self, HullDataError> {
        Ok(ron::from_str(s)?)
    }

    /// Path of this design's file inside a library directory
    pub fn file_path(&self, dir: &Path) -> PathBuf {
        dir.join(format!("{}.{}", self.ship_id, HULL_FILE_EXTENSION))
    }

    /// Save the design to a file
    pub fn save(&self, path: &Path) -> Result<(), HullDataError> {
        if !self.is_valid() {
            return Err(HullDataError::Invalid(self.ship_id.clone()));
        }
        std::fs::write(path, self.to_ron()?)?;
        tracing::info!("Saved ship '{}' to {:?}", self.ship_name, path);
        Ok(())
    }

    /// Load a design from a file
    pub fn load(path: &Path) -> Result<Self, HullDataError> {
        let contents = std::fs::read_to_string(path)?;
        let data = Self::from_ron(&contents)?;
        if !data.is_valid() {
            return Err(HullDataError::Invalid(data.ship_id));
        }
        tracing::info!("Loaded ship '{}' from {:?}", data.ship_name, path);
        Ok(data)
    }
}

/// Error reading or writing ship designs
#[derive(Debug, thiserror::Error)]
pub enum HullDataError {
    /// File could not be read or written
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Design could not be serialized
    #[error("Failed to serialize ship: {0}")]
    Serialize(#[from] ron::Error),

    /// File is not a valid design
    #[error("Failed to parse ship: {0}")]
    Deserialize(#[from] ron::error::SpannedError),

    /// Design has no ID or no control points
    #[error("Invalid ship design '{0}'")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::ElementId;
    use glam::Vec3;

    fn sample() -> ShipHullData {
        let mut cp = ControlPoint::new(Vec3::new(-4.0, 0.0, 0.0), 0.5);
        cp.id = ElementId(1);
        let mut mid = ControlPoint::new(Vec3::new(4.0, 0.0, 0.0), 1.25);
        mid.id = ElementId(2);
        ShipHullData {
            ship_id: "ship-1".to_string(),
            ship_name: "Wayfarer".to_string(),
            ship_class: "Frigate".to_string(),
            seed: 42,
            control_points: vec![cp, mid],
            ..ShipHullData::default()
        }
    }

    #[test]
    fn test_validity() {
        assert!(sample().is_valid());
        assert!(!ShipHullData::default().is_valid());

        let mut no_id = sample();
        no_id.ship_id.clear();
        assert!(!no_id.is_valid());
    }

    #[test]
    fn test_extents() {
        let data = sample();
        assert_eq!(data.hull_length(), Some(8.0));
        assert_eq!(data.hull_width(), Some(2.5));
        assert_eq!(ShipHullData::default().hull_length(), None);
    }

    #[test]
    fn test_ron_round_trip() {
        let data = sample();
        let text = data.to_ron().unwrap();
        assert!(text.contains("Wayfarer"));
        assert_eq!(ShipHullData::from_ron(&text).unwrap(), data);
    }

    #[test]
    fn test_parse_error() {
        let err = ShipHullData::from_ron("(ship_id: ").unwrap_err();
        assert!(matches!(err, HullDataError::Deserialize(_)));
    }

    #[test]
    fn test_save_rejects_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("invalid.ship.ron");
        let err = ShipHullData::default().save(&path).unwrap_err();
        assert!(matches!(err, HullDataError::Invalid(_)));
        assert!(!path.exists());
    }

    #[test]
    fn test_file_path_uses_ship_id() {
        let dir = tempfile::tempdir().unwrap();
        let data = sample();
        let path = data.file_path(dir.path());
        assert_eq!(
            path,
            dir.path().join(format!("{}.ship.ron", data.ship_id))
        );

        data.save(&path).unwrap();
        assert_eq!(ShipHullData::load(&path).unwrap(), data);
    }
}
