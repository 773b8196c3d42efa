// SPDX-License-Identifier: MIT OR Apache-2.0
//! Generation settings.
//!
//! Stored as RON next to the ship library:
//! - Hull ring resolution
//! - Turret and launcher slot counts
//! - Learning blend
//! - Visual features added to every new hull

use crate::defaults::{self, DEFAULT_LAUNCHER_SLOTS, DEFAULT_TURRET_SLOTS};
use crate::elements::VisualFeature;
use crate::learning::DEFAULT_LEARNING_BLEND;
use crate::nodes::DEFAULT_SEGMENTS;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Current settings format version
pub const SETTINGS_FORMAT_VERSION: u32 = 1;

/// Default settings file name
pub const SETTINGS_FILE_NAME: &str = "hullforge.ron";

/// Parameters for new ships
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
    /// Settings format version
    pub version: u32,
    /// Ring resolution written to the hull node
    pub hull_segments: u32,
    /// Dorsal turrets per ship
    pub turret_slots: usize,
    /// Launchers per ship
    pub launcher_slots: usize,
    /// Weight of learned profiles, 0 ignores them, 1 adopts them fully
    pub learning_blend: f32,
    /// Features added to every generated hull
    pub default_features: Vec<VisualFeature>,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            version: SETTINGS_FORMAT_VERSION,
            hull_segments: DEFAULT_SEGMENTS.unsigned_abs(),
            turret_slots: DEFAULT_TURRET_SLOTS,
            launcher_slots: DEFAULT_LAUNCHER_SLOTS,
            learning_blend: DEFAULT_LEARNING_BLEND,
            default_features: vec![defaults::default_fin()],
        }
    }
}

impl GenerationSettings {
    /// Load settings from a file
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path)?;
        let settings: GenerationSettings = ron::from_str(&content)?;

        if settings.version > SETTINGS_FORMAT_VERSION {
            return Err(SettingsError::UnsupportedVersion {
                found: settings.version,
                supported: SETTINGS_FORMAT_VERSION,
            });
        }

        Ok(settings)
    }

    /// Load settings, falling back to defaults when the file is missing or
    /// unreadable
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!("Using default generation settings: {}", e);
                Self::default()
            }
        }
    }

    /// Settings file inside a library directory
    pub fn file_path(dir: &Path) -> PathBuf {
        dir.join(SETTINGS_FILE_NAME)
    }

    /// Load the settings file of a library directory, or defaults
    pub fn load_from_dir(dir: &Path) -> Self {
        Self::load_or_default(&Self::file_path(dir))
    }

    /// Save settings to a file
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let config = ron::ser::PrettyConfig::default()
            .struct_names(true)
            .enumerate_arrays(false);

        let content = ron::ser::to_string_pretty(self, config)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Blend clamped to `[0, 1]`
    pub fn clamped_blend(&self) -> f32 {
        self.learning_blend.clamp(0.0, 1.0)
    }
}

/// Error loading or saving settings
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// File could not be read or written
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// File is not valid RON for these settings
    #[error("Invalid settings: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// Settings could not be serialized
    #[error("Failed to serialize settings: {0}")]
    Serialize(#[from] ron::Error),

    /// File was written by a newer version
    #[error("Settings version {found} is newer than supported version {supported}")]
    UnsupportedVersion {
        /// Version in the file
        found: u32,
        /// Newest version this build reads
        supported: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = GenerationSettings::default();
        assert_eq!(settings.version, SETTINGS_FORMAT_VERSION);
        assert_eq!(settings.hull_segments, 8);
        assert_eq!(settings.turret_slots, 3);
        assert_eq!(settings.launcher_slots, 1);
        assert_eq!(settings.default_features.len(), 1);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.ron");
        let settings = GenerationSettings {
            hull_segments: 16,
            turret_slots: 5,
            ..GenerationSettings::default()
        };
        settings.save(&path).unwrap();
        let loaded = GenerationSettings::load(&path).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings: GenerationSettings = ron::from_str("(turret_slots: 6)").unwrap();
        assert_eq!(settings.turret_slots, 6);
        assert_eq!(settings.hull_segments, 8);
    }

    #[test]
    fn test_newer_version_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("future.ron");
        std::fs::write(&path, "(version: 99)").unwrap();
        let result = GenerationSettings::load(&path);
        assert!(matches!(
            result,
            Err(SettingsError::UnsupportedVersion { found: 99, .. })
        ));
    }

    #[test]
    fn test_missing_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.ron");
        assert_eq!(
            GenerationSettings::load_or_default(&path),
            GenerationSettings::default()
        );
    }

    #[test]
    fn test_library_directory_settings() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            GenerationSettings::file_path(dir.path()),
            dir.path().join("hullforge.ron")
        );
        assert_eq!(
            GenerationSettings::load_from_dir(dir.path()),
            GenerationSettings::default()
        );

        let settings = GenerationSettings {
            learning_blend: 0.5,
            ..GenerationSettings::default()
        };
        let path = GenerationSettings::file_path(dir.path());
        settings.save(&path).unwrap();
        assert_eq!(GenerationSettings::load_from_dir(dir.path()), settings);
    }

    #[test]
    fn test_blend_clamped() {
        let settings = GenerationSettings {
            learning_blend: 4.0,
            ..GenerationSettings::default()
        };
        assert_eq!(settings.clamped_blend(), 1.0);
    }
}
