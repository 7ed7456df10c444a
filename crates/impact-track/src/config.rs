//! Persisted JSON configuration.
//!
//! Two small files survive restarts: the calibrated screen polygon with its
//! measured depth, and the tracked-color selection. Loading is tolerant: a
//! missing or malformed file falls back to documented defaults so a corrupt
//! config can never keep the pipeline from starting.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::warn;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use impact_track_color::ColorPreset;
use impact_track_core::ScreenArea;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to serialize configuration: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ScreenFile {
    #[serde(default)]
    screen_area: Vec<[i32; 2]>,
    #[serde(default)]
    screen_depth: f64,
}

/// Persisted tracked-color selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedColorConfig {
    #[serde(default = "default_preset")]
    pub color: ColorPreset,
    #[serde(default = "default_min_area")]
    pub min_area: u32,
}

fn default_preset() -> ColorPreset {
    ColorPreset::Red
}

fn default_min_area() -> u32 {
    30
}

impl Default for TrackedColorConfig {
    fn default() -> Self {
        Self {
            color: default_preset(),
            min_area: default_min_area(),
        }
    }
}

/// Load the screen area, falling back to an empty polygon at depth 0.0
/// when the file is missing or malformed.
pub fn load_screen_area(path: &Path) -> ScreenArea {
    let file: ScreenFile = load_tolerant(path);
    ScreenArea::new(file.screen_area, file.screen_depth)
}

/// Persist the screen area as pretty JSON.
pub fn save_screen_area(path: &Path, screen: &ScreenArea) -> Result<(), ConfigError> {
    let file = ScreenFile {
        screen_area: screen.points().to_vec(),
        screen_depth: screen.depth_m(),
    };
    write_pretty(path, &file)
}

/// Load the tracked color, falling back to the red preset at the default
/// minimum area when the file is missing or malformed.
pub fn load_tracked_color(path: &Path) -> TrackedColorConfig {
    load_tolerant(path)
}

/// Persist the tracked color as pretty JSON.
pub fn save_tracked_color(path: &Path, config: &TrackedColorConfig) -> Result<(), ConfigError> {
    write_pretty(path, config)
}

fn load_tolerant<T: Default + for<'de> Deserialize<'de>>(path: &Path) -> T {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) => {
            if err.kind() != io::ErrorKind::NotFound {
                warn!("could not read {}: {err}", path.display());
            }
            return T::default();
        }
    };
    match serde_json::from_str(&text) {
        Ok(value) => value,
        Err(err) => {
            warn!("malformed config {}: {err}; using defaults", path.display());
            T::default()
        }
    }
}

fn write_pretty<T: Serialize>(path: &Path, value: &T) -> Result<(), ConfigError> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).map_err(|source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn screen_area_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("screen.json");
        let screen = ScreenArea::new(vec![[0, 0], [800, 0], [800, 600], [0, 600]], 1.42);
        save_screen_area(&path, &screen).unwrap();
        let loaded = load_screen_area(&path);
        assert_eq!(loaded, screen);
    }

    #[test]
    fn missing_screen_file_yields_empty_area() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load_screen_area(&dir.path().join("nope.json"));
        assert!(loaded.points().is_empty());
        assert_eq!(loaded.depth_m(), 0.0);
        assert!(!loaded.is_usable());
    }

    #[test]
    fn malformed_screen_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("screen.json");
        fs::write(&path, "{\"screen_area\": \"oops\"}").unwrap();
        let loaded = load_screen_area(&path);
        assert!(loaded.points().is_empty());
    }

    #[test]
    fn tracked_color_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("color.json");
        let config = TrackedColorConfig {
            color: ColorPreset::Pink,
            min_area: 55,
        };
        save_tracked_color(&path, &config).unwrap();
        assert_eq!(load_tracked_color(&path), config);
    }

    #[test]
    fn partial_color_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("color.json");
        fs::write(&path, "{\"color\": \"pink\"}").unwrap();
        let loaded = load_tracked_color(&path);
        assert_eq!(loaded.color, ColorPreset::Pink);
        assert_eq!(loaded.min_area, 30);
    }

    #[test]
    fn missing_color_file_yields_red_default() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load_tracked_color(&dir.path().join("nope.json"));
        assert_eq!(loaded, TrackedColorConfig::default());
    }
}
