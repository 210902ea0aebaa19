//! Editor configuration.

use crate::camera::{DEFAULT_VIEWPORT, MAX_ZOOM, MIN_ZOOM, ZOOM_STEP};
use crate::geometry::{CANVAS_EXTENT, MIN_BOOTH_SIZE};
use crate::snap::SNAP_THRESHOLD;
use kurbo::Size;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Distance from a booth's top edge to its rotation handle.
pub const ROTATE_HANDLE_OFFSET: f64 = 3.0;
/// Distance from the grid's top edge to its rotation handle.
pub const GRID_ROTATE_HANDLE_OFFSET: f64 = 5.0;
/// Hit radius of booth handles, in normalized units.
pub const HANDLE_RADIUS: f64 = 0.8;
/// Hit radius of grid handles, in normalized units.
pub const GRID_HANDLE_RADIUS: f64 = 1.2;
/// Pointer travel (screen pixels) below which a press counts as a click.
pub const CLICK_TOLERANCE: f64 = 3.0;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Tunables for the interaction engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Snap dragged booths to their neighbors.
    pub snap_enabled: bool,
    pub snap_threshold: f64,
    /// Resize floor for booths and the layout grid.
    pub min_booth_size: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Zoom multiplier per wheel notch.
    pub zoom_step: f64,
    /// Unzoomed container size in pixels.
    pub viewport: Size,
    pub rotate_handle_offset: f64,
    pub grid_rotate_handle_offset: f64,
    pub handle_radius: f64,
    pub grid_handle_radius: f64,
    pub click_tolerance: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            snap_enabled: true,
            snap_threshold: SNAP_THRESHOLD,
            min_booth_size: MIN_BOOTH_SIZE,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            zoom_step: ZOOM_STEP,
            viewport: DEFAULT_VIEWPORT,
            rotate_handle_offset: ROTATE_HANDLE_OFFSET,
            grid_rotate_handle_offset: GRID_ROTATE_HANDLE_OFFSET,
            handle_radius: HANDLE_RADIUS,
            grid_handle_radius: GRID_HANDLE_RADIUS,
            click_tolerance: CLICK_TOLERANCE,
        }
    }
}

impl EditorConfig {
    /// Parse and validate a JSON config. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Reject values the engine cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.snap_threshold >= 0.0) {
            return Err(ConfigError::Invalid("snapThreshold must be >= 0".into()));
        }
        if !(self.min_booth_size > 0.0 && self.min_booth_size <= CANVAS_EXTENT) {
            return Err(ConfigError::Invalid(
                "minBoothSize must be within (0, 100]".into(),
            ));
        }
        if !(self.min_zoom > 0.0 && self.min_zoom <= self.max_zoom) {
            return Err(ConfigError::Invalid(
                "zoom range must satisfy 0 < minZoom <= maxZoom".into(),
            ));
        }
        if !(self.zoom_step > 1.0) {
            return Err(ConfigError::Invalid("zoomStep must be > 1".into()));
        }
        if !(self.viewport.width > 0.0 && self.viewport.height > 0.0) {
            return Err(ConfigError::Invalid("viewport must have a positive size".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = EditorConfig::from_json(r#"{"snapEnabled": false, "maxZoom": 4.0}"#).unwrap();
        assert!(!config.snap_enabled);
        assert!((config.max_zoom - 4.0).abs() < f64::EPSILON);
        assert!((config.snap_threshold - SNAP_THRESHOLD).abs() < f64::EPSILON);
        assert_eq!(config.viewport, DEFAULT_VIEWPORT);
    }

    #[test]
    fn test_rejects_inverted_zoom_range() {
        let result = EditorConfig::from_json(r#"{"minZoom": 5.0, "maxZoom": 2.0}"#);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rejects_empty_viewport() {
        let result = EditorConfig::from_json(r#"{"viewport": {"width": 0.0, "height": 850.0}}"#);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            EditorConfig::from_json("{not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("editor.json");
        std::fs::write(&path, r#"{"minBoothSize": 2.0}"#).unwrap();
        let config = EditorConfig::load(&path).unwrap();
        assert!((config.min_booth_size - 2.0).abs() < f64::EPSILON);
    }
}
