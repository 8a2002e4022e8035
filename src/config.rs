//! Viewer configuration, loadable from a JSON file.

use crate::error::{ErrorCode, Result, ViewerError};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CANONICAL_SOURCE: &str = "uniprot";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Name of the in-house data source; every other source is external.
    pub canonical_source: String,
    pub include_variants: bool,
    /// Pointer travel, in pixels, before a press turns into a drag.
    pub click_threshold_px: f64,
    /// Overlay height used when the canvas reports none.
    pub highlight_height: f64,
    /// Feature types drawn as bridges; their highlight only frames both ends.
    pub discrete_feature_types: Vec<String>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            canonical_source: DEFAULT_CANONICAL_SOURCE.to_string(),
            include_variants: true,
            click_threshold_px: 3.0,
            highlight_height: 0.0,
            discrete_feature_types: vec!["DISULFID".to_string(), "CROSSLNK".to_string()],
        }
    }
}

impl ViewerConfig {
    pub fn load_from_path(path: &str) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            ViewerError::new(
                ErrorCode::Io,
                format!("Could not read config file '{path}': {e}"),
            )
        })?;
        serde_json::from_str(&text).map_err(|e| {
            ViewerError::new(
                ErrorCode::InvalidInput,
                format!("Could not parse config JSON '{path}': {e}"),
            )
        })
    }

    pub fn save_to_path(&self, path: &str) -> Result<()> {
        let text = serde_json::to_string_pretty(self).map_err(|e| {
            ViewerError::new(
                ErrorCode::Internal,
                format!("Could not serialize config: {e}"),
            )
        })?;
        std::fs::write(path, text).map_err(|e| {
            ViewerError::new(
                ErrorCode::Io,
                format!("Could not write config file '{path}': {e}"),
            )
        })
    }

    /// `true` when `source` is present and is not the canonical source.
    pub fn is_external_source(&self, source: Option<&str>) -> bool {
        source.is_some_and(|s| s != self.canonical_source)
    }

    pub fn is_continuous_type(&self, feature_type: &str) -> bool {
        !self
            .discrete_feature_types
            .iter()
            .any(|t| t.eq_ignore_ascii_case(feature_type))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: ViewerConfig =
            serde_json::from_str(r#"{"canonical_source":"reference"}"#).unwrap();
        assert_eq!(config.canonical_source, "reference");
        assert!(config.include_variants);
        assert_eq!(config.click_threshold_px, 3.0);
    }

    #[test]
    fn test_external_source() {
        let config = ViewerConfig::default();
        assert!(!config.is_external_source(None));
        assert!(!config.is_external_source(Some("uniprot")));
        assert!(config.is_external_source(Some("cosmic")));
    }

    #[test]
    fn test_discrete_types_case_insensitive() {
        let config = ViewerConfig::default();
        assert!(!config.is_continuous_type("disulfid"));
        assert!(config.is_continuous_type("DOMAIN"));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("viewer.json");
        let path = path.to_str().unwrap();
        let config = ViewerConfig {
            click_threshold_px: 5.5,
            ..Default::default()
        };
        config.save_to_path(path).unwrap();
        assert_eq!(ViewerConfig::load_from_path(path).unwrap(), config);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = ViewerConfig::load_from_path("/nonexistent/viewer.json").unwrap_err();
        assert_eq!(err.code, ErrorCode::Io);
    }
}
