//! Run configuration files.
//!
//! A run config is a YAML file holding everything a `generate` call needs.
//! Every section is optional; command-line flags override what it sets.
//!
//! ```yaml
//! mode: cascade
//! seed: 42
//! path:
//!   width: 1200
//!   height: 800
//!   min_boundary_distance: 60
//!   min_path_distance: 45
//!   num_points: 30
//! style:
//!   background: "#000010"
//!   stroke: "#ffcc66"
//!   stroke_width: 3
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use galaxy_trail::{GenerationMode, PathConfig, TrailStyle};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub mode: Option<GenerationMode>,
    pub seed: Option<u64>,
    pub path: PathConfig,
    pub style: TrailStyle,
}

impl RunConfig {
    /// Load a run config from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_yaml(&content).with_context(|| format!("Invalid config {}", path.display()))
    }

    /// Parse a run config from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // An empty file is a valid, all-defaults config
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load the file if one was given, otherwise start from defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let config = RunConfig::from_yaml(
            r##"
mode: simple
path:
  width: 1200
  num_points: 30
style:
  stroke: "#ff0000"
"##,
        )
        .unwrap();

        assert_eq!(config.mode, Some(GenerationMode::Simple));
        assert_eq!(config.seed, None);
        assert_eq!(config.path.width, 1200.0);
        assert_eq!(config.path.height, PathConfig::default().height);
        assert_eq!(config.path.num_points, 30);
        assert_eq!(config.style.stroke, "#ff0000");
        assert_eq!(config.style.background, TrailStyle::default().background);
    }

    #[test]
    fn empty_file_is_defaults() {
        let config = RunConfig::from_yaml("\n").unwrap();
        assert_eq!(config.path, PathConfig::default());
        assert_eq!(config.mode, None);
    }

    #[test]
    fn bad_mode_is_an_error() {
        assert!(RunConfig::from_yaml("mode: sideways\n").is_err());
    }

    #[test]
    fn yaml_round_trip() {
        let config = RunConfig {
            mode: Some(GenerationMode::Cascade),
            seed: Some(99),
            path: PathConfig::new(640.0, 480.0).with_grid_size(20.0),
            style: TrailStyle::default(),
        };
        let back = RunConfig::from_yaml(&config.to_yaml().unwrap()).unwrap();
        assert_eq!(back.mode, config.mode);
        assert_eq!(back.seed, config.seed);
        assert_eq!(back.path, config.path);
        assert_eq!(back.style, config.style);
    }
}
