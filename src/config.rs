//! Settings file. Every key is optional; missing ones take their defaults.
//!
//! ```toml
//! direction = "LR"
//! theme = "light"
//! implicit_policy = "reject"
//!
//! [layout]
//! node_width = 300.0
//!
//! [export]
//! width = 3840.0
//! ```

use crate::export::ExportConfig;
use crate::graph::Direction;
use crate::layout::LayoutConfig;
use crate::relation::ImplicitGroupPolicy;
use crate::theme::ColorThemeKind;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Cannot read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub layout: LayoutConfig,
    pub export: ExportConfig,
    pub direction: Direction,
    pub theme: ColorThemeKind,
    pub implicit_policy: ImplicitGroupPolicy,
}

impl Config {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_default() {
        assert_eq!(Config::from_toml_str("").unwrap(), Config::default());
    }

    #[test]
    fn test_partial_overrides() {
        let config = Config::from_toml_str(
            r#"
            direction = "LR"
            theme = "high-contrast-light"
            implicit_policy = "reject"

            [layout]
            node_width = 300.0

            [export]
            max_zoom = 4.0
            "#,
        )
        .unwrap();

        assert_eq!(config.direction, Direction::LR);
        assert_eq!(config.theme, ColorThemeKind::HighContrastLight);
        assert_eq!(config.implicit_policy, ImplicitGroupPolicy::Reject);
        assert_eq!(config.layout.node_width, 300.0);
        assert_eq!(config.layout.node_height, 400.0);
        assert_eq!(config.export.max_zoom, 4.0);
        assert_eq!(config.export.width, 7680.0);
    }

    #[test]
    fn test_invalid_value() {
        let err = Config::from_toml_str("direction = \"diagonal\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = Config::load(Path::new("/nonexistent/prisma-uml.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
