//! Viewer settings file.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use pdview_core::{DEFAULT_CHAR_WIDTH, DEFAULT_MAX_DEPTH, ParseOptions};

use crate::error::ConfigError;

/// Default number-entry drag sensitivity (value units per pixel).
pub const DEFAULT_DRAG_SENSITIVITY: f32 = 0.5;

/// Default tracing filter for the binary.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Viewer configuration.
///
/// Every field has a default, so an empty file is a valid configuration.
///
/// # TOML Format
///
/// ```toml
/// max_subpatch_depth = 16
/// search_paths = ["/usr/lib/pd/extra", "~/pd/abstractions"]
/// log_filter = "pdview_core=debug"
///
/// [number_box]
/// char_width = 7.0
/// drag_sensitivity = 0.25
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ViewerConfig {
    /// Deepest subpatch nesting that is still loaded.
    pub max_subpatch_depth: usize,

    /// Directories searched for `<name>.pd` after the parent's own directory.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub search_paths: Vec<PathBuf>,

    /// Tracing filter used when `RUST_LOG` is unset.
    pub log_filter: String,

    /// Number entry settings.
    pub number_box: NumberBoxConfig,
}

/// Number entry settings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NumberBoxConfig {
    /// Width of one character cell.
    pub char_width: f32,
    /// Value change per unit of vertical drag.
    pub drag_sensitivity: f32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            max_subpatch_depth: DEFAULT_MAX_DEPTH,
            search_paths: Vec::new(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            number_box: NumberBoxConfig::default(),
        }
    }
}

impl Default for NumberBoxConfig {
    fn default() -> Self {
        Self {
            char_width: DEFAULT_CHAR_WIDTH,
            drag_sensitivity: DEFAULT_DRAG_SENSITIVITY,
        }
    }
}

impl ViewerConfig {
    /// Add a subpatch search directory.
    pub fn with_search_path(mut self, dir: impl Into<PathBuf>) -> Self {
        self.search_paths.push(dir.into());
        self
    }

    /// Set the subpatch nesting bound.
    pub fn with_max_subpatch_depth(mut self, depth: usize) -> Self {
        self.max_subpatch_depth = depth;
        self
    }

    /// Load and validate a configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        Self::from_toml(&content)
    }

    /// Load `path` if it exists, otherwise return the defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.is_file() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse and validate a configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: ViewerConfig = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Save the configuration to a TOML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Convert the configuration to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check that every value is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_subpatch_depth == 0 {
            return Err(ConfigError::invalid(
                "max_subpatch_depth",
                "must be at least 1",
            ));
        }
        check_positive("number_box.char_width", self.number_box.char_width)?;
        check_positive("number_box.drag_sensitivity", self.number_box.drag_sensitivity)?;
        Ok(())
    }

    /// Parser options matching this configuration.
    pub fn parse_options(&self) -> ParseOptions {
        let mut options = ParseOptions::default()
            .with_max_depth(self.max_subpatch_depth)
            .with_char_width(self.number_box.char_width);
        options.search_paths.clone_from(&self.search_paths);
        options
    }
}

fn check_positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("must be positive (got {value})")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_gives_defaults() {
        let config = ViewerConfig::from_toml("").unwrap();
        assert_eq!(config, ViewerConfig::default());
        assert_eq!(config.max_subpatch_depth, 16);
        assert_eq!(config.log_filter, "warn");
        assert_eq!(config.number_box.char_width, 8.0);
        assert_eq!(config.number_box.drag_sensitivity, 0.5);
    }

    #[test]
    fn partial_tables_keep_other_defaults() {
        let config = ViewerConfig::from_toml("[number_box]\nchar_width = 6.5\n").unwrap();
        assert_eq!(config.number_box.char_width, 6.5);
        assert_eq!(config.number_box.drag_sensitivity, DEFAULT_DRAG_SENSITIVITY);
        assert_eq!(config.max_subpatch_depth, DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn zero_depth_rejected() {
        let err = ViewerConfig::from_toml("max_subpatch_depth = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "max_subpatch_depth", .. }));
    }

    #[test]
    fn non_positive_number_box_values_rejected() {
        for toml in [
            "[number_box]\nchar_width = 0.0",
            "[number_box]\ndrag_sensitivity = -1.0",
            "[number_box]\nchar_width = nan",
        ] {
            assert!(
                matches!(ViewerConfig::from_toml(toml), Err(ConfigError::Invalid { .. })),
                "accepted: {toml}"
            );
        }
    }

    #[test]
    fn wrong_type_is_parse_error() {
        let err = ViewerConfig::from_toml("max_subpatch_depth = \"deep\"").unwrap_err();
        assert!(matches!(err, ConfigError::TomlParse(_)));
    }

    #[test]
    fn parse_options_carry_settings() {
        let config = ViewerConfig::default()
            .with_max_subpatch_depth(3)
            .with_search_path("/opt/pd/extra");
        let options = config.parse_options();
        assert_eq!(options.max_depth, 3);
        assert_eq!(options.search_paths, vec![PathBuf::from("/opt/pd/extra")]);
        assert_eq!(options.char_width, DEFAULT_CHAR_WIDTH);
    }

    #[test]
    fn toml_roundtrip() {
        let config = ViewerConfig::default().with_search_path("abstractions");
        let parsed = ViewerConfig::from_toml(&config.to_toml().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }
}
