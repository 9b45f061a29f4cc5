//! Configuration for the pdview viewer.
//!
//! Settings live in a TOML file in the platform config directory (see
//! [`paths`]). Every field is optional; missing ones take their defaults.
//!
//! # Example
//!
//! ```rust,no_run
//! use pdview_config::{ViewerConfig, paths};
//! use pdview_core::PatchParser;
//!
//! let config = ViewerConfig::load_or_default(paths::default_config_path()).unwrap();
//! let parser = PatchParser::new(pdview_core::FsSource, config.parse_options());
//! let doc = parser.parse_file("synth.pd");
//! println!("{} widgets", doc.len());
//! ```

mod error;
mod settings;

/// Platform-specific configuration paths.
pub mod paths;

pub use error::ConfigError;
pub use paths::{default_config_path, ensure_user_config_dir, user_config_dir};
pub use settings::{DEFAULT_DRAG_SENSITIVITY, DEFAULT_LOG_FILTER, NumberBoxConfig, ViewerConfig};
