//! Shared CLI helpers used across multiple commands.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use pdview_config::{ViewerConfig, default_config_path};
use pdview_core::{FsSource, ParsedDocument, PatchParser, Point, Widget};

/// Options accepted by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Configuration file (defaults to the user config file)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Deepest subpatch nesting to load (overrides the config file)
    #[arg(long, global = true, value_name = "N")]
    pub max_depth: Option<usize>,
}

impl GlobalArgs {
    /// The config file in use.
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(default_config_path)
    }

    /// Load the configuration and apply command-line overrides.
    ///
    /// With `require_file`, an explicit `--config` file must exist. The
    /// default file is always optional.
    pub fn load_config(&self, require_file: bool) -> anyhow::Result<ViewerConfig> {
        let mut config = match &self.config {
            Some(path) if require_file => ViewerConfig::load(path)?,
            Some(path) => ViewerConfig::load_or_default(path)?,
            None => ViewerConfig::load_or_default(default_config_path())?,
        };
        if let Some(depth) = self.max_depth {
            config.max_subpatch_depth = depth;
        }
        config.validate().context("invalid --max-depth")?;
        Ok(config)
    }
}

/// Parse `file` with the configured options.
pub fn parse_document(file: &Path, config: &ViewerConfig) -> ParsedDocument {
    PatchParser::new(FsSource, config.parse_options()).parse_file(file)
}

/// Parse an `X,Y` point for clap's `value_parser`.
pub fn parse_point(s: &str) -> Result<Point, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("Invalid point: '{s}' (expected X,Y)"))?;
    let coord = |v: &str| {
        v.trim()
            .parse::<f32>()
            .map_err(|_| format!("Invalid coordinate '{v}' in '{s}'"))
    };
    Ok(Point::new(coord(x)?, coord(y)?))
}

/// Parse an `ID=TEXT` pair for clap's `value_parser`.
pub fn parse_message(s: &str) -> Result<(usize, String), String> {
    let (id, text) = s
        .split_once('=')
        .ok_or_else(|| format!("Invalid message: '{s}' (expected ID=TEXT)"))?;
    let id = id
        .trim()
        .trim_start_matches('#')
        .parse::<usize>()
        .map_err(|_| format!("Invalid widget id '{id}' in '{s}'"))?;
    Ok((id, text.to_string()))
}

/// `#id kind` label for a widget.
pub fn widget_label(index: usize, widget: &Widget) -> String {
    format!("#{index} {}", widget.kind_name())
}
