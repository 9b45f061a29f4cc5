//! Configuration display command.

use clap::Args;
use pdview_config::{ViewerConfig, ensure_user_config_dir};

use super::common::GlobalArgs;

/// Show the effective configuration.
#[derive(Args)]
pub struct ConfigArgs {
    /// Print only the config file location
    #[arg(long)]
    pub path: bool,

    /// Write the effective configuration to the config file if none exists
    #[arg(long, conflicts_with = "path")]
    pub init: bool,
}

/// Run the config command.
pub fn run(args: ConfigArgs, global: &GlobalArgs, config: &ViewerConfig) -> anyhow::Result<()> {
    let path = global.config_path();

    if args.path {
        println!("{}", path.display());
        return Ok(());
    }

    if args.init {
        if path.exists() {
            println!("{} already exists", path.display());
            return Ok(());
        }
        if global.config.is_none() {
            ensure_user_config_dir()?;
        }
        config.save(&path)?;
        tracing::info!("wrote {}", path.display());
        println!("Wrote {}", path.display());
        return Ok(());
    }

    let source = if path.is_file() { "" } else { " (not found, using defaults)" };
    println!("# {}{source}", path.display());
    print!("{}", config.to_toml()?);
    Ok(())
}
