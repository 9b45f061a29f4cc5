//! pdview CLI - inspect Pure Data patches from the command line.

mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::common::GlobalArgs;

#[derive(Parser)]
#[command(name = "pdview")]
#[command(author, version, about = "Pure Data patch inspector", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the widgets of a patch, subpatches flattened
    Inspect(commands::inspect::InspectArgs),

    /// Report skipped lines and unresolved subpatches
    Check(commands::check::CheckArgs),

    /// Show which widgets send and receive on each channel
    Channels(commands::channels::ChannelsArgs),

    /// Click on a patch and print what its widgets emit
    Simulate(commands::simulate::SimulateArgs),

    /// Show the effective configuration
    Config(commands::config::ConfigArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    // `config` must work before the file it describes exists.
    let require_file = !matches!(cli.command, Commands::Config(_));
    let config = cli.global.load_config(require_file)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(config = %cli.global.config_path().display(), "configuration loaded");

    match cli.command {
        Commands::Inspect(args) => commands::inspect::run(args, &config),
        Commands::Check(args) => commands::check::run(args, &config),
        Commands::Channels(args) => commands::channels::run(args, &config),
        Commands::Simulate(args) => commands::simulate::run(args, &config),
        Commands::Config(args) => commands::config::run(args, &cli.global, &config),
    }
}
