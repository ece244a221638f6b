//! Reelscout CLI - Command-line interface
//!
//! Runs the proxy server and offers terminal front ends for searching
//! through it.

mod commands;

use std::path::PathBuf;

use clap::Parser;
use reelscout_core::ReelscoutConfig;
use reelscout_core::tracing_setup::{CliLogLevel, init_tracing};

#[derive(Parser)]
#[command(name = "reelscout")]
#[command(about = "Movie search through a key-holding proxy")]
#[command(version)]
struct Cli {
    /// Console log level (RUST_LOG takes precedence when set)
    #[arg(long, global = true, value_enum, default_value_t = CliLogLevel::Warn)]
    log_level: CliLogLevel,

    /// Directory for the full trace log
    #[arg(long, global = true)]
    logs_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: commands::Commands,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_tracing_level(), cli.logs_dir.as_deref())
        .map_err(|e| anyhow::anyhow!(e))?;

    let config = ReelscoutConfig::from_env();
    commands::handle_command(cli.command, config).await
}
