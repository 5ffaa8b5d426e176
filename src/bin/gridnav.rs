//! gridnav CLI - Q-learning navigation on an editable obstacle grid
//!
//! This CLI provides a unified interface for:
//! - Training a Q-table for a grid layout
//! - Following the learned greedy policy from the start cell
//! - Driving an interactive session from a command script

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "gridnav")]
#[command(version, about = "Tabular Q-learning on an editable obstacle grid", long_about = None)]
struct Cli {
    /// Enable debug logging (RUST_LOG overrides)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a Q-table and report learning statistics
    Train(Box<gridnav::cli::commands::train::TrainArgs>),

    /// Follow the greedy policy from the start cell
    Rollout(Box<gridnav::cli::commands::rollout::RolloutArgs>),

    /// Run line-based session commands from stdin or a script
    Play(Box<gridnav::cli::commands::play::PlayArgs>),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    gridnav::cli::init_logging(cli.verbose);

    match cli.command {
        Commands::Train(args) => gridnav::cli::commands::train::execute(*args),
        Commands::Rollout(args) => gridnav::cli::commands::rollout::execute(*args),
        Commands::Play(args) => gridnav::cli::commands::play::execute(*args),
    }
}
