//! Rollout command - Follow the greedy policy from the start cell

use std::path::PathBuf;

use anyhow::{Result, anyhow};
use clap::Parser;

use super::open_session;
use crate::{
    cli::{config::SessionArgs, output},
    session::TrainOutcome,
};

#[derive(Parser, Debug)]
pub struct RolloutArgs {
    #[command(flatten)]
    pub session: SessionArgs,

    /// Q-table to follow (JSON); an unreadable file means an all-zero table
    #[arg(long)]
    pub table: Option<PathBuf>,

    /// Train before rolling out (always done when no table is given)
    #[arg(long)]
    pub train: bool,

    /// Maximum number of steps (defaults to N*N)
    #[arg(long)]
    pub limit: Option<usize>,

    /// Print the rollout as JSON instead of text
    #[arg(long)]
    pub json: bool,
}

pub fn execute(args: RolloutArgs) -> Result<()> {
    let config = args.session.to_config()?;
    let limit = args.limit.unwrap_or(config.grid_size * config.grid_size);
    let mut session = open_session(config, args.table.as_deref())?;

    if args.train || args.table.is_none() {
        if let TrainOutcome::Busy = session.train()? {
            return Err(anyhow!("Session is busy"));
        }
    }

    let rollout = session.rollout(limit)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&rollout)?);
    } else {
        output::print_section("Greedy rollout");
        output::print_rollout(&rollout, &session.snapshot());
    }
    Ok(())
}
