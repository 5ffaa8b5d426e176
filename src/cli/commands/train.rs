//! Train command - Learn a Q-table for a grid layout

use std::{
    path::PathBuf,
    sync::{Arc, Mutex},
};

use anyhow::{Result, anyhow};
use clap::Parser;
use serde::Serialize;
use tracing::info;

use super::{open_session, save_table};
use crate::{
    app::SessionConfig,
    cli::{config::SessionArgs, output},
    pipeline::{
        BlockAverage, CsvObserver, MetricsObserver, MetricsSummary, ProgressObserver,
        TrainingReport,
    },
    session::TrainOutcome,
};

#[derive(Parser, Debug)]
pub struct TrainArgs {
    #[command(flatten)]
    pub session: SessionArgs,

    /// Output file for the learned Q-table (JSON)
    #[arg(long, short = 'O')]
    pub output: Option<PathBuf>,

    /// Continue from an existing Q-table (JSON)
    #[arg(long)]
    pub table: Option<PathBuf>,

    /// Optional path for writing a summary JSON file
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Optional CSV file with one row per episode
    #[arg(long)]
    pub episodes_csv: Option<PathBuf>,

    /// Episodes per block in the averaged report
    #[arg(long, default_value_t = 1000)]
    pub block_size: usize,

    /// Hide the progress bar
    #[arg(long)]
    pub no_progress: bool,
}

#[derive(Debug, Serialize)]
struct TrainingSummaryFile {
    config: SessionConfig,
    report: TrainingReport,
    metrics: MetricsSummary,
    blocks: Vec<BlockAverage>,
}

pub fn execute(args: TrainArgs) -> Result<()> {
    let config = args.session.to_config()?;
    let mut session = open_session(config.clone(), args.table.as_deref())?;

    if !args.no_progress {
        session.add_observer(Box::new(ProgressObserver::new()));
    }
    let metrics = Arc::new(Mutex::new(MetricsObserver::new()));
    session.add_observer(Box::new(Arc::clone(&metrics)));
    if let Some(path) = &args.episodes_csv {
        session.add_observer(Box::new(CsvObserver::new(path)?));
    }

    output::print_section("Training");
    output::print_kv(
        "Grid",
        &format!(
            "{n}x{n}, start {}, goal {}, {} obstacles",
            config.start,
            config.goal,
            config.obstacles.len(),
            n = config.grid_size
        ),
    );
    output::print_kv("Reward", config.reward.name());

    let report = match session.train()? {
        TrainOutcome::Completed(report) => report,
        TrainOutcome::Busy => return Err(anyhow!("Session is busy")),
    };

    let recorded = metrics
        .lock()
        .map_err(|_| anyhow!("Metrics observer lock poisoned"))?;
    let blocks = recorded.block_averages(args.block_size);

    output::print_subsection("Results");
    output::print_report(&report);
    if !blocks.is_empty() {
        output::print_subsection("Block averages");
        output::print_block_averages(&blocks);
    }

    if let Some(path) = &args.output {
        save_table(&session, path)?;
        info!(path = %path.display(), "Q-table saved");
        println!("\n✓ Q-table saved to: {}", path.display());
    }

    if let Some(path) = &args.summary {
        let summary = TrainingSummaryFile {
            config,
            report,
            metrics: recorded.summary(),
            blocks,
        };
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, &summary)?;
        println!("✓ Summary saved to: {}", path.display());
    }

    Ok(())
}
