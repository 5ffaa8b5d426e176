//! Command-line interface for gridnav
//!
//! This module provides the `train`, `rollout` and `play` subcommands and the
//! flags they share for describing a session.

pub mod commands;
pub mod config;
pub mod output;

use tracing_subscriber::{EnvFilter, fmt};

/// Install the stderr log subscriber
///
/// `RUST_LOG` wins when set; otherwise `verbose` selects `debug` over `info`
/// for this crate. Calling it twice is harmless.
pub fn init_logging(verbose: bool) {
    let default_directive = if verbose { "gridnav=debug" } else { "gridnav=info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    let _ = fmt::Subscriber::builder()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
