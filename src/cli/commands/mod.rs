//! Subcommand implementations

pub mod play;
pub mod rollout;
pub mod train;

use std::path::Path;

use anyhow::{Context, Result};

use crate::{
    adapters::JsonTableRepository,
    app::SessionConfig,
    ports::TableRepository,
    session::Session,
};

/// Build a session, seeding it from `table` when given
///
/// A missing or malformed table file leaves the session with an all-zero
/// table.
pub(crate) fn open_session(config: SessionConfig, table: Option<&Path>) -> Result<Session> {
    let grid_size = config.grid_size;
    let session = Session::new(config).context("Failed to create session")?;
    match table {
        Some(path) => {
            let table = JsonTableRepository::new().load_or_zeroed(path, grid_size);
            Ok(session.with_table(table)?)
        }
        None => Ok(session),
    }
}

pub(crate) fn save_table(session: &Session, path: &Path) -> Result<()> {
    JsonTableRepository::new()
        .save(session.table(), path)
        .with_context(|| format!("Failed to save Q-table to {}", path.display()))
}
