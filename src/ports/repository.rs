//! Repository port for Q-table persistence.
//!
//! The exchanged shape is fixed: `[num_states][num_actions]` with
//! `num_states = N * N`, state index `row * N + col`, and the action columns
//! in [`Action`](crate::grid::Action) index order.

use std::path::Path;

use tracing::warn;

use crate::{Result, q_learning::QTable};

/// Port for persisting and loading Q-tables.
///
/// # Examples
///
/// ```no_run
/// use gridnav::ports::TableRepository;
/// use gridnav::adapters::JsonTableRepository;
/// use std::path::Path;
///
/// let repo = JsonTableRepository::new();
/// // Falls back to an all-zero 10x10 table if the file is absent or broken
/// let table = repo.load_or_zeroed(Path::new("q_table.json"), 10);
/// assert_eq!(table.grid_size(), 10);
/// ```
pub trait TableRepository {
    /// Save a table to persistent storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the location cannot be written or encoding fails.
    fn save(&self, table: &QTable, path: &Path) -> Result<()>;

    /// Load a table for a grid of side `grid_size`.
    ///
    /// # Errors
    ///
    /// Returns an error if the location cannot be read, the content is not a
    /// rectangular array of numbers, or its shape does not match the grid.
    fn load(&self, path: &Path, grid_size: usize) -> Result<QTable>;

    /// Load a table, substituting an all-zero table on any failure.
    ///
    /// A missing or malformed table never ends a session.
    fn load_or_zeroed(&self, path: &Path, grid_size: usize) -> QTable {
        match self.load(path, grid_size) {
            Ok(table) => table,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "falling back to zero-initialised table");
                QTable::new(grid_size)
            }
        }
    }
}
