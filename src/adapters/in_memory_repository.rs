//! In-memory table repository for testing.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use crate::{Result, error::Error, ports::TableRepository, q_learning::QTable};

/// In-memory repository for testing.
///
/// Stores tables in their exchange shape (`Vec<Vec<f64>>`) keyed by path, so
/// loading goes through the same shape validation as a file would. All
/// clones share the same storage.
#[derive(Clone, Default)]
pub struct InMemoryTableRepository {
    storage: Arc<Mutex<HashMap<PathBuf, Vec<Vec<f64>>>>>,
}

impl InMemoryTableRepository {
    /// Create a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store raw rows, bypassing [`QTable`] (useful for malformed fixtures).
    pub fn insert_rows(&self, path: &Path, rows: Vec<Vec<f64>>) -> Result<()> {
        self.storage
            .lock()
            .map_err(|_| poisoned(path))?
            .insert(path.to_path_buf(), rows);
        Ok(())
    }

    /// Check if a table exists at the given path.
    pub fn contains(&self, path: &Path) -> bool {
        self.storage
            .lock()
            .map(|storage| storage.contains_key(path))
            .unwrap_or(false)
    }
}

fn poisoned(path: &Path) -> Error {
    Error::Io {
        operation: format!("access in-memory table {}", path.display()),
        source: std::io::Error::other("storage lock poisoned"),
    }
}

impl TableRepository for InMemoryTableRepository {
    fn save(&self, table: &QTable, path: &Path) -> Result<()> {
        self.insert_rows(path, table.to_rows())
    }

    fn load(&self, path: &Path, grid_size: usize) -> Result<QTable> {
        let storage = self.storage.lock().map_err(|_| poisoned(path))?;
        let rows = storage.get(path).ok_or_else(|| Error::Io {
            operation: format!("load in-memory table {}", path.display()),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no table stored"),
        })?;
        QTable::from_rows(grid_size, rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{Action, Cell};

    #[test]
    fn test_in_memory_roundtrip() {
        let repo = InMemoryTableRepository::new();
        let path = Path::new("trained");
        let mut table = QTable::new(2);
        table.update(Cell::new(1, 1), Action::Left, -3.0);

        repo.save(&table, path).unwrap();
        assert!(repo.contains(path));
        assert_eq!(repo.load(path, 2).unwrap(), table);
    }

    #[test]
    fn test_clones_share_storage() {
        let repo = InMemoryTableRepository::new();
        let clone = repo.clone();
        repo.save(&QTable::new(2), Path::new("shared")).unwrap();
        assert!(clone.contains(Path::new("shared")));
    }

    #[test]
    fn test_missing_and_ragged_tables_fall_back() {
        let repo = InMemoryTableRepository::new();
        let path = Path::new("ragged");
        repo.insert_rows(path, vec![vec![0.0; 4], vec![0.0; 2], vec![0.0; 4], vec![0.0; 4]])
            .unwrap();

        assert!(repo.load(path, 2).is_err());
        assert_eq!(repo.load_or_zeroed(path, 2), QTable::new(2));
        assert_eq!(repo.load_or_zeroed(Path::new("absent"), 2), QTable::new(2));
    }
}
