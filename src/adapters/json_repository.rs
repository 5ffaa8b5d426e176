//! JSON implementation of the table repository.
//!
//! The file holds a bare `[num_states][num_actions]` array of numbers, so
//! tables stay interchangeable with any tool that reads nested arrays.

use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use crate::{Result, error::Error, ports::TableRepository, q_learning::QTable};

/// JSON-file table repository.
///
/// # Examples
///
/// ```no_run
/// use gridnav::adapters::JsonTableRepository;
/// use gridnav::ports::TableRepository;
/// use gridnav::q_learning::QTable;
/// use std::path::Path;
///
/// let repo = JsonTableRepository::new();
/// repo.save(&QTable::new(5), Path::new("q_table.json"))?;
/// let loaded = repo.load(Path::new("q_table.json"), 5)?;
/// # Ok::<(), gridnav::Error>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonTableRepository;

impl JsonTableRepository {
    /// Create a new JSON repository.
    pub fn new() -> Self {
        Self
    }
}

impl TableRepository for JsonTableRepository {
    fn save(&self, table: &QTable, path: &Path) -> Result<()> {
        let file = File::create(path).map_err(|source| Error::Io {
            operation: format!("create file {}", path.display()),
            source,
        })?;
        let mut writer = BufWriter::new(file);

        serde_json::to_writer(&mut writer, &table.to_rows())?;
        writer.flush().map_err(|source| Error::Io {
            operation: format!("write file {}", path.display()),
            source,
        })?;

        Ok(())
    }

    fn load(&self, path: &Path, grid_size: usize) -> Result<QTable> {
        let file = File::open(path).map_err(|source| Error::Io {
            operation: format!("open file {}", path.display()),
            source,
        })?;

        let rows: Vec<Vec<f64>> = serde_json::from_reader(BufReader::new(file))?;
        QTable::from_rows(grid_size, &rows)
    }
}
