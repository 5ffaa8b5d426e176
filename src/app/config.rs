//! Session configuration.

use std::{fs::File, io::BufReader, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    grid::{Cell, GridWorld},
    pipeline::TrainingConfig,
    reward::RewardModel,
};

/// Configuration for creating a [`Session`](crate::session::Session).
///
/// Builder-style API; every field also has a serde default so partial JSON
/// files are accepted.
///
/// # Examples
///
/// ```
/// use gridnav::app::SessionConfig;
/// use gridnav::grid::Cell;
/// use gridnav::reward::RewardModel;
///
/// let config = SessionConfig::new(5, Cell::new(0, 0), Cell::new(4, 4))
///     .with_obstacles([Cell::new(2, 2)])
///     .with_reward(RewardModel::shaped())
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Side length N of the square grid
    pub grid_size: usize,
    /// Fixed start cell
    pub start: Cell,
    /// Initial goal cell
    pub goal: Cell,
    /// Initial obstacles
    pub obstacles: Vec<Cell>,
    /// Reward strategy
    pub reward: RewardModel,
    /// Pixel size of one cell, for translating pointer coordinates
    pub cell_size: u32,
    /// Trainer hyperparameters
    pub training: TrainingConfig,
}

impl SessionConfig {
    /// Create a configuration for an obstacle-free grid.
    ///
    /// Uses default values for other parameters:
    /// - Reward model: sparse (+100 goal, -1 step)
    /// - Training: α = 0.5, γ = 0.9, ε = 0.8, 1500 episodes of 100 steps
    /// - Cell size: 40 pixels
    /// - Seed: None (non-deterministic)
    pub fn new(grid_size: usize, start: Cell, goal: Cell) -> Self {
        Self {
            grid_size,
            start,
            goal,
            ..Self::default()
        }
    }

    pub fn with_obstacles<I>(mut self, cells: I) -> Self
    where
        I: IntoIterator<Item = Cell>,
    {
        self.obstacles = cells.into_iter().collect();
        self
    }

    pub fn with_reward(mut self, reward: RewardModel) -> Self {
        self.reward = reward;
        self
    }

    pub fn with_training(mut self, training: TrainingConfig) -> Self {
        self.training = training;
        self
    }

    pub fn with_cell_size(mut self, cell_size: u32) -> Self {
        self.cell_size = cell_size;
        self
    }

    /// Set the random seed for deterministic training.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.training.seed = Some(seed);
        self
    }

    /// Build the initial grid described by this configuration.
    pub fn build_world(&self) -> Result<GridWorld> {
        GridWorld::new(self.grid_size, self.start, self.goal)?
            .with_obstacles(self.obstacles.iter().copied())
    }

    /// Check every field without building a session.
    ///
    /// The grid size must lie in `1..=`[`MAX_GRID_SIZE`](crate::grid::MAX_GRID_SIZE).
    pub fn validate(&self) -> Result<()> {
        self.build_world()?;
        if self.cell_size == 0 {
            return Err(Error::config("cell size must be at least 1 pixel"));
        }
        self.training.validate()
    }

    /// Load a configuration from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Error::Io {
            operation: format!("open config {}", path.display()),
            source,
        })?;
        let config = serde_json::from_reader(BufReader::new(file))?;
        Ok(config)
    }

    /// Save the configuration as pretty-printed JSON.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| Error::Io {
            operation: format!("create config {}", path.display()),
            source,
        })?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            grid_size: 10,
            start: Cell::new(0, 0),
            goal: Cell::new(9, 9),
            obstacles: Vec::new(),
            reward: RewardModel::default(),
            cell_size: 40,
            training: TrainingConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(SessionConfig::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_configurations() {
        let cases = [
            SessionConfig::new(0, Cell::new(0, 0), Cell::new(0, 0)),
            SessionConfig::new(3, Cell::new(0, 0), Cell::new(0, 0)),
            SessionConfig::new(3, Cell::new(0, 0), Cell::new(3, 3)),
            SessionConfig::new(3, Cell::new(0, 0), Cell::new(2, 2)).with_obstacles([Cell::new(2, 2)]),
            SessionConfig::new(3, Cell::new(0, 0), Cell::new(2, 2)).with_cell_size(0),
        ];
        for config in cases {
            assert!(config.validate().is_err(), "{config:?} should be rejected");
        }
    }

    #[test]
    fn test_oversized_grid_fails_validation() {
        let config = SessionConfig::new(1 << 33, Cell::new(0, 0), Cell::new(1, 1));
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidConfiguration { .. })
        ));
        assert!(crate::session::Session::new(config).is_err());

        let config = SessionConfig::new(crate::grid::MAX_GRID_SIZE + 1, Cell::new(0, 0), Cell::new(1, 1));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{ "grid_size": 5, "goal": { "row": 4, "col": 4 }, "training": { "episodes": 10 } }"#;
        let config: SessionConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.grid_size, 5);
        assert_eq!(config.start, Cell::new(0, 0));
        assert_eq!(config.training.episodes, 10);
        assert_eq!(config.training.learning_rate, 0.5);
        assert_eq!(config.reward, RewardModel::sparse());
    }

    #[test]
    fn test_save_load_roundtrip() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("session.json");
        let config = SessionConfig::new(6, Cell::new(1, 1), Cell::new(4, 5))
            .with_obstacles([Cell::new(2, 2), Cell::new(3, 3)])
            .with_reward(RewardModel::shaped())
            .with_seed(9);

        config.save(&path).unwrap();
        assert_eq!(SessionConfig::load(&path).unwrap(), config);
    }
}
