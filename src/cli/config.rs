//! Session flags shared by every command

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Args, ValueEnum};

use crate::{
    app::SessionConfig, grid::Cell, q_learning::EpsilonSchedule, reward::RewardModel,
};

/// Reward strategy selectable on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RewardKind {
    /// +100 at the goal, -1 per step
    Sparse,
    /// Distance-shaped rewards with a penalty for entering an obstacle cell
    Shaped,
}

impl From<RewardKind> for RewardModel {
    fn from(kind: RewardKind) -> Self {
        match kind {
            RewardKind::Sparse => RewardModel::sparse(),
            RewardKind::Shaped => RewardModel::shaped(),
        }
    }
}

/// Grid and trainer flags
///
/// Flags override values loaded from `--config`.
#[derive(Debug, Clone, Default, Args)]
pub struct SessionArgs {
    /// JSON session configuration file
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Grid side length N (at most 1024)
    #[arg(long, short = 'n')]
    pub size: Option<usize>,

    /// Start cell as "row,col"
    #[arg(long, value_parser = parse_cell)]
    pub start: Option<Cell>,

    /// Goal cell as "row,col" (defaults to the far corner when --size is given)
    #[arg(long, value_parser = parse_cell)]
    pub goal: Option<Cell>,

    /// Obstacle cell as "row,col"; repeat for more
    #[arg(long = "obstacle", value_parser = parse_cell)]
    pub obstacles: Vec<Cell>,

    /// Reward strategy
    #[arg(long, value_enum)]
    pub reward: Option<RewardKind>,

    /// Number of training episodes
    #[arg(long, short = 'e')]
    pub episodes: Option<usize>,

    /// Step budget per episode
    #[arg(long)]
    pub max_steps: Option<usize>,

    /// Learning rate α
    #[arg(long)]
    pub learning_rate: Option<f64>,

    /// Discount factor γ
    #[arg(long)]
    pub discount: Option<f64>,

    /// Exploration rate ε
    #[arg(long)]
    pub epsilon: Option<f64>,

    /// Multiply ε by this factor after every episode
    #[arg(long)]
    pub epsilon_decay: Option<f64>,

    /// Floor for a decaying ε
    #[arg(long, default_value_t = 0.01)]
    pub epsilon_min: f64,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,
}

impl SessionArgs {
    /// Resolve the flags into a validated session configuration
    pub fn to_config(&self) -> Result<SessionConfig> {
        let mut config = match &self.config {
            Some(path) => SessionConfig::load(path)
                .with_context(|| format!("Failed to load session config {}", path.display()))?,
            None => SessionConfig::default(),
        };

        if let Some(size) = self.size {
            if size == 0 {
                bail!("--size must be at least 1");
            }
            config.grid_size = size;
            if self.goal.is_none() {
                config.goal = Cell::new(size - 1, size - 1);
            }
        }
        if let Some(start) = self.start {
            config.start = start;
        }
        if let Some(goal) = self.goal {
            config.goal = goal;
        }
        if !self.obstacles.is_empty() {
            config.obstacles = self.obstacles.clone();
        }
        if let Some(kind) = self.reward {
            config.reward = kind.into();
        }

        let training = &mut config.training;
        if let Some(episodes) = self.episodes {
            training.episodes = episodes;
        }
        if let Some(max_steps) = self.max_steps {
            training.max_steps = max_steps;
        }
        if let Some(learning_rate) = self.learning_rate {
            training.learning_rate = learning_rate;
        }
        if let Some(discount) = self.discount {
            training.discount_factor = discount;
        }
        if let Some(epsilon) = self.epsilon {
            training.epsilon = epsilon;
        }
        if let Some(decay) = self.epsilon_decay {
            training.epsilon_schedule = EpsilonSchedule::Multiplicative {
                decay,
                min: self.epsilon_min,
            };
        }
        if self.seed.is_some() {
            training.seed = self.seed;
        }

        config.validate()?;
        Ok(config)
    }
}

/// Parse a cell written as "row,col"
pub fn parse_cell(value: &str) -> std::result::Result<Cell, String> {
    let (row, col) = value
        .split_once(',')
        .ok_or_else(|| format!("expected \"row,col\", got '{value}'"))?;
    let parse = |part: &str, name: &str| {
        part.trim()
            .parse::<usize>()
            .map_err(|e| format!("invalid {name} '{}': {e}", part.trim()))
    };
    Ok(Cell::new(parse(row, "row")?, parse(col, "column")?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cell() {
        assert_eq!(parse_cell("2,3"), Ok(Cell::new(2, 3)));
        assert_eq!(parse_cell(" 0 , 10 "), Ok(Cell::new(0, 10)));
        assert!(parse_cell("2").is_err());
        assert!(parse_cell("a,1").is_err());
        assert!(parse_cell("-1,1").is_err());
    }

    #[test]
    fn test_defaults_without_flags() {
        let config = SessionArgs::default().to_config().unwrap();
        assert_eq!(config, SessionConfig::default());
    }

    #[test]
    fn test_size_moves_goal_to_far_corner() {
        let args = SessionArgs {
            size: Some(5),
            ..Default::default()
        };
        let config = args.to_config().unwrap();
        assert_eq!(config.grid_size, 5);
        assert_eq!(config.goal, Cell::new(4, 4));
    }

    #[test]
    fn test_flags_override_training() {
        let args = SessionArgs {
            size: Some(4),
            reward: Some(RewardKind::Shaped),
            episodes: Some(20),
            epsilon_decay: Some(0.99),
            seed: Some(3),
            ..Default::default()
        };
        let config = args.to_config().unwrap();
        assert_eq!(config.reward, RewardModel::shaped());
        assert_eq!(config.training.episodes, 20);
        assert_eq!(config.training.seed, Some(3));
        assert_eq!(
            config.training.epsilon_schedule,
            EpsilonSchedule::Multiplicative {
                decay: 0.99,
                min: 0.0
            }
        );
    }

    #[test]
    fn test_invalid_layout_rejected() {
        let args = SessionArgs {
            size: Some(3),
            goal: Some(Cell::new(0, 0)),
            ..Default::default()
        };
        assert!(args.to_config().is_err());
    }
}
