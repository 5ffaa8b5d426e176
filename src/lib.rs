//! Tabular Q-learning agent navigating an editable obstacle grid
//!
//! This crate provides:
//! - A square grid world with obstacles, a fixed start and a movable goal
//! - Sparse and distance-shaped reward strategies
//! - A dense Q-table with deterministic lowest-index tie-breaking
//! - An ε-greedy trainer with pluggable observers
//! - An interactive session (step, reset, edit, train) with snapshots
//! - Q-table persistence with an all-zero fallback

pub mod adapters;
pub mod app;
pub mod cli;
pub mod error;
pub mod grid;
pub mod pipeline;
pub mod ports;
pub mod q_learning;
pub mod reward;
pub mod session;

pub use app::SessionConfig;
pub use error::{Error, Result};
pub use grid::{Action, Cell, GridWorld};
pub use pipeline::{Trainer, TrainingConfig, TrainingReport};
pub use q_learning::QTable;
pub use reward::RewardModel;
pub use session::{Command, CommandOutcome, Session, Snapshot, StepOutcome};
