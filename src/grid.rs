//! Grid world: cells, actions, obstacle grid and the training environment

pub mod cell;
pub mod environment;
pub mod world;

pub use cell::{Action, Cell, Move};
pub use environment::GridEnvironment;
pub use world::{GoalOutcome, GoalRejection, GridWorld, MAX_GRID_SIZE, ToggleOutcome};
