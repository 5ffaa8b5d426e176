//! Environment port - what the trainer needs from a world
//!
//! The trainer only asks four questions of the world it learns in. Any
//! deterministic, grid-indexed environment answering them can be trained
//! on without changing the trainer or the movement controller.

use crate::grid::{Cell, Move};

/// Deterministic, cell-indexed environment
pub trait Environment {
    /// Side length of the square state grid; sizes the Q-table.
    fn grid_size(&self) -> usize;

    /// Cell every episode starts from.
    fn start(&self) -> Cell;

    /// Whether `cell` ends an episode successfully.
    fn is_goal(&self, cell: Cell) -> bool;

    /// Moves available from `cell`, in action index order.
    ///
    /// An empty list is a legal answer and ends the episode.
    fn valid_moves(&self, cell: Cell) -> Vec<Move>;

    /// Reward for the transition `from -> to`.
    fn reward(&self, from: Cell, to: Cell) -> f64;
}
