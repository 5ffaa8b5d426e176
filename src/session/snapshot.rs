//! Read-only session view for rendering

use serde::{Deserialize, Serialize};

use super::Phase;
use crate::grid::Cell;

/// Everything a presenter needs to draw the session
///
/// Plain data; drawing it is up to the presenter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub grid_size: usize,
    pub cell_size: u32,
    /// Obstacles in row-major order
    pub obstacles: Vec<Cell>,
    pub start: Cell,
    pub goal: Cell,
    pub agent: Cell,
    pub step_count: u64,
    pub total_score: f64,
    pub phase: Phase,
}
