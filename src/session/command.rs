//! Presenter commands

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use crate::grid::Cell;

/// Where a pointer event landed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Point {
    /// Already resolved to a cell
    Cell(Cell),
    /// Pixel coordinates on a canvas drawn at a fixed cell size
    Pixel { x: u32, y: u32 },
}

impl Point {
    /// Resolve to a grid cell: row from `y`, column from `x`
    ///
    /// Pixels past the last cell resolve to an out-of-bounds cell.
    pub fn to_cell(self, cell_size: NonZeroU32) -> Cell {
        match self {
            Point::Cell(cell) => cell,
            Point::Pixel { x, y } => {
                let size = cell_size.get();
                Cell::new((y / size) as usize, (x / size) as usize)
            }
        }
    }
}

impl From<Cell> for Point {
    fn from(cell: Cell) -> Self {
        Point::Cell(cell)
    }
}

/// A user-visible command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    Train,
    StepAgent,
    ResetSession,
    ToggleObstacleAt { at: Point },
    SetGoalAt { at: Point },
}
