//! Cell coordinates and movement actions

use std::fmt;

use serde::{Deserialize, Serialize};

/// A cell on the grid, addressed by row then column
///
/// Row 0 is the top edge, column 0 the left edge.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Apply an action's offset, returning `None` when the result would have
    /// a negative coordinate.
    ///
    /// The upper bound is not checked here; that depends on the grid size.
    pub fn offset(self, action: Action) -> Option<Cell> {
        let (d_row, d_col) = action.delta();
        Some(Cell {
            row: self.row.checked_add_signed(d_row)?,
            col: self.col.checked_add_signed(d_col)?,
        })
    }

    /// Straight-line distance between cell centres
    pub fn euclidean_distance(self, other: Cell) -> f64 {
        let d_row = self.row as f64 - other.row as f64;
        let d_col = self.col as f64 - other.col as f64;
        (d_row * d_row + d_col * d_col).sqrt()
    }

    pub fn manhattan_distance(self, other: Cell) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }
}

impl From<(usize, usize)> for Cell {
    fn from((row, col): (usize, usize)) -> Self {
        Cell::new(row, col)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// One of the four movement directions
///
/// The declaration order is the action index order. Persisted tables store
/// their columns in this order and greedy selection breaks ties towards the
/// lowest index, so the order must never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Left,
    Right,
    Up,
    Down,
}

impl Action {
    /// Number of actions, i.e. the width of a Q-table row
    pub const COUNT: usize = 4;

    /// All actions in index order
    pub const ALL: [Action; Action::COUNT] = [Action::Left, Action::Right, Action::Up, Action::Down];

    pub fn index(self) -> usize {
        match self {
            Action::Left => 0,
            Action::Right => 1,
            Action::Up => 2,
            Action::Down => 3,
        }
    }

    pub fn from_index(index: usize) -> Option<Action> {
        Action::ALL.get(index).copied()
    }

    /// (Δrow, Δcol) offset applied by this action
    pub fn delta(self) -> (isize, isize) {
        match self {
            Action::Left => (0, -1),
            Action::Right => (0, 1),
            Action::Up => (-1, 0),
            Action::Down => (1, 0),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::Left => "left",
            Action::Right => "right",
            Action::Up => "up",
            Action::Down => "down",
        };
        f.write_str(name)
    }
}

/// A valid move: the action taken and the cell it leads to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub action: Action,
    pub target: Cell,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_indices_are_stable() {
        for (i, action) in Action::ALL.iter().enumerate() {
            assert_eq!(action.index(), i);
            assert_eq!(Action::from_index(i), Some(*action));
        }
        assert_eq!(Action::from_index(4), None);
    }

    #[test]
    fn test_offset_rejects_negative_coordinates() {
        let origin = Cell::new(0, 0);
        assert_eq!(origin.offset(Action::Left), None);
        assert_eq!(origin.offset(Action::Up), None);
        assert_eq!(origin.offset(Action::Right), Some(Cell::new(0, 1)));
        assert_eq!(origin.offset(Action::Down), Some(Cell::new(1, 0)));
    }

    #[test]
    fn test_distances() {
        let a = Cell::new(0, 0);
        let b = Cell::new(3, 4);
        assert_eq!(a.euclidean_distance(b), 5.0);
        assert_eq!(a.manhattan_distance(b), 7);
        assert_eq!(b.manhattan_distance(a), 7);
    }
}
