//! Dense Q-table for grid navigation

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    grid::{Action, Cell, Move},
};

/// Q-table mapping (cell, action) pairs to values
///
/// Stored densely as one row of [`Action::COUNT`] values per cell, rows in
/// `row * N + col` order. Every entry starts at zero. Deserialization goes
/// through [`QTable::from_rows`], so a decoded table always has `N * N` rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "QTableRepr")]
pub struct QTable {
    grid_size: usize,
    values: Vec<[f64; Action::COUNT]>,
}

#[derive(Deserialize)]
struct QTableRepr {
    grid_size: usize,
    values: Vec<Vec<f64>>,
}

impl TryFrom<QTableRepr> for QTable {
    type Error = Error;

    fn try_from(repr: QTableRepr) -> Result<Self> {
        QTable::from_rows(repr.grid_size, &repr.values)
    }
}

impl QTable {
    /// Create an all-zero table for an N x N grid
    ///
    /// # Panics
    ///
    /// Panics when `N * N` overflows; sessions only build tables for grids
    /// within [`MAX_GRID_SIZE`](crate::grid::MAX_GRID_SIZE).
    pub fn new(grid_size: usize) -> Self {
        Self {
            grid_size,
            values: vec![[0.0; Action::COUNT]; grid_size * grid_size],
        }
    }

    pub fn grid_size(&self) -> usize {
        self.grid_size
    }

    /// Number of states (rows)
    pub fn num_states(&self) -> usize {
        self.values.len()
    }

    /// Row index of `cell`, or `None` when it is off the grid
    pub fn state_index(&self, cell: Cell) -> Option<usize> {
        (cell.row < self.grid_size && cell.col < self.grid_size)
            .then(|| cell.row * self.grid_size + cell.col)
    }

    /// Get the value of a state-action pair
    ///
    /// Cells off the grid read as zero.
    pub fn value(&self, cell: Cell, action: Action) -> f64 {
        self.state_index(cell)
            .map_or(0.0, |idx| self.values[idx][action.index()])
    }

    /// All action values for `cell` in action index order
    pub fn row(&self, cell: Cell) -> [f64; Action::COUNT] {
        self.state_index(cell)
            .map_or([0.0; Action::COUNT], |idx| self.values[idx])
    }

    /// Overwrite the value of a state-action pair
    ///
    /// Writes to cells off the grid are dropped.
    pub fn update(&mut self, cell: Cell, action: Action, value: f64) {
        if let Some(idx) = self.state_index(cell) {
            self.values[idx][action.index()] = value;
        }
    }

    /// Highest-valued action among `candidates`
    ///
    /// Ties go to the candidate with the lowest action index, whatever order
    /// the candidates arrive in. Returns `None` only for an empty candidate
    /// list.
    pub fn best_valid_action<I>(&self, cell: Cell, candidates: I) -> Option<Action>
    where
        I: IntoIterator<Item = Action>,
    {
        let mut best: Option<(Action, f64)> = None;
        for action in candidates {
            let value = self.value(cell, action);
            best = match best {
                Some((held, held_value))
                    if held_value > value
                        || (held_value == value && held.index() <= action.index()) =>
                {
                    Some((held, held_value))
                }
                _ => Some((action, value)),
            };
        }
        best.map(|(action, _)| action)
    }

    /// Highest-valued move among `moves`, with the same tie-break as
    /// [`best_valid_action`](Self::best_valid_action)
    pub fn best_move(&self, cell: Cell, moves: &[Move]) -> Option<Move> {
        let action = self.best_valid_action(cell, moves.iter().map(|m| m.action))?;
        moves.iter().find(|m| m.action == action).copied()
    }

    /// Maximum value over `candidates`, or zero when there are none
    ///
    /// A cell with no way out has no continuation value.
    pub fn best_next_value<I>(&self, cell: Cell, candidates: I) -> f64
    where
        I: IntoIterator<Item = Action>,
    {
        candidates
            .into_iter()
            .map(|action| self.value(cell, action))
            .fold(None, |max: Option<f64>, v| Some(max.map_or(v, |m| m.max(v))))
            .unwrap_or(0.0)
    }

    /// Q-learning update: off-policy TD control
    ///
    /// Q(s,a) ← Q(s,a) + α[r + γ·next_value - Q(s,a)]
    ///
    /// Returns the new value.
    pub fn bellman_update(
        &mut self,
        cell: Cell,
        action: Action,
        reward: f64,
        next_value: f64,
        learning_rate: f64,
        discount_factor: f64,
    ) -> f64 {
        let current = self.value(cell, action);
        let td_target = reward + discount_factor * next_value;
        let updated = current + learning_rate * (td_target - current);
        self.update(cell, action, updated);
        updated
    }

    /// Reset every value to zero
    pub fn reset(&mut self) {
        self.values.fill([0.0; Action::COUNT]);
    }

    /// Export as a `[num_states][num_actions]` array
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.values.iter().map(|row| row.to_vec()).collect()
    }

    /// Import a `[num_states][num_actions]` array for an N x N grid
    ///
    /// # Errors
    ///
    /// Returns [`Error::TableShape`] unless there are exactly `N * N` rows of
    /// exactly [`Action::COUNT`] finite values, and
    /// [`Error::InvalidConfiguration`] when `N * N` overflows.
    pub fn from_rows(grid_size: usize, rows: &[Vec<f64>]) -> Result<Self> {
        let expected_states = grid_size.checked_mul(grid_size).ok_or_else(|| {
            Error::config(format!("grid size {grid_size} overflows the state count"))
        })?;
        let shape_error = |detail: String| Error::TableShape {
            expected_states,
            expected_actions: Action::COUNT,
            got_states: rows.len(),
            detail,
        };

        if rows.len() != expected_states {
            return Err(shape_error("wrong number of states".to_string()));
        }

        let mut values = Vec::with_capacity(expected_states);
        for (idx, row) in rows.iter().enumerate() {
            let entry: [f64; Action::COUNT] = row.as_slice().try_into().map_err(|_| {
                shape_error(format!("state {idx} has {} action values", row.len()))
            })?;
            if entry.iter().any(|v| !v.is_finite()) {
                return Err(shape_error(format!("state {idx} holds a non-finite value")));
            }
            values.push(entry);
        }

        Ok(Self { grid_size, values })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qtable_initialization() {
        let table = QTable::new(3);
        assert_eq!(table.num_states(), 9);
        for action in Action::ALL {
            assert_eq!(table.value(Cell::new(2, 2), action), 0.0);
        }
    }

    #[test]
    fn test_qtable_set_get() {
        let mut table = QTable::new(3);
        table.update(Cell::new(1, 2), Action::Up, 1.5);
        assert_eq!(table.value(Cell::new(1, 2), Action::Up), 1.5);
        assert_eq!(table.value(Cell::new(1, 2), Action::Down), 0.0);
        assert_eq!(table.row(Cell::new(1, 2)), [0.0, 0.0, 1.5, 0.0]);
    }

    #[test]
    fn test_out_of_grid_reads_zero_and_ignores_writes() {
        let mut table = QTable::new(2);
        table.update(Cell::new(5, 5), Action::Left, 3.0);
        assert_eq!(table.value(Cell::new(5, 5), Action::Left), 0.0);
        assert_eq!(table, QTable::new(2));
    }

    #[test]
    fn test_best_valid_action() {
        let mut table = QTable::new(3);
        let cell = Cell::new(1, 1);
        table.update(cell, Action::Left, 0.5);
        table.update(cell, Action::Right, 1.5);
        table.update(cell, Action::Up, 0.8);
        assert_eq!(
            table.best_valid_action(cell, Action::ALL),
            Some(Action::Right)
        );
        assert_eq!(
            table.best_valid_action(cell, [Action::Left, Action::Up]),
            Some(Action::Up)
        );
    }

    #[test]
    fn test_tie_break_prefers_lowest_index() {
        let mut table = QTable::new(3);
        let cell = Cell::new(1, 1);
        assert_eq!(
            table.best_valid_action(cell, [Action::Down, Action::Up, Action::Right]),
            Some(Action::Right)
        );

        table.update(cell, Action::Up, 2.0);
        table.update(cell, Action::Down, 2.0);
        assert_eq!(
            table.best_valid_action(cell, [Action::Down, Action::Up]),
            Some(Action::Up)
        );
    }

    #[test]
    fn test_best_valid_action_empty() {
        let table = QTable::new(3);
        assert_eq!(table.best_valid_action(Cell::new(0, 0), []), None);
    }

    #[test]
    fn test_best_next_value() {
        let mut table = QTable::new(3);
        let cell = Cell::new(0, 0);
        table.update(cell, Action::Right, -4.0);
        table.update(cell, Action::Down, -2.0);
        assert_eq!(
            table.best_next_value(cell, [Action::Right, Action::Down]),
            -2.0
        );
        assert_eq!(table.best_next_value(cell, []), 0.0);
    }

    #[test]
    fn test_bellman_update() {
        let mut table = QTable::new(3);
        let cell = Cell::new(0, 0);
        // Q = 0 + 0.5 * (-1 + 0.9 * 2.0 - 0) = 0.4
        let updated = table.bellman_update(cell, Action::Right, -1.0, 2.0, 0.5, 0.9);
        assert!((updated - 0.4).abs() < 1e-12);
        assert!((table.value(cell, Action::Right) - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_rows_layout() {
        let mut table = QTable::new(2);
        table.update(Cell::new(1, 0), Action::Down, 7.0);
        let rows = table.to_rows();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[2], vec![0.0, 0.0, 0.0, 7.0]);

        let restored = QTable::from_rows(2, &rows).unwrap();
        assert_eq!(restored, table);
    }

    #[test]
    fn test_from_rows_rejects_bad_shapes() {
        assert!(QTable::from_rows(2, &vec![vec![0.0; 4]; 3]).is_err());
        assert!(QTable::from_rows(1, &[vec![0.0; 3]]).is_err());
        assert!(QTable::from_rows(1, &[vec![0.0, f64::NAN, 0.0, 0.0]]).is_err());
    }

    #[test]
    fn test_deserialize_checks_shape() {
        let result = serde_json::from_str::<QTable>(r#"{"grid_size":3,"values":[]}"#);
        assert!(result.is_err());

        let mut table = QTable::new(2);
        table.update(Cell::new(0, 1), Action::Left, -2.5);
        let json = serde_json::to_string(&table).unwrap();
        let decoded: QTable = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, table);
        assert_eq!(decoded.value(Cell::new(0, 1), Action::Left), -2.5);
    }

    #[test]
    fn test_from_rows_rejects_overflowing_size() {
        assert!(matches!(
            QTable::from_rows(usize::MAX, &[]),
            Err(Error::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_reset() {
        let mut table = QTable::new(2);
        table.update(Cell::new(0, 0), Action::Left, 1.0);
        table.reset();
        assert_eq!(table, QTable::new(2));
    }
}
