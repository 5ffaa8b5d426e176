//! Tabular Q-learning
//!
//! Q-learning is off-policy TD control: every update moves Q(s,a) toward
//! the immediate reward plus the discounted best value available from the
//! successor cell, regardless of which action the behaviour policy takes
//! next.
//!
//! ```text
//! Q(s,a) ← Q(s,a) + α[r + γ·max_a' Q(s',a') - Q(s,a)]
//! ```
//!
//! The maximum only ranges over moves that are valid from `s'`; a cell with
//! no valid move contributes zero.
//!
//! ## Usage Example
//!
//! ```
//! use gridnav::grid::{Action, Cell};
//! use gridnav::q_learning::QTable;
//!
//! let mut table = QTable::new(5);
//! table.bellman_update(Cell::new(0, 0), Action::Right, -1.0, 0.0, 0.5, 0.9);
//! assert_eq!(table.value(Cell::new(0, 0), Action::Right), -0.5);
//!
//! // Untouched actions stay at zero, so Down now wins the comparison
//! let best = table.best_valid_action(Cell::new(0, 0), [Action::Right, Action::Down]);
//! assert_eq!(best, Some(Action::Down));
//! ```

pub mod q_table;
pub mod schedule;

// Public re-exports
pub use q_table::QTable;
pub use schedule::EpsilonSchedule;
