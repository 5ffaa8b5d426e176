//! Obstacle and goal editing

use serde::{Deserialize, Serialize};

use super::Phase;
use crate::grid::{Cell, GoalOutcome, GridWorld, ToggleOutcome};

/// Result of an edit request
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditOutcome {
    Obstacle(ToggleOutcome),
    Goal(GoalOutcome),
    /// Training or stepping is in progress; the grid was left alone
    Busy,
}

/// Applies user edits to a grid while the session is idle
pub struct SessionEditor<'a> {
    world: &'a mut GridWorld,
    phase: Phase,
}

impl<'a> SessionEditor<'a> {
    pub fn new(world: &'a mut GridWorld, phase: Phase) -> Self {
        Self { world, phase }
    }

    /// Add or remove an obstacle at `cell`
    pub fn toggle_obstacle(&mut self, cell: Cell) -> EditOutcome {
        if self.phase.is_busy() {
            return EditOutcome::Busy;
        }
        EditOutcome::Obstacle(self.world.toggle_obstacle(cell))
    }

    /// Move the goal to `cell`
    ///
    /// The Q-table is not touched; it reflects the old goal until the next
    /// training run.
    pub fn set_goal(&mut self, cell: Cell) -> EditOutcome {
        if self.phase.is_busy() {
            return EditOutcome::Busy;
        }
        EditOutcome::Goal(self.world.set_goal(cell))
    }
}
