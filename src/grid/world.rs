//! Grid world state and validity queries

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::cell::{Action, Cell, Move};
use crate::{Error, Result};

/// Largest accepted side length; keeps the Q-table at about a million states
pub const MAX_GRID_SIZE: usize = 1024;

/// Result of toggling an obstacle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ToggleOutcome {
    Placed { cell: Cell },
    Removed { cell: Cell },
    /// Start, goal and out-of-bounds cells are never toggled
    Ignored { cell: Cell },
}

/// Why a goal placement was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalRejection {
    Obstacle,
    OutOfBounds,
    Start,
}

/// Result of relocating the goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GoalOutcome {
    Moved { from: Cell, to: Cell },
    Rejected { cell: Cell, reason: GoalRejection },
}

/// Square grid with obstacles, a fixed start, a movable goal and the agent
///
/// Invariants maintained by every method:
/// - `start` and `goal` are in bounds and never obstacles
/// - `goal != start`
/// - `agent` is in bounds
///
/// Deserialized worlds are rebuilt through [`GridWorld::new`] and
/// [`GridWorld::with_obstacles`], so they hold the same invariants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GridWorldRepr")]
pub struct GridWorld {
    size: usize,
    obstacles: BTreeSet<Cell>,
    start: Cell,
    goal: Cell,
    agent: Cell,
}

#[derive(Deserialize)]
struct GridWorldRepr {
    size: usize,
    obstacles: BTreeSet<Cell>,
    start: Cell,
    goal: Cell,
    agent: Cell,
}

impl TryFrom<GridWorldRepr> for GridWorld {
    type Error = Error;

    fn try_from(repr: GridWorldRepr) -> Result<Self> {
        let mut world = GridWorld::new(repr.size, repr.start, repr.goal)?
            .with_obstacles(repr.obstacles)?;
        if !world.is_in_bounds(repr.agent) {
            return Err(Error::OutOfBounds {
                cell: repr.agent,
                size: repr.size,
            });
        }
        world.agent = repr.agent;
        Ok(world)
    }
}

impl GridWorld {
    /// Create an obstacle-free grid with the agent at `start`
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] when `size` is zero or above
    /// [`MAX_GRID_SIZE`], or when start and goal coincide, and
    /// [`Error::OutOfBounds`] when either cell is off the grid.
    pub fn new(size: usize, start: Cell, goal: Cell) -> Result<Self> {
        if size == 0 {
            return Err(Error::config("grid size must be at least 1"));
        }
        if size > MAX_GRID_SIZE {
            return Err(Error::config(format!(
                "grid size {size} exceeds the maximum of {MAX_GRID_SIZE}"
            )));
        }
        for cell in [start, goal] {
            if cell.row >= size || cell.col >= size {
                return Err(Error::OutOfBounds { cell, size });
            }
        }
        if start == goal {
            return Err(Error::config(format!(
                "start and goal must differ (both are {start})"
            )));
        }

        Ok(Self {
            size,
            obstacles: BTreeSet::new(),
            start,
            goal,
            agent: start,
        })
    }

    /// Place a fixed set of obstacles, failing on cells that may not hold one
    pub fn with_obstacles<I>(mut self, cells: I) -> Result<Self>
    where
        I: IntoIterator<Item = Cell>,
    {
        for cell in cells {
            if !self.is_in_bounds(cell) {
                return Err(Error::OutOfBounds {
                    cell,
                    size: self.size,
                });
            }
            if cell == self.start || cell == self.goal {
                return Err(Error::config(format!(
                    "obstacle at {cell} would cover the start or goal"
                )));
            }
            self.obstacles.insert(cell);
        }
        Ok(self)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn start(&self) -> Cell {
        self.start
    }

    pub fn goal(&self) -> Cell {
        self.goal
    }

    pub fn agent(&self) -> Cell {
        self.agent
    }

    pub fn obstacles(&self) -> &BTreeSet<Cell> {
        &self.obstacles
    }

    pub fn is_in_bounds(&self, cell: Cell) -> bool {
        cell.row < self.size && cell.col < self.size
    }

    pub fn is_obstacle(&self, cell: Cell) -> bool {
        self.obstacles.contains(&cell)
    }

    /// A cell the agent may occupy
    pub fn is_open(&self, cell: Cell) -> bool {
        self.is_in_bounds(cell) && !self.is_obstacle(cell)
    }

    /// Moves from `cell` that stay on the grid and avoid obstacles, in
    /// action index order. An empty list means the agent is stuck.
    pub fn valid_moves(&self, cell: Cell) -> Vec<Move> {
        Action::ALL
            .iter()
            .filter_map(|&action| {
                let target = cell.offset(action)?;
                self.is_open(target).then_some(Move { action, target })
            })
            .collect()
    }

    /// Flip obstacle membership of `cell`
    ///
    /// The start and goal cells (and cells off the grid) are left untouched.
    pub fn toggle_obstacle(&mut self, cell: Cell) -> ToggleOutcome {
        if cell == self.start || cell == self.goal || !self.is_in_bounds(cell) {
            debug!(%cell, "obstacle toggle ignored");
            return ToggleOutcome::Ignored { cell };
        }

        if self.obstacles.remove(&cell) {
            debug!(%cell, "obstacle removed");
            ToggleOutcome::Removed { cell }
        } else {
            self.obstacles.insert(cell);
            debug!(%cell, "obstacle placed");
            ToggleOutcome::Placed { cell }
        }
    }

    /// Relocate the goal unless the target is obstructed, off the grid, or
    /// the start cell
    pub fn set_goal(&mut self, cell: Cell) -> GoalOutcome {
        let reason = if !self.is_in_bounds(cell) {
            Some(GoalRejection::OutOfBounds)
        } else if self.is_obstacle(cell) {
            Some(GoalRejection::Obstacle)
        } else if cell == self.start {
            Some(GoalRejection::Start)
        } else {
            None
        };

        if let Some(reason) = reason {
            debug!(%cell, ?reason, "goal placement rejected");
            return GoalOutcome::Rejected { cell, reason };
        }

        let from = std::mem::replace(&mut self.goal, cell);
        debug!(%from, to = %cell, "goal moved");
        GoalOutcome::Moved { from, to: cell }
    }

    pub fn reset_agent(&mut self) {
        self.agent = self.start;
    }

    /// Commit the agent to `cell`
    ///
    /// Only open cells are accepted; anything else means a move slipped past
    /// the validity filter.
    pub(crate) fn move_agent(&mut self, cell: Cell) -> Result<()> {
        if !self.is_open(cell) {
            return Err(Error::IllegalMove {
                from: self.agent,
                to: cell,
            });
        }
        self.agent = cell;
        Ok(())
    }
}
