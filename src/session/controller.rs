//! Greedy single-step movement

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    Result,
    grid::{Action, Cell, GridWorld, Move},
    q_learning::QTable,
    reward::RewardModel,
};

/// Step count and accumulated score shown to the user
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionCounters {
    /// Moves since the last reset or goal arrival
    pub step_count: u64,
    /// Reward accumulated since the last explicit reset
    pub total_score: f64,
}

/// Result of one greedy step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StepOutcome {
    Moved {
        from: Cell,
        to: Cell,
        action: Action,
        reward: f64,
    },
    /// The agent entered the goal and was sent back to the start.
    /// `steps` is the step count at arrival.
    GoalReached {
        from: Cell,
        goal: Cell,
        action: Action,
        reward: f64,
        steps: u64,
    },
    /// No open neighbour; nothing changed
    Stuck { at: Cell },
    /// Another operation is in progress; nothing changed
    Busy,
}

/// Moves the agent one cell along the current greedy policy
///
/// The controller borrows the session parts it needs for a single step, so
/// a caller can drive any world and table pair with it.
pub struct MovementController<'a> {
    world: &'a mut GridWorld,
    table: &'a QTable,
    reward: &'a RewardModel,
    counters: &'a mut SessionCounters,
}

impl<'a> MovementController<'a> {
    pub fn new(
        world: &'a mut GridWorld,
        table: &'a QTable,
        reward: &'a RewardModel,
        counters: &'a mut SessionCounters,
    ) -> Self {
        Self {
            world,
            table,
            reward,
            counters,
        }
    }

    /// Take the highest-valued valid move from the agent's cell
    ///
    /// Ties go to the lowest action index. Reaching the goal returns the
    /// agent to the start and zeroes the step count; the score is kept.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IllegalMove`](crate::Error::IllegalMove) if the chosen
    /// target is not an open cell, which would mean the world and its move
    /// list disagree.
    pub fn step(&mut self) -> Result<StepOutcome> {
        let from = self.world.agent();
        let moves = self.world.valid_moves(from);
        let Some(chosen) = self.table.best_move(from, &moves) else {
            debug!(%from, "no valid move");
            return Ok(StepOutcome::Stuck { at: from });
        };

        self.commit(from, chosen)
    }

    /// Move the agent along `chosen`, then charge its reward to the counters
    ///
    /// A refused move leaves the world and the counters as they were.
    fn commit(&mut self, from: Cell, chosen: Move) -> Result<StepOutcome> {
        let to = chosen.target;
        let reward = self
            .reward
            .reward(from, to, self.world.obstacles(), self.world.goal());
        self.world.move_agent(to)?;
        self.counters.total_score += reward;
        if to != from {
            self.counters.step_count += 1;
        }

        if to == self.world.goal() {
            let steps = self.counters.step_count;
            info!(steps, score = self.counters.total_score, "goal reached");
            self.world.reset_agent();
            self.counters.step_count = 0;
            return Ok(StepOutcome::GoalReached {
                from,
                goal: to,
                action: chosen.action,
                reward,
                steps,
            });
        }

        debug!(%from, %to, action = %chosen.action, reward, "agent moved");
        Ok(StepOutcome::Moved {
            from,
            to,
            action: chosen.action,
            reward,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world(size: usize, goal: Cell) -> GridWorld {
        GridWorld::new(size, Cell::new(0, 0), goal).unwrap()
    }

    #[test]
    fn test_untrained_step_takes_lowest_valid_action() {
        // From (0,0) Left and Up are off the grid, so Right wins the all-zero tie.
        let mut world = world(3, Cell::new(2, 2));
        let table = QTable::new(3);
        let reward = RewardModel::sparse();
        let mut counters = SessionCounters::default();

        let outcome = MovementController::new(&mut world, &table, &reward, &mut counters)
            .step()
            .unwrap();

        assert_eq!(
            outcome,
            StepOutcome::Moved {
                from: Cell::new(0, 0),
                to: Cell::new(0, 1),
                action: Action::Right,
                reward: -1.0,
            }
        );
        assert_eq!(world.agent(), Cell::new(0, 1));
        assert_eq!(counters.step_count, 1);
        assert_eq!(counters.total_score, -1.0);
    }

    #[test]
    fn test_follows_highest_value() {
        let mut world = world(3, Cell::new(2, 2));
        let mut table = QTable::new(3);
        table.update(Cell::new(0, 0), Action::Down, 5.0);
        let reward = RewardModel::sparse();
        let mut counters = SessionCounters::default();

        MovementController::new(&mut world, &table, &reward, &mut counters)
            .step()
            .unwrap();
        assert_eq!(world.agent(), Cell::new(1, 0));
    }

    #[test]
    fn test_goal_arrival_resets_agent_and_step_count_only() {
        let mut world = world(2, Cell::new(0, 1));
        let table = QTable::new(2);
        let reward = RewardModel::sparse();
        let mut counters = SessionCounters {
            step_count: 4,
            total_score: -4.0,
        };

        let outcome = MovementController::new(&mut world, &table, &reward, &mut counters)
            .step()
            .unwrap();

        assert_eq!(
            outcome,
            StepOutcome::GoalReached {
                from: Cell::new(0, 0),
                goal: Cell::new(0, 1),
                action: Action::Right,
                reward: 100.0,
                steps: 5,
            }
        );
        assert_eq!(world.agent(), Cell::new(0, 0));
        assert_eq!(counters.step_count, 0);
        assert_eq!(counters.total_score, 96.0);
    }

    #[test]
    fn test_walled_in_agent_is_stuck() {
        let mut world = world(3, Cell::new(2, 2))
            .with_obstacles([Cell::new(0, 1), Cell::new(1, 0)])
            .unwrap();
        let table = QTable::new(3);
        let reward = RewardModel::sparse();
        let mut counters = SessionCounters::default();

        let outcome = MovementController::new(&mut world, &table, &reward, &mut counters)
            .step()
            .unwrap();

        assert_eq!(outcome, StepOutcome::Stuck { at: Cell::new(0, 0) });
        assert_eq!(world.agent(), Cell::new(0, 0));
        assert_eq!(counters, SessionCounters::default());
    }

    #[test]
    fn test_refused_move_leaves_counters_untouched() {
        let mut world = world(3, Cell::new(2, 2))
            .with_obstacles([Cell::new(0, 1)])
            .unwrap();
        let table = QTable::new(3);
        let reward = RewardModel::sparse();
        let mut counters = SessionCounters {
            step_count: 2,
            total_score: -2.0,
        };
        let blocked = Move {
            action: Action::Right,
            target: Cell::new(0, 1),
        };

        let result = MovementController::new(&mut world, &table, &reward, &mut counters)
            .commit(Cell::new(0, 0), blocked);

        assert!(matches!(result, Err(crate::Error::IllegalMove { .. })));
        assert_eq!(world.agent(), Cell::new(0, 0));
        assert_eq!(
            counters,
            SessionCounters {
                step_count: 2,
                total_score: -2.0,
            }
        );
    }

    #[test]
    fn test_never_enters_obstacle_even_with_high_value() {
        let mut world = world(3, Cell::new(2, 2))
            .with_obstacles([Cell::new(0, 1)])
            .unwrap();
        let mut table = QTable::new(3);
        table.update(Cell::new(0, 0), Action::Right, 1000.0);
        let reward = RewardModel::sparse();
        let mut counters = SessionCounters::default();

        MovementController::new(&mut world, &table, &reward, &mut counters)
            .step()
            .unwrap();
        assert_eq!(world.agent(), Cell::new(1, 0));
    }
}
