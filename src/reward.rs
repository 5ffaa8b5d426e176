//! Reward models
//!
//! A reward model is a pure function of one transition: the previous cell,
//! the new cell, the obstacle set and the goal. Two strategies exist:
//!
//! - **Sparse**: a large payoff on reaching the goal and a flat step cost
//!   otherwise. Value has to propagate back from the goal over many episodes.
//! - **Shaped**: a step cost plus immediate feedback on whether the move got
//!   closer to the goal (Euclidean distance), and a penalty for entering an
//!   obstacle.
//!
//! Movement and training only ever evaluate valid moves, so the shaped
//! obstacle penalty is unreachable in normal play. It is still part of the
//! function so the model can be evaluated on arbitrary transitions.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::grid::Cell;

/// Payoffs for the sparse model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SparseRewards {
    /// Reward for entering the goal
    pub goal: f64,
    /// Reward for any other move
    pub step: f64,
}

impl Default for SparseRewards {
    fn default() -> Self {
        Self {
            goal: 100.0,
            step: -1.0,
        }
    }
}

/// Components of the shaped model
///
/// Every move earns `step`, then exactly one of `goal`, `closer` or
/// `farther`, plus `obstacle` when the new cell is blocked.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapedRewards {
    pub step: f64,
    pub goal: f64,
    pub closer: f64,
    pub farther: f64,
    pub obstacle: f64,
}

impl Default for ShapedRewards {
    fn default() -> Self {
        Self {
            step: -1.0,
            goal: 5.0,
            closer: 2.0,
            farther: -2.0,
            obstacle: -10.0,
        }
    }
}

/// Reward strategy, chosen once per session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RewardModel {
    Sparse(SparseRewards),
    Shaped(ShapedRewards),
}

impl RewardModel {
    pub fn sparse() -> Self {
        RewardModel::Sparse(SparseRewards::default())
    }

    pub fn shaped() -> Self {
        RewardModel::Shaped(ShapedRewards::default())
    }

    pub fn name(&self) -> &'static str {
        match self {
            RewardModel::Sparse(_) => "sparse",
            RewardModel::Shaped(_) => "shaped",
        }
    }

    /// Reward for moving from `previous` to `next`
    pub fn reward(
        &self,
        previous: Cell,
        next: Cell,
        obstacles: &BTreeSet<Cell>,
        goal: Cell,
    ) -> f64 {
        match self {
            RewardModel::Sparse(r) => {
                if next == goal {
                    r.goal
                } else {
                    r.step
                }
            }
            RewardModel::Shaped(r) => {
                let mut reward = r.step;
                if next == goal {
                    reward += r.goal;
                } else if next.euclidean_distance(goal) < previous.euclidean_distance(goal) {
                    reward += r.closer;
                } else {
                    reward += r.farther;
                }
                if obstacles.contains(&next) {
                    reward += r.obstacle;
                }
                reward
            }
        }
    }
}

impl Default for RewardModel {
    fn default() -> Self {
        RewardModel::sparse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GOAL: Cell = Cell::new(4, 4);

    fn no_obstacles() -> BTreeSet<Cell> {
        BTreeSet::new()
    }

    #[test]
    fn test_sparse_goal_and_step() {
        let model = RewardModel::sparse();
        let obstacles = no_obstacles();
        assert_eq!(
            model.reward(Cell::new(4, 3), GOAL, &obstacles, GOAL),
            100.0
        );
        assert_eq!(
            model.reward(Cell::new(0, 0), Cell::new(0, 1), &obstacles, GOAL),
            -1.0
        );
        // moving away costs the same as moving closer
        assert_eq!(
            model.reward(Cell::new(0, 1), Cell::new(0, 0), &obstacles, GOAL),
            -1.0
        );
    }

    #[test]
    fn test_shaped_goal() {
        let model = RewardModel::shaped();
        assert_eq!(
            model.reward(Cell::new(3, 4), GOAL, &no_obstacles(), GOAL),
            4.0
        );
    }

    #[test]
    fn test_shaped_closer_and_farther() {
        let model = RewardModel::shaped();
        let obstacles = no_obstacles();
        assert_eq!(
            model.reward(Cell::new(0, 0), Cell::new(0, 1), &obstacles, GOAL),
            1.0
        );
        assert_eq!(
            model.reward(Cell::new(0, 1), Cell::new(0, 0), &obstacles, GOAL),
            -3.0
        );
    }

    #[test]
    fn test_shaped_equal_distance_counts_as_farther() {
        // (4,3) and (3,4) are both 1 away from the goal
        let model = RewardModel::shaped();
        let goal = Cell::new(3, 3);
        assert_eq!(
            model.reward(Cell::new(2, 4), Cell::new(2, 3), &no_obstacles(), goal),
            1.0
        );
        assert_eq!(
            model.reward(Cell::new(4, 3), Cell::new(3, 4), &no_obstacles(), goal),
            -3.0
        );
    }

    #[test]
    fn test_shaped_obstacle_penalty() {
        let model = RewardModel::shaped();
        let obstacles: BTreeSet<Cell> = [Cell::new(0, 1)].into_iter().collect();
        assert_eq!(
            model.reward(Cell::new(0, 0), Cell::new(0, 1), &obstacles, GOAL),
            -9.0
        );
    }

    #[test]
    fn test_serde_tagging() {
        let json = serde_json::to_string(&RewardModel::shaped()).unwrap();
        assert!(json.contains("\"kind\":\"shaped\""));
        let parsed: RewardModel = serde_json::from_str(r#"{"kind":"sparse"}"#).unwrap();
        assert_eq!(parsed, RewardModel::sparse());
    }
}
