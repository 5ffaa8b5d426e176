//! Grid world paired with a reward model, as seen by the trainer

use super::{Cell, GridWorld, Move};
use crate::{ports::Environment, reward::RewardModel};

/// Read-only view of a [`GridWorld`] and the session's [`RewardModel`]
#[derive(Debug, Clone, Copy)]
pub struct GridEnvironment<'a> {
    world: &'a GridWorld,
    reward: &'a RewardModel,
}

impl<'a> GridEnvironment<'a> {
    pub fn new(world: &'a GridWorld, reward: &'a RewardModel) -> Self {
        Self { world, reward }
    }
}

impl Environment for GridEnvironment<'_> {
    fn grid_size(&self) -> usize {
        self.world.size()
    }

    fn start(&self) -> Cell {
        self.world.start()
    }

    fn is_goal(&self, cell: Cell) -> bool {
        cell == self.world.goal()
    }

    fn valid_moves(&self, cell: Cell) -> Vec<Move> {
        self.world.valid_moves(cell)
    }

    fn reward(&self, from: Cell, to: Cell) -> f64 {
        self.reward
            .reward(from, to, self.world.obstacles(), self.world.goal())
    }
}
