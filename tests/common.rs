//! Common helpers for the gridnav test suite.
//!
//! Sessions built here use a fixed seed so trained policies are reproducible.

use gridnav::{Cell, Session, SessionConfig};

pub const SEED: u64 = 42;

/// Session on an N x N grid with the default hyperparameters
/// (α = 0.5, γ = 0.9, ε = 0.8, 1500 episodes of at most 100 steps).
pub fn seeded_session(size: usize, start: Cell, goal: Cell, obstacles: &[Cell]) -> Session {
    let config = SessionConfig::new(size, start, goal)
        .with_obstacles(obstacles.iter().copied())
        .with_seed(SEED);
    Session::new(config).unwrap()
}
