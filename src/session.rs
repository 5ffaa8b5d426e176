//! Interactive navigation session
//!
//! A [`Session`] owns the grid, the Q-table, the reward strategy and the
//! trainer, and exposes the operations a presenter binds to user input:
//! train, step, reset and the two edits. Every operation runs to completion
//! before returning; requests arriving while another operation holds the
//! session are answered with a `Busy` outcome and change nothing.

pub mod command;
pub mod controller;
pub mod editor;
pub mod snapshot;

pub use command::{Command, Point};
pub use controller::{MovementController, SessionCounters, StepOutcome};
pub use editor::{EditOutcome, SessionEditor};
pub use snapshot::Snapshot;

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    Error, Result,
    app::SessionConfig,
    grid::{Action, Cell, GridEnvironment, GridWorld},
    pipeline::{Trainer, TrainingReport},
    ports::TrainingObserver,
    q_learning::QTable,
    reward::RewardModel,
};

/// What the session is doing right now
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Idle,
    Training,
    Stepping,
}

impl Phase {
    pub fn is_busy(self) -> bool {
        self != Phase::Idle
    }
}

/// Result of a training request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrainOutcome {
    Completed(TrainingReport),
    Busy,
}

/// Result of dispatching a [`Command`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandOutcome {
    Trained(TrainingReport),
    Stepped(StepOutcome),
    Reset,
    Edited(EditOutcome),
    Busy,
}

/// How a greedy rollout ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RolloutEnd {
    /// `steps` counts only the moves made by this rollout
    ReachedGoal { steps: u64 },
    Stuck,
    StepLimit,
    Busy,
}

/// Cells visited by repeated greedy steps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rollout {
    /// Visited cells, starting with the agent's cell; ends at the goal when
    /// it was reached
    pub path: Vec<Cell>,
    pub end: RolloutEnd,
    /// Reward collected along the path
    pub reward: f64,
}

impl Rollout {
    pub fn reached_goal(&self) -> bool {
        matches!(self.end, RolloutEnd::ReachedGoal { .. })
    }
}

/// Grid, policy and counters for one interactive run
///
/// # Examples
///
/// ```
/// use gridnav::app::SessionConfig;
/// use gridnav::grid::Cell;
/// use gridnav::pipeline::TrainingConfig;
/// use gridnav::session::Session;
///
/// let config = SessionConfig::new(4, Cell::new(0, 0), Cell::new(3, 3))
///     .with_training(TrainingConfig { episodes: 500, ..Default::default() })
///     .with_seed(7);
/// let mut session = Session::new(config).unwrap();
/// session.train().unwrap();
/// let rollout = session.rollout(16).unwrap();
/// assert!(rollout.reached_goal());
/// ```
pub struct Session {
    world: GridWorld,
    table: QTable,
    reward: RewardModel,
    trainer: Trainer,
    counters: SessionCounters,
    phase: Phase,
    cell_size: NonZeroU32,
}

impl Session {
    /// Build a session with an all-zero Q-table
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] (or a grid error) when the
    /// configuration does not validate.
    pub fn new(config: SessionConfig) -> Result<Self> {
        config.validate()?;
        let world = config.build_world()?;
        let cell_size = NonZeroU32::new(config.cell_size)
            .ok_or_else(|| Error::config("cell size must be at least 1 pixel"))?;
        info!(
            grid_size = world.size(),
            obstacles = world.obstacles().len(),
            reward = config.reward.name(),
            "session created"
        );
        Ok(Self {
            table: QTable::new(world.size()),
            world,
            reward: config.reward,
            trainer: Trainer::new(config.training)?,
            counters: SessionCounters::default(),
            phase: Phase::Idle,
            cell_size,
        })
    }

    /// Start from a previously learned table
    pub fn with_table(mut self, table: QTable) -> Result<Self> {
        self.replace_table(table)?;
        Ok(self)
    }

    /// Swap in another Q-table for the same grid size
    ///
    /// # Errors
    ///
    /// Returns [`Error::TableShape`] when the table was built for another
    /// grid size.
    pub fn replace_table(&mut self, table: QTable) -> Result<()> {
        if table.grid_size() != self.world.size() {
            return Err(Error::TableShape {
                expected_states: self.world.size() * self.world.size(),
                expected_actions: Action::COUNT,
                got_states: table.num_states(),
                detail: "table was built for another grid".to_string(),
            });
        }
        self.table = table;
        Ok(())
    }

    /// Attach an observer to every subsequent training run
    pub fn add_observer(&mut self, observer: Box<dyn TrainingObserver>) {
        self.trainer.add_observer(observer);
    }

    pub fn world(&self) -> &GridWorld {
        &self.world
    }

    pub fn table(&self) -> &QTable {
        &self.table
    }

    pub fn reward_model(&self) -> &RewardModel {
        &self.reward
    }

    pub fn counters(&self) -> SessionCounters {
        self.counters
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn cell_size(&self) -> u32 {
        self.cell_size.get()
    }

    /// Run the full training schedule against the current grid
    ///
    /// The agent position and counters are untouched.
    pub fn train(&mut self) -> Result<TrainOutcome> {
        if self.phase.is_busy() {
            return Ok(TrainOutcome::Busy);
        }

        self.phase = Phase::Training;
        let env = GridEnvironment::new(&self.world, &self.reward);
        let result = self.trainer.train(&env, &mut self.table);
        self.phase = Phase::Idle;

        let report = result?;
        info!(
            success_rate = report.success_rate,
            mean_reward = report.mean_reward,
            "session training finished"
        );
        Ok(TrainOutcome::Completed(report))
    }

    /// Move the agent one greedy step
    pub fn step(&mut self) -> Result<StepOutcome> {
        if self.phase.is_busy() {
            return Ok(StepOutcome::Busy);
        }

        self.phase = Phase::Stepping;
        let result = MovementController::new(
            &mut self.world,
            &self.table,
            &self.reward,
            &mut self.counters,
        )
        .step();
        self.phase = Phase::Idle;
        result
    }

    /// Return the agent to the start and zero both counters
    ///
    /// The Q-table and the grid layout are kept. Returns `false` when the
    /// session was busy.
    pub fn reset(&mut self) -> bool {
        if self.phase.is_busy() {
            return false;
        }
        self.world.reset_agent();
        self.counters = SessionCounters::default();
        info!("session reset");
        true
    }

    pub fn toggle_obstacle(&mut self, cell: Cell) -> EditOutcome {
        SessionEditor::new(&mut self.world, self.phase).toggle_obstacle(cell)
    }

    pub fn set_goal(&mut self, cell: Cell) -> EditOutcome {
        SessionEditor::new(&mut self.world, self.phase).set_goal(cell)
    }

    /// Dispatch a presenter command
    pub fn handle(&mut self, command: Command) -> Result<CommandOutcome> {
        if self.phase.is_busy() {
            return Ok(CommandOutcome::Busy);
        }

        let outcome = match command {
            Command::Train => match self.train()? {
                TrainOutcome::Completed(report) => CommandOutcome::Trained(report),
                TrainOutcome::Busy => CommandOutcome::Busy,
            },
            Command::StepAgent => CommandOutcome::Stepped(self.step()?),
            Command::ResetSession => {
                self.reset();
                CommandOutcome::Reset
            }
            Command::ToggleObstacleAt { at } => {
                CommandOutcome::Edited(self.toggle_obstacle(at.to_cell(self.cell_size)))
            }
            Command::SetGoalAt { at } => {
                CommandOutcome::Edited(self.set_goal(at.to_cell(self.cell_size)))
            }
        };
        Ok(outcome)
    }

    /// Greedy steps from the current agent cell until the goal, a dead end
    /// or `limit` steps
    ///
    /// Counters advance exactly as they would for `limit` individual steps.
    pub fn rollout(&mut self, limit: usize) -> Result<Rollout> {
        let mut path = vec![self.world.agent()];
        let mut reward = 0.0;
        let mut steps = 0;

        for _ in 0..limit {
            match self.step()? {
                StepOutcome::Moved {
                    to, reward: r, ..
                } => {
                    path.push(to);
                    reward += r;
                    steps += 1;
                }
                StepOutcome::GoalReached {
                    goal, reward: r, ..
                } => {
                    path.push(goal);
                    reward += r;
                    return Ok(Rollout {
                        path,
                        end: RolloutEnd::ReachedGoal { steps: steps + 1 },
                        reward,
                    });
                }
                StepOutcome::Stuck { .. } => {
                    return Ok(Rollout {
                        path,
                        end: RolloutEnd::Stuck,
                        reward,
                    });
                }
                StepOutcome::Busy => {
                    return Ok(Rollout {
                        path,
                        end: RolloutEnd::Busy,
                        reward,
                    });
                }
            }
        }

        Ok(Rollout {
            path,
            end: RolloutEnd::StepLimit,
            reward,
        })
    }

    /// Read-only view for rendering
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            grid_size: self.world.size(),
            cell_size: self.cell_size.get(),
            obstacles: self.world.obstacles().iter().copied().collect(),
            start: self.world.start(),
            goal: self.world.goal(),
            agent: self.world.agent(),
            step_count: self.counters.step_count,
            total_score: self.counters.total_score,
            phase: self.phase,
        }
    }

    #[cfg(test)]
    pub(crate) fn force_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }
}
