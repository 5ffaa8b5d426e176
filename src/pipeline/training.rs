//! Q-learning trainer
//!
//! Runs bounded episodes from the environment's start cell under an
//! ε-greedy behaviour policy, applying one Bellman update per transition.
//! Training is synchronous: [`Trainer::train`] returns once every configured
//! episode has run.

use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    Error, Result,
    grid::{Action, Cell, Move},
    ports::{Environment, TrainingObserver},
    q_learning::{EpsilonSchedule, QTable},
};

/// Training hyperparameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Learning rate α: size of each update step
    pub learning_rate: f64,

    /// Discount factor γ: closer to 1 propagates distant rewards further
    pub discount_factor: f64,

    /// Exploration rate ε: probability of a uniformly random valid move
    pub epsilon: f64,

    /// How ε changes across episodes
    pub epsilon_schedule: EpsilonSchedule,

    /// Number of episodes per training run
    pub episodes: usize,

    /// Transition budget per episode
    pub max_steps: usize,

    /// Random seed
    pub seed: Option<u64>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.5,
            discount_factor: 0.9,
            epsilon: 0.8,
            epsilon_schedule: EpsilonSchedule::Constant,
            episodes: 1500,
            max_steps: 100,
            seed: None,
        }
    }
}

impl TrainingConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.learning_rate > 0.0 && self.learning_rate <= 1.0) {
            return Err(Error::config(format!(
                "learning rate must be in (0, 1], got {}",
                self.learning_rate
            )));
        }
        if !(0.0..=1.0).contains(&self.discount_factor) {
            return Err(Error::config(format!(
                "discount factor must be in [0, 1], got {}",
                self.discount_factor
            )));
        }
        if !(0.0..=1.0).contains(&self.epsilon) {
            return Err(Error::config(format!(
                "epsilon must be in [0, 1], got {}",
                self.epsilon
            )));
        }
        self.epsilon_schedule.validate()
    }
}

/// One applied transition
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub from: Cell,
    pub action: Action,
    pub to: Cell,
    pub reward: f64,
    /// Whether the move was drawn at random rather than greedily
    pub explored: bool,
    pub value_before: f64,
    pub value_after: f64,
}

/// Why an episode stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    ReachedGoal,
    /// No valid move from the current cell
    Stuck,
    /// Step budget exhausted
    StepLimit,
}

/// Per-episode record handed to observers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpisodeSummary {
    pub episode: usize,
    pub steps: usize,
    pub total_reward: f64,
    pub termination: Termination,
    pub epsilon: f64,
}

impl EpisodeSummary {
    pub fn reached_goal(&self) -> bool {
        self.termination == Termination::ReachedGoal
    }
}

/// Result of a training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingReport {
    /// Episodes run
    pub episodes: usize,

    /// Episodes that reached the goal
    pub successes: usize,

    /// Episodes that ended with no valid move
    pub stuck: usize,

    pub success_rate: f64,

    /// Mean undiscounted return per episode
    pub mean_reward: f64,

    /// Mean transitions per episode
    pub mean_steps: f64,

    /// ε used in the last episode
    pub final_epsilon: f64,
}

impl TrainingReport {
    fn from_summaries(summaries: &[EpisodeSummary], initial_epsilon: f64) -> Self {
        let episodes = summaries.len();
        let successes = summaries.iter().filter(|s| s.reached_goal()).count();
        let stuck = summaries
            .iter()
            .filter(|s| s.termination == Termination::Stuck)
            .count();
        let mean = |total: f64| {
            if episodes > 0 {
                total / episodes as f64
            } else {
                0.0
            }
        };

        Self {
            episodes,
            successes,
            stuck,
            success_rate: mean(successes as f64),
            mean_reward: mean(summaries.iter().map(|s| s.total_reward).sum()),
            mean_steps: mean(summaries.iter().map(|s| s.steps as f64).sum()),
            final_epsilon: summaries.last().map_or(initial_epsilon, |s| s.epsilon),
        }
    }
}

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// ε-greedy Q-learning trainer
///
/// The random generator lives as long as the trainer, so consecutive runs
/// with a seeded trainer continue one reproducible stream rather than
/// replaying the same episodes.
pub struct Trainer {
    config: TrainingConfig,
    observers: Vec<Box<dyn TrainingObserver>>,
    rng: StdRng,
}

impl Trainer {
    /// Create a trainer
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] for out-of-range
    /// hyperparameters.
    pub fn new(config: TrainingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            rng: build_rng(config.seed),
            config,
            observers: Vec::new(),
        })
    }

    /// Add an observer to the trainer
    pub fn with_observer(mut self, observer: Box<dyn TrainingObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Attach an observer to every subsequent run
    pub fn add_observer(&mut self, observer: Box<dyn TrainingObserver>) {
        self.observers.push(observer);
    }

    /// Run every configured episode against `env`, updating `table` in place
    ///
    /// # Errors
    ///
    /// Returns [`Error::TableShape`] when the table does not match the
    /// environment's grid, or any error raised by an observer.
    pub fn train<E>(&mut self, env: &E, table: &mut QTable) -> Result<TrainingReport>
    where
        E: Environment + ?Sized,
    {
        if table.grid_size() != env.grid_size() {
            return Err(Error::TableShape {
                expected_states: env.grid_size() * env.grid_size(),
                expected_actions: Action::COUNT,
                got_states: table.num_states(),
                detail: "table was built for another grid".to_string(),
            });
        }

        let total = self.config.episodes;
        info!(
            episodes = total,
            max_steps = self.config.max_steps,
            alpha = self.config.learning_rate,
            gamma = self.config.discount_factor,
            epsilon = self.config.epsilon,
            "training started"
        );

        for observer in &mut self.observers {
            observer.on_training_start(total)?;
        }

        let mut summaries = Vec::with_capacity(total);
        for episode in 0..total {
            let summary = self.run_episode(episode, env, table)?;
            debug!(
                episode,
                steps = summary.steps,
                reward = summary.total_reward,
                termination = ?summary.termination,
                "episode finished"
            );
            for observer in &mut self.observers {
                observer.on_episode_end(episode, &summary)?;
            }
            summaries.push(summary);
        }

        for observer in &mut self.observers {
            observer.on_training_end()?;
        }

        let report = TrainingReport::from_summaries(&summaries, self.config.epsilon);
        info!(
            successes = report.successes,
            episodes = report.episodes,
            mean_reward = report.mean_reward,
            "training complete"
        );
        Ok(report)
    }

    fn run_episode<E>(&mut self, episode: usize, env: &E, table: &mut QTable) -> Result<EpisodeSummary>
    where
        E: Environment + ?Sized,
    {
        for observer in &mut self.observers {
            observer.on_episode_start(episode)?;
        }

        let epsilon = self
            .config
            .epsilon_schedule
            .epsilon_at(self.config.epsilon, episode);
        let alpha = self.config.learning_rate;
        let gamma = self.config.discount_factor;

        let mut current = env.start();
        let mut steps = 0;
        let mut total_reward = 0.0;
        let mut termination = Termination::StepLimit;

        while steps < self.config.max_steps {
            if env.is_goal(current) {
                termination = Termination::ReachedGoal;
                break;
            }

            let moves = env.valid_moves(current);
            let Some((chosen, explored)) = self.select_move(table, current, &moves, epsilon) else {
                termination = Termination::Stuck;
                break;
            };

            let reward = env.reward(current, chosen.target);
            let next_moves = env.valid_moves(chosen.target);
            let next_value =
                table.best_next_value(chosen.target, next_moves.iter().map(|m| m.action));
            let value_before = table.value(current, chosen.action);
            let value_after =
                table.bellman_update(current, chosen.action, reward, next_value, alpha, gamma);

            let transition = Transition {
                from: current,
                action: chosen.action,
                to: chosen.target,
                reward,
                explored,
                value_before,
                value_after,
            };
            for observer in &mut self.observers {
                observer.on_step(episode, steps, &transition)?;
            }

            total_reward += reward;
            steps += 1;
            current = chosen.target;
        }

        // The last permitted step may land on the goal
        if termination == Termination::StepLimit && env.is_goal(current) {
            termination = Termination::ReachedGoal;
        }

        Ok(EpisodeSummary {
            episode,
            steps,
            total_reward,
            termination,
            epsilon,
        })
    }

    /// ε-greedy selection; `None` when `moves` is empty
    fn select_move(
        &mut self,
        table: &QTable,
        cell: Cell,
        moves: &[Move],
        epsilon: f64,
    ) -> Option<(Move, bool)> {
        if moves.is_empty() {
            return None;
        }
        if self.rng.random::<f64>() < epsilon {
            // Explore: uniformly random valid move
            let idx = self.rng.random_range(0..moves.len());
            Some((moves[idx], true))
        } else {
            // Exploit: greedy with lowest-index tie-break
            table.best_move(cell, moves).map(|m| (m, false))
        }
    }
}
