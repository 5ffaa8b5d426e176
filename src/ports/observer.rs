//! Observer port - abstraction for training observation
//!
//! Observers let progress reporting, metrics and file export hook into a
//! training run without the trainer knowing about any of them.

use std::sync::{Arc, Mutex};

use crate::{
    Error, Result,
    pipeline::training::{EpisodeSummary, Transition},
};

/// Observer trait for monitoring training
///
/// # Event Sequence
///
/// 1. `on_training_start(total_episodes)` - once
/// 2. For each episode:
///    - `on_episode_start(episode)`
///    - `on_step(episode, step, transition)` - after each Bellman update
///    - `on_episode_end(episode, summary)`
/// 3. `on_training_end()` - once
///
/// Every method defaults to a no-op.
///
/// # Examples
///
/// ```
/// use gridnav::{ports::TrainingObserver, pipeline::EpisodeSummary};
///
/// struct GoalCounter {
///     reached: usize,
/// }
///
/// impl TrainingObserver for GoalCounter {
///     fn on_episode_end(&mut self, _episode: usize, summary: &EpisodeSummary) -> gridnav::Result<()> {
///         if summary.reached_goal() {
///             self.reached += 1;
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait TrainingObserver: Send {
    /// Called before the first episode.
    fn on_training_start(&mut self, _total_episodes: usize) -> Result<()> {
        Ok(())
    }

    /// Called when an episode starts (0-based index).
    fn on_episode_start(&mut self, _episode: usize) -> Result<()> {
        Ok(())
    }

    /// Called after each transition has been applied to the table.
    fn on_step(&mut self, _episode: usize, _step: usize, _transition: &Transition) -> Result<()> {
        Ok(())
    }

    /// Called when an episode terminates.
    fn on_episode_end(&mut self, _episode: usize, _summary: &EpisodeSummary) -> Result<()> {
        Ok(())
    }

    /// Called after the last episode.
    fn on_training_end(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Shared observers stay readable by the caller after training
impl<T: TrainingObserver> TrainingObserver for Arc<Mutex<T>> {
    fn on_training_start(&mut self, total_episodes: usize) -> Result<()> {
        self.lock()
            .map_err(|_| Error::ObserverPoisoned)?
            .on_training_start(total_episodes)
    }

    fn on_episode_start(&mut self, episode: usize) -> Result<()> {
        self.lock()
            .map_err(|_| Error::ObserverPoisoned)?
            .on_episode_start(episode)
    }

    fn on_step(&mut self, episode: usize, step: usize, transition: &Transition) -> Result<()> {
        self.lock()
            .map_err(|_| Error::ObserverPoisoned)?
            .on_step(episode, step, transition)
    }

    fn on_episode_end(&mut self, episode: usize, summary: &EpisodeSummary) -> Result<()> {
        self.lock()
            .map_err(|_| Error::ObserverPoisoned)?
            .on_episode_end(episode, summary)
    }

    fn on_training_end(&mut self) -> Result<()> {
        self.lock()
            .map_err(|_| Error::ObserverPoisoned)?
            .on_training_end()
    }
}
