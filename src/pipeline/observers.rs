//! Observer implementations for training runs
//!
//! Observers allow composable data collection during training without coupling
//! training logic to specific output formats.

use std::{fs::File, path::Path};

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};

use super::training::{EpisodeSummary, Termination, Transition};
use crate::{Error, Result, ports::TrainingObserver};

/// Progress bar observer - Shows training progress
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    successes: usize,
    episodes: usize,
}

impl ProgressObserver {
    /// Create a new progress observer
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            successes: 0,
            episodes: 0,
        }
    }

    fn message(&self) -> String {
        format!("goal {}/{}", self.successes, self.episodes)
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl TrainingObserver for ProgressObserver {
    fn on_training_start(&mut self, total_episodes: usize) -> Result<()> {
        let pb = ProgressBar::new(total_episodes as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} episodes ({msg})")
                .map_err(|e| Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_episode_end(&mut self, episode: usize, summary: &EpisodeSummary) -> Result<()> {
        self.episodes += 1;
        if summary.reached_goal() {
            self.successes += 1;
        }

        if let Some(pb) = &self.progress_bar {
            pb.set_position(episode as u64 + 1);
            pb.set_message(self.message());
        }
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(self.message());
        }
        Ok(())
    }
}

/// Average over a contiguous block of episodes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlockAverage {
    /// Episodes covered up to the end of this block (1000, 2000, ...)
    pub through_episode: usize,
    pub mean_reward: f64,
    pub mean_steps: f64,
    pub success_rate: f64,
}

/// Summary of training metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub episodes: usize,
    pub successes: usize,
    pub stuck: usize,
    pub success_rate: f64,
    pub mean_reward: f64,
    pub best_reward: Option<f64>,
    pub mean_steps: f64,
    /// Fewest steps among episodes that reached the goal
    pub shortest_success: Option<usize>,
    pub explored_steps: usize,
    pub total_steps: usize,
}

/// Metrics observer - Keeps every episode summary
#[derive(Debug, Default)]
pub struct MetricsObserver {
    episodes: Vec<EpisodeSummary>,
    explored_steps: usize,
    total_steps: usize,
}

impl MetricsObserver {
    /// Create a new metrics observer
    pub fn new() -> Self {
        Self::default()
    }

    /// Episode summaries recorded so far
    pub fn episodes(&self) -> &[EpisodeSummary] {
        &self.episodes
    }

    pub fn success_rate(&self) -> f64 {
        rate(
            self.episodes.iter().filter(|e| e.reached_goal()).count(),
            self.episodes.len(),
        )
    }

    /// Averages over consecutive blocks of `block_size` episodes
    ///
    /// A trailing partial block is averaged over its own length.
    pub fn block_averages(&self, block_size: usize) -> Vec<BlockAverage> {
        if block_size == 0 {
            return Vec::new();
        }

        let mut through = 0;
        self.episodes
            .chunks(block_size)
            .map(|block| {
                through += block.len();
                let n = block.len() as f64;
                BlockAverage {
                    through_episode: through,
                    mean_reward: block.iter().map(|e| e.total_reward).sum::<f64>() / n,
                    mean_steps: block.iter().map(|e| e.steps as f64).sum::<f64>() / n,
                    success_rate: rate(block.iter().filter(|e| e.reached_goal()).count(), block.len()),
                }
            })
            .collect()
    }

    /// Get metrics summary
    pub fn summary(&self) -> MetricsSummary {
        let episodes = self.episodes.len();
        let successes = self.episodes.iter().filter(|e| e.reached_goal()).count();
        let mean = |total: f64| {
            if episodes == 0 {
                0.0
            } else {
                total / episodes as f64
            }
        };

        MetricsSummary {
            episodes,
            successes,
            stuck: self
                .episodes
                .iter()
                .filter(|e| e.termination == Termination::Stuck)
                .count(),
            success_rate: rate(successes, episodes),
            mean_reward: mean(self.episodes.iter().map(|e| e.total_reward).sum()),
            best_reward: self
                .episodes
                .iter()
                .map(|e| e.total_reward)
                .fold(None, |best: Option<f64>, r| Some(best.map_or(r, |b| b.max(r)))),
            mean_steps: mean(self.episodes.iter().map(|e| e.steps as f64).sum()),
            shortest_success: self
                .episodes
                .iter()
                .filter(|e| e.reached_goal())
                .map(|e| e.steps)
                .min(),
            explored_steps: self.explored_steps,
            total_steps: self.total_steps,
        }
    }
}

fn rate(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    }
}

impl TrainingObserver for MetricsObserver {
    fn on_training_start(&mut self, total_episodes: usize) -> Result<()> {
        self.episodes.reserve(total_episodes);
        Ok(())
    }

    fn on_step(&mut self, _episode: usize, _step: usize, transition: &Transition) -> Result<()> {
        self.total_steps += 1;
        if transition.explored {
            self.explored_steps += 1;
        }
        Ok(())
    }

    fn on_episode_end(&mut self, _episode: usize, summary: &EpisodeSummary) -> Result<()> {
        self.episodes.push(*summary);
        Ok(())
    }
}

/// One CSV row per episode
#[derive(Debug, Serialize)]
struct EpisodeRow {
    episode: usize,
    steps: usize,
    total_reward: f64,
    termination: Termination,
    epsilon: f64,
}

/// CSV observer - Writes one row per episode
pub struct CsvObserver {
    writer: csv::Writer<File>,
}

impl CsvObserver {
    /// Create a CSV observer writing to `path`
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let writer = csv::Writer::from_path(path)?;
        Ok(Self { writer })
    }
}

impl TrainingObserver for CsvObserver {
    fn on_episode_end(&mut self, _episode: usize, summary: &EpisodeSummary) -> Result<()> {
        self.writer.serialize(EpisodeRow {
            episode: summary.episode,
            steps: summary.steps,
            total_reward: summary.total_reward,
            termination: summary.termination,
            epsilon: summary.epsilon,
        })?;
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(episode: usize, steps: usize, reward: f64, termination: Termination) -> EpisodeSummary {
        EpisodeSummary {
            episode,
            steps,
            total_reward: reward,
            termination,
            epsilon: 0.8,
        }
    }

    fn feed(observer: &mut MetricsObserver, summaries: &[EpisodeSummary]) {
        for s in summaries {
            observer.on_episode_end(s.episode, s).unwrap();
        }
    }

    #[test]
    fn test_metrics_summary() {
        let mut observer = MetricsObserver::new();
        feed(
            &mut observer,
            &[
                summary(0, 10, 90.0, Termination::ReachedGoal),
                summary(1, 100, -100.0, Termination::StepLimit),
                summary(2, 4, 96.0, Termination::ReachedGoal),
                summary(3, 0, 0.0, Termination::Stuck),
            ],
        );

        let s = observer.summary();
        assert_eq!(s.episodes, 4);
        assert_eq!(s.successes, 2);
        assert_eq!(s.stuck, 1);
        assert_eq!(s.success_rate, 0.5);
        assert_eq!(s.mean_reward, 21.5);
        assert_eq!(s.best_reward, Some(96.0));
        assert_eq!(s.shortest_success, Some(4));
    }

    #[test]
    fn test_block_averages() {
        let mut observer = MetricsObserver::new();
        feed(
            &mut observer,
            &[
                summary(0, 2, 10.0, Termination::ReachedGoal),
                summary(1, 4, 20.0, Termination::StepLimit),
                summary(2, 6, 30.0, Termination::ReachedGoal),
            ],
        );

        let blocks = observer.block_averages(2);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].through_episode, 2);
        assert_eq!(blocks[0].mean_reward, 15.0);
        assert_eq!(blocks[0].mean_steps, 3.0);
        assert_eq!(blocks[0].success_rate, 0.5);
        assert_eq!(blocks[1].through_episode, 3);
        assert_eq!(blocks[1].mean_reward, 30.0);
        assert!(observer.block_averages(0).is_empty());
    }

    #[test]
    fn test_empty_metrics() {
        let s = MetricsObserver::new().summary();
        assert_eq!(s.episodes, 0);
        assert_eq!(s.mean_reward, 0.0);
        assert_eq!(s.best_reward, None);
        assert_eq!(s.shortest_success, None);
    }

    #[test]
    fn test_csv_observer_writes_rows() {
        let temp_file = tempfile::NamedTempFile::new().unwrap();
        let mut observer = CsvObserver::new(temp_file.path()).unwrap();
        observer
            .on_episode_end(0, &summary(0, 3, 98.0, Termination::ReachedGoal))
            .unwrap();
        observer.on_training_end().unwrap();

        let contents = std::fs::read_to_string(temp_file.path()).unwrap();
        let mut lines = contents.lines();
        assert_eq!(
            lines.next(),
            Some("episode,steps,total_reward,termination,epsilon")
        );
        assert_eq!(lines.next(), Some("0,3,98.0,reached_goal,0.8"));
    }
}
