//! Training pipeline: the Q-learning trainer and its observers

pub mod observers;
pub mod training;

pub use observers::{BlockAverage, CsvObserver, MetricsObserver, MetricsSummary, ProgressObserver};
pub use training::{
    EpisodeSummary, Termination, Trainer, TrainingConfig, TrainingReport, Transition,
};

pub use crate::ports::TrainingObserver;
