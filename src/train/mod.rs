pub mod early_stopping;
pub mod engine;
pub mod epoch_stats;
pub mod train_config;
pub mod controller;

pub use early_stopping::{EarlyStopping, ScoreDirection, Verdict};
pub use engine::{NetworkModel, ScoreMetric, ScoringEngine, TrainingEngine};
pub use epoch_stats::{EpochStats, ScoreSource};
pub use train_config::TrainConfig;
pub use controller::{EarlyStoppingTrainer, TrainingOutcome, TrainingState};
