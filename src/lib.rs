pub mod error;
pub mod math;
pub mod activation;
pub mod layers;
pub mod network;
pub mod loss;
pub mod optim;
pub mod data;
pub mod train;
pub mod config;

// Convenience re-exports
pub use math::matrix::Matrix;
pub use activation::activation::ActivationFunction;
pub use layers::dense::Layer;
pub use network::{Network, NetworkSpec, LayerSpec};
pub use loss::LossType;
pub use optim::sgd::Sgd;
pub use data::{Dataset, Example, LabelMode, MiniBatchIterator};
pub use train::{
    EarlyStoppingTrainer, EpochStats, NetworkModel, ScoreDirection, ScoreMetric, ScoringEngine,
    TrainConfig, TrainingEngine, TrainingOutcome, TrainingState,
};
pub use config::RunConfig;
pub use error::{ConfigError, DataError, EngineError, IterationError, RunError, TrainError};
