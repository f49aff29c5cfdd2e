use thiserror::Error;

use crate::activation::activation::ActivationFunction;
use crate::loss::loss_type::LossType;
use crate::train::controller::TrainingState;

/// Invalid training configuration. Always fatal; raised before any epoch runs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("max epochs with no improvement must be zero or above, got {0}")]
    NegativePatience(i64),
    #[error("validation set percentage must satisfy 0 <= p < 100, got {0}")]
    ValidationPercentage(f64),
    #[error("batch size must be at least 1")]
    ZeroBatchSize,
    #[error("max epochs must be at least 1")]
    ZeroEpochs,
    #[error("log_every must be at least 1")]
    ZeroLogInterval,
    #[error("dataset is empty")]
    EmptyDataset,
    #[error("validation split of {percentage}% leaves no training examples out of {total}")]
    EmptyTrainingSplit { percentage: f64, total: usize },
    #[error("network has no layers")]
    EmptyNetwork,
    #[error("layer {0} input size does not match the previous layer's size")]
    LayerMismatch(usize),
    #[error("learning rate must be positive and finite, got {0}")]
    LearningRate(f64),
    #[error("{loss:?} loss cannot train a {activation:?} output layer; use cross_entropy with Softmax and mse otherwise")]
    LossActivationMismatch { loss: LossType, activation: ActivationFunction },
    #[error(
        "validation data has {validation} distinct classes but training data has {train}; \
         increase the validation set percentage"
    )]
    MissingValidationClasses { train: usize, validation: usize },
}

/// Misuse of a `MiniBatchIterator`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IterationError {
    #[error("no full batch left: cursor {cursor} + batch size {batch_size} exceeds {len} examples")]
    Exhausted { cursor: usize, batch_size: usize, len: usize },
    #[error("requested {requested} examples but only {remaining} remain")]
    OutOfRange { requested: usize, remaining: usize },
    #[error("a batch must contain at least one example")]
    ZeroSized,
}

/// Failure reported by a training or scoring engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("{what} width mismatch: expected {expected}, got {got}")]
    ShapeMismatch { what: &'static str, expected: usize, got: usize },
    #[error("non-finite {0} encountered")]
    NonFinite(&'static str),
    #[error("cannot score an empty dataset")]
    EmptyScoringSet,
    #[error("{0}")]
    Other(String),
}

/// Problems building a `Dataset` from raw inputs.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("inputs ({inputs}) and labels ({labels}) must have equal length")]
    LengthMismatch { inputs: usize, labels: usize },
    #[error("row {row}: {what} width {got} does not match first row's {expected}")]
    RaggedRow { row: usize, what: &'static str, expected: usize, got: usize },
    #[error("row {row}: {message}")]
    Csv { row: usize, message: String },
    #[error("CSV contains no data rows")]
    NoRows,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Everything that can end a training run.
#[derive(Debug, Error)]
pub enum TrainError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("iteration error: {0}")]
    Iteration(#[from] IterationError),
    #[error("engine error: {0}")]
    Engine(#[from] EngineError),
    #[error("training already finished in state {0:?}")]
    Finished(TrainingState),
}

/// Errors from loading run files and datasets in the binary.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Data(#[from] DataError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Train(#[from] TrainError),
}
