use serde::{Serialize, Deserialize};

/// Which partition an epoch's score was computed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreSource {
    Validation,
    /// No validation partition exists; the training partition stands in.
    Training,
}

/// Per-epoch statistics emitted by the early-stopping trainer.
///
/// One value is recorded in the trainer's history at the end of every
/// completed epoch and, when a progress channel is attached, sent on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochStats {
    /// 1-based epoch number.
    pub epoch: usize,
    /// Epoch budget for this run.
    pub total_epochs: usize,
    /// Number of optimizer steps (full batches) taken this epoch.
    pub batches: usize,
    pub score: f64,
    pub source: ScoreSource,
    /// Best score seen so far, including this epoch.
    pub best_score: f64,
    pub epochs_since_improvement: usize,
    /// Wall-clock duration of this single epoch in milliseconds.
    pub elapsed_ms: u64,
}
