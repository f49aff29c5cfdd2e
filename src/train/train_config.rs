use serde::{Serialize, Deserialize};

use crate::error::ConfigError;
use crate::train::early_stopping::{validate_percentage, ScoreDirection};

/// Recognized training options.
///
/// # Fields
/// - `max_epochs`                — epoch budget; the run ends `Exhausted` when reached
/// - `batch_size`                — examples per mini-batch, clamped to the training set size
/// - `seed`                      — drives the validation split and per-epoch reshuffles
/// - `validation_set_percentage` — share of the data held out for scoring, in [0, 100)
/// - `max_epochs_no_improvement` — patience; must be >= 0
/// - `shuffle`                   — reshuffle the training set between epochs
/// - `score_direction`           — overrides the scoring engine's own direction
/// - `log_every`                 — epoch summaries are logged at info level every N epochs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    pub max_epochs: usize,
    pub batch_size: usize,
    pub seed: u64,
    pub validation_set_percentage: f64,
    pub max_epochs_no_improvement: i64,
    pub shuffle: bool,
    pub score_direction: Option<ScoreDirection>,
    pub log_every: usize,
}

impl Default for TrainConfig {
    fn default() -> Self {
        TrainConfig {
            max_epochs: 10,
            batch_size: 32,
            seed: 1,
            validation_set_percentage: 0.0,
            max_epochs_no_improvement: 0,
            shuffle: true,
            score_direction: None,
            log_every: 5,
        }
    }
}

impl TrainConfig {
    /// A config with the given budget and batch size and defaults elsewhere.
    pub fn new(max_epochs: usize, batch_size: usize) -> Self {
        TrainConfig { max_epochs, batch_size, ..Default::default() }
    }

    pub fn with_early_stopping(mut self, max_epochs_no_improvement: i64, validation_set_percentage: f64) -> Self {
        self.max_epochs_no_improvement = max_epochs_no_improvement;
        self.validation_set_percentage = validation_set_percentage;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_epochs == 0 {
            return Err(ConfigError::ZeroEpochs);
        }
        if self.batch_size == 0 {
            return Err(ConfigError::ZeroBatchSize);
        }
        if self.log_every == 0 {
            return Err(ConfigError::ZeroLogInterval);
        }
        if self.max_epochs_no_improvement < 0 {
            return Err(ConfigError::NegativePatience(self.max_epochs_no_improvement));
        }
        validate_percentage(self.validation_set_percentage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(TrainConfig::default().validate(), Ok(()));
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let cfg: TrainConfig = serde_json::from_str(
            r#"{"max_epochs": 3, "validation_set_percentage": 20.0, "score_direction": "lower_is_better"}"#,
        ).unwrap();
        assert_eq!(cfg.max_epochs, 3);
        assert_eq!(cfg.batch_size, 32);
        assert_eq!(cfg.score_direction, Some(ScoreDirection::LowerIsBetter));
    }

    #[test]
    fn validate_reports_first_problem() {
        assert_eq!(TrainConfig::new(0, 4).validate(), Err(ConfigError::ZeroEpochs));
        assert_eq!(TrainConfig::new(3, 0).validate(), Err(ConfigError::ZeroBatchSize));
        assert_eq!(
            TrainConfig::new(3, 4).with_early_stopping(-2, 10.0).validate(),
            Err(ConfigError::NegativePatience(-2))
        );
        assert_eq!(
            TrainConfig::new(3, 4).with_early_stopping(2, 100.0).validate(),
            Err(ConfigError::ValidationPercentage(100.0))
        );
    }
}
