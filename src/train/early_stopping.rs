use serde::{Serialize, Deserialize};

use crate::error::ConfigError;

/// Which way a score improves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreDirection {
    /// Accuracy-like scores.
    #[default]
    HigherIsBetter,
    /// Loss-like scores.
    LowerIsBetter,
}

impl ScoreDirection {
    /// The starting "best" score; every finite score beats it.
    pub fn worst(self) -> f64 {
        match self {
            ScoreDirection::HigherIsBetter => f64::NEG_INFINITY,
            ScoreDirection::LowerIsBetter => f64::INFINITY,
        }
    }

    /// Strict comparison. NaN never improves.
    pub fn is_improvement(self, candidate: f64, best: f64) -> bool {
        match self {
            ScoreDirection::HigherIsBetter => candidate > best,
            ScoreDirection::LowerIsBetter => candidate < best,
        }
    }
}

/// Outcome of recording one epoch's score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Improved,
    /// No improvement, patience not yet used up.
    Stalled,
    /// More consecutive non-improving epochs than the patience allows.
    Stop,
}

/// Patience bookkeeping for early stopping.
///
/// A patience of 0 stops at the first epoch that fails to improve.
#[derive(Debug, Clone)]
pub struct EarlyStopping {
    max_epochs_no_improvement: usize,
    validation_set_percentage: f64,
    direction: ScoreDirection,
    best_score: f64,
    epochs_since_improvement: usize,
    recorded: usize,
}

impl EarlyStopping {
    pub fn new(
        max_epochs_no_improvement: i64,
        validation_set_percentage: f64,
        direction: ScoreDirection,
    ) -> Result<Self, ConfigError> {
        let max_epochs_no_improvement = usize::try_from(max_epochs_no_improvement)
            .map_err(|_| ConfigError::NegativePatience(max_epochs_no_improvement))?;
        validate_percentage(validation_set_percentage)?;

        Ok(Self {
            max_epochs_no_improvement,
            validation_set_percentage,
            direction,
            best_score: direction.worst(),
            epochs_since_improvement: 0,
            recorded: 0,
        })
    }

    pub fn record(&mut self, score: f64) -> Verdict {
        self.recorded += 1;
        if self.direction.is_improvement(score, self.best_score) {
            self.best_score = score;
            self.epochs_since_improvement = 0;
            Verdict::Improved
        } else {
            self.epochs_since_improvement += 1;
            if self.epochs_since_improvement > self.max_epochs_no_improvement {
                Verdict::Stop
            } else {
                Verdict::Stalled
            }
        }
    }

    /// Number of examples to hold out from `total`, rounded to nearest.
    pub fn holdout_size(&self, total: usize) -> usize {
        (total as f64 * self.validation_set_percentage / 100.0).round() as usize
    }

    /// Best score so far; `None` until the first score is recorded.
    pub fn best_score(&self) -> Option<f64> {
        (self.recorded > 0).then_some(self.best_score)
    }

    pub fn epochs_since_improvement(&self) -> usize {
        self.epochs_since_improvement
    }

    pub fn max_epochs_no_improvement(&self) -> usize {
        self.max_epochs_no_improvement
    }

    pub fn validation_set_percentage(&self) -> f64 {
        self.validation_set_percentage
    }

    pub fn direction(&self) -> ScoreDirection {
        self.direction
    }
}

/// Exclusive upper bound: 100 would leave nothing to train on.
pub(crate) fn validate_percentage(p: f64) -> Result<(), ConfigError> {
    if (0.0..100.0).contains(&p) {
        Ok(())
    } else {
        Err(ConfigError::ValidationPercentage(p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lower(patience: i64) -> EarlyStopping {
        EarlyStopping::new(patience, 0.0, ScoreDirection::LowerIsBetter).unwrap()
    }

    #[test]
    fn patience_bounds() {
        for p in [0, 1, 5, 1000] {
            assert!(EarlyStopping::new(p, 10.0, ScoreDirection::HigherIsBetter).is_ok());
        }
        for p in [-1, -5] {
            assert_eq!(
                EarlyStopping::new(p, 10.0, ScoreDirection::HigherIsBetter).unwrap_err(),
                ConfigError::NegativePatience(p)
            );
        }
    }

    #[test]
    fn percentage_bounds() {
        for p in [0.0, 0.5, 20.0, 99.999] {
            assert!(EarlyStopping::new(3, p, ScoreDirection::HigherIsBetter).is_ok(), "{p}");
        }
        for p in [-5.0, -0.001, 100.0, 105.0, f64::NAN] {
            assert!(EarlyStopping::new(3, p, ScoreDirection::HigherIsBetter).is_err(), "{p}");
        }
    }

    #[test]
    fn zero_patience_stops_at_first_stall() {
        let mut es = lower(0);
        assert_eq!(es.record(1.0), Verdict::Improved);
        assert_eq!(es.record(1.0), Verdict::Stop);
    }

    #[test]
    fn improvement_resets_counter() {
        let mut es = lower(2);
        assert_eq!(es.record(5.0), Verdict::Improved);
        assert_eq!(es.record(6.0), Verdict::Stalled);
        assert_eq!(es.record(5.5), Verdict::Stalled);
        assert_eq!(es.epochs_since_improvement(), 2);
        assert_eq!(es.record(4.0), Verdict::Improved);
        assert_eq!(es.epochs_since_improvement(), 0);
        assert_eq!(es.best_score(), Some(4.0));
        es.record(4.0);
        es.record(4.0);
        assert_eq!(es.record(4.0), Verdict::Stop);
    }

    #[test]
    fn direction_is_respected() {
        let mut es = EarlyStopping::new(1, 0.0, ScoreDirection::HigherIsBetter).unwrap();
        assert_eq!(es.best_score(), None);
        es.record(0.5);
        assert_eq!(es.record(0.4), Verdict::Stalled);
        assert_eq!(es.record(0.6), Verdict::Improved);
    }

    #[test]
    fn nan_never_improves() {
        let mut es = lower(0);
        assert_eq!(es.record(f64::NAN), Verdict::Stop);
        assert_eq!(es.best_score(), Some(f64::INFINITY));
    }

    #[test]
    fn holdout_rounds_to_nearest() {
        let es = EarlyStopping::new(0, 25.0, ScoreDirection::HigherIsBetter).unwrap();
        assert_eq!(es.holdout_size(10), 3);
        assert_eq!(es.holdout_size(1), 0);
        assert_eq!(es.holdout_size(100), 25);
    }
}
