use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::time::Instant;

use log::{debug, info, warn};
use rand::{rngs::StdRng, SeedableRng};
use serde::{Serialize, Deserialize};

use crate::data::dataset::Dataset;
use crate::data::iterator::MiniBatchIterator;
use crate::error::{ConfigError, TrainError};
use crate::train::early_stopping::{EarlyStopping, Verdict};
use crate::train::engine::{ScoringEngine, TrainingEngine};
use crate::train::epoch_stats::{EpochStats, ScoreSource};
use crate::train::train_config::TrainConfig;

/// Lifecycle of a training run.
///
/// `Configured → Running → {Converged, Exhausted, Cancelled, Failed}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrainingState {
    Configured,
    Running,
    /// Patience ran out before the epoch budget.
    Converged,
    /// The epoch budget was used up.
    Exhausted,
    /// Stopped at an epoch boundary by the stop flag or a dropped progress receiver.
    Cancelled,
    /// An epoch failed; the model state is not trustworthy.
    Failed,
}

impl TrainingState {
    pub fn is_terminal(self) -> bool {
        !matches!(self, TrainingState::Configured | TrainingState::Running)
    }
}

/// Summary returned by [`EarlyStoppingTrainer::run`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingOutcome {
    pub state: TrainingState,
    pub epochs: usize,
    pub best_score: Option<f64>,
    pub history: Vec<EpochStats>,
}

/// Drives epochs of mini-batch training until patience or the epoch budget
/// runs out.
///
/// The data is partitioned once, at construction: with a non-zero validation
/// percentage a shuffled, seeded holdout is scored every epoch; otherwise the
/// training partition is scored instead.
pub struct EarlyStoppingTrainer<M> {
    config: TrainConfig,
    model: M,
    early_stopping: EarlyStopping,
    train: MiniBatchIterator,
    validation: Option<Dataset>,
    state: TrainingState,
    epoch: usize,
    history: Vec<EpochStats>,
    progress_tx: Option<mpsc::Sender<EpochStats>>,
    stop_flag: Option<Arc<AtomicBool>>,
}

impl<M: TrainingEngine + ScoringEngine> EarlyStoppingTrainer<M> {
    /// Validates `config` and partitions `dataset`.
    ///
    /// A percentage inside `[0, 100)` can still fail with
    /// `EmptyTrainingSplit` when it rounds to the whole of a small dataset
    /// (95% of 10 examples, say).
    pub fn new(config: TrainConfig, dataset: Dataset, model: M) -> Result<Self, ConfigError> {
        config.validate()?;
        if dataset.is_empty() {
            return Err(ConfigError::EmptyDataset);
        }

        let direction = config.score_direction.unwrap_or_else(|| model.direction());
        let early_stopping = EarlyStopping::new(
            config.max_epochs_no_improvement,
            config.validation_set_percentage,
            direction,
        )?;

        let (train, validation) = partition(dataset, &config, &early_stopping)?;
        info!(
            "training on {} examples, validating on {} (patience {}, {:?})",
            train.len(),
            validation.as_ref().map_or(0, Dataset::len),
            early_stopping.max_epochs_no_improvement(),
            direction,
        );

        let train = if config.shuffle {
            MiniBatchIterator::shuffling(train, config.batch_size, config.seed)?
        } else {
            MiniBatchIterator::new(train, config.batch_size)?
        };

        Ok(Self {
            config,
            model,
            early_stopping,
            train,
            validation,
            state: TrainingState::Configured,
            epoch: 0,
            history: Vec::new(),
            progress_tx: None,
            stop_flag: None,
        })
    }

    /// Sends one `EpochStats` per completed epoch. A dropped receiver cancels the run.
    pub fn with_progress(mut self, tx: mpsc::Sender<EpochStats>) -> Self {
        self.progress_tx = Some(tx);
        self
    }

    /// Checked before every epoch; setting it cancels the run at the next boundary.
    pub fn with_stop_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.stop_flag = Some(flag);
        self
    }

    /// Runs epochs until a terminal state is reached.
    ///
    /// Returns immediately if the trainer has already finished. Engine and
    /// iteration errors leave the trainer `Failed` and are returned as-is.
    pub fn run(&mut self) -> Result<TrainingOutcome, TrainError> {
        while !self.state.is_terminal() {
            if self.stop_requested() {
                info!("stop requested; cancelling after epoch {}", self.epoch);
                self.state = TrainingState::Cancelled;
                break;
            }

            let stats = self.run_epoch()?;

            if let Some(ref tx) = self.progress_tx {
                if tx.send(stats).is_err() && !self.state.is_terminal() {
                    info!("progress receiver dropped; cancelling after epoch {}", self.epoch);
                    self.state = TrainingState::Cancelled;
                }
            }
        }
        Ok(self.outcome())
    }

    /// Runs exactly one epoch: a full pass over the training partition,
    /// then scoring and the patience check.
    pub fn run_epoch(&mut self) -> Result<EpochStats, TrainError> {
        if self.state.is_terminal() {
            return Err(TrainError::Finished(self.state));
        }
        self.state = TrainingState::Running;

        match self.try_epoch() {
            Ok(stats) => Ok(stats),
            Err(e) => {
                warn!("epoch {} failed: {e}", self.epoch + 1);
                self.state = TrainingState::Failed;
                Err(e)
            }
        }
    }

    fn try_epoch(&mut self) -> Result<EpochStats, TrainError> {
        let t_start = Instant::now();

        let mut batches = 0;
        while self.train.has_next() {
            let batch = self.train.next_batch()?;
            self.model.train_on_batch(&batch)?;
            batches += 1;
        }
        self.train.reset();

        let (score, source) = match self.validation {
            Some(ref val) => (self.model.score(val)?, ScoreSource::Validation),
            None => (self.model.score(self.train.dataset())?, ScoreSource::Training),
        };
        let verdict = self.early_stopping.record(score);
        self.epoch += 1;

        self.state = if verdict == Verdict::Stop {
            TrainingState::Converged
        } else if self.epoch >= self.config.max_epochs {
            TrainingState::Exhausted
        } else {
            TrainingState::Running
        };

        let stats = EpochStats {
            epoch: self.epoch,
            total_epochs: self.config.max_epochs,
            batches,
            score,
            source,
            best_score: self.early_stopping.best_score().unwrap_or(score),
            epochs_since_improvement: self.early_stopping.epochs_since_improvement(),
            elapsed_ms: t_start.elapsed().as_millis() as u64,
        };
        self.log_epoch(&stats);
        self.history.push(stats.clone());
        Ok(stats)
    }

    fn log_epoch(&self, stats: &EpochStats) {
        if stats.epoch % self.config.log_every == 0 || self.state.is_terminal() {
            info!(
                "Epoch [{}/{}] took {} ms: {:?} score {:.6} (best {:.6})",
                stats.epoch, stats.total_epochs, stats.elapsed_ms, stats.source, stats.score, stats.best_score,
            );
        } else {
            debug!(
                "Epoch [{}/{}] score {:.6}, {} epochs without improvement",
                stats.epoch, stats.total_epochs, stats.score, stats.epochs_since_improvement,
            );
        }

        match self.state {
            TrainingState::Converged => info!(
                "early stopping: no improvement for {} epochs, stopping after epoch {}",
                stats.epochs_since_improvement, stats.epoch,
            ),
            TrainingState::Exhausted => info!("epoch budget of {} reached", stats.total_epochs),
            _ => {}
        }
    }

    fn stop_requested(&self) -> bool {
        self.stop_flag.as_ref().is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    pub fn outcome(&self) -> TrainingOutcome {
        TrainingOutcome {
            state: self.state,
            epochs: self.epoch,
            best_score: self.early_stopping.best_score(),
            history: self.history.clone(),
        }
    }

    pub fn state(&self) -> TrainingState {
        self.state
    }

    pub fn current_epoch(&self) -> usize {
        self.epoch
    }

    pub fn best_score(&self) -> Option<f64> {
        self.early_stopping.best_score()
    }

    pub fn epochs_since_improvement(&self) -> usize {
        self.early_stopping.epochs_since_improvement()
    }

    pub fn history(&self) -> &[EpochStats] {
        &self.history
    }

    pub fn train_iterator(&self) -> &MiniBatchIterator {
        &self.train
    }

    pub fn validation_set(&self) -> Option<&Dataset> {
        self.validation.as_ref()
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn into_model(self) -> M {
        self.model
    }
}

/// Splits off the validation holdout, if any.
fn partition(
    mut dataset: Dataset,
    config: &TrainConfig,
    early_stopping: &EarlyStopping,
) -> Result<(Dataset, Option<Dataset>), ConfigError> {
    let percentage = early_stopping.validation_set_percentage();
    if percentage == 0.0 {
        return Ok((dataset, None));
    }

    let total = dataset.len();
    let holdout = early_stopping.holdout_size(total);
    if holdout == 0 {
        warn!("validation split of {percentage}% of {total} examples is empty; scoring on training data");
        return Ok((dataset, None));
    }
    if holdout >= total {
        return Err(ConfigError::EmptyTrainingSplit { percentage, total });
    }

    dataset.shuffle_with(&mut StdRng::seed_from_u64(config.seed));
    let (train, validation) = dataset.split_holdout(holdout);

    if train.is_classification() {
        let (t, v) = (train.distinct_classes(), validation.distinct_classes());
        if t != v {
            return Err(ConfigError::MissingValidationClasses { train: t, validation: v });
        }
    }
    Ok((train, Some(validation)))
}
