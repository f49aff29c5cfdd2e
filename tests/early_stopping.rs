use patience_nn::{
    ActivationFunction, ConfigError, Dataset, EarlyStoppingTrainer, EngineError, Example, LayerSpec,
    LossType, MiniBatchIterator, Network, NetworkModel, ScoreMetric, ScoringEngine, Sgd, TrainConfig,
    TrainingEngine, TrainingState,
};
use patience_nn::train::ScoreSource;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn regression(n: usize) -> Dataset {
    (0..n).map(|i| Example::new(vec![i as f64 / n as f64], vec![0.5 * i as f64 / n as f64])).collect()
}

fn small_net(seed: u64) -> NetworkModel {
    let network = Network::new(
        &[
            LayerSpec { size: 4, input_size: 1, activation: ActivationFunction::Tanh },
            LayerSpec { size: 1, input_size: 4, activation: ActivationFunction::Identity },
        ],
        seed,
    );
    NetworkModel::new(network, Sgd::new(0.05), LossType::Mse, ScoreMetric::Loss)
}

/// Engine whose score never changes, so every epoch after the first stalls.
struct Flat;

impl TrainingEngine for Flat {
    fn train_on_batch(&mut self, _batch: &Dataset) -> Result<(), EngineError> {
        Ok(())
    }
}

impl ScoringEngine for Flat {
    fn score(&mut self, _dataset: &Dataset) -> Result<f64, EngineError> {
        Ok(1.0)
    }
}

#[test]
fn patience_at_or_above_budget_never_converges() {
    init_logging();
    for (max_epochs, patience) in [(3, 5), (5, 5), (4, 10)] {
        let config = TrainConfig::new(max_epochs, 4).with_early_stopping(patience, 20.0);
        let mut trainer = EarlyStoppingTrainer::new(config, regression(20), Flat).unwrap();
        let outcome = trainer.run().unwrap();
        assert_eq!(outcome.state, TrainingState::Exhausted, "budget {max_epochs}, patience {patience}");
        assert_eq!(outcome.epochs, max_epochs);
    }
}

#[test]
fn flat_scores_converge_after_patience() {
    init_logging();
    let config = TrainConfig::new(20, 4).with_early_stopping(2, 0.0);
    let mut trainer = EarlyStoppingTrainer::new(config, regression(20), Flat).unwrap();
    let outcome = trainer.run().unwrap();
    assert_eq!(outcome.state, TrainingState::Converged);
    // One improving epoch, then patience + 1 stalls.
    assert_eq!(outcome.epochs, 4);
}

#[test]
fn out_of_range_options_fail_at_construction() {
    let bad = [
        (TrainConfig::new(5, 4).with_early_stopping(-5, 20.0), ConfigError::NegativePatience(-5)),
        (TrainConfig::new(5, 4).with_early_stopping(3, -5.0), ConfigError::ValidationPercentage(-5.0)),
        (TrainConfig::new(5, 4).with_early_stopping(3, 100.0), ConfigError::ValidationPercentage(100.0)),
        (TrainConfig::new(5, 4).with_early_stopping(3, 105.0), ConfigError::ValidationPercentage(105.0)),
    ];
    for (config, expected) in bad {
        assert_eq!(EarlyStoppingTrainer::new(config, regression(20), Flat).err(), Some(expected));
    }
}

#[test]
fn zero_split_scores_training_every_epoch() {
    init_logging();
    let config = TrainConfig::new(5, 4).with_early_stopping(3, 0.0);
    let mut trainer = EarlyStoppingTrainer::new(config, regression(20), small_net(1)).unwrap();
    assert!(trainer.validation_set().is_none());
    let outcome = trainer.run().unwrap();
    assert!(!outcome.history.is_empty());
    assert!(outcome.history.iter().all(|s| s.source == ScoreSource::Training));
}

#[test]
fn network_training_improves_validation_loss() {
    init_logging();
    let config = TrainConfig::new(30, 4).with_early_stopping(30, 25.0).with_seed(3);
    let mut trainer = EarlyStoppingTrainer::new(config, regression(40), small_net(3)).unwrap();
    let outcome = trainer.run().unwrap();

    assert_eq!(outcome.state, TrainingState::Exhausted);
    let first = outcome.history.first().unwrap().score;
    let best = outcome.best_score.unwrap();
    assert!(best < first, "best {best} should beat first {first}");
    assert!(outcome.history.iter().all(|s| s.source == ScoreSource::Validation));
}

#[test]
fn equal_seeds_reproduce_runs() {
    let run = || {
        let config = TrainConfig::new(6, 4).with_early_stopping(6, 20.0).with_seed(9);
        let mut trainer = EarlyStoppingTrainer::new(config, regression(30), small_net(9)).unwrap();
        trainer.run().unwrap().history.into_iter().map(|s| s.score).collect::<Vec<_>>()
    };
    assert_eq!(run(), run());
}

#[test]
fn iterator_serves_floor_batches_then_remainder() {
    for (n, b) in [(10, 3), (20, 64), (7, 7), (9, 2), (1, 1)] {
        let mut it = MiniBatchIterator::new(regression(n), b).unwrap();
        let b = it.batch_size();
        let mut served = 0;
        while it.has_next() {
            served += it.next_batch().unwrap().len();
        }
        assert_eq!(served, (n / b) * b);
        if n % b != 0 {
            assert_eq!(it.next_sized(n % b).unwrap().len(), n % b);
        }
        assert_eq!(it.remaining(), 0);
        it.reset();
        assert_eq!(it.cursor(), 0);
    }
}
