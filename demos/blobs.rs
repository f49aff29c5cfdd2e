//! Two-blob classification under early stopping.
//!
//! Architecture: 2 → 8 (ReLU) → 2 (Softmax)
//! Loss:         CrossEntropy, scored by validation loss (lower is better)
//! Split:        20% validation, patience 5, at most 200 epochs
//!
//! Run with:
//!   RUST_LOG=info cargo run --example blobs

use patience_nn::{
    ActivationFunction, Dataset, EarlyStoppingTrainer, LayerSpec, LossType, NetworkModel,
    NetworkSpec, ScoreMetric, Sgd, TrainConfig,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let spec = NetworkSpec {
        layers: vec![
            LayerSpec { size: 8, input_size: 2, activation: ActivationFunction::ReLU },
            LayerSpec { size: 2, input_size: 8, activation: ActivationFunction::Softmax },
        ],
    };
    let config = TrainConfig::new(200, 16)
        .with_early_stopping(5, 20.0)
        .with_seed(42);

    let model = NetworkModel::new(spec.build(config.seed), Sgd::new(0.2), LossType::CrossEntropy, ScoreMetric::Loss);
    let data = Dataset::blobs(400, 0.15, 7);

    let mut trainer = EarlyStoppingTrainer::new(config, data, model)?;
    let outcome = trainer.run()?;

    for stats in outcome.history.iter().step_by(5) {
        println!("epoch {:>3}: validation loss {:.5} (best {:.5})", stats.epoch, stats.score, stats.best_score);
    }
    println!("{:?} after {} epochs", outcome.state, outcome.epochs);

    if let Some(validation) = trainer.validation_set().cloned() {
        let mut model = trainer.into_model();
        println!("validation accuracy: {:.2}%", model.accuracy(&validation) * 100.0);
    }
    Ok(())
}
