//! Trains a network on a CSV file under early stopping.
//!
//! Usage:
//!   patience-nn <run.json> <data.csv> [model-out.json]
//!
//! Logging is controlled with RUST_LOG (e.g. `RUST_LOG=info`).

use std::env;
use std::process::ExitCode;

use log::{error, info};

use patience_nn::data::csv::load_csv;
use patience_nn::{EarlyStoppingTrainer, RunConfig, RunError, TrainingOutcome};

fn run(config_path: &str, data_path: &str, model_out: Option<&str>) -> Result<TrainingOutcome, RunError> {
    let config = RunConfig::load_json(config_path)?;
    config.validate()?;

    let dataset = load_csv(data_path, config.labels)?;
    info!("loaded {} examples with {} features from {data_path}", dataset.len(), dataset.feature_width());

    let mut trainer = EarlyStoppingTrainer::new(config.training.clone(), dataset, config.build_model())?;
    let outcome = trainer.run()?;

    if let Some(path) = model_out {
        trainer.into_model().network.save_json(path)?;
        info!("saved network weights to {path}");
    }
    Ok(outcome)
}

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 3 || args.len() > 4 {
        let program = args.first().map_or("patience-nn", String::as_str);
        eprintln!("usage: {program} <run.json> <data.csv> [model-out.json]");
        return ExitCode::from(2);
    }

    match run(&args[1], &args[2], args.get(3).map(String::as_str)) {
        Ok(outcome) => {
            println!(
                "finished: {:?} after {} epochs, best score {}",
                outcome.state,
                outcome.epochs,
                outcome.best_score.map_or("n/a".to_string(), |s| format!("{s:.6}")),
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("run failed: {e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
