use serde::{Serialize, Deserialize};

use crate::activation::activation::ActivationFunction;
use crate::data::csv::LabelMode;
use crate::error::{ConfigError, RunError};
use crate::loss::loss_type::LossType;
use crate::network::spec::NetworkSpec;
use crate::optim::sgd::Sgd;
use crate::train::engine::{NetworkModel, ScoreMetric};
use crate::train::train_config::TrainConfig;

fn default_learning_rate() -> f64 {
    0.1
}

/// Everything the binary needs for one run, stored as JSON.
///
/// ```json
/// {
///   "network": { "layers": [
///     { "size": 8, "input_size": 2, "activation": "ReLU" },
///     { "size": 2, "input_size": 8, "activation": "Softmax" }
///   ]},
///   "loss": "cross_entropy",
///   "metric": "accuracy",
///   "labels": { "mode": "class_index", "n_classes": 2 },
///   "training": { "max_epochs": 50, "validation_set_percentage": 20.0, "max_epochs_no_improvement": 5 }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    pub network: NetworkSpec,
    #[serde(default = "default_learning_rate")]
    pub learning_rate: f64,
    pub loss: LossType,
    #[serde(default)]
    pub metric: ScoreMetric,
    pub labels: LabelMode,
    #[serde(default)]
    pub training: TrainConfig,
}

impl RunConfig {
    pub fn load_json(path: &str) -> Result<RunConfig, RunError> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn save_json(&self, path: &str) -> Result<(), RunError> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        Ok(serde_json::to_writer_pretty(writer, self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.network.layers.is_empty() {
            return Err(ConfigError::EmptyNetwork);
        }
        if let Some(layer) = self.network.first_mismatch() {
            return Err(ConfigError::LayerMismatch(layer));
        }
        // The Softmax derivative is the identity, which is only correct under cross-entropy.
        if let Some(output) = self.network.layers.last() {
            let softmax = output.activation == ActivationFunction::Softmax;
            if softmax != (self.loss == LossType::CrossEntropy) {
                return Err(ConfigError::LossActivationMismatch { loss: self.loss, activation: output.activation });
            }
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(ConfigError::LearningRate(self.learning_rate));
        }
        self.training.validate()
    }

    /// Fresh network engine; weights are seeded from `training.seed`.
    pub fn build_model(&self) -> NetworkModel {
        NetworkModel::new(
            self.network.build(self.training.seed),
            Sgd::new(self.learning_rate),
            self.loss,
            self.metric,
        )
    }
}
