use serde::{Serialize, Deserialize};

use crate::data::dataset::{argmax, Dataset};
use crate::error::EngineError;
use crate::loss::loss_type::LossType;
use crate::network::network::Network;
use crate::optim::sgd::Sgd;
use crate::train::early_stopping::ScoreDirection;

/// Consumes one batch at a time and updates model state in place.
pub trait TrainingEngine {
    fn train_on_batch(&mut self, batch: &Dataset) -> Result<(), EngineError>;
}

/// Scores a whole dataset against the current model state.
pub trait ScoringEngine {
    fn score(&mut self, dataset: &Dataset) -> Result<f64, EngineError>;

    /// Natural direction of `score`; a training config may override it.
    fn direction(&self) -> ScoreDirection {
        ScoreDirection::HigherIsBetter
    }
}

/// What `NetworkModel::score` reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreMetric {
    /// Mean loss per example.
    #[default]
    Loss,
    /// Fraction of examples whose argmax matches the label's argmax.
    Accuracy,
}

impl ScoreMetric {
    pub fn direction(self) -> ScoreDirection {
        match self {
            ScoreMetric::Loss => ScoreDirection::LowerIsBetter,
            ScoreMetric::Accuracy => ScoreDirection::HigherIsBetter,
        }
    }
}

/// Dense network trained with mini-batch SGD.
#[derive(Debug, Clone)]
pub struct NetworkModel {
    pub network: Network,
    pub optimizer: Sgd,
    pub loss: LossType,
    pub metric: ScoreMetric,
}

impl NetworkModel {
    pub fn new(network: Network, optimizer: Sgd, loss: LossType, metric: ScoreMetric) -> Self {
        NetworkModel { network, optimizer, loss, metric }
    }

    fn check_shapes(&self, dataset: &Dataset) -> Result<(), EngineError> {
        let (inputs, outputs) = (self.network.input_size(), self.network.output_size());
        for e in dataset {
            if e.features.len() != inputs {
                return Err(EngineError::ShapeMismatch { what: "feature", expected: inputs, got: e.features.len() });
            }
            if e.label.len() != outputs {
                return Err(EngineError::ShapeMismatch { what: "label", expected: outputs, got: e.label.len() });
            }
        }
        Ok(())
    }

    /// Mean loss over a dataset without touching the weights.
    pub fn mean_loss(&mut self, dataset: &Dataset) -> f64 {
        let total: f64 = dataset.iter()
            .map(|e| {
                let output = self.network.forward(&e.features);
                self.loss.loss(&output, &e.label)
            })
            .sum();
        total / dataset.len() as f64
    }

    pub fn accuracy(&mut self, dataset: &Dataset) -> f64 {
        let correct = dataset.iter()
            .filter(|e| argmax(&self.network.forward(&e.features)) == e.class_index())
            .count();
        correct as f64 / dataset.len() as f64
    }

    pub fn predict(&mut self, features: &[f64]) -> Vec<f64> {
        self.network.forward(features)
    }
}

impl TrainingEngine for NetworkModel {
    /// Averages per-sample gradients over the batch and applies one SGD step.
    fn train_on_batch(&mut self, batch: &Dataset) -> Result<(), EngineError> {
        if batch.is_empty() {
            return Ok(());
        }
        self.check_shapes(batch)?;

        let mut acc = self.network.zero_gradients();
        let mut total_loss = 0.0;
        for e in batch {
            total_loss += self.network.accumulate_gradients(&e.features, &e.label, self.loss, &mut acc);
        }
        if !total_loss.is_finite() {
            return Err(EngineError::NonFinite("training loss"));
        }

        let inv_batch = 1.0 / batch.len() as f64;
        for (layer, grads) in self.network.layers.iter_mut().zip(acc.iter_mut()) {
            grads.scale(inv_batch);
            self.optimizer.step(layer, grads);
        }
        Ok(())
    }
}

impl ScoringEngine for NetworkModel {
    fn score(&mut self, dataset: &Dataset) -> Result<f64, EngineError> {
        if dataset.is_empty() {
            return Err(EngineError::EmptyScoringSet);
        }
        self.check_shapes(dataset)?;
        let score = match self.metric {
            ScoreMetric::Loss => self.mean_loss(dataset),
            ScoreMetric::Accuracy => self.accuracy(dataset),
        };
        if score.is_finite() {
            Ok(score)
        } else {
            Err(EngineError::NonFinite("score"))
        }
    }

    fn direction(&self) -> ScoreDirection {
        self.metric.direction()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::activation::ActivationFunction;
    use crate::data::dataset::Example;
    use crate::network::spec::LayerSpec;

    fn model(metric: ScoreMetric) -> NetworkModel {
        let network = Network::new(
            &[
                LayerSpec { size: 4, input_size: 2, activation: ActivationFunction::Tanh },
                LayerSpec { size: 2, input_size: 4, activation: ActivationFunction::Softmax },
            ],
            3,
        );
        NetworkModel::new(network, Sgd::new(1.0), LossType::CrossEntropy, metric)
    }

    #[test]
    fn batches_reduce_loss_on_separable_blobs() {
        let data = Dataset::blobs(40, 0.05, 2);
        let mut m = model(ScoreMetric::Loss);
        let before = m.score(&data).unwrap();
        for _ in 0..500 {
            m.train_on_batch(&data).unwrap();
        }
        let after = m.score(&data).unwrap();
        assert!(after < before, "{after} should be below {before}");

        m.metric = ScoreMetric::Accuracy;
        assert!(m.score(&data).unwrap() > 0.9);
    }

    #[test]
    fn shape_mismatch_is_an_engine_error() {
        let bad: Dataset = vec![Example::new(vec![1.0, 2.0, 3.0], vec![1.0, 0.0])].into_iter().collect();
        let err = model(ScoreMetric::Loss).train_on_batch(&bad).unwrap_err();
        assert_eq!(err, EngineError::ShapeMismatch { what: "feature", expected: 2, got: 3 });
    }

    #[test]
    fn scoring_nothing_fails() {
        assert_eq!(model(ScoreMetric::Accuracy).score(&Dataset::default()), Err(EngineError::EmptyScoringSet));
    }

    #[test]
    fn metric_sets_direction() {
        assert_eq!(model(ScoreMetric::Loss).direction(), ScoreDirection::LowerIsBetter);
        assert_eq!(model(ScoreMetric::Accuracy).direction(), ScoreDirection::HigherIsBetter);
    }
}
