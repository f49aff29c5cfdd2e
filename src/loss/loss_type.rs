use serde::{Serialize, Deserialize};

use crate::loss::{cross_entropy::CrossEntropyLoss, mse::MseLoss};

/// Selects which loss the network engine trains against.
///
/// - `Mse`          — pair with Identity or Sigmoid output.
/// - `CrossEntropy` — pair with Softmax output and one-hot labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LossType {
    Mse,
    CrossEntropy,
}

impl LossType {
    pub fn loss(self, predicted: &[f64], expected: &[f64]) -> f64 {
        match self {
            LossType::Mse          => MseLoss::loss(predicted, expected),
            LossType::CrossEntropy => CrossEntropyLoss::loss(predicted, expected),
        }
    }

    pub fn derivative(self, predicted: &[f64], expected: &[f64]) -> Vec<f64> {
        match self {
            LossType::Mse          => MseLoss::derivative(predicted, expected),
            LossType::CrossEntropy => CrossEntropyLoss::derivative(predicted, expected),
        }
    }
}
