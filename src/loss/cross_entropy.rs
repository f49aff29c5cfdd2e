/// Categorical cross-entropy for a Softmax output layer.
pub struct CrossEntropyLoss;

/// Keeps log() away from -inf.
const EPS: f64 = 1e-12;

impl CrossEntropyLoss {
    /// L = -Σ expected[i] · ln(predicted[i] + ε)
    pub fn loss(predicted: &[f64], expected: &[f64]) -> f64 {
        predicted.iter().zip(expected)
            .map(|(p, y)| -y * (p + EPS).ln())
            .sum()
    }

    /// Combined Softmax + cross-entropy gradient w.r.t. the logits:
    /// predicted - expected. The Softmax derivative is identity to match.
    pub fn derivative(predicted: &[f64], expected: &[f64]) -> Vec<f64> {
        predicted.iter().zip(expected)
            .map(|(p, y)| p - y)
            .collect()
    }
}
