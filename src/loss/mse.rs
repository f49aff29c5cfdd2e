/// Mean-squared error.
pub struct MseLoss;

impl MseLoss {
    /// mean((predicted - expected)²)
    pub fn loss(predicted: &[f64], expected: &[f64]) -> f64 {
        let n = predicted.len().max(1) as f64;
        predicted.iter().zip(expected)
            .map(|(p, y)| (p - y).powi(2))
            .sum::<f64>() / n
    }

    /// ∂L/∂p = 2·(predicted - expected) / n
    pub fn derivative(predicted: &[f64], expected: &[f64]) -> Vec<f64> {
        let scale = 2.0 / predicted.len().max(1) as f64;
        predicted.iter().zip(expected)
            .map(|(p, y)| scale * (p - y))
            .collect()
    }
}
