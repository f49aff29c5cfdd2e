use serde::{Serialize, Deserialize};
use std::f64::consts::E;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ActivationFunction {
    Sigmoid,
    ReLU,
    Identity,
    Tanh,
    LeakyReLU { alpha: f64 },
    /// Vector-valued; only meaningful on an output layer paired with
    /// cross-entropy, whose combined gradient is `predicted - expected`.
    Softmax,
}

impl ActivationFunction {
    /// Applies the activation to a whole pre-activation vector.
    pub fn apply(&self, z: &[f64]) -> Vec<f64> {
        match self {
            ActivationFunction::Softmax => softmax(z),
            _ => z.iter().map(|&x| self.scalar(x)).collect(),
        }
    }

    fn scalar(&self, x: f64) -> f64 {
        match *self {
            ActivationFunction::Sigmoid => 1.0 / (1.0 + E.powf(-x)),
            ActivationFunction::ReLU => if x > 0.0 { x } else { 0.0 },
            ActivationFunction::Identity => x,
            ActivationFunction::Tanh => x.tanh(),
            ActivationFunction::LeakyReLU { alpha } => if x > 0.0 { x } else { alpha * x },
            ActivationFunction::Softmax => unreachable!("softmax is applied per vector"),
        }
    }

    /// Element-wise derivative with respect to the pre-activation `z`.
    ///
    /// Softmax returns 1.0 so the cross-entropy delta passes through unchanged.
    pub fn derivative(&self, z: &[f64]) -> Vec<f64> {
        z.iter()
            .map(|&x| match *self {
                ActivationFunction::Sigmoid => {
                    let fx = self.scalar(x);
                    fx * (1.0 - fx)
                }
                ActivationFunction::ReLU => if x > 0.0 { 1.0 } else { 0.0 },
                ActivationFunction::Identity | ActivationFunction::Softmax => 1.0,
                ActivationFunction::Tanh => {
                    let t = x.tanh();
                    1.0 - t * t
                }
                ActivationFunction::LeakyReLU { alpha } => if x > 0.0 { 1.0 } else { alpha },
            })
            .collect()
    }

    /// Whether He initialization suits this activation better than Xavier.
    pub fn prefers_he_init(&self) -> bool {
        matches!(self, ActivationFunction::ReLU | ActivationFunction::LeakyReLU { .. })
    }
}

fn softmax(z: &[f64]) -> Vec<f64> {
    let max = z.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = z.iter().map(|x| (x - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn softmax_sums_to_one() {
        let out = ActivationFunction::Softmax.apply(&[1.0, 2.0, 3.0]);
        assert_relative_eq!(out.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
        assert!(out[2] > out[1] && out[1] > out[0]);
    }

    #[test]
    fn sigmoid_derivative_peaks_at_zero() {
        let d = ActivationFunction::Sigmoid.derivative(&[0.0, 4.0]);
        assert_relative_eq!(d[0], 0.25);
        assert!(d[1] < d[0]);
    }

    #[test]
    fn leaky_relu_keeps_negative_slope() {
        let act = ActivationFunction::LeakyReLU { alpha: 0.1 };
        assert_eq!(act.apply(&[-2.0, 3.0]), vec![-0.2, 3.0]);
        assert_eq!(act.derivative(&[-2.0, 3.0]), vec![0.1, 1.0]);
    }
}
