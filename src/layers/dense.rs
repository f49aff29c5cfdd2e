use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::{math::matrix::Matrix, activation::activation::ActivationFunction};

/// Gradients of one layer for one or more samples.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerGradients {
    pub weights: Matrix,
    pub biases: Vec<f64>,
}

impl LayerGradients {
    pub fn zeros_like(layer: &Layer) -> LayerGradients {
        LayerGradients {
            weights: Matrix::zeros(layer.weights.rows, layer.weights.cols),
            biases: vec![0.0; layer.biases.len()],
        }
    }

    pub fn accumulate(&mut self, other: &LayerGradients) {
        self.weights += &other.weights;
        for (a, b) in self.biases.iter_mut().zip(&other.biases) {
            *a += b;
        }
    }

    pub fn scale(&mut self, factor: f64) {
        self.weights = self.weights.scale(factor);
        for b in &mut self.biases {
            *b *= factor;
        }
    }
}

/// Fully connected layer. Weights are (input_size × size).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layer {
    pub size: usize,
    pub weights: Matrix,
    pub biases: Vec<f64>,
    pub activator: ActivationFunction,
    // Forward-pass cache for backprop; not persisted.
    #[serde(skip)]
    last_input: Vec<f64>,
    #[serde(skip)]
    pre_activation: Vec<f64>,
}

impl Layer {
    pub fn new<R: Rng + ?Sized>(
        size: usize,
        input_size: usize,
        activation: ActivationFunction,
        rng: &mut R,
    ) -> Layer {
        let weights = if activation.prefers_he_init() {
            Matrix::he(input_size, size, rng)
        } else {
            Matrix::xavier(input_size, size, rng)
        };

        Layer {
            size,
            weights,
            biases: vec![0.0; size],
            activator: activation,
            last_input: Vec::new(),
            pre_activation: Vec::new(),
        }
    }

    pub fn input_size(&self) -> usize {
        self.weights.rows
    }

    pub fn feed_from(&mut self, input: &[f64]) -> Vec<f64> {
        let mut z = self.weights.vec_mul(input);
        for (zi, b) in z.iter_mut().zip(&self.biases) {
            *zi += b;
        }
        let a = self.activator.apply(&z);
        self.last_input = input.to_vec();
        self.pre_activation = z;
        a
    }

    /// Backward step for the most recent `feed_from`.
    ///
    /// `delta` is ∂L/∂a for this layer's output. Returns this layer's gradients
    /// and ∂L/∂a for the previous layer.
    pub fn backward(&self, delta: &[f64]) -> (LayerGradients, Vec<f64>) {
        let act_derivative = self.activator.derivative(&self.pre_activation);
        // δ = error ⊙ σ'(z)
        let layer_delta: Vec<f64> = delta.iter().zip(&act_derivative).map(|(d, s)| d * s).collect();

        let grads = LayerGradients {
            weights: Matrix::outer(&self.last_input, &layer_delta),
            biases: layer_delta.clone(),
        };
        let upstream = self.weights.mul_vec(&layer_delta);
        (grads, upstream)
    }

    /// Applies pre-computed gradients scaled by lr.
    pub fn apply_gradients(&mut self, grads: &LayerGradients, lr: f64) {
        for (w, g) in self.weights.data.iter_mut().zip(&grads.weights.data) {
            *w -= lr * g;
        }
        for (b, g) in self.biases.iter_mut().zip(&grads.biases) {
            *b -= lr * g;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn identity_layer() -> Layer {
        let mut layer = Layer::new(2, 2, ActivationFunction::Identity, &mut StdRng::seed_from_u64(1));
        layer.weights = Matrix { rows: 2, cols: 2, data: vec![1.0, 2.0, 3.0, 4.0] };
        layer.biases = vec![0.5, -0.5];
        layer
    }

    #[test]
    fn feed_from_computes_affine_map() {
        let mut layer = identity_layer();
        assert_eq!(layer.feed_from(&[1.0, 1.0]), vec![4.5, 5.5]);
    }

    #[test]
    fn backward_uses_cached_input() {
        let mut layer = identity_layer();
        layer.feed_from(&[1.0, 2.0]);
        let (grads, upstream) = layer.backward(&[1.0, 0.0]);
        assert_eq!(grads.weights.data, vec![1.0, 0.0, 2.0, 0.0]);
        assert_eq!(grads.biases, vec![1.0, 0.0]);
        assert_eq!(upstream, vec![1.0, 3.0]);
    }

    #[test]
    fn apply_gradients_steps_against_gradient() {
        let mut layer = identity_layer();
        let grads = LayerGradients {
            weights: Matrix { rows: 2, cols: 2, data: vec![1.0; 4] },
            biases: vec![1.0, 1.0],
        };
        layer.apply_gradients(&grads, 0.5);
        assert_eq!(layer.weights.data, vec![0.5, 1.5, 2.5, 3.5]);
        assert_eq!(layer.biases, vec![0.0, -1.0]);
    }
}
