use serde::{Serialize, Deserialize};

use crate::layers::dense::{Layer, LayerGradients};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sgd {
    pub learning_rate: f64,
}

impl Sgd {
    pub fn new(learning_rate: f64) -> Sgd {
        Sgd { learning_rate }
    }

    /// Applies one SGD weight update to a layer given its averaged gradients.
    pub fn step(&self, layer: &mut Layer, grads: &LayerGradients) {
        layer.apply_gradients(grads, self.learning_rate);
    }
}
