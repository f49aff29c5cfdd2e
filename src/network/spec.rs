use serde::{Serialize, Deserialize};

use crate::activation::activation::ActivationFunction;
use crate::network::network::Network;

/// One layer in a network specification.
///
/// - `size`       — number of neurons in this layer
/// - `input_size` — output size of the previous layer, or the raw input
///                  dimension for the first layer
/// - `activation` — applied after the linear transform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSpec {
    pub size: usize,
    pub input_size: usize,
    pub activation: ActivationFunction,
}

/// Serializable architecture, stored in run files separately from weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSpec {
    pub layers: Vec<LayerSpec>,
}

impl NetworkSpec {
    /// Returns the index of the first layer whose `input_size` disagrees with
    /// the previous layer's `size`, if any.
    pub fn first_mismatch(&self) -> Option<usize> {
        self.layers.windows(2)
            .position(|pair| pair[0].size != pair[1].input_size)
            .map(|i| i + 1)
    }

    pub fn build(&self, seed: u64) -> Network {
        Network::new(&self.layers, seed)
    }
}
