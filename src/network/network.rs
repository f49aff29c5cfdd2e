use rand::{rngs::StdRng, SeedableRng};
use serde::{Serialize, Deserialize};

use crate::{
    layers::dense::{Layer, LayerGradients},
    loss::loss_type::LossType,
    network::spec::LayerSpec,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Network {
    pub layers: Vec<Layer>,
}

impl Network {
    /// Builds a network from layer specs; weights are drawn from a generator
    /// seeded with `seed`, so equal seeds give equal networks.
    pub fn new(layer_specs: &[LayerSpec], seed: u64) -> Network {
        let mut rng = StdRng::seed_from_u64(seed);
        let layers = layer_specs.iter()
            .map(|spec| Layer::new(spec.size, spec.input_size, spec.activation, &mut rng))
            .collect();
        Network { layers }
    }

    pub fn input_size(&self) -> usize {
        self.layers.first().map_or(0, Layer::input_size)
    }

    pub fn output_size(&self) -> usize {
        self.layers.last().map_or(0, |l| l.size)
    }

    /// Forward pass; caches activations in each layer for backprop.
    pub fn forward(&mut self, input: &[f64]) -> Vec<f64> {
        let mut current = input.to_vec();
        for layer in &mut self.layers {
            current = layer.feed_from(&current);
        }
        current
    }

    /// Forward + backward for one sample. Adds this sample's gradients into
    /// `acc` (one entry per layer) and returns its loss.
    pub fn accumulate_gradients(
        &mut self,
        input: &[f64],
        expected: &[f64],
        loss: LossType,
        acc: &mut [LayerGradients],
    ) -> f64 {
        let output = self.forward(input);
        let sample_loss = loss.loss(&output, expected);

        let mut delta = loss.derivative(&output, expected);
        for (layer, slot) in self.layers.iter().zip(acc.iter_mut()).rev() {
            let (grads, upstream) = layer.backward(&delta);
            slot.accumulate(&grads);
            delta = upstream;
        }
        sample_loss
    }

    pub fn zero_gradients(&self) -> Vec<LayerGradients> {
        self.layers.iter().map(LayerGradients::zeros_like).collect()
    }

    /// Serializes the network weights to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> std::io::Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)
            .map_err(std::io::Error::other)
    }

    /// Deserializes a network from a JSON file previously written by `save_json`.
    pub fn load_json(path: &str) -> std::io::Result<Network> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        serde_json::from_reader(reader)
            .map_err(std::io::Error::other)
    }
}
