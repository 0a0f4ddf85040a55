use log::debug;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Serialize, Deserialize};

use crate::{
    activation::activation::ActivationFunction,
    error::{NetError, Result},
    layers::dense::{Layer, LayerTrace},
};

/// Step size of every `back_propagate` call. Sized for inputs and targets
/// in roughly `[-1, 1]`.
pub const LEARNING_RATE: f64 = 0.05;

/// Initial weights and biases are drawn uniformly from `[-INIT_RANGE, INIT_RANGE]`.
pub const INIT_RANGE: f64 = 1.0;

/// An ordered stack of fully-connected layers trained by online gradient descent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Network {
    pub(crate) layers: Vec<Layer>,
    pub(crate) use_bias: bool,
    /// Seed the weights were drawn from; 0 for networks read back from disk.
    #[serde(skip)]
    pub(crate) seed: u64,
}

/// Checks a `(widths, activations)` pair before anything is allocated.
pub(crate) fn validate_topology(layer_widths: &[usize], activations: &[ActivationFunction]) -> Result<()> {
    if layer_widths.len() < 2 {
        return Err(NetError::config(format!(
            "need at least 2 layer widths (input and output), got {}",
            layer_widths.len()
        )));
    }
    if let Some(pos) = layer_widths.iter().position(|&w| w == 0) {
        return Err(NetError::config(format!("layer {} has width 0", pos)));
    }
    if activations.len() != layer_widths.len() - 1 {
        return Err(NetError::config(format!(
            "{} layer widths need {} activations (one per transition), got {}",
            layer_widths.len(),
            layer_widths.len() - 1,
            activations.len()
        )));
    }
    if let Some(f) = activations.iter().find(|f| !f.is_valid()) {
        return Err(NetError::config(format!("activation {:?} has a non-finite parameter", f)));
    }
    Ok(())
}

impl Network {
    /// Builds a network with `layer_widths.len() - 1` weighted layers.
    ///
    /// `activations[i]` is applied to the outputs of the transition from
    /// width `layer_widths[i]` to `layer_widths[i + 1]`. A `seed` of 0 draws
    /// a fresh seed from OS entropy; `seed()` reports the one actually used.
    pub fn new(
        seed: u64,
        layer_widths: &[usize],
        activations: &[ActivationFunction],
        use_bias: bool,
    ) -> Result<Network> {
        validate_topology(layer_widths, activations)?;

        let seed = if seed == 0 {
            rand::thread_rng().gen_range(1..=u64::MAX)
        } else {
            seed
        };
        let mut rng = StdRng::seed_from_u64(seed);

        let layers = layer_widths
            .windows(2)
            .zip(activations)
            .map(|(pair, &activation)| {
                Layer::new(pair[0], pair[1], activation, use_bias, INIT_RANGE, &mut rng)
            })
            .collect();

        debug!("built network {:?} (bias: {}, seed: {})", layer_widths, use_bias, seed);

        Ok(Network { layers, use_bias, seed })
    }

    /// Rebuilds a network from already-trained layers, checking that they chain.
    pub fn from_layers(layers: Vec<Layer>, use_bias: bool) -> Result<Network> {
        let network = Network { layers, use_bias, seed: 0 };
        network.check_shape().map_err(NetError::Configuration)?;
        Ok(network)
    }

    /// Describes the first broken shape invariant, if any.
    pub(crate) fn check_shape(&self) -> std::result::Result<(), String> {
        if self.layers.is_empty() {
            return Err("network has no layers".to_string());
        }
        for (i, layer) in self.layers.iter().enumerate() {
            if !layer.is_consistent() {
                return Err(format!("layer {} has inconsistent weight or bias shapes", i));
            }
            if layer.biases.is_some() != self.use_bias {
                return Err(format!("layer {} disagrees with the network bias flag", i));
            }
            if !layer.activator.is_valid() {
                return Err(format!("layer {} has a non-finite activation parameter", i));
            }
        }
        for (i, pair) in self.layers.windows(2).enumerate() {
            if pair[0].output_width() != pair[1].input_width() {
                return Err(format!(
                    "layer {} outputs {} values but layer {} expects {}",
                    i,
                    pair[0].output_width(),
                    i + 1,
                    pair[1].input_width()
                ));
            }
        }
        Ok(())
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn use_bias(&self) -> bool {
        self.use_bias
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn input_width(&self) -> usize {
        self.layers[0].input_width()
    }

    pub fn output_width(&self) -> usize {
        self.layers[self.layers.len() - 1].output_width()
    }

    /// Input width followed by each layer's output width.
    pub fn layer_widths(&self) -> Vec<usize> {
        std::iter::once(self.input_width())
            .chain(self.layers.iter().map(Layer::output_width))
            .collect()
    }

    pub fn activations(&self) -> Vec<ActivationFunction> {
        self.layers.iter().map(Layer::activation).collect()
    }

    /// True when widths, activations and the bias flag all agree.
    pub fn same_topology(&self, other: &Network) -> bool {
        self.use_bias == other.use_bias
            && self.layer_widths() == other.layer_widths()
            && self.activations() == other.activations()
    }

    fn check_len(expected: usize, values: &[f64]) -> Result<()> {
        if values.len() != expected {
            return Err(NetError::DimensionMismatch { expected, actual: values.len() });
        }
        Ok(())
    }

    /// Inference. Pure: reads the weights and keeps nothing between calls.
    pub fn feed_forward(&self, input: &[f64]) -> Result<Vec<f64>> {
        Self::check_len(self.input_width(), input)?;
        let mut layers = self.layers.iter();
        let first = match layers.next() {
            Some(layer) => layer.feed_from(input),
            None => return Ok(input.to_vec()),
        };
        Ok(layers.fold(first, |current, layer| layer.feed_from(&current)))
    }

    /// One online gradient-descent step on a single `(input, desired)` pair.
    ///
    /// Both lengths are checked before any weight is touched.
    pub fn back_propagate(&mut self, input: &[f64], desired: &[f64]) -> Result<()> {
        Self::check_len(self.input_width(), input)?;
        Self::check_len(self.output_width(), desired)?;

        let mut traces: Vec<LayerTrace> = Vec::with_capacity(self.layers.len());
        for (i, layer) in self.layers.iter().enumerate() {
            let trace = match i {
                0 => layer.trace(input),
                _ => layer.trace(&traces[i - 1].post),
            };
            traces.push(trace);
        }

        // Error in activation space, desired - actual at the output layer.
        let mut error: Vec<f64> = match traces.last() {
            Some(out) => desired.iter().zip(&out.post).map(|(d, a)| d - a).collect(),
            None => return Ok(()),
        };

        for i in (0..self.layers.len()).rev() {
            let delta = self.layers[i].delta(&error, &traces[i]);

            // Propagate through the weights as they were during the forward pass.
            if i > 0 {
                error = self.layers[i].weights.vec_mul_transposed(&delta);
            }

            let layer_input: &[f64] = match i {
                0 => input,
                _ => &traces[i - 1].post,
            };
            self.layers[i].apply_delta(layer_input, &delta, LEARNING_RATE);
        }

        Ok(())
    }
}
