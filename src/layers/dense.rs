use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::{math::matrix::{Matrix, hadamard}, activation::activation::ActivationFunction};

/// A fully-connected layer: `output = f(input · weights + biases)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    /// Shape `(input_width, output_width)`.
    pub(crate) weights: Matrix,
    /// Present iff the owning network was built with biases.
    pub(crate) biases: Option<Vec<f64>>,
    pub(crate) activator: ActivationFunction,
}

/// Values retained by a forward step for the backward pass.
#[derive(Debug, Clone)]
pub(crate) struct LayerTrace {
    pub pre: Vec<f64>,
    pub post: Vec<f64>,
}

impl Layer {
    /// Draws weights, then biases, uniformly from `[-range, range]`.
    pub fn new<R: Rng>(
        input_width: usize,
        output_width: usize,
        activation: ActivationFunction,
        use_bias: bool,
        range: f64,
        rng: &mut R,
    ) -> Layer {
        let weights = Matrix::random_uniform(input_width, output_width, range, rng);
        let biases = use_bias.then(|| {
            (0..output_width).map(|_| rng.gen_range(-range..=range)).collect()
        });

        Layer {
            weights,
            biases,
            activator: activation,
        }
    }

    /// Assembles a layer from stored parameters, checking every shape.
    pub fn from_parts(
        weights: Matrix,
        biases: Option<Vec<f64>>,
        activation: ActivationFunction,
    ) -> Option<Layer> {
        let layer = Layer { weights, biases, activator: activation };
        layer.is_consistent().then(|| layer)
    }

    pub fn input_width(&self) -> usize {
        self.weights.rows
    }

    pub fn output_width(&self) -> usize {
        self.weights.cols
    }

    pub fn weights(&self) -> &Matrix {
        &self.weights
    }

    pub fn biases(&self) -> Option<&[f64]> {
        self.biases.as_deref()
    }

    pub fn activation(&self) -> ActivationFunction {
        self.activator
    }

    pub(crate) fn is_consistent(&self) -> bool {
        self.weights.is_consistent()
            && self.weights.rows > 0
            && self.weights.cols > 0
            && self.biases.as_ref().map_or(true, |b| b.len() == self.weights.cols)
    }

    /// Caller guarantees `input.len() == self.input_width()`.
    pub(crate) fn feed_from(&self, input: &[f64]) -> Vec<f64> {
        self.trace(input).post
    }

    pub(crate) fn trace(&self, input: &[f64]) -> LayerTrace {
        let mut pre = self.weights.vec_mul(input);
        if let Some(biases) = &self.biases {
            for (z, b) in pre.iter_mut().zip(biases) {
                *z += b;
            }
        }
        let post = pre.iter().map(|&z| self.activator.function(z)).collect();
        LayerTrace { pre, post }
    }

    /// δ = error ⊙ f'(z) for this layer's last trace.
    pub(crate) fn delta(&self, error: &[f64], trace: &LayerTrace) -> Vec<f64> {
        let act_derivative: Vec<f64> = trace.pre.iter()
            .zip(&trace.post)
            .map(|(&z, &a)| self.activator.derivative(z, a))
            .collect();
        hadamard(error, &act_derivative)
    }

    /// Gradient step towards the desired output: `W += lr · (input ⊗ δ)`, `b += lr · δ`.
    pub(crate) fn apply_delta(&mut self, input: &[f64], delta: &[f64], lr: f64) {
        self.weights.add_outer(input, delta, lr);
        if let Some(biases) = &mut self.biases {
            for (b, d) in biases.iter_mut().zip(delta) {
                *b += lr * d;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn fixed_layer(use_bias: bool) -> Layer {
        let weights = Matrix::from_vec(2, 2, vec![0.5, -1.0, 0.25, 2.0]).unwrap();
        let biases = use_bias.then(|| vec![0.25, -0.25]);
        Layer::from_parts(weights, biases, ActivationFunction::Identity).unwrap()
    }

    #[test]
    fn feed_from_adds_bias_only_when_present() {
        assert_eq!(fixed_layer(false).feed_from(&[2.0, 4.0]), vec![2.0, 6.0]);
        assert_eq!(fixed_layer(true).feed_from(&[2.0, 4.0]), vec![2.25, 5.75]);
    }

    #[test]
    fn new_respects_bias_flag() {
        let mut rng = StdRng::seed_from_u64(3);
        let with = Layer::new(3, 4, ActivationFunction::Tanh, true, 1.0, &mut rng);
        let without = Layer::new(3, 4, ActivationFunction::Tanh, false, 1.0, &mut rng);
        assert_eq!(with.biases().map(|b| b.len()), Some(4));
        assert!(without.biases().is_none());
        assert_eq!((with.input_width(), with.output_width()), (3, 4));
    }

    #[test]
    fn from_parts_rejects_bad_bias_length() {
        let weights = Matrix::zeros(2, 3);
        assert!(Layer::from_parts(weights, Some(vec![0.0; 2]), ActivationFunction::Tanh).is_none());
    }

    #[test]
    fn apply_delta_moves_weights_along_outer_product() {
        let mut layer = fixed_layer(true);
        layer.apply_delta(&[1.0, 2.0], &[1.0, -1.0], 0.5);
        assert_eq!(layer.weights().as_slice(), &[1.0, -1.5, 1.25, 1.0]);
        assert_eq!(layer.biases(), Some(&[0.75, -0.75][..]));
    }
}
