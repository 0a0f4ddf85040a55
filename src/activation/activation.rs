use serde::{Serialize, Deserialize};
use std::f64::consts::E;

/// Element-wise activation applied to a layer's weighted sums.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ActivationFunction {
    Identity,
    Sigmoid,
    Tanh,
    ReLU,
    LeakyReLU { alpha: f64 },
    Elu { alpha: f64 },
    Swish,
}

impl ActivationFunction {
    pub fn function(&self, x: f64) -> f64 {
        match self {
            ActivationFunction::Identity => x,
            ActivationFunction::Sigmoid => 1.0 / (1.0 + E.powf(-x)),
            ActivationFunction::Tanh => x.tanh(),
            ActivationFunction::ReLU => if x > 0.0 { x } else { 0.0 },
            ActivationFunction::LeakyReLU { alpha } => if x > 0.0 { x } else { alpha * x },
            ActivationFunction::Elu { alpha } => {
                if x > 0.0 { x } else { alpha * (E.powf(x) - 1.0) }
            }
            ActivationFunction::Swish => x / (1.0 + E.powf(-x)),
        }
    }

    /// Derivative at pre-activation `x`, where `fx == self.function(x)`.
    ///
    /// Sigmoid and Tanh are differentiated through their output
    /// (`fx(1 - fx)` and `1 - fx²`); the piecewise functions use `x`.
    pub fn derivative(&self, x: f64, fx: f64) -> f64 {
        match self {
            ActivationFunction::Identity => 1.0,
            ActivationFunction::Sigmoid => fx * (1.0 - fx),
            ActivationFunction::Tanh => 1.0 - fx * fx,
            ActivationFunction::ReLU => if x > 0.0 { 1.0 } else { 0.0 },
            ActivationFunction::LeakyReLU { alpha } => if x > 0.0 { 1.0 } else { *alpha },
            ActivationFunction::Elu { alpha } => if x > 0.0 { 1.0 } else { fx + alpha },
            ActivationFunction::Swish => {
                let sig = 1.0 / (1.0 + E.powf(-x));
                fx + sig * (1.0 - fx)
            }
        }
    }

    /// Closed interval containing every value `function` can return.
    pub fn range(&self) -> (f64, f64) {
        match self {
            ActivationFunction::Identity => (f64::NEG_INFINITY, f64::INFINITY),
            ActivationFunction::Sigmoid => (0.0, 1.0),
            ActivationFunction::Tanh => (-1.0, 1.0),
            ActivationFunction::ReLU => (0.0, f64::INFINITY),
            ActivationFunction::LeakyReLU { .. } => (f64::NEG_INFINITY, f64::INFINITY),
            ActivationFunction::Elu { alpha } => (-alpha.abs(), f64::INFINITY),
            // min of x·σ(x) is about -0.2785
            ActivationFunction::Swish => (-0.279, f64::INFINITY),
        }
    }

    /// Tag and parameter written to weight files.
    pub fn to_tag(&self) -> (u8, f64) {
        match self {
            ActivationFunction::Identity => (0, 0.0),
            ActivationFunction::Sigmoid => (1, 0.0),
            ActivationFunction::Tanh => (2, 0.0),
            ActivationFunction::ReLU => (3, 0.0),
            ActivationFunction::LeakyReLU { alpha } => (4, *alpha),
            ActivationFunction::Elu { alpha } => (5, *alpha),
            ActivationFunction::Swish => (6, 0.0),
        }
    }

    /// Inverse of `to_tag`; `None` for unknown tags.
    pub fn from_tag(tag: u8, param: f64) -> Option<ActivationFunction> {
        let f = match tag {
            0 => ActivationFunction::Identity,
            1 => ActivationFunction::Sigmoid,
            2 => ActivationFunction::Tanh,
            3 => ActivationFunction::ReLU,
            4 => ActivationFunction::LeakyReLU { alpha: param },
            5 => ActivationFunction::Elu { alpha: param },
            6 => ActivationFunction::Swish,
            _ => return None,
        };
        Some(f)
    }

    /// False when a parametrised variant carries a NaN or infinite parameter.
    pub fn is_valid(&self) -> bool {
        match self {
            ActivationFunction::LeakyReLU { alpha } | ActivationFunction::Elu { alpha } => alpha.is_finite(),
            _ => true,
        }
    }
}
