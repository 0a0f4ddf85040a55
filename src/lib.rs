pub mod error;
pub mod math;
pub mod activation;
pub mod layers;
pub mod network;
pub mod loss;
pub mod train;

// Convenience re-exports
pub use error::{NetError, Result};
pub use math::matrix::Matrix;
pub use activation::activation::ActivationFunction;
pub use layers::dense::Layer;
pub use network::network::{Network, LEARNING_RATE, INIT_RANGE};
pub use network::spec::NetworkSpec;
pub use loss::mse::MseLoss;
pub use train::{train_until_converged, TrainConfig, TrainOutcome, TrainingSample};
