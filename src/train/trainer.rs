use crate::{error::Result, network::network::Network};

/// One `(input, desired output)` pair supplied by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingSample {
    pub input: Vec<f64>,
    pub desired: Vec<f64>,
}

impl TrainingSample {
    pub fn new(input: Vec<f64>, desired: Vec<f64>) -> TrainingSample {
        TrainingSample { input, desired }
    }
}

/// Presents every sample once, in order, as a single `back_propagate` step each.
pub fn train_epoch(network: &mut Network, samples: &[TrainingSample]) -> Result<()> {
    for sample in samples {
        network.back_propagate(&sample.input, &sample.desired)?;
    }
    Ok(())
}
