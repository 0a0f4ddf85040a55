use serde::{Serialize, Deserialize};

/// Snapshot taken by `train_until_converged` at each convergence check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochStats {
    /// 1-based epoch number.
    pub epoch: usize,
    /// Mean MSE over every sample after this epoch.
    pub mean_loss: f64,
    /// Samples whose rounded outputs differ from their rounded targets.
    pub mismatched: usize,
}
