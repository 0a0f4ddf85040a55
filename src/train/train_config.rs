use serde::{Serialize, Deserialize};

use crate::error::{NetError, Result};

/// Epochs trained before the first convergence check.
pub const DEFAULT_WARMUP_EPOCHS: usize = 100;
/// Epochs between convergence checks once warm-up is over.
pub const DEFAULT_CHECK_INTERVAL: usize = 10;
/// Hard ceiling; reaching it means the run did not converge.
pub const DEFAULT_MAX_EPOCHS: usize = 10_000;

/// Epoch policy for `train_until_converged`.
///
/// # Fields
/// - `warmup_epochs` : no convergence check happens before this epoch
/// - `check_interval`: epochs between checks after warm-up; must be at least 1
/// - `max_epochs`    : total epoch ceiling; must be at least 1
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    pub warmup_epochs: usize,
    pub check_interval: usize,
    pub max_epochs: usize,
}

impl Default for TrainConfig {
    fn default() -> Self {
        TrainConfig {
            warmup_epochs: DEFAULT_WARMUP_EPOCHS,
            check_interval: DEFAULT_CHECK_INTERVAL,
            max_epochs: DEFAULT_MAX_EPOCHS,
        }
    }
}

impl TrainConfig {
    pub fn new(warmup_epochs: usize, check_interval: usize, max_epochs: usize) -> Self {
        TrainConfig { warmup_epochs, check_interval, max_epochs }
    }

    pub fn validate(&self) -> Result<()> {
        if self.check_interval == 0 {
            return Err(NetError::config("check_interval must be at least 1"));
        }
        if self.max_epochs == 0 {
            return Err(NetError::config("max_epochs must be at least 1"));
        }
        Ok(())
    }

    /// True when a convergence check runs after `epoch` (1-based).
    pub fn is_check_epoch(&self, epoch: usize) -> bool {
        if epoch == self.max_epochs {
            return true;
        }
        epoch >= self.warmup_epochs
            && (epoch - self.warmup_epochs) % self.check_interval == 0
    }

    /// Serializes the config to a pretty-printed JSON file.
    pub fn save_json(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Reads a config from JSON; missing fields take their defaults.
    pub fn load_json(path: impl AsRef<std::path::Path>) -> Result<TrainConfig> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        let config: TrainConfig = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checks_start_after_warmup_and_repeat() {
        let config = TrainConfig::new(5, 3, 100);
        let checks: Vec<usize> = (1..=15).filter(|&e| config.is_check_epoch(e)).collect();
        assert_eq!(checks, vec![5, 8, 11, 14]);
    }

    #[test]
    fn ceiling_is_always_checked() {
        let config = TrainConfig::new(50, 10, 7);
        assert!(config.is_check_epoch(7));
        assert!(!config.is_check_epoch(6));
    }

    #[test]
    fn partial_json_takes_defaults() {
        let config: TrainConfig = serde_json::from_str(r#"{ "max_epochs": 500 }"#).unwrap();
        assert_eq!(config.warmup_epochs, DEFAULT_WARMUP_EPOCHS);
        assert_eq!(config.check_interval, DEFAULT_CHECK_INTERVAL);
        assert_eq!(config.max_epochs, 500);
    }

    #[test]
    fn zero_interval_is_rejected() {
        assert!(matches!(TrainConfig::new(0, 0, 10).validate(), Err(NetError::Configuration(_))));
    }
}
