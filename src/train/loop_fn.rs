use log::{debug, info, warn};

use crate::error::{NetError, Result};
use crate::loss::mse::MseLoss;
use crate::network::network::Network;
use crate::train::epoch_stats::EpochStats;
use crate::train::train_config::TrainConfig;
use crate::train::trainer::{train_epoch, TrainingSample};

/// Result of a `train_until_converged` run. Not converging is an expected
/// outcome; the usual remedy is a fresh network with another seed.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainOutcome {
    pub converged: bool,
    /// Epochs actually trained.
    pub epochs: usize,
    /// Stats from the last convergence check.
    pub last_check: EpochStats,
}

/// Maps a value to the nearest of {0, 1}.
fn to_bit(x: f64) -> u8 {
    if x >= 0.5 { 1 } else { 0 }
}

/// True when every output rounds to the same bit as its target.
pub fn rounds_to_match(output: &[f64], desired: &[f64]) -> bool {
    output.len() == desired.len()
        && output.iter().zip(desired).all(|(&o, &d)| to_bit(o) == to_bit(d))
}

/// Mean loss and rounding mismatches of `network` over every sample.
fn evaluate(network: &Network, samples: &[TrainingSample], epoch: usize) -> Result<EpochStats> {
    let mut total_loss = 0.0;
    let mut mismatched = 0;
    for sample in samples {
        let output = network.feed_forward(&sample.input)?;
        total_loss += MseLoss::loss(&output, &sample.desired);
        if !rounds_to_match(&output, &sample.desired) {
            mismatched += 1;
        }
    }
    Ok(EpochStats {
        epoch,
        mean_loss: total_loss / samples.len().max(1) as f64,
        mismatched,
    })
}

/// Number of samples whose rounded outputs differ from their targets.
pub fn count_mismatches(network: &Network, samples: &[TrainingSample]) -> Result<usize> {
    Ok(evaluate(network, samples, 0)?.mismatched)
}

/// Trains `network` one epoch at a time until every sample round-matches
/// its target or `config.max_epochs` is reached.
///
/// # Errors
/// `Configuration` for an empty sample set or an invalid `config`;
/// `DimensionMismatch` if any sample does not fit the network.
pub fn train_until_converged(
    network: &mut Network,
    samples: &[TrainingSample],
    config: &TrainConfig,
) -> Result<TrainOutcome> {
    config.validate()?;
    if samples.is_empty() {
        return Err(NetError::config("training needs at least one sample"));
    }

    let mut last_check = EpochStats { epoch: 0, mean_loss: f64::NAN, mismatched: samples.len() };

    for epoch in 1..=config.max_epochs {
        train_epoch(network, samples)?;

        if !config.is_check_epoch(epoch) {
            continue;
        }

        last_check = evaluate(network, samples, epoch)?;
        debug!(
            "epoch {}: loss {:.6}, {} of {} samples mismatched",
            epoch, last_check.mean_loss, last_check.mismatched, samples.len()
        );

        if last_check.mismatched == 0 {
            info!("converged after {} epochs (seed {})", epoch, network.seed());
            return Ok(TrainOutcome { converged: true, epochs: epoch, last_check });
        }
    }

    warn!(
        "no convergence within {} epochs (seed {}, {} samples still mismatched)",
        config.max_epochs, network.seed(), last_check.mismatched
    );
    Ok(TrainOutcome { converged: false, epochs: config.max_epochs, last_check })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::activation::ActivationFunction;

    fn xor_samples() -> Vec<TrainingSample> {
        [([0.0, 0.0], 0.0), ([0.0, 1.0], 1.0), ([1.0, 0.0], 1.0), ([1.0, 1.0], 0.0)]
            .iter()
            .map(|(input, out)| TrainingSample::new(input.to_vec(), vec![*out]))
            .collect()
    }

    #[test]
    fn rounding_maps_to_nearest_bit() {
        assert!(rounds_to_match(&[0.51, 0.49, -0.9], &[1.0, 0.0, 0.0]));
        assert!(!rounds_to_match(&[0.49], &[1.0]));
        assert!(!rounds_to_match(&[0.2, 0.2], &[0.0]));
    }

    #[test]
    fn check_stats_agree_with_count_mismatches() {
        let net = Network::new(9, &[2, 3, 1], &[ActivationFunction::Tanh; 2], true).unwrap();
        let samples = xor_samples();
        let stats = evaluate(&net, &samples, 7).unwrap();
        assert_eq!(stats.epoch, 7);
        assert_eq!(stats.mismatched, count_mismatches(&net, &samples).unwrap());
        assert!(stats.mean_loss.is_finite());
        assert_eq!(count_mismatches(&net, &[]).unwrap(), 0);
    }

    #[test]
    fn empty_sample_set_is_a_configuration_error() {
        let mut net = Network::new(1, &[2, 1], &[ActivationFunction::Tanh], true).unwrap();
        let err = train_until_converged(&mut net, &[], &TrainConfig::default()).unwrap_err();
        assert!(matches!(err, NetError::Configuration(_)));
    }

    #[test]
    fn mismatched_sample_propagates_dimension_error() {
        let mut net = Network::new(1, &[2, 1], &[ActivationFunction::Tanh], true).unwrap();
        let samples = vec![TrainingSample::new(vec![1.0; 3], vec![1.0])];
        let err = train_until_converged(&mut net, &samples, &TrainConfig::default()).unwrap_err();
        assert!(matches!(err, NetError::DimensionMismatch { expected: 2, actual: 3 }));
    }

    #[test]
    fn ceiling_reports_non_convergence() {
        // A single linear layer cannot represent XOR.
        let mut net = Network::new(2, &[2, 1], &[ActivationFunction::Tanh], true).unwrap();
        let config = TrainConfig::new(5, 5, 40);
        let outcome = train_until_converged(&mut net, &xor_samples(), &config).unwrap();
        assert!(!outcome.converged);
        assert_eq!(outcome.epochs, 40);
        assert_eq!(outcome.last_check.epoch, 40);
        assert!(outcome.last_check.mismatched > 0);
    }

    #[test]
    fn xor_converges_for_most_seeds() {
        let config = TrainConfig::new(50, 10, 20_000);
        let samples = xor_samples();
        let mut converged = 0;
        for seed in 1..=6 {
            let mut net = Network::new(
                seed,
                &[2, 4, 1],
                &[ActivationFunction::Tanh, ActivationFunction::Tanh],
                true,
            ).unwrap();
            let outcome = train_until_converged(&mut net, &samples, &config).unwrap();
            if outcome.converged {
                assert_eq!(count_mismatches(&net, &samples).unwrap(), 0);
                converged += 1;
            }
        }
        assert!(converged >= 3, "only {} of 6 seeds converged", converged);
    }
}
