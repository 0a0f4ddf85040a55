use segment_nn::{ActivationFunction, Network, TrainConfig, TrainingSample, train_until_converged};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let samples: Vec<TrainingSample> = [
        ([1.0, 0.0], 1.0),
        ([1.0, 1.0], 0.0),
        ([0.0, 1.0], 1.0),
        ([0.0, 0.0], 0.0),
    ]
    .iter()
    .map(|(input, out)| TrainingSample::new(input.to_vec(), vec![*out]))
    .collect();

    let mut network = Network::new(
        0,
        &[2, 3, 1],
        &[ActivationFunction::Tanh, ActivationFunction::Tanh],
        true,
    )?;

    let outcome = train_until_converged(&mut network, &samples, &TrainConfig::default())?;
    println!(
        "seed {}: converged = {} after {} epochs (loss {:.6})",
        network.seed(), outcome.converged, outcome.epochs, outcome.last_check.mean_loss
    );

    for sample in &samples {
        println!("Input: {:?} -> Output: {:.4}", sample.input, network.feed_forward(&sample.input)?[0]);
    }
    Ok(())
}
