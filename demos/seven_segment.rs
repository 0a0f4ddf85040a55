/// Counts the set bits of a 9-bit input and shows the count as a 7-segment digit.
///
/// Architecture: 9 → 16 (Tanh) → 7 (Tanh), biases on.
/// Each run starts from a fresh seed; a run that hits the epoch ceiling is
/// retried with a new one, up to `MAX_ATTEMPTS` times.
///
/// Run with:
///   RUST_LOG=info cargo run --example seven_segment --release [weights-file]
use std::env;

use segment_nn::{ActivationFunction, Network, TrainConfig, train_until_converged};

mod curriculum;

use curriculum::{bits_of, count_bits_samples};

const INPUT_BITS: u32 = 9;
const MAX_ATTEMPTS: usize = 5;

/// Three-line ASCII rendering of segment outputs, lit when ≥ 0.5.
fn render(outputs: &[f64]) -> String {
    let on = |i: usize| outputs[i] >= 0.5;
    let h = |i: usize| if on(i) { "_" } else { " " };
    let v = |i: usize| if on(i) { "|" } else { " " };
    format!(
        " {} \n{}{}{}\n{}{}{}",
        h(0),
        v(5), h(6), v(1),
        v(4), h(3), v(2),
    )
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let samples = count_bits_samples(INPUT_BITS);
    let config = TrainConfig::default();
    let activations = [ActivationFunction::Tanh, ActivationFunction::Tanh];

    let mut trained = None;
    for attempt in 1..=MAX_ATTEMPTS {
        let mut network = Network::new(0, &[INPUT_BITS as usize, 16, 7], &activations, true)?;
        let outcome = train_until_converged(&mut network, &samples, &config)?;
        println!(
            "attempt {} (seed {}): converged = {} after {} epochs, {} mismatched",
            attempt, network.seed(), outcome.converged, outcome.epochs, outcome.last_check.mismatched
        );
        if outcome.converged {
            trained = Some(network);
            break;
        }
    }

    let network = match trained {
        Some(network) => network,
        None => {
            eprintln!("no seed converged within {} attempts", MAX_ATTEMPTS);
            std::process::exit(1);
        }
    };

    for pattern in [0b0_0000_0000, 0b0_0000_0001, 0b0_0001_0011, 0b1_1111_1111] {
        let outputs = network.feed_forward(&bits_of(pattern, INPUT_BITS))?;
        println!("{:09b} ({} set):\n{}\n", pattern, pattern.count_ones(), render(&outputs));
    }

    if let Some(path) = env::args().nth(1) {
        network.save(&path)?;
        let reloaded = Network::load(&path)?;
        println!("saved to {} and reloaded ({} layers)", path, reloaded.layers().len());
    }
    Ok(())
}
