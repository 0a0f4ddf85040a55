use serde::{Serialize, Deserialize};

use crate::activation::activation::ActivationFunction;
use crate::error::Result;
use crate::network::network::{validate_topology, Network};

/// A serializable description of a network's shape, independent of its
/// trained weights.
///
/// Fields mirror `Network::new`:
/// - `seed`        : weight-initialisation seed; 0 draws a fresh one
/// - `layer_widths`: input width, hidden widths, output width
/// - `activations` : one per transition, so `layer_widths.len() - 1` entries
/// - `use_bias`    : whether every layer carries a bias vector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSpec {
    #[serde(default)]
    pub seed: u64,
    pub layer_widths: Vec<usize>,
    pub activations: Vec<ActivationFunction>,
    #[serde(default = "default_use_bias")]
    pub use_bias: bool,
}

fn default_use_bias() -> bool {
    true
}

impl NetworkSpec {
    /// Same activation on every transition.
    pub fn uniform(seed: u64, layer_widths: &[usize], activation: ActivationFunction, use_bias: bool) -> NetworkSpec {
        NetworkSpec {
            seed,
            layer_widths: layer_widths.to_vec(),
            activations: vec![activation; layer_widths.len().saturating_sub(1)],
            use_bias,
        }
    }

    pub fn validate(&self) -> Result<()> {
        validate_topology(&self.layer_widths, &self.activations)
    }

    pub fn build(&self) -> Result<Network> {
        Network::from_spec(self)
    }

    /// Serializes the spec to a pretty-printed JSON file.
    pub fn save_json(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes a `NetworkSpec` from a JSON file and validates it.
    pub fn load_json(path: impl AsRef<std::path::Path>) -> Result<NetworkSpec> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        let spec: NetworkSpec = serde_json::from_reader(reader)?;
        spec.validate()?;
        Ok(spec)
    }
}

impl Network {
    pub fn from_spec(spec: &NetworkSpec) -> Result<Network> {
        Network::new(spec.seed, &spec.layer_widths, &spec.activations, spec.use_bias)
    }

    /// Topology of this network; the seed is the one it was built from.
    pub fn spec(&self) -> NetworkSpec {
        NetworkSpec {
            seed: self.seed,
            layer_widths: self.layer_widths(),
            activations: self.activations(),
            use_bias: self.use_bias,
        }
    }
}
