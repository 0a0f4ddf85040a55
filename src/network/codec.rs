//! Binary weight files.
//!
//! Layout, all numbers little-endian:
//!
//! ```text
//! magic        b"SGNN"
//! version      u8
//! use_bias     u8 (0 or 1)
//! width_count  u32, then that many u32 widths
//! activations  (u8 tag, f64 param) per transition
//! parameters   per layer: weights row-major, then biases if enabled
//! ```

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use log::info;

use crate::activation::activation::ActivationFunction;
use crate::error::{NetError, Result};
use crate::layers::dense::Layer;
use crate::math::matrix::Matrix;
use crate::network::network::Network;

pub const MAGIC: [u8; 4] = *b"SGNN";
pub const VERSION: u8 = 1;
/// Upper bound on stored widths (input plus every layer output).
pub const MAX_LAYERS: usize = 1024;
pub const MAX_WIDTH: usize = 1 << 20;

pub fn encode<W: Write>(network: &Network, mut writer: W) -> Result<()> {
    writer.write_all(&MAGIC)?;
    writer.write_all(&[VERSION, network.use_bias as u8])?;

    let widths = network.layer_widths();
    writer.write_all(&(widths.len() as u32).to_le_bytes())?;
    for width in &widths {
        writer.write_all(&(*width as u32).to_le_bytes())?;
    }

    for layer in &network.layers {
        let (tag, param) = layer.activator.to_tag();
        writer.write_all(&[tag])?;
        writer.write_all(&param.to_le_bytes())?;
    }

    for layer in &network.layers {
        for w in layer.weights.as_slice() {
            writer.write_all(&w.to_le_bytes())?;
        }
        if let Some(biases) = &layer.biases {
            for b in biases {
                writer.write_all(&b.to_le_bytes())?;
            }
        }
    }

    writer.flush()?;
    Ok(())
}

/// Reads one network; the stream must end exactly where the network does.
pub fn decode<R: Read>(reader: R) -> Result<Network> {
    let mut src = Source { inner: reader };

    let mut magic = [0u8; 4];
    src.fill(&mut magic, "magic")?;
    if magic != MAGIC {
        return Err(NetError::corrupt(format!("bad magic {:02x?}", magic)));
    }

    let version = src.read_u8("version")?;
    if version != VERSION {
        return Err(NetError::corrupt(format!("unsupported version {}", version)));
    }

    let use_bias = match src.read_u8("bias flag")? {
        0 => false,
        1 => true,
        other => return Err(NetError::corrupt(format!("bias flag must be 0 or 1, got {}", other))),
    };

    let width_count = src.read_u32("width count")? as usize;
    if !(2..=MAX_LAYERS).contains(&width_count) {
        return Err(NetError::corrupt(format!("width count {} out of range", width_count)));
    }
    let mut widths = Vec::with_capacity(width_count);
    for i in 0..width_count {
        let width = src.read_u32("layer width")? as usize;
        if !(1..=MAX_WIDTH).contains(&width) {
            return Err(NetError::corrupt(format!("width {} of layer {} out of range", width, i)));
        }
        widths.push(width);
    }

    let mut activations = Vec::with_capacity(width_count - 1);
    for i in 0..width_count - 1 {
        let tag = src.read_u8("activation tag")?;
        let param = src.read_f64("activation parameter")?;
        match ActivationFunction::from_tag(tag, param) {
            Some(f) if f.is_valid() => activations.push(f),
            Some(_) => return Err(NetError::corrupt(format!("activation {} has a non-finite parameter", i))),
            None => return Err(NetError::corrupt(format!("unknown activation tag {} at transition {}", tag, i))),
        }
    }

    let mut layers = Vec::with_capacity(activations.len());
    for (pair, activation) in widths.windows(2).zip(activations) {
        let (rows, cols) = (pair[0], pair[1]);
        let weights = Matrix::from_vec(rows, cols, src.read_f64_vec(rows * cols, "weights")?)
            .ok_or_else(|| NetError::corrupt("weight block has the wrong length"))?;
        let biases = if use_bias {
            Some(src.read_f64_vec(cols, "biases")?)
        } else {
            None
        };
        let layer = Layer::from_parts(weights, biases, activation)
            .ok_or_else(|| NetError::corrupt("layer parameters have inconsistent shapes"))?;
        layers.push(layer);
    }

    let mut extra = [0u8; 1];
    match src.inner.read(&mut extra) {
        Ok(0) => {}
        Ok(_) => return Err(NetError::corrupt("trailing bytes after the last layer")),
        Err(e) => return Err(e.into()),
    }

    Network::from_layers(layers, use_bias).map_err(|e| NetError::corrupt(e.to_string()))
}

/// Wraps a reader so a short read becomes `CorruptFile` and any other
/// failure stays an I/O error.
struct Source<R> {
    inner: R,
}

impl<R: Read> Source<R> {
    fn fill(&mut self, buf: &mut [u8], what: &str) -> Result<()> {
        self.inner.read_exact(buf).map_err(|e| match e.kind() {
            io::ErrorKind::UnexpectedEof => NetError::corrupt(format!("stream ended while reading {}", what)),
            _ => NetError::Io(e),
        })
    }

    fn read_u8(&mut self, what: &str) -> Result<u8> {
        let mut buf = [0u8; 1];
        self.fill(&mut buf, what)?;
        Ok(buf[0])
    }

    fn read_u32(&mut self, what: &str) -> Result<u32> {
        let mut buf = [0u8; 4];
        self.fill(&mut buf, what)?;
        Ok(u32::from_le_bytes(buf))
    }

    fn read_f64(&mut self, what: &str) -> Result<f64> {
        let mut buf = [0u8; 8];
        self.fill(&mut buf, what)?;
        Ok(f64::from_le_bytes(buf))
    }

    fn read_f64_vec(&mut self, len: usize, what: &str) -> Result<Vec<f64>> {
        // Grow as values arrive so a lying header cannot force a huge allocation.
        let mut values = Vec::with_capacity(len.min(4096));
        for _ in 0..len {
            values.push(self.read_f64(what)?);
        }
        Ok(values)
    }
}

impl Network {
    /// Writes topology and parameters to `path`, replacing any existing file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path)?;
        encode(self, BufWriter::new(file))?;
        info!("saved network {:?} to {}", self.layer_widths(), path.display());
        Ok(())
    }

    /// Reads a network previously written by `save`.
    pub fn load(path: impl AsRef<Path>) -> Result<Network> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let network = decode(BufReader::new(file))?;
        info!("loaded network {:?} from {}", network.layer_widths(), path.display());
        Ok(network)
    }

    /// Replaces this network's parameters with those stored at `path`.
    ///
    /// The stored topology must match exactly. On any error `self` is left
    /// unchanged.
    pub fn load_into(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let loaded = Network::load(path)?;
        if !self.same_topology(&loaded) {
            return Err(NetError::TopologyMismatch(format!(
                "file holds {:?} {:?} (bias: {}), network is {:?} {:?} (bias: {})",
                loaded.layer_widths(),
                loaded.activations(),
                loaded.use_bias,
                self.layer_widths(),
                self.activations(),
                self.use_bias
            )));
        }
        self.layers = loaded.layers;
        Ok(())
    }

    /// Serializes the network weights to a pretty-printed JSON file.
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes a network from a JSON file previously written by `save_json`.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Network> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let network: Network = serde_json::from_reader(reader)?;
        network.check_shape().map_err(NetError::CorruptFile)?;
        Ok(network)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_network(use_bias: bool) -> Network {
        let activations = [ActivationFunction::LeakyReLU { alpha: 0.05 }, ActivationFunction::Tanh];
        Network::new(17, &[3, 4, 2], &activations, use_bias).unwrap()
    }

    fn encoded(network: &Network) -> Vec<u8> {
        let mut bytes = Vec::new();
        encode(network, &mut bytes).unwrap();
        bytes
    }

    #[test]
    fn encoded_length_matches_layout() {
        let header = 4 + 1 + 1 + 4 + 3 * 4 + 2 * 9;
        let weights = (3 * 4 + 4 * 2) * 8;
        assert_eq!(encoded(&sample_network(false)).len(), header + weights);
        assert_eq!(encoded(&sample_network(true)).len(), header + weights + (4 + 2) * 8);
    }

    #[test]
    fn decode_restores_parameters_exactly() {
        for use_bias in [false, true] {
            let net = sample_network(use_bias);
            let back = decode(&encoded(&net)[..]).unwrap();
            assert_eq!(back.layers(), net.layers());
            assert_eq!(back.use_bias(), use_bias);
        }
    }

    #[test]
    fn every_truncation_is_corrupt() {
        let bytes = encoded(&sample_network(true));
        for cut in 0..bytes.len() {
            match decode(&bytes[..cut]) {
                Err(NetError::CorruptFile(_)) => {}
                other => panic!("cut at {} gave {:?}", cut, other),
            }
        }
    }

    #[test]
    fn json_text_keeps_every_weight_bit() {
        for seed in 1..=20 {
            let activations = [ActivationFunction::Tanh, ActivationFunction::Tanh];
            let net = Network::new(seed, &[9, 16, 7], &activations, true).unwrap();
            let text = serde_json::to_string(&net).unwrap();
            let back: Network = serde_json::from_str(&text).unwrap();
            for (a, b) in back.layers().iter().zip(net.layers()) {
                let bits = |l: &Layer| l.weights().as_slice().iter().map(|w| w.to_bits()).collect::<Vec<_>>();
                assert_eq!(bits(a), bits(b), "seed {}", seed);
                assert_eq!(a.biases(), b.biases(), "seed {}", seed);
            }
        }
    }

    #[test]
    fn out_of_range_header_fields_are_corrupt() {
        let good = encoded(&sample_network(true));

        let mut bad_magic = good.clone();
        bad_magic[0] = b'X';
        let mut bad_bias = good.clone();
        bad_bias[5] = 2;
        let mut one_width = good.clone();
        one_width[6..10].copy_from_slice(&1u32.to_le_bytes());
        let mut zero_width = good.clone();
        zero_width[10..14].copy_from_slice(&0u32.to_le_bytes());
        let mut bad_tag = good.clone();
        bad_tag[22] = 99;
        let mut trailing = good.clone();
        trailing.push(0);

        for (name, bytes) in [
            ("magic", bad_magic),
            ("bias", bad_bias),
            ("count", one_width),
            ("width", zero_width),
            ("tag", bad_tag),
            ("trailing", trailing),
        ] {
            assert!(matches!(decode(&bytes[..]), Err(NetError::CorruptFile(_))), "{}", name);
        }
    }
}
