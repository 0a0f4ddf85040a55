#![allow(dead_code)]

use std::path::PathBuf;

#[path = "../../demos/curriculum.rs"]
mod curriculum;

pub use curriculum::{bits_of, count_bits_samples, segments_of, SEGMENTS};

/// Per-test scratch file under the system temp directory.
pub fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("segment_nn_{}_{}", std::process::id(), name))
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
