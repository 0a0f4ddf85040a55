//! Count-the-set-bits curriculum shared by the `seven_segment` demo and the
//! convergence tests.
//!
//! Inputs are encoded as ±1 (set bit = 1.0, clear bit = -1.0) so they sit in
//! the range the engine's learning rate is sized for. Targets are the 0/1
//! segment states a–g of the digit naming the count.

use segment_nn::TrainingSample;

/// Segments a–g lit for each decimal digit.
pub const SEGMENTS: [[u8; 7]; 10] = [
    [1, 1, 1, 1, 1, 1, 0],
    [0, 1, 1, 0, 0, 0, 0],
    [1, 1, 0, 1, 1, 0, 1],
    [1, 1, 1, 1, 0, 0, 1],
    [0, 1, 1, 0, 0, 1, 1],
    [1, 0, 1, 1, 0, 1, 1],
    [1, 0, 1, 1, 1, 1, 1],
    [1, 1, 1, 0, 0, 0, 0],
    [1, 1, 1, 1, 1, 1, 1],
    [1, 1, 1, 1, 0, 1, 1],
];

/// Low `bits` bits of `pattern`, least significant first, as ±1.
pub fn bits_of(pattern: u32, bits: u32) -> Vec<f64> {
    (0..bits)
        .map(|i| if (pattern >> i) & 1 == 1 { 1.0 } else { -1.0 })
        .collect()
}

/// Segment targets for `digit`.
pub fn segments_of(digit: usize) -> Vec<f64> {
    SEGMENTS[digit].iter().map(|&s| f64::from(s)).collect()
}

/// Every `bits`-wide input pattern, labelled with the digit showing how many bits are set.
pub fn count_bits_samples(bits: u32) -> Vec<TrainingSample> {
    (0..1u32 << bits)
        .map(|pattern| {
            TrainingSample::new(bits_of(pattern, bits), segments_of(pattern.count_ones() as usize))
        })
        .collect()
}
