use rand::Rng;
use serde::{Serialize, Deserialize};

/// Dense row-major matrix of `f64`.
///
/// A layer's weights live here with shape `(inputs, outputs)`, so a row
/// vector times the matrix yields one value per output neuron.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    pub rows: usize,
    pub cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Fills a matrix with samples drawn uniformly from `[-range, range]`,
    /// row by row, so a seeded `rng` always produces the same matrix.
    pub fn random_uniform<R: Rng>(rows: usize, cols: usize, range: f64, rng: &mut R) -> Matrix {
        let data = (0..rows * cols)
            .map(|_| rng.gen_range(-range..=range))
            .collect();
        Matrix { rows, cols, data }
    }

    /// Wraps row-major `data`; returns `None` when its length is not `rows * cols`.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f64>) -> Option<Matrix> {
        if data.len() != rows * cols {
            return None;
        }
        Some(Matrix { rows, cols, data })
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.cols + col]
    }

    /// Row-major view of every element.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Shape check used after deserialization, where `data` bypasses `from_vec`.
    pub fn is_consistent(&self) -> bool {
        self.data.len() == self.rows * self.cols
    }

    /// Row vector times matrix: `v · M`, with `v.len() == rows`.
    pub fn vec_mul(&self, v: &[f64]) -> Vec<f64> {
        debug_assert_eq!(v.len(), self.rows);
        let mut out = vec![0.0; self.cols];
        if self.cols == 0 {
            return out;
        }
        for (row, &x) in self.data.chunks_exact(self.cols).zip(v) {
            for (acc, &w) in out.iter_mut().zip(row) {
                *acc += x * w;
            }
        }
        out
    }

    /// Row vector times the transpose: `v · Mᵀ`, with `v.len() == cols`.
    pub fn vec_mul_transposed(&self, v: &[f64]) -> Vec<f64> {
        debug_assert_eq!(v.len(), self.cols);
        if self.cols == 0 {
            return vec![0.0; self.rows];
        }
        self.data
            .chunks_exact(self.cols)
            .map(|row| row.iter().zip(v).map(|(w, x)| w * x).sum())
            .collect()
    }

    /// In-place `M += scale · (a ⊗ b)` where `a.len() == rows` and `b.len() == cols`.
    pub fn add_outer(&mut self, a: &[f64], b: &[f64], scale: f64) {
        debug_assert_eq!(a.len(), self.rows);
        debug_assert_eq!(b.len(), self.cols);
        if self.cols == 0 {
            return;
        }
        for (row, &ai) in self.data.chunks_exact_mut(self.cols).zip(a) {
            let s = scale * ai;
            for (w, &bj) in row.iter_mut().zip(b) {
                *w += s * bj;
            }
        }
    }
}

/// Element-wise (Hadamard) product of two equal-length vectors.
pub fn hadamard(a: &[f64], b: &[f64]) -> Vec<f64> {
    debug_assert_eq!(a.len(), b.len());
    a.iter().zip(b).map(|(x, y)| x * y).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn sample() -> Matrix {
        // [[1, 2, 3],
        //  [4, 5, 6]]
        Matrix::from_vec(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap()
    }

    #[test]
    fn from_vec_rejects_wrong_length() {
        assert!(Matrix::from_vec(2, 2, vec![1.0; 3]).is_none());
    }

    #[test]
    fn vec_mul_is_row_vector_product() {
        assert_eq!(sample().vec_mul(&[1.0, -1.0]), vec![-3.0, -3.0, -3.0]);
    }

    #[test]
    fn vec_mul_transposed_uses_rows() {
        assert_eq!(sample().vec_mul_transposed(&[1.0, 0.0, 2.0]), vec![7.0, 16.0]);
    }

    #[test]
    fn add_outer_scales_each_cell() {
        let mut m = Matrix::zeros(2, 3);
        m.add_outer(&[1.0, 2.0], &[1.0, 0.0, -1.0], 0.5);
        assert_eq!(m.as_slice(), &[0.5, 0.0, -0.5, 1.0, 0.0, -1.0]);
        assert_eq!(m.get(1, 2), -1.0);
    }

    #[test]
    fn random_uniform_stays_in_range_and_repeats_per_seed() {
        let a = Matrix::random_uniform(4, 5, 1.0, &mut StdRng::seed_from_u64(7));
        let b = Matrix::random_uniform(4, 5, 1.0, &mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
        assert!(a.as_slice().iter().all(|w| (-1.0..=1.0).contains(w)));
    }

    #[test]
    fn hadamard_multiplies_pairwise() {
        assert_eq!(hadamard(&[1.0, 2.0], &[3.0, -1.0]), vec![3.0, -2.0]);
    }
}
