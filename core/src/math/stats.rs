use rustfft::num_traits::Zero;

use crate::matrix::Matrix;
use crate::prelude::Sample;

/// Row-major sum of a single-channel matrix, accumulated in `T`.
///
/// Empty input sums to zero; a non-empty complex matrix panics.
pub fn sum<T: Sample>(m: &Matrix<T>) -> T {
    if m.is_empty() {
        return T::zero();
    }
    match m {
        Matrix::Real(data) => data.iter().fold(T::zero(), |acc, &value| acc + value),
        Matrix::Complex(_) => panic!("sum: expected a single-channel matrix"),
    }
}

/// Mean of a single-channel matrix; zero when empty.
pub fn mean<T: Sample>(m: &Matrix<T>) -> T {
    let (rows, cols) = m.dim();
    match T::from_usize(rows * cols) {
        Some(count) if !count.is_zero() => sum(m) / count,
        _ => T::zero(),
    }
}
