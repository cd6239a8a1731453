use rustfft::num_traits::Float;

use crate::matrix::Matrix;
use crate::prelude::Sample;

/// Channel-0 plane of any matrix.
pub fn real<T: Sample>(m: &Matrix<T>) -> Matrix<T> {
    match m {
        Matrix::Real(data) => Matrix::Real(data.clone()),
        Matrix::Complex(data) => Matrix::Real(data.mapv(|c| c.re)),
    }
}

/// Channel-1 plane. Panics on a single-channel matrix.
pub fn imag<T: Sample>(m: &Matrix<T>) -> Matrix<T> {
    match m {
        Matrix::Complex(data) => Matrix::Real(data.mapv(|c| c.im)),
        Matrix::Real(_) => panic!("imag: expected a two-channel matrix"),
    }
}

/// Per-sample absolute value (real) or Euclidean norm of `(re, im)` (complex).
pub fn magnitude<T: Sample>(m: &Matrix<T>) -> Matrix<T> {
    match m {
        Matrix::Real(data) => Matrix::Real(data.mapv(<T as Float>::abs)),
        Matrix::Complex(data) => Matrix::Real(data.mapv(|c| c.norm())),
    }
}

/// Negates the imaginary plane.
///
/// Empty input comes back unchanged; a non-empty real matrix panics.
pub fn conjugate<T: Sample>(m: &Matrix<T>) -> Matrix<T> {
    if m.is_empty() {
        return m.clone();
    }
    match m {
        Matrix::Complex(data) => Matrix::Complex(data.mapv(|c| c.conj())),
        Matrix::Real(_) => panic!("conjugate: expected a two-channel matrix"),
    }
}
