//! The `Matrix` entity shared by every primitive in the crate.
//!
//! A matrix is a `rows × cols` grid holding either one real channel or two
//! interleaved channels (real, imaginary) per sample.

use std::borrow::Cow;

use ndarray::Array2;
use num_complex::Complex;
use serde::{Deserialize, Serialize};

use crate::prelude::{MatrixError, MatrixResult, Sample};

pub mod planes;

pub use planes::{conjugate, imag, magnitude, real};

/// Single- or two-channel sample grid.
///
/// `Complex<T>` is laid out as `(re, im)`, so the complex variant stores both
/// planes interleaved per sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Matrix<T> {
    Real(Array2<T>),
    Complex(Array2<Complex<T>>),
}

pub type Matrix32 = Matrix<f32>;
pub type Matrix64 = Matrix<f64>;

impl<T: Sample> Matrix<T> {
    /// The "no data" value returned by soft failures.
    pub fn empty() -> Self {
        Matrix::Real(Array2::zeros((0, 0)))
    }

    pub fn zeros(rows: usize, cols: usize, channels: usize) -> MatrixResult<Self> {
        match channels {
            1 => Ok(Matrix::Real(Array2::zeros((rows, cols)))),
            2 => Ok(Matrix::Complex(Array2::zeros((rows, cols)))),
            other => Err(MatrixError::UnsupportedChannels(other)),
        }
    }

    /// Builds a matrix from a row-major buffer with `channels` values per sample.
    pub fn from_interleaved(
        rows: usize,
        cols: usize,
        channels: usize,
        samples: Vec<T>,
    ) -> MatrixResult<Self> {
        if channels != 1 && channels != 2 {
            return Err(MatrixError::UnsupportedChannels(channels));
        }

        let expected = rows
            .checked_mul(cols)
            .and_then(|count| count.checked_mul(channels))
            .ok_or(MatrixError::ShapeOverflow {
                rows,
                cols,
                channels,
            })?;
        let actual = samples.len();
        if actual != expected {
            return Err(MatrixError::BufferLength { expected, actual });
        }

        let length_error = |_| MatrixError::BufferLength { expected, actual };
        if channels == 1 {
            Array2::from_shape_vec((rows, cols), samples)
                .map(Matrix::Real)
                .map_err(length_error)
        } else {
            let values = samples
                .chunks_exact(2)
                .map(|pair| Complex::new(pair[0], pair[1]))
                .collect();
            Array2::from_shape_vec((rows, cols), values)
                .map(Matrix::Complex)
                .map_err(length_error)
        }
    }

    /// Flattens the matrix back into a row-major interleaved buffer.
    pub fn to_interleaved(&self) -> Vec<T> {
        match self {
            Matrix::Real(data) => data.iter().copied().collect(),
            Matrix::Complex(data) => data.iter().flat_map(|c| [c.re, c.im]).collect(),
        }
    }

    pub fn rows(&self) -> usize {
        self.dim().0
    }

    pub fn cols(&self) -> usize {
        self.dim().1
    }

    pub fn dim(&self) -> (usize, usize) {
        match self {
            Matrix::Real(data) => data.dim(),
            Matrix::Complex(data) => data.dim(),
        }
    }

    pub fn channels(&self) -> usize {
        match self {
            Matrix::Real(_) => 1,
            Matrix::Complex(_) => 2,
        }
    }

    pub fn is_empty(&self) -> bool {
        let (rows, cols) = self.dim();
        rows == 0 || cols == 0
    }

    pub fn is_complex(&self) -> bool {
        matches!(self, Matrix::Complex(_))
    }

    pub fn as_real(&self) -> Option<&Array2<T>> {
        match self {
            Matrix::Real(data) => Some(data),
            Matrix::Complex(_) => None,
        }
    }

    pub fn as_complex(&self) -> Option<&Array2<Complex<T>>> {
        match self {
            Matrix::Real(_) => None,
            Matrix::Complex(data) => Some(data),
        }
    }

    /// Complex samples of the matrix, lifting a real grid when needed.
    pub(crate) fn complex_samples(&self) -> Cow<'_, Array2<Complex<T>>> {
        match self {
            Matrix::Real(data) => Cow::Owned(data.mapv(|re| Complex::new(re, T::zero()))),
            Matrix::Complex(data) => Cow::Borrowed(data),
        }
    }
}

/// Lifts a real matrix to two channels with a zero imaginary plane.
///
/// Complex and empty inputs are returned unchanged.
pub fn promote<T: Sample>(m: Matrix<T>) -> Matrix<T> {
    match m {
        Matrix::Real(data) if !data.is_empty() => {
            Matrix::Complex(data.mapv(|re| Complex::new(re, T::zero())))
        }
        other => other,
    }
}
