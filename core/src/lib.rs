//! Frequency-domain matrix primitives for correlation-filter pipelines.
//!
//! Every operation works on a [`Matrix`] holding one real or two interleaved
//! (real, imaginary) channels per sample, generic over `f32` and `f64`. The
//! pieces compose into circular correlation: forward transform, conjugate,
//! elementwise multiply, inverse transform, then a half-grid shift to centre
//! the response.

pub mod math;
pub mod matrix;
pub mod prelude;
pub mod processing;

pub use math::{divide, matrix_multiply, mean, multiply, sum, transform, FftHelper};
pub use matrix::{conjugate, imag, magnitude, promote, real, Matrix, Matrix32, Matrix64};
pub use prelude::{MatrixError, MatrixResult, Sample};
pub use processing::{
    circular_shift, convolve, correlate, quadrant_swap, ConvolutionMode, ShiftConfig,
};
