use rustfft::num_traits::Float;
use rustfft::FftNum;

pub use crate::matrix::{Matrix, Matrix32, Matrix64};
pub use crate::processing::convolution::ConvolutionMode;
pub use crate::processing::shift::ShiftConfig;

/// Element precision accepted by every primitive.
///
/// Implemented for `f32` and `f64`; a single call never mixes the two.
pub trait Sample: FftNum + Float {}

macro_rules! impl_sample {
    ($($t:ty),*) => {
        $(impl Sample for $t {})*
    };
}

impl_sample!(f32, f64);

/// Common error type for building matrices from raw buffers.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MatrixError {
    #[error("unsupported channel count: {0}")]
    UnsupportedChannels(usize),
    #[error("buffer length mismatch: expected {expected} samples, got {actual}")]
    BufferLength { expected: usize, actual: usize },
    #[error("shape overflow: {rows}x{cols}x{channels}")]
    ShapeOverflow {
        rows: usize,
        cols: usize,
        channels: usize,
    },
}

pub type MatrixResult<T> = Result<T, MatrixError>;
