pub mod convolution;
pub mod shift;

pub use convolution::{convolve, correlate, ConvolutionMode};
pub use shift::{circular_shift, quadrant_swap, ShiftConfig};
