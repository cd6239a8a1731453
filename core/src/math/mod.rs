pub mod complex;
pub mod fft;
pub mod matrix;
pub mod stats;

pub use complex::{divide, multiply};
pub use fft::{transform, FftHelper};
pub use matrix::matrix_multiply;
pub use stats::{mean, sum};
