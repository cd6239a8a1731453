use ndarray::{Array2, Axis};
use num_complex::Complex;
use rustfft::num_traits::{Float, Zero};
use rustfft::{Fft, FftDirection, FftPlanner};

use crate::matrix::Matrix;
use crate::prelude::Sample;

/// Helper that wraps the `rustfft` planner so repeated transforms of the same
/// grid size reuse their plans.
pub struct FftHelper<T: Sample> {
    planner: FftPlanner<T>,
}

impl<T: Sample> FftHelper<T> {
    pub fn new() -> Self {
        Self {
            planner: FftPlanner::new(),
        }
    }

    /// 2D transform of `input`, always returning a complex matrix of the same
    /// shape. The forward direction is unscaled; the inverse is scaled by
    /// `1 / (rows * cols)`.
    pub fn transform(&mut self, input: &Matrix<T>, inverse: bool) -> Matrix<T> {
        let mut data = input.complex_samples().into_owned();
        let (rows, cols) = data.dim();
        if rows == 0 || cols == 0 {
            return Matrix::Complex(data);
        }

        let direction = if inverse {
            FftDirection::Inverse
        } else {
            FftDirection::Forward
        };
        log::trace!("{:?} transform over {}x{} grid", direction, rows, cols);

        let row_fft = self.planner.plan_fft(cols, direction);
        process_lanes(&mut data, Axis(1), row_fft.as_ref());
        let col_fft = self.planner.plan_fft(rows, direction);
        process_lanes(&mut data, Axis(0), col_fft.as_ref());

        if inverse {
            let norm = T::from_usize(rows * cols).map_or_else(T::one, Float::recip);
            data.mapv_inplace(|value| value.scale(norm));
        }
        Matrix::Complex(data)
    }

    pub fn forward(&mut self, input: &Matrix<T>) -> Matrix<T> {
        self.transform(input, false)
    }

    pub fn inverse(&mut self, input: &Matrix<T>) -> Matrix<T> {
        self.transform(input, true)
    }
}

impl<T: Sample> Default for FftHelper<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs `fft` over every lane of `data` along `axis`, gathering each lane into
/// a contiguous buffer first.
fn process_lanes<T: Sample>(data: &mut Array2<Complex<T>>, axis: Axis, fft: &dyn Fft<T>) {
    let mut buffer = vec![Complex::zero(); data.len_of(axis)];
    let mut scratch = vec![Complex::zero(); fft.get_inplace_scratch_len()];

    for mut lane in data.lanes_mut(axis) {
        for (slot, value) in buffer.iter_mut().zip(lane.iter()) {
            *slot = *value;
        }
        fft.process_with_scratch(&mut buffer, &mut scratch);
        for (value, slot) in lane.iter_mut().zip(buffer.iter()) {
            *value = *slot;
        }
    }
}

/// One-shot 2D transform. Single-channel input is promoted first.
pub fn transform<T: Sample>(input: &Matrix<T>, inverse: bool) -> Matrix<T> {
    FftHelper::new().transform(input, inverse)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::{imag, real};
    use ndarray::array;

    fn max_abs_diff(lhs: &Array2<f64>, rhs: &Array2<f64>) -> f64 {
        lhs.iter()
            .zip(rhs.iter())
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max)
    }

    #[test]
    fn real_input_round_trips_within_tolerance() {
        let input = Matrix::Real(array![[1.0f32, 2.0], [3.0, 4.0]]);
        let spectrum = transform(&input, false);
        assert!(spectrum.is_complex());

        let restored = transform(&spectrum, true);
        let re = real(&restored);
        let im = imag(&restored);
        let expected = [[1.0f32, 2.0], [3.0, 4.0]];
        for (i, row) in expected.iter().enumerate() {
            for (j, value) in row.iter().enumerate() {
                assert!((re.as_real().unwrap()[[i, j]] - value).abs() < 1e-5);
                assert!(im.as_real().unwrap()[[i, j]].abs() < 1e-5);
            }
        }
    }

    #[test]
    fn forward_transform_is_unscaled() {
        let input = Matrix::Real(Array2::from_elem((3, 5), 2.0f64));
        let spectrum = transform(&input, false);
        let data = spectrum.as_complex().unwrap();
        assert!((data[[0, 0]].re - 30.0).abs() < 1e-10);
        assert!(data.iter().skip(1).all(|c| c.norm() < 1e-10));
    }

    #[test]
    fn forward_transform_matches_direct_dft() {
        let grid = array![[1.0f64, -2.0, 0.5], [3.0, 0.0, 4.0]];
        let spectrum = transform(&Matrix::Real(grid.clone()), false);
        let data = spectrum.as_complex().unwrap();
        let (rows, cols) = grid.dim();
        for u in 0..rows {
            for v in 0..cols {
                let mut expected = Complex::new(0.0, 0.0);
                for ((y, x), &value) in grid.indexed_iter() {
                    let angle = -2.0
                        * std::f64::consts::PI
                        * ((u * y) as f64 / rows as f64 + (v * x) as f64 / cols as f64);
                    expected += Complex::from_polar(value, angle);
                }
                assert!((data[[u, v]] - expected).norm() < 1e-9);
            }
        }
    }

    #[test]
    fn complex_input_round_trips() {
        let grid = Array2::from_shape_fn((4, 6), |(i, j)| {
            Complex::new((i * 6 + j) as f64, (i as f64) - (j as f64) * 0.5)
        });
        let mut helper = FftHelper::new();
        let spectrum = helper.forward(&Matrix::Complex(grid.clone()));
        let restored = helper.inverse(&spectrum);
        let restored = restored.as_complex().unwrap();

        let re_diff = max_abs_diff(&restored.mapv(|c| c.re), &grid.mapv(|c| c.re));
        let im_diff = max_abs_diff(&restored.mapv(|c| c.im), &grid.mapv(|c| c.im));
        assert!(re_diff < 1e-9 && im_diff < 1e-9);
    }

    #[test]
    fn empty_input_yields_empty_complex() {
        let output = transform(&Matrix::<f32>::empty(), false);
        assert!(output.is_empty());
        assert!(output.is_complex());
    }
}
