use crate::generator::profile::{box_kernel, build_patch_pair};
use crate::workflow::config::{Precision, WorkflowConfig};
use anyhow::Context;
use ndarray::Array2;
use num_complex::Complex;
use serde::Serialize;
use speccore::{
    circular_shift, conjugate, convolve, divide, magnitude, matrix_multiply, mean, multiply,
    promote, quadrant_swap, real, sum, ConvolutionMode, FftHelper, Matrix, Sample,
};

/// Summary of one synthetic correlation run.
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowReport {
    pub precision: Precision,
    pub grid: [usize; 2],
    pub requested_shift: [isize; 2],
    pub recovered_shift: [isize; 2],
    pub peak_response: f64,
    pub roundtrip_error: f64,
    pub dft_matrix_error: f64,
    pub spatial_energy: f64,
    pub spectral_energy: f64,
    pub division_error: f64,
    pub dc_centered: bool,
    pub smoothed_grid: [usize; 2],
    pub smoothed_mean: f64,
}

#[derive(Clone)]
pub struct Runner {
    config: WorkflowConfig,
}

impl Runner {
    pub fn new(config: WorkflowConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> anyhow::Result<WorkflowReport> {
        match self.config.precision {
            Precision::Single => self.run::<f32>(),
            Precision::Double => self.run::<f64>(),
        }
    }

    fn run<T: Sample>(&self) -> anyhow::Result<WorkflowReport> {
        let config = &self.config;
        let pair = build_patch_pair::<T>(config).context("generating patch pair")?;
        let template = Matrix::Real(pair.template);
        let displaced = Matrix::Real(pair.displaced);
        let (rows, cols) = template.dim();
        let count = (rows * cols) as f64;
        let mut fft = FftHelper::new();

        let template_spectrum = fft.forward(&template);
        let restored = real(&fft.inverse(&template_spectrum));
        let roundtrip_error = max_abs_diff(&template, &restored)?;
        log::info!("round-trip error {:.3e}", roundtrip_error);

        let dft_matrix_error = dft_matrix_error(&template, &template_spectrum)?;

        // Circular cross-correlation, centred so zero displacement sits at
        // (rows / 2, cols / 2).
        let displaced_spectrum = fft.forward(&displaced);
        let cross = multiply(&displaced_spectrum, &conjugate(&template_spectrum));
        let response = real(&fft.inverse(&cross));
        let centered = circular_shift(&response, true, true, false);
        let (peak_row, peak_col, peak_response) = argmax(&centered)?;
        let recovered_shift = [
            peak_row as isize - (rows / 2) as isize,
            peak_col as isize - (cols / 2) as isize,
        ];
        log::info!(
            "requested shift ({}, {}), recovered ({}, {})",
            config.shift_rows,
            config.shift_cols,
            recovered_shift[0],
            recovered_shift[1]
        );

        let spatial_energy = to_f64(sum(&real(&multiply(&template, &template))))?;
        let spectrum_magnitude = magnitude(&template_spectrum);
        let spectral_energy =
            to_f64(sum(&real(&multiply(&spectrum_magnitude, &spectrum_magnitude))))? / count;

        let quotient = divide(&cross, &conjugate(&template_spectrum));
        let division_error = relative_spectrum_error(&quotient, &displaced_spectrum)?;

        let (dc_row, dc_col, _) = argmax(&quadrant_swap(&spectrum_magnitude))?;
        let dc_centered = (dc_row, dc_col) == (rows / 2, cols / 2);

        let kernel = Matrix::Real(box_kernel::<T>(config.kernel_size)?);
        let smoothed = real(&convolve(&template, &kernel, ConvolutionMode::Valid));
        let smoothed_mean = to_f64(mean(&smoothed))?;

        Ok(WorkflowReport {
            precision: config.precision,
            grid: [rows, cols],
            requested_shift: [config.shift_rows, config.shift_cols],
            recovered_shift,
            peak_response,
            roundtrip_error,
            dft_matrix_error,
            spatial_energy,
            spectral_energy,
            division_error,
            dc_centered,
            smoothed_grid: [smoothed.rows(), smoothed.cols()],
            smoothed_mean,
        })
    }
}

fn to_f64<T: Sample>(value: T) -> anyhow::Result<f64> {
    value.to_f64().context("sample not representable as f64")
}

fn real_grid<T: Sample>(m: &Matrix<T>) -> anyhow::Result<&Array2<T>> {
    m.as_real().context("expected a single-channel matrix")
}

fn max_abs_diff<T: Sample>(lhs: &Matrix<T>, rhs: &Matrix<T>) -> anyhow::Result<f64> {
    let (lhs, rhs) = (real_grid(lhs)?, real_grid(rhs)?);
    lhs.iter().zip(rhs.iter()).try_fold(0.0, |worst: f64, (&a, &b)| {
        Ok(worst.max(to_f64(a - b)?.abs()))
    })
}

/// Row, column and value of the largest sample.
fn argmax<T: Sample>(m: &Matrix<T>) -> anyhow::Result<(usize, usize, f64)> {
    let grid = real_grid(m)?;
    let mut best: Option<(usize, usize, T)> = None;
    for ((i, j), &value) in grid.indexed_iter() {
        if best.map_or(true, |(_, _, current)| value > current) {
            best = Some((i, j, value));
        }
    }
    let (i, j, value) = best.context("argmax of an empty grid")?;
    Ok((i, j, to_f64(value)?))
}

/// `n × n` DFT matrix `W[u][x] = exp(-2πi·u·x / n)`.
fn dft_matrix<T: Sample>(n: usize) -> anyhow::Result<Matrix<T>> {
    let mut data = Array2::zeros((n, n));
    for ((u, x), slot) in data.indexed_iter_mut() {
        let angle = -2.0 * std::f64::consts::PI * ((u * x) % n) as f64 / n as f64;
        let angle = T::from_f64(angle).context("twiddle angle not representable")?;
        *slot = Complex::from_polar(T::one(), angle);
    }
    Ok(Matrix::Complex(data))
}

/// Deviation between `W_rows · X · W_cols` and the FFT spectrum of `X`.
fn dft_matrix_error<T: Sample>(template: &Matrix<T>, spectrum: &Matrix<T>) -> anyhow::Result<f64> {
    let (rows, cols) = template.dim();
    let promoted = promote(template.clone());
    let direct = matrix_multiply(
        &matrix_multiply(&dft_matrix::<T>(rows)?, &promoted),
        &dft_matrix::<T>(cols)?,
    );
    relative_spectrum_error(&direct, spectrum)
}

/// Largest per-sample distance between two spectra, relative to the DC
/// magnitude of `expected`.
fn relative_spectrum_error<T: Sample>(
    actual: &Matrix<T>,
    expected: &Matrix<T>,
) -> anyhow::Result<f64> {
    let actual = actual.as_complex().context("expected a two-channel matrix")?;
    let expected = expected.as_complex().context("expected a two-channel matrix")?;
    let dc = expected.first().context("empty spectrum")?;
    let scale = to_f64(dc.norm())?.max(f64::MIN_POSITIVE);
    actual
        .iter()
        .zip(expected.iter())
        .try_fold(0.0, |worst: f64, (&a, &b)| {
            Ok(worst.max(to_f64((a - b).norm())? / scale))
        })
}
