//! Linear convolution of real or complex matrices through four real
//! zero-bordered correlations.

use std::ops::Range;

use ndarray::{s, Array2, Zip};
use num_complex::Complex;
use serde::{Deserialize, Serialize};

use crate::matrix::{promote, Matrix};
use crate::prelude::Sample;

/// Output extent of [`convolve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConvolutionMode {
    /// The whole `(ra + rb - 1) × (ca + cb - 1)` result.
    #[default]
    Full,
    /// Only the region where `b` overlaps `a` completely.
    Valid,
}

/// Linear convolution `a * b`, promoting both operands to complex.
///
/// Returns an empty matrix when either operand is empty. `Valid` mode
/// requires `a` to be at least as large as `b` on both axes.
pub fn convolve<T: Sample>(a: &Matrix<T>, b: &Matrix<T>, mode: ConvolutionMode) -> Matrix<T> {
    if a.is_empty() || b.is_empty() {
        log::debug!("convolve: empty operand");
        return Matrix::empty();
    }
    let a = promote(a.clone());
    let b = promote(b.clone());
    let (Some(a), Some(b)) = (a.as_complex(), b.as_complex()) else {
        log::debug!("convolve: operand is not complex after promotion");
        return Matrix::empty();
    };

    let (ra, ca) = a.dim();
    let (rb, cb) = b.dim();
    if mode == ConvolutionMode::Valid {
        assert!(
            ra >= rb && ca >= cb,
            "convolve: valid mode needs lhs {}x{} to cover kernel {}x{}",
            ra,
            ca,
            rb,
            cb
        );
    }

    // Centre `a` on the padded canvas so correlating against the flipped
    // kernel lines up with convolution.
    let mut canvas = Array2::<Complex<T>>::zeros((ra + rb - 1, ca + cb - 1));
    let (oy, ox) = (rb - 1 - rb / 2, cb - 1 - cb / 2);
    canvas.slice_mut(s![oy..oy + ra, ox..ox + ca]).assign(a);
    log::trace!(
        "convolve: {}x{} by {}x{} on {:?} canvas at offset ({}, {})",
        ra,
        ca,
        rb,
        cb,
        canvas.dim(),
        oy,
        ox
    );

    let kernel = b.slice(s![..;-1, ..;-1]);
    let (canvas_re, canvas_im) = (canvas.mapv(|c| c.re), canvas.mapv(|c| c.im));
    let (kernel_re, kernel_im) = (kernel.mapv(|c| c.re), kernel.mapv(|c| c.im));

    let r1 = correlate(&canvas_re, &kernel_re);
    let r2 = correlate(&canvas_im, &kernel_im);
    let i1 = correlate(&canvas_re, &kernel_im);
    let i2 = correlate(&canvas_im, &kernel_re);

    let result = Zip::from(&r1)
        .and(&r2)
        .and(&i1)
        .and(&i2)
        .map_collect(|&r1, &r2, &i1, &i2| Complex::new(r1 - r2, i1 + i2));

    match mode {
        ConvolutionMode::Full => Matrix::Complex(result),
        ConvolutionMode::Valid => {
            Matrix::Complex(result.slice(s![rb - 1..ra, cb - 1..ca]).to_owned())
        }
    }
}

/// Same-size 2D correlation with the anchor at the kernel centre
/// `(kh / 2, kw / 2)`. Samples outside `src` count as zero.
pub fn correlate<T: Sample>(src: &Array2<T>, kernel: &Array2<T>) -> Array2<T> {
    let (rows, cols) = src.dim();
    let (ay, ax) = (kernel.nrows() / 2, kernel.ncols() / 2);
    let mut dst = Array2::zeros((rows, cols));

    // dst[y, x] += weight * src[y + u - ay, x + v - ax]
    for ((u, v), &weight) in kernel.indexed_iter() {
        let Some((dst_rows, src_rows)) = overlap(rows, u as isize - ay as isize) else {
            continue;
        };
        let Some((dst_cols, src_cols)) = overlap(cols, v as isize - ax as isize) else {
            continue;
        };
        dst.slice_mut(s![dst_rows, dst_cols])
            .scaled_add(weight, &src.slice(s![src_rows, src_cols]));
    }
    dst
}

/// Destination and source ranges along one axis of length `len` when the
/// source index is the destination index plus `offset`.
fn overlap(len: usize, offset: isize) -> Option<(Range<usize>, Range<usize>)> {
    let len = len as isize;
    let start = (-offset).max(0);
    let end = (len - offset).min(len);
    if start >= end {
        return None;
    }
    Some((
        start as usize..end as usize,
        (start + offset) as usize..(end + offset) as usize,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn c(re: f64, im: f64) -> Complex<f64> {
        Complex::new(re, im)
    }

    fn assert_close(got: &Matrix<f64>, want: &Array2<Complex<f64>>) {
        let got = got.as_complex().expect("complex result");
        assert_eq!(got.dim(), want.dim());
        for (g, w) in got.iter().zip(want.iter()) {
            assert!((g - w).norm() < 1e-9, "{} vs {}", g, w);
        }
    }

    /// Direct `Σ a[p][q] · b[y-p][x-q]` reference.
    fn direct_full(a: &Array2<Complex<f64>>, b: &Array2<Complex<f64>>) -> Array2<Complex<f64>> {
        let (ra, ca) = a.dim();
        let (rb, cb) = b.dim();
        let mut out = Array2::zeros((ra + rb - 1, ca + cb - 1));
        for ((p, q), &x) in a.indexed_iter() {
            for ((u, v), &k) in b.indexed_iter() {
                out[[p + u, q + v]] += x * k;
            }
        }
        out
    }

    #[test]
    fn unit_kernel_scales_input() {
        let m = array![[1.0, -2.0, 3.0], [0.5, 4.0, -6.0]];
        let result = convolve(
            &Matrix::Real(m.clone()),
            &Matrix::Real(array![[2.0]]),
            ConvolutionMode::Full,
        );
        assert_close(&result, &m.mapv(|v| c(2.0 * v, 0.0)));
    }

    #[test]
    fn full_mode_matches_known_real_result() {
        let a = Matrix::Real(array![[1.0, 2.0], [3.0, 4.0]]);
        let b = Matrix::Real(array![[1.0, 1.0], [1.0, 1.0]]);
        let result = convolve(&a, &b, ConvolutionMode::Full);
        let expected = array![[1.0, 3.0, 2.0], [4.0, 10.0, 6.0], [3.0, 7.0, 4.0]];
        assert_close(&result, &expected.mapv(|v| c(v, 0.0)));
    }

    #[test]
    fn complex_operands_match_direct_sum() {
        let a = Array2::from_shape_fn((4, 5), |(i, j)| c(i as f64 - 1.5, (j as f64) * 0.25));
        let b = array![
            [c(1.0, -1.0), c(0.5, 2.0), c(0.0, 1.0)],
            [c(-2.0, 0.0), c(1.0, 1.0), c(3.0, -0.5)]
        ];
        let result = convolve(
            &Matrix::Complex(a.clone()),
            &Matrix::Complex(b.clone()),
            ConvolutionMode::Full,
        );
        assert_close(&result, &direct_full(&a, &b));
    }

    #[test]
    fn valid_mode_crops_to_full_overlap() {
        let a = Array2::from_shape_fn((5, 6), |(i, j)| c((i * 6 + j) as f64, 0.0));
        let b = array![
            [c(1.0, 0.0), c(-1.0, 0.0)],
            [c(0.0, 2.0), c(1.0, 0.0)],
            [c(0.5, 0.0), c(0.0, 0.0)]
        ];
        let full = direct_full(&a, &b);
        let result = convolve(
            &Matrix::Complex(a),
            &Matrix::Complex(b),
            ConvolutionMode::Valid,
        );
        assert_eq!(result.dim(), (3, 5));
        assert_close(&result, &full.slice(s![2..5, 1..6]).to_owned());
    }

    #[test]
    fn empty_operand_yields_empty_result() {
        let a = Matrix::Real(array![[1.0f32]]);
        assert!(convolve(&a, &Matrix::empty(), ConvolutionMode::Full).is_empty());
        assert!(convolve(&Matrix::empty(), &a, ConvolutionMode::Valid).is_empty());

        let hollow = Matrix::Complex(Array2::<Complex<f32>>::zeros((0, 4)));
        assert!(convolve(&a, &hollow, ConvolutionMode::Full).is_empty());
    }

    #[test]
    #[should_panic(expected = "valid mode")]
    fn valid_mode_rejects_larger_kernel() {
        let a = Matrix::Real(array![[1.0f64, 2.0]]);
        let b = Matrix::Real(array![[1.0f64], [1.0]]);
        convolve(&a, &b, ConvolutionMode::Valid);
    }

    #[test]
    fn correlate_uses_zero_border() {
        let src = array![[1.0f64, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]];
        let box_kernel = Array2::from_elem((3, 3), 1.0);
        let result = correlate(&src, &box_kernel);
        assert_eq!(result[[0, 0]], 1.0 + 2.0 + 4.0 + 5.0);
        assert_eq!(result[[1, 1]], 45.0);
        assert_eq!(result[[2, 2]], 5.0 + 6.0 + 8.0 + 9.0);
    }

    #[test]
    fn convolution_mode_parses_lowercase() {
        let mode: ConvolutionMode = serde_json::from_str("\"valid\"").unwrap();
        assert_eq!(mode, ConvolutionMode::Valid);
        assert_eq!(ConvolutionMode::default(), ConvolutionMode::Full);
    }
}
