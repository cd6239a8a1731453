//! Elementwise complex arithmetic.
//!
//! `multiply` promotes single-channel operands while `divide` requires both
//! operands to be complex already. The asymmetry is long-standing behaviour
//! that callers depend on, so it is kept as-is rather than unified.

use ndarray::Zip;
use num_complex::Complex;
use rustfft::num_traits::Float;

use crate::matrix::Matrix;
use crate::prelude::Sample;

/// Elementwise `(a0 + i·a1)(b0 + i·b1)`. Single-channel operands are promoted.
pub fn multiply<T: Sample>(a: &Matrix<T>, b: &Matrix<T>) -> Matrix<T> {
    assert_eq!(
        a.dim(),
        b.dim(),
        "multiply: operands must share rows x cols"
    );
    let lhs = a.complex_samples();
    let rhs = b.complex_samples();

    let product = Zip::from(&*lhs)
        .and(&*rhs)
        .map_collect(|&x, &y| {
            Complex::new(x.re * y.re - x.im * y.im, x.re * y.im + x.im * y.re)
        });
    Matrix::Complex(product)
}

/// Elementwise quotient through the conjugate denominator.
///
/// Both operands must be two-channel. A zero-magnitude divisor sample yields
/// infinities or NaNs in the corresponding output sample.
pub fn divide<T: Sample>(a: &Matrix<T>, b: &Matrix<T>) -> Matrix<T> {
    let (Some(lhs), Some(rhs)) = (a.as_complex(), b.as_complex()) else {
        panic!("divide: both operands must be two-channel matrices");
    };
    assert_eq!(
        lhs.dim(),
        rhs.dim(),
        "divide: operands must share rows x cols"
    );

    let quotient = Zip::from(lhs).and(rhs).map_collect(|&x, &y| {
        let divisor = Float::recip(y.re * y.re + y.im * y.im);
        Complex::new(
            (x.re * y.re + x.im * y.im) * divisor,
            (x.im * y.re - x.re * y.im) * divisor,
        )
    });
    Matrix::Complex(quotient)
}
