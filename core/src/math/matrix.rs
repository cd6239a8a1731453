use crate::matrix::Matrix;
use crate::prelude::Sample;

/// Dense complex product `result[i][j] = Σ_k a[i][k] · b[k][j]`.
///
/// If either operand is empty `a` is returned unchanged. Both operands must
/// be two-channel and `a.cols()` must equal `b.rows()`.
pub fn matrix_multiply<T: Sample>(a: &Matrix<T>, b: &Matrix<T>) -> Matrix<T> {
    if a.is_empty() || b.is_empty() {
        log::debug!("matrix_multiply: empty operand, returning lhs");
        return a.clone();
    }
    let (Some(lhs), Some(rhs)) = (a.as_complex(), b.as_complex()) else {
        panic!("matrix_multiply: both operands must be two-channel matrices");
    };
    assert_eq!(
        lhs.ncols(),
        rhs.nrows(),
        "matrix_multiply: unmatched size"
    );

    Matrix::Complex(lhs.dot(rhs))
}
