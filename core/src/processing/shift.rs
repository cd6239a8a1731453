//! Quadrant swap and half-grid circular shift.

use ndarray::{s, Array2};
use serde::{Deserialize, Serialize};

use crate::matrix::Matrix;
use crate::prelude::Sample;

/// Swaps the diagonal quadrants of a copy of `m` (top-left with bottom-right,
/// top-right with bottom-left).
///
/// Quadrants are `rows / 2 × cols / 2`; on odd dimensions the trailing row
/// or column stays where it is.
pub fn quadrant_swap<T: Sample>(m: &Matrix<T>) -> Matrix<T> {
    match m {
        Matrix::Real(data) => Matrix::Real(swap_quadrants(data)),
        Matrix::Complex(data) => Matrix::Complex(swap_quadrants(data)),
    }
}

fn swap_quadrants<E: Clone>(data: &Array2<E>) -> Array2<E> {
    let mut out = data.clone();
    let (cy, cx) = (data.nrows() / 2, data.ncols() / 2);

    let top_left = s![0..cy, 0..cx];
    let top_right = s![0..cy, cx..2 * cx];
    let bottom_left = s![cy..2 * cy, 0..cx];
    let bottom_right = s![cy..2 * cy, cx..2 * cx];

    out.slice_mut(&top_left).assign(&data.slice(&bottom_right));
    out.slice_mut(&bottom_right).assign(&data.slice(&top_left));
    out.slice_mut(&top_right).assign(&data.slice(&bottom_left));
    out.slice_mut(&bottom_left).assign(&data.slice(&top_right));
    out
}

/// Moves sample `(i, j)` to `((i + h/2) mod h, (j + w/2) mod w)` on the
/// enabled axes. With `reverse` the shift amounts become `h - h/2` and
/// `w - w/2`, which undoes the forward shift for odd sizes as well.
///
/// Empty input is returned unchanged.
pub fn circular_shift<T: Sample>(
    m: &Matrix<T>,
    row_shift: bool,
    col_shift: bool,
    reverse: bool,
) -> Matrix<T> {
    if m.is_empty() {
        return m.clone();
    }
    match m {
        Matrix::Real(data) => Matrix::Real(shift_grid(data, row_shift, col_shift, reverse)),
        Matrix::Complex(data) => {
            Matrix::Complex(shift_grid(data, row_shift, col_shift, reverse))
        }
    }
}

fn shift_grid<E: Clone>(
    data: &Array2<E>,
    row_shift: bool,
    col_shift: bool,
    reverse: bool,
) -> Array2<E> {
    let (h, w) = data.dim();
    let rshift = if reverse { h - h / 2 } else { h / 2 };
    let cshift = if reverse { w - w / 2 } else { w / 2 };

    let mut out = data.clone();
    for ((i, j), value) in data.indexed_iter() {
        let ii = if row_shift { (i + rshift) % h } else { i };
        let jj = if col_shift { (j + cshift) % w } else { j };
        out[[ii, jj]] = value.clone();
    }
    out
}

/// Serializable form of the `circular_shift` flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ShiftConfig {
    pub row_shift: bool,
    pub col_shift: bool,
    pub reverse: bool,
}

impl ShiftConfig {
    /// Both axes, forward: moves the zero-frequency term to the centre.
    pub fn centered() -> Self {
        Self {
            row_shift: true,
            col_shift: true,
            reverse: false,
        }
    }

    /// Same axes, opposite direction.
    pub fn inverse(self) -> Self {
        Self {
            reverse: !self.reverse,
            ..self
        }
    }

    pub fn apply<T: Sample>(&self, m: &Matrix<T>) -> Matrix<T> {
        circular_shift(m, self.row_shift, self.col_shift, self.reverse)
    }
}
