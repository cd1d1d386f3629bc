//! Gauss-Jordan elimination with partial pivoting

use tracing::{debug, error, info};

use crate::arithmetic::MIN_DIVISOR;
use crate::error::{Result, SolveError};
use crate::matrix::Matrix;

/// Solve `A * X = B` for a square `A` (n x n) and `B` (n x m).
///
/// The augmented matrix `[A | B]` is reduced in place: for each column the
/// row with the largest absolute entry at or below the diagonal becomes the
/// pivot row (the first such row on ties), every other row is cleared in
/// that column, and the pivot row is normalized. The last `m` columns of the
/// reduced matrix are returned.
///
/// # Errors
/// Always `MatrixError::SolverFailed`, carrying
/// - `SolveError::InvalidShape` if `A` is not square or `A` and `B` have a
///   different number of rows,
/// - `SolveError::SingularMatrix` if a pivot falls below `MIN_DIVISOR`,
/// - `SolveError::Allocation` if `[A | B]` or `X` cannot be allocated,
/// - `SolveError::RowOperation` if an elementary row operation fails.
pub fn solve(a: &Matrix, b: &Matrix) -> Result<Matrix> {
    let x = gauss_jordan(a, b).inspect_err(|err| {
        error!(target: "mtxcalc::solve", error = %err, "linear solve failed");
    })?;
    info!(
        target: "mtxcalc::solve",
        n = a.nrows(),
        m = b.ncols(),
        "linear system solved"
    );
    Ok(x)
}

/// Inverse of a square matrix, computed as `solve(a, I)`.
pub fn inverse(a: &Matrix) -> Result<Matrix> {
    if !a.is_square() {
        let err = SolveError::InvalidShape {
            message: format!(
                "cannot invert a non-square ({}, {}) matrix",
                a.nrows(),
                a.ncols()
            ),
        };
        error!(target: "mtxcalc::solve", error = %err, "matrix inversion failed");
        return Err(err.into());
    }
    let id = Matrix::identity(a.nrows()).map_err(SolveError::from)?;
    solve(a, &id)
}

fn gauss_jordan(a: &Matrix, b: &Matrix) -> std::result::Result<Matrix, SolveError> {
    if !a.is_square() {
        return Err(SolveError::InvalidShape {
            message: format!(
                "coefficient matrix must be square, got ({}, {})",
                a.nrows(),
                a.ncols()
            ),
        });
    }
    if a.nrows() != b.nrows() {
        return Err(SolveError::InvalidShape {
            message: format!(
                "coefficient matrix has {} rows but right-hand side has {}",
                a.nrows(),
                b.nrows()
            ),
        });
    }

    let n = a.nrows();
    let m = b.ncols();

    let mut aug = augment(a, b)?;

    for k in 0..n {
        let pivot_row = pivot_row(&aug, k);
        if pivot_row != k {
            aug.swap_rows(k, pivot_row)?;
        }

        let pivot = aug[[k, k]];
        if pivot.abs() < MIN_DIVISOR {
            return Err(SolveError::SingularMatrix { column: k });
        }
        debug!(target: "mtxcalc::solve", column = k, pivot_row, pivot, "pivot selected");

        for j in (0..n).filter(|&j| j != k) {
            let factor = aug[[j, k]] / aug[[k, k]];
            aug.add_row_multiple(j, k, -factor)?;
        }

        aug.divide_row(k, pivot)?;
    }

    extract_columns(&aug, n, m)
}

/// Row at or below `k` with the largest `|aug[i, k]|`; the first one wins
/// on ties.
fn pivot_row(aug: &Matrix, k: usize) -> usize {
    (k + 1..aug.nrows()).fold(k, |best, i| {
        if aug[[i, k]].abs() > aug[[best, k]].abs() {
            i
        } else {
            best
        }
    })
}

/// `[a | b]`
fn augment(a: &Matrix, b: &Matrix) -> Result<Matrix> {
    let n = a.ncols();
    Matrix::from_fn(a.nrows(), n + b.ncols(), |i, j| {
        if j < n {
            a[[i, j]]
        } else {
            b[[i, j - n]]
        }
    })
}

/// Columns `from..from + count` of `aug` as a new matrix.
fn extract_columns(
    aug: &Matrix,
    from: usize,
    count: usize,
) -> std::result::Result<Matrix, SolveError> {
    let x = Matrix::from_fn(aug.nrows(), count, |i, j| aug[[i, from + j]])?;
    Ok(x)
}
