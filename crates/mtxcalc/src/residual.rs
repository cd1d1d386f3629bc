//! Residual check for linear solves

use tracing::{error, info, warn};

use crate::error::{MatrixError, Result};
use crate::matrix::Matrix;
use crate::multiply::matmul;

/// Infinity norm of `A * X - B`.
///
/// Shapes must satisfy `A.ncols == X.nrows`, `X.ncols == B.ncols` and
/// `A.nrows == B.nrows`; otherwise `InvalidShape` is returned. A NaN entry
/// in the product or in `B` yields a NaN residual, which fails every
/// tolerance comparison.
pub fn verify_solution(a: &Matrix, x: &Matrix, b: &Matrix) -> Result<f64> {
    if a.ncols() != x.nrows() || x.ncols() != b.ncols() || a.nrows() != b.nrows() {
        error!(
            target: "mtxcalc::residual",
            a = ?a.shape(),
            x = ?x.shape(),
            b = ?b.shape(),
            "invalid dimensions in solution verification"
        );
        return Err(MatrixError::InvalidShape {
            message: format!(
                "cannot form A*X - B with A {:?}, X {:?}, B {:?}",
                a.shape(),
                x.shape(),
                b.shape()
            ),
        });
    }

    let mut ax = matmul(a, x)?;
    ax.sub_in_place(b)?;
    let residual = ax.norm_inf();
    if !residual.is_finite() {
        warn!(target: "mtxcalc::residual", residual, "non-finite residual");
    }
    info!(target: "mtxcalc::residual", residual, "solution verified");
    Ok(residual)
}
