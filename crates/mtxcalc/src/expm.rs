//! Matrix exponential by Taylor series

use tracing::{error, info};

use crate::arithmetic::MIN_DIVISOR;
use crate::error::{MatrixError, Result};
use crate::matrix::Matrix;
use crate::multiply::MultiplyOptions;

/// Options for [`expm_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpOptions {
    /// Maximum number of series terms added after the identity
    pub max_terms: usize,
    /// Options for the power updates `P = P * A`
    pub multiply: MultiplyOptions,
}

impl Default for ExpOptions {
    fn default() -> Self {
        Self {
            max_terms: 1000,
            multiply: MultiplyOptions::default(),
        }
    }
}

/// `e^A` with default options.
pub fn expm(a: &Matrix, eps: f64) -> Result<Matrix> {
    expm_with(a, eps, &ExpOptions::default())
}

/// Approximate `e^A = sum_k A^k / k!`.
///
/// Starting from `R = I`, the term `T_k = A^k / k!` is added while
/// `||T_k||_inf >= eps`; the first term whose norm is below `eps` ends the
/// series and is not added.
///
/// # Errors
/// - `InvalidEpsilon` unless `eps > MIN_DIVISOR`
/// - `InvalidInput` if `a` is not square or has non-finite entries
/// - `NotConverged` if a term norm becomes non-finite or more than
///   `options.max_terms` terms would be needed
pub fn expm_with(a: &Matrix, eps: f64, options: &ExpOptions) -> Result<Matrix> {
    if eps.is_nan() || eps <= MIN_DIVISOR {
        error!(target: "mtxcalc::expm", eps, "epsilon must exceed the near-zero threshold");
        return Err(MatrixError::InvalidEpsilon { eps });
    }
    if !a.is_square() || !a.is_finite() {
        error!(target: "mtxcalc::expm", shape = ?a.shape(), "invalid source matrix");
        return Err(MatrixError::InvalidInput {
            message: format!(
                "exponential needs a square finite matrix, got ({}, {})",
                a.nrows(),
                a.ncols()
            ),
        });
    }

    let mut result = Matrix::identity(a.nrows())?;
    let mut power = a.try_copy()?;
    let mut term = a.try_copy()?;
    let mut factorial = 1.0;
    let mut k = 1usize;

    loop {
        let norm = term.norm_inf();
        if !norm.is_finite() {
            error!(target: "mtxcalc::expm", terms = k - 1, "series term overflowed");
            return Err(MatrixError::NotConverged { terms: k - 1, norm });
        }
        if norm < eps {
            info!(
                target: "mtxcalc::expm",
                terms = k - 1,
                last_norm = norm,
                eps,
                "matrix exponential converged"
            );
            break;
        }
        if k > options.max_terms {
            error!(target: "mtxcalc::expm", terms = options.max_terms, norm, "term limit reached");
            return Err(MatrixError::NotConverged {
                terms: options.max_terms,
                norm,
            });
        }

        result.add_in_place(&term)?;

        k += 1;
        factorial *= k as f64;
        power.mul_assign_with(a, &options.multiply)?;
        term.assign(&power)?;
        term.divide_in_place(factorial)?;
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_expm_of_zero_is_identity() {
        let zero = Matrix::zeros(3, 3).unwrap();
        let r = expm(&zero, 1e-12).unwrap();
        assert_eq!(r, Matrix::identity(3).unwrap());
    }

    #[test]
    fn test_expm_scalar() {
        let a = Matrix::from_rows(&[[1.0]]).unwrap();
        let r = expm(&a, 1e-18).unwrap();
        assert_relative_eq!(r[[0, 0]], std::f64::consts::E, max_relative = 1e-14);
    }

    #[test]
    fn test_expm_nilpotent() {
        let a = Matrix::from_rows(&[[0.0, 1.0], [0.0, 0.0]]).unwrap();
        let r = expm(&a, 1e-10).unwrap();
        assert_eq!(r, Matrix::from_rows(&[[1.0, 1.0], [0.0, 1.0]]).unwrap());
    }

    #[test]
    fn test_invalid_epsilon() {
        let a = Matrix::identity(2).unwrap();
        for eps in [0.0, 1e-20, -1.0, 1e-30, f64::NAN] {
            assert!(matches!(
                expm(&a, eps),
                Err(MatrixError::InvalidEpsilon { .. })
            ));
        }
        assert!(expm(&a, 1e-19).is_ok());
    }

    #[test]
    fn test_invalid_input() {
        let rect = Matrix::zeros(2, 3).unwrap();
        assert!(matches!(
            expm(&rect, 1e-10),
            Err(MatrixError::InvalidInput { .. })
        ));

        let mut nan = Matrix::zeros(2, 2).unwrap();
        nan[[0, 1]] = f64::NAN;
        assert!(matches!(
            expm(&nan, 1e-10),
            Err(MatrixError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_overflowing_series_is_not_converged() {
        // M^2 = 20000 I, so the powers overflow long before the terms shrink
        // and the off-diagonal entries of M^144 become inf - inf.
        let a = Matrix::from_rows(&[[100.0, 100.0], [100.0, -100.0]]).unwrap();
        match expm(&a, 1e-10) {
            Err(MatrixError::NotConverged { norm, .. }) => assert!(!norm.is_finite()),
            other => panic!("expected NotConverged, got {other:?}"),
        }
    }

    #[test]
    fn test_term_limit() {
        let a = Matrix::filled(2, 2, 3.0).unwrap();
        let opts = ExpOptions {
            max_terms: 3,
            ..Default::default()
        };
        assert!(matches!(
            expm_with(&a, 1e-12, &opts),
            Err(MatrixError::NotConverged { terms: 3, .. })
        ));
    }
}
