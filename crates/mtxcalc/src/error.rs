//! Error types for mtxcalc

use thiserror::Error;

use crate::arithmetic::MIN_DIVISOR;

/// Errors that can occur during matrix operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MatrixError {
    /// Row or column index out of range
    #[error("Index out of bounds: {axis} {index} is out of bounds for length {len}")]
    InvalidIndex {
        axis: &'static str,
        index: usize,
        len: usize,
    },

    /// Operand shapes are not compatible for the operation
    #[error("Dimension mismatch in {op}: ({left_rows}, {left_cols}) vs ({right_rows}, {right_cols})")]
    DimensionMismatch {
        op: &'static str,
        left_rows: usize,
        left_cols: usize,
        right_rows: usize,
        right_cols: usize,
    },

    /// Shape is not valid for the operation (zero dimension, not square, ...)
    #[error("Invalid shape: {message}")]
    InvalidShape { message: String },

    /// Divisor below the near-zero threshold
    #[error("Division by zero: |{divisor:e}| is below {min:e}", min = MIN_DIVISOR)]
    DivisionByZero { divisor: f64 },

    /// Convergence threshold is not usable
    #[error("Invalid epsilon {eps:e}: must be greater than {min:e}", min = MIN_DIVISOR)]
    InvalidEpsilon { eps: f64 },

    /// Invalid argument
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// Buffer for a matrix could not be reserved
    #[error("Allocation failure: cannot allocate a ({rows}, {cols}) matrix")]
    AllocationFailure { rows: usize, cols: usize },

    /// Linear solve aborted
    #[error("Solver failed: {0}")]
    SolverFailed(#[from] SolveError),

    /// Series did not reach the requested tolerance
    #[error("Series did not converge after {terms} terms (last term norm {norm:e})")]
    NotConverged { terms: usize, norm: f64 },
}

/// Reason a linear solve was aborted
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolveError {
    /// Coefficient or right-hand side has the wrong shape
    #[error("invalid shape: {message}")]
    InvalidShape { message: String },

    /// No usable pivot in the given column
    #[error("singular matrix: pivot in column {column} is below {min:e}", min = MIN_DIVISOR)]
    SingularMatrix { column: usize },

    /// Buffer for the augmented matrix or the solution could not be reserved
    #[error("allocation failure: cannot allocate a ({rows}, {cols}) matrix")]
    Allocation { rows: usize, cols: usize },

    /// An elementary row operation failed during elimination
    #[error("row operation failed: {0}")]
    RowOperation(#[source] Box<MatrixError>),
}

impl MatrixError {
    pub(crate) fn mismatch(
        op: &'static str,
        left: (usize, usize),
        right: (usize, usize),
    ) -> Self {
        MatrixError::DimensionMismatch {
            op,
            left_rows: left.0,
            left_cols: left.1,
            right_rows: right.0,
            right_cols: right.1,
        }
    }

    /// Whether this error is a solver failure caused by a singular matrix
    pub fn is_singular(&self) -> bool {
        matches!(
            self,
            MatrixError::SolverFailed(SolveError::SingularMatrix { .. })
        )
    }
}

impl From<MatrixError> for SolveError {
    fn from(err: MatrixError) -> Self {
        match err {
            MatrixError::AllocationFailure { rows, cols } => SolveError::Allocation { rows, cols },
            other => SolveError::RowOperation(Box::new(other)),
        }
    }
}

/// Result type for matrix operations
pub type Result<T> = std::result::Result<T, MatrixError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = MatrixError::InvalidIndex {
            axis: "row",
            index: 5,
            len: 3,
        };
        assert_eq!(
            err.to_string(),
            "Index out of bounds: row 5 is out of bounds for length 3"
        );

        let err = MatrixError::mismatch("matmul", (2, 3), (2, 3));
        assert_eq!(
            err.to_string(),
            "Dimension mismatch in matmul: (2, 3) vs (2, 3)"
        );
    }

    #[test]
    fn test_solver_failure_wraps_reason() {
        let err: MatrixError = SolveError::SingularMatrix { column: 1 }.into();
        assert!(err.is_singular());
        assert!(err.to_string().starts_with("Solver failed: singular matrix"));

        let inner = MatrixError::DivisionByZero { divisor: 0.0 };
        let err: MatrixError = SolveError::from(inner.clone()).into();
        assert!(!err.is_singular());
        match err {
            MatrixError::SolverFailed(SolveError::RowOperation(source)) => {
                assert_eq!(*source, inner)
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_allocation_failure_is_not_a_row_operation() {
        let err = SolveError::from(MatrixError::AllocationFailure { rows: 4, cols: 9 });
        assert_eq!(err, SolveError::Allocation { rows: 4, cols: 9 });

        let err: MatrixError = err.into();
        assert_eq!(
            err.to_string(),
            "Solver failed: allocation failure: cannot allocate a (4, 9) matrix"
        );
    }
}
