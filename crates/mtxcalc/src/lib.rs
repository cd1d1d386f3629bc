//! Dense real-matrix computation library
//!
//! This crate provides a row-major `f64` [`Matrix`] and the numerical
//! routines built on it:
//! - [`matmul`]: cache-blocked matrix multiplication
//! - [`solve`]: Gauss-Jordan elimination with partial pivoting
//! - [`expm`]: Taylor-series matrix exponential
//! - [`verify_solution`]: residual `||A X - B||_inf` of a computed solution
//!
//! Failures are reported as [`MatrixError`] values. Diagnostics are emitted
//! through `tracing` under the `mtxcalc` target; install a subscriber to
//! collect them.
//!
//! # Example
//!
//! ```
//! use mtxcalc::{solve, verify_solution, Matrix};
//!
//! let a = Matrix::from_rows(&[
//!     [2.0, 4.0, 6.0],
//!     [1.0, 8.0, 12.0],
//!     [4.0, 6.0, 10.0],
//! ])?;
//! let b = Matrix::from_rows(&[[8.0], [4.0], [2.0]])?;
//!
//! let x = solve(&a, &b)?;
//! assert!((x.get(1, 0)? - 21.0).abs() < 1e-9);
//! assert!(verify_solution(&a, &x, &b)? < 1e-9);
//! # Ok::<(), mtxcalc::MatrixError>(())
//! ```

pub mod arithmetic;
pub mod error;
pub mod expm;
pub mod matrix;
pub mod multiply;
pub mod residual;
pub mod rowops;
pub mod solve;

// Re-export main types
pub use arithmetic::MIN_DIVISOR;
pub use error::{MatrixError, Result, SolveError};
pub use expm::{expm, expm_with, ExpOptions};
pub use matrix::Matrix;
pub use multiply::{
    default_block_size, matmul, matmul_into, matmul_naive, matmul_with, set_default_block_size,
    MultiplyOptions, DEFAULT_BLOCK_SIZE,
};
pub use residual::verify_solution;
pub use solve::{inverse, solve};
