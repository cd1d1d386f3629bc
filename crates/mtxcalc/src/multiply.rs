//! Cache-blocked matrix multiplication
//!
//! The product is computed over square tiles of side `B`. Loop order is
//! row-tile, column-tile, depth-tile, then row, column and inner index; each
//! output cell accumulates one partial dot product per depth tile. Tiles are
//! processed sequentially, so for a fixed tile size the result is
//! reproducible bit for bit.

use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::error;

use crate::error::{MatrixError, Result};
use crate::matrix::Matrix;

/// Tile side used when neither the call nor the process default overrides it
pub const DEFAULT_BLOCK_SIZE: usize = 32;

static DEFAULT_BLOCK: AtomicUsize = AtomicUsize::new(DEFAULT_BLOCK_SIZE);

/// Get the process-wide default tile side.
pub fn default_block_size() -> usize {
    DEFAULT_BLOCK.load(Ordering::Relaxed)
}

/// Set the process-wide default tile side.
///
/// # Errors
/// Returns `MatrixError::InvalidInput` if `block_size` is zero.
pub fn set_default_block_size(block_size: usize) -> Result<()> {
    validate_block_size(block_size)?;
    DEFAULT_BLOCK.store(block_size, Ordering::Relaxed);
    Ok(())
}

fn validate_block_size(block_size: usize) -> Result<usize> {
    if block_size == 0 {
        error!(target: "mtxcalc::multiply", "tile size must be positive");
        return Err(MatrixError::InvalidInput {
            message: "block size must be positive".to_string(),
        });
    }
    Ok(block_size)
}

/// Options for blocked multiplication.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MultiplyOptions {
    /// Tile side. If `None`, uses the process-wide default.
    pub block_size: Option<usize>,
}

impl MultiplyOptions {
    /// Create options with an explicit tile side.
    pub fn with_block_size(block_size: usize) -> Self {
        Self {
            block_size: Some(block_size),
        }
    }

    fn resolve(&self) -> Result<usize> {
        validate_block_size(self.block_size.unwrap_or_else(default_block_size))
    }
}

fn check_inner(left: &Matrix, right: &Matrix) -> Result<()> {
    if left.ncols() != right.nrows() {
        error!(
            target: "mtxcalc::multiply",
            left = ?left.shape(),
            right = ?right.shape(),
            "inner dimensions differ"
        );
        return Err(MatrixError::mismatch("matmul", left.shape(), right.shape()));
    }
    Ok(())
}

/// Tiled product kernel. `dest` must already have shape
/// `(left.nrows(), right.ncols())`; its contents are overwritten.
fn blocked_product(dest: &mut Matrix, left: &Matrix, right: &Matrix, block: usize) {
    let m = left.nrows();
    let inner = left.ncols();
    let n = right.ncols();
    dest.set_zero();

    for ii in (0..m).step_by(block) {
        let i_end = (ii + block).min(m);
        for jj in (0..n).step_by(block) {
            let j_end = (jj + block).min(n);
            for kk in (0..inner).step_by(block) {
                let k_end = (kk + block).min(inner);
                for i in ii..i_end {
                    let left_row = &left.row_slice(i)[kk..k_end];
                    for j in jj..j_end {
                        let mut sum = 0.0;
                        for (k, a) in (kk..k_end).zip(left_row) {
                            sum += a * right[[k, j]];
                        }
                        dest[[i, j]] += sum;
                    }
                }
            }
        }
    }
}

/// Matrix product `left * right` with the default tile size.
pub fn matmul(left: &Matrix, right: &Matrix) -> Result<Matrix> {
    matmul_with(left, right, &MultiplyOptions::default())
}

/// Matrix product `left * right`.
///
/// # Errors
/// `DimensionMismatch` unless `left.ncols() == right.nrows()`; nothing is
/// allocated in that case. `InvalidInput` for a zero tile size.
pub fn matmul_with(left: &Matrix, right: &Matrix, options: &MultiplyOptions) -> Result<Matrix> {
    check_inner(left, right)?;
    let block = options.resolve()?;
    let mut dest = Matrix::zeros(left.nrows(), right.ncols())?;
    blocked_product(&mut dest, left, right, block);
    Ok(dest)
}

/// Store `left * right` into a pre-sized `dest`.
///
/// `dest` must have shape `(left.nrows(), right.ncols())`.
pub fn matmul_into(dest: &mut Matrix, left: &Matrix, right: &Matrix) -> Result<()> {
    check_inner(left, right)?;
    let expected = (left.nrows(), right.ncols());
    if dest.shape() != expected {
        error!(
            target: "mtxcalc::multiply",
            dest = ?dest.shape(),
            expected = ?expected,
            "destination has the wrong shape"
        );
        return Err(MatrixError::mismatch("matmul_into", dest.shape(), expected));
    }
    let block = MultiplyOptions::default().resolve()?;
    blocked_product(dest, left, right, block);
    Ok(())
}

/// Unblocked triple loop, the reference the tiled kernel is checked against.
pub fn matmul_naive(left: &Matrix, right: &Matrix) -> Result<Matrix> {
    check_inner(left, right)?;
    let mut dest = Matrix::zeros(left.nrows(), right.ncols())?;
    for i in 0..left.nrows() {
        for j in 0..right.ncols() {
            let mut sum = 0.0;
            for k in 0..left.ncols() {
                sum += left[[i, k]] * right[[k, j]];
            }
            dest[[i, j]] = sum;
        }
    }
    Ok(dest)
}

impl Matrix {
    /// `self = self * rhs`, computed in a temporary that `self` then adopts.
    ///
    /// The shape of `self` becomes `(self.nrows(), rhs.ncols())`.
    pub fn mul_assign(&mut self, rhs: &Matrix) -> Result<()> {
        self.mul_assign_with(rhs, &MultiplyOptions::default())
    }

    /// [`Matrix::mul_assign`] with explicit options.
    pub fn mul_assign_with(&mut self, rhs: &Matrix, options: &MultiplyOptions) -> Result<()> {
        let product = matmul_with(self, rhs, options)?;
        self.adopt(product);
        Ok(())
    }

    /// `self = lhs * self`
    pub fn premul_assign(&mut self, lhs: &Matrix) -> Result<()> {
        let product = matmul(lhs, self)?;
        self.adopt(product);
        Ok(())
    }

    /// `self = self * self`; the matrix must be square.
    pub fn square_in_place(&mut self) -> Result<()> {
        let product = matmul(self, self)?;
        self.adopt(product);
        Ok(())
    }
}
