//! Dense row-major matrix storage

use std::fmt;
use std::ops::{Index, IndexMut};

use tracing::error;

use crate::error::{MatrixError, Result};

/// Dense matrix of `f64` stored in row-major order
///
/// Element `(i, j)` lives at `data[i * ncols + j]`. Both dimensions are
/// at least one for the lifetime of the value.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    data: Vec<f64>,
    nrows: usize,
    ncols: usize,
}

/// Reserve a zero-filled buffer for a `(nrows, ncols)` matrix.
fn alloc_buffer(nrows: usize, ncols: usize) -> Result<Vec<f64>> {
    if nrows == 0 || ncols == 0 {
        error!(target: "mtxcalc::matrix", nrows, ncols, "zero-sized matrix requested");
        return Err(MatrixError::InvalidShape {
            message: format!("matrix dimensions must be positive, got ({nrows}, {ncols})"),
        });
    }
    let failure = || {
        error!(target: "mtxcalc::matrix", nrows, ncols, "matrix allocation failed");
        MatrixError::AllocationFailure {
            rows: nrows,
            cols: ncols,
        }
    };
    let len = nrows.checked_mul(ncols).ok_or_else(failure)?;
    let mut data = Vec::new();
    data.try_reserve_exact(len).map_err(|_| failure())?;
    data.resize(len, 0.0);
    Ok(data)
}

impl Matrix {
    /// Create a zero-filled matrix
    pub fn zeros(nrows: usize, ncols: usize) -> Result<Self> {
        Ok(Self {
            data: alloc_buffer(nrows, ncols)?,
            nrows,
            ncols,
        })
    }

    /// Create a matrix with every element set to `value`
    pub fn filled(nrows: usize, ncols: usize, value: f64) -> Result<Self> {
        let mut m = Self::zeros(nrows, ncols)?;
        m.fill(value);
        Ok(m)
    }

    /// Create an `n x n` identity matrix
    pub fn identity(n: usize) -> Result<Self> {
        let mut m = Self::zeros(n, n)?;
        for i in 0..n {
            m[[i, i]] = 1.0;
        }
        Ok(m)
    }

    /// Create a matrix from row-major data
    pub fn from_vec(nrows: usize, ncols: usize, data: Vec<f64>) -> Result<Self> {
        if nrows == 0 || ncols == 0 || nrows.checked_mul(ncols) != Some(data.len()) {
            error!(
                target: "mtxcalc::matrix",
                nrows,
                ncols,
                len = data.len(),
                "data length does not match dimensions"
            );
            return Err(MatrixError::InvalidShape {
                message: format!(
                    "cannot build a ({nrows}, {ncols}) matrix from {} elements",
                    data.len()
                ),
            });
        }
        Ok(Self { data, nrows, ncols })
    }

    /// Create a matrix from a list of rows
    ///
    /// All rows must have the same, non-zero length.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self> {
        let nrows = rows.len();
        let ncols = rows.first().map_or(0, |r| r.as_ref().len());
        if let Some(bad) = rows.iter().position(|r| r.as_ref().len() != ncols) {
            error!(target: "mtxcalc::matrix", row = bad, "ragged rows");
            return Err(MatrixError::InvalidShape {
                message: format!(
                    "row {bad} has length {}, expected {ncols}",
                    rows[bad].as_ref().len()
                ),
            });
        }
        let mut m = Self::zeros(nrows, ncols)?;
        for (i, row) in rows.iter().enumerate() {
            m.row_slice_mut(i).copy_from_slice(row.as_ref());
        }
        Ok(m)
    }

    /// Create a matrix whose element `(i, j)` is `f(i, j)`
    pub fn from_fn<F>(nrows: usize, ncols: usize, mut f: F) -> Result<Self>
    where
        F: FnMut(usize, usize) -> f64,
    {
        let mut m = Self::zeros(nrows, ncols)?;
        for i in 0..nrows {
            for j in 0..ncols {
                m[[i, j]] = f(i, j);
            }
        }
        Ok(m)
    }

    /// Deep copy that reports allocation failure instead of aborting
    pub fn try_copy(&self) -> Result<Self> {
        let mut m = Self::zeros(self.nrows, self.ncols)?;
        m.data.copy_from_slice(&self.data);
        Ok(m)
    }

    /// Number of rows (height)
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    /// Number of columns (width)
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// `(nrows, ncols)`
    pub fn shape(&self) -> (usize, usize) {
        (self.nrows, self.ncols)
    }

    pub fn is_square(&self) -> bool {
        self.nrows == self.ncols
    }

    /// Whether every element is finite
    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|x| x.is_finite())
    }

    /// Row-major view of the elements
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    pub(crate) fn check_row(&self, i: usize) -> Result<()> {
        if i >= self.nrows {
            error!(target: "mtxcalc::matrix", index = i, nrows = self.nrows, "row index out of range");
            return Err(MatrixError::InvalidIndex {
                axis: "row",
                index: i,
                len: self.nrows,
            });
        }
        Ok(())
    }

    pub(crate) fn check_col(&self, j: usize) -> Result<()> {
        if j >= self.ncols {
            error!(target: "mtxcalc::matrix", index = j, ncols = self.ncols, "column index out of range");
            return Err(MatrixError::InvalidIndex {
                axis: "column",
                index: j,
                len: self.ncols,
            });
        }
        Ok(())
    }

    /// Get element `(i, j)`
    pub fn get(&self, i: usize, j: usize) -> Result<f64> {
        self.check_row(i)?;
        self.check_col(j)?;
        Ok(self[[i, j]])
    }

    /// Set element `(i, j)`
    pub fn set(&mut self, i: usize, j: usize, value: f64) -> Result<()> {
        self.check_row(i)?;
        self.check_col(j)?;
        self[[i, j]] = value;
        Ok(())
    }

    /// Get a row as a slice
    pub fn row(&self, i: usize) -> Result<&[f64]> {
        self.check_row(i)?;
        Ok(self.row_slice(i))
    }

    /// Get a column as a vector
    pub fn col(&self, j: usize) -> Result<Vec<f64>> {
        self.check_col(j)?;
        Ok((0..self.nrows).map(|i| self[[i, j]]).collect())
    }

    pub(crate) fn row_slice(&self, i: usize) -> &[f64] {
        &self.data[i * self.ncols..(i + 1) * self.ncols]
    }

    pub(crate) fn row_slice_mut(&mut self, i: usize) -> &mut [f64] {
        &mut self.data[i * self.ncols..(i + 1) * self.ncols]
    }

    /// Overwrite this matrix with the contents of a conformant `src`
    pub fn assign(&mut self, src: &Matrix) -> Result<()> {
        if self.shape() != src.shape() {
            error!(
                target: "mtxcalc::matrix",
                dst = ?self.shape(),
                src = ?src.shape(),
                "assignment between non-conformant matrices"
            );
            return Err(MatrixError::mismatch("assign", self.shape(), src.shape()));
        }
        self.data.copy_from_slice(&src.data);
        Ok(())
    }

    /// Replace shape and storage with those of `other`
    pub(crate) fn adopt(&mut self, other: Matrix) {
        *self = other;
    }

    /// Set every element to `value`
    pub fn fill(&mut self, value: f64) {
        self.data.fill(value);
    }

    pub fn set_zero(&mut self) {
        self.fill(0.0);
    }

    /// Overwrite with the identity; the matrix must be square
    pub fn set_identity(&mut self) -> Result<()> {
        if !self.is_square() {
            error!(target: "mtxcalc::matrix", shape = ?self.shape(), "identity of non-square matrix");
            return Err(MatrixError::InvalidShape {
                message: format!(
                    "identity requires a square matrix, got ({}, {})",
                    self.nrows, self.ncols
                ),
            });
        }
        self.set_zero();
        for i in 0..self.nrows {
            self[[i, i]] = 1.0;
        }
        Ok(())
    }

    /// Transposed copy
    pub fn transpose(&self) -> Matrix {
        let mut data = Vec::with_capacity(self.data.len());
        for j in 0..self.ncols {
            data.extend((0..self.nrows).map(|i| self[[i, j]]));
        }
        Matrix {
            data,
            nrows: self.ncols,
            ncols: self.nrows,
        }
    }

    /// Transpose a square matrix without allocating
    pub fn transpose_in_place(&mut self) -> Result<()> {
        if !self.is_square() {
            error!(target: "mtxcalc::matrix", shape = ?self.shape(), "in-place transpose of non-square matrix");
            return Err(MatrixError::InvalidShape {
                message: format!(
                    "in-place transpose requires a square matrix, got ({}, {})",
                    self.nrows, self.ncols
                ),
            });
        }
        let n = self.nrows;
        for i in 0..n {
            for j in (i + 1)..n {
                self.data.swap(i * n + j, j * n + i);
            }
        }
        Ok(())
    }

    /// Infinity norm: largest absolute row sum.
    ///
    /// A NaN row sum makes the norm NaN.
    pub fn norm_inf(&self) -> f64 {
        self.data
            .chunks_exact(self.ncols)
            .map(|row| row.iter().map(|x| x.abs()).sum::<f64>())
            .fold(0.0, |acc, s| if s.is_nan() || s > acc { s } else { acc })
    }
}

impl Index<[usize; 2]> for Matrix {
    type Output = f64;

    fn index(&self, idx: [usize; 2]) -> &Self::Output {
        debug_assert!(idx[0] < self.nrows && idx[1] < self.ncols);
        &self.data[idx[0] * self.ncols + idx[1]]
    }
}

impl IndexMut<[usize; 2]> for Matrix {
    fn index_mut(&mut self, idx: [usize; 2]) -> &mut Self::Output {
        debug_assert!(idx[0] < self.nrows && idx[1] < self.ncols);
        &mut self.data[idx[0] * self.ncols + idx[1]]
    }
}

/// Prints a `Matrix HxW:` header and one line per row.
///
/// The formatter precision selects the number of decimals (default 2).
impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let precision = f.precision().unwrap_or(2);
        writeln!(f, "Matrix {}x{}:", self.nrows, self.ncols)?;
        for row in self.data.chunks_exact(self.ncols) {
            let line: Vec<String> = row.iter().map(|x| format!("{x:.precision$}")).collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}
