//! Elementary row and column transforms
//!
//! Every operation validates its indices (and divisor) before touching the
//! buffer, so a failed call leaves the matrix exactly as it was. None of them
//! allocate.

use tracing::error;

use crate::arithmetic::check_divisor;
use crate::error::Result;
use crate::matrix::Matrix;

impl Matrix {
    /// Swap rows `r1` and `r2`
    pub fn swap_rows(&mut self, r1: usize, r2: usize) -> Result<()> {
        self.check_row(r1)?;
        self.check_row(r2)?;
        if r1 == r2 {
            return Ok(());
        }
        let ncols = self.ncols();
        let (lo, hi) = (r1.min(r2), r1.max(r2));
        let (head, tail) = self.as_mut_slice().split_at_mut(hi * ncols);
        head[lo * ncols..(lo + 1) * ncols].swap_with_slice(&mut tail[..ncols]);
        Ok(())
    }

    /// Swap columns `c1` and `c2`
    pub fn swap_cols(&mut self, c1: usize, c2: usize) -> Result<()> {
        self.check_col(c1)?;
        self.check_col(c2)?;
        if c1 == c2 {
            return Ok(());
        }
        let ncols = self.ncols();
        for row in self.as_mut_slice().chunks_exact_mut(ncols) {
            row.swap(c1, c2);
        }
        Ok(())
    }

    /// Multiply row `r` by `factor`
    pub fn scale_row(&mut self, r: usize, factor: f64) -> Result<()> {
        self.check_row(r)?;
        for x in self.row_slice_mut(r) {
            *x *= factor;
        }
        Ok(())
    }

    /// Divide row `r` by `divisor`
    ///
    /// Fails with `DivisionByZero` when `|divisor| < MIN_DIVISOR`; the row is
    /// not modified in that case.
    pub fn divide_row(&mut self, r: usize, divisor: f64) -> Result<()> {
        self.check_row(r)?;
        check_divisor(divisor).inspect_err(|_| {
            error!(target: "mtxcalc::rowops", row = r, "row division skipped");
        })?;
        for x in self.row_slice_mut(r) {
            *x /= divisor;
        }
        Ok(())
    }

    /// Multiply column `c` by `factor`
    pub fn scale_col(&mut self, c: usize, factor: f64) -> Result<()> {
        self.check_col(c)?;
        let ncols = self.ncols();
        for row in self.as_mut_slice().chunks_exact_mut(ncols) {
            row[c] *= factor;
        }
        Ok(())
    }

    /// Divide column `c` by `divisor`, with the same near-zero rule as
    /// [`Matrix::divide_row`]
    pub fn divide_col(&mut self, c: usize, divisor: f64) -> Result<()> {
        self.check_col(c)?;
        check_divisor(divisor).inspect_err(|_| {
            error!(target: "mtxcalc::rowops", col = c, "column division skipped");
        })?;
        let ncols = self.ncols();
        for row in self.as_mut_slice().chunks_exact_mut(ncols) {
            row[c] /= divisor;
        }
        Ok(())
    }

    /// `row[target] += row[source] * factor`
    pub fn add_row_multiple(&mut self, target: usize, source: usize, factor: f64) -> Result<()> {
        self.check_row(target)?;
        self.check_row(source)?;
        let ncols = self.ncols();
        if target == source {
            for x in self.row_slice_mut(target) {
                *x += *x * factor;
            }
            return Ok(());
        }
        let data = self.as_mut_slice();
        let (dst, src) = if target < source {
            let (head, tail) = data.split_at_mut(source * ncols);
            (&mut head[target * ncols..(target + 1) * ncols], &tail[..ncols])
        } else {
            let (head, tail) = data.split_at_mut(target * ncols);
            (&mut tail[..ncols], &head[source * ncols..(source + 1) * ncols])
        };
        for (x, y) in dst.iter_mut().zip(src) {
            *x += y * factor;
        }
        Ok(())
    }
}
