//! Elementwise matrix arithmetic

use tracing::error;

use crate::error::{MatrixError, Result};
use crate::matrix::Matrix;

/// Divisors (and pivots) with absolute value below this are treated as zero.
pub const MIN_DIVISOR: f64 = 1e-20;

pub(crate) fn check_divisor(divisor: f64) -> Result<()> {
    if divisor.abs() < MIN_DIVISOR {
        error!(target: "mtxcalc::arithmetic", divisor, "division by near-zero value");
        return Err(MatrixError::DivisionByZero { divisor });
    }
    Ok(())
}

fn check_conformant(op: &'static str, a: &Matrix, b: &Matrix) -> Result<()> {
    if a.shape() != b.shape() {
        error!(
            target: "mtxcalc::arithmetic",
            op,
            left = ?a.shape(),
            right = ?b.shape(),
            "non-conformant operands"
        );
        return Err(MatrixError::mismatch(op, a.shape(), b.shape()));
    }
    Ok(())
}

impl Matrix {
    /// `self += other`
    pub fn add_in_place(&mut self, other: &Matrix) -> Result<()> {
        check_conformant("add", self, other)?;
        for (x, y) in self.as_mut_slice().iter_mut().zip(other.as_slice()) {
            *x += y;
        }
        Ok(())
    }

    /// `self -= other`
    pub fn sub_in_place(&mut self, other: &Matrix) -> Result<()> {
        check_conformant("sub", self, other)?;
        for (x, y) in self.as_mut_slice().iter_mut().zip(other.as_slice()) {
            *x -= y;
        }
        Ok(())
    }

    /// `self *= factor`
    pub fn scale_in_place(&mut self, factor: f64) {
        for x in self.as_mut_slice() {
            *x *= factor;
        }
    }

    /// `self /= divisor`
    ///
    /// Fails with [`MatrixError::DivisionByZero`] and leaves the matrix
    /// untouched when `|divisor| < MIN_DIVISOR`.
    pub fn divide_in_place(&mut self, divisor: f64) -> Result<()> {
        check_divisor(divisor)?;
        for x in self.as_mut_slice() {
            *x /= divisor;
        }
        Ok(())
    }

    /// `self + other` as a new matrix
    pub fn add(&self, other: &Matrix) -> Result<Matrix> {
        check_conformant("add", self, other)?;
        let mut out = self.try_copy()?;
        out.add_in_place(other)?;
        Ok(out)
    }

    /// `self - other` as a new matrix
    pub fn sub(&self, other: &Matrix) -> Result<Matrix> {
        check_conformant("sub", self, other)?;
        let mut out = self.try_copy()?;
        out.sub_in_place(other)?;
        Ok(out)
    }

    /// `self * factor` as a new matrix
    pub fn scaled(&self, factor: f64) -> Result<Matrix> {
        let mut out = self.try_copy()?;
        out.scale_in_place(factor);
        Ok(out)
    }

    /// `self / divisor` as a new matrix
    pub fn divided(&self, divisor: f64) -> Result<Matrix> {
        check_divisor(divisor)?;
        let mut out = self.try_copy()?;
        out.divide_in_place(divisor)?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Matrix {
        Matrix::from_rows(&[[1.0, 2.0], [3.0, 4.0]]).unwrap()
    }

    #[test]
    fn test_add_sub() {
        let a = sample();
        let b = Matrix::filled(2, 2, 1.0).unwrap();

        let sum = a.add(&b).unwrap();
        assert_eq!(sum, Matrix::from_rows(&[[2.0, 3.0], [4.0, 5.0]]).unwrap());

        let mut diff = sum.clone();
        diff.sub_in_place(&b).unwrap();
        assert_eq!(diff, a);
        assert_eq!(sum.sub(&a).unwrap(), b);
    }

    #[test]
    fn test_non_conformant_operands() {
        let mut a = sample();
        let b = Matrix::zeros(2, 3).unwrap();
        assert!(matches!(
            a.add_in_place(&b),
            Err(MatrixError::DimensionMismatch { op: "add", .. })
        ));
        assert!(matches!(
            a.sub(&b),
            Err(MatrixError::DimensionMismatch { op: "sub", .. })
        ));
        assert_eq!(a, sample());
    }

    #[test]
    fn test_scale_and_divide() {
        let a = sample();
        assert_eq!(
            a.scaled(2.0).unwrap(),
            Matrix::from_rows(&[[2.0, 4.0], [6.0, 8.0]]).unwrap()
        );

        let mut b = a.scaled(4.0).unwrap();
        b.divide_in_place(4.0).unwrap();
        assert_eq!(b, a);
        assert_eq!(a.scaled(2.0).unwrap().divided(2.0).unwrap(), a);
    }

    #[test]
    fn test_divide_is_exact_division() {
        // 5 * (1 / 3) rounds differently from 5 / 3
        let mut a = Matrix::from_rows(&[[5.0, 10.0]]).unwrap();
        a.divide_in_place(3.0).unwrap();
        assert_eq!(a.as_slice(), &[5.0 / 3.0, 10.0 / 3.0]);

        let b = Matrix::from_rows(&[[0.1, 1.1]]).unwrap().divided(7.0).unwrap();
        assert_eq!(b.as_slice(), &[0.1 / 7.0, 1.1 / 7.0]);
    }

    #[test]
    fn test_divide_by_near_zero_leaves_matrix_unchanged() {
        let mut a = sample();
        assert_eq!(
            a.divide_in_place(1e-25),
            Err(MatrixError::DivisionByZero { divisor: 1e-25 })
        );
        assert_eq!(a, sample());
        assert!(a.divided(0.0).is_err());
        // The threshold itself is usable.
        assert!(a.divided(MIN_DIVISOR).is_ok());
    }
}
