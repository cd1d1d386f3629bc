//! Matrix exponential against closed forms.

use approx::{assert_abs_diff_eq, assert_relative_eq};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use mtxcalc::{expm, expm_with, matmul, ExpOptions, Matrix, MatrixError, MultiplyOptions};

#[test]
fn test_diagonal_matrix() {
    let mut a = Matrix::identity(3).unwrap();
    a.set(1, 1, 2.0).unwrap();
    a.set(2, 2, -1.0).unwrap();

    let r = expm(&a, 1e-18).unwrap();

    let expected = [1.0_f64.exp(), 2.0_f64.exp(), (-1.0_f64).exp()];
    for (i, &diag) in expected.iter().enumerate() {
        for j in 0..3 {
            if i == j {
                assert_relative_eq!(r[[i, j]], diag, max_relative = 1e-13);
            } else {
                assert_eq!(r[[i, j]], 0.0);
            }
        }
    }
}

#[test]
fn test_rotation_generator() {
    // exp([[0, -t], [t, 0]]) is the rotation by t
    let t = 0.75_f64;
    let a = Matrix::from_rows(&[[0.0, -t], [t, 0.0]]).unwrap();
    let r = expm(&a, 1e-16).unwrap();

    assert_abs_diff_eq!(r[[0, 0]], t.cos(), epsilon = 1e-14);
    assert_abs_diff_eq!(r[[0, 1]], -t.sin(), epsilon = 1e-14);
    assert_abs_diff_eq!(r[[1, 0]], t.sin(), epsilon = 1e-14);
    assert_abs_diff_eq!(r[[1, 1]], t.cos(), epsilon = 1e-14);
}

#[test]
fn test_zero_matrix_for_any_valid_epsilon() {
    let zero = Matrix::zeros(4, 4).unwrap();
    let id = Matrix::identity(4).unwrap();
    for eps in [1e-19, 1e-12, 1e-3, 1.0, 10.0] {
        assert_eq!(expm(&zero, eps).unwrap(), id);
    }
}

#[test]
fn test_exp_of_negation_is_inverse() {
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let a = Matrix::from_fn(5, 5, |_, _| rng.random_range(-0.5..0.5)).unwrap();
    let neg = a.scaled(-1.0).unwrap();

    let opts = ExpOptions {
        multiply: MultiplyOptions::with_block_size(2),
        ..Default::default()
    };
    let e_pos = expm_with(&a, 1e-16, &opts).unwrap();
    let e_neg = expm_with(&neg, 1e-16, &opts).unwrap();

    let prod = matmul(&e_pos, &e_neg).unwrap();
    let id = Matrix::identity(5).unwrap();
    for i in 0..5 {
        for j in 0..5 {
            assert_abs_diff_eq!(prod[[i, j]], id[[i, j]], epsilon = 1e-12);
        }
    }
}

#[test]
fn test_loose_epsilon_truncates_series() {
    // With eps = 0.6 the terms A and A^2/2 (norm 0.5) stop the series after I + A.
    let a = Matrix::from_rows(&[[1.0]]).unwrap();
    let r = expm(&a, 0.6).unwrap();
    assert_eq!(r[[0, 0]], 2.0);
}

#[test]
fn test_invalid_arguments() {
    let a = Matrix::identity(2).unwrap();
    assert!(matches!(
        expm(&a, 1e-20),
        Err(MatrixError::InvalidEpsilon { .. })
    ));
    assert!(matches!(
        expm(&a, 0.0),
        Err(MatrixError::InvalidEpsilon { .. })
    ));

    let rect = Matrix::zeros(3, 2).unwrap();
    assert!(matches!(
        expm(&rect, 1e-8),
        Err(MatrixError::InvalidInput { .. })
    ));
}
