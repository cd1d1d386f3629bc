//! Computes the exponential of a diagonal matrix and solves a 3x3 system.
//!
//! Run with `RUST_LOG=mtxcalc=debug` to see the library's diagnostics.

use mtxcalc::{expm, solve, verify_solution, Matrix};
use tracing_subscriber::EnvFilter;

fn main() -> mtxcalc::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    let mut a = Matrix::identity(3)?;
    a.set(1, 1, 2.0)?;
    a.set(2, 2, -1.0)?;
    let exp = expm(&a, 1e-18)?;
    print!("{exp:.5}");

    // 2x1 + 4x2 + 6x3  = 8
    //  x1 + 8x2 + 12x3 = 4
    // 4x1 + 6x2 + 10x3 = 2
    let a = Matrix::from_rows(&[[2.0, 4.0, 6.0], [1.0, 8.0, 12.0], [4.0, 6.0, 10.0]])?;
    let b = Matrix::from_rows(&[[8.0], [4.0], [2.0]])?;
    let x = solve(&a, &b)?;
    print!("{x:.2}");
    println!("residual: {:e}", verify_solution(&a, &x, &b)?);

    Ok(())
}
