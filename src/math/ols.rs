//! Least squares solver.
//!
//! The linear trend model solves a tiny regression of the form:
//!
//! ```text
//! minimize Σ (y_i - x_i^T β)^2
//! ```
//!
//! Implementation choices:
//! - We use SVD so the tall design matrix (many months, two columns) is solved
//!   robustly. (Nalgebra's `QR::solve` is intended for square systems and will
//!   panic for non-square matrices.)
//! - A constant series still has a well-defined solution (slope 0).

use nalgebra::{DMatrix, DVector};

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    // Try progressively looser tolerances if strict solve fails.
    for &tol in &[1e-10, 1e-8, 1e-6] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

/// Fit `y = a + b * t` with `t = 0, 1, 2, …` and return `(a, b)`.
pub fn fit_time_trend(ys: &[f64]) -> Option<(f64, f64)> {
    if ys.len() < 2 {
        return None;
    }
    let n = ys.len();
    let x = DMatrix::from_fn(n, 2, |i, j| if j == 0 { 1.0 } else { i as f64 });
    let y = DVector::from_column_slice(ys);
    let beta = solve_least_squares(&x, &y)?;
    Some((beta[0], beta[1]))
}
