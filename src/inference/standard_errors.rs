use ndarray::{Array1, Array2};
use nalgebra::DMatrix;

use crate::inference::errors::{InferenceError, InferenceResult};

/// Eigenvalues at or below this fraction of the largest one are treated as
/// zero when forming the pseudoinverse.
pub const EIGEN_EPS: f64 = 1e-12;

/// gauss_newton_standard_errors — parameter SEs of a least-squares fit.
///
/// Purpose
/// -------
/// Compute standard errors from the residual Jacobian `J` at `θ̂` using the
/// Gauss–Newton covariance `σ² (JᵀJ)⁺` with `σ² = SSE / (m − n)`.
///
/// Parameters
/// ----------
/// - `jacobian`: `&Array2<f64>`
///   `m × n` Jacobian of the residuals at `θ̂`.
/// - `sse`: `f64`
///   Sum of squared residuals at `θ̂`.
///
/// Returns
/// -------
/// `InferenceResult<Array1<f64>>`
///   Length-`n` vector of standard errors. Zero when the fit is exact.
///
/// Errors
/// ------
/// - `InferenceError::EmptyJacobian` for a Jacobian without rows or columns.
/// - `InferenceError::InsufficientDegreesOfFreedom` when `m ≤ n`.
///
/// Notes
/// -----
/// - Directions with eigenvalues below `EIGEN_EPS · λ_max` are dropped, so
///   weakly identified parameters get a finite (possibly zero) SE rather
///   than an error.
pub fn gauss_newton_standard_errors(
    jacobian: &Array2<f64>, sse: f64,
) -> InferenceResult<Array1<f64>> {
    let (m, n) = jacobian.dim();
    if m == 0 || n == 0 {
        return Err(InferenceError::EmptyJacobian);
    }
    if m <= n {
        return Err(InferenceError::InsufficientDegreesOfFreedom { observations: m, parameters: n });
    }
    let sigma2 = sse.max(0.0) / (m - n) as f64;
    let jtj = jacobian.t().dot(jacobian);
    let mut jtj_nalg = DMatrix::<f64>::zeros(n, n);
    fill_dmatrix(&jtj, &mut jtj_nalg);
    Ok(solve_for_se(jtj_nalg, n).mapv(|v| (sigma2 * v).sqrt()))
}

// ---- Helper methods ----

/// Copy a square `ndarray` matrix into a `DMatrix`, column by column.
fn fill_dmatrix(src: &Array2<f64>, dst: &mut DMatrix<f64>) {
    let n = src.ncols();
    for j in 0..n {
        for i in 0..n {
            dst[(i, j)] = src[[i, j]];
        }
    }
}

/// Diagonal of the pseudoinverse `(JᵀJ)⁺` via symmetric eigendecomposition.
fn solve_for_se(jtj: DMatrix<f64>, n: usize) -> Array1<f64> {
    let eigen_decomp = jtj.symmetric_eigen();
    let q = eigen_decomp.eigenvectors;
    let eigenvals = eigen_decomp.eigenvalues;
    let cutoff = EIGEN_EPS * eigenvals.iter().fold(0.0_f64, |acc, &l| acc.max(l));
    let mut diag = Array1::<f64>::zeros(n);
    for i in 0..n {
        diag[i] = eigenvals
            .iter()
            .enumerate()
            .filter(|(_, lambda)| **lambda > cutoff)
            .map(|(k, &lambda)| q[(i, k)] * q[(i, k)] / lambda)
            .sum();
    }
    diag
}
