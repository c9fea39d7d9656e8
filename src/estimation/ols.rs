//! Two-pass simple linear regression.
use super::errors::{EstResult, EstimationError};

/// Ordinary least-squares line `y = intercept + slope·x`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OlsFit {
    pub intercept: f64,
    pub slope: f64,
    pub sse: f64,
    pub sst: f64,
    pub sxx: f64,
    pub n: usize,
}

impl OlsFit {
    /// Fit by centring on the means first (two passes), which keeps
    /// `Sxx`/`Sxy` accurate when `x` has a large offset.
    ///
    /// # Errors
    /// - `InsufficientPoints` with fewer than two points.
    /// - `DegenerateDesign` when every `x` is identical.
    pub fn fit(xs: &[f64], ys: &[f64]) -> EstResult<Self> {
        let n = xs.len().min(ys.len());
        if n < 2 {
            return Err(EstimationError::InsufficientPoints { found: n, required: 2 });
        }
        let nf = n as f64;
        let mean_x = xs[..n].iter().sum::<f64>() / nf;
        let mean_y = ys[..n].iter().sum::<f64>() / nf;
        let (mut sxx, mut sxy, mut sst) = (0.0, 0.0, 0.0);
        for (&x, &y) in xs.iter().zip(ys) {
            let (dx, dy) = (x - mean_x, y - mean_y);
            sxx += dx * dx;
            sxy += dx * dy;
            sst += dy * dy;
        }
        if sxx <= 0.0 {
            return Err(EstimationError::DegenerateDesign { n });
        }
        let slope = sxy / sxx;
        let intercept = mean_y - slope * mean_x;
        let sse = xs
            .iter()
            .zip(ys)
            .map(|(&x, &y)| {
                let r = y - intercept - slope * x;
                r * r
            })
            .sum();
        Ok(Self { intercept, slope, sse, sst, sxx, n })
    }

    /// `1 − SSE/SST`; 1 for a constant response.
    pub fn r_squared(&self) -> f64 {
        r_squared(self.sse, self.sst)
    }

    /// Residual degrees of freedom, `n − 2`.
    pub fn dof(&self) -> usize {
        self.n.saturating_sub(2)
    }

    /// `sqrt(σ² / Sxx)` with `σ² = SSE / (n − 2)`.
    pub fn slope_standard_error(&self) -> f64 {
        let dof = self.dof().max(1) as f64;
        (self.sse / dof / self.sxx).sqrt()
    }
}

/// Coefficient of determination, defined as 1 when the response is constant.
pub fn r_squared(sse: f64, sst: f64) -> f64 {
    if sst == 0.0 { 1.0 } else { 1.0 - sse / sst }
}
