//! Direct (non-linear) power-law estimator.
//!
//! Fits one of the [`PowerLawModel`] forms to raw `(scale, measure)` pairs
//! with Levenberg–Marquardt. `dimension = sign · D̂`; R² is computed on the
//! raw measures; the analytic interval uses Gauss–Newton standard errors
//! with a Student t on `n − k` degrees of freedom. A fit that stops without
//! converging is reported, never reseeded.
use log::debug;
use ndarray::Array1;

use super::{
    errors::{EstResult, EstimationError},
    estimator::Estimator,
    kind::EstimatorKind,
    models::PowerLawModel,
    ols::r_squared,
    result::{EstimationResult, signed_interval},
    validation::range_points,
};
use crate::{
    curve::{Curve, Range, Sign},
    inference::{DEFAULT_CONFIDENCE, confidence_interval, gauss_newton_standard_errors},
    optimization::{
        errors::{OptError, OptResult},
        least_squares::{
            FitOutcome, JacobianMatrix, LmOptions, ResidualModel, Residuals, Theta, minimize,
        },
    },
};

/// Observations for a direct fit.
#[derive(Debug, Clone, PartialEq)]
pub struct PowerLawData {
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl PowerLawData {
    pub fn from_points(points: &[(f64, f64)]) -> Self {
        let (xs, ys) = points.iter().copied().unzip();
        Self { xs, ys }
    }
}

/// Residuals `model(x_i; θ) − y_i` with the analytic Jacobian.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerLawResiduals {
    pub model: PowerLawModel,
}

impl ResidualModel for PowerLawResiduals {
    type Data = PowerLawData;

    fn observation_count(&self, data: &Self::Data) -> usize {
        data.xs.len()
    }

    fn residuals(&self, theta: &Theta, data: &Self::Data) -> OptResult<Residuals> {
        Ok(Array1::from_iter(
            data.xs.iter().zip(&data.ys).map(|(&x, &y)| self.model.value(theta, x) - y),
        ))
    }

    fn check(&self, theta: &Theta, data: &Self::Data) -> OptResult<()> {
        let k = self.model.param_count();
        if theta.len() != k {
            return Err(OptError::ThetaLengthMismatch { expected: k, actual: theta.len() });
        }
        if data.xs.len() < k {
            return Err(OptError::InvalidModelInput {
                reason: "fewer observations than model parameters",
            });
        }
        if data.xs.iter().any(|&x| !(x > 0.0 && x.is_finite())) {
            return Err(OptError::InvalidModelInput { reason: "scales must be positive and finite" });
        }
        Ok(())
    }

    fn jacobian(&self, theta: &Theta, data: &Self::Data) -> OptResult<JacobianMatrix> {
        let mut jacobian = JacobianMatrix::zeros((data.xs.len(), self.model.param_count()));
        for (mut row, &x) in jacobian.rows_mut().into_iter().zip(&data.xs) {
            row.assign(&self.model.gradient(theta, x));
        }
        Ok(jacobian)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DirectEstimator {
    model: PowerLawModel,
    options: LmOptions,
    level: f64,
}

impl DirectEstimator {
    pub fn new(model: PowerLawModel, options: LmOptions, level: f64) -> Self {
        Self { model, options, level }
    }

    pub fn model(&self) -> PowerLawModel {
        self.model
    }

    /// Run LM from the documented seed; non-convergence is an error.
    fn run(&self, data: &PowerLawData, sign: Sign) -> EstResult<FitOutcome> {
        let first = data.ys.first().copied().unwrap_or(1.0);
        let theta0 = self.model.initial_guess(sign, first);
        let outcome = minimize(&PowerLawResiduals { model: self.model }, theta0, data, &self.options)?;
        if !outcome.converged {
            return Err(EstimationError::Convergence {
                status: outcome.status,
                iterations: outcome.iterations,
            });
        }
        Ok(outcome)
    }
}

impl Default for DirectEstimator {
    fn default() -> Self {
        Self::new(PowerLawModel::default(), LmOptions::default(), DEFAULT_CONFIDENCE)
    }
}

/// `k ln n + n ln(SSE/n)`; `-∞` for an exact fit.
pub fn bic(sse: f64, n: usize, k: usize) -> f64 {
    if sse == 0.0 {
        return f64::NEG_INFINITY;
    }
    let nf = n as f64;
    k as f64 * nf.ln() + nf * (sse / nf).ln()
}

impl Estimator for DirectEstimator {
    fn kind(&self) -> EstimatorKind {
        EstimatorKind::Direct
    }

    fn parameter_count(&self) -> usize {
        self.model.param_count()
    }

    fn preflight(&self, sign: Sign, _points: &[(f64, f64)], _first_index: usize) -> EstResult<()> {
        self.model.check_sign(sign)
    }

    fn estimate(&self, curve: &Curve, range: &Range) -> EstResult<EstimationResult> {
        let sign = curve.sign();
        self.model.check_sign(sign)?;
        let points = range_points(curve, range)?;
        let data = PowerLawData::from_points(&points);
        let outcome = self.run(&data, sign)?;

        let n = points.len();
        let k = self.model.param_count();
        let mean = data.ys.iter().sum::<f64>() / n as f64;
        let sst: f64 = data.ys.iter().map(|y| (y - mean) * (y - mean)).sum();
        let theta = outcome.theta_hat;
        let d_fit = theta[0];

        let interval = if n > k {
            let jacobian = PowerLawResiduals { model: self.model }.jacobian(&theta, &data)?;
            let se = gauss_newton_standard_errors(&jacobian, outcome.sse)?;
            signed_interval(sign, confidence_interval(d_fit, se[0], n - k, self.level)?)
        } else {
            (f64::NEG_INFINITY, f64::INFINITY)
        };
        let dimension = sign.value() * d_fit;
        debug!(
            "direct {} fit: {} point(s), {} iteration(s), dimension {dimension:.6}, sse {:e}",
            self.model.name(),
            n,
            outcome.iterations,
            outcome.sse
        );

        Ok(EstimationResult {
            dimension,
            sign,
            r2: r_squared(outcome.sse, sst),
            coefficients: theta.to_vec(),
            confidence_interval: interval,
            estimator: EstimatorKind::Direct,
            model: Some(self.model),
            n_points: n,
            p_value: None,
            bic: Some(bic(outcome.sse, n, k)),
            range: *range,
        })
    }

    fn resample_dimension(&self, points: &[(f64, f64)], sign: Sign) -> EstResult<f64> {
        let outcome = self.run(&PowerLawData::from_points(points), sign)?;
        Ok(sign.value() * outcome.theta_hat[0])
    }
}
