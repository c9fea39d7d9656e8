//! Cached multifractal analysis of one dataset.
use std::collections::HashMap;

use log::debug;

use super::{
    errors::MultifractalResult,
    moments::{MassProfile, mass_profiles, moment_curve},
    spectrum::{MultifractalSpectrum, default_q_values, normalize_q_values},
};
use crate::{
    curve::{Curve, Range},
    estimation::{Estimator, EstimationResult, LogEstimator, OlsFit, validation::range_points},
    execution::ExecContext,
    geometry::Dataset,
    sampling::Sampling,
};

/// MultifractalAnalysis — mass profiles, per-q curves and fits, spectrum.
///
/// Caching
/// -------
/// - Mass profiles are computed once at construction.
/// - Per-q curves depend only on q and survive every change.
/// - Per-q fits depend on q and the range; changing the range clears them.
/// - The spectrum is rebuilt only after the q set or the range changed.
///
/// Mutation goes through `&mut self`, so there is a single writer.
#[derive(Debug)]
pub struct MultifractalAnalysis {
    profiles: Vec<MassProfile>,
    reference: Curve,
    range: Range,
    q_values: Vec<f64>,
    estimator: LogEstimator,
    curves: HashMap<u64, Curve>,
    fits: HashMap<u64, EstimationResult>,
    spectrum: Option<MultifractalSpectrum>,
}

impl MultifractalAnalysis {
    /// Measure `dataset` at every sampling scale. Range is the full curve and
    /// the q set is [`default_q_values`].
    pub fn new(
        dataset: Dataset<'_>, sampling: &Sampling, ctx: &ExecContext,
    ) -> MultifractalResult<Self> {
        let profiles = mass_profiles(dataset, sampling, ctx)?;
        let reference = moment_curve(&profiles, 0.0)?;
        let range = Range::full(&reference);
        Ok(Self {
            profiles,
            reference,
            range,
            q_values: default_q_values(),
            estimator: LogEstimator::default(),
            curves: HashMap::new(),
            fits: HashMap::new(),
            spectrum: None,
        })
    }

    pub fn with_estimator(mut self, estimator: LogEstimator) -> Self {
        self.estimator = estimator;
        self
    }

    pub fn profiles(&self) -> &[MassProfile] {
        &self.profiles
    }

    /// Box-count curve `Z(0)`, also the snapping reference for ranges.
    pub fn box_counts(&self) -> &Curve {
        &self.reference
    }

    pub fn range(&self) -> &Range {
        &self.range
    }

    pub fn q_values(&self) -> &[f64] {
        &self.q_values
    }

    /// Replace the q set; the spectrum is invalidated only if it changed.
    pub fn set_q_values(&mut self, qs: &[f64]) -> MultifractalResult<()> {
        let qs = normalize_q_values(qs)?;
        if qs != self.q_values {
            self.q_values = qs;
            self.spectrum = None;
        }
        Ok(())
    }

    /// Snap `[low, high]` onto the measured scales; fits and spectrum are
    /// invalidated only if the snapped range changed.
    pub fn set_range(&mut self, low: f64, high: f64) -> MultifractalResult<()> {
        let range = Range::new(&self.reference, low, high)?;
        if range != self.range {
            self.range = range;
            self.fits.clear();
            self.spectrum = None;
        }
        Ok(())
    }

    /// Memoized `Z(q)` curve.
    pub fn curve(&mut self, q: f64) -> MultifractalResult<&Curve> {
        let key = q.to_bits();
        if !self.curves.contains_key(&key) {
            let curve = moment_curve(&self.profiles, q)?;
            self.curves.insert(key, curve);
        }
        Ok(&self.curves[&key])
    }

    /// Memoized log fit of `Z(q)` over the current range; its `dimension`
    /// is `τ(q)`.
    pub fn fit(&mut self, q: f64) -> MultifractalResult<&EstimationResult> {
        let key = q.to_bits();
        if !self.fits.contains_key(&key) {
            let range = self.range;
            let estimator = self.estimator;
            let result = estimator.estimate(self.curve(q)?, &range)?;
            self.fits.insert(key, result);
        }
        Ok(&self.fits[&key])
    }

    /// Information dimension: slope of `Σ p ln p` against `ln s` over the
    /// current range.
    pub fn information_dimension(&self) -> MultifractalResult<f64> {
        let scales: Vec<f64> = self.profiles.iter().map(MassProfile::scale).collect();
        let sums: Vec<f64> = self.profiles.iter().map(MassProfile::entropy_sum).collect();
        let curve = Curve::new(scales, sums, self.reference.sign())?;
        let points = range_points(&curve, &self.range)?;
        let (lx, ys): (Vec<f64>, Vec<f64>) = points.iter().map(|&(s, h)| (s.ln(), h)).unzip();
        Ok(OlsFit::fit(&lx, &ys)?.slope)
    }

    /// Spectrum over the current q set and range, rebuilt only when stale.
    pub fn spectrum(&mut self) -> MultifractalResult<&MultifractalSpectrum> {
        let spectrum = match self.spectrum.take() {
            Some(spectrum) => spectrum,
            None => self.build_spectrum()?,
        };
        Ok(self.spectrum.insert(spectrum))
    }

    fn build_spectrum(&mut self) -> MultifractalResult<MultifractalSpectrum> {
        let qs = self.q_values.clone();
        let mut taus = Vec::with_capacity(qs.len());
        for &q in &qs {
            taus.push(self.fit(q)?.dimension);
        }
        let d1 = self.information_dimension()?;
        debug!(
            "multifractal: spectrum over {} q values, range [{}, {}], D1 = {d1:.4}",
            qs.len(),
            self.range.low(),
            self.range.high()
        );
        Ok(MultifractalSpectrum::assemble(&qs, &taus, Some(d1)))
    }
}
