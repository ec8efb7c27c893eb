//! Divergence between a view's target and reference distributions
//!
//! Both raw distributions are aligned over the union of their categories,
//! normalized to probability vectors, floored at a small positive value and
//! then compared. The floor keeps KL-divergence finite when the reference has
//! no mass on a category the target has.

use crate::measure::Measure;
use std::collections::BTreeSet;
use viewx_core::{Distribution, Error, Result};

/// Default smoothing floor applied after normalization
pub const DEFAULT_FLOOR: f64 = f64::EPSILON;

/// Two probability vectors over a shared, sorted category order
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedProbabilities {
    pub categories: Vec<String>,
    pub target: Vec<f64>,
    pub reference: Vec<f64>,
}

/// Scores pairs of distributions with a fixed measure and smoothing floor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistanceEvaluator {
    measure: Measure,
    floor: f64,
}

impl Default for DistanceEvaluator {
    fn default() -> Self {
        Self::new(Measure::default())
    }
}

impl DistanceEvaluator {
    pub fn new(measure: Measure) -> Self {
        Self {
            measure,
            floor: DEFAULT_FLOOR,
        }
    }

    /// Replace the smoothing floor. Must be finite and in `(0, 1)`.
    pub fn with_floor(mut self, floor: f64) -> Result<Self> {
        if !floor.is_finite() || floor <= 0.0 || floor >= 1.0 {
            return Err(Error::InvalidConfig(format!(
                "smoothing floor must be in (0, 1), got {}",
                floor
            )));
        }
        self.floor = floor;
        Ok(self)
    }

    pub fn measure(&self) -> Measure {
        self.measure
    }

    pub fn floor(&self) -> f64 {
        self.floor
    }

    /// Normalized and floored probability vectors for a distribution pair
    pub fn probabilities(&self, target: &Distribution, reference: &Distribution) -> AlignedProbabilities {
        let (categories, t_raw, r_raw) = align(target, reference);
        let target = floored(normalize(&t_raw), self.floor);
        let reference = floored(normalize(&r_raw), self.floor);
        AlignedProbabilities {
            categories,
            target,
            reference,
        }
    }

    /// Utility of a view: divergence of its target distribution from its reference
    pub fn evaluate(&self, target: &Distribution, reference: &Distribution) -> f64 {
        let probs = self.probabilities(target, reference);
        let score = match self.measure {
            Measure::Kld => kl_divergence(&probs.target, &probs.reference),
            Measure::Emd => earth_movers_distance(&probs.target, &probs.reference),
        };
        score.max(0.0)
    }
}

/// Score two raw distributions with a measure given by name (`"kld"` or `"emd"`)
pub fn distance(target: &Distribution, reference: &Distribution, measure: &str) -> Result<f64> {
    let measure: Measure = measure.parse()?;
    Ok(DistanceEvaluator::new(measure).evaluate(target, reference))
}

/// Align two distributions over the sorted union of their categories.
/// A category missing on one side contributes a raw value of 0.
pub fn align(target: &Distribution, reference: &Distribution) -> (Vec<String>, Vec<f64>, Vec<f64>) {
    let keys: BTreeSet<&str> = target.categories().chain(reference.categories()).collect();
    let mut t = Vec::with_capacity(keys.len());
    let mut r = Vec::with_capacity(keys.len());
    for key in &keys {
        t.push(target.get(key).unwrap_or(0.0));
        r.push(reference.get(key).unwrap_or(0.0));
    }
    (keys.into_iter().map(str::to_string).collect(), t, r)
}

/// Scale values to sum to 1. A zero sum is treated as 1, leaving the values
/// untouched (an all-zero vector stays all zero).
pub fn normalize(values: &[f64]) -> Vec<f64> {
    let sum: f64 = values.iter().sum();
    let sum = if sum == 0.0 { 1.0 } else { sum };
    values.iter().map(|v| v / sum).collect()
}

fn floored(mut values: Vec<f64>, floor: f64) -> Vec<f64> {
    for v in &mut values {
        if *v < floor {
            *v = floor;
        }
    }
    values
}

/// Relative entropy `sum(t * ln(t / r))`. Inputs must be strictly positive.
pub fn kl_divergence(target: &[f64], reference: &[f64]) -> f64 {
    target
        .iter()
        .zip(reference)
        .map(|(t, r)| t * (t / r).ln())
        .sum()
}

/// Wasserstein-1 distance between two weight vectors placed on positions
/// `0, 1, ..., n-1`. Each vector is rescaled by its own total first.
pub fn earth_movers_distance(target: &[f64], reference: &[f64]) -> f64 {
    let t_total: f64 = target.iter().sum();
    let r_total: f64 = reference.iter().sum();
    if t_total <= 0.0 || r_total <= 0.0 {
        return 0.0;
    }

    let mut t_cdf = 0.0;
    let mut r_cdf = 0.0;
    let mut work = 0.0;
    // unit spacing between neighbouring positions; the last position moves nothing
    for (t, r) in target.iter().zip(reference).take(target.len().saturating_sub(1)) {
        t_cdf += t / t_total;
        r_cdf += r / r_total;
        work += (t_cdf - r_cdf).abs();
    }
    work
}
