//! Confidence half-width for running utility means
//!
//! Partitions are treated as a finite population sampled without
//! replacement, which gives a Hoeffding–Serfling style interval:
//!
//! ```text
//! ε(m, M, α) = sqrt( (1 − (m − 1) / M) · ln(2 / α) / (2m) )
//! ```
//!
//! with `m` partitions observed out of `M` at significance `α`. The interval
//! narrows as `m` approaches `M`. The constant is a tunable assumption; only
//! its shape matters to the pruning rule.

/// Significance level used when none is configured
pub const DEFAULT_ALPHA: f64 = 0.1;

/// Half-width of the confidence band after `observed` of `total` partitions
pub fn hoeffding_serfling_epsilon(observed: usize, total: usize, alpha: f64) -> f64 {
    if observed == 0 || total == 0 {
        return f64::INFINITY;
    }
    let m = observed as f64;
    let n = total as f64;
    let finite_population = (1.0 - (m - 1.0) / n).max(0.0);
    (finite_population * (2.0 / alpha).ln() / (2.0 * m)).sqrt()
}
