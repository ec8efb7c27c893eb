//! # viewx Distance
//!
//! Scores how differently a view behaves across the target and reference
//! cohorts.
//!
//! ## Pipeline
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Align     │────>│  Normalize  │────>│   Floor     │────>│  KLD / EMD  │
//! │ (key union) │     │  (sum = 1)  │     │  (epsilon)  │     │  (utility)  │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use viewx_core::Distribution;
//! use viewx_distance::{DistanceEvaluator, Measure};
//!
//! let target: Distribution = [("Male", 40.0), ("Female", 35.0)].into_iter().collect();
//! let reference: Distribution = [("Male", 30.0), ("Female", 32.0)].into_iter().collect();
//!
//! let utility = DistanceEvaluator::new(Measure::Kld).evaluate(&target, &reference);
//! assert!(utility > 0.0);
//! ```

pub mod measure;
pub mod distance;

pub use measure::Measure;
pub use distance::{
    align,
    distance,
    earth_movers_distance,
    kl_divergence,
    normalize,
    AlignedProbabilities,
    DistanceEvaluator,
    DEFAULT_FLOOR,
};
