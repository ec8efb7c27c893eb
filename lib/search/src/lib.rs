//! # viewx Search
//!
//! Finds the aggregate views whose target and reference distributions differ
//! the most.
//!
//! ## Strategies
//!
//! - [`NaiveSearch`]: two queries per view, the correctness baseline
//! - [`SharingSearch`]: two queries per grouping column, identical rankings
//! - [`PruningSearch`]: wraps either of the above, scans the data in row-id
//!   partitions and drops views that cannot reach the top-k
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ View Space  │────>│  Strategy   │────>│  Distance   │
//! │ (catalog)   │     │ (queries)   │     │ (utility)   │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                            │
//!                     ┌─────────────┐
//!                     │  Pruning    │
//!                     │ (partitions)│
//!                     └─────────────┘
//!                            │
//!                     ┌─────────────┐
//!                     │  Report     │
//!                     │  (top-k)    │
//!                     └─────────────┘
//! ```

pub mod strategy;
pub mod naive;
pub mod sharing;
pub mod bound;
pub mod pruning;
pub mod observer;
pub mod config;
pub mod report;

#[cfg(test)]
mod testing;

pub use strategy::{RankedView, SearchStrategy};
pub use naive::NaiveSearch;
pub use sharing::SharingSearch;
pub use bound::{hoeffding_serfling_epsilon, DEFAULT_ALPHA};
pub use pruning::{PruningSearch, RunningEstimate};
pub use observer::{EventLog, NoopObserver, SearchEvent, SearchObserver};
pub use config::{PruningConfig, SearchConfig, StrategyKind};
pub use report::{compare_view, CategoryComparison, SearchReport, ViewComparison};
