//! # viewX
//!
//! Finds the most interesting aggregate views of a table: the
//! `(dimension, aggregate, measure)` charts on which a target subset of the
//! rows differs the most from the rest of the data.
//!
//! ## Quick Start
//!
//! ### As a CLI
//!
//! ```bash
//! viewx --data adult.jsonl \
//!     --dimensions sex,race,workclass \
//!     --measures age,hours_per_week,capital_gain \
//!     --target-column marital_status --target-values Married-civ-spouse \
//!     --top-k 5 --partitions 10
//! ```
//!
//! ### As a Library
//!
//! ```rust,no_run
//! use viewx::prelude::*;
//!
//! let catalog = Catalog::new(["sex", "race"], ["age", "hours_per_week"]).unwrap();
//! let married = PayloadFilter::new(FilterCondition::any_of("marital_status", ["Married"]));
//! let mut dataset = Dataset::load_jsonl("adult.jsonl", catalog, &married).unwrap();
//!
//! let views = dataset.catalog().views(&AggregateFunction::ALL);
//! let search = PruningSearch::new(SharingSearch::default(), 10).unwrap();
//! for result in search.run(&mut dataset, &views, 5).unwrap() {
//!     println!("{:.4}  {}", result.utility, result.view);
//! }
//! ```
//!
//! ## Crate Structure
//!
//! - [`viewx-core`](viewx_core) - views, catalogs, aggregate queries, the data source trait
//! - [`viewx-distance`](viewx_distance) - KL divergence and earth mover's distance
//! - [`viewx-search`](viewx_search) - naive, sharing and pruning search strategies
//! - [`viewx-storage`](viewx_storage) - in-memory cohort dataset and JSON-lines loading

// Re-export core types
pub use viewx_core::{
    generate_views, AggregateFunction, AggregateQuery, AggregateRow, AggregationDataSource,
    Catalog, Cohort, Distribution, Error, Filter, FilterCondition, MeteredSource,
    PayloadFilter, QueryStats, Record, Result, RowRange, View,
};

// Re-export distance
pub use viewx_distance::{distance, DistanceEvaluator, Measure};

// Re-export search
pub use viewx_search::{
    compare_view, EventLog, NaiveSearch, PruningConfig, PruningSearch, RankedView,
    SearchConfig, SearchEvent, SearchObserver, SearchReport, SearchStrategy, SharingSearch,
    StrategyKind, ViewComparison,
};

// Re-export storage
pub use viewx_storage::Dataset;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        AggregateFunction, AggregationDataSource, Catalog, Cohort, Dataset, DistanceEvaluator,
        Error, FilterCondition, Measure, NaiveSearch, PayloadFilter, PruningSearch, RankedView,
        Result, SearchConfig, SearchStrategy, SharingSearch, View,
    };
}
