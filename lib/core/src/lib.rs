//! # viewx Core
//!
//! Core library for the viewx view recommender.
//!
//! This crate provides the data model shared by every search strategy:
//!
//! - [`View`] - A `(dimension, function, measure)` aggregate view
//! - [`Catalog`] - Validated, disjoint dimension and measure vocabularies
//! - [`generate_views`] - View space enumeration
//! - [`Distribution`] - Raw per-category aggregates of one view in one cohort
//! - [`AggregateQuery`] - Structured grouped aggregate request
//! - [`AggregationDataSource`] - The contract a dataset backend implements
//! - [`Filter`] - Record predicates defining the target cohort
//!
//! ## Example
//!
//! ```rust
//! use viewx_core::{AggregateFunction, Catalog};
//!
//! let catalog = Catalog::new(["sex", "race"], ["age", "hours_per_week"]).unwrap();
//! let views = catalog.views(&[AggregateFunction::Avg, AggregateFunction::Sum]);
//! assert_eq!(views.len(), 8);
//! assert_eq!(views[0].to_string(), "avg(age) by sex");
//! ```

pub mod view;
pub mod space;
pub mod distribution;
pub mod query;
pub mod source;
pub mod record;
pub mod filter;
pub mod error;

pub use view::{AggregateFunction, View};
pub use space::{generate_views, Catalog};
pub use distribution::Distribution;
pub use query::{split_columns, Aggregate, AggregateQuery, AggregateRow, Cohort, RowRange};
pub use source::{AggregationDataSource, MeteredSource, QueryStats};
pub use record::Record;
pub use filter::{Filter, FilterCondition, PayloadFilter};
pub use error::{Error, Result};
