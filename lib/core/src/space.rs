//! View space enumeration
//!
//! The view space is the cartesian product of grouping columns, aggregate
//! functions and measure columns. [`Catalog`] holds the validated column
//! vocabularies a dataset exposes.

use crate::{AggregateFunction, Error, Result, View};
use ahash::AHashSet;
use serde::{Deserialize, Serialize};

/// Enumerate every `(dimension, function, measure)` triplet.
///
/// Order is lexicographic by input position: dimensions vary slowest,
/// measures fastest. Inputs are assumed to be distinct.
pub fn generate_views<D, M>(
    dimensions: &[D],
    functions: &[AggregateFunction],
    measures: &[M],
) -> Vec<View>
where
    D: AsRef<str>,
    M: AsRef<str>,
{
    let mut views = Vec::with_capacity(dimensions.len() * functions.len() * measures.len());
    for dimension in dimensions {
        for &function in functions {
            for measure in measures {
                views.push(View::new(dimension.as_ref(), function, measure.as_ref()));
            }
        }
    }
    views
}

/// The fixed column vocabularies of a dataset
///
/// Dimension (grouping) columns and measure columns are disjoint. Queries and
/// views may only name columns listed here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    dimensions: Vec<String>,
    measures: Vec<String>,
}

impl Catalog {
    pub fn new<D, M>(dimensions: D, measures: M) -> Result<Self>
    where
        D: IntoIterator,
        D::Item: Into<String>,
        M: IntoIterator,
        M::Item: Into<String>,
    {
        let dimensions: Vec<String> = dimensions.into_iter().map(Into::into).collect();
        let measures: Vec<String> = measures.into_iter().map(Into::into).collect();

        let mut seen = AHashSet::new();
        for column in dimensions.iter().chain(measures.iter()) {
            if column.trim().is_empty() {
                return Err(Error::InvalidConfig("column names cannot be empty".to_string()));
            }
            if !seen.insert(column.as_str()) {
                return Err(Error::InvalidConfig(format!(
                    "column '{}' listed more than once (dimensions and measures must be disjoint)",
                    column
                )));
            }
        }

        Ok(Self { dimensions, measures })
    }

    pub fn dimensions(&self) -> &[String] {
        &self.dimensions
    }

    pub fn measures(&self) -> &[String] {
        &self.measures
    }

    pub fn contains_dimension(&self, column: &str) -> bool {
        self.dimensions.iter().any(|d| d == column)
    }

    pub fn contains_measure(&self, column: &str) -> bool {
        self.measures.iter().any(|m| m == column)
    }

    /// Full view space over this catalog for the given functions
    pub fn views(&self, functions: &[AggregateFunction]) -> Vec<View> {
        generate_views(&self.dimensions, functions, &self.measures)
    }

    /// Narrow the catalog to a subset of its columns, keeping catalog order
    pub fn select(&self, dimensions: &[String], measures: &[String]) -> Result<Catalog> {
        for column in dimensions {
            if !self.contains_dimension(column) {
                return Err(Error::UnknownColumn(column.clone()));
            }
        }
        for column in measures {
            if !self.contains_measure(column) {
                return Err(Error::UnknownColumn(column.clone()));
            }
        }
        Catalog::new(
            self.dimensions.iter().filter(|d| dimensions.contains(d)).cloned(),
            self.measures.iter().filter(|m| measures.contains(m)).cloned(),
        )
    }
}
