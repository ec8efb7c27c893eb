//! Structured aggregate queries
//!
//! Queries are built from validated [`View`]s, never from strings. A single
//! query groups one cohort by one dimension and computes any number of
//! aggregates in one pass, one result column per aggregate.

use crate::{AggregateFunction, Distribution, Error, Result, View};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One side of the comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cohort {
    Target,
    Reference,
}

impl fmt::Display for Cohort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cohort::Target => f.write_str("target"),
            Cohort::Reference => f.write_str("reference"),
        }
    }
}

/// Half-open row id range `[lo, hi)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RowRange {
    pub lo: u64,
    pub hi: u64,
}

impl RowRange {
    pub fn new(lo: u64, hi: u64) -> Self {
        Self { lo, hi }
    }

    #[inline]
    pub fn contains(&self, id: u64) -> bool {
        id >= self.lo && id < self.hi
    }

    pub fn is_empty(&self) -> bool {
        self.hi <= self.lo
    }
}

impl fmt::Display for RowRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.lo, self.hi)
    }
}

/// A single `function(measure)` result column
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Aggregate {
    pub function: AggregateFunction,
    pub measure: String,
}

impl From<&View> for Aggregate {
    fn from(view: &View) -> Self {
        Self {
            function: view.function(),
            measure: view.measure().to_string(),
        }
    }
}

/// Grouped aggregate request against one cohort
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateQuery {
    cohort: Cohort,
    dimension: String,
    aggregates: Vec<Aggregate>,
    range: Option<RowRange>,
}

impl AggregateQuery {
    /// Query computing exactly one view
    pub fn for_view(cohort: Cohort, view: &View, range: Option<RowRange>) -> Self {
        Self {
            cohort,
            dimension: view.dimension().to_string(),
            aggregates: vec![Aggregate::from(view)],
            range,
        }
    }

    /// Query computing every view of a group in one pass
    ///
    /// All views must share the same dimension. Result columns follow the
    /// order of `views`.
    pub fn for_group(cohort: Cohort, views: &[&View], range: Option<RowRange>) -> Result<Self> {
        let first = views
            .first()
            .ok_or_else(|| Error::InvalidConfig("query needs at least one aggregate".to_string()))?;
        let dimension = first.dimension();
        if let Some(other) = views.iter().find(|v| v.dimension() != dimension) {
            return Err(Error::InvalidConfig(format!(
                "views grouped by '{}' and '{}' cannot share one query",
                dimension,
                other.dimension()
            )));
        }
        Ok(Self {
            cohort,
            dimension: dimension.to_string(),
            aggregates: views.iter().map(|v| Aggregate::from(*v)).collect(),
            range,
        })
    }

    pub fn cohort(&self) -> Cohort {
        self.cohort
    }

    pub fn dimension(&self) -> &str {
        &self.dimension
    }

    pub fn aggregates(&self) -> &[Aggregate] {
        &self.aggregates
    }

    pub fn range(&self) -> Option<RowRange> {
        self.range
    }
}

/// One result row: a category and one value per requested aggregate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateRow {
    pub category: String,
    pub values: Vec<f64>,
}

impl AggregateRow {
    pub fn new(category: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            category: category.into(),
            values,
        }
    }
}

/// Slice multi-column result rows into one distribution per column
pub fn split_columns(rows: &[AggregateRow], width: usize) -> Result<Vec<Distribution>> {
    let mut columns = vec![Distribution::new(); width];
    for row in rows {
        if row.values.len() != width {
            return Err(Error::DataSource(format!(
                "row for category '{}' has {} values, expected {}",
                row.category,
                row.values.len(),
                width
            )));
        }
        for (column, value) in columns.iter_mut().zip(&row.values) {
            column.insert(row.category.clone(), *value);
        }
    }
    Ok(columns)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_group_keeps_order() {
        let a = View::new("sex", AggregateFunction::Avg, "age");
        let b = View::new("sex", AggregateFunction::Max, "hours");
        let query = AggregateQuery::for_group(Cohort::Target, &[&a, &b], None).unwrap();
        assert_eq!(query.dimension(), "sex");
        assert_eq!(query.aggregates()[0].function, AggregateFunction::Avg);
        assert_eq!(query.aggregates()[1].measure, "hours");
    }

    #[test]
    fn test_for_group_rejects_mixed_dimensions() {
        let a = View::new("sex", AggregateFunction::Avg, "age");
        let b = View::new("race", AggregateFunction::Avg, "age");
        assert!(AggregateQuery::for_group(Cohort::Target, &[&a, &b], None).is_err());
        assert!(AggregateQuery::for_group(Cohort::Target, &[], None).is_err());
    }

    #[test]
    fn test_split_columns() {
        let rows = vec![
            AggregateRow::new("Male", vec![40.0, 3.0]),
            AggregateRow::new("Female", vec![35.0, 5.0]),
        ];
        let columns = split_columns(&rows, 2).unwrap();
        assert_eq!(columns.len(), 2);
        assert_eq!(columns[0].get("Male"), Some(40.0));
        assert_eq!(columns[1].get("Female"), Some(5.0));
    }

    #[test]
    fn test_split_columns_width_mismatch() {
        let rows = vec![AggregateRow::new("Male", vec![40.0])];
        assert!(matches!(split_columns(&rows, 2), Err(Error::DataSource(_))));
    }

    #[test]
    fn test_row_range() {
        let range = RowRange::new(10, 20);
        assert!(range.contains(10));
        assert!(range.contains(19));
        assert!(!range.contains(20));
        assert!(!range.is_empty());
        assert!(RowRange::new(5, 5).is_empty());
    }
}
