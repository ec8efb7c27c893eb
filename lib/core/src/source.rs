use crate::{AggregateQuery, AggregateRow, Cohort, Result};
use tracing::trace;

/// Anything that can answer grouped aggregate queries over the two cohorts
///
/// Implementations are used sequentially by one search at a time, hence the
/// `&mut self` receivers. Errors are surfaced as-is and never retried.
pub trait AggregationDataSource {
    /// Run a grouped aggregate query
    ///
    /// Returns one row per distinct category of the query's dimension with
    /// one value per requested aggregate, in request order. Ranges whose upper
    /// bound exceeds the largest row id must be accepted.
    fn query(&mut self, query: &AggregateQuery) -> Result<Vec<AggregateRow>>;

    /// Largest row id across both cohorts, `None` for an empty dataset
    fn max_row_id(&mut self) -> Result<Option<u64>>;
}

impl<S: AggregationDataSource + ?Sized> AggregationDataSource for &mut S {
    fn query(&mut self, query: &AggregateQuery) -> Result<Vec<AggregateRow>> {
        (**self).query(query)
    }

    fn max_row_id(&mut self) -> Result<Option<u64>> {
        (**self).max_row_id()
    }
}

impl<S: AggregationDataSource + ?Sized> AggregationDataSource for Box<S> {
    fn query(&mut self, query: &AggregateQuery) -> Result<Vec<AggregateRow>> {
        (**self).query(query)
    }

    fn max_row_id(&mut self) -> Result<Option<u64>> {
        (**self).max_row_id()
    }
}

/// Query counters kept by [`MeteredSource`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryStats {
    pub target_queries: usize,
    pub reference_queries: usize,
    pub aggregates: usize,
}

impl QueryStats {
    pub fn total_queries(&self) -> usize {
        self.target_queries + self.reference_queries
    }
}

/// Data source wrapper counting the queries passed through it
pub struct MeteredSource<S> {
    inner: S,
    stats: QueryStats,
}

impl<S: AggregationDataSource> MeteredSource<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            stats: QueryStats::default(),
        }
    }

    pub fn stats(&self) -> QueryStats {
        self.stats
    }

    pub fn reset(&mut self) {
        self.stats = QueryStats::default();
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: AggregationDataSource> AggregationDataSource for MeteredSource<S> {
    fn query(&mut self, query: &AggregateQuery) -> Result<Vec<AggregateRow>> {
        match query.cohort() {
            Cohort::Target => self.stats.target_queries += 1,
            Cohort::Reference => self.stats.reference_queries += 1,
        }
        self.stats.aggregates += query.aggregates().len();
        trace!(
            cohort = %query.cohort(),
            dimension = query.dimension(),
            aggregates = query.aggregates().len(),
            "aggregate query"
        );
        self.inner.query(query)
    }

    fn max_row_id(&mut self) -> Result<Option<u64>> {
        self.inner.max_row_id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AggregateFunction, Error, View};

    struct Fixed;

    impl AggregationDataSource for Fixed {
        fn query(&mut self, query: &AggregateQuery) -> Result<Vec<AggregateRow>> {
            let width = query.aggregates().len();
            Ok(vec![AggregateRow::new("x", vec![1.0; width])])
        }

        fn max_row_id(&mut self) -> Result<Option<u64>> {
            Ok(Some(9))
        }
    }

    struct Broken;

    impl AggregationDataSource for Broken {
        fn query(&mut self, _query: &AggregateQuery) -> Result<Vec<AggregateRow>> {
            Err(Error::DataSource("connection reset".to_string()))
        }

        fn max_row_id(&mut self) -> Result<Option<u64>> {
            Err(Error::DataSource("connection reset".to_string()))
        }
    }

    #[test]
    fn test_metered_counts_per_cohort() {
        let view = View::new("sex", AggregateFunction::Avg, "age");
        let mut source = MeteredSource::new(Fixed);
        source.query(&AggregateQuery::for_view(Cohort::Target, &view, None)).unwrap();
        source.query(&AggregateQuery::for_view(Cohort::Reference, &view, None)).unwrap();
        source.query(&AggregateQuery::for_view(Cohort::Reference, &view, None)).unwrap();

        let stats = source.stats();
        assert_eq!(stats.target_queries, 1);
        assert_eq!(stats.reference_queries, 2);
        assert_eq!(stats.total_queries(), 3);
        assert_eq!(source.max_row_id().unwrap(), Some(9));

        source.reset();
        assert_eq!(source.stats(), QueryStats::default());
    }

    #[test]
    fn test_errors_pass_through() {
        let view = View::new("sex", AggregateFunction::Avg, "age");
        let mut source = MeteredSource::new(Broken);
        let result = source.query(&AggregateQuery::for_view(Cohort::Target, &view, None));
        assert!(matches!(result, Err(Error::DataSource(_))));
        assert_eq!(source.stats().target_queries, 1);
    }
}
