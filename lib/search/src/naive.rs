//! Exhaustive search: one query per view and cohort

use crate::strategy::{order_by_utility, RankedView, SearchStrategy};
use tracing::debug;
use viewx_core::{
    split_columns, AggregateQuery, AggregationDataSource, Cohort, Distribution, Result, RowRange,
    View,
};
use viewx_distance::DistanceEvaluator;

/// Baseline strategy issuing `2 × |views|` queries
#[derive(Debug, Clone, Default)]
pub struct NaiveSearch {
    evaluator: DistanceEvaluator,
}

impl NaiveSearch {
    pub fn new(evaluator: DistanceEvaluator) -> Self {
        Self { evaluator }
    }

    pub fn evaluator(&self) -> &DistanceEvaluator {
        &self.evaluator
    }
}

pub(crate) fn fetch_distribution(
    source: &mut dyn AggregationDataSource,
    cohort: Cohort,
    view: &View,
    range: Option<RowRange>,
) -> Result<Distribution> {
    let rows = source.query(&AggregateQuery::for_view(cohort, view, range))?;
    Ok(split_columns(&rows, 1)?.pop().unwrap_or_default())
}

impl SearchStrategy for NaiveSearch {
    fn name(&self) -> &'static str {
        "naive"
    }

    fn rank(
        &self,
        source: &mut dyn AggregationDataSource,
        views: &[View],
        range: Option<RowRange>,
        top_k: Option<usize>,
    ) -> Result<Vec<RankedView>> {
        let mut results = Vec::with_capacity(views.len());
        for view in views {
            let target = fetch_distribution(source, Cohort::Target, view, range)?;
            let reference = fetch_distribution(source, Cohort::Reference, view, range)?;
            let utility = self.evaluator.evaluate(&target, &reference);
            debug!(view = %view, utility, "scored view");
            results.push(RankedView::new(view.clone(), utility));
        }
        Ok(order_by_utility(results, top_k))
    }
}
