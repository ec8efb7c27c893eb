//! Output structures handed to presentation layers
//!
//! A ranked list of views, plus on-demand per-category comparisons of a
//! single view that can be drawn as grouped bar charts.

use crate::naive::fetch_distribution;
use crate::strategy::RankedView;
use serde::Serialize;
use viewx_core::{AggregationDataSource, Cohort, Distribution, QueryStats, Result, RowRange, View};
use viewx_distance::{align, DistanceEvaluator, Measure};

/// One category of a view with its raw value in both cohorts
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryComparison {
    pub category: String,
    pub target: f64,
    pub reference: f64,
}

/// Raw target and reference distributions of one view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewComparison {
    pub view: View,
    pub target: Distribution,
    pub reference: Distribution,
}

impl ViewComparison {
    /// Rows over the union of categories, missing sides reported as 0
    pub fn rows(&self) -> Vec<CategoryComparison> {
        let (categories, target, reference) = align(&self.target, &self.reference);
        categories
            .into_iter()
            .zip(target)
            .zip(reference)
            .map(|((category, target), reference)| CategoryComparison {
                category,
                target,
                reference,
            })
            .collect()
    }

    pub fn utility(&self, evaluator: &DistanceEvaluator) -> f64 {
        evaluator.evaluate(&self.target, &self.reference)
    }
}

/// Re-fetch one view's two raw distributions without re-running a search
pub fn compare_view(
    source: &mut dyn AggregationDataSource,
    view: &View,
    range: Option<RowRange>,
) -> Result<ViewComparison> {
    let target = fetch_distribution(source, Cohort::Target, view, range)?;
    let reference = fetch_distribution(source, Cohort::Reference, view, range)?;
    Ok(ViewComparison {
        view: view.clone(),
        target,
        reference,
    })
}

/// Summary of a finished search
#[derive(Debug, Clone, Serialize)]
pub struct SearchReport {
    pub strategy: String,
    pub measure: Measure,
    pub pruned: bool,
    pub candidates: usize,
    pub target_queries: usize,
    pub reference_queries: usize,
    pub results: Vec<RankedView>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub comparisons: Vec<ViewComparison>,
}

impl SearchReport {
    pub fn new(
        strategy: impl Into<String>,
        measure: Measure,
        pruned: bool,
        candidates: usize,
        stats: QueryStats,
        results: Vec<RankedView>,
    ) -> Self {
        Self {
            strategy: strategy.into(),
            measure,
            pruned,
            candidates,
            target_queries: stats.target_queries,
            reference_queries: stats.reference_queries,
            results,
            comparisons: Vec::new(),
        }
    }

    pub fn with_comparisons(mut self, comparisons: Vec<ViewComparison>) -> Self {
        self.comparisons = comparisons;
        self
    }

    pub fn best(&self) -> Option<&RankedView> {
        self.results.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedSource;
    use viewx_core::{AggregateFunction, AggregateQuery, AggregateRow, MeteredSource};

    /// Target has categories a and b, reference has b and c
    struct Disjoint;

    impl AggregationDataSource for Disjoint {
        fn query(&mut self, query: &AggregateQuery) -> Result<Vec<AggregateRow>> {
            Ok(match query.cohort() {
                Cohort::Target => vec![AggregateRow::new("a", vec![3.0]), AggregateRow::new("b", vec![1.0])],
                Cohort::Reference => vec![AggregateRow::new("b", vec![2.0]), AggregateRow::new("c", vec![2.0])],
            })
        }

        fn max_row_id(&mut self) -> Result<Option<u64>> {
            Ok(Some(3))
        }
    }

    #[test]
    fn test_rows_cover_category_union() {
        let view = View::new("x", AggregateFunction::Sum, "y");
        let comparison = compare_view(&mut Disjoint, &view, None).unwrap();
        let rows = comparison.rows();
        let cells: Vec<(&str, f64, f64)> = rows
            .iter()
            .map(|r| (r.category.as_str(), r.target, r.reference))
            .collect();
        assert_eq!(cells, vec![("a", 3.0, 0.0), ("b", 1.0, 2.0), ("c", 0.0, 2.0)]);
        assert!(comparison.utility(&DistanceEvaluator::new(Measure::Emd)) > 0.0);
    }

    #[test]
    fn test_compare_view_issues_two_queries() {
        let mut source = MeteredSource::new(ScriptedSource::new(&[("m", 3.0)], Some(9)));
        let view = View::new("dim", AggregateFunction::Sum, "m");
        let comparison = compare_view(&mut source, &view, Some(RowRange::new(0, 5))).unwrap();
        assert_eq!(source.stats().target_queries, 1);
        assert_eq!(source.stats().reference_queries, 1);
        assert_eq!(comparison.reference.get("b"), Some(3.0));
    }

    #[test]
    fn test_report_serializes_without_empty_comparisons() {
        let stats = QueryStats {
            target_queries: 4,
            reference_queries: 4,
            aggregates: 8,
        };
        let results = vec![RankedView::new(View::new("x", AggregateFunction::Avg, "y"), 0.25)];
        let report = SearchReport::new("sharing", Measure::Kld, false, 1, stats, results);
        assert_eq!(report.best().map(|r| r.utility), Some(0.25));

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["target_queries"], 4);
        assert_eq!(json["measure"], "kld");
        assert!(json.get("comparisons").is_none());
    }
}
