//! Query-sharing search
//!
//! Views that group by the same dimension are answered by one query per
//! cohort computing all of their aggregates at once. The result columns are
//! sliced back into per-view distributions and scored exactly like
//! [`NaiveSearch`](crate::NaiveSearch), so both strategies rank identically.

use crate::strategy::{order_by_utility, RankedView, SearchStrategy};
use ahash::AHashMap;
use tracing::debug;
use viewx_core::{
    split_columns, AggregateQuery, AggregationDataSource, Cohort, Result, RowRange, View,
};
use viewx_distance::DistanceEvaluator;

/// Strategy issuing `2 × |distinct dimensions|` queries
#[derive(Debug, Clone, Default)]
pub struct SharingSearch {
    evaluator: DistanceEvaluator,
}

impl SharingSearch {
    pub fn new(evaluator: DistanceEvaluator) -> Self {
        Self { evaluator }
    }

    pub fn evaluator(&self) -> &DistanceEvaluator {
        &self.evaluator
    }
}

/// Indices of `views` grouped by dimension, groups in first-appearance order
pub(crate) fn group_by_dimension(views: &[View]) -> Vec<Vec<usize>> {
    let mut slots: AHashMap<&str, usize> = AHashMap::new();
    let mut groups: Vec<Vec<usize>> = Vec::new();
    for (i, view) in views.iter().enumerate() {
        let slot = *slots.entry(view.dimension()).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[slot].push(i);
    }
    groups
}

impl SearchStrategy for SharingSearch {
    fn name(&self) -> &'static str {
        "sharing"
    }

    fn rank(
        &self,
        source: &mut dyn AggregationDataSource,
        views: &[View],
        range: Option<RowRange>,
        top_k: Option<usize>,
    ) -> Result<Vec<RankedView>> {
        let mut utilities = vec![0.0; views.len()];

        for group in group_by_dimension(views) {
            let members: Vec<&View> = group.iter().map(|&i| &views[i]).collect();
            let width = members.len();

            let target_rows =
                source.query(&AggregateQuery::for_group(Cohort::Target, &members, range)?)?;
            let reference_rows =
                source.query(&AggregateQuery::for_group(Cohort::Reference, &members, range)?)?;
            let targets = split_columns(&target_rows, width)?;
            let references = split_columns(&reference_rows, width)?;

            for ((&i, target), reference) in group.iter().zip(&targets).zip(&references) {
                utilities[i] = self.evaluator.evaluate(target, reference);
            }
            debug!(
                dimension = members[0].dimension(),
                views = width,
                "scored shared group"
            );
        }

        let results = views
            .iter()
            .cloned()
            .zip(utilities)
            .map(|(view, utility)| RankedView::new(view, utility))
            .collect();
        Ok(order_by_utility(results, top_k))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::naive::NaiveSearch;
    use crate::testing::{all_views, census, scripted_views, ScriptedSource};
    use viewx_core::{AggregateFunction, Error, MeteredSource};
    use viewx_distance::Measure;

    #[test]
    fn test_group_by_dimension_first_appearance() {
        let views = vec![
            View::new("race", AggregateFunction::Sum, "age"),
            View::new("sex", AggregateFunction::Sum, "age"),
            View::new("race", AggregateFunction::Avg, "age"),
            View::new("sex", AggregateFunction::Max, "hours"),
            View::new("race", AggregateFunction::Min, "hours"),
        ];
        assert_eq!(group_by_dimension(&views), vec![vec![0, 2, 4], vec![1, 3]]);
        assert!(group_by_dimension(&[]).is_empty());
    }

    #[test]
    fn test_matches_naive_over_whole_dataset() {
        let mut dataset = census(300);
        let views = all_views(&dataset);
        for measure in [Measure::Kld, Measure::Emd] {
            let evaluator = DistanceEvaluator::new(measure);
            let naive = NaiveSearch::new(evaluator.clone())
                .rank(&mut dataset, &views, None, None)
                .unwrap();
            let sharing = SharingSearch::new(evaluator)
                .rank(&mut dataset, &views, None, None)
                .unwrap();
            assert_eq!(naive, sharing);
        }
    }

    #[test]
    fn test_matches_naive_on_partition() {
        let mut dataset = census(300);
        let views = all_views(&dataset);
        let range = Some(RowRange::new(100, 160));
        let naive = NaiveSearch::default().rank(&mut dataset, &views, range, Some(7)).unwrap();
        let sharing = SharingSearch::default().rank(&mut dataset, &views, range, Some(7)).unwrap();
        assert_eq!(naive, sharing);
    }

    #[test]
    fn test_two_queries_per_dimension() {
        let views = vec![
            View::new("sex", AggregateFunction::Sum, "age"),
            View::new("sex", AggregateFunction::Avg, "hours_per_week"),
            View::new("sex", AggregateFunction::Max, "capital_gain"),
            View::new("race", AggregateFunction::Sum, "age"),
            View::new("race", AggregateFunction::Min, "hours_per_week"),
        ];

        let mut shared = MeteredSource::new(census(100));
        let ranked = SharingSearch::default().rank(&mut shared, &views, None, None).unwrap();
        assert_eq!(ranked.len(), 5);
        assert_eq!(shared.stats().total_queries(), 4);
        assert_eq!(shared.stats().aggregates, 10);

        let mut naive = MeteredSource::new(census(100));
        NaiveSearch::default().rank(&mut naive, &views, None, None).unwrap();
        assert_eq!(naive.stats().total_queries(), 10);
    }

    #[test]
    fn test_scripted_columns_are_sliced_per_view() {
        let mut source = ScriptedSource::new(&[("strong", 20.0), ("medium", 3.0)], Some(9));
        let views = scripted_views(&["flat", "strong", "medium"]);
        let ranked = SharingSearch::default().rank(&mut source, &views, None, Some(2)).unwrap();
        let order: Vec<&str> = ranked.iter().map(|r| r.view.measure()).collect();
        assert_eq!(order, vec!["strong", "medium"]);
        assert_eq!(source.cohorts(), vec![Cohort::Target, Cohort::Reference]);
    }

    #[test]
    fn test_target_query_precedes_reference_per_group() {
        let mut source = ScriptedSource::new(&[], Some(9));
        let views = vec![
            View::new("race", AggregateFunction::Sum, "a"),
            View::new("sex", AggregateFunction::Sum, "a"),
            View::new("race", AggregateFunction::Avg, "b"),
        ];
        SharingSearch::default().rank(&mut source, &views, None, None).unwrap();
        assert_eq!(
            source.cohorts(),
            vec![Cohort::Target, Cohort::Reference, Cohort::Target, Cohort::Reference]
        );
    }

    #[test]
    fn test_failure_propagates() {
        let mut source = ScriptedSource::new(&[], Some(9));
        source.fail_after = Some(1);
        let views = scripted_views(&["a", "b"]);
        let result = SharingSearch::default().rank(&mut source, &views, None, None);
        assert!(matches!(result, Err(Error::DataSource(_))));
    }
}
