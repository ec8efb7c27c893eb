use serde::{Deserialize, Serialize};
use viewx_core::{AggregationDataSource, Result, RowRange, View};

/// A view with its utility score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedView {
    pub view: View,
    pub utility: f64,
}

impl RankedView {
    pub fn new(view: View, utility: f64) -> Self {
        Self { view, utility }
    }
}

/// Scores a set of views against a data source and ranks them
pub trait SearchStrategy {
    fn name(&self) -> &'static str;

    /// Score every view over `range` (the whole dataset when `None`) and
    /// return them sorted by descending utility, truncated to `top_k` when
    /// given. Ties keep the input order of `views`.
    fn rank(
        &self,
        source: &mut dyn AggregationDataSource,
        views: &[View],
        range: Option<RowRange>,
        top_k: Option<usize>,
    ) -> Result<Vec<RankedView>>;
}

impl<S: SearchStrategy + ?Sized> SearchStrategy for Box<S> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn rank(
        &self,
        source: &mut dyn AggregationDataSource,
        views: &[View],
        range: Option<RowRange>,
        top_k: Option<usize>,
    ) -> Result<Vec<RankedView>> {
        (**self).rank(source, views, range, top_k)
    }
}

/// Sort by score descending (stable) and cut to `top_k`
pub(crate) fn order_by_utility(mut results: Vec<RankedView>, top_k: Option<usize>) -> Vec<RankedView> {
    results.sort_by(|a, b| {
        b.utility.partial_cmp(&a.utility).unwrap_or(std::cmp::Ordering::Equal)
    });
    if let Some(k) = top_k {
        results.truncate(k);
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use viewx_core::AggregateFunction;

    #[test]
    fn test_order_is_stable_on_ties() {
        let v = |m: &str| View::new("d", AggregateFunction::Sum, m);
        let ranked = order_by_utility(
            vec![
                RankedView::new(v("a"), 0.5),
                RankedView::new(v("b"), 0.9),
                RankedView::new(v("c"), 0.5),
            ],
            None,
        );
        let order: Vec<&str> = ranked.iter().map(|r| r.view.measure()).collect();
        assert_eq!(order, vec!["b", "a", "c"]);

        let top = order_by_utility(ranked, Some(1));
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].view.measure(), "b");
    }
}
