//! Progressive search with statistical pruning
//!
//! The dataset is scanned in `M` consecutive row-id partitions. After each
//! partition the inner strategy scores every surviving view on that slice and
//! the running mean utility of each view is updated. From the second
//! partition on, a view is dropped once even the optimistic end of its
//! confidence band falls below the pessimistic end of the current k-th best
//! view's band. Survivors are finally ranked over the whole dataset.

use crate::bound::{hoeffding_serfling_epsilon, DEFAULT_ALPHA};
use crate::observer::{NoopObserver, SearchEvent, SearchObserver};
use crate::strategy::{RankedView, SearchStrategy};
use ahash::AHashMap;
use tracing::{debug, info};
use viewx_core::{AggregationDataSource, Error, Result, RowRange, View};

/// Cumulative mean utility of a view over the partitions seen so far
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunningEstimate {
    pub mean: f64,
    pub partitions: usize,
}

impl RunningEstimate {
    pub fn update(&mut self, utility: f64) {
        let n = self.partitions as f64;
        self.mean = (n * self.mean + utility) / (n + 1.0);
        self.partitions += 1;
    }
}

/// Wraps an inner strategy with partition-wise pruning
#[derive(Debug, Clone)]
pub struct PruningSearch<S> {
    inner: S,
    partitions: usize,
    alpha: f64,
}

impl<S: SearchStrategy> PruningSearch<S> {
    pub fn new(inner: S, partitions: usize) -> Result<Self> {
        if partitions == 0 {
            return Err(Error::InvalidConfig("partitions must be at least 1".to_string()));
        }
        Ok(Self {
            inner,
            partitions,
            alpha: DEFAULT_ALPHA,
        })
    }

    /// Significance level of the confidence band, in `(0, 1)`
    pub fn with_alpha(mut self, alpha: f64) -> Result<Self> {
        if !(alpha > 0.0 && alpha < 1.0) {
            return Err(Error::InvalidConfig(format!("alpha must be in (0, 1), got {}", alpha)));
        }
        self.alpha = alpha;
        Ok(self)
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn partitions(&self) -> usize {
        self.partitions
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn run(
        &self,
        source: &mut dyn AggregationDataSource,
        views: &[View],
        top_k: usize,
    ) -> Result<Vec<RankedView>> {
        self.run_observed(source, views, top_k, &mut NoopObserver)
    }

    pub fn run_observed(
        &self,
        source: &mut dyn AggregationDataSource,
        views: &[View],
        top_k: usize,
        observer: &mut dyn SearchObserver,
    ) -> Result<Vec<RankedView>> {
        if top_k == 0 {
            return Err(Error::InvalidConfig("top_k must be at least 1".to_string()));
        }
        if views.len() < top_k {
            return Err(Error::InsufficientViews {
                requested: top_k,
                available: views.len(),
            });
        }

        let mut current: Vec<View> = views.to_vec();

        match source.max_row_id()? {
            Some(max_id) => {
                // ceil((max_id + 1) / M) without overflowing at u64::MAX
                let width = max_id / self.partitions as u64 + 1;
                self.prune(source, &mut current, width, top_k, observer)?;
            }
            None => debug!("data source is empty, skipping partition phase"),
        }

        let ranked = self.inner.rank(source, &current, None, Some(top_k))?;
        info!(
            strategy = self.inner.name(),
            candidates = views.len(),
            survivors = current.len(),
            "pruning search finished"
        );
        observer.on_event(&SearchEvent::Finished {
            strategy: self.inner.name(),
            candidates: views.len(),
            survivors: current.len(),
            returned: ranked.len(),
        });
        Ok(ranked)
    }

    fn prune(
        &self,
        source: &mut dyn AggregationDataSource,
        current: &mut Vec<View>,
        width: u64,
        top_k: usize,
        observer: &mut dyn SearchObserver,
    ) -> Result<()> {
        let mut estimates: AHashMap<View, RunningEstimate> = AHashMap::new();

        for i in 0..self.partitions {
            if current.len() <= top_k {
                debug!(partition = i, survivors = current.len(), "nothing left to prune");
                observer.on_event(&SearchEvent::StoppedEarly {
                    partition: i,
                    survivors: current.len(),
                });
                break;
            }

            let lo = (i as u64).saturating_mul(width);
            let range = RowRange::new(lo, lo.saturating_add(width));
            for scored in self.inner.rank(source, current.as_slice(), Some(range), None)? {
                estimates.entry(scored.view).or_default().update(scored.utility);
            }

            let mean_of = |view: &View| estimates.get(view).map(|e| e.mean).unwrap_or(0.0);
            let max_utility = current.iter().map(mean_of).fold(0.0, f64::max);
            let scale = if max_utility > 0.0 { max_utility } else { 1.0 };
            let normalized: Vec<f64> = current.iter().map(|v| mean_of(v) / scale).collect();

            let mut sorted = normalized.clone();
            sorted.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));
            let kth = sorted[top_k - 1];

            if i == 0 {
                debug!(partition = i, %range, kth, "first partition, no pruning");
                observer.on_event(&SearchEvent::PartitionCompleted {
                    partition: i,
                    range,
                    epsilon: None,
                    kth_estimate: kth,
                    survivors: current.clone(),
                    pruned: Vec::new(),
                });
                continue;
            }

            let epsilon = hoeffding_serfling_epsilon(i + 1, self.partitions, self.alpha);
            let (kept, pruned): (Vec<_>, Vec<_>) = current
                .drain(..)
                .zip(normalized)
                .partition(|(_, norm)| norm + epsilon >= kth - epsilon);
            *current = kept.into_iter().map(|(view, _)| view).collect();
            let pruned: Vec<View> = pruned.into_iter().map(|(view, _)| view).collect();

            if !pruned.is_empty() {
                info!(
                    partition = i,
                    pruned = pruned.len(),
                    survivors = current.len(),
                    epsilon,
                    "pruned views"
                );
            }
            observer.on_event(&SearchEvent::PartitionCompleted {
                partition: i,
                range,
                epsilon: Some(epsilon),
                kth_estimate: kth,
                survivors: current.clone(),
                pruned,
            });
        }
        Ok(())
    }
}
