//! Search configuration
//!
//! A declarative description of one search run: which strategy, which
//! measure, how many results, and whether to wrap the strategy in pruning.
//! Every field has a default so partial JSON documents are accepted.

use crate::bound::DEFAULT_ALPHA;
use crate::naive::NaiveSearch;
use crate::observer::{NoopObserver, SearchObserver};
use crate::pruning::PruningSearch;
use crate::sharing::SharingSearch;
use crate::strategy::{RankedView, SearchStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use viewx_core::{AggregationDataSource, Error, Result, View};
use viewx_distance::{DistanceEvaluator, Measure, DEFAULT_FLOOR};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    Naive,
    #[default]
    Sharing,
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyKind::Naive => f.write_str("naive"),
            StrategyKind::Sharing => f.write_str("sharing"),
        }
    }
}

impl FromStr for StrategyKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "naive" => Ok(StrategyKind::Naive),
            "sharing" => Ok(StrategyKind::Sharing),
            other => Err(Error::InvalidConfig(format!("unknown strategy '{}'", other))),
        }
    }
}

/// Partition-wise pruning parameters
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PruningConfig {
    #[serde(default = "default_partitions")]
    pub partitions: usize,

    /// Significance level of the confidence band
    #[serde(default = "default_alpha")]
    pub alpha: f64,
}

fn default_partitions() -> usize {
    10
}

fn default_alpha() -> f64 {
    DEFAULT_ALPHA
}

impl Default for PruningConfig {
    fn default() -> Self {
        Self {
            partitions: default_partitions(),
            alpha: default_alpha(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchConfig {
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    #[serde(default)]
    pub measure: Measure,

    #[serde(default)]
    pub strategy: StrategyKind,

    /// Wrap the strategy in pruning-based search when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pruning: Option<PruningConfig>,

    /// Lower bound applied to probabilities before scoring
    #[serde(default = "default_floor")]
    pub smoothing_floor: f64,
}

fn default_top_k() -> usize {
    5
}

fn default_floor() -> f64 {
    DEFAULT_FLOOR
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            measure: Measure::default(),
            strategy: StrategyKind::default(),
            pruning: None,
            smoothing_floor: default_floor(),
        }
    }
}

impl SearchConfig {
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: SearchConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.top_k == 0 {
            return Err(Error::InvalidConfig("top_k must be at least 1".to_string()));
        }
        if let Some(pruning) = &self.pruning {
            if pruning.partitions == 0 {
                return Err(Error::InvalidConfig("partitions must be at least 1".to_string()));
            }
            if !(pruning.alpha > 0.0 && pruning.alpha < 1.0) {
                return Err(Error::InvalidConfig(format!(
                    "alpha must be in (0, 1), got {}",
                    pruning.alpha
                )));
            }
        }
        self.evaluator().map(|_| ())
    }

    pub fn evaluator(&self) -> Result<DistanceEvaluator> {
        DistanceEvaluator::new(self.measure).with_floor(self.smoothing_floor)
    }

    /// The configured inner strategy, without pruning
    pub fn strategy(&self) -> Result<Box<dyn SearchStrategy>> {
        let evaluator = self.evaluator()?;
        Ok(match self.strategy {
            StrategyKind::Naive => Box::new(NaiveSearch::new(evaluator)),
            StrategyKind::Sharing => Box::new(SharingSearch::new(evaluator)),
        })
    }

    pub fn run(
        &self,
        source: &mut dyn AggregationDataSource,
        views: &[View],
    ) -> Result<Vec<RankedView>> {
        self.run_observed(source, views, &mut NoopObserver)
    }

    /// Run the configured search over the whole dataset
    pub fn run_observed(
        &self,
        source: &mut dyn AggregationDataSource,
        views: &[View],
        observer: &mut dyn SearchObserver,
    ) -> Result<Vec<RankedView>> {
        self.validate()?;
        let strategy = self.strategy()?;
        match self.pruning {
            Some(pruning) => PruningSearch::new(strategy, pruning.partitions)?
                .with_alpha(pruning.alpha)?
                .run_observed(source, views, self.top_k, observer),
            None => strategy.rank(source, views, None, Some(self.top_k)),
        }
    }
}
