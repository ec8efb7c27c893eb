use crate::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Aggregation applied to a measure column inside each group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregateFunction {
    Sum,
    Max,
    Min,
    Avg,
    Count,
}

impl AggregateFunction {
    pub const ALL: [AggregateFunction; 5] = [
        AggregateFunction::Sum,
        AggregateFunction::Max,
        AggregateFunction::Min,
        AggregateFunction::Avg,
        AggregateFunction::Count,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AggregateFunction::Sum => "sum",
            AggregateFunction::Max => "max",
            AggregateFunction::Min => "min",
            AggregateFunction::Avg => "avg",
            AggregateFunction::Count => "count",
        }
    }
}

impl fmt::Display for AggregateFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AggregateFunction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sum" => Ok(AggregateFunction::Sum),
            "max" => Ok(AggregateFunction::Max),
            "min" => Ok(AggregateFunction::Min),
            "avg" => Ok(AggregateFunction::Avg),
            "count" => Ok(AggregateFunction::Count),
            other => Err(Error::InvalidConfig(format!("unknown aggregate function '{}'", other))),
        }
    }
}

/// A candidate aggregate view: `SELECT dimension, function(measure) ... GROUP BY dimension`
///
/// Views are plain values. Equality, hashing and ordering are structural so the
/// same view produced by different strategies compares equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct View {
    dimension: String,
    function: AggregateFunction,
    measure: String,
}

impl View {
    pub fn new(
        dimension: impl Into<String>,
        function: AggregateFunction,
        measure: impl Into<String>,
    ) -> Self {
        Self {
            dimension: dimension.into(),
            function,
            measure: measure.into(),
        }
    }

    /// The grouping column
    pub fn dimension(&self) -> &str {
        &self.dimension
    }

    pub fn function(&self) -> AggregateFunction {
        self.function
    }

    /// The aggregated column
    pub fn measure(&self) -> &str {
        &self.measure
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}) by {}", self.function, self.measure, self.dimension)
    }
}
