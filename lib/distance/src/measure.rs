//! Distance measure selection

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use viewx_core::Error;

/// Divergence used to score a view
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Measure {
    /// Kullback-Leibler divergence of target from reference (asymmetric)
    #[default]
    Kld,
    /// 1-D Earth Mover's (Wasserstein-1) distance over the shared category order
    Emd,
}

impl Measure {
    pub fn as_str(&self) -> &'static str {
        match self {
            Measure::Kld => "kld",
            Measure::Emd => "emd",
        }
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Measure {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "kld" => Ok(Measure::Kld),
            "emd" => Ok(Measure::Emd),
            other => Err(Error::InvalidMeasure(other.to_string())),
        }
    }
}
