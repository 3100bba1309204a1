//! Cash-out strategies.

use crate::error::SimError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Named policy governing how eagerly winners take their money
/// instead of advancing up the ladder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CashOutStrategy {
    /// Cash out early; probability falls with level.
    Low,
    /// Flat probability at every level.
    #[default]
    Average,
    /// Hold out for higher rungs; probability rises with level.
    High,
}

impl CashOutStrategy {
    pub const ALL: [CashOutStrategy; 3] = [Self::Low, Self::Average, Self::High];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Low     => "low",
            Self::Average => "average",
            Self::High    => "high",
        }
    }
}

impl fmt::Display for CashOutStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CashOutStrategy {
    type Err = SimError;

    /// Unknown names are rejected rather than defaulted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low"     => Ok(Self::Low),
            "average" => Ok(Self::Average),
            "high"    => Ok(Self::High),
            other     => Err(SimError::InvalidArgument(format!(
                "unknown cash-out strategy '{other}' (expected low, average or high)"
            ))),
        }
    }
}
