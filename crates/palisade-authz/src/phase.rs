//! Evaluation phases.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// When a check runs relative to the protected operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Before invocation. Votes; cannot see the result.
    Before,
    /// After invocation. Inspects and may transform the result.
    After,
}

impl Phase {
    /// Returns the canonical string form (`"before"` / `"after"`).
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Before => "before",
            Self::After => "after",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown phase string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown phase: {0}")]
pub struct UnknownPhase(pub String);

impl FromStr for Phase {
    type Err = UnknownPhase;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "before" => Ok(Self::Before),
            "after" => Ok(Self::After),
            other => Err(UnknownPhase(other.to_string())),
        }
    }
}
