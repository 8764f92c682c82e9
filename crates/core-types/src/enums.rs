use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the short-term trend window is drawn when several branches are selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TrendMode {
    /// Last rows of the combined, date-interleaved series. Matches the legacy report.
    #[default]
    Combined,
    /// One window per branch, each over that branch's own most recent rows.
    PerBranch,
}

impl FromStr for TrendMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "combined" => Ok(TrendMode::Combined),
            "per-branch" | "per_branch" => Ok(TrendMode::PerBranch),
            other => Err(CoreError::InvalidInput(
                "trend mode".to_string(),
                format!("expected 'combined' or 'per-branch', got '{other}'"),
            )),
        }
    }
}

impl fmt::Display for TrendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrendMode::Combined => f.write_str("combined"),
            TrendMode::PerBranch => f.write_str("per-branch"),
        }
    }
}
