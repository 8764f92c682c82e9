use crate::error::CoreError;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One liquidity reading: the closing balance of a branch on a given day.
///
/// Balances may be zero or negative (an overdrawn branch is still a valid reading).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    pub branch: String,
    pub date: NaiveDate,
    pub balance: Decimal,
}

impl Observation {
    pub fn new(branch: impl Into<String>, date: NaiveDate, balance: Decimal) -> Self {
        Self {
            branch: branch.into(),
            date,
            balance,
        }
    }
}

/// Which branches an analysis run looks at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BranchSelection {
    #[default]
    All,
    Branch(String),
}

impl BranchSelection {
    /// The sentinel accepted on input surfaces for "every branch".
    pub const ALL_SENTINEL: &'static str = "all";

    pub fn matches(&self, branch: &str) -> bool {
        match self {
            BranchSelection::All => true,
            BranchSelection::Branch(name) => name == branch,
        }
    }

    pub fn is_single(&self) -> bool {
        matches!(self, BranchSelection::Branch(_))
    }
}

impl FromStr for BranchSelection {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(CoreError::InvalidInput(
                "branch".to_string(),
                "branch name must not be empty".to_string(),
            ));
        }
        if trimmed.eq_ignore_ascii_case(Self::ALL_SENTINEL) {
            Ok(BranchSelection::All)
        } else {
            Ok(BranchSelection::Branch(trimmed.to_string()))
        }
    }
}

impl fmt::Display for BranchSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BranchSelection::All => f.write_str(Self::ALL_SENTINEL),
            BranchSelection::Branch(name) => f.write_str(name),
        }
    }
}
