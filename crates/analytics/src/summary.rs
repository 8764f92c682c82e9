use crate::stats;
use core_types::{BranchSelection, Observation};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashSet;

/// Headline figures for the filtered set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BalanceSummary {
    pub day_count: usize,
    pub branch_count: usize,
    /// `None` when the balance total leaves the decimal range.
    pub mean_balance: Option<Decimal>,
    /// Only reported when a single branch is selected.
    pub single_branch: Option<BranchExtremes>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BranchExtremes {
    pub min_balance: Decimal,
    pub max_balance: Decimal,
    /// Sample standard deviation, `None` with fewer than two rows.
    pub std_dev_balance: Option<Decimal>,
}

/// Returns `None` for an empty slice; the filter stage never hands one over.
pub fn summarize(filtered: &[Observation], selection: &BranchSelection) -> Option<BalanceSummary> {
    if filtered.is_empty() {
        return None;
    }
    let balances: Vec<Decimal> = filtered.iter().map(|o| o.balance).collect();
    let mean_balance = stats::mean(&balances);

    let day_count = filtered.iter().map(|o| o.date).collect::<HashSet<_>>().len();
    let branch_count = filtered
        .iter()
        .map(|o| o.branch.as_str())
        .collect::<HashSet<_>>()
        .len();

    let single_branch = if selection.is_single() {
        let min_balance = balances.iter().copied().min()?;
        let max_balance = balances.iter().copied().max()?;
        Some(BranchExtremes {
            min_balance,
            max_balance,
            std_dev_balance: stats::sample_std_dev(&balances),
        })
    } else {
        None
    };

    Some(BalanceSummary {
        day_count,
        branch_count,
        mean_balance,
        single_branch,
    })
}
