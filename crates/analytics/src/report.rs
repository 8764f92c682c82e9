use crate::alerts::AlertReport;
use crate::error::AnalyticsError;
use crate::metrics::AnnotatedSeries;
use crate::summary::BalanceSummary;
use crate::trend::TrendAssessment;
use crate::volatility::VolatilityAssessment;
use chrono::NaiveDate;
use core_types::{BranchSelection, TrendMode};
use rust_decimal::Decimal;
use serde::Serialize;

/// The operator's parameters for one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisRequest {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub branch: BranchSelection,
    pub threshold: Decimal,
    pub trend_mode: TrendMode,
}

/// Result of a classification stage that may lack the data it needs.
///
/// A shortfall in one stage is recorded here instead of aborting the run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum StageOutcome<T> {
    Computed(T),
    Insufficient(String),
}

impl<T> StageOutcome<T> {
    /// Captures `InsufficientData`; every other error still propagates.
    pub fn capture(result: Result<T, AnalyticsError>) -> Result<Self, AnalyticsError> {
        match result {
            Ok(value) => Ok(StageOutcome::Computed(value)),
            Err(AnalyticsError::InsufficientData(reason)) => {
                tracing::info!(%reason, "Stage skipped for lack of data.");
                Ok(StageOutcome::Insufficient(reason))
            }
            Err(other) => Err(other),
        }
    }

    pub fn computed(&self) -> Option<&T> {
        match self {
            StageOutcome::Computed(value) => Some(value),
            StageOutcome::Insufficient(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BranchTrend {
    pub branch: String,
    pub outcome: StageOutcome<TrendAssessment>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", content = "result", rename_all = "kebab-case")]
pub enum TrendOutcome {
    Combined(StageOutcome<TrendAssessment>),
    PerBranch(Vec<BranchTrend>),
}

/// Everything the presentation layer needs from one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub request: AnalysisRequest,
    pub summary: BalanceSummary,
    pub series: AnnotatedSeries,
    pub alerts: AlertReport,
    pub trend: TrendOutcome,
    pub volatility: StageOutcome<VolatilityAssessment>,
}
