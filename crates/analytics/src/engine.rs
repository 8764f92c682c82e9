use crate::alerts::{low_liquidity_alerts, validate_threshold};
use crate::error::AnalyticsError;
use crate::filter::{filter_records, validate_date_range};
use crate::metrics::{annotate, AnnotatedObservation, AnnotatedSeries};
use crate::report::{AnalysisReport, AnalysisRequest, BranchTrend, StageOutcome, TrendOutcome};
use crate::summary::summarize;
use crate::trend::classify_trend;
use crate::volatility::classify_volatility;
use core_types::{Observation, TrendMode};

/// A stateless runner for the liquidity pipeline.
///
/// Each call is a pure function of the records and the request; nothing is
/// kept between calls and the records are never modified.
#[derive(Debug, Default)]
pub struct LiquidityEngine {}

impl LiquidityEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs filter, annotation, alerting and both classifiers.
    ///
    /// # Arguments
    ///
    /// * `records` - Observations sorted by (branch, date), as supplied by the loader.
    /// * `request` - The date range, branch selection, threshold and trend mode.
    ///
    /// # Returns
    ///
    /// An `AnalysisReport`, or `Validation` / `EmptyResult` when the run cannot
    /// proceed. Trend and volatility shortfalls are recorded inside the report.
    pub fn analyze(
        &self,
        records: &[Observation],
        request: &AnalysisRequest,
    ) -> Result<AnalysisReport, AnalyticsError> {
        validate_date_range(request.start_date, request.end_date)?;
        validate_threshold(request.threshold)?;

        tracing::info!(
            start = %request.start_date,
            end = %request.end_date,
            branch = %request.branch,
            threshold = %request.threshold,
            "Starting liquidity analysis."
        );

        let filtered = filter_records(
            records,
            request.start_date,
            request.end_date,
            &request.branch,
        )?;

        let summary = summarize(&filtered, &request.branch).ok_or_else(|| {
            AnalyticsError::EmptyResult {
                start: request.start_date,
                end: request.end_date,
                branch: request.branch.to_string(),
            }
        })?;

        let series = annotate(&filtered);
        let alerts = low_liquidity_alerts(&series, request.threshold)?;
        let trend = self.trend_outcome(&series, request.trend_mode)?;
        let volatility = StageOutcome::capture(classify_volatility(&series))?;

        tracing::info!(
            rows = series.len(),
            alerts = alerts.count(),
            "Liquidity analysis complete."
        );

        Ok(AnalysisReport {
            request: request.clone(),
            summary,
            series,
            alerts,
            trend,
            volatility,
        })
    }

    fn trend_outcome(
        &self,
        series: &AnnotatedSeries,
        mode: TrendMode,
    ) -> Result<TrendOutcome, AnalyticsError> {
        match mode {
            TrendMode::Combined => Ok(TrendOutcome::Combined(StageOutcome::capture(
                classify_trend(&series.rows),
            )?)),
            TrendMode::PerBranch => {
                let mut trends = Vec::new();
                for branch in series.branches() {
                    let rows: Vec<AnnotatedObservation> =
                        series.branch_rows(branch).cloned().collect();
                    trends.push(BranchTrend {
                        branch: branch.to_string(),
                        outcome: StageOutcome::capture(classify_trend(&rows))?,
                    });
                }
                Ok(TrendOutcome::PerBranch(trends))
            }
        }
    }
}
