use crate::error::AnalyticsError;
use crate::metrics::{AnnotatedObservation, AnnotatedSeries};
use rust_decimal::Decimal;
use serde::Serialize;

/// Observations whose balance fell below the operator's threshold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertReport {
    pub threshold: Decimal,
    /// Lowest balance first.
    pub alerts: Vec<AnnotatedObservation>,
}

impl AlertReport {
    pub fn count(&self) -> usize {
        self.alerts.len()
    }

    pub fn is_clear(&self) -> bool {
        self.alerts.is_empty()
    }
}

/// The engine does not trust the input layer's bounds and rejects a
/// non-positive threshold on its own.
pub fn validate_threshold(threshold: Decimal) -> Result<(), AnalyticsError> {
    if threshold <= Decimal::ZERO {
        return Err(AnalyticsError::Validation(format!(
            "liquidity threshold must be positive, got {threshold}"
        )));
    }
    Ok(())
}

/// Collects every observation with `balance < threshold`, most severe first.
///
/// An empty report is the normal "no alerts" outcome, not an error.
pub fn low_liquidity_alerts(
    annotated: &AnnotatedSeries,
    threshold: Decimal,
) -> Result<AlertReport, AnalyticsError> {
    validate_threshold(threshold)?;

    let mut alerts: Vec<AnnotatedObservation> = annotated
        .rows
        .iter()
        .filter(|r| r.balance < threshold)
        .cloned()
        .collect();
    // Stable, so equal balances keep date order.
    alerts.sort_by(|a, b| a.balance.cmp(&b.balance));

    if !alerts.is_empty() {
        tracing::warn!(count = alerts.len(), %threshold, "Low liquidity detected.");
    }

    Ok(AlertReport { threshold, alerts })
}
