use crate::error::AnalyticsError;
use crate::metrics::AnnotatedObservation;
use crate::stats;
use rust_decimal::Decimal;
use serde::Serialize;

/// Number of most recent observations inspected by the trend classifier.
pub const TREND_WINDOW: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendLabel {
    Rising,
    Declining,
    Mixed,
}

impl TrendLabel {
    /// Both drifts strictly positive is rising, both strictly negative is
    /// declining. Anything else, including an undefined or zero drift, is mixed.
    pub fn from_drifts(balance_drift: Option<Decimal>, rolling_drift: Option<Decimal>) -> Self {
        match (balance_drift, rolling_drift) {
            (Some(b), Some(r)) if b > Decimal::ZERO && r > Decimal::ZERO => TrendLabel::Rising,
            (Some(b), Some(r)) if b < Decimal::ZERO && r < Decimal::ZERO => TrendLabel::Declining,
            _ => TrendLabel::Mixed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendAssessment {
    pub label: TrendLabel,
    /// Mean step of the balance across the window.
    pub balance_drift: Option<Decimal>,
    /// Mean step of the rolling average across the window, skipping undefined pairs.
    pub rolling_drift: Option<Decimal>,
    pub window_len: usize,
}

/// Labels the direction of the last `TREND_WINDOW` observations by date.
///
/// The window is drawn from whatever rows are passed in. With several
/// branches the rows are interleaved by date, not grouped; callers wanting a
/// per-branch reading pass one branch at a time.
pub fn classify_trend(rows: &[AnnotatedObservation]) -> Result<TrendAssessment, AnalyticsError> {
    if rows.len() < 2 {
        return Err(AnalyticsError::InsufficientData(format!(
            "trend needs at least 2 observations, found {}",
            rows.len()
        )));
    }

    let mut ordered: Vec<&AnnotatedObservation> = rows.iter().collect();
    ordered.sort_by_key(|r| r.date);
    let window = &ordered[ordered.len().saturating_sub(TREND_WINDOW)..];

    let out_of_range =
        || AnalyticsError::InsufficientData("trend steps exceed the decimal range".to_string());

    let balance_steps: Vec<Decimal> = window
        .windows(2)
        .map(|pair| pair[1].balance.checked_sub(pair[0].balance))
        .collect::<Option<_>>()
        .ok_or_else(out_of_range)?;
    let rolling_steps: Vec<Decimal> = window
        .windows(2)
        .filter_map(|pair| match (pair[0].rolling_average, pair[1].rolling_average) {
            (Some(prev), Some(next)) => Some(next.checked_sub(prev)),
            _ => None,
        })
        .collect::<Option<_>>()
        .ok_or_else(out_of_range)?;

    let balance_drift = Some(stats::mean(&balance_steps).ok_or_else(out_of_range)?);
    let rolling_drift = if rolling_steps.is_empty() {
        None
    } else {
        Some(stats::mean(&rolling_steps).ok_or_else(out_of_range)?)
    };
    let label = TrendLabel::from_drifts(balance_drift, rolling_drift);

    tracing::debug!(?label, ?balance_drift, ?rolling_drift, "Classified liquidity trend.");

    Ok(TrendAssessment {
        label,
        balance_drift,
        rolling_drift,
        window_len: window.len(),
    })
}
