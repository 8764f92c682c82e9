use crate::error::AnalyticsError;
use crate::metrics::AnnotatedSeries;
use crate::stats;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

/// Dispersion above this many percentage points is high volatility.
pub const HIGH_VOLATILITY_PCT: Decimal = dec!(15);
/// Dispersion above this many percentage points (and up to the high bound) is moderate.
pub const MODERATE_VOLATILITY_PCT: Decimal = dec!(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VolatilityLabel {
    High,
    Moderate,
    Stable,
}

impl VolatilityLabel {
    pub fn from_std_dev(std_dev: Decimal) -> Self {
        if std_dev > HIGH_VOLATILITY_PCT {
            VolatilityLabel::High
        } else if std_dev > MODERATE_VOLATILITY_PCT {
            VolatilityLabel::Moderate
        } else {
            VolatilityLabel::Stable
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolatilityAssessment {
    pub label: VolatilityLabel,
    pub mean_pct_change: Decimal,
    /// Sample standard deviation; zero when only one change is defined.
    pub std_dev_pct_change: Decimal,
    pub sample_size: usize,
}

/// Summarizes the spread of every defined percentage change in the filtered set.
pub fn classify_volatility(annotated: &AnnotatedSeries) -> Result<VolatilityAssessment, AnalyticsError> {
    let changes = annotated.pct_changes();
    if changes.is_empty() {
        return Err(AnalyticsError::InsufficientData(
            "volatility needs at least one defined percentage change".to_string(),
        ));
    }
    let out_of_range = || {
        AnalyticsError::InsufficientData(
            "percentage changes are too large to summarise within the decimal range".to_string(),
        )
    };
    let mean_pct_change = stats::mean(&changes).ok_or_else(out_of_range)?;
    let std_dev_pct_change = if changes.len() == 1 {
        Decimal::ZERO
    } else {
        stats::sample_std_dev(&changes).ok_or_else(out_of_range)?
    };
    let label = VolatilityLabel::from_std_dev(std_dev_pct_change);

    tracing::debug!(
        ?label,
        %mean_pct_change,
        %std_dev_pct_change,
        samples = changes.len(),
        "Classified liquidity volatility."
    );

    Ok(VolatilityAssessment {
        label,
        mean_pct_change,
        std_dev_pct_change,
        sample_size: changes.len(),
    })
}
