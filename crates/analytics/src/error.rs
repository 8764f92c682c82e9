use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalyticsError {
    /// The caller's parameters contradict each other or are out of domain.
    #[error("Invalid analysis parameters: {0}")]
    Validation(String),

    #[error("No observations between {start} and {end} for branch selection '{branch}'")]
    EmptyResult {
        start: NaiveDate,
        end: NaiveDate,
        branch: String,
    },

    #[error("Not enough data to perform calculation: {0}")]
    InsufficientData(String),
}
