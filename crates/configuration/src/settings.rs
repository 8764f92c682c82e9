use crate::error::ConfigError;
use core_types::TrendMode;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub data: DataSettings,
    #[serde(default)]
    pub alerts: AlertSettings,
    #[serde(default)]
    pub analysis: AnalysisSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Where the balance snapshot lives and how its columns are named.
#[derive(Debug, Clone, Deserialize)]
pub struct DataSettings {
    /// Path to the CSV snapshot, re-read in full on every run.
    pub path: PathBuf,
    #[serde(default = "default_branch_column")]
    pub branch_column: String,
    #[serde(default = "default_date_column")]
    pub date_column: String,
    #[serde(default = "default_balance_column")]
    pub balance_column: String,
    /// A chrono format string, e.g. `%Y-%m-%d`.
    #[serde(default = "default_date_format")]
    pub date_format: String,
}

/// Bounds of the operator's threshold input.
///
/// The engine only insists on a positive threshold; this range is enforced at
/// the input surface before a run starts.
#[derive(Debug, Clone, Deserialize)]
pub struct AlertSettings {
    pub default_threshold: Decimal,
    pub min_threshold: Decimal,
    pub max_threshold: Decimal,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalysisSettings {
    #[serde(default)]
    pub trend_mode: TrendMode,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    /// Used when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// When set, logs are also written to a daily rolling file in this directory.
    #[serde(default)]
    pub directory: Option<PathBuf>,
    #[serde(default = "default_log_file_prefix")]
    pub file_prefix: String,
}

fn default_branch_column() -> String {
    "branch".to_string()
}

fn default_date_column() -> String {
    "date".to_string()
}

fn default_balance_column() -> String {
    "balance".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file_prefix() -> String {
    "liquidity-monitor.log".to_string()
}

// --- Default Implementations ---

impl Default for AlertSettings {
    fn default() -> Self {
        Self {
            default_threshold: dec!(80000),
            min_threshold: dec!(10000),
            max_threshold: dec!(200000),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            directory: None,
            file_prefix: default_log_file_prefix(),
        }
    }
}

impl AlertSettings {
    /// Checks an operator-supplied threshold against the configured range.
    pub fn check_threshold(&self, threshold: Decimal) -> Result<Decimal, ConfigError> {
        if threshold < self.min_threshold || threshold > self.max_threshold {
            return Err(ConfigError::ValidationError(format!(
                "threshold {threshold} is outside the allowed range [{}, {}]",
                self.min_threshold, self.max_threshold
            )));
        }
        Ok(threshold)
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let alerts = &self.alerts;
        if alerts.min_threshold <= Decimal::ZERO {
            return Err(ConfigError::ValidationError(
                "alerts.min_threshold must be positive".to_string(),
            ));
        }
        if alerts.min_threshold > alerts.max_threshold {
            return Err(ConfigError::ValidationError(
                "alerts.min_threshold must not exceed alerts.max_threshold".to_string(),
            ));
        }
        alerts.check_threshold(alerts.default_threshold).map_err(|_| {
            ConfigError::ValidationError(
                "alerts.default_threshold must lie within [min_threshold, max_threshold]"
                    .to_string(),
            )
        })?;

        let columns = [
            ("data.branch_column", &self.data.branch_column),
            ("data.date_column", &self.data.date_column),
            ("data.balance_column", &self.data.balance_column),
            ("data.date_format", &self.data.date_format),
        ];
        for (key, value) in columns {
            if value.trim().is_empty() {
                return Err(ConfigError::ValidationError(format!("{key} must not be empty")));
            }
        }
        Ok(())
    }
}
