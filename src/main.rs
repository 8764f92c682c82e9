use analytics::{AnalysisRequest, AnalyticsError, LiquidityEngine};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use configuration::{Config, ConfigArgs, DataSettings};
use core_types::{BranchSelection, TrendMode};
use data_loader::{CsvLoader, CsvSchema, RecordStore};
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};

mod render;

/// The main entry point for the liquidity monitor.
fn main() -> Result<()> {
    // LIQUIDITY__* overrides may live in a .env file; it is optional.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = cli.config.load().context("Failed to load configuration")?;
    let _log_guard = configuration::init_logging(&config.logging)?;

    match cli.command {
        Commands::Analyze(args) => handle_analyze(args, &config),
        Commands::Branches(args) => handle_branches(args, &config),
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Liquidity tracking for bank branches: rolling averages, alerts and trend verdicts.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    config: ConfigArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyse the liquidity snapshot over a date range.
    Analyze(AnalyzeArgs),
    /// List the branches in the snapshot with their date coverage.
    Branches(BranchesArgs),
}

#[derive(Parser)]
struct AnalyzeArgs {
    /// CSV snapshot to read instead of `data.path` from the configuration.
    #[arg(long)]
    data: Option<PathBuf>,

    /// First day of the range (format: YYYY-MM-DD). Defaults to the earliest date in the data.
    #[arg(long)]
    from: Option<NaiveDate>,

    /// Last day of the range (format: YYYY-MM-DD). Defaults to the latest date in the data.
    #[arg(long)]
    to: Option<NaiveDate>,

    /// A branch name, or "all".
    #[arg(long, default_value = "all")]
    branch: BranchSelection,

    /// Minimum acceptable balance. Defaults to `alerts.default_threshold`.
    #[arg(long)]
    threshold: Option<Decimal>,

    /// "combined" or "per-branch". Defaults to `analysis.trend_mode`.
    #[arg(long)]
    trend_mode: Option<TrendMode>,

    /// Print the full report as JSON instead of tables.
    #[arg(long)]
    json: bool,
}

#[derive(Parser)]
struct BranchesArgs {
    /// CSV snapshot to read instead of `data.path` from the configuration.
    #[arg(long)]
    data: Option<PathBuf>,
}

// ==============================================================================
// Command Logic
// ==============================================================================

fn handle_analyze(args: AnalyzeArgs, config: &Config) -> Result<()> {
    let store = load_store(args.data.as_deref(), &config.data)?;

    let Some((min_date, max_date)) = store.date_bounds() else {
        tracing::warn!("The data file contains no observations.");
        println!("No data available.");
        return Ok(());
    };

    let threshold = config
        .alerts
        .check_threshold(args.threshold.unwrap_or(config.alerts.default_threshold))?;

    let request = AnalysisRequest {
        start_date: args.from.unwrap_or(min_date),
        end_date: args.to.unwrap_or(max_date),
        branch: args.branch,
        threshold,
        trend_mode: args.trend_mode.unwrap_or(config.analysis.trend_mode),
    };

    let report = match LiquidityEngine::new().analyze(store.records(), &request) {
        Ok(report) => report,
        Err(AnalyticsError::EmptyResult { start, end, branch }) => {
            tracing::warn!(%start, %end, %branch, "No observations in the requested range.");
            println!("No data available between {start} and {end} for '{branch}'.");
            return Ok(());
        }
        Err(e) => return Err(e).context("Liquidity analysis failed"),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        render::print_report(&report);
    }
    Ok(())
}

fn handle_branches(args: BranchesArgs, config: &Config) -> Result<()> {
    let store = load_store(args.data.as_deref(), &config.data)?;
    render::print_coverage(&store.coverage());
    Ok(())
}

fn load_store(data: Option<&Path>, settings: &DataSettings) -> Result<RecordStore> {
    let path = data.unwrap_or(settings.path.as_path());
    let loader = CsvLoader::new(CsvSchema {
        branch_column: settings.branch_column.clone(),
        date_column: settings.date_column.clone(),
        balance_column: settings.balance_column.clone(),
        date_format: settings.date_format.clone(),
    });
    loader
        .load_path(path)
        .with_context(|| format!("Failed to load liquidity data from {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_analyze_arguments() {
        let cli = Cli::try_parse_from([
            "liquidity-monitor",
            "analyze",
            "--from",
            "2024-01-01",
            "--to",
            "2024-01-31",
            "--branch",
            "Rabat",
            "--threshold",
            "85000",
            "--trend-mode",
            "per-branch",
        ])
        .expect("parse");

        let Commands::Analyze(args) = cli.command else {
            panic!("expected analyze");
        };
        assert_eq!(args.branch, BranchSelection::Branch("Rabat".to_string()));
        assert_eq!(args.threshold, Some(Decimal::from(85000)));
        assert_eq!(args.trend_mode, Some(TrendMode::PerBranch));
        assert_eq!(cli.config.config, PathBuf::from("config.toml"));
    }

    #[test]
    fn branch_defaults_to_all() {
        let cli = Cli::try_parse_from(["liquidity-monitor", "analyze"]).expect("parse");
        let Commands::Analyze(args) = cli.command else {
            panic!("expected analyze");
        };
        assert_eq!(args.branch, BranchSelection::All);
        assert!(args.from.is_none());
    }
}
