use analytics::{
    AnalysisReport, AnnotatedObservation, StageOutcome, TrendAssessment, TrendLabel, TrendOutcome,
    VolatilityLabel,
};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};
use data_loader::BranchCoverage;
use rust_decimal::{Decimal, RoundingStrategy};

pub fn print_report(report: &AnalysisReport) {
    print_summary(report);
    print_alerts(report);
    print_daily(report);
    print_trend(&report.trend);
    print_volatility(report);
}

pub fn print_coverage(coverage: &[BranchCoverage]) {
    let mut table = new_table(&["Branch", "Rows", "First date", "Last date"]);
    for c in coverage {
        table.add_row(vec![
            Cell::new(&c.branch),
            Cell::new(c.rows).set_alignment(CellAlignment::Right),
            Cell::new(c.first_date),
            Cell::new(c.last_date),
        ]);
    }
    println!("{table}");
}

fn print_summary(report: &AnalysisReport) {
    let s = &report.summary;
    println!("== Summary ==");
    println!("Days:            {}", s.day_count);
    println!("Branches:        {}", s.branch_count);
    match s.mean_balance {
        Some(mean) => println!("Average balance: {}", mean.trunc()),
        None => println!("Average balance: n/a"),
    }
    if let Some(ext) = &s.single_branch {
        println!("Lowest balance:  {}", ext.min_balance);
        println!("Highest balance: {}", ext.max_balance);
        match ext.std_dev_balance {
            Some(sd) => println!("Std deviation:   {}", money(sd)),
            None => println!("Std deviation:   n/a"),
        }
    }
    println!();
}

fn print_alerts(report: &AnalysisReport) {
    println!("== Low liquidity (threshold {}) ==", report.alerts.threshold);
    if report.alerts.is_clear() {
        println!("No liquidity problems at present.");
    } else {
        println!("Liquidity shortfall! Alerts: {}", report.alerts.count());
        println!("{}", observation_table(report.alerts.alerts.iter()));
    }
    println!();
}

fn print_daily(report: &AnalysisReport) {
    println!("== Daily data ==");
    println!("{}", observation_table(report.series.latest_first().into_iter()));
    for anomaly in &report.series.division_anomalies {
        println!(
            "Note: {} on {} follows a zero balance; its change is undefined.",
            anomaly.branch, anomaly.date
        );
    }
    println!();
}

fn print_trend(trend: &TrendOutcome) {
    println!("== Trend ==");
    match trend {
        TrendOutcome::Combined(outcome) => println!("{}", trend_line(outcome)),
        TrendOutcome::PerBranch(branches) => {
            for b in branches {
                println!("{}: {}", b.branch, trend_line(&b.outcome));
            }
        }
    }
    println!();
}

fn print_volatility(report: &AnalysisReport) {
    println!("== Daily change ==");
    match &report.volatility {
        StageOutcome::Computed(v) => {
            println!("Average change: {}%", money(v.mean_pct_change));
            println!("Volatility:     {}%", money(v.std_dev_pct_change));
            let verdict = match v.label {
                VolatilityLabel::High => "Large swings point to instability.",
                VolatilityLabel::Moderate => "Moderate fluctuations.",
                VolatilityLabel::Stable => "Liquidity is stable.",
            };
            println!("{verdict}");
        }
        StageOutcome::Insufficient(reason) => println!("Insufficient data: {reason}"),
    }
}

fn trend_line(outcome: &StageOutcome<TrendAssessment>) -> String {
    match outcome {
        StageOutcome::Computed(t) => match t.label {
            TrendLabel::Rising => "Liquidity is on a steady upward trend.".to_string(),
            TrendLabel::Declining => "Liquidity keeps falling.".to_string(),
            TrendLabel::Mixed => "Liquidity has fluctuated over the last few days.".to_string(),
        },
        StageOutcome::Insufficient(reason) => format!("Insufficient data: {reason}"),
    }
}

fn observation_table<'a>(rows: impl Iterator<Item = &'a AnnotatedObservation>) -> Table {
    let mut table = new_table(&["Branch", "Date", "Balance", "Rolling avg", "Change %"]);
    for r in rows {
        table.add_row(vec![
            Cell::new(&r.branch),
            Cell::new(r.date),
            Cell::new(r.balance).set_alignment(CellAlignment::Right),
            Cell::new(optional(r.rolling_average)).set_alignment(CellAlignment::Right),
            Cell::new(optional(r.pct_change)).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

fn new_table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header.to_vec());
    table
}

/// Two decimal places, half away from zero.
fn money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

fn optional(value: Option<Decimal>) -> String {
    value.map(|v| money(v).to_string()).unwrap_or_else(|| "-".to_string())
}
