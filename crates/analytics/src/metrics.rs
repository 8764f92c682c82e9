use crate::stats;
use chrono::NaiveDate;
use core_types::Observation;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

/// Number of observations in the trailing rolling-average window.
pub const ROLLING_WINDOW: usize = 3;

/// An observation together with the metrics derived from its branch history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotatedObservation {
    pub branch: String,
    pub date: NaiveDate,
    pub balance: Decimal,
    /// Mean balance over this and the two preceding observations of the branch.
    pub rolling_average: Option<Decimal>,
    /// Change from the preceding observation of the branch, in percent.
    pub pct_change: Option<Decimal>,
}

/// A percentage change that could not be computed because the prior balance was zero.
///
/// The affected row keeps `pct_change = None` and is left out of every statistic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DivisionAnomaly {
    pub branch: String,
    pub date: NaiveDate,
}

/// The filtered set with derived columns, merged back into date order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotatedSeries {
    pub rows: Vec<AnnotatedObservation>,
    pub division_anomalies: Vec<DivisionAnomaly>,
}

impl AnnotatedSeries {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Defined percentage changes across every branch, in row order.
    pub fn pct_changes(&self) -> Vec<Decimal> {
        self.rows.iter().filter_map(|r| r.pct_change).collect()
    }

    /// Rows newest first, as shown in the daily table.
    pub fn latest_first(&self) -> Vec<&AnnotatedObservation> {
        let mut rows: Vec<_> = self.rows.iter().collect();
        rows.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.branch.cmp(&b.branch)));
        rows
    }

    /// Rows of a single branch, oldest first.
    pub fn branch_rows<'a>(&'a self, branch: &'a str) -> impl Iterator<Item = &'a AnnotatedObservation> + 'a {
        self.rows.iter().filter(move |r| r.branch == branch)
    }

    /// Distinct branch identifiers, sorted.
    pub fn branches(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.rows.iter().map(|r| r.branch.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        names
    }
}

/// Adds the rolling average and percentage change columns.
///
/// Observations are partitioned by branch, each partition is scanned in date
/// order on its own, and the results are merged back ordered by
/// `(date, branch)`. The window runs over the observation sequence, so a gap
/// of several calendar days still counts as the previous observation.
pub fn annotate(filtered: &[Observation]) -> AnnotatedSeries {
    let mut partitions: BTreeMap<&str, Vec<&Observation>> = BTreeMap::new();
    for obs in filtered {
        partitions.entry(obs.branch.as_str()).or_default().push(obs);
    }

    let mut rows = Vec::with_capacity(filtered.len());
    let mut division_anomalies = Vec::new();

    for (branch, mut series) in partitions {
        series.sort_by_key(|o| o.date);
        let balances: Vec<Decimal> = series.iter().map(|o| o.balance).collect();

        for (i, obs) in series.iter().enumerate() {
            let rolling_average = rolling_mean(&balances, i);
            if rolling_average.is_none() && i + 1 >= ROLLING_WINDOW {
                tracing::warn!(branch, date = %obs.date, "Rolling average exceeds the decimal range; left undefined.");
            }
            let pct_change = if i == 0 {
                None
            } else if balances[i - 1].is_zero() {
                tracing::warn!(branch, date = %obs.date, "Prior balance is zero; percentage change left undefined.");
                division_anomalies.push(DivisionAnomaly {
                    branch: branch.to_string(),
                    date: obs.date,
                });
                None
            } else {
                let change = percentage_change(balances[i - 1], balances[i]);
                if change.is_none() {
                    tracing::warn!(branch, date = %obs.date, "Percentage change exceeds the decimal range; left undefined.");
                }
                change
            };

            rows.push(AnnotatedObservation {
                branch: branch.to_string(),
                date: obs.date,
                balance: obs.balance,
                rolling_average,
                pct_change,
            });
        }
    }

    rows.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.branch.cmp(&b.branch)));

    tracing::debug!(
        rows = rows.len(),
        anomalies = division_anomalies.len(),
        "Annotated series with rolling averages and percentage changes."
    );

    AnnotatedSeries {
        rows,
        division_anomalies,
    }
}

/// Trailing mean ending at `index`, `None` until a full window is available
/// or when the window sum leaves the decimal range.
fn rolling_mean(balances: &[Decimal], index: usize) -> Option<Decimal> {
    if index + 1 < ROLLING_WINDOW {
        return None;
    }
    stats::mean(&balances[index + 1 - ROLLING_WINDOW..=index])
}

/// `(current - previous) / previous * 100`, `None` when `previous` is zero
/// or the result leaves the decimal range.
pub fn percentage_change(previous: Decimal, current: Decimal) -> Option<Decimal> {
    if previous.is_zero() {
        return None;
    }
    current
        .checked_sub(previous)?
        .checked_div(previous)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn close(a: Decimal, b: Decimal) -> bool {
        (a - b).abs() < dec!(0.0000001)
    }

    #[test]
    fn first_two_rows_have_no_rolling_average() {
        let input = vec![
            Observation::new("A", day(1), dec!(100)),
            Observation::new("A", day(2), dec!(200)),
            Observation::new("A", day(3), dec!(300)),
            Observation::new("A", day(4), dec!(600)),
        ];
        let out = annotate(&input);
        let ra: Vec<_> = out.rows.iter().map(|r| r.rolling_average).collect();
        assert_eq!(ra[..3], [None, None, Some(dec!(200))]);
        assert!(close(ra[3].unwrap(), dec!(1100) / dec!(3)));
    }

    #[test]
    fn pct_change_against_previous_observation() {
        let input = vec![
            Observation::new("A", day(1), dec!(100)),
            Observation::new("A", day(2), dec!(90)),
            Observation::new("A", day(3), dec!(99)),
        ];
        let out = annotate(&input);
        assert_eq!(out.rows[0].pct_change, None);
        assert_eq!(out.rows[1].pct_change, Some(dec!(-10)));
        assert_eq!(out.rows[2].pct_change, Some(dec!(10)));
    }

    #[test]
    fn branches_never_mix() {
        let input = vec![
            Observation::new("A", day(1), dec!(100)),
            Observation::new("A", day(2), dec!(100)),
            Observation::new("A", day(3), dec!(100)),
            Observation::new("B", day(1), dec!(10)),
            Observation::new("B", day(2), dec!(20)),
        ];
        let out = annotate(&input);

        // merged in date order, ties by branch
        let order: Vec<_> = out.rows.iter().map(|r| (r.date, r.branch.as_str())).collect();
        assert_eq!(
            order,
            vec![(day(1), "A"), (day(1), "B"), (day(2), "A"), (day(2), "B"), (day(3), "A")]
        );

        let b: Vec<_> = out.branch_rows("B").collect();
        assert_eq!(b[0].pct_change, None);
        assert_eq!(b[1].pct_change, Some(dec!(100)));
        assert!(b.iter().all(|r| r.rolling_average.is_none()));

        let a: Vec<_> = out.branch_rows("A").collect();
        assert_eq!(a[2].rolling_average, Some(dec!(100)));
        assert_eq!(a[1].pct_change, Some(dec!(0)));
    }

    #[test]
    fn gaps_in_dates_are_not_imputed() {
        let input = vec![
            Observation::new("A", day(1), dec!(100)),
            Observation::new("A", day(10), dec!(50)),
            Observation::new("A", day(20), dec!(150)),
        ];
        let out = annotate(&input);
        assert_eq!(out.rows[1].pct_change, Some(dec!(-50)));
        assert_eq!(out.rows[2].pct_change, Some(dec!(200)));
        assert_eq!(out.rows[2].rolling_average, Some(dec!(100)));
    }

    #[test]
    fn zero_prior_balance_is_undefined_and_recorded() {
        let input = vec![
            Observation::new("A", day(1), dec!(0)),
            Observation::new("A", day(2), dec!(500)),
            Observation::new("A", day(3), dec!(1000)),
        ];
        let out = annotate(&input);
        assert_eq!(out.rows[1].pct_change, None);
        assert_eq!(out.rows[2].pct_change, Some(dec!(100)));
        assert_eq!(
            out.division_anomalies,
            vec![DivisionAnomaly { branch: "A".to_string(), date: day(2) }]
        );
        assert_eq!(out.pct_changes(), vec![dec!(100)]);
    }

    #[test]
    fn overflowing_change_is_undefined_but_not_a_zero_base() {
        let input = vec![
            Observation::new("A", day(1), Decimal::new(1, 28)),
            Observation::new("A", day(2), Decimal::MAX),
        ];
        let out = annotate(&input);
        assert_eq!(out.rows[1].pct_change, None);
        assert!(out.division_anomalies.is_empty());
        assert_eq!(percentage_change(Decimal::new(1, 28), Decimal::MAX), None);
    }

    #[test]
    fn overflowing_window_sum_leaves_rolling_average_undefined() {
        let input = vec![
            Observation::new("A", day(1), Decimal::MAX),
            Observation::new("A", day(2), Decimal::MAX),
            Observation::new("A", day(3), Decimal::MAX),
        ];
        let out = annotate(&input);
        assert_eq!(out.rows[2].rolling_average, None);
        assert!(out.division_anomalies.is_empty());
    }

    #[test]
    fn negative_prior_balance_keeps_sign_convention() {
        assert_eq!(percentage_change(dec!(-100), dec!(-50)), Some(dec!(-50)));
    }

    #[test]
    fn input_is_not_mutated() {
        let input = vec![
            Observation::new("A", day(2), dec!(20)),
            Observation::new("A", day(1), dec!(10)),
        ];
        let snapshot = input.clone();
        let out = annotate(&input);
        assert_eq!(input, snapshot);
        assert_eq!(out.rows[0].date, day(1));
        assert_eq!(out.rows[1].pct_change, Some(dec!(100)));
    }

    #[test]
    fn latest_first_orders_descending() {
        let input = vec![
            Observation::new("A", day(1), dec!(1)),
            Observation::new("A", day(2), dec!(2)),
            Observation::new("B", day(3), dec!(3)),
        ];
        let out = annotate(&input);
        let dates: Vec<_> = out.latest_first().iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![day(3), day(2), day(1)]);
        assert_eq!(out.branches(), vec!["A", "B"]);
    }

    proptest! {
        #[test]
        fn derived_columns_follow_their_definitions(
            balances in prop::collection::vec(1i64..1_000_000, 1..25)
        ) {
            let input: Vec<Observation> = balances
                .iter()
                .enumerate()
                .map(|(i, b)| Observation::new("A", day(1) + chrono::Days::new(i as u64), Decimal::from(*b)))
                .collect();
            let out = annotate(&input);
            let bal: Vec<Decimal> = balances.iter().map(|b| Decimal::from(*b)).collect();

            for (i, row) in out.rows.iter().enumerate() {
                if i < 2 {
                    prop_assert!(row.rolling_average.is_none());
                } else {
                    let expected = (bal[i - 2] + bal[i - 1] + bal[i]) / dec!(3);
                    prop_assert!(close(row.rolling_average.unwrap(), expected));
                }
                if i == 0 {
                    prop_assert!(row.pct_change.is_none());
                } else {
                    let expected = (bal[i] - bal[i - 1]) / bal[i - 1] * dec!(100);
                    prop_assert!(close(row.pct_change.unwrap(), expected));
                }
            }
        }
    }
}
