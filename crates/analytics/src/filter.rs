use crate::error::AnalyticsError;
use chrono::NaiveDate;
use core_types::{BranchSelection, Observation};

/// Rejects a date range whose start lies after its end.
///
/// Called before the records are touched so that a bad range is never
/// mistaken for an empty one.
pub fn validate_date_range(start: NaiveDate, end: NaiveDate) -> Result<(), AnalyticsError> {
    if start > end {
        return Err(AnalyticsError::Validation(format!(
            "start date {start} is after end date {end}"
        )));
    }
    Ok(())
}

/// Narrows the record store to `[start, end]` (inclusive) and the selected branch.
///
/// Input order is preserved. An empty subset is reported as
/// `AnalyticsError::EmptyResult` so the caller can stop before the later stages.
pub fn filter_records(
    records: &[Observation],
    start: NaiveDate,
    end: NaiveDate,
    branch: &BranchSelection,
) -> Result<Vec<Observation>, AnalyticsError> {
    validate_date_range(start, end)?;

    let filtered: Vec<Observation> = records
        .iter()
        .filter(|o| o.date >= start && o.date <= end && branch.matches(&o.branch))
        .cloned()
        .collect();

    tracing::debug!(
        input = records.len(),
        kept = filtered.len(),
        %start,
        %end,
        %branch,
        "Filtered liquidity records."
    );

    if filtered.is_empty() {
        return Err(AnalyticsError::EmptyResult {
            start,
            end,
            branch: branch.to_string(),
        });
    }

    Ok(filtered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn sample() -> Vec<Observation> {
        vec![
            Observation::new("A", day(1), dec!(100)),
            Observation::new("A", day(2), dec!(110)),
            Observation::new("A", day(3), dec!(120)),
            Observation::new("B", day(1), dec!(50)),
            Observation::new("B", day(3), dec!(40)),
        ]
    }

    #[test]
    fn range_is_inclusive_on_both_ends() {
        let out = filter_records(&sample(), day(1), day(2), &BranchSelection::All).unwrap();
        assert_eq!(out.len(), 3);
        assert!(out.iter().all(|o| o.date >= day(1) && o.date <= day(2)));
    }

    #[test]
    fn restricts_to_named_branch() {
        let sel = BranchSelection::Branch("B".to_string());
        let out = filter_records(&sample(), day(1), day(3), &sel).unwrap();
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|o| o.branch == "B"));
    }

    #[test]
    fn inverted_range_is_a_validation_error() {
        let err = filter_records(&sample(), day(3), day(1), &BranchSelection::All).unwrap_err();
        assert!(matches!(err, AnalyticsError::Validation(_)));

        let sel = BranchSelection::Branch("A".to_string());
        let err = filter_records(&sample(), day(3), day(1), &sel).unwrap_err();
        assert!(matches!(err, AnalyticsError::Validation(_)));
    }

    #[test]
    fn inverted_range_is_rejected_even_without_records() {
        let err = filter_records(&[], day(3), day(1), &BranchSelection::All).unwrap_err();
        assert!(matches!(err, AnalyticsError::Validation(_)));
    }

    #[test]
    fn range_outside_data_is_empty_result() {
        let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 2, 1).unwrap();
        let err = filter_records(&sample(), start, end, &BranchSelection::All).unwrap_err();
        assert!(matches!(err, AnalyticsError::EmptyResult { .. }));
    }

    #[test]
    fn unknown_branch_is_empty_result() {
        let sel = BranchSelection::Branch("Z".to_string());
        let err = filter_records(&sample(), day(1), day(3), &sel).unwrap_err();
        assert!(matches!(err, AnalyticsError::EmptyResult { .. }));
    }

    fn arb_records() -> impl Strategy<Value = Vec<Observation>> {
        prop::collection::vec((0usize..3, 1u32..28, -1_000i64..1_000_000), 0..40).prop_map(
            |rows| {
                rows.into_iter()
                    .map(|(b, d, bal)| {
                        Observation::new(["A", "B", "C"][b], day(d), Decimal::from(bal))
                    })
                    .collect()
            },
        )
    }

    proptest! {
        #[test]
        fn filter_respects_bounds_and_is_idempotent(
            records in arb_records(),
            a in 1u32..28,
            b in 1u32..28,
            pick in 0usize..4,
        ) {
            let (start, end) = (day(a.min(b)), day(a.max(b)));
            let sel = match pick {
                0 => BranchSelection::All,
                n => BranchSelection::Branch(["A", "B", "C"][n - 1].to_string()),
            };

            match filter_records(&records, start, end, &sel) {
                Ok(once) => {
                    prop_assert!(once.iter().all(|o| o.date >= start && o.date <= end));
                    prop_assert!(once.iter().all(|o| sel.matches(&o.branch)));
                    let twice = filter_records(&once, start, end, &sel).unwrap();
                    prop_assert_eq!(once, twice);
                }
                Err(AnalyticsError::EmptyResult { .. }) => {
                    prop_assert!(!records
                        .iter()
                        .any(|o| o.date >= start && o.date <= end && sel.matches(&o.branch)));
                }
                Err(other) => prop_assert!(false, "unexpected error {other}"),
            }
        }
    }
}
