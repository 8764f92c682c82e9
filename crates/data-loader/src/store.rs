use crate::error::LoaderError;
use chrono::NaiveDate;
use core_types::Observation;
use std::collections::BTreeMap;

/// The in-memory snapshot: observations sorted by `(branch, date)`, at most
/// one per branch per day.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<Observation>,
}

/// How much history one branch has in the snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchCoverage {
    pub branch: String,
    pub rows: usize,
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
}

impl RecordStore {
    /// Sorts the observations and rejects a repeated `(branch, date)` pair.
    pub fn new(mut records: Vec<Observation>) -> Result<Self, LoaderError> {
        records.sort_by(|a, b| a.branch.cmp(&b.branch).then(a.date.cmp(&b.date)));

        if let Some(pair) = records
            .windows(2)
            .find(|w| w[0].branch == w[1].branch && w[0].date == w[1].date)
        {
            return Err(LoaderError::DuplicateObservation {
                branch: pair[1].branch.clone(),
                date: pair[1].date,
            });
        }

        Ok(Self { records })
    }

    pub fn records(&self) -> &[Observation] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Earliest and latest date across all branches.
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.records.iter().map(|o| o.date).min()?;
        let last = self.records.iter().map(|o| o.date).max()?;
        Some((first, last))
    }

    /// Per-branch row counts and date span, ordered by branch.
    pub fn coverage(&self) -> Vec<BranchCoverage> {
        let mut by_branch: BTreeMap<&str, BranchCoverage> = BTreeMap::new();
        for obs in &self.records {
            by_branch
                .entry(obs.branch.as_str())
                .and_modify(|c| {
                    c.rows += 1;
                    c.first_date = c.first_date.min(obs.date);
                    c.last_date = c.last_date.max(obs.date);
                })
                .or_insert_with(|| BranchCoverage {
                    branch: obs.branch.clone(),
                    rows: 1,
                    first_date: obs.date,
                    last_date: obs.date,
                });
        }
        by_branch.into_values().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, d).unwrap()
    }

    #[test]
    fn sorts_by_branch_then_date() {
        let store = RecordStore::new(vec![
            Observation::new("B", day(2), dec!(1)),
            Observation::new("A", day(3), dec!(2)),
            Observation::new("A", day(1), dec!(3)),
        ])
        .unwrap();
        let keys: Vec<_> = store.records().iter().map(|o| (o.branch.as_str(), o.date)).collect();
        assert_eq!(keys, vec![("A", day(1)), ("A", day(3)), ("B", day(2))]);
        assert_eq!(store.date_bounds(), Some((day(1), day(3))));
    }

    #[test]
    fn duplicate_branch_date_is_rejected() {
        let err = RecordStore::new(vec![
            Observation::new("A", day(1), dec!(1)),
            Observation::new("A", day(1), dec!(2)),
        ])
        .unwrap_err();
        assert!(matches!(err, LoaderError::DuplicateObservation { .. }));
    }

    #[test]
    fn coverage_per_branch() {
        let store = RecordStore::new(vec![
            Observation::new("A", day(1), dec!(1)),
            Observation::new("A", day(5), dec!(1)),
            Observation::new("B", day(3), dec!(1)),
        ])
        .unwrap();
        let cov = store.coverage();
        assert_eq!(cov.len(), 2);
        assert_eq!(cov[0].branch, "A");
        assert_eq!(cov[0].rows, 2);
        assert_eq!((cov[0].first_date, cov[0].last_date), (day(1), day(5)));
        assert_eq!(cov[1].rows, 1);
    }

    #[test]
    fn empty_store_has_no_bounds() {
        let store = RecordStore::new(Vec::new()).unwrap();
        assert!(store.is_empty());
        assert_eq!(store.date_bounds(), None);
    }
}
