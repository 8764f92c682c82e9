use crate::error::LoaderError;
use crate::store::RecordStore;
use chrono::{NaiveDate, NaiveDateTime};
use core_types::Observation;
use csv::{ReaderBuilder, StringRecord, Trim};
use rust_decimal::Decimal;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

/// Column names and date format of the snapshot file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvSchema {
    pub branch_column: String,
    pub date_column: String,
    pub balance_column: String,
    pub date_format: String,
}

impl Default for CsvSchema {
    fn default() -> Self {
        Self {
            branch_column: "branch".to_string(),
            date_column: "date".to_string(),
            balance_column: "balance".to_string(),
            date_format: "%Y-%m-%d".to_string(),
        }
    }
}

/// Header positions resolved once per file.
struct ColumnIndex {
    branch: usize,
    date: usize,
    balance: usize,
}

#[derive(Debug, Clone, Default)]
pub struct CsvLoader {
    schema: CsvSchema,
}

impl CsvLoader {
    pub fn new(schema: CsvSchema) -> Self {
        Self { schema }
    }

    pub fn load_path(&self, path: &Path) -> Result<RecordStore, LoaderError> {
        let file = File::open(path).map_err(|source| LoaderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let store = self.load_reader(file)?;
        tracing::info!(
            path = %path.display(),
            rows = store.len(),
            "Loaded liquidity snapshot."
        );
        Ok(store)
    }

    pub fn load_reader<R: Read>(&self, reader: R) -> Result<RecordStore, LoaderError> {
        let mut rdr = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
        let columns = self.resolve_columns(rdr.headers()?)?;

        let mut records = Vec::new();
        for row in rdr.records() {
            let row = row?;
            let line = row.position().map(|p| p.line()).unwrap_or_default();
            records.push(self.parse_row(&row, &columns, line)?);
        }

        RecordStore::new(records)
    }

    fn resolve_columns(&self, headers: &StringRecord) -> Result<ColumnIndex, LoaderError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim_start_matches('\u{feff}') == name)
                .ok_or_else(|| LoaderError::MissingColumn(name.to_string()))
        };
        Ok(ColumnIndex {
            branch: find(&self.schema.branch_column)?,
            date: find(&self.schema.date_column)?,
            balance: find(&self.schema.balance_column)?,
        })
    }

    fn parse_row(
        &self,
        row: &StringRecord,
        columns: &ColumnIndex,
        line: u64,
    ) -> Result<Observation, LoaderError> {
        let field = |idx: usize, name: &str| {
            row.get(idx)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| LoaderError::Parse {
                    line,
                    message: format!("missing value for '{name}'"),
                })
        };

        let branch = field(columns.branch, &self.schema.branch_column)?;
        let date_raw = field(columns.date, &self.schema.date_column)?;
        let balance_raw = field(columns.balance, &self.schema.balance_column)?;

        let date = self.parse_date(date_raw).ok_or_else(|| LoaderError::Parse {
            line,
            message: format!(
                "date '{date_raw}' does not match format '{}'",
                self.schema.date_format
            ),
        })?;
        let balance = Decimal::from_str(balance_raw)
            .or_else(|_| Decimal::from_scientific(balance_raw))
            .map_err(|e| LoaderError::Parse {
                line,
                message: format!("balance '{balance_raw}': {e}"),
            })?;

        Ok(Observation::new(branch, date, balance))
    }

    /// Accepts the configured date format, or a timestamp whose time part is dropped.
    fn parse_date(&self, raw: &str) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(raw, &self.schema.date_format)
            .ok()
            .or_else(|| {
                NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
                    .ok()
                    .map(|dt| dt.date())
            })
    }
}
