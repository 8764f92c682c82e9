use chrono::NaiveDate;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to open data file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Column '{0}' not found in the CSV header")]
    MissingColumn(String),

    #[error("Line {line}: {message}")]
    Parse { line: u64, message: String },

    #[error("Duplicate observation for branch '{branch}' on {date}")]
    DuplicateObservation { branch: String, date: NaiveDate },
}
