//! # Liquidity Data Loader
//!
//! This crate is the adapter between the CSV balance snapshot on disk and the
//! analytics engine. It owns every detail of the file format so the engine
//! only ever sees typed `Observation`s.
//!
//! ## Architectural Principles
//!
//! - **Layer 3 Adapter:** Encapsulates all file and parsing logic behind a small API.
//! - **Read-Only Snapshot:** The file is re-read in full on every run and the
//!   resulting `RecordStore` is never modified afterwards.
//!
//! ## Public API
//!
//! - `CsvLoader` / `CsvSchema`: Reads a snapshot using configurable column names.
//! - `RecordStore`: The sorted observations plus date and branch overviews.
//! - `LoaderError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod error;
pub mod reader;
pub mod store;

// Re-export the key components to create a clean, public-facing API.
pub use error::LoaderError;
pub use reader::{CsvLoader, CsvSchema};
pub use store::{BranchCoverage, RecordStore};
