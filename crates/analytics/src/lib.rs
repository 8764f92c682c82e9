//! # Liquidity Analytics Engine
//!
//! This crate turns a snapshot of per-branch liquidity balances into a filtered,
//! annotated view with low-liquidity alerts and trend/volatility verdicts.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of files,
//!   terminals or configuration. It depends only on `core-types` (Layer 0).
//! - **Stateless Calculation:** `LiquidityEngine` takes the records and an
//!   `AnalysisRequest` and produces an `AnalysisReport`. Every stage returns a new
//!   value and never mutates its input.
//!
//! ## Pipeline
//!
//! Record store → `filter` → `metrics` → {`alerts`, `trend`, `volatility`}, with
//! `summary` computed over the filtered rows.
//!
//! ## Public API
//!
//! - `LiquidityEngine`: Runs the full pipeline.
//! - `AnalysisReport`: Everything the presentation layer renders.
//! - `AnalyticsError`: `Validation`, `EmptyResult` and `InsufficientData`.

// Declare the modules that constitute this crate.
pub mod alerts;
pub mod engine;
pub mod error;
pub mod filter;
pub mod metrics;
pub mod report;
pub mod stats;
pub mod summary;
pub mod trend;
pub mod volatility;

// Re-export the key components to create a clean, public-facing API.
pub use alerts::AlertReport;
pub use engine::LiquidityEngine;
pub use error::AnalyticsError;
pub use metrics::{AnnotatedObservation, AnnotatedSeries, DivisionAnomaly};
pub use report::{AnalysisReport, AnalysisRequest, BranchTrend, StageOutcome, TrendOutcome};
pub use summary::{BalanceSummary, BranchExtremes};
pub use trend::{TrendAssessment, TrendLabel};
pub use volatility::{VolatilityAssessment, VolatilityLabel};
