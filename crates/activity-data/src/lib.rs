//! Ingestion and aggregation layer for the student activity analyzer.
//!
//! Parses pipe-delimited activity lines, folds the accepted records into the
//! per-student, per-day and anomaly aggregates, and renders the final report.

pub mod aggregator;
pub mod analysis;
mod ordered;
pub mod reader;
pub mod report;
pub mod store;

pub use activity_core as core;
