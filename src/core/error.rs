//! Error taxonomy for the dashboard pipeline.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    /// A required secret was not configured
    #[error("Missing required configuration value: {0}")]
    ConfigMissing(String),

    /// Salary cell could not be read as a number
    #[error("Invalid salary {value:?} for employee {eeid}")]
    Parse { eeid: String, value: String },

    #[error("No employee records to summarize")]
    EmptyDataset,

    /// Result set lacks a column the dashboard needs
    #[error("Result set is missing required column: {0}")]
    MissingColumn(String),

    #[error("Unsupported query: {0}")]
    UnsupportedQuery(String),

    /// Fetching or decoding the sheet failed
    #[error("Query failed: {0}")]
    Query(String),

    #[error("Stylesheet not found: {}", .0.display())]
    StylesheetMissing(PathBuf),

    #[error("Cannot format a non-finite number")]
    NonFiniteValue,

    #[error("Value {0} is too large to abbreviate")]
    MagnitudeOverflow(f64),
}

pub type Result<T> = std::result::Result<T, DashboardError>;
