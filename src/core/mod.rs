//! Core business logic: cleaning, metrics and the abstractions the
//! providers and presentation layers plug into.

pub mod cache;
pub mod clean;
pub mod config;
pub mod error;
pub mod format;
pub mod log;
pub mod metrics;
pub mod record;
pub mod source;

// Re-export main types for cleaner imports
pub use error::DashboardError;
pub use metrics::{MetricsSnapshot, compute_metrics};
pub use record::{CleanedRecord, CountryCode, EmployeeRecord};
pub use source::{DataSource, ResultSet, SheetQuery};
