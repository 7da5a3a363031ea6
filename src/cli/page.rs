//! One page render: fetch, clean, summarize.
use crate::core::clean::{UnmappedCountry, clean};
use crate::core::error::Result;
use crate::core::{DataSource, EmployeeRecord, MetricsSnapshot, compute_metrics};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricCard {
    pub label: &'static str,
    pub value: String,
}

/// Everything the presentation layer draws for a single page load.
#[derive(Debug, Clone)]
pub struct Page {
    pub title: String,
    pub snapshot: MetricsSnapshot,
    pub warnings: Vec<UnmappedCountry>,
    pub fetched_at: DateTime<Utc>,
}

impl Page {
    pub fn cards(&self) -> Vec<MetricCard> {
        let s = &self.snapshot;
        vec![
            MetricCard {
                label: "Number of Employees",
                value: s.employee_count.to_string(),
            },
            MetricCard {
                label: "Avg Salary",
                value: format!("${}", s.average_salary),
            },
            MetricCard {
                label: "Ratio of Female Employees",
                value: format!("{:.2}%", s.female_percentage),
            },
            MetricCard {
                label: "Number of Business Units",
                value: s.business_unit_count.to_string(),
            },
        ]
    }
}

pub async fn load_page(source: &dyn DataSource, sheet_url: &str, title: &str) -> Result<Page> {
    let result = source
        .query(&format!("SELECT * FROM \"{sheet_url}\""))
        .await?;
    let records = EmployeeRecord::from_result_set(&result)?;
    let cleaned = clean(&records)?;
    let snapshot = compute_metrics(&cleaned.records)?;
    debug!(employees = snapshot.employee_count, "Computed metrics");

    Ok(Page {
        title: title.to_string(),
        snapshot,
        warnings: cleaned.warnings,
        fetched_at: result.fetched_at,
    })
}
