//! Record cleaning: deduplication, salary parsing and country code lookup.

use super::error::{DashboardError, Result};
use super::record::{CleanedRecord, CountryCode, EmployeeRecord};
use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, warn};

/// Countries the dashboard can place on the map.
const COUNTRY_CODES: [(&str, &str); 3] = [
    ("United States", "USA"),
    ("China", "CHN"),
    ("Brazil", "BRA"),
];

/// A record whose country is not in the lookup table. It is counted under
/// [`CountryCode::Unknown`] rather than failing the render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnmappedCountry {
    pub eeid: String,
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CleanOutcome {
    pub records: Vec<CleanedRecord>,
    pub warnings: Vec<UnmappedCountry>,
}

/// Deduplicates by employee id (first occurrence wins) and derives the
/// numeric salary and country code for each surviving record.
pub fn clean(records: &[EmployeeRecord]) -> Result<CleanOutcome> {
    let mut outcome = CleanOutcome::default();

    for record in dedup_by(records, |r| r.eeid.as_str()) {
        let salary_numeric = parse_salary(&record.eeid, &record.annual_salary)?;
        let country_code = country_code(&record.country);
        if country_code == CountryCode::Unknown {
            warn!(eeid = %record.eeid, country = %record.country, "Unmapped country");
            outcome.warnings.push(UnmappedCountry {
                eeid: record.eeid.clone(),
                country: record.country.clone(),
            });
        }
        outcome.records.push(CleanedRecord {
            record: record.clone(),
            salary_numeric,
            country_code,
        });
    }

    debug!(
        input = records.len(),
        output = outcome.records.len(),
        "Cleaned employee records"
    );
    Ok(outcome)
}

/// Cleaning already-cleaned records only needs the deduplication step.
pub fn reclean(records: &[CleanedRecord]) -> Vec<CleanedRecord> {
    dedup_by(records, |r| r.record.eeid.as_str())
        .cloned()
        .collect()
}

/// Parses `"$71,000.00"` style amounts.
pub fn parse_salary(eeid: &str, value: &str) -> Result<f64> {
    let digits: String = value
        .trim()
        .chars()
        .filter(|c| *c != '$' && *c != ',')
        .collect();
    digits
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| DashboardError::Parse {
            eeid: eeid.to_string(),
            value: value.to_string(),
        })
}

pub fn country_code(country: &str) -> CountryCode {
    COUNTRY_CODES
        .iter()
        .find(|(name, _)| *name == country)
        .map_or(CountryCode::Unknown, |(_, code)| CountryCode::Known(*code))
}

fn dedup_by<'a, T>(items: &'a [T], key: impl Fn(&'a T) -> &'a str) -> impl Iterator<Item = &'a T> {
    let mut seen = HashSet::new();
    items.iter().filter(move |item| seen.insert(key(*item)))
}
