//! Summary statistics shown on the dashboard.
use super::error::{DashboardError, Result};
use super::format::format_magnitude;
use super::record::{CleanedRecord, CountryCode};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

pub const FEMALE: &str = "Female";

/// Everything a page render needs, computed in one pass over the cleaned
/// records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    pub employee_count: usize,
    /// Mean salary abbreviated with [`format_magnitude`], e.g. `"113K"`
    pub average_salary: String,
    /// Mean salary rounded to cents, before abbreviation
    pub average_salary_value: f64,
    pub female_percentage: f64,
    pub business_unit_count: usize,
    /// Headcount per department, largest first
    pub department_distribution: Vec<(String, usize)>,
    /// Headcount per country code, largest first
    pub country_distribution: Vec<(CountryCode, usize)>,
}

pub fn compute_metrics(records: &[CleanedRecord]) -> Result<MetricsSnapshot> {
    if records.is_empty() {
        return Err(DashboardError::EmptyDataset);
    }
    let count = records.len() as f64;

    let total_salary: f64 = records.iter().map(|r| r.salary_numeric).sum();
    let average_salary_value = round_cents(total_salary / count);

    let females = records
        .iter()
        .filter(|r| r.record.gender == FEMALE)
        .count();

    let business_units: HashSet<&str> = records
        .iter()
        .map(|r| r.record.business_unit.as_str())
        .collect();

    Ok(MetricsSnapshot {
        employee_count: records.len(),
        average_salary: format_magnitude(average_salary_value)?,
        average_salary_value,
        female_percentage: round_cents(females as f64 / count * 100.0),
        business_unit_count: business_units.len(),
        department_distribution: value_counts(records.iter().map(|r| r.record.department.clone())),
        country_distribution: value_counts(records.iter().map(|r| r.country_code)),
    })
}

/// Counts occurrences, largest first; ties keep first-seen order.
fn value_counts<K: Eq + Hash + Clone>(values: impl Iterator<Item = K>) -> Vec<(K, usize)> {
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut counts: Vec<(K, usize)> = Vec::new();
    for value in values {
        match index.get(&value) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(value.clone(), counts.len());
                counts.push((value, 1));
            }
        }
    }
    counts.sort_by(|(_, a), (_, b)| b.cmp(a));
    counts
}

/// Rounds to 2 dp. Ties resolve to even on the exact binary value, as
/// decimal formatting does.
fn round_cents(value: f64) -> f64 {
    format!("{value:.2}").parse().unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clean::clean;
    use crate::core::record::EmployeeRecord;

    fn record(eeid: &str, salary: &str, country: &str, gender: &str, dept: &str, bu: &str) -> EmployeeRecord {
        EmployeeRecord {
            eeid: eeid.to_string(),
            annual_salary: salary.to_string(),
            department: dept.to_string(),
            country: country.to_string(),
            gender: gender.to_string(),
            business_unit: bu.to_string(),
        }
    }

    fn metrics_for(records: &[EmployeeRecord]) -> MetricsSnapshot {
        let cleaned = clean(records).unwrap();
        compute_metrics(&cleaned.records).unwrap()
    }

    #[test]
    fn test_empty_dataset_is_an_error() {
        assert!(matches!(
            compute_metrics(&[]),
            Err(DashboardError::EmptyDataset)
        ));
    }

    #[test]
    fn test_deduplicated_example() {
        let records = vec![
            record("1", "$1,000.00", "Brazil", "Female", "Eng", "A"),
            record("1", "$2,000.00", "Brazil", "Female", "Eng", "A"),
            record("2", "$3,000.00", "France", "Male", "Eng", "B"),
        ];

        let metrics = metrics_for(&records);
        assert_eq!(metrics.employee_count, 2);
        assert_eq!(metrics.average_salary_value, 2000.0);
        assert_eq!(metrics.average_salary, "2K");
        assert_eq!(metrics.female_percentage, 50.0);
        assert_eq!(metrics.business_unit_count, 2);
        assert_eq!(metrics.department_distribution, vec![("Eng".to_string(), 2)]);
        assert_eq!(
            metrics.country_distribution,
            vec![(CountryCode::Known("BRA"), 1), (CountryCode::Unknown, 1)]
        );
    }

    #[test]
    fn test_female_percentage_bounds() {
        let none = vec![
            record("1", "$10", "China", "Male", "Eng", "A"),
            record("2", "$10", "China", "Male", "Eng", "A"),
        ];
        assert_eq!(metrics_for(&none).female_percentage, 0.0);

        let all = vec![
            record("1", "$10", "China", "Female", "Eng", "A"),
            record("2", "$10", "China", "Female", "Eng", "A"),
        ];
        assert_eq!(metrics_for(&all).female_percentage, 100.0);

        let third = vec![
            record("1", "$10", "China", "Female", "Eng", "A"),
            record("2", "$10", "China", "Male", "Eng", "A"),
            record("3", "$10", "China", "Male", "Eng", "A"),
        ];
        let pct = metrics_for(&third).female_percentage;
        assert_eq!(pct, 33.33);
        assert!((0.0..=100.0).contains(&pct));
    }

    #[test]
    fn test_percentage_ties_round_to_even() {
        let records: Vec<_> = (0..800)
            .map(|i| {
                let gender = if i == 0 { "Female" } else { "Male" };
                record(&i.to_string(), "$10", "China", gender, "Eng", "A")
            })
            .collect();
        assert_eq!(metrics_for(&records).female_percentage, 0.12);

        assert_eq!(round_cents(2.675), 2.67);
        assert_eq!(round_cents(0.5), 0.5);
        assert_eq!(round_cents(1234.5678), 1234.57);
    }

    #[test]
    fn test_gender_match_is_exact() {
        let records = vec![
            record("1", "$10", "China", "female", "Eng", "A"),
            record("2", "$10", "China", "Female ", "Eng", "A"),
        ];
        assert_eq!(metrics_for(&records).female_percentage, 0.0);
    }

    #[test]
    fn test_distributions_are_sorted_by_count() {
        let records = vec![
            record("1", "$10", "China", "Male", "Sales", "A"),
            record("2", "$10", "Brazil", "Male", "IT", "A"),
            record("3", "$10", "United States", "Male", "IT", "B"),
            record("4", "$10", "Brazil", "Male", "Finance", "C"),
            record("5", "$10", "Brazil", "Male", "IT", "C"),
            record("6", "$10", "Germany", "Male", "Finance", "C"),
        ];

        let metrics = metrics_for(&records);
        assert_eq!(
            metrics.department_distribution,
            vec![
                ("IT".to_string(), 3),
                ("Finance".to_string(), 2),
                ("Sales".to_string(), 1),
            ]
        );
        assert_eq!(
            metrics.country_distribution,
            vec![
                (CountryCode::Known("BRA"), 3),
                (CountryCode::Known("CHN"), 1),
                (CountryCode::Known("USA"), 1),
                (CountryCode::Unknown, 1),
            ]
        );
        assert_eq!(metrics.business_unit_count, 3);
    }

    #[test]
    fn test_average_salary_is_rounded_then_abbreviated() {
        let records = vec![
            record("1", "$141,604.00", "China", "Male", "IT", "A"),
            record("2", "$99,975.00", "China", "Male", "IT", "A"),
            record("3", "$163,099.00", "China", "Male", "IT", "A"),
        ];

        let metrics = metrics_for(&records);
        assert_eq!(metrics.average_salary_value, 134892.67);
        assert_eq!(metrics.average_salary, "135K");
    }

    #[test]
    fn test_snapshot_serializes_to_json() {
        let records = vec![record("1", "$1,500,000", "Brazil", "Female", "Eng", "A")];
        let json = serde_json::to_value(metrics_for(&records)).unwrap();
        assert_eq!(json["average_salary"], "1.5M");
        assert_eq!(json["country_distribution"][0][0], "BRA");
        assert_eq!(json["department_distribution"][0][1], 1);
    }
}
