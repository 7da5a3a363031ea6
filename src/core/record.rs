//! Employee rows as read from the sheet, and their cleaned form.

use super::error::Result;
use super::source::ResultSet;
use serde::{Serialize, Serializer};
use std::fmt::Display;

pub const COL_EEID: &str = "EEID";
pub const COL_ANNUAL_SALARY: &str = "Annual Salary";
pub const COL_COUNTRY: &str = "Country";
pub const COL_GENDER: &str = "Gender";
pub const COL_BUSINESS_UNIT: &str = "Business Unit";
pub const COL_DEPARTMENT: &str = "Department";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeRecord {
    pub eeid: String,
    /// Currency formatted, e.g. `"$71,000.00"`
    pub annual_salary: String,
    pub department: String,
    pub country: String,
    pub gender: String,
    pub business_unit: String,
}

impl EmployeeRecord {
    /// Maps every row of a result set to a record, by column name.
    pub fn from_result_set(set: &ResultSet) -> Result<Vec<Self>> {
        let eeid = set.column_index(COL_EEID)?;
        let salary = set.column_index(COL_ANNUAL_SALARY)?;
        let department = set.column_index(COL_DEPARTMENT)?;
        let country = set.column_index(COL_COUNTRY)?;
        let gender = set.column_index(COL_GENDER)?;
        let business_unit = set.column_index(COL_BUSINESS_UNIT)?;

        fn cell(row: &[String], idx: usize) -> String {
            row.get(idx).cloned().unwrap_or_default()
        }

        Ok(set
            .rows
            .iter()
            .map(|row| EmployeeRecord {
                eeid: cell(row, eeid),
                annual_salary: cell(row, salary),
                department: cell(row, department),
                country: cell(row, country),
                gender: cell(row, gender),
                business_unit: cell(row, business_unit),
            })
            .collect())
    }
}

/// ISO 3166 alpha-3 code, or the explicit bucket for countries outside the
/// lookup table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CountryCode {
    Known(&'static str),
    Unknown,
}

impl CountryCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CountryCode::Known(code) => *code,
            CountryCode::Unknown => "Unknown",
        }
    }
}

impl Display for CountryCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for CountryCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CleanedRecord {
    pub record: EmployeeRecord,
    pub salary_numeric: f64,
    pub country_code: CountryCode,
}
