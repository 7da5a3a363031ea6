//! Data source abstractions: the query form the dashboard issues and the
//! tabular result it gets back.

use super::error::{DashboardError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::fmt::Display;

/// A full-table scan of a single sheet, `SELECT * FROM "<sheet_url>"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SheetQuery {
    sheet_url: String,
}

impl SheetQuery {
    pub fn select_all(sheet_url: &str) -> Self {
        Self {
            sheet_url: sheet_url.to_string(),
        }
    }

    /// Parses the only query form the adapter understands. Keywords are
    /// case-insensitive and a trailing `;` is allowed.
    pub fn parse(text: &str) -> Result<Self> {
        let unsupported = || DashboardError::UnsupportedQuery(text.to_string());

        let body = text.trim();
        let body = body.strip_suffix(';').unwrap_or(body).trim_end();

        let source = strip_token(body, "select")
            .and_then(|rest| strip_token(rest, "*"))
            .and_then(|rest| strip_token(rest, "from"))
            .ok_or_else(unsupported)?
            .trim();
        let url = source
            .strip_prefix('"')
            .and_then(|s| s.strip_suffix('"'))
            .filter(|s| !s.is_empty() && !s.contains('"'))
            .ok_or_else(unsupported)?;

        Ok(Self::select_all(url))
    }

    pub fn sheet_url(&self) -> &str {
        &self.sheet_url
    }
}

/// Strips a leading keyword (case-insensitive) that must be followed by whitespace.
fn strip_token<'a>(input: &'a str, token: &str) -> Option<&'a str> {
    let (head, tail) = input.trim_start().split_at_checked(token.len())?;
    (head.eq_ignore_ascii_case(token) && tail.starts_with(char::is_whitespace)).then_some(tail)
}

impl Display for SheetQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SELECT * FROM \"{}\"", self.sheet_url)
    }
}

/// Rows of string cells under named columns.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub fetched_at: DateTime<Utc>,
}

impl ResultSet {
    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c.trim() == name)
            .ok_or_else(|| DashboardError::MissingColumn(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[async_trait]
pub trait DataSource: Send + Sync {
    /// Identity of the underlying connection; cached results are scoped to it.
    async fn connection_id(&self) -> Result<u64>;

    async fn run_query(&self, query: &SheetQuery) -> Result<ResultSet>;

    /// Runs query text. Anything other than `SELECT * FROM "<url>"` fails
    /// with [`DashboardError::UnsupportedQuery`] before reaching the sheet.
    async fn query(&self, text: &str) -> Result<ResultSet> {
        let query = SheetQuery::parse(text)?;
        self.run_query(&query).await
    }
}
