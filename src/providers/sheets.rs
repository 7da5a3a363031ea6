use crate::core::error::{DashboardError, Result};
use crate::core::source::{DataSource, ResultSet, SheetQuery};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::Url;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::OnceCell;
use tracing::{debug, instrument};

static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

/// An HTTP client with a process-unique identity. Query results are cached
/// per connection.
#[derive(Debug)]
pub struct SheetConnection {
    id: u64,
    client: reqwest::Client,
}

impl SheetConnection {
    pub fn open() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("staffboard/0.1")
            .build()
            .map_err(|e| DashboardError::Query(format!("Failed to create HTTP client: {e}")))?;
        let id = NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed);
        debug!(connection_id = id, "Opened sheet connection");
        Ok(Self { id, client })
    }

    pub fn id(&self) -> u64 {
        self.id
    }
}

/// Runs sheet queries by downloading the sheet as CSV.
///
/// The connection is opened on first use and shared by every later query.
#[derive(Default)]
pub struct SheetsDataSource {
    connection: OnceCell<Arc<SheetConnection>>,
}

impl SheetsDataSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn connection(&self) -> Result<Arc<SheetConnection>> {
        self.connection
            .get_or_try_init(|| async { SheetConnection::open().map(Arc::new) })
            .await
            .cloned()
    }
}

#[async_trait]
impl DataSource for SheetsDataSource {
    async fn connection_id(&self) -> Result<u64> {
        Ok(self.connection().await?.id())
    }

    #[instrument(name = "SheetQuery", skip(self), fields(query = %query))]
    async fn run_query(&self, query: &SheetQuery) -> Result<ResultSet> {
        let connection = self.connection().await?;
        let url = export_url(query.sheet_url())?;
        debug!("Requesting sheet from {}", url);

        let response = connection
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| DashboardError::Query(format!("Request error: {e} for URL: {url}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DashboardError::Query(format!(
                "Sheet request returned {status} for URL: {url}"
            )));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| DashboardError::Query(format!("Failed to read sheet body: {e}")))?;
        let result = parse_csv(&body)?;
        debug!(rows = result.len(), "Received sheet");
        Ok(result)
    }
}

/// Rewrites a Google Sheets link to its CSV export endpoint. Other URLs are
/// assumed to serve CSV already.
pub fn export_url(sheet_url: &str) -> Result<Url> {
    let mut url = Url::parse(sheet_url)
        .map_err(|e| DashboardError::Query(format!("Invalid sheet URL {sheet_url}: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(DashboardError::Query(format!(
            "Unsupported sheet URL scheme: {}",
            url.scheme()
        )));
    }

    if url.host_str() != Some("docs.google.com") {
        return Ok(url);
    }

    let segments: Vec<&str> = url.path_segments().map(|s| s.collect()).unwrap_or_default();
    let sheet_id = match segments.as_slice() {
        ["spreadsheets", "d", id, ..] if !id.is_empty() => id.to_string(),
        _ => return Ok(url),
    };

    let gid = url
        .query_pairs()
        .find(|(k, _)| k == "gid")
        .map(|(_, v)| v.into_owned())
        .or_else(|| {
            url.fragment()
                .and_then(|f| f.split('&').find_map(|kv| kv.strip_prefix("gid=")))
                .map(str::to_string)
        });

    url.set_path(&format!("/spreadsheets/d/{sheet_id}/export"));
    url.set_fragment(None);
    match gid {
        Some(gid) => url.set_query(Some(&format!("format=csv&gid={gid}"))),
        None => url.set_query(Some("format=csv")),
    }
    Ok(url)
}

/// Reads a CSV document whose first row names the columns.
pub fn parse_csv(body: &[u8]) -> Result<ResultSet> {
    let csv_error = |e: csv::Error| DashboardError::Query(format!("Invalid CSV: {e}"));

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(body);

    let columns = reader
        .headers()
        .map_err(csv_error)?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .collect();

    let rows = reader
        .records()
        .map(|record| {
            record
                .map(|r| r.iter().map(str::to_string).collect())
                .map_err(csv_error)
        })
        .collect::<Result<Vec<Vec<String>>>>()?;

    Ok(ResultSet {
        columns,
        rows,
        fetched_at: Utc::now(),
    })
}
