pub mod cli;
pub mod core;
pub mod providers;
pub mod store;

use crate::core::ResultSet;
use crate::core::config::AppConfig;
use crate::providers::caching::{CachingDataSource, QueryKey};
use crate::providers::sheets::SheetsDataSource;
use crate::store::memory::MemoryCache;
use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

pub enum AppCommand {
    Show { json: bool, refresh: Option<u64> },
    Export { output: PathBuf },
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Employee dashboard starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!(ttl = ?config.cache_ttl(), page = ?config.page, "Loaded config");

    let sheet_url = config.sheet_url()?;

    // Query cache and connection live for the rest of the process
    let query_cache = Arc::new(MemoryCache::<QueryKey, ResultSet>::new());
    let source = CachingDataSource::new(SheetsDataSource::new(), query_cache, config.cache_ttl());

    match command {
        AppCommand::Show { json, refresh } => {
            cli::dashboard::run(&source, &sheet_url, &config.page.title, json, refresh).await
        }
        AppCommand::Export { output } => {
            cli::export::run(
                &source,
                &sheet_url,
                &config.page.title,
                &config.stylesheet_path(),
                &output,
            )
            .await
        }
    }
}
