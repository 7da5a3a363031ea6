use super::error::DashboardError;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::{fs, time::Duration};
use tracing::debug;

/// Environment variable that overrides `secrets.public_gsheets_url`.
pub const SHEET_URL_ENV: &str = "PUBLIC_GSHEETS_URL";
pub const SHEET_URL_KEY: &str = "public_gsheets_url";

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct SecretsConfig {
    pub public_gsheets_url: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct CacheConfig {
    /// Seconds a fetched sheet stays valid
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig { ttl_secs: 600 }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct PageConfig {
    pub title: String,
    /// Relative paths resolve against the config file's directory
    pub stylesheet: PathBuf,
}

impl Default for PageConfig {
    fn default() -> Self {
        PageConfig {
            title: "Employee Dashboard".to_string(),
            stylesheet: PathBuf::from("style.css"),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub secrets: SecretsConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub page: PageConfig,
    #[serde(skip)]
    config_dir: Option<PathBuf>,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_or_default(&config_path)
    }

    /// Loads the file if it exists. Otherwise every section takes its
    /// default and the secret can only come from the environment.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            return Self::load_from_path(path);
        }
        debug!("No config file at {}, using defaults", path.display());
        Ok(AppConfig {
            config_dir: path.parent().map(Path::to_path_buf),
            ..Default::default()
        })
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("io", "staffboard", "staffboard")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let mut config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        config.config_dir = path.as_ref().parent().map(Path::to_path_buf);
        debug!("Successfully loaded config");
        Ok(config)
    }

    /// The sheet to query. The environment variable wins over the file.
    pub fn sheet_url(&self) -> Result<String, DashboardError> {
        self.resolve_sheet_url(std::env::var(SHEET_URL_ENV).ok())
    }

    fn resolve_sheet_url(&self, from_env: Option<String>) -> Result<String, DashboardError> {
        from_env
            .filter(|url| !url.trim().is_empty())
            .or_else(|| self.secrets.public_gsheets_url.clone())
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .ok_or_else(|| DashboardError::ConfigMissing(SHEET_URL_KEY.to_string()))
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache.ttl_secs)
    }

    pub fn stylesheet_path(&self) -> PathBuf {
        match &self.config_dir {
            Some(dir) if self.page.stylesheet.is_relative() => dir.join(&self.page.stylesheet),
            _ => self.page.stylesheet.clone(),
        }
    }
}
