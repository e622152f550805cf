//! Run configuration.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use yeouido_data::{DartClient, ReportingScope};

use crate::error::ConfigError;

/// Environment variable holding the disclosure API key.
pub const API_KEY_VAR: &str = "DART_API_KEY";

/// Environment variable overriding the disclosure API endpoint.
pub const BASE_URL_VAR: &str = "DART_BASE_URL";

/// File name of the store when no path is given.
pub const DEFAULT_STORE_FILE: &str = "financial_db.csv";

/// Delay between consecutive companies, to respect the upstream rate budget.
pub const DEFAULT_THROTTLE: Duration = Duration::from_secs(1);

/// Connection settings for the upstream disclosure source.
#[derive(Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// API key
    pub api_key: String,
    /// Endpoint override
    pub base_url: Option<String>,
}

impl fmt::Debug for SourceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl SourceConfig {
    /// Read settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read settings through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_VAR)
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::MissingCredential(API_KEY_VAR))?;

        let base_url = lookup(BASE_URL_VAR)
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());
        if let Some(url) = &base_url
            && !(url.starts_with("http://") || url.starts_with("https://"))
        {
            return Err(ConfigError::Invalid(format!(
                "{BASE_URL_VAR} must be an http(s) URL, got {url}"
            )));
        }

        Ok(Self { api_key, base_url })
    }

    /// Build the disclosure client.
    pub fn client(&self) -> Result<DartClient, ConfigError> {
        let mut client = DartClient::new(self.api_key.clone())
            .map_err(|e| ConfigError::Invalid(format!("Failed to build HTTP client: {e}")))?;
        if let Some(url) = &self.base_url {
            client = client.with_base_url(url.clone());
        }
        Ok(client)
    }
}

/// Settings of one ingestion run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Path of the append-only store
    pub store_path: PathBuf,
    /// Delay between consecutive companies
    pub throttle: Duration,
    /// Preferred statement scope; the other scope is the fallback
    pub scope: ReportingScope,
    /// Company identifiers to ingest; empty means all
    pub companies: Vec<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from(DEFAULT_STORE_FILE),
            throttle: DEFAULT_THROTTLE,
            scope: ReportingScope::Consolidated,
            companies: Vec::new(),
        }
    }
}

impl PipelineConfig {
    /// Whether filings of this company should be ingested.
    pub fn includes(&self, company_id: &str) -> bool {
        self.companies.is_empty() || self.companies.iter().any(|c| c == company_id)
    }
}
