use crate::error::ConfigError;
use crate::viewport::ZoomLimits;
use dotenv::dotenv;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const API_VERSION: &str = "v1";
pub const DEFAULT_TREE_ID: &str = "16";
pub const DEFAULT_LOG_FILE: &str = "family-tree.log";

/// Resolved runtime configuration
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub endpoints: Endpoints,
    pub tree_id: String,
    pub log_file: PathBuf,
    pub debug: bool,
    pub zoom: ZoomLimits,
    pub request_timeout: Duration,
}

impl AppConfig {
    /// Builds the configuration from a variable lookup so tests need not touch the process env.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
        zoom: ZoomLimits,
        request_timeout: Duration,
    ) -> Result<Self, ConfigError> {
        let base_url = lookup("FAMILY_API_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        if base_url.trim().is_empty() {
            return Err(ConfigError::EmptyBaseUrl);
        }

        let tree_id = lookup("FAMILY_TREE_ID").unwrap_or_else(|| DEFAULT_TREE_ID.to_string());
        let tree_id = tree_id.trim().to_string();
        if tree_id.is_empty() {
            return Err(ConfigError::EmptyTreeId);
        }

        let log_file = lookup("FAMILY_LOG_FILE")
            .map_or_else(|| PathBuf::from(DEFAULT_LOG_FILE), PathBuf::from);

        Ok(Self {
            endpoints: Endpoints::new(&base_url),
            tree_id,
            log_file,
            debug: lookup("DEBUG").is_some(),
            zoom: zoom.validate()?,
            request_timeout,
        })
    }
}

/// Initializes the application configuration from `.env` and the process environment
pub fn init_app_config(
    zoom: ZoomLimits,
    request_timeout: Duration,
) -> color_eyre::eyre::Result<AppConfig> {
    // Load environment variables from .env file
    dotenv().ok();

    let config = AppConfig::from_lookup(|key| env::var(key).ok(), zoom, request_timeout)?;
    Ok(config)
}

/// REST endpoints of the family backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base_url: String,
}

impl Endpoints {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn family_tree(&self, tree_id: &str) -> String {
        format!("{}/{API_VERSION}/family/tree/{tree_id}", self.base_url)
    }

    pub fn family_member(&self, member_id: &str) -> String {
        format!("{}/{API_VERSION}/family/member/{member_id}", self.base_url)
    }
}
