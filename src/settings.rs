//! Process-level settings, read from `CALENDAR_RESOURCE_*` environment variables.
//!
//! Per-pipeline configuration lives in the request's `source`; these only
//! tune how the process runs.

use std::time::Duration;

use calendar_resource_core::{ResourceError, ResourceResult};
use calendar_resource_google::config::{
    DEFAULT_API_URL, DEFAULT_HTTP_TIMEOUT, DEFAULT_TOKEN_URL, GoogleSettings,
};
use config::{Config, Environment};
use serde::Deserialize;

pub const ENV_PREFIX: &str = "CALENDAR_RESOURCE";
pub const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// `tracing` filter directive, e.g. `debug` or `calendar_resource_google=trace`.
    pub log: String,
    pub google_api_url: String,
    pub google_token_url: String,
    pub http_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            log: DEFAULT_LOG_FILTER.to_string(),
            google_api_url: DEFAULT_API_URL.to_string(),
            google_token_url: DEFAULT_TOKEN_URL.to_string(),
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT.as_secs(),
        }
    }
}

impl Settings {
    pub fn load() -> ResourceResult<Self> {
        let config = Config::builder()
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()
            .map_err(|e| ResourceError::Config(e.to_string()))?;

        Self::from_config(config)
    }

    pub fn from_config(config: Config) -> ResourceResult<Self> {
        let settings: Settings = config
            .try_deserialize()
            .map_err(|e| ResourceError::Config(e.to_string()))?;

        if settings.http_timeout_secs == 0 {
            return Err(ResourceError::Config(format!(
                "{ENV_PREFIX}_HTTP_TIMEOUT_SECS must be greater than zero"
            )));
        }

        Ok(settings)
    }

    pub fn google(&self) -> GoogleSettings {
        GoogleSettings {
            api_url: self.google_api_url.clone(),
            token_url: self.google_token_url.clone(),
            timeout: Duration::from_secs(self.http_timeout_secs),
        }
    }
}
