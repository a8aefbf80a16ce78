//! Google-specific configuration.
//!
//! The generic `Source` carries credentials as an opaque JSON blob; this
//! module gives it a typed shape and validates it before any request is made.
//! Both a service-account key file and an OAuth refresh token are accepted.

use std::time::Duration;

use calendar_resource_core::protocol::Source;
use calendar_resource_core::{ResourceError, ResourceResult};
use jsonwebtoken::EncodingKey;
use serde::Deserialize;

pub const DEFAULT_API_URL: &str = "https://www.googleapis.com/calendar/v3";
pub const DEFAULT_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Endpoints and transport limits; overridable for testing and proxies.
#[derive(Debug, Clone)]
pub struct GoogleSettings {
    pub api_url: String,
    pub token_url: String,
    pub timeout: Duration,
}

impl Default for GoogleSettings {
    fn default() -> Self {
        GoogleSettings {
            api_url: DEFAULT_API_URL.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            timeout: DEFAULT_HTTP_TIMEOUT,
        }
    }
}

/// How the backend authenticates against Google.
#[derive(Debug, Clone)]
pub enum GoogleCredentials {
    /// A service-account key file, exchanged for tokens with a signed assertion.
    ServiceAccount(ServiceAccountKey),
    /// An OAuth client plus a long-lived refresh token.
    OAuth(OAuthClient),
}

/// The fields of a service-account key file this backend uses.
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    #[serde(default)]
    pub client_email: String,
    #[serde(default)]
    pub private_key: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
}

impl std::fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("private_key_id", &self.private_key_id)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OAuthClient {
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
    #[serde(default)]
    pub refresh_token: String,
    /// Pre-issued access token; skips the refresh when present.
    #[serde(default)]
    pub access_token: Option<String>,
}

impl GoogleCredentials {
    /// Accepts the credentials either as a JSON object or as a string holding one.
    pub fn from_value(value: &serde_json::Value) -> ResourceResult<Self> {
        let value = match value {
            serde_json::Value::Null => {
                return Err(ResourceError::Config(
                    "source.credentials is required for the google provider".into(),
                ));
            }
            serde_json::Value::String(s) => serde_json::from_str(s).map_err(invalid)?,
            other => other.clone(),
        };

        let is_service_account =
            value.get("type").and_then(serde_json::Value::as_str) == Some("service_account");
        let creds = if is_service_account {
            GoogleCredentials::ServiceAccount(serde_json::from_value(value).map_err(invalid)?)
        } else {
            GoogleCredentials::OAuth(serde_json::from_value(value).map_err(invalid)?)
        };

        creds.validate()?;
        Ok(creds)
    }

    fn validate(&self) -> ResourceResult<()> {
        match self {
            GoogleCredentials::ServiceAccount(key) => {
                require("client_email", &key.client_email)?;
                require("private_key", &key.private_key)?;
                EncodingKey::from_rsa_pem(key.private_key.as_bytes()).map_err(|e| {
                    ResourceError::Config(format!("Invalid service account private_key: {e}"))
                })?;
                Ok(())
            }
            GoogleCredentials::OAuth(client) => {
                if client.access_token.as_deref().is_some_and(|t| !t.is_empty()) {
                    return Ok(());
                }
                require("client_id", &client.client_id)?;
                require("client_secret", &client.client_secret)?;
                require("refresh_token", &client.refresh_token)
            }
        }
    }
}

fn require(field: &str, value: &str) -> ResourceResult<()> {
    if value.is_empty() {
        return Err(ResourceError::Config(format!(
            "Missing required credentials field: {field}"
        )));
    }
    Ok(())
}

fn invalid(e: serde_json::Error) -> ResourceError {
    ResourceError::Config(format!("Invalid google credentials: {e}"))
}

/// Strongly-typed source configuration for Google Calendar.
#[derive(Debug, Clone)]
pub struct GoogleSource {
    pub calendar_id: String,
    pub event_name: String,
    pub credentials: GoogleCredentials,
}

impl TryFrom<&Source> for GoogleSource {
    type Error = ResourceError;

    fn try_from(source: &Source) -> ResourceResult<Self> {
        source.validate()?;

        Ok(GoogleSource {
            calendar_id: source.calendar_id.clone(),
            event_name: source.event_name.clone(),
            credentials: GoogleCredentials::from_value(&source.credentials)?,
        })
    }
}
