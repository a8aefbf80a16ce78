//! Request and response types exchanged with the orchestrator.
//!
//! Each verb reads one JSON request on stdin and writes one JSON response on
//! stdout.

use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{ResourceError, ResourceResult};
use crate::provider::{EventParams, Metadata};
use crate::version::{Version, VersionEncoding};

/// Calendar backends this resource can talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Google,
}

impl FromStr for ProviderKind {
    type Err = ResourceError;

    fn from_str(s: &str) -> ResourceResult<Self> {
        match s {
            "google" => Ok(ProviderKind::Google),
            other => Err(ResourceError::UnsupportedProvider(other.to_string())),
        }
    }
}

/// Resource configuration from the pipeline definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Source {
    pub provider: String,
    pub calendar_id: String,
    pub event_name: String,
    /// Provider-specific credentials, interpreted by the backend.
    #[serde(default)]
    pub credentials: serde_json::Value,
    #[serde(default)]
    pub version_type: VersionEncoding,
}

impl Source {
    pub fn provider_kind(&self) -> ResourceResult<ProviderKind> {
        self.provider.parse()
    }

    pub fn validate(&self) -> ResourceResult<()> {
        if self.calendar_id.is_empty() {
            return Err(ResourceError::Input("source.calendar_id is empty".into()));
        }
        if self.event_name.is_empty() {
            return Err(ResourceError::Input("source.event_name is empty".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct CheckRequest {
    pub source: Source,
    #[serde(default, deserialize_with = "optional_version")]
    pub version: Option<Version>,
}

#[derive(Debug, Deserialize)]
pub struct InRequest {
    pub source: Source,
    #[serde(default, deserialize_with = "optional_version")]
    pub version: Option<Version>,
    #[serde(default)]
    pub params: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub struct OutRequest {
    pub source: Source,
    #[serde(default)]
    pub params: EventParams,
}

/// One metadata entry as the orchestrator displays it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataField {
    pub name: String,
    pub value: String,
}

pub fn metadata_fields(metadata: Metadata) -> Vec<MetadataField> {
    metadata
        .into_iter()
        .map(|(name, value)| MetadataField { name, value })
        .collect()
}

/// Response of `in`, also written to the `input` file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InResponse {
    pub version: Version,
    pub metadata: Vec<MetadataField>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutResponse {
    pub version: Version,
    pub metadata: Vec<MetadataField>,
}

/// A version as it arrives on the wire. A missing key reads like an empty one.
#[derive(Deserialize)]
struct WireVersion {
    #[serde(default)]
    start_time: Option<String>,
    #[serde(default)]
    end_time: Option<String>,
    #[serde(default)]
    id: Option<String>,
}

/// A missing, `null`, `{}` or all-empty version all mean "no prior knowledge".
/// A half-filled time window is kept; callers decide with `is_complete`.
fn optional_version<'de, D>(deserializer: D) -> Result<Option<Version>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(wire) = Option::<WireVersion>::deserialize(deserializer)? else {
        return Ok(None);
    };

    let start_time = wire.start_time.unwrap_or_default();
    let end_time = wire.end_time.unwrap_or_default();
    let id = wire.id.unwrap_or_default();

    let version = if !start_time.is_empty() || !end_time.is_empty() {
        Some(Version::TimeWindow {
            start_time,
            end_time,
        })
    } else if !id.is_empty() {
        Some(Version::EventId { id })
    } else {
        None
    };

    Ok(version)
}
