//! Resource versions and how they are encoded on the wire.

use serde::{Deserialize, Serialize};

use crate::error::{ResourceError, ResourceResult};
use crate::event_set::ListedEvent;
use crate::window::TimeWindow;

/// A resource version as the orchestrator sees it.
///
/// One configuration uses exactly one of the two shapes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Version {
    TimeWindow { start_time: String, end_time: String },
    EventId { id: String },
}

impl Version {
    pub fn from_window(window: &TimeWindow) -> Self {
        Version::TimeWindow {
            start_time: window.start_string(),
            end_time: window.end_string(),
        }
    }

    pub fn encoding(&self) -> VersionEncoding {
        match self {
            Version::TimeWindow { .. } => VersionEncoding::TimeWindow,
            Version::EventId { .. } => VersionEncoding::EventId,
        }
    }

    /// Whether every field of this version is filled in.
    pub fn is_complete(&self) -> bool {
        match self {
            Version::TimeWindow {
                start_time,
                end_time,
            } => !start_time.is_empty() && !end_time.is_empty(),
            Version::EventId { id } => !id.is_empty(),
        }
    }
}

/// Which version shape a configuration emits and accepts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VersionEncoding {
    #[default]
    TimeWindow,
    EventId,
}

impl VersionEncoding {
    pub fn version_for(&self, event: &ListedEvent) -> Version {
        match self {
            VersionEncoding::TimeWindow => Version::from_window(&event.window),
            VersionEncoding::EventId => Version::EventId {
                id: event.id.clone(),
            },
        }
    }

    /// Reject a version that does not use this encoding.
    pub fn check(&self, version: &Version) -> ResourceResult<()> {
        if version.encoding() == *self {
            Ok(())
        } else {
            Err(ResourceError::Input(format!(
                "version {} does not match the configured version_type '{}'",
                serde_json::to_string(version)?,
                self.as_str()
            )))
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VersionEncoding::TimeWindow => "time_window",
            VersionEncoding::EventId => "event_id",
        }
    }
}

/// A caller-supplied version already resolved to the window it stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinnedVersion {
    pub window: TimeWindow,
    pub version: Version,
}
