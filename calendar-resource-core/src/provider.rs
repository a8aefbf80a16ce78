//! The capability set a calendar backend must offer.
//!
//! Verbs depend only on this trait. A backend turns these calls into its own
//! network requests and hands back provider-neutral values.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ResourceError, ResourceResult};
use crate::event_set::{EventSet, ListedEvent};
use crate::version::Version;
use crate::window::{TimeWindow, parse_timestamp};

/// Which events a listing should return.
#[derive(Debug, Clone)]
pub struct EventFilter {
    /// Exact event summary to match.
    pub name: String,
    /// Events that finished before this instant are left out.
    pub window_lower_bound: DateTime<Utc>,
}

/// Ordered `(name, value)` pairs describing one event.
pub type Metadata = Vec<(String, String)>;

/// Full details of one event, as returned by `fetch` and `create`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedEvent {
    pub event: ListedEvent,
    pub metadata: Metadata,
}

/// `out` parameters as the caller wrote them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventParams {
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "timeZone")]
    pub time_zone: Option<String>,
}

/// A validated event ready to be created.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    pub summary: String,
    pub description: Option<String>,
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
    pub time_zone: Option<String>,
}

impl NewEvent {
    /// Validate `params`, falling back to `default_summary` when no summary is given.
    pub fn from_params(params: &EventParams, default_summary: &str) -> ResourceResult<Self> {
        let start = required(&params.start, "start")?;
        let end = required(&params.end, "end")?;

        let start = parse_timestamp(start)
            .map_err(|e| ResourceError::InvalidParameters(e.to_string()))?;
        let end =
            parse_timestamp(end).map_err(|e| ResourceError::InvalidParameters(e.to_string()))?;

        if end <= start {
            return Err(ResourceError::InvalidParameters(format!(
                "end {} is not after start {}",
                params.end.as_deref().unwrap_or_default(),
                params.start.as_deref().unwrap_or_default()
            )));
        }

        let summary = params
            .summary
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(default_summary)
            .to_string();

        Ok(NewEvent {
            summary,
            description: params.description.clone().filter(|d| !d.is_empty()),
            start,
            end,
            time_zone: params.time_zone.clone().filter(|tz| !tz.is_empty()),
        })
    }

    pub fn window(&self) -> TimeWindow {
        TimeWindow::new(self.start, self.end)
    }
}

fn required<'a>(value: &'a Option<String>, field: &str) -> ResourceResult<&'a str> {
    match value.as_deref() {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ResourceError::InvalidParameters(format!(
            "'{field}' must be specified"
        ))),
    }
}

#[allow(async_fn_in_trait)]
pub trait CalendarProvider {
    /// Upcoming events whose summary matches `filter.name`, ordered by start time.
    async fn list(&self, filter: &EventFilter) -> ResourceResult<EventSet>;

    /// Details of the event a version names.
    ///
    /// Fails with `NotFound` when no such event exists or its summary does not
    /// match the configured event name.
    async fn fetch(&self, version: &Version) -> ResourceResult<FetchedEvent>;

    /// Create an event. Fails with `InvalidParameters` when start or end is missing.
    async fn create(&self, params: &EventParams) -> ResourceResult<FetchedEvent>;
}
