//! Google Calendar REST calls.

use calendar_resource_core::{ResourceError, ResourceResult};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::config::GoogleSettings;
use crate::types::{ApiErrorBody, CalendarResource, EventsPage, GoogleEvent};

/// Query for `events.list`.
#[derive(Debug, Clone)]
pub struct ListQuery {
    /// Exclusive lower bound on event end time.
    pub time_min: DateTime<Utc>,
    /// Exclusive upper bound on event start time.
    pub time_max: Option<DateTime<Utc>>,
}

pub struct CalendarApi {
    http: reqwest::Client,
    base: Url,
    access_token: String,
}

impl CalendarApi {
    pub fn new(
        http: reqwest::Client,
        settings: &GoogleSettings,
        access_token: impl Into<String>,
    ) -> ResourceResult<Self> {
        let base = Url::parse(&settings.api_url).map_err(|e| {
            ResourceError::Config(format!("Invalid google api url '{}': {e}", settings.api_url))
        })?;

        Ok(CalendarApi {
            http,
            base,
            access_token: access_token.into(),
        })
    }

    /// Single (expanded) events, not deleted, ordered by start time.
    /// Only the first page is read.
    pub async fn list_events(
        &self,
        calendar_id: &str,
        query: &ListQuery,
    ) -> ResourceResult<EventsPage> {
        let mut url = self.url(&["calendars", calendar_id, "events"])?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("singleEvents", "true")
                .append_pair("orderBy", "startTime")
                .append_pair("showDeleted", "false")
                .append_pair("timeMin", &query.time_min.to_rfc3339());
            if let Some(time_max) = query.time_max {
                pairs.append_pair("timeMax", &time_max.to_rfc3339());
            }
        }

        debug!(%calendar_id, time_min = %query.time_min, "listing google events");
        let response = self.send(self.http.get(url)).await?;
        self.read_json(response, "Failed to fetch events").await
    }

    /// `Ok(None)` when the event does not exist or was deleted.
    pub async fn get_event(
        &self,
        calendar_id: &str,
        event_id: &str,
    ) -> ResourceResult<Option<GoogleEvent>> {
        let url = self.url(&["calendars", calendar_id, "events", event_id])?;

        debug!(%calendar_id, %event_id, "fetching google event");
        let response = self.send(self.http.get(url)).await?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND || status == reqwest::StatusCode::GONE {
            return Ok(None);
        }

        let event: GoogleEvent = self
            .read_json(response, &format!("Failed to fetch event: {event_id}"))
            .await?;
        Ok(Some(event))
    }

    /// The calendar's default zone, which localises all-day events.
    pub async fn calendar_time_zone(&self, calendar_id: &str) -> ResourceResult<Option<String>> {
        let url = self.url(&["calendars", calendar_id])?;

        debug!(%calendar_id, "fetching google calendar");
        let response = self.send(self.http.get(url)).await?;
        let calendar: CalendarResource = self
            .read_json(response, &format!("Failed to fetch calendar: {calendar_id}"))
            .await?;
        Ok(calendar.time_zone)
    }

    pub async fn insert_event(
        &self,
        calendar_id: &str,
        event: &GoogleEvent,
    ) -> ResourceResult<GoogleEvent> {
        let url = self.url(&["calendars", calendar_id, "events"])?;

        debug!(%calendar_id, summary = %event.summary, "creating google event");
        let response = self.send(self.http.post(url).json(event)).await?;
        self.read_json(
            response,
            &format!("Failed to create event: {}", event.summary),
        )
        .await
    }

    fn url(&self, segments: &[&str]) -> ResourceResult<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ResourceError::Config(format!("Invalid google api url '{}'", self.base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> ResourceResult<reqwest::Response> {
        request
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| ResourceError::Provider(format!("Google calendar API request failed: {e}")))
    }

    async fn read_json<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
        context: &str,
    ) -> ResourceResult<T> {
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|b| b.error.message)
                .unwrap_or(body);
            return Err(ResourceError::Provider(format!("{context} ({status}): {message}")));
        }

        response
            .json()
            .await
            .map_err(|e| ResourceError::Provider(format!("{context}: invalid response: {e}")))
    }
}
