//! Google Calendar backend for the calendar resource.
//!
//! Talks to the Calendar API v3 over HTTPS. Credentials come from the
//! resource source as a service-account key file or as an OAuth client plus
//! refresh token (see `config`).

pub mod api;
pub mod config;
pub mod convert;
pub mod session;
pub mod types;

#[cfg(test)]
mod stand_in;

use calendar_resource_core::protocol::Source;
use calendar_resource_core::{
    CalendarProvider, EventFilter, EventParams, EventSet, FetchedEvent, ListedEvent, NewEvent,
    ResourceError, ResourceResult, TimeWindow, Version,
};
use chrono::Utc;
use tracing::{debug, warn};

use crate::api::{CalendarApi, ListQuery};
use crate::config::{GoogleSettings, GoogleSource};
use crate::convert::{FromGoogle, ToGoogle, metadata, needs_calendar_zone};
use crate::session::{Scope, Session};
use crate::types::GoogleEvent;

pub struct GoogleCalendar {
    source: GoogleSource,
    settings: GoogleSettings,
    http: reqwest::Client,
}

impl GoogleCalendar {
    /// Validate the source and build the HTTP client. No request is made yet.
    pub fn new(source: &Source, settings: GoogleSettings) -> ResourceResult<Self> {
        let source = GoogleSource::try_from(source)?;

        let http = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| ResourceError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(GoogleCalendar {
            source,
            settings,
            http,
        })
    }

    async fn api(&self, scope: Scope) -> ResourceResult<CalendarApi> {
        let session =
            Session::establish(&self.http, &self.settings, &self.source.credentials, scope).await?;
        CalendarApi::new(self.http.clone(), &self.settings, session.access_token())
    }

    fn is_configured_event(&self, event: &GoogleEvent) -> bool {
        event.summary == self.source.event_name && event.status != "cancelled"
    }

    async fn fetch_by_window(&self, window: &TimeWindow) -> ResourceResult<FetchedEvent> {
        let api = self.api(Scope::ReadOnly).await?;
        let page = api
            .list_events(
                &self.source.calendar_id,
                &ListQuery {
                    time_min: window.start.with_timezone(&Utc),
                    time_max: Some(window.end.with_timezone(&Utc)),
                },
            )
            .await?;
        let calendar_tz = page.time_zone.as_deref();

        for event in page.items.iter().filter(|e| self.is_configured_event(e)) {
            let listed = match ListedEvent::from_google(event, calendar_tz) {
                Ok(listed) => listed,
                Err(e) => {
                    warn!(event_id = %event.id, error = %e, "skipping unreadable event");
                    continue;
                }
            };
            if listed.window == *window {
                return Ok(FetchedEvent {
                    metadata: metadata(event, &listed),
                    event: listed,
                });
            }
        }

        Err(ResourceError::NotFound(format!(
            "no '{}' event from {} to {}",
            self.source.event_name,
            window.start_string(),
            window.end_string()
        )))
    }

    async fn fetch_by_id(&self, id: &str) -> ResourceResult<FetchedEvent> {
        let api = self.api(Scope::ReadOnly).await?;
        let event = api
            .get_event(&self.source.calendar_id, id)
            .await?
            .filter(|e| self.is_configured_event(e))
            .ok_or_else(|| {
                ResourceError::NotFound(format!(
                    "no '{}' event with id {id}",
                    self.source.event_name
                ))
            })?;

        let calendar_tz = if needs_calendar_zone(&event) {
            api.calendar_time_zone(&self.source.calendar_id).await?
        } else {
            None
        };

        let listed = ListedEvent::from_google(&event, calendar_tz.as_deref())?;
        Ok(FetchedEvent {
            metadata: metadata(&event, &listed),
            event: listed,
        })
    }
}

impl CalendarProvider for GoogleCalendar {
    async fn list(&self, filter: &EventFilter) -> ResourceResult<EventSet> {
        let api = self.api(Scope::ReadOnly).await?;
        let page = api
            .list_events(
                &self.source.calendar_id,
                &ListQuery {
                    time_min: filter.window_lower_bound,
                    time_max: None,
                },
            )
            .await?;
        let calendar_tz = page.time_zone.as_deref();

        let mut events = Vec::new();
        for event in page.items.iter() {
            if event.summary != filter.name || event.status == "cancelled" || event.id.is_empty() {
                continue;
            }
            match ListedEvent::from_google(event, calendar_tz) {
                Ok(listed) => events.push(listed),
                Err(e) => warn!(event_id = %event.id, error = %e, "skipping unreadable event"),
            }
        }

        debug!(
            total = page.items.len(),
            matching = events.len(),
            name = %filter.name,
            "listed google events"
        );

        Ok(EventSet::new(events))
    }

    async fn fetch(&self, version: &Version) -> ResourceResult<FetchedEvent> {
        match version {
            Version::TimeWindow {
                start_time,
                end_time,
            } => {
                let window = TimeWindow::parse(start_time, end_time)?;
                self.fetch_by_window(&window).await
            }
            Version::EventId { id } => self.fetch_by_id(id).await,
        }
    }

    async fn create(&self, params: &EventParams) -> ResourceResult<FetchedEvent> {
        let new_event = NewEvent::from_params(params, &self.source.event_name)?;
        if let Some(tz) = &new_event.time_zone {
            tz.parse::<chrono_tz::Tz>().map_err(|_| {
                ResourceError::InvalidParameters(format!("unknown time zone '{tz}'"))
            })?;
        }

        let api = self.api(Scope::ReadWrite).await?;
        let created = api
            .insert_event(&self.source.calendar_id, &new_event.to_google())
            .await?;

        let listed = ListedEvent::from_google(&created, new_event.time_zone.as_deref())?;

        Ok(FetchedEvent {
            metadata: metadata(&created, &listed),
            event: listed,
        })
    }
}
