//! An in-memory calendar and fixtures shared by the verb tests.

use std::cell::Cell;

use calendar_resource_core::window::parse_timestamp;
use calendar_resource_core::{
    CalendarProvider, EventFilter, EventParams, EventSet, FetchedEvent, FixedClock, ListedEvent,
    NewEvent, ResourceError, ResourceResult, TimeWindow, Version,
};
use serde_json::json;

pub const NOW: &str = "2016-10-02T14:05:00+01:00";
pub const EVENT_NAME: &str = "deploy window";
pub const CREATED_ID: &str = "created-1";

/// Events keyed by summary, served the way a backend filters them.
pub struct InMemoryCalendar {
    events: Vec<(String, ListedEvent)>,
    pub lists: Cell<usize>,
}

impl InMemoryCalendar {
    /// Every event carries the configured name.
    pub fn new(events: Vec<ListedEvent>) -> Self {
        InMemoryCalendar {
            events: events
                .into_iter()
                .map(|e| (EVENT_NAME.to_string(), e))
                .collect(),
            lists: Cell::new(0),
        }
    }

    pub fn with_event_named(mut self, summary: &str, event: ListedEvent) -> Self {
        self.events.push((summary.to_string(), event));
        self
    }

    fn details(event: &ListedEvent) -> FetchedEvent {
        FetchedEvent {
            event: event.clone(),
            metadata: vec![
                ("id".into(), event.id.clone()),
                ("start_time".into(), event.window.start_string()),
                ("end_time".into(), event.window.end_string()),
            ],
        }
    }
}

impl CalendarProvider for InMemoryCalendar {
    async fn list(&self, filter: &EventFilter) -> ResourceResult<EventSet> {
        self.lists.set(self.lists.get() + 1);
        Ok(self
            .events
            .iter()
            .filter(|(summary, e)| *summary == filter.name && e.window.end > filter.window_lower_bound)
            .map(|(_, e)| e.clone())
            .collect())
    }

    async fn fetch(&self, version: &Version) -> ResourceResult<FetchedEvent> {
        self.events
            .iter()
            .filter(|(summary, _)| summary == EVENT_NAME)
            .map(|(_, e)| e)
            .find(|e| match version {
                Version::EventId { id } => e.id == *id,
                Version::TimeWindow {
                    start_time,
                    end_time,
                } => TimeWindow::parse(start_time, end_time).is_ok_and(|w| w == e.window),
            })
            .map(Self::details)
            .ok_or_else(|| ResourceError::NotFound(format!("{version:?}")))
    }

    async fn create(&self, params: &EventParams) -> ResourceResult<FetchedEvent> {
        let new = NewEvent::from_params(params, EVENT_NAME)?;
        Ok(Self::details(&ListedEvent::new(CREATED_ID, new.window())))
    }
}

pub fn clock() -> FixedClock {
    FixedClock::new(parse_timestamp(NOW).unwrap())
}

pub fn event(id: &str, start: &str, end: &str) -> ListedEvent {
    ListedEvent::new(id, TimeWindow::parse(start, end).unwrap())
}

pub fn window_version(start: &str, end: &str) -> Version {
    Version::TimeWindow {
        start_time: start.into(),
        end_time: end.into(),
    }
}

pub fn source(version_type: &str) -> serde_json::Value {
    json!({
        "provider": "google",
        "calendar_id": "team@example.com",
        "event_name": EVENT_NAME,
        "version_type": version_type,
    })
}

