//! Maps the `source.provider` tag onto a concrete backend.

use calendar_resource_core::protocol::{ProviderKind, Source};
use calendar_resource_core::{
    CalendarProvider, EventFilter, EventParams, EventSet, FetchedEvent, ResourceResult, Version,
};
use calendar_resource_google::GoogleCalendar;
use tracing::debug;

use crate::settings::Settings;

pub enum Backend {
    Google(GoogleCalendar),
}

impl Backend {
    /// Fails with `UnsupportedProvider` for an unknown tag and `Config` for bad credentials.
    pub fn from_source(source: &Source, settings: &Settings) -> ResourceResult<Self> {
        let kind = source.provider_kind()?;
        debug!(provider = ?kind, calendar_id = %source.calendar_id, "configuring backend");

        match kind {
            ProviderKind::Google => Ok(Backend::Google(GoogleCalendar::new(
                source,
                settings.google(),
            )?)),
        }
    }
}

impl CalendarProvider for Backend {
    async fn list(&self, filter: &EventFilter) -> ResourceResult<EventSet> {
        match self {
            Backend::Google(google) => google.list(filter).await,
        }
    }

    async fn fetch(&self, version: &Version) -> ResourceResult<FetchedEvent> {
        match self {
            Backend::Google(google) => google.fetch(version).await,
        }
    }

    async fn create(&self, params: &EventParams) -> ResourceResult<FetchedEvent> {
        match self {
            Backend::Google(google) => google.create(params).await,
        }
    }
}
