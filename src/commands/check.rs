use calendar_resource_core::protocol::CheckRequest;
use calendar_resource_core::{
    CalendarProvider, Clock, EventFilter, EventSet, PinnedVersion, ResourceResult, TimeWindow,
    Version, VersionResolver,
};
use tracing::{debug, info};

/// Report the versions that exist right now.
pub async fn run<P, C>(request: &CheckRequest, provider: &P, clock: &C) -> ResourceResult<Vec<Version>>
where
    P: CalendarProvider,
    C: Clock,
{
    let source = &request.source;
    source.validate()?;

    let encoding = source.version_type;
    let requested = request.version.as_ref().filter(|v| v.is_complete());
    if let Some(version) = requested {
        encoding.check(version)?;
    }

    // Time-window versions are parsed before any network traffic.
    let requested_window = match requested {
        Some(Version::TimeWindow {
            start_time,
            end_time,
        }) => Some(TimeWindow::parse(start_time, end_time)?),
        _ => None,
    };

    let filter = EventFilter {
        name: source.event_name.clone(),
        window_lower_bound: clock.now(),
    };
    let events = provider.list(&filter).await?;
    debug!(count = events.len(), event_name = %filter.name, "listed events");

    let pinned = requested.and_then(|version| pin(version, requested_window, &events));

    let versions = VersionResolver::new(clock, encoding).resolve(&events, pinned.as_ref());
    info!(versions = versions.len(), "check complete");
    Ok(versions)
}

/// Resolve the caller's version to a window. An event id the listing no
/// longer contains carries no window and counts as no prior knowledge.
fn pin(version: &Version, window: Option<TimeWindow>, events: &EventSet) -> Option<PinnedVersion> {
    let window = match version {
        Version::TimeWindow { .. } => window?,
        Version::EventId { id } => match events.find_by_id(id) {
            Some(event) => event.window,
            None => {
                debug!(%id, "requested event no longer listed");
                return None;
            }
        },
    };

    Some(PinnedVersion {
        window,
        version: version.clone(),
    })
}
