//! Conversions between Google events and provider-neutral values.

use calendar_resource_core::window::{format_timestamp, parse_timestamp};
use calendar_resource_core::{ListedEvent, Metadata, NewEvent, ResourceError, ResourceResult};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, Offset, TimeZone};
use chrono_tz::Tz;

use crate::types::{EventDateTime, GoogleEvent};

pub trait FromGoogle {
    /// `calendar_tz` localises all-day events, which carry a date but no time.
    fn from_google(event: &GoogleEvent, calendar_tz: Option<&str>) -> ResourceResult<Self>
    where
        Self: Sized;
}

impl FromGoogle for ListedEvent {
    fn from_google(event: &GoogleEvent, calendar_tz: Option<&str>) -> ResourceResult<Self> {
        let start = event
            .start
            .as_ref()
            .ok_or_else(|| missing_time(event, "start"))?;
        let end = event.end.as_ref().ok_or_else(|| missing_time(event, "end"))?;

        let window = calendar_resource_core::TimeWindow::new(
            instant(start, calendar_tz).ok_or_else(|| missing_time(event, "start"))??,
            instant(end, calendar_tz).ok_or_else(|| missing_time(event, "end"))??,
        );

        Ok(ListedEvent::new(event.id.clone(), window))
    }
}

/// Whether localising `event` needs the calendar's zone: an all-day
/// endpoint that carries no zone of its own.
pub fn needs_calendar_zone(event: &GoogleEvent) -> bool {
    [&event.start, &event.end].into_iter().flatten().any(|time| {
        time.date_time.is_none() && time.date.is_some() && time.time_zone.is_none()
    })
}

fn missing_time(event: &GoogleEvent, which: &str) -> ResourceError {
    ResourceError::Provider(format!("Event {} has no {which} time", event.id))
}

/// `None` when neither a date-time nor a date is present.
fn instant(
    time: &EventDateTime,
    calendar_tz: Option<&str>,
) -> Option<ResourceResult<DateTime<FixedOffset>>> {
    if let Some(dt) = &time.date_time {
        return Some(parse_timestamp(dt));
    }

    let zone = time.time_zone.as_deref().or(calendar_tz);
    time.date.map(|date| Ok(start_of_day(date, zone)))
}

/// Midnight of `date` in `zone`; UTC when the zone is unknown.
fn start_of_day(date: NaiveDate, zone: Option<&str>) -> DateTime<FixedOffset> {
    let midnight = date.and_time(NaiveTime::default());
    let tz: Tz = zone.and_then(|z| z.parse().ok()).unwrap_or(Tz::UTC);

    // Midnight can fall in a DST gap (e.g. America/Santiago); read it as UTC then.
    let local = tz
        .from_local_datetime(&midnight)
        .earliest()
        .unwrap_or_else(|| tz.from_utc_datetime(&midnight));

    let offset = local.offset().fix();
    local.with_timezone(&offset)
}

/// Metadata pairs shown for an event.
pub fn metadata(event: &GoogleEvent, listed: &ListedEvent) -> Metadata {
    vec![
        ("created".to_string(), event.created.clone()),
        ("description".to_string(), event.description.clone()),
        ("hangoutLink".to_string(), event.hangout_link.clone()),
        ("htmlLink".to_string(), event.html_link.clone()),
        ("iCalUID".to_string(), event.i_cal_uid.clone()),
        ("id".to_string(), event.id.clone()),
        ("summary".to_string(), event.summary.clone()),
        ("start_time".to_string(), listed.window.start_string()),
        ("end_time".to_string(), listed.window.end_string()),
    ]
}

pub trait ToGoogle {
    fn to_google(&self) -> GoogleEvent;
}

impl ToGoogle for NewEvent {
    fn to_google(&self) -> GoogleEvent {
        let event_time = |t: &DateTime<FixedOffset>| EventDateTime {
            date: None,
            date_time: Some(format_timestamp(t)),
            time_zone: self.time_zone.clone(),
        };

        GoogleEvent {
            summary: self.summary.clone(),
            description: self.description.clone().unwrap_or_default(),
            start: Some(event_time(&self.start)),
            end: Some(event_time(&self.end)),
            ..Default::default()
        }
    }
}
