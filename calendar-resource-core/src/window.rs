//! Time windows and their RFC 3339 wire form.

use chrono::{DateTime, FixedOffset, SecondsFormat};

use crate::clock::Clock;
use crate::error::{ResourceError, ResourceResult};

/// The span of one calendar event.
///
/// `start < end` is expected but not checked here: a malformed window from
/// the backend simply never tests as happening.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

impl TimeWindow {
    pub fn new(start: DateTime<FixedOffset>, end: DateTime<FixedOffset>) -> Self {
        TimeWindow { start, end }
    }

    /// Parse a window from its two wire timestamps.
    pub fn parse(start: &str, end: &str) -> ResourceResult<Self> {
        Ok(TimeWindow {
            start: parse_timestamp(start)?,
            end: parse_timestamp(end)?,
        })
    }

    pub fn is_happening(&self, clock: &impl Clock) -> bool {
        clock.is_happening(&self.start, &self.end)
    }

    pub fn start_string(&self) -> String {
        format_timestamp(&self.start)
    }

    pub fn end_string(&self) -> String {
        format_timestamp(&self.end)
    }
}

/// Format an instant as RFC 3339, keeping its offset (e.g. `2016-10-02T14:00:00+01:00`).
pub fn format_timestamp(t: &DateTime<FixedOffset>) -> String {
    t.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

pub fn parse_timestamp(s: &str) -> ResourceResult<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(s).map_err(|e| ResourceError::InvalidTimestamp {
        value: s.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_format_keeps_offset() {
        let t = parse_timestamp("2016-10-02T14:00:00+01:00").unwrap();
        assert_eq!(format_timestamp(&t), "2016-10-02T14:00:00+01:00");
    }

    #[test]
    fn test_format_uses_z_for_utc() {
        let t = parse_timestamp("2016-10-02T13:00:00+00:00").unwrap();
        assert_eq!(format_timestamp(&t), "2016-10-02T13:00:00Z");
    }

    #[test]
    fn test_parse_rejects_non_rfc3339() {
        let err = parse_timestamp("2016-10-02 14:00").unwrap_err();
        assert!(matches!(err, ResourceError::InvalidTimestamp { .. }));
    }

    #[test]
    fn test_parse_window() {
        let w = TimeWindow::parse("2016-10-02T14:00:00+01:00", "2016-10-02T15:00:00+01:00")
            .unwrap();
        assert_eq!(w.start_string(), "2016-10-02T14:00:00+01:00");
        assert_eq!(w.end_string(), "2016-10-02T15:00:00+01:00");
    }

    proptest! {
        #[test]
        fn test_window_survives_wire_form(
            start_secs in 0i64..4_000_000_000,
            len_secs in 1i64..1_000_000,
            offset_minutes in -12i32 * 60..=14 * 60,
        ) {
            let offset = FixedOffset::east_opt(offset_minutes * 60).unwrap();
            let start = DateTime::from_timestamp(start_secs, 0).unwrap().with_timezone(&offset);
            let end = DateTime::from_timestamp(start_secs + len_secs, 0).unwrap().with_timezone(&offset);
            let window = TimeWindow::new(start, end);

            let parsed = TimeWindow::parse(&window.start_string(), &window.end_string()).unwrap();

            prop_assert_eq!(parsed, window);
            prop_assert_eq!(parsed.start.offset(), window.start.offset());
        }
    }
}
