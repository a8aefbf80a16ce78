//! Core of the calendar pipeline resource.
//!
//! A resource version is the time window of a calendar event, and a version
//! exists while its event is happening. This crate holds:
//! - `Clock` and `TimeWindow`, the notion of "happening now"
//! - `VersionResolver`, which turns a listing into the current versions
//! - `CalendarProvider`, the contract every backend implements
//! - `protocol`, the check/in/out request and response types

pub mod clock;
pub mod error;
pub mod event_set;
pub mod protocol;
pub mod provider;
pub mod resolver;
pub mod version;
pub mod window;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{ErrorKind, ResourceError, ResourceResult};
pub use event_set::{EventSet, ListedEvent};
pub use provider::{CalendarProvider, EventFilter, EventParams, FetchedEvent, Metadata, NewEvent};
pub use resolver::VersionResolver;
pub use version::{PinnedVersion, Version, VersionEncoding};
pub use window::TimeWindow;
