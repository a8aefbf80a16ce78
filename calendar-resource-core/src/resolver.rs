//! Deciding which versions exist right now.
//!
//! A version exists while its event is happening. If the caller's last known
//! version is still happening it is echoed back untouched, even when the
//! fresh listing no longer contains it (for example because it scrolled out
//! of the backend's query window). Otherwise every happening event in the
//! listing is reported, in listing order.

use tracing::debug;

use crate::clock::Clock;
use crate::event_set::EventSet;
use crate::version::{PinnedVersion, Version, VersionEncoding};

pub struct VersionResolver<'a, C: Clock> {
    clock: &'a C,
    encoding: VersionEncoding,
}

impl<'a, C: Clock> VersionResolver<'a, C> {
    pub fn new(clock: &'a C, encoding: VersionEncoding) -> Self {
        VersionResolver { clock, encoding }
    }

    pub fn resolve(&self, events: &EventSet, requested: Option<&PinnedVersion>) -> Vec<Version> {
        if let Some(pinned) = requested {
            if pinned.window.is_happening(self.clock) {
                debug!(version = ?pinned.version, "requested version still happening");
                return vec![pinned.version.clone()];
            }
        }

        let versions: Vec<Version> = events
            .iter()
            .filter(|event| event.window.is_happening(self.clock))
            .map(|event| self.encoding.version_for(event))
            .collect();

        debug!(
            listed = events.len(),
            current = versions.len(),
            "resolved current versions"
        );

        versions
    }
}
