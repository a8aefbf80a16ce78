//! The events a provider returned for one invocation.

use crate::window::TimeWindow;

/// One matching event: its backend id and when it runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedEvent {
    pub id: String,
    pub window: TimeWindow,
}

impl ListedEvent {
    pub fn new(id: impl Into<String>, window: TimeWindow) -> Self {
        ListedEvent {
            id: id.into(),
            window,
        }
    }
}

/// Events in the order the provider returned them (normally by start time).
///
/// Duplicates are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventSet(Vec<ListedEvent>);

impl EventSet {
    pub fn new(events: Vec<ListedEvent>) -> Self {
        EventSet(events)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ListedEvent> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn find_by_id(&self, id: &str) -> Option<&ListedEvent> {
        self.0.iter().find(|e| e.id == id)
    }
}

impl From<Vec<ListedEvent>> for EventSet {
    fn from(events: Vec<ListedEvent>) -> Self {
        EventSet(events)
    }
}

impl FromIterator<ListedEvent> for EventSet {
    fn from_iter<I: IntoIterator<Item = ListedEvent>>(iter: I) -> Self {
        EventSet(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a EventSet {
    type Item = &'a ListedEvent;
    type IntoIter = std::slice::Iter<'a, ListedEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
