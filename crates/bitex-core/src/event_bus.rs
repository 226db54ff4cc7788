//! Synchronous publish / subscribe for client events.
//!
//! The dispatcher only needs somewhere to put events, so it is written
//! against [`EventSink`]. [`EventBus`] is the sink applications use: it
//! calls listeners directly, in registration order, before `publish`
//! returns. There is no queue and no retry.

use crate::event::{Event, EventType};

/// Anything that accepts published events.
pub trait EventSink {
    fn publish(&mut self, event: Event);
}

/// Collects events in publish order. Handy for tests and batch callers.
impl EventSink for Vec<Event> {
    fn publish(&mut self, event: Event) {
        self.push(event);
    }
}

/// Handle returned by [`EventBus::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

type Listener = Box<dyn FnMut(&Event) + Send>;

struct Registration {
    id: ListenerId,
    /// `None` listens to every kind.
    kind: Option<EventType>,
    listener: Listener,
}

/// Registry of listeners keyed by event kind.
#[derive(Default)]
pub struct EventBus {
    registrations: Vec<Registration>,
    next_id: u64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener` for one event kind.
    pub fn subscribe<F>(&mut self, kind: EventType, listener: F) -> ListenerId
    where
        F: FnMut(&Event) + Send + 'static,
    {
        self.register(Some(kind), Box::new(listener))
    }

    /// Register `listener` for every event kind.
    pub fn subscribe_all<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&Event) + Send + 'static,
    {
        self.register(None, Box::new(listener))
    }

    /// Remove a listener. Returns `false` if the id was unknown.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.registrations.len();
        self.registrations.retain(|r| r.id != id);
        self.registrations.len() != before
    }

    /// Number of listeners that would see an event of `kind`.
    pub fn listener_count(&self, kind: EventType) -> usize {
        self.registrations
            .iter()
            .filter(|r| r.kind.map_or(true, |k| k == kind))
            .count()
    }

    fn register(&mut self, kind: Option<EventType>, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.registrations.push(Registration { id, kind, listener });
        id
    }
}

impl EventSink for EventBus {
    fn publish(&mut self, event: Event) {
        for reg in self.registrations.iter_mut() {
            if reg.kind.map_or(true, |k| k == event.kind) {
                (reg.listener)(&event);
            }
        }
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.registrations.len())
            .finish()
    }
}
