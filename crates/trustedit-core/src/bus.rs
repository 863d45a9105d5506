//! Typed publish/subscribe bus for session state events.
//!
//! Publishing is synchronous and in-process: every subscriber registered
//! at publish time is invoked, in registration order, before `publish`
//! returns. Missed events are not replayed for late subscribers.

use trustedit_snapshot::Action;

/// Severity of an operator-visible notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warn,
    Info,
    Success,
}

/// The closed set of event channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    QueueUpdated,
    NotificationAdded,
    NotificationRemoved,
    SessionLoaded,
}

/// An event published on the bus.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// The dirty flag changed; payload is its new value.
    QueueUpdated { dirty: bool },
    /// An operator-visible notification was raised.
    NotificationAdded { message: String, severity: Severity },
    /// A previously raised notification was dismissed.
    NotificationRemoved { message: String, severity: Severity },
    /// A saved session was loaded; payload is its path/action pairs.
    SessionLoaded { entries: Vec<(String, Action)> },
}

impl SessionEvent {
    /// The channel this event belongs to.
    pub fn kind(&self) -> EventKind {
        match self {
            SessionEvent::QueueUpdated { .. } => EventKind::QueueUpdated,
            SessionEvent::NotificationAdded { .. } => EventKind::NotificationAdded,
            SessionEvent::NotificationRemoved { .. } => EventKind::NotificationRemoved,
            SessionEvent::SessionLoaded { .. } => EventKind::SessionLoaded,
        }
    }
}

/// Handle returned by [`Bus::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

struct Subscriber {
    id: SubscriberId,
    kind: EventKind,
    callback: Box<dyn FnMut(&SessionEvent)>,
}

/// Synchronous multi-subscriber event bus.
#[derive(Default)]
pub struct Bus {
    subscribers: Vec<Subscriber>,
    next_id: u64,
}

impl Bus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback for one event channel.
    pub fn subscribe<F>(&mut self, kind: EventKind, callback: F) -> SubscriberId
    where
        F: FnMut(&SessionEvent) + 'static,
    {
        let id = SubscriberId(self.next_id);
        self.next_id += 1;
        self.subscribers.push(Subscriber {
            id,
            kind,
            callback: Box::new(callback),
        });
        id
    }

    /// Remove a subscriber. Unknown ids are ignored.
    pub fn unsubscribe(&mut self, id: SubscriberId) {
        self.subscribers.retain(|s| s.id != id);
    }

    /// Invoke every subscriber on the event's channel, in registration
    /// order, before returning.
    pub fn publish(&mut self, event: &SessionEvent) {
        let kind = event.kind();
        for subscriber in &mut self.subscribers {
            if subscriber.kind == kind {
                (subscriber.callback)(event);
            }
        }
    }
}

impl std::fmt::Debug for Bus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bus")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
