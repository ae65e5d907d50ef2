//! Change notification
//!
//! Read views subscribe to the store and get a [`ChangeEvent`] after every
//! successful save, so they know when to re-fetch. Events carry the entity
//! kind only; subscribers re-read whatever they display.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Mutex;

/// Which record collection changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Category,
    Transaction,
}

/// What happened to it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Created,
    Updated,
    Deleted,
    /// Bulk sort-order rewrite
    Reordered,
    /// The whole store was replaced from a backup archive
    Restored,
}

/// Emitted after a mutation has been durably saved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeEvent {
    pub kind: EntityKind,
    pub change: ChangeKind,
}

impl ChangeEvent {
    pub fn new(kind: EntityKind, change: ChangeKind) -> Self {
        Self { kind, change }
    }
}

/// Fan-out of change events to any number of receivers
#[derive(Debug, Default)]
pub struct ChangeNotifier {
    subscribers: Mutex<Vec<Sender<ChangeEvent>>>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new subscriber
    pub fn subscribe(&self) -> Receiver<ChangeEvent> {
        let (tx, rx) = mpsc::channel();
        // A poisoned list only means a previous sender panicked mid-push
        let mut subscribers = self
            .subscribers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        subscribers.push(tx);
        rx
    }

    /// Deliver an event to every live subscriber, forgetting dropped ones
    pub fn notify(&self, event: ChangeEvent) {
        let mut subscribers = self
            .subscribers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        subscribers.retain(|tx| tx.send(event).is_ok());
        tracing::trace!(?event, subscribers = subscribers.len(), "change event sent");
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .lock()
            .map(|s| s.len())
            .unwrap_or_default()
    }
}
