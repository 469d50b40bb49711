//! BoardStore - the single ordered collection of work items
//!
//! The store is an explicit object owned by the composition root and handed
//! to consumers, with a subscription contract instead of implicit global
//! mutation. All three lane views are order-preserving filters of one
//! backing sequence guarded by one lock, so no view ever sees a transient
//! inconsistent cut.

use crate::types::{Item, ItemId, Lane};
use std::sync::{PoisonError, RwLock};
use tokio::sync::broadcast;

/// Capacity of the event channel. Consumers that fall this far behind see a
/// `Lagged` error from broadcast and should re-read the store.
const EVENT_CAPACITY: usize = 64;

/// Notification emitted on every store change
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardEvent {
    /// The backing sequence changed; lane views should be re-derived
    Mutated,
    /// A mutation's remote commit failed and was rolled back. The store is
    /// already back in its pre-mutation state when this fires.
    MutationFailed {
        operation: String,
        message: String,
    },
}

/// The single source of truth for the current user's items
pub struct BoardStore {
    items: RwLock<Vec<Item>>,
    events: broadcast::Sender<BoardEvent>,
}

impl BoardStore {
    /// Create an empty store
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            items: RwLock::new(Vec::new()),
            events,
        }
    }

    /// Subscribe to store notifications
    pub fn subscribe(&self) -> broadcast::Receiver<BoardEvent> {
        self.events.subscribe()
    }

    /// Snapshot of the full backing sequence, in order
    pub fn items(&self) -> Vec<Item> {
        self.read(|items| items.to_vec())
    }

    /// Number of items in the backing sequence
    pub fn len(&self) -> usize {
        self.read(<[Item]>::len)
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.read(<[Item]>::is_empty)
    }

    /// Look up a single item by ID
    pub fn get(&self, id: &ItemId) -> Option<Item> {
        self.read(|items| items.iter().find(|it| &it.id == id).cloned())
    }

    /// Order-preserving lane view: the relative order of two items in the
    /// same lane always equals their relative order in the backing sequence.
    pub fn lane(&self, lane: Lane) -> Vec<Item> {
        self.read(|items| {
            items
                .iter()
                .filter(|it| it.lane == lane && !it.archived)
                .cloned()
                .collect()
        })
    }

    /// Archived items, in backing order
    pub fn archived(&self) -> Vec<Item> {
        self.read(|items| items.iter().filter(|it| it.archived).cloned().collect())
    }

    /// Replace the whole collection (initial load), notifying subscribers
    pub fn replace_all(&self, items: Vec<Item>) {
        {
            let mut guard = self
                .items
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            *guard = items;
        }
        self.notify_mutated();
    }

    /// Run a closure against the current backing sequence under the read
    /// lock. Mutation sites use [`Self::mutate`] instead so they always see
    /// the current value, never a stale snapshot.
    pub(crate) fn read<T>(&self, f: impl FnOnce(&[Item]) -> T) -> T {
        let guard = self.items.read().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    /// Run a closure against the backing sequence under the write lock.
    /// Does not notify; callers emit exactly one event per settled change.
    pub(crate) fn mutate<T>(&self, f: impl FnOnce(&mut Vec<Item>) -> T) -> T {
        let mut guard = self.items.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    /// Notify subscribers that the sequence changed
    pub(crate) fn notify_mutated(&self) {
        // Send fails only when nobody is subscribed, which is fine.
        let _ = self.events.send(BoardEvent::Mutated);
    }

    /// Notify subscribers that a mutation failed and was rolled back
    pub(crate) fn notify_failure(&self, operation: &str, message: impl Into<String>) {
        let _ = self.events.send(BoardEvent::MutationFailed {
            operation: operation.to_string(),
            message: message.into(),
        });
    }
}

impl Default for BoardStore {
    fn default() -> Self {
        Self::new()
    }
}
