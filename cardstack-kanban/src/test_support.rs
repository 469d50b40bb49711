//! Test fixtures: an in-memory [`ItemService`] and board seeding helpers.
//!
//! Enabled by the `test-support` feature so integration tests and downstream
//! crates can exercise the engine without a live remote.

use crate::service::{ItemService, ServiceError, ServiceResult};
use crate::store::BoardStore;
use crate::sync::BoardContext;
use crate::types::{Item, ItemId, ItemPatch, Lane};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// An in-memory remote service. Behaves like the real endpoint: it keeps an
/// authoritative copy, stamps `created_at`/`updated_at` the way the server
/// does, and can be scripted to fail its next call.
#[derive(Default)]
pub struct InMemoryService {
    stored: Mutex<Vec<Item>>,
    fail_next: Mutex<Option<ServiceError>>,
    calls: AtomicUsize,
}

impl InMemoryService {
    /// An empty service
    pub fn new() -> Self {
        Self::default()
    }

    /// A service pre-seeded with items, as if they were created earlier
    pub fn seeded(items: Vec<Item>) -> Self {
        let now = Utc::now();
        let stored = items
            .into_iter()
            .map(|mut it| {
                it.created_at.get_or_insert(now);
                it.updated_at.get_or_insert(now);
                it
            })
            .collect();
        Self {
            stored: Mutex::new(stored),
            ..Self::default()
        }
    }

    /// Make the next call fail with `error`, then recover
    pub fn fail_next(&self, error: ServiceError) {
        *self
            .fail_next
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(error);
    }

    /// How many items the service currently holds
    pub fn stored_count(&self) -> usize {
        self.stored
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// How many calls the service has received, failures included
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn check(&self) -> ServiceResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self
            .fail_next
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ItemService for InMemoryService {
    async fn list_items(&self) -> ServiceResult<Vec<Item>> {
        self.check()?;
        Ok(self
            .stored
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    async fn create_item(&self, item: &Item) -> ServiceResult<Item> {
        self.check()?;
        let now = Utc::now();
        let mut created = item.clone();
        created.created_at = Some(now);
        created.updated_at = Some(now);
        self.stored
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(created.clone());
        Ok(created)
    }

    async fn update_item(&self, id: &ItemId, patch: &ItemPatch) -> ServiceResult<Item> {
        self.check()?;
        let mut stored = self.stored.lock().unwrap_or_else(PoisonError::into_inner);
        let item = stored
            .iter_mut()
            .find(|it| &it.id == id)
            .ok_or(ServiceError::NotFound)?;
        patch.apply_fields(item);
        // The server merges lane and completion verbatim; the coupling is
        // the client's responsibility.
        if let Some(lane) = patch.lane {
            item.lane = lane;
        }
        if let Some(completed_at) = patch.completed_at {
            item.completed_at = completed_at;
        }
        item.updated_at = Some(Utc::now());
        Ok(item.clone())
    }

    async fn delete_item(&self, id: &ItemId) -> ServiceResult<()> {
        self.check()?;
        let mut stored = self.stored.lock().unwrap_or_else(PoisonError::into_inner);
        let before = stored.len();
        stored.retain(|it| &it.id != id);
        if stored.len() == before {
            return Err(ServiceError::NotFound);
        }
        Ok(())
    }
}

/// A context whose store and service both already hold `items`
pub fn setup(items: Vec<Item>) -> BoardContext<InMemoryService> {
    let store = Arc::new(BoardStore::new());
    store.replace_all(items.clone());
    let service = Arc::new(InMemoryService::seeded(items));
    BoardContext::new(store, service)
}

/// A single item in `lane`, with the completion stamp the lane implies
pub fn seeded_item(title: impl Into<String>, lane: Lane) -> Item {
    let mut item = Item::new(title);
    item.lane = lane;
    if lane == Lane::Completed {
        item.completed_at = Some(Utc::now());
    }
    item
}

/// The canonical four-item board used across the operation tests:
/// T1 Planned, T2 and T3 In-Progress, T4 Completed.
pub fn seeded_board() -> Vec<Item> {
    vec![
        seeded_item("T1", Lane::Planned),
        seeded_item("T2", Lane::InProgress),
        seeded_item("T3", Lane::InProgress),
        seeded_item("T4", Lane::Completed),
    ]
}
