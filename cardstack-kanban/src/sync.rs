//! Mutation synchronizer
//!
//! Every create/update/delete/relocate runs through one parametrized
//! optimistic pipeline: snapshot the touched items, apply to the store so
//! the interface reflects the change immediately, commit to the remote
//! authority, then reconcile the authoritative value back in - or restore
//! the snapshot exactly and notify on failure. Remote failures never escape
//! this boundary unrolled-back.
//!
//! Mutations to the same item are serialized per ID; operations on
//! different items still overlap freely and settle independently.

use crate::error::{BoardError, Result};
use crate::reorder;
use crate::service::{ItemService, ServiceResult};
use crate::store::BoardStore;
use crate::types::{Item, ItemId};
use dashmap::DashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, warn};

/// Pre-mutation state of one touched item
#[derive(Debug, Clone)]
pub(crate) enum Prior {
    /// The item did not exist; rollback removes it
    Absent,
    /// The item existed at `index` with this exact value
    Present { index: usize, item: Item },
}

/// Exact pre-mutation state of everything one operation touches.
///
/// Restoring puts every touched item back field-for-field without
/// disturbing items the operation never touched, so a concurrently-settled
/// independent update is not clobbered by this rollback.
#[derive(Debug, Clone, Default)]
pub(crate) struct Snapshot {
    touched: Vec<(ItemId, Prior)>,
    /// Prior backing order, captured only by relocations
    order: Option<Vec<ItemId>>,
}

impl Snapshot {
    /// Snapshot an item that does not exist yet (a create)
    pub(crate) fn absent(id: ItemId) -> Self {
        Self {
            touched: vec![(id, Prior::Absent)],
            order: None,
        }
    }

    /// Snapshot the current value of an existing item
    pub(crate) fn of(items: &[Item], id: &ItemId) -> Option<Self> {
        let index = items.iter().position(|it| &it.id == id)?;
        Some(Self {
            touched: vec![(
                id.clone(),
                Prior::Present {
                    index,
                    item: items[index].clone(),
                },
            )],
            order: None,
        })
    }

    /// Also capture the full backing order (relocations roll back the
    /// splice, not just the item's fields)
    pub(crate) fn with_order(mut self, items: &[Item]) -> Self {
        self.order = Some(items.iter().map(|it| it.id.clone()).collect());
        self
    }

    /// Restore every snapshotted item to its exact pre-mutation value
    pub(crate) fn restore(&self, items: &mut Vec<Item>) {
        for (id, prior) in &self.touched {
            match prior {
                Prior::Absent => items.retain(|it| &it.id != id),
                Prior::Present { index, item } => {
                    if let Some(slot) = items.iter_mut().find(|it| &it.id == id) {
                        *slot = item.clone();
                    } else {
                        items.insert((*index).min(items.len()), item.clone());
                    }
                }
            }
        }
        if let Some(order) = &self.order {
            reorder::apply_order(items, order);
        }
    }
}

/// The engine's composition-root handle: the store, the remote service, and
/// the per-item in-flight locks. Access, not logic - operations do the work.
pub struct BoardContext<S> {
    store: Arc<BoardStore>,
    service: Arc<S>,
    in_flight: DashMap<ItemId, Arc<Mutex<()>>>,
}

impl<S: ItemService> BoardContext<S> {
    /// Create a context over a store and a remote service
    pub fn new(store: Arc<BoardStore>, service: Arc<S>) -> Self {
        Self {
            store,
            service,
            in_flight: DashMap::new(),
        }
    }

    /// The item store
    pub fn store(&self) -> &BoardStore {
        &self.store
    }

    /// The remote service
    pub fn service(&self) -> &S {
        &self.service
    }

    /// Serialize mutations per item ID. Concurrent edits to one item were a
    /// lost-update hazard in the ancestry of this engine; holding this guard
    /// across the commit closes it without serializing unrelated items.
    async fn item_guard(&self, id: &ItemId) -> OwnedMutexGuard<()> {
        let lock = self
            .in_flight
            .entry(id.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        lock.lock_owned().await
    }

    /// The optimistic pipeline shared by every mutating operation.
    ///
    /// `apply` runs under the store's write lock against the *current*
    /// sequence (never a stale snapshot) and returns the pre-mutation
    /// [`Snapshot`] plus whatever payload the remote commit needs, or
    /// `None` for a no-op drop that should skip the remote write entirely.
    /// `remote` turns that payload into the asynchronous commit; a `Some`
    /// result is the authoritative item to reconcile back in.
    pub(crate) async fn commit_optimistic<T, A, C, Fut>(
        &self,
        operation: &'static str,
        id: &ItemId,
        apply: A,
        remote: C,
    ) -> Result<Option<Item>>
    where
        A: FnOnce(&mut Vec<Item>) -> Result<Option<(Snapshot, T)>>,
        C: FnOnce(T) -> Fut,
        Fut: Future<Output = ServiceResult<Option<Item>>>,
    {
        let _guard = self.item_guard(id).await;

        let applied = self.store.mutate(apply)?;
        let Some((snapshot, payload)) = applied else {
            return Ok(self.store.get(id));
        };
        self.store.notify_mutated();
        debug!(operation, id = %id, "optimistic apply");

        match remote(payload).await {
            Ok(authoritative) => {
                if let Some(server_item) = &authoritative {
                    // The server may normalize fields; replace the
                    // optimistic value in place, keeping its position.
                    self.store.mutate(|items| {
                        if let Some(slot) =
                            items.iter_mut().find(|it| it.id == server_item.id)
                        {
                            *slot = server_item.clone();
                        }
                    });
                    self.store.notify_mutated();
                }
                debug!(operation, id = %id, "remote commit settled");
                Ok(authoritative)
            }
            Err(err) => {
                warn!(operation, id = %id, error = %err, "remote commit failed, rolling back");
                self.store.mutate(|items| snapshot.restore(items));
                self.store.notify_mutated();
                self.store.notify_failure(operation, err.to_string());
                Err(BoardError::Service(err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Lane;

    fn item(title: &str, lane: Lane) -> Item {
        let mut it = Item::new(title);
        it.lane = lane;
        it
    }

    #[test]
    fn test_snapshot_restore_replaces_value_in_place() {
        let a = item("A", Lane::Planned);
        let b = item("B", Lane::InProgress);
        let mut items = vec![a.clone(), b.clone()];

        let snap = Snapshot::of(&items, &b.id).unwrap();
        items[1].title = "B-edited".into();
        snap.restore(&mut items);

        assert_eq!(items[1], b);
        assert_eq!(items[0], a);
    }

    #[test]
    fn test_snapshot_restore_reinserts_deleted_item_at_index() {
        let a = item("A", Lane::Planned);
        let b = item("B", Lane::InProgress);
        let c = item("C", Lane::Completed);
        let mut items = vec![a.clone(), b.clone(), c.clone()];

        let snap = Snapshot::of(&items, &b.id).unwrap();
        items.remove(1);
        snap.restore(&mut items);

        assert_eq!(items, vec![a, b, c]);
    }

    #[test]
    fn test_snapshot_absent_removes_created_item() {
        let a = item("A", Lane::Planned);
        let created = item("New", Lane::Planned);
        let snap = Snapshot::absent(created.id.clone());

        let mut items = vec![a.clone(), created];
        snap.restore(&mut items);
        assert_eq!(items, vec![a]);
    }

    #[test]
    fn test_snapshot_order_restore_spares_untouched_edits() {
        let a = item("A", Lane::Planned);
        let b = item("B", Lane::InProgress);
        let c = item("C", Lane::InProgress);
        let mut items = vec![a.clone(), b.clone(), c.clone()];

        let snap = Snapshot::of(&items, &c.id).unwrap().with_order(&items);

        // Optimistic move of C to the front...
        let moved = items.remove(2);
        items.insert(0, moved);
        // ...while an independent update to A settles concurrently.
        items[1].title = "A-settled".into();

        snap.restore(&mut items);

        let titles: Vec<&str> = items.iter().map(|it| it.title.as_str()).collect();
        assert_eq!(titles, vec!["A-settled", "B", "C"]);
    }
}
