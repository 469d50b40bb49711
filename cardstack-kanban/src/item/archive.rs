//! ArchiveItem operation

use crate::error::{BoardError, Result};
use crate::execute::Execute;
use crate::service::ItemService;
use crate::sync::{BoardContext, Snapshot};
use crate::types::{Item, ItemId, ItemPatch, Lane};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Archive a completed item. Idempotent: archiving an already-archived
/// item changes nothing and issues no remote write.
#[derive(Debug, Clone)]
pub struct ArchiveItem {
    /// The item ID to archive
    pub id: ItemId,
    now: Option<DateTime<Utc>>,
}

impl ArchiveItem {
    /// Create a new ArchiveItem operation
    pub fn new(id: impl Into<ItemId>) -> Self {
        Self {
            id: id.into(),
            now: None,
        }
    }

    /// Override the archival timestamp (used by the sweep and by tests)
    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = Some(now);
        self
    }
}

#[async_trait]
impl<S: ItemService> Execute<S> for ArchiveItem {
    type Output = Item;

    async fn execute(&self, ctx: &BoardContext<S>) -> Result<Item> {
        let now = self.now.unwrap_or_else(Utc::now);
        let settled = ctx
            .commit_optimistic(
                "archive item",
                &self.id,
                |items| {
                    let index = items
                        .iter()
                        .position(|it| it.id == self.id)
                        .ok_or_else(|| BoardError::item_not_found(self.id.as_str()))?;
                    if items[index].archived {
                        return Ok(None);
                    }
                    if items[index].lane != Lane::Completed {
                        return Err(BoardError::validation(
                            "archived",
                            "only completed items can be archived",
                        ));
                    }

                    let snapshot = Snapshot::of(items, &self.id)
                        .ok_or_else(|| BoardError::item_not_found(self.id.as_str()))?;
                    let item = &mut items[index];
                    item.archived = true;
                    item.archived_at = Some(now);

                    let mut outbound = ItemPatch::new();
                    outbound.archived = Some(true);
                    outbound.archived_at = Some(Some(now));
                    Ok(Some((snapshot, outbound)))
                },
                |outbound| async move {
                    ctx.service().update_item(&self.id, &outbound).await.map(Some)
                },
            )
            .await?;

        settled.ok_or_else(|| BoardError::item_not_found(self.id.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{seeded_item, setup};
    use crate::ServiceError;

    #[tokio::test]
    async fn test_archive_completed_item() {
        let seed = seeded_item("Done", Lane::Completed);
        let id = seed.id.clone();
        let completed_at = seed.completed_at;
        let ctx = setup(vec![seed]);

        let archived = ArchiveItem::new(id).execute(&ctx).await.unwrap();

        assert!(archived.archived);
        assert!(archived.archived_at.is_some());
        // Archiving never clears the completion timestamp.
        assert_eq!(archived.completed_at, completed_at);
    }

    #[tokio::test]
    async fn test_archive_requires_completed_lane() {
        let seed = seeded_item("WIP", Lane::InProgress);
        let id = seed.id.clone();
        let ctx = setup(vec![seed]);

        let result = ArchiveItem::new(id).execute(&ctx).await;
        assert!(matches!(result, Err(BoardError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_archive_is_idempotent() {
        let seed = seeded_item("Done", Lane::Completed);
        let id = seed.id.clone();
        let ctx = setup(vec![seed]);

        ArchiveItem::new(id.clone()).execute(&ctx).await.unwrap();
        let calls = ctx.service().call_count();

        ArchiveItem::new(id).execute(&ctx).await.unwrap();
        assert_eq!(ctx.service().call_count(), calls);
    }

    #[tokio::test]
    async fn test_archive_rollback() {
        let seed = seeded_item("Done", Lane::Completed);
        let id = seed.id.clone();
        let ctx = setup(vec![seed]);
        let before = ctx.store().get(&id).unwrap();

        ctx.service()
            .fail_next(ServiceError::Transient("boom".into()));
        let result = ArchiveItem::new(id.clone()).execute(&ctx).await;

        assert!(result.is_err());
        assert_eq!(ctx.store().get(&id).unwrap(), before);
    }
}
