//! PurgeItem operation

use crate::error::{BoardError, Result};
use crate::execute::Execute;
use crate::service::ItemService;
use crate::sync::{BoardContext, Snapshot};
use async_trait::async_trait;

use crate::types::ItemId;

/// Permanently delete an archived item. Live items must be archived
/// first; this is the only destructive path out of the archive.
#[derive(Debug, Clone)]
pub struct PurgeItem {
    /// The item ID to permanently delete
    pub id: ItemId,
}

impl PurgeItem {
    /// Create a new PurgeItem operation
    pub fn new(id: impl Into<ItemId>) -> Self {
        Self { id: id.into() }
    }
}

#[async_trait]
impl<S: ItemService> Execute<S> for PurgeItem {
    type Output = ();

    async fn execute(&self, ctx: &BoardContext<S>) -> Result<()> {
        ctx.commit_optimistic(
            "purge item",
            &self.id,
            |items| {
                let index = items
                    .iter()
                    .position(|it| it.id == self.id)
                    .ok_or_else(|| BoardError::item_not_found(self.id.as_str()))?;
                if !items[index].archived {
                    return Err(BoardError::validation(
                        "archived",
                        "only archived items can be permanently deleted",
                    ));
                }

                let snapshot = Snapshot::of(items, &self.id)
                    .ok_or_else(|| BoardError::item_not_found(self.id.as_str()))?;
                items.remove(index);
                Ok(Some((snapshot, ())))
            },
            |()| async move { ctx.service().delete_item(&self.id).await.map(|()| None) },
        )
        .await?;
        Ok(())
    }
}
