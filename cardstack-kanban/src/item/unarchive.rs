//! UnarchiveItem operation

use crate::error::{BoardError, Result};
use crate::execute::Execute;
use crate::service::ItemService;
use crate::sync::{BoardContext, Snapshot};
use crate::transition::apply_lane_change;
use crate::types::{Item, ItemId, ItemPatch, Lane};
use async_trait::async_trait;
use chrono::Utc;

/// Restore an archived item to the board. The item returns to the
/// In-Progress lane with its completion timestamp cleared.
#[derive(Debug, Clone)]
pub struct UnarchiveItem {
    /// The item ID to restore
    pub id: ItemId,
}

impl UnarchiveItem {
    /// Create a new UnarchiveItem operation
    pub fn new(id: impl Into<ItemId>) -> Self {
        Self { id: id.into() }
    }
}

#[async_trait]
impl<S: ItemService> Execute<S> for UnarchiveItem {
    type Output = Item;

    async fn execute(&self, ctx: &BoardContext<S>) -> Result<Item> {
        let now = Utc::now();
        let settled = ctx
            .commit_optimistic(
                "unarchive item",
                &self.id,
                |items| {
                    let index = items
                        .iter()
                        .position(|it| it.id == self.id)
                        .ok_or_else(|| BoardError::item_not_found(self.id.as_str()))?;
                    if !items[index].archived {
                        return Err(BoardError::validation(
                            "archived",
                            "item is not archived",
                        ));
                    }

                    let snapshot = Snapshot::of(items, &self.id)
                        .ok_or_else(|| BoardError::item_not_found(self.id.as_str()))?;
                    let item = &mut items[index];
                    item.archived = false;
                    item.archived_at = None;
                    apply_lane_change(item, Lane::InProgress, now);
                    // Reopening from Completed already clears the stamp;
                    // clear it explicitly for items archived in odd states.
                    item.completed_at = None;

                    let mut outbound = ItemPatch::new().lane(Lane::InProgress);
                    outbound.archived = Some(false);
                    outbound.archived_at = Some(None);
                    outbound.completed_at = Some(None);
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
