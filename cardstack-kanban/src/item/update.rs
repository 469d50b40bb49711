//! UpdateItem operation

use crate::error::{BoardError, Result};
use crate::execute::Execute;
use crate::service::ItemService;
use crate::sync::{BoardContext, Snapshot};
use crate::transition;
use crate::types::{Item, ItemId, ItemPatch};
use async_trait::async_trait;
use chrono::Utc;

/// Apply a partial field set to an item. A lane change inside the patch
/// routes through the status-transition handler, so the coupled timestamp
/// is written in the same step as the lane.
#[derive(Debug, Clone)]
pub struct UpdateItem {
    /// The item ID to update
    pub id: ItemId,
    /// The fields to change
    pub patch: ItemPatch,
}

impl UpdateItem {
    /// Create a new UpdateItem operation
    pub fn new(id: impl Into<ItemId>, patch: ItemPatch) -> Self {
        Self {
            id: id.into(),
            patch,
        }
    }
}

#[async_trait]
impl<S: ItemService> Execute<S> for UpdateItem {
    type Output = Item;

    async fn execute(&self, ctx: &BoardContext<S>) -> Result<Item> {
        if self.patch.is_empty() {
            return ctx
                .store()
                .get(&self.id)
                .ok_or_else(|| BoardError::item_not_found(self.id.as_str()));
        }

        let now = Utc::now();
        let settled = ctx
            .commit_optimistic(
                "update item",
                &self.id,
                |items| {
                    let snapshot = Snapshot::of(items, &self.id)
                        .ok_or_else(|| BoardError::item_not_found(self.id.as_str()))?;
                    let index = items
                        .iter()
                        .position(|it| it.id == self.id)
                        .ok_or_else(|| BoardError::item_not_found(self.id.as_str()))?;

                    // Validation runs before anything mutates; a rejected
                    // patch leaves the store untouched.
                    self.patch.validate(&items[index])?;

                    let item = &mut items[index];
                    if let Some(lane) = self.patch.lane {
                        transition::apply_lane_change(item, lane, now);
                    }
                    self.patch.apply_fields(item);

                    // The wire patch carries the coupled timestamp so the
                    // authority stores the same transition we applied.
                    let mut outbound = self.patch.clone();
                    if self.patch.lane.is_some() {
                        outbound.completed_at = Some(item.completed_at);
                    }
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
