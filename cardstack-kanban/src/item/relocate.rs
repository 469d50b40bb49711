//! RelocateItem operation
//!
//! The single command a drag gesture lowers to; the reorder engine itself
//! has no dependency on any presentation-layer event model.

use crate::error::{BoardError, Result};
use crate::execute::Execute;
use crate::reorder;
use crate::service::ItemService;
use crate::sync::{BoardContext, Snapshot};
use crate::transition;
use crate::types::{Item, ItemId, ItemPatch, Lane};
use async_trait::async_trait;
use chrono::Utc;

/// Move an item to a lane at a position within that lane
#[derive(Debug, Clone)]
pub struct RelocateItem {
    /// The item ID to move
    pub id: ItemId,
    /// The target lane
    pub lane: Lane,
    /// Zero-based position within the target lane; out-of-range appends
    pub position: usize,
}

impl RelocateItem {
    /// Create a new RelocateItem operation
    pub fn new(id: impl Into<ItemId>, lane: Lane, position: usize) -> Self {
        Self {
            id: id.into(),
            lane,
            position,
        }
    }
}

#[async_trait]
impl<S: ItemService> Execute<S> for RelocateItem {
    type Output = Item;

    async fn execute(&self, ctx: &BoardContext<S>) -> Result<Item> {
        let now = Utc::now();
        let settled = ctx
            .commit_optimistic(
                "relocate item",
                &self.id,
                |items| {
                    let Some(plan) =
                        reorder::plan_relocation(items, &self.id, self.lane, self.position)?
                    else {
                        // The drop didn't move anything: no store write, no
                        // remote write, no notification.
                        return Ok(None);
                    };

                    let snapshot = Snapshot::of(items, &self.id)
                        .ok_or_else(|| BoardError::item_not_found(self.id.as_str()))?
                        .with_order(items);

                    reorder::apply_order(items, &plan.order);
                    let item = items
                        .iter_mut()
                        .find(|it| it.id == self.id)
                        .ok_or_else(|| BoardError::item_not_found(self.id.as_str()))?;
                    let lane_changed = item.lane != self.lane;
                    transition::apply_lane_change(item, self.lane, now);

                    // The authority stores no ordinal, so the commit carries
                    // the lane and, on a lane change, the coupled timestamp;
                    // intra-lane order stays session-local.
                    let mut outbound = ItemPatch::new().lane(self.lane);
                    if lane_changed {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{seeded_board, setup};
    use crate::ServiceError;

    fn titles(ctx: &BoardContext<crate::test_support::InMemoryService>) -> Vec<String> {
        ctx.store().items().into_iter().map(|it| it.title).collect()
    }

    #[tokio::test]
    async fn test_relocate_between_lanes() {
        // Scenario A: [T1:Planned, T2:InProgress, T3:InProgress, T4:Completed],
        // drop T1 between T2 and T3.
        let items = seeded_board();
        let t1 = items[0].id.clone();
        let ctx = setup(items);

        let moved = RelocateItem::new(t1, Lane::InProgress, 1)
            .execute(&ctx)
            .await
            .unwrap();

        assert_eq!(titles(&ctx), vec!["T2", "T1", "T3", "T4"]);
        assert_eq!(moved.lane, Lane::InProgress);
    }

    #[tokio::test]
    async fn test_reopen_completed_item() {
        // Scenario B: drop T4 at the end of In-Progress.
        let items = seeded_board();
        let t4 = items[3].id.clone();
        let ctx = setup(items);

        let moved = RelocateItem::new(t4, Lane::InProgress, 2)
            .execute(&ctx)
            .await
            .unwrap();

        assert_eq!(titles(&ctx), vec!["T1", "T2", "T3", "T4"]);
        assert_eq!(moved.lane, Lane::InProgress);
        assert!(moved.completed_at.is_none());
        assert!(moved.timestamps_consistent());
    }

    #[tokio::test]
    async fn test_noop_drop_skips_remote_write() {
        let items = seeded_board();
        let t2 = items[1].id.clone();
        let ctx = setup(items);
        let before = ctx.store().items();

        // T2 is already the first In-Progress item.
        RelocateItem::new(t2, Lane::InProgress, 0)
            .execute(&ctx)
            .await
            .unwrap();

        assert_eq!(ctx.store().items(), before);
        assert_eq!(ctx.service().call_count(), 0);
    }

    #[tokio::test]
    async fn test_relocate_rollback_restores_order_and_fields() {
        let items = seeded_board();
        let t4 = items[3].id.clone();
        let ctx = setup(items);
        let before = ctx.store().items();

        ctx.service()
            .fail_next(ServiceError::Transient("boom".into()));
        let result = RelocateItem::new(t4, Lane::InProgress, 0).execute(&ctx).await;

        assert!(result.is_err());
        assert_eq!(ctx.store().items(), before);
    }

    #[tokio::test]
    async fn test_relocate_unknown_id_aborts() {
        let ctx = setup(seeded_board());
        let before = ctx.store().items();

        let result = RelocateItem::new("missing", Lane::Planned, 0)
            .execute(&ctx)
            .await;

        assert!(matches!(result, Err(BoardError::ItemNotFound { .. })));
        assert_eq!(ctx.store().items(), before);
    }
}
