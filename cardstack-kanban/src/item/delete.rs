//! DeleteItem operation

use crate::error::{BoardError, Result};
use crate::execute::Execute;
use crate::service::ItemService;
use crate::sync::{BoardContext, Snapshot};
use crate::types::ItemId;
use async_trait::async_trait;

/// Remove an item from the backing sequence and request remote deletion
#[derive(Debug, Clone)]
pub struct DeleteItem {
    /// The item ID to delete
    pub id: ItemId,
}

impl DeleteItem {
    /// Create a new DeleteItem operation
    pub fn new(id: impl Into<ItemId>) -> Self {
        Self { id: id.into() }
    }
}

#[async_trait]
impl<S: ItemService> Execute<S> for DeleteItem {
    type Output = ();

    async fn execute(&self, ctx: &BoardContext<S>) -> Result<()> {
        ctx.commit_optimistic(
            "delete item",
            &self.id,
            |items| {
                let snapshot = Snapshot::of(items, &self.id)
                    .ok_or_else(|| BoardError::item_not_found(self.id.as_str()))?;
                items.retain(|it| it.id != self.id);
                Ok(Some((snapshot, ())))
            },
            |()| async move { ctx.service().delete_item(&self.id).await.map(|()| None) },
        )
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{seeded_item, setup};
    use crate::types::Lane;
    use crate::ServiceError;

    #[tokio::test]
    async fn test_delete_removes_item() {
        let seed = seeded_item("Card", Lane::Planned);
        let id = seed.id.clone();
        let ctx = setup(vec![seed]);

        DeleteItem::new(id.clone()).execute(&ctx).await.unwrap();
        assert!(ctx.store().is_empty());
        assert_eq!(ctx.service().stored_count(), 0);
    }

    #[tokio::test]
    async fn test_delete_rollback_reinserts_at_prior_index() {
        let a = seeded_item("A", Lane::Planned);
        let b = seeded_item("B", Lane::InProgress);
        let c = seeded_item("C", Lane::Completed);
        let id = b.id.clone();
        let ctx = setup(vec![a, b, c]);
        let before = ctx.store().items();

        ctx.service()
            .fail_next(ServiceError::Transient("boom".into()));
        let result = DeleteItem::new(id).execute(&ctx).await;

        assert!(result.is_err());
        assert_eq!(ctx.store().items(), before);
    }

    #[tokio::test]
    async fn test_delete_unknown_id() {
        let ctx = setup(Vec::new());
        let result = DeleteItem::new("missing").execute(&ctx).await;
        assert!(matches!(result, Err(BoardError::ItemNotFound { .. })));
    }
}
