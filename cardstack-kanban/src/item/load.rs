//! LoadItems operation

use crate::error::Result;
use crate::execute::Execute;
use crate::item::SweepArchive;
use crate::service::ItemService;
use crate::sync::BoardContext;
use async_trait::async_trait;
use tracing::debug;

/// Replace the board with the remote item list, then run the archive
/// sweep over what arrived. Returns the number of items loaded.
#[derive(Debug, Clone, Default)]
pub struct LoadItems;

impl LoadItems {
    /// Create a new LoadItems operation
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl<S: ItemService> Execute<S> for LoadItems {
    type Output = usize;

    async fn execute(&self, ctx: &BoardContext<S>) -> Result<usize> {
        let items = ctx.service().list_items().await?;
        let count = items.len();
        ctx.store().replace_all(items);
        debug!(count, "loaded items from remote");

        let swept = SweepArchive::new().execute(ctx).await?;
        if !swept.is_empty() {
            debug!(count = swept.len(), "archived stale items on load");
        }
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{seeded_board, seeded_item, setup};
    use crate::types::Lane;
    use crate::ServiceError;
    use chrono::{Duration, Utc};

    #[tokio::test]
    async fn test_load_replaces_board_contents() {
        let ctx = setup(seeded_board());
        // Drop the local copy; load must bring it back from the service.
        ctx.store().replace_all(vec![]);

        let count = LoadItems::new().execute(&ctx).await.unwrap();

        assert_eq!(count, 4);
        assert_eq!(ctx.store().len(), 4);
        assert_eq!(ctx.store().lane(Lane::InProgress).len(), 2);
    }

    #[tokio::test]
    async fn test_load_sweeps_stale_items() {
        let mut stale = seeded_item("Old", Lane::Completed);
        stale.completed_at = Some(Utc::now() - Duration::days(70));
        let id = stale.id.clone();
        let ctx = setup(vec![stale]);

        LoadItems::new().execute(&ctx).await.unwrap();

        assert!(ctx.store().get(&id).unwrap().archived);
        assert!(ctx.store().lane(Lane::Completed).is_empty());
    }

    #[tokio::test]
    async fn test_load_propagates_service_failure() {
        let ctx = setup(seeded_board());
        ctx.service()
            .fail_next(ServiceError::Unauthorized);

        let result = LoadItems::new().execute(&ctx).await;
        assert!(result.is_err());
        // The board keeps its previous contents on a failed load.
        assert_eq!(ctx.store().len(), 4);
    }
}
