//! Archive sweep
//!
//! Items that have sat in the Completed lane for sixty days or more are
//! moved to the archive automatically. The sweep runs after every board
//! load; callers that keep a board open long-term can also spawn the
//! periodic variant.

use crate::error::{BoardError, Result};
use crate::execute::Execute;
use crate::service::ItemService;
use crate::sync::BoardContext;
use crate::types::{ItemId, Lane};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tracing::{debug, warn};

use super::ArchiveItem;

/// Completed items older than this are swept into the archive.
pub const ARCHIVE_THRESHOLD_DAYS: i64 = 60;

/// Archive every completed item whose completion timestamp is at least
/// [`ARCHIVE_THRESHOLD_DAYS`] old. Returns the IDs that were archived.
#[derive(Debug, Clone, Default)]
pub struct SweepArchive {
    now: Option<DateTime<Utc>>,
}

impl SweepArchive {
    /// Create a new SweepArchive operation
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the clock the sweep measures age against
    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = Some(now);
        self
    }
}

#[async_trait]
impl<S: ItemService> Execute<S> for SweepArchive {
    type Output = Vec<ItemId>;

    async fn execute(&self, ctx: &BoardContext<S>) -> Result<Vec<ItemId>> {
        let now = self.now.unwrap_or_else(Utc::now);
        let cutoff = now - Duration::days(ARCHIVE_THRESHOLD_DAYS);

        let due: Vec<ItemId> = ctx
            .store()
            .items()
            .into_iter()
            .filter(|it| {
                !it.archived
                    && it.lane == Lane::Completed
                    && it.completed_at.is_some_and(|at| at <= cutoff)
            })
            .map(|it| it.id)
            .collect();

        if due.is_empty() {
            return Ok(Vec::new());
        }
        debug!(count = due.len(), "sweeping stale completed items");

        let mut archived = Vec::with_capacity(due.len());
        for id in due {
            match ArchiveItem::new(id.clone()).at(now).execute(ctx).await {
                Ok(_) => archived.push(id),
                // The item moved or was archived out from under us
                // between the scan and the archive. Skip it.
                Err(BoardError::Validation { .. }) | Err(BoardError::ItemNotFound { .. }) => {}
                Err(error) => {
                    warn!(id = %id, %error, "archive sweep failed for item");
                }
            }
        }
        Ok(archived)
    }
}

/// Run [`SweepArchive`] on a fixed interval until the handle is aborted.
pub fn spawn_periodic_sweep<S: ItemService>(
    ctx: Arc<BoardContext<S>>,
    period: std::time::Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // The first tick fires immediately; skip it so spawning right
        // after a load does not sweep twice.
        interval.tick().await;
        loop {
            interval.tick().await;
            if let Err(error) = SweepArchive::new().execute(ctx.as_ref()).await {
                warn!(%error, "periodic archive sweep failed");
            }
        }
    })
}
