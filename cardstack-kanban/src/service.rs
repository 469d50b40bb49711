//! The seam to the remote authority
//!
//! The engine only ever talks to the Remote Item Service through this
//! trait; `cardstack-remote` provides the HTTP implementation, tests use
//! the in-memory one from `test_support`.

use crate::types::{Item, ItemId, ItemPatch};
use async_trait::async_trait;
use thiserror::Error;

/// Result type for remote calls
pub type ServiceResult<T> = std::result::Result<T, ServiceError>;

/// Failures a remote call can surface, already classified for the
/// synchronizer's rollback-and-notify policy.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ServiceError {
    /// Missing or rejected credential. The HTTP client raises this for a
    /// missing token before any wire call; a 401/403 response maps here
    /// too, in which case the synchronizer rolls back like any failure.
    #[error("not authenticated")]
    Unauthorized,

    /// The remote rejected the target ID
    #[error("item not found or not authorized")]
    NotFound,

    /// Network, timeout, or server failure - a generic transient failure
    #[error("remote call failed: {0}")]
    Transient(String),
}

/// The authoritative CRUD endpoint for items, scoped to one user
#[async_trait]
pub trait ItemService: Send + Sync + 'static {
    /// Fetch the user's full item collection, in stored order
    async fn list_items(&self) -> ServiceResult<Vec<Item>>;

    /// Store a new item. The payload carries the client-generated ID, so a
    /// retried create is idempotent on the server side too.
    async fn create_item(&self, item: &Item) -> ServiceResult<Item>;

    /// Merge a partial field set into an item, returning the authoritative
    /// item after the merge (the server may normalize fields)
    async fn update_item(&self, id: &ItemId, patch: &ItemPatch) -> ServiceResult<Item>;

    /// Delete an item
    async fn delete_item(&self, id: &ItemId) -> ServiceResult<()>;
}
