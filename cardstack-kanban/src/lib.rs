//! Kanban item engine with optimistic remote synchronization
//!
//! This crate keeps a single ordered collection of work items consistent with
//! a remote authority while the user keeps interacting. It owns the hard
//! parts of a board client: lane-preserving ordering, status-transition side
//! effects, auto-archival of stale completed items, and optimistic
//! apply/commit/rollback against an asynchronous, potentially-failing item
//! service.
//!
//! ## Overview
//!
//! - **One sequence, three lanes** - all items live in one ordered backing
//!   sequence; the Planned / In-Progress / Completed views are
//!   order-preserving filters of it, so a drag is one splice, not three
//!   per-lane reconciliations
//! - **Operations as structs** - every user action is a struct implementing
//!   [`Execute`] against a [`BoardContext`]
//! - **Optimistic mutations** - the store reflects a change immediately; a
//!   failed remote commit restores the exact pre-mutation state and emits a
//!   [`BoardEvent::MutationFailed`] notification
//! - **Injected collaborators** - the store and the remote service are
//!   explicit objects owned by a composition root, never ambient globals
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use cardstack_kanban::{BoardContext, BoardStore, Execute, Lane};
//! use cardstack_kanban::item::{CreateItem, LoadItems, RelocateItem};
//!
//! # async fn example(service: Arc<impl cardstack_kanban::ItemService>) -> cardstack_kanban::Result<()> {
//! let store = Arc::new(BoardStore::new());
//! let ctx = BoardContext::new(store.clone(), service);
//!
//! // Pull the authoritative collection, then archive anything stale.
//! LoadItems::new().execute(&ctx).await?;
//!
//! // Create a card and drag it into In-Progress at the top.
//! let item = CreateItem::new("Write the report").execute(&ctx).await?;
//! RelocateItem::new(item.id.clone(), Lane::InProgress, 0)
//!     .execute(&ctx)
//!     .await?;
//! # Ok(())
//! # }
//! ```

mod error;
mod execute;
mod store;
mod sync;
pub mod reorder;
pub mod service;
pub mod transition;
pub mod types;

// Operation modules
pub mod item;

#[cfg(feature = "test-support")]
pub mod test_support;

pub use error::{BoardError, Result};
pub use execute::Execute;
pub use store::{BoardEvent, BoardStore};
pub use service::{ItemService, ServiceError, ServiceResult};
pub use sync::BoardContext;
pub use types::{ChecklistEntry, Item, ItemId, ItemPatch, Lane, Priority, TagRef, UserId};
