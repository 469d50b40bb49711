//! The `Execute` trait - operations are structs whose fields are the
//! parameters, dispatched against a [`BoardContext`].

use crate::error::Result;
use crate::service::ItemService;
use crate::sync::BoardContext;
use async_trait::async_trait;

/// An executable board operation
#[async_trait]
pub trait Execute<S: ItemService> {
    /// What the operation yields on success
    type Output;

    async fn execute(&self, ctx: &BoardContext<S>) -> Result<Self::Output>;
}
