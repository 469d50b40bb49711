//! HTTP implementation of the engine's [`ItemService`] trait.
//!
//! Every call presents the configured bearer token and retries transient
//! failures (5xx, 429, transport errors) with exponential backoff before
//! surfacing a [`ServiceError::Transient`]. Authentication and not-found
//! responses are never retried.

use crate::config::RemoteConfig;
use crate::payload::{ItemPayload, UpdateBody};
use async_trait::async_trait;
use cardstack_kanban::{Item, ItemId, ItemPatch, ItemService, ServiceError, ServiceResult};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use tokio::time::sleep;
use tracing::{debug, instrument, warn};
use url::Url;

// Exponential backoff constant
const BACKOFF_MULTIPLIER: u32 = 2;

/// A client for the remote item service
#[derive(Debug, Clone)]
pub struct ItemsClient {
    client: Client,
    config: RemoteConfig,
}

impl ItemsClient {
    /// Create a client from a configuration
    pub fn new(config: RemoteConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .expect("Failed to create HTTP client");
        Self { client, config }
    }

    /// The collection endpoint: `{base}/api/items`
    fn items_url(&self) -> ServiceResult<Url> {
        self.config
            .base_url
            .join("api/items")
            .map_err(|e| ServiceError::Transient(format!("bad items url: {e}")))
    }

    /// The single-item endpoint: `{base}/api/items/{id}`
    fn item_url(&self, id: &ItemId) -> ServiceResult<Url> {
        self.config
            .base_url
            .join(&format!("api/items/{id}"))
            .map_err(|e| ServiceError::Transient(format!("bad item url: {e}")))
    }

    /// The bearer token. A missing token fails before any request is built
    /// or sent; nothing reaches the wire.
    fn token(&self) -> ServiceResult<&str> {
        self.config
            .token
            .as_deref()
            .ok_or(ServiceError::Unauthorized)
    }

    fn classify(status: StatusCode) -> ServiceError {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ServiceError::Unauthorized,
            StatusCode::NOT_FOUND => ServiceError::NotFound,
            other => ServiceError::Transient(format!("http status {other}")),
        }
    }

    fn retryable(status: StatusCode) -> bool {
        status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS
    }

    /// Send a request, retrying transient failures with exponential backoff.
    /// `build` constructs a fresh request per attempt; bodies cannot be
    /// re-sent from a consumed builder.
    async fn send_with_retry(
        &self,
        build: impl Fn() -> RequestBuilder,
    ) -> ServiceResult<Response> {
        let token = self.token()?;

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                let delay = self.config.retry_delay * BACKOFF_MULTIPLIER.pow(attempt - 1);
                sleep(delay).await;
            }
            debug!(attempt, max_retries = self.config.max_retries, "dispatching request");

            let response = match build().bearer_auth(token).send().await {
                Ok(response) => response,
                Err(e) if attempt == self.config.max_retries => {
                    return Err(ServiceError::Transient(e.to_string()));
                }
                Err(e) => {
                    warn!(attempt, error = %e, "request failed, will retry");
                    continue;
                }
            };

            let status = response.status();
            if status.is_success() {
                return Ok(response);
            }
            if Self::retryable(status) && attempt < self.config.max_retries {
                warn!(attempt, %status, "transient status, will retry");
                continue;
            }
            return Err(Self::classify(status));
        }

        // Unreachable: the final attempt either returned or erred above.
        Err(ServiceError::Transient("retry budget exhausted".to_string()))
    }

    async fn decode_item(response: Response) -> ServiceResult<Item> {
        let payload: ItemPayload = response
            .json()
            .await
            .map_err(|e| ServiceError::Transient(format!("malformed item response: {e}")))?;
        Ok(payload.into_item())
    }
}

#[async_trait]
impl ItemService for ItemsClient {
    #[instrument(skip(self))]
    async fn list_items(&self) -> ServiceResult<Vec<Item>> {
        let mut url = self.items_url()?;
        url.query_pairs_mut()
            .append_pair("userId", self.config.user_id.as_str());
        let response = self.send_with_retry(|| self.client.get(url.clone())).await?;
        let payloads: Vec<ItemPayload> = response
            .json()
            .await
            .map_err(|e| ServiceError::Transient(format!("malformed list response: {e}")))?;
        debug!(count = payloads.len(), "listed items");
        Ok(payloads.into_iter().map(ItemPayload::into_item).collect())
    }

    #[instrument(skip(self, item), fields(id = %item.id))]
    async fn create_item(&self, item: &Item) -> ServiceResult<Item> {
        let url = self.items_url()?;
        let body = ItemPayload::from_item(item, &self.config.user_id);
        let response = self
            .send_with_retry(|| self.client.post(url.clone()).json(&body))
            .await?;
        Self::decode_item(response).await
    }

    #[instrument(skip(self, patch), fields(id = %id))]
    async fn update_item(&self, id: &ItemId, patch: &ItemPatch) -> ServiceResult<Item> {
        let url = self.item_url(id)?;
        let body = UpdateBody::from(patch);
        let response = self
            .send_with_retry(|| self.client.patch(url.clone()).json(&body))
            .await?;
        Self::decode_item(response).await
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn delete_item(&self, id: &ItemId) -> ServiceResult<()> {
        let url = self.item_url(id)?;
        self.send_with_retry(|| self.client.delete(url.clone())).await?;
        Ok(())
    }
}
