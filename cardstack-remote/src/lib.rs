//! HTTP client for the remote item service.
//!
//! This crate provides [`ItemsClient`], the production implementation of the
//! engine's [`ItemService`](cardstack_kanban::ItemService) seam. It handles
//! bearer authentication, wire-format translation (camelCase JSON with the
//! title under `task`), and retry with exponential backoff for transient
//! failures.
//!
//! ```rust,no_run
//! use cardstack_remote::{ItemsClient, RemoteConfig};
//!
//! # fn example() -> Result<(), cardstack_remote::ConfigError> {
//! let config = RemoteConfig::new("https://api.example.com", "user-1")?
//!     .with_token("secret");
//! let client = ItemsClient::new(config);
//! # let _ = client;
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod payload;

pub use client::ItemsClient;
pub use config::{ConfigError, RemoteConfig};
pub use payload::ItemPayload;
