//! Error types for the board engine

use crate::service::ServiceError;
use thiserror::Error;

/// Result type for board operations
pub type Result<T> = std::result::Result<T, BoardError>;

/// Errors that can occur in board operations
#[derive(Debug, Error)]
pub enum BoardError {
    /// Item not found in the local store. This is a programming/desync
    /// error, not a user-facing failure; the store is left untouched.
    #[error("item not found: {id}")]
    ItemNotFound { id: String },

    /// Invalid field value, caught before any mutation is dispatched
    #[error("invalid value for {field}: {message}")]
    Validation { field: String, message: String },

    /// Remote call failure, already rolled back at the synchronizer boundary
    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl BoardError {
    /// Create a validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an item-not-found error
    pub fn item_not_found(id: impl Into<String>) -> Self {
        Self::ItemNotFound { id: id.into() }
    }
}
