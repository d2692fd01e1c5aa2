#![forbid(unsafe_code)]

//! Errors raised by configuration and persistence operations.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoreError>;

/// Configuration-level failures. Display paths never produce these.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid variable name: {name:?}")]
    InvalidName { name: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StoreError {
    #[must_use]
    pub fn invalid_name(name: impl Into<String>) -> Self {
        Self::InvalidName { name: name.into() }
    }
}
