//! Error taxonomy for the catalog engine.
//!
//! Every variant is recoverable at the boundary: callers report it and keep
//! whatever catalog and overlay state they already had.

use crate::catalog::ItemName;
use crate::overlay::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("malformed dataset: {0}")]
    MalformedInput(String),

    #[error("no item named '{0}' in the catalog")]
    NotFound(ItemName),

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("fetch failed: {0}")]
    Fetch(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        EngineError::MalformedInput(err.to_string())
    }
}

impl From<reqwest::Error> for EngineError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            EngineError::Fetch("request timed out".to_string())
        } else if let Some(status) = err.status() {
            EngineError::Fetch(format!("server responded with {status}"))
        } else {
            EngineError::Fetch(err.to_string())
        }
    }
}

impl EngineError {
    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        EngineError::Io {
            context: context.into(),
            source,
        }
    }
}
