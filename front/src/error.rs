use thiserror::Error;

use crate::form::FieldError;

/// Failure of a single round trip to the remote resource.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failure or a non-success status.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    /// The response body does not have the expected shape.
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),
    /// The request task panicked or was cancelled before it settled.
    #[error("request task failed: {0}")]
    Aborted(#[from] tokio::task::JoinError),
}

impl ClientError {
    pub fn is_network(&self) -> bool {
        matches!(self, ClientError::Network(_) | ClientError::Aborted(_))
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, ClientError::Decode(_))
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("todo {0} is not in the list")]
    NotFound(u64),
    #[error(transparent)]
    Remote(#[from] ClientError),
    #[error("update of todo {expected} was answered with todo {returned}")]
    Mismatched { expected: u64, returned: u64 },
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("invalid form: {}", .errors.iter().map(|e| e.message).collect::<Vec<_>>().join(", "))]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}
