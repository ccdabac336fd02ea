//! Error types shared by the validation probe, the billing provider and the
//! persistent store.

use thiserror::Error;

/// Failure of a remote call (validation probe or billing provider).
///
/// Every variant except [`TransportError::Unknown`] carries a human-readable
/// description suitable for a toast or an alert.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The remote service answered but rejected the request.
    #[error("{0}")]
    Service(String),

    /// The request never produced a response (DNS, connect, timeout, TLS).
    #[error("network error: {0}")]
    Network(String),

    /// The host could not be turned into a request URL.
    #[error("invalid host: {0}")]
    InvalidHost(String),

    /// The provider reported a failure without describing it.
    #[error("request failed")]
    Unknown,
}

impl TransportError {
    /// Description to show the user, if the error carries one.
    pub fn description(&self) -> Option<String> {
        match self {
            TransportError::Unknown => None,
            other => Some(other.to_string()),
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() {
            TransportError::InvalidHost(err.to_string())
        } else {
            TransportError::Network(err.to_string())
        }
    }
}

/// Errors raised while opening or flushing the file-backed store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access store file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("store file is not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),
}
