//! Request and response types for the OpenAI-compatible chat API.

use serde::Deserialize;

/// Response of `GET /v1/models`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModelsResponse {
    #[serde(default)]
    pub data: Vec<ModelEntry>,
}

/// Single entry of the models listing.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelEntry {
    pub id: String,
}

/// Error envelope returned by the API on non-2xx responses.
#[derive(Debug, Deserialize)]
pub(super) struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub(super) struct ErrorBody {
    pub message: String,
}

// ============================================================================
// API Status (HTTP status classification)
// ============================================================================

/// Classification of an HTTP response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiStatus {
    Ok,
    InvalidArgument,
    /// Key missing or rejected
    Unauthenticated,
    PermissionDenied,
    /// Host answers but does not serve the API
    NotFound,
    ResourceExhausted,
    Unavailable,
    Unknown,
}

impl ApiStatus {
    pub fn from_http_status(http_status: u16) -> Self {
        match http_status {
            200..=299 => ApiStatus::Ok,
            400 => ApiStatus::InvalidArgument,
            401 => ApiStatus::Unauthenticated,
            403 => ApiStatus::PermissionDenied,
            404 => ApiStatus::NotFound,
            429 => ApiStatus::ResourceExhausted,
            500..=599 => ApiStatus::Unavailable,
            _ => ApiStatus::Unknown,
        }
    }

    pub fn error_message(&self) -> &'static str {
        match self {
            ApiStatus::Ok => "Success",
            ApiStatus::InvalidArgument => "Invalid request",
            ApiStatus::Unauthenticated => "Invalid API key",
            ApiStatus::PermissionDenied => "API key is not allowed to use this endpoint",
            ApiStatus::NotFound => "Host does not serve an OpenAI-compatible API",
            ApiStatus::ResourceExhausted => "Rate limit exceeded. Please wait and try again",
            ApiStatus::Unavailable => "Service temporarily unavailable",
            ApiStatus::Unknown => "Unexpected response",
        }
    }
}
