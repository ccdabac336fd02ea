use reqwest::Response;
use tracing::{debug, error};

use super::types::{ApiStatus, ErrorEnvelope};
use crate::error::TransportError;

/// Send a request exactly once. Retrying is left to the user.
pub(super) async fn send_once(request: reqwest::RequestBuilder) -> Result<Response, TransportError> {
    let response = request.send().await.map_err(|err| {
        debug!("HTTP request error: {}", err);
        TransportError::from(err)
    })?;

    let status = response.status();
    debug!("=== API Response ===");
    debug!("Status: {}", status);

    if status.is_success() {
        return Ok(response);
    }

    Err(error_from_response(response).await)
}

/// Turn a non-2xx response into a readable transport error.
///
/// The service's own error message wins when the body carries one.
async fn error_from_response(response: Response) -> TransportError {
    let http_status = response.status().as_u16();
    let api_status = ApiStatus::from_http_status(http_status);
    let body = response.text().await.unwrap_or_default();

    let message = service_message(&body)
        .unwrap_or_else(|| format!("{} (HTTP {})", api_status.error_message(), http_status));

    error!("API request failed with status {}: {}", http_status, message);
    TransportError::Service(message)
}

fn service_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .map(|envelope| envelope.error.message)
        .filter(|message| !message.trim().is_empty())
}
