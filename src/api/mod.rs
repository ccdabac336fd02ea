//! Client for the OpenAI-compatible chat service.
//!
//! Only the pieces the settings flows need live here: an HTTP client that
//! sends each request once, and the validation probe built on it.

mod client;
mod http;
mod probe;
mod types;

pub use client::{ApiClient, DEFAULT_TIMEOUT_SECS};
pub use probe::{HttpProbe, ValidationProbe};
pub use types::{ApiStatus, ModelEntry, ModelsResponse};
