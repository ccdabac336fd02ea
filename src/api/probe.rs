//! Credential validation probe.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::client::ApiClient;
use crate::domain::CredentialKind;
use crate::error::TransportError;
use crate::store::{self, KeyValueStore, API_KEY};

/// Remote check of a single credential value.
#[async_trait]
pub trait ValidationProbe: Send + Sync {
    async fn probe(&self, kind: CredentialKind, value: &str) -> Result<(), TransportError>;
}

/// Probe backed by the chat API's models listing.
///
/// A candidate key is checked against the currently effective host; a
/// candidate host is checked with the currently stored key.
pub struct HttpProbe {
    client: ApiClient,
    store: Arc<dyn KeyValueStore>,
}

impl HttpProbe {
    pub fn new(client: ApiClient, store: Arc<dyn KeyValueStore>) -> Self {
        Self { client, store }
    }
}

#[async_trait]
impl ValidationProbe for HttpProbe {
    async fn probe(&self, kind: CredentialKind, value: &str) -> Result<(), TransportError> {
        let (host, api_key) = match kind {
            CredentialKind::ApiKey => (store::api_host(self.store.as_ref()), value.to_string()),
            CredentialKind::ApiHost => (
                value.to_string(),
                self.store.get(API_KEY).unwrap_or_default(),
            ),
        };

        debug!("Probing {} against {}", kind, host);
        let models = self.client.list_models(&host, &api_key).await?;
        debug!("{} accepted, {} model(s) available", kind, models.data.len());

        Ok(())
    }
}
