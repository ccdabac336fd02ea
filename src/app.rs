//! Component wiring.
//!
//! Builds the shared [`AppState`] once and hands it to every component, so
//! nothing reaches for a global.

use std::sync::Arc;

use anyhow::Result;
use tracing::debug;

use crate::api::{ApiClient, HttpProbe, ValidationProbe};
use crate::billing::{BillingProvider, LocalBilling};
use crate::config::Config;
use crate::credentials::CredentialValidator;
use crate::mode::AppModeController;
use crate::purchase::PurchaseCoordinator;
use crate::state::AppState;
use crate::store::{JsonFileStore, KeyValueStore};

pub struct App {
    pub state: Arc<AppState>,
    pub credentials: CredentialValidator,
    pub purchases: PurchaseCoordinator,
    pub mode: AppModeController,
}

impl App {
    /// Wire the production collaborators described by `config`.
    pub fn open(config: &Config) -> Result<Self> {
        let store: Arc<dyn KeyValueStore> = Arc::new(JsonFileStore::open(&config.data_dir)?);
        let probe = Arc::new(HttpProbe::new(
            ApiClient::new(config.probe_timeout_secs)?,
            store.clone(),
        ));
        let billing = Arc::new(LocalBilling::new(store.clone(), config.local_catalog()));

        debug!("Using data directory {:?}", config.data_dir);
        Ok(Self::with_parts(store, probe, billing, &config.product_id))
    }

    pub fn with_parts(
        store: Arc<dyn KeyValueStore>,
        probe: Arc<dyn ValidationProbe>,
        billing: Arc<dyn BillingProvider>,
        product_id: &str,
    ) -> Self {
        let state = Arc::new(AppState::new());
        Self {
            credentials: CredentialValidator::new(state.clone(), store, probe),
            purchases: PurchaseCoordinator::new(state.clone(), billing, product_id),
            mode: AppModeController::new(state.clone()),
            state,
        }
    }
}
