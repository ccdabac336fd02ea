//! Billing provider backed by the settings store.
//!
//! Used where no platform billing SDK exists (the command-line front end).
//! A purchase records the entitlement in the store; a restore reads it back.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::{BillingProvider, PurchaseResult, RestoreResult};
use crate::domain::Product;
use crate::error::TransportError;
use crate::store::KeyValueStore;

/// Store entry holding the entitlement record.
pub const ENTITLEMENT_ENTRY: &str = "premiumEntitlement";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EntitlementRecord {
    product_id: String,
    purchased_at: DateTime<Utc>,
}

pub struct LocalBilling {
    store: Arc<dyn KeyValueStore>,
    catalog: Vec<Product>,
}

impl LocalBilling {
    pub fn new(store: Arc<dyn KeyValueStore>, catalog: Vec<Product>) -> Self {
        Self { store, catalog }
    }

    fn entitlement(&self) -> Option<EntitlementRecord> {
        let raw = self.store.get(ENTITLEMENT_ENTRY)?;
        match serde_json::from_str(&raw) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("Ignoring unreadable entitlement record: {}", e);
                None
            }
        }
    }
}

#[async_trait]
impl BillingProvider for LocalBilling {
    async fn products(&self) -> Result<Vec<Product>, TransportError> {
        Ok(self.catalog.clone())
    }

    async fn purchase(&self, product: &Product) -> PurchaseResult {
        if !self.catalog.iter().any(|offered| offered.id == product.id) {
            return PurchaseResult::failed(Some(TransportError::Service(format!(
                "Product {} is not offered",
                product.id
            ))));
        }

        let record = EntitlementRecord {
            product_id: product.id.clone(),
            purchased_at: Utc::now(),
        };
        match serde_json::to_string(&record) {
            Ok(raw) => {
                self.store.set(ENTITLEMENT_ENTRY, &raw);
                info!("Recorded purchase of {}", product.id);
                PurchaseResult::succeeded()
            }
            Err(e) => PurchaseResult::failed(Some(TransportError::Service(e.to_string()))),
        }
    }

    async fn restore(&self) -> RestoreResult {
        let subscriptions = self
            .entitlement()
            .map(|record| {
                debug!(
                    "Restoring {} purchased at {}",
                    record.product_id, record.purchased_at
                );
                vec![record.product_id]
            })
            .unwrap_or_default();

        RestoreResult {
            subscriptions,
            ..RestoreResult::default()
        }
    }

    async fn has_entitlement(&self) -> bool {
        self.entitlement().is_some()
    }
}
