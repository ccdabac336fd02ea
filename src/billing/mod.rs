//! Billing provider interface.
//!
//! The platform billing SDK sits behind [`BillingProvider`]. Its callback
//! style restore is flattened into one async call returning a
//! [`RestoreResult`].

mod local;

pub use local::{LocalBilling, ENTITLEMENT_ENTRY};

use async_trait::async_trait;

use crate::domain::Product;
use crate::error::TransportError;

/// Result of a purchase attempt as reported by the provider.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PurchaseResult {
    pub success: bool,
    pub error: Option<TransportError>,
}

impl PurchaseResult {
    pub fn succeeded() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn failed(error: Option<TransportError>) -> Self {
        Self {
            success: false,
            error,
        }
    }
}

/// Everything the provider reports when a restore completes.
///
/// Only the completion itself matters to the coordinator; entitlement is
/// re-queried afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestoreResult {
    /// Product ids of restored subscriptions
    pub subscriptions: Vec<String>,
    /// Product ids of restored non-renewing purchases
    pub purchases: Vec<String>,
    pub error: Option<TransportError>,
}

#[async_trait]
pub trait BillingProvider: Send + Sync {
    /// Products currently offered on the paywall.
    async fn products(&self) -> Result<Vec<Product>, TransportError>;

    async fn purchase(&self, product: &Product) -> PurchaseResult;

    async fn restore(&self) -> RestoreResult;

    /// Whether the user currently holds the premium entitlement.
    async fn has_entitlement(&self) -> bool;
}
