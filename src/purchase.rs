//! Purchase coordinator.
//!
//! Drives subscribe and restore against the billing provider and derives
//! premium status from the provider's answers. Purchasing and restoring each
//! own a guard; a request of a family that is already in flight is dropped.

use std::sync::{Arc, RwLock};

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::billing::{BillingProvider, PurchaseResult, RestoreResult};
use crate::domain::Product;
use crate::error::TransportError;
use crate::guard::{Guarded, OperationPhase};
use crate::state::AppState;
use crate::toast::Toast;

pub const PREMIUM_MESSAGE: &str = "You get AIChatty Premium Now!";
pub const NOT_PREMIUM_MESSAGE: &str = "You are not premium user!";
pub const PURCHASE_FAILED_MESSAGE: &str = "Purchase failed!";

/// Shown instead of a price while the paywall product is unknown.
pub const PRICE_PLACEHOLDER: &str = "$-.-";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PurchaseOutcome {
    Success,
    /// The provider did not complete the purchase, with its error if any.
    Failure(Option<TransportError>),
    /// Dropped: already purchasing, already premium, or no product.
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreOutcome {
    Premium,
    /// Restore completed but the provider reports no entitlement.
    NotPremium,
    Ignored,
}

pub struct PurchaseCoordinator {
    state: Arc<AppState>,
    billing: Arc<dyn BillingProvider>,
    product_id: String,
    paywall: RwLock<Option<Product>>,
    purchasing: Guarded<OperationPhase>,
    restoring: Guarded<OperationPhase>,
}

impl PurchaseCoordinator {
    pub fn new(
        state: Arc<AppState>,
        billing: Arc<dyn BillingProvider>,
        product_id: impl Into<String>,
    ) -> Self {
        Self {
            state,
            billing,
            product_id: product_id.into(),
            paywall: RwLock::new(None),
            purchasing: Guarded::new("purchase", OperationPhase::Idle),
            restoring: Guarded::new("restore", OperationPhase::Idle),
        }
    }

    /// Fetch the paywall and remember the monthly premium product.
    pub async fn load_paywall(&self) -> Result<Option<Product>, TransportError> {
        let products = self.billing.products().await?;
        let product = products.into_iter().find(|p| p.id == self.product_id);

        match &product {
            Some(p) => debug!("Paywall product {} at {}", p.id, p.localized_price()),
            None => warn!("Paywall does not offer {}", self.product_id),
        }

        *self
            .paywall
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = product.clone();
        Ok(product)
    }

    pub fn monthly_premium(&self) -> Option<Product> {
        self.paywall
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Localized monthly price, or a placeholder until the paywall loads.
    pub fn price_label(&self) -> String {
        self.monthly_premium()
            .map(|p| p.localized_price())
            .unwrap_or_else(|| PRICE_PLACEHOLDER.to_string())
    }

    /// Subscribe to the paywall's monthly premium product.
    pub async fn subscribe_monthly(&self) -> PurchaseOutcome {
        let product = self.monthly_premium();
        self.subscribe(product.as_ref()).await
    }

    pub async fn subscribe(&self, product: Option<&Product>) -> PurchaseOutcome {
        if self.state.is_premium() {
            debug!("Already premium, ignoring purchase request");
            return PurchaseOutcome::Ignored;
        }
        let Some(product) = product else {
            debug!("No paywall product, ignoring purchase request");
            return PurchaseOutcome::Ignored;
        };
        let Some(flight) = self.purchasing.try_begin() else {
            return PurchaseOutcome::Ignored;
        };

        info!("Purchasing {}", product.id);
        let PurchaseResult { success, error } = self.billing.purchase(product).await;

        let outcome = match error {
            Some(err) => {
                warn!("Purchase of {} failed: {}", product.id, err);
                let toast = match err.description() {
                    Some(description) => {
                        Toast::error(format!("Purchase failed, {}", description)).with_duration(4)
                    }
                    None => Toast::error(PURCHASE_FAILED_MESSAGE).with_duration(2),
                };
                self.state.toasts().post(toast);
                PurchaseOutcome::Failure(Some(err))
            }
            None if success => {
                self.state.set_premium(true);
                self.state
                    .toasts()
                    .post(Toast::success(PREMIUM_MESSAGE).with_duration(2));
                PurchaseOutcome::Success
            }
            None => {
                info!("Purchase of {} did not complete", product.id);
                PurchaseOutcome::Failure(None)
            }
        };

        flight.finish(OperationPhase::Idle);
        outcome
    }

    /// Restore previous purchases, then re-check the entitlement.
    pub async fn restore(&self) -> RestoreOutcome {
        let Some(flight) = self.restoring.try_begin() else {
            return RestoreOutcome::Ignored;
        };

        info!("Restoring purchases");
        let RestoreResult {
            subscriptions,
            purchases: _,
            error,
        } = self.billing.restore().await;
        if let Some(err) = error {
            // Entitlement is authoritative regardless of what restore reported.
            debug!("Restore reported an error: {}", err);
        }
        debug!("Restore returned {} subscription(s)", subscriptions.len());

        let entitled = self.billing.has_entitlement().await;
        flight.finish(OperationPhase::Idle);

        if entitled {
            self.state.set_premium(true);
            self.state
                .toasts()
                .post(Toast::success(PREMIUM_MESSAGE).with_duration(2));
            RestoreOutcome::Premium
        } else {
            self.state
                .toasts()
                .post(Toast::info(NOT_PREMIUM_MESSAGE).with_duration(2));
            RestoreOutcome::NotPremium
        }
    }

    /// Re-query the entitlement and publish it as the premium status.
    pub async fn refresh_entitlement(&self) -> bool {
        let entitled = self.billing.has_entitlement().await;
        self.state.set_premium(entitled);
        entitled
    }

    pub fn is_purchasing(&self) -> bool {
        self.purchasing.is_running()
    }

    pub fn is_restoring(&self) -> bool {
        self.restoring.is_running()
    }

    pub fn subscribe_purchasing(&self) -> watch::Receiver<OperationPhase> {
        self.purchasing.subscribe()
    }

    pub fn subscribe_restoring(&self) -> watch::Receiver<OperationPhase> {
        self.restoring.subscribe()
    }
}
