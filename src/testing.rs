//! Scripted fakes for the probe and the billing provider.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::api::ValidationProbe;
use crate::billing::{BillingProvider, PurchaseResult, RestoreResult};
use crate::domain::{CredentialKind, Product};
use crate::error::TransportError;

/// Counts concurrent calls and optionally parks them until released.
#[derive(Default)]
struct CallTracker {
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    gate: Mutex<Option<Arc<Notify>>>,
}

impl CallTracker {
    async fn enter(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let gate = self.gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
    }

    fn leave(&self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }

    fn hold(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.gate.lock().unwrap() = Some(gate.clone());
        gate
    }
}

pub struct ScriptedProbe {
    result: Mutex<Result<(), TransportError>>,
    tracker: CallTracker,
}

impl ScriptedProbe {
    pub fn accepting() -> Self {
        Self {
            result: Mutex::new(Ok(())),
            tracker: CallTracker::default(),
        }
    }

    pub fn rejecting(err: TransportError) -> Self {
        let probe = Self::accepting();
        probe.reject_with(err);
        probe
    }

    pub fn reject_with(&self, err: TransportError) {
        *self.result.lock().unwrap() = Err(err);
    }

    pub fn accept(&self) {
        *self.result.lock().unwrap() = Ok(());
    }

    /// Park every later probe until the returned gate is notified.
    pub fn hold(&self) -> Arc<Notify> {
        self.tracker.hold()
    }

    pub fn calls(&self) -> usize {
        self.tracker.calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.tracker.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ValidationProbe for ScriptedProbe {
    async fn probe(&self, _kind: CredentialKind, _value: &str) -> Result<(), TransportError> {
        self.tracker.enter().await;
        let result = self.result.lock().unwrap().clone();
        self.tracker.leave();
        result
    }
}

pub struct ScriptedBilling {
    products: Vec<Product>,
    purchase: Mutex<PurchaseResult>,
    restore: Mutex<RestoreResult>,
    entitled: AtomicBool,
    purchases: CallTracker,
    restores: AtomicUsize,
}

impl ScriptedBilling {
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            products,
            purchase: Mutex::new(PurchaseResult::succeeded()),
            restore: Mutex::new(RestoreResult::default()),
            entitled: AtomicBool::new(false),
            purchases: CallTracker::default(),
            restores: AtomicUsize::new(0),
        }
    }

    pub fn purchase_returns(&self, result: PurchaseResult) {
        *self.purchase.lock().unwrap() = result;
    }

    pub fn restore_returns(&self, result: RestoreResult) {
        *self.restore.lock().unwrap() = result;
    }

    pub fn set_entitled(&self, entitled: bool) {
        self.entitled.store(entitled, Ordering::SeqCst);
    }

    pub fn hold_purchases(&self) -> Arc<Notify> {
        self.purchases.hold()
    }

    pub fn purchase_calls(&self) -> usize {
        self.purchases.calls.load(Ordering::SeqCst)
    }

    pub fn max_purchases_in_flight(&self) -> usize {
        self.purchases.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn restore_calls(&self) -> usize {
        self.restores.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BillingProvider for ScriptedBilling {
    async fn products(&self) -> Result<Vec<Product>, TransportError> {
        Ok(self.products.clone())
    }

    async fn purchase(&self, _product: &Product) -> PurchaseResult {
        self.purchases.enter().await;
        let result = self.purchase.lock().unwrap().clone();
        self.purchases.leave();
        result
    }

    async fn restore(&self) -> RestoreResult {
        self.restores.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        self.restore.lock().unwrap().clone()
    }

    async fn has_entitlement(&self) -> bool {
        self.entitled.load(Ordering::SeqCst)
    }
}
