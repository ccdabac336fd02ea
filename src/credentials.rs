//! Credential validator.
//!
//! Validates an access key or a host against the remote probe and persists
//! the value once the probe accepts it. Key and host validation each own an
//! independent guard: the two may run side by side, but a second request of
//! the same kind is dropped while the first is outstanding.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{info, warn};

use crate::api::ValidationProbe;
use crate::domain::{Credential, CredentialKind};
use crate::error::TransportError;
use crate::guard::{Guarded, Phase};
use crate::state::AppState;
use crate::store::{self, KeyValueStore, API_HOST, API_KEY};
use crate::toast::Toast;

/// Title of the blocking alert raised by a failed validation.
pub const VALIDATE_FAILED_TITLE: &str = "Validate Failed!";

/// Validation state of one credential field, as rendered next to it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ValidationStatus {
    #[default]
    Idle,
    Validating,
    Validated,
    Failed(String),
}

impl Phase for ValidationStatus {
    fn running() -> Self {
        ValidationStatus::Validating
    }

    fn settled() -> Self {
        ValidationStatus::Idle
    }

    fn is_running(&self) -> bool {
        matches!(self, ValidationStatus::Validating)
    }
}

/// Result of one validation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    Success,
    Failure(TransportError),
    /// Dropped because a validation of the same kind was in flight.
    Ignored,
}

impl ValidationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ValidationOutcome::Success)
    }
}

/// Blocking alert carrying a validation error for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub message: String,
}

pub struct CredentialValidator {
    state: Arc<AppState>,
    store: Arc<dyn KeyValueStore>,
    probe: Arc<dyn ValidationProbe>,
    key: Guarded<ValidationStatus>,
    host: Guarded<ValidationStatus>,
    key_alert: watch::Sender<Option<Alert>>,
    host_alert: watch::Sender<Option<Alert>>,
}

impl CredentialValidator {
    pub fn new(
        state: Arc<AppState>,
        store: Arc<dyn KeyValueStore>,
        probe: Arc<dyn ValidationProbe>,
    ) -> Self {
        let (key_alert, _) = watch::channel(None);
        let (host_alert, _) = watch::channel(None);
        Self {
            state,
            store,
            probe,
            key: Guarded::new("validate-key", ValidationStatus::Idle),
            host: Guarded::new("validate-host", ValidationStatus::Idle),
            key_alert,
            host_alert,
        }
    }

    pub async fn validate_key(&self, candidate: &str) -> ValidationOutcome {
        self.validate(Credential::new(CredentialKind::ApiKey, candidate))
            .await
    }

    pub async fn validate_host(&self, candidate: &str) -> ValidationOutcome {
        self.validate(Credential::new(CredentialKind::ApiHost, candidate))
            .await
    }

    /// Probe `credential` and persist it on success.
    pub async fn validate(&self, credential: Credential) -> ValidationOutcome {
        let kind = credential.kind;
        let Some(flight) = self.guard(kind).try_begin() else {
            return ValidationOutcome::Ignored;
        };
        self.alert_slot(kind).send_replace(None);

        info!("Validating {}", kind);
        match self.probe.probe(kind, &credential.value).await {
            Ok(()) => {
                self.store.set(kind.store_name(), &credential.value);
                flight.finish(ValidationStatus::Validated);
                info!("{} validated and saved", kind);
                self.state
                    .toasts()
                    .post(Toast::success(format!("{} saved!", kind.label())));
                ValidationOutcome::Success
            }
            Err(err) => {
                warn!("{} validation failed: {}", kind, err);
                flight.finish(ValidationStatus::Failed(err.to_string()));
                self.state
                    .toasts()
                    .post(Toast::error(format!("Validate failed, {}", err)).with_duration(4));
                self.alert_slot(kind).send_replace(Some(Alert {
                    title: VALIDATE_FAILED_TITLE.to_string(),
                    message: err.to_string(),
                }));
                ValidationOutcome::Failure(err)
            }
        }
    }

    /// Erase the persisted access key.
    pub fn clear_key(&self) {
        self.store.remove(API_KEY);
        self.key.set_settled(ValidationStatus::Idle);
        info!("API key cleared");
        self.state.toasts().post(Toast::success("API Key deleted!"));
    }

    /// Drop the host override so the default host applies again.
    pub fn reset_host(&self) {
        self.store.remove(API_HOST);
        self.host.set_settled(ValidationStatus::Idle);
        info!("API host reset to {}", store::DEFAULT_API_HOST);
        self.state
            .toasts()
            .post(Toast::success("ApiHost reset successfully!"));
    }

    /// The persisted access key, if any.
    pub fn api_key(&self) -> Option<String> {
        self.store.get(API_KEY)
    }

    /// The effective host: the persisted override or the default host.
    pub fn api_host(&self) -> String {
        store::api_host(self.store.as_ref())
    }

    pub fn status(&self, kind: CredentialKind) -> ValidationStatus {
        self.guard(kind).phase()
    }

    pub fn is_validating(&self, kind: CredentialKind) -> bool {
        self.guard(kind).is_running()
    }

    pub fn subscribe_status(&self, kind: CredentialKind) -> watch::Receiver<ValidationStatus> {
        self.guard(kind).subscribe()
    }

    /// The alert of `kind` awaiting acknowledgement, if any.
    pub fn alert(&self, kind: CredentialKind) -> Option<Alert> {
        self.alert_slot(kind).borrow().clone()
    }

    pub fn acknowledge_alert(&self, kind: CredentialKind) {
        self.alert_slot(kind).send_replace(None);
    }

    fn guard(&self, kind: CredentialKind) -> &Guarded<ValidationStatus> {
        match kind {
            CredentialKind::ApiKey => &self.key,
            CredentialKind::ApiHost => &self.host,
        }
    }

    fn alert_slot(&self, kind: CredentialKind) -> &watch::Sender<Option<Alert>> {
        match kind {
            CredentialKind::ApiKey => &self.key_alert,
            CredentialKind::ApiHost => &self.host_alert,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, DEFAULT_API_HOST};
    use crate::testing::ScriptedProbe;
    use crate::toast::ToastKind;

    fn validator(probe: Arc<ScriptedProbe>) -> (CredentialValidator, Arc<AppState>, Arc<MemoryStore>) {
        let state = Arc::new(AppState::new());
        let store = Arc::new(MemoryStore::new());
        let validator = CredentialValidator::new(state.clone(), store.clone(), probe);
        (validator, state, store)
    }

    #[tokio::test]
    async fn test_successful_key_validation_persists_key() {
        let probe = Arc::new(ScriptedProbe::accepting());
        let (validator, state, store) = validator(probe.clone());

        let outcome = validator.validate_key("sk-good").await;

        assert_eq!(outcome, ValidationOutcome::Success);
        assert_eq!(store.get(API_KEY).as_deref(), Some("sk-good"));
        assert_eq!(validator.status(CredentialKind::ApiKey), ValidationStatus::Validated);
        assert_eq!(probe.calls(), 1);

        let toast = state.toasts().current().unwrap();
        assert_eq!(toast.kind, ToastKind::Success);
        assert_eq!(state.toasts().post_count(), 1);
    }

    #[tokio::test]
    async fn test_failed_key_validation_keeps_previous_key() {
        let probe = Arc::new(ScriptedProbe::accepting());
        let (validator, _state, store) = validator(probe.clone());
        assert!(validator.validate_key("sk-good").await.is_success());

        probe.reject_with(TransportError::Service("Incorrect API key provided".into()));
        let outcome = validator.validate_key("sk-bad").await;

        assert_eq!(
            outcome,
            ValidationOutcome::Failure(TransportError::Service(
                "Incorrect API key provided".into()
            ))
        );
        assert_eq!(store.get(API_KEY).as_deref(), Some("sk-good"));
        assert!(!validator.is_validating(CredentialKind::ApiKey));
    }

    #[tokio::test]
    async fn test_invalid_host_scenario() {
        let probe = Arc::new(ScriptedProbe::rejecting(TransportError::Service(
            "invalid host".into(),
        )));
        let (validator, state, store) = validator(probe);
        store.set(API_HOST, "https://proxy.example.com");

        let outcome = validator.validate_host("not-a-url").await;

        match &outcome {
            ValidationOutcome::Failure(err) => assert_eq!(err.to_string(), "invalid host"),
            other => panic!("Expected failure, got {:?}", other),
        }
        assert_eq!(
            store.get(API_HOST).as_deref(),
            Some("https://proxy.example.com")
        );
        assert_eq!(state.toasts().post_count(), 1);
        assert_eq!(state.toasts().current().unwrap().kind, ToastKind::Error);
        assert!(!validator.is_validating(CredentialKind::ApiHost));

        let alert = validator.alert(CredentialKind::ApiHost).unwrap();
        assert_eq!(alert.title, VALIDATE_FAILED_TITLE);
        assert_eq!(alert.message, "invalid host");
        assert_eq!(validator.alert(CredentialKind::ApiKey), None);
        validator.acknowledge_alert(CredentialKind::ApiHost);
        assert_eq!(validator.alert(CredentialKind::ApiHost), None);
    }

    #[tokio::test]
    async fn test_overlapping_key_validations_are_dropped() {
        let probe = Arc::new(ScriptedProbe::accepting());
        let gate = probe.hold();
        let (validator, state, store) = validator(probe.clone());

        let first = validator.validate_key("sk-first");
        let second = async {
            // Let the first validation reach its suspension point.
            tokio::task::yield_now().await;
            assert!(validator.is_validating(CredentialKind::ApiKey));
            let outcome = validator.validate_key("sk-second").await;
            assert_eq!(store.get(API_KEY), None);
            gate.notify_one();
            outcome
        };

        let (first, second) = tokio::join!(first, second);

        assert_eq!(first, ValidationOutcome::Success);
        assert_eq!(second, ValidationOutcome::Ignored);
        assert_eq!(probe.calls(), 1);
        assert_eq!(probe.max_in_flight(), 1);
        assert_eq!(store.get(API_KEY).as_deref(), Some("sk-first"));
        assert_eq!(state.toasts().post_count(), 1);
    }

    #[tokio::test]
    async fn test_overlapping_host_validations_are_dropped() {
        let probe = Arc::new(ScriptedProbe::accepting());
        let gate = probe.hold();
        let (validator, state, store) = validator(probe.clone());

        let first = validator.validate_host("https://first.example.com");
        let second = async {
            tokio::task::yield_now().await;
            assert!(validator.is_validating(CredentialKind::ApiHost));
            let outcome = validator.validate_host("https://second.example.com").await;
            assert_eq!(store.get(API_HOST), None);
            gate.notify_one();
            outcome
        };

        let (first, second) = tokio::join!(first, second);

        assert_eq!(first, ValidationOutcome::Success);
        assert_eq!(second, ValidationOutcome::Ignored);
        assert_eq!(probe.calls(), 1);
        assert_eq!(validator.api_host(), "https://first.example.com");
        assert_eq!(state.toasts().post_count(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_failures_keep_separate_alerts() {
        let probe = Arc::new(ScriptedProbe::rejecting(TransportError::Service(
            "bad".into(),
        )));
        let gate = probe.hold();
        let (validator, _state, _store) = validator(probe.clone());

        let key = validator.validate_key("sk-bad");
        let host = validator.validate_host("https://bad.example.com");
        let release = async {
            tokio::task::yield_now().await;
            gate.notify_waiters();
        };

        let (key, host, ()) = tokio::join!(key, host, release);
        assert!(matches!(key, ValidationOutcome::Failure(_)));
        assert!(matches!(host, ValidationOutcome::Failure(_)));

        assert!(validator.alert(CredentialKind::ApiKey).is_some());
        assert!(validator.alert(CredentialKind::ApiHost).is_some());

        validator.acknowledge_alert(CredentialKind::ApiKey);
        assert_eq!(validator.alert(CredentialKind::ApiKey), None);
        let host_alert = validator.alert(CredentialKind::ApiHost).unwrap();
        assert_eq!(host_alert.message, "bad");
    }

    #[tokio::test]
    async fn test_new_validation_clears_stale_alert() {
        let probe = Arc::new(ScriptedProbe::rejecting(TransportError::Service(
            "bad".into(),
        )));
        let (validator, _state, _store) = validator(probe.clone());

        validator.validate_key("sk-bad").await;
        assert!(validator.alert(CredentialKind::ApiKey).is_some());

        probe.accept();
        let outcome = validator.validate_key("sk-good").await;

        assert_eq!(outcome, ValidationOutcome::Success);
        assert_eq!(validator.alert(CredentialKind::ApiKey), None);
    }

    #[tokio::test]
    async fn test_key_and_host_validations_run_concurrently() {
        let probe = Arc::new(ScriptedProbe::accepting());
        let gate = probe.hold();
        let (validator, _state, store) = validator(probe.clone());

        let key = validator.validate_key("sk-key");
        let host = validator.validate_host("https://proxy.example.com");
        let release = async {
            tokio::task::yield_now().await;
            assert!(validator.is_validating(CredentialKind::ApiKey));
            assert!(validator.is_validating(CredentialKind::ApiHost));
            gate.notify_waiters();
        };

        let (key, host, ()) = tokio::join!(key, host, release);

        assert!(key.is_success());
        assert!(host.is_success());
        assert_eq!(probe.max_in_flight(), 2);
        assert_eq!(store.get(API_HOST).as_deref(), Some("https://proxy.example.com"));
    }

    #[tokio::test]
    async fn test_clear_key_always_erases() {
        let probe = Arc::new(ScriptedProbe::accepting());
        let (validator, state, store) = validator(probe);

        validator.clear_key();
        assert_eq!(store.get(API_KEY), None);

        validator.validate_key("sk-good").await;
        validator.clear_key();
        assert_eq!(validator.api_key(), None);
        assert_eq!(validator.status(CredentialKind::ApiKey), ValidationStatus::Idle);
        assert_eq!(state.toasts().current().unwrap().message, "API Key deleted!");
    }

    #[tokio::test]
    async fn test_reset_host_restores_default() {
        let probe = Arc::new(ScriptedProbe::accepting());
        let (validator, state, _store) = validator(probe);

        validator.validate_host("https://proxy.example.com").await;
        assert_eq!(validator.api_host(), "https://proxy.example.com");

        validator.reset_host();
        assert_eq!(validator.api_host(), DEFAULT_API_HOST);
        assert_eq!(
            state.toasts().current().unwrap().message,
            "ApiHost reset successfully!"
        );
    }
}
