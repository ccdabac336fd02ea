//! Single-slot ephemeral notification channel.
//!
//! At most one toast is observable at a time. Posting replaces whatever is
//! shown and restarts the expiry countdown; there is no backlog.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::Instant;
use tracing::debug;

/// Display time of a toast that does not ask for a specific duration.
pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

/// An ephemeral notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
    pub duration: Duration,
}

impl Toast {
    pub fn new(kind: ToastKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            duration: DEFAULT_TOAST_DURATION,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(ToastKind::Success, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(ToastKind::Error, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(ToastKind::Info, message)
    }

    pub fn with_duration(mut self, seconds: u64) -> Self {
        self.duration = Duration::from_secs(seconds);
        self
    }
}

/// The toast currently occupying the slot, with the moment it was posted.
#[derive(Debug, Clone)]
pub struct PostedToast {
    pub id: u64,
    pub toast: Toast,
    pub posted_at: Instant,
}

impl PostedToast {
    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.posted_at) >= self.toast.duration
    }
}

/// Holder of the single active toast.
pub struct ToastChannel {
    slot: Arc<watch::Sender<Option<PostedToast>>>,
    next_id: AtomicU64,
}

impl ToastChannel {
    pub fn new() -> Self {
        let (slot, _) = watch::channel(None);
        Self {
            slot: Arc::new(slot),
            next_id: AtomicU64::new(0),
        }
    }

    /// Replace the active toast with `toast` and start its expiry countdown.
    ///
    /// Outside a tokio runtime no timer is spawned; expiry is then only
    /// observed lazily through [`ToastChannel::current`].
    pub fn post(&self, toast: Toast) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let duration = toast.duration;
        debug!("Toast #{} ({:?}): {}", id, toast.kind, toast.message);

        self.slot.send_replace(Some(PostedToast {
            id,
            toast,
            posted_at: Instant::now(),
        }));

        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            let slot = Arc::clone(&self.slot);
            handle.spawn(async move {
                tokio::time::sleep(duration).await;
                // A later post owns the slot now; leave it alone.
                slot.send_if_modified(|current| {
                    if current.as_ref().is_some_and(|posted| posted.id == id) {
                        *current = None;
                        true
                    } else {
                        false
                    }
                });
            });
        }
    }

    /// Clear the active toast, if any.
    pub fn dismiss(&self) {
        self.slot.send_replace(None);
    }

    /// The toast observable right now.
    pub fn current(&self) -> Option<Toast> {
        let now = Instant::now();
        self.slot
            .borrow()
            .as_ref()
            .filter(|posted| !posted.is_expired(now))
            .map(|posted| posted.toast.clone())
    }

    /// Watch the slot for replacements and dismissals.
    pub fn subscribe(&self) -> watch::Receiver<Option<PostedToast>> {
        self.slot.subscribe()
    }

    /// Number of toasts posted since the channel was created.
    pub fn post_count(&self) -> u64 {
        self.next_id.load(Ordering::Relaxed)
    }
}

impl Default for ToastChannel {
    fn default() -> Self {
        Self::new()
    }
}
