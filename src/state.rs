//! Process-wide application state shared by every component.
//!
//! Each field has exactly one writer: premium status belongs to the purchase
//! coordinator and the app mode to the mode controller. The presentation
//! layer only reads and subscribes.

use std::fmt;

use tokio::sync::watch;
use tracing::info;

use crate::toast::ToastChannel;

/// Presentation mode of the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppMode {
    #[default]
    Normal,
    Developer,
}

impl AppMode {
    pub fn toggled(self) -> Self {
        match self {
            AppMode::Normal => AppMode::Developer,
            AppMode::Developer => AppMode::Normal,
        }
    }
}

impl fmt::Display for AppMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppMode::Normal => write!(f, "Normal Mode"),
            AppMode::Developer => write!(f, "Developer Mode"),
        }
    }
}

/// Shared state record threaded through component constructors.
pub struct AppState {
    toasts: ToastChannel,
    premium: watch::Sender<bool>,
    mode: watch::Sender<AppMode>,
}

impl AppState {
    pub fn new() -> Self {
        let (premium, _) = watch::channel(false);
        let (mode, _) = watch::channel(AppMode::Normal);
        Self {
            toasts: ToastChannel::new(),
            premium,
            mode,
        }
    }

    pub fn toasts(&self) -> &ToastChannel {
        &self.toasts
    }

    pub fn is_premium(&self) -> bool {
        *self.premium.borrow()
    }

    pub fn subscribe_premium(&self) -> watch::Receiver<bool> {
        self.premium.subscribe()
    }

    pub fn mode(&self) -> AppMode {
        *self.mode.borrow()
    }

    pub fn subscribe_mode(&self) -> watch::Receiver<AppMode> {
        self.mode.subscribe()
    }

    pub(crate) fn set_premium(&self, premium: bool) {
        let previous = self.premium.send_replace(premium);
        if previous != premium {
            info!("Premium status changed: {} -> {}", previous, premium);
        }
    }

    pub(crate) fn set_mode(&self, mode: AppMode) {
        self.mode.send_replace(mode);
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
