//! App mode controller.
//!
//! Developer mode is reached through a deliberate five-second long press.
//! It only decides whether the credential controls are shown; the
//! credential validator itself stays callable in either mode.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, info};

use crate::state::{AppMode, AppState};
use crate::toast::Toast;

/// Hold time required before a long press toggles the mode.
pub const LONG_PRESS_DURATION: Duration = Duration::from_secs(5);

/// An ongoing press on the mode toggle target.
#[derive(Debug, Clone, Copy)]
pub struct LongPress {
    started: Instant,
}

impl LongPress {
    pub fn held(&self) -> Duration {
        self.started.elapsed()
    }
}

pub struct AppModeController {
    state: Arc<AppState>,
    minimum_hold: Duration,
}

impl AppModeController {
    pub fn new(state: Arc<AppState>) -> Self {
        Self {
            state,
            minimum_hold: LONG_PRESS_DURATION,
        }
    }

    pub fn mode(&self) -> AppMode {
        self.state.mode()
    }

    /// Flip between normal and developer mode.
    pub fn toggle_mode(&self) -> AppMode {
        let next = self.state.mode().toggled();
        self.state.set_mode(next);
        info!("Switched to {}", next);

        let message = match next {
            AppMode::Developer => format!("You are in {}, enter API key", next),
            AppMode::Normal => format!("You are in {}", next),
        };
        self.state
            .toasts()
            .post(Toast::info(message).with_duration(4));
        next
    }

    /// Whether the credential controls should be rendered.
    pub fn credential_controls_visible(&self) -> bool {
        self.state.mode() == AppMode::Developer
    }

    pub fn press(&self) -> LongPress {
        LongPress {
            started: Instant::now(),
        }
    }

    /// Finish a press; toggles the mode if it was held long enough.
    pub fn release(&self, press: LongPress) -> Option<AppMode> {
        let held = press.held();
        if held >= self.minimum_hold {
            Some(self.toggle_mode())
        } else {
            debug!("Press released after {:?}, mode unchanged", held);
            None
        }
    }
}
