//! Per-family in-flight guards.
//!
//! Each operation family owns one [`Guarded`] phase cell. Starting an
//! operation claims a [`Flight`] token; claiming fails while another flight
//! of the same family is running. The token always hands the cell back to a
//! settled phase, either through [`Flight::finish`] or when it is dropped.

use tokio::sync::watch;
use tracing::{debug, warn};

/// Phase of one operation family.
pub trait Phase: Clone + Send + Sync + 'static {
    /// Phase published while a flight is outstanding.
    fn running() -> Self;

    /// Phase a flight falls back to when it ends without an explicit result.
    fn settled() -> Self;

    fn is_running(&self) -> bool;
}

/// Two-state phase used by the purchase and restore families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OperationPhase {
    #[default]
    Idle,
    Running,
}

impl Phase for OperationPhase {
    fn running() -> Self {
        OperationPhase::Running
    }

    fn settled() -> Self {
        OperationPhase::Idle
    }

    fn is_running(&self) -> bool {
        matches!(self, OperationPhase::Running)
    }
}

/// Phase cell guarding one operation family.
pub struct Guarded<P: Phase> {
    family: &'static str,
    phase: watch::Sender<P>,
}

impl<P: Phase> Guarded<P> {
    pub fn new(family: &'static str, initial: P) -> Self {
        let (phase, _) = watch::channel(initial);
        Self { family, phase }
    }

    /// Claim the family for one flight, or `None` if a flight is outstanding.
    pub fn try_begin(&self) -> Option<Flight<'_, P>> {
        let claimed = self.phase.send_if_modified(|phase| {
            if phase.is_running() {
                false
            } else {
                *phase = P::running();
                true
            }
        });

        if claimed {
            debug!("{}: flight started", self.family);
            Some(Flight {
                owner: self,
                finished: false,
            })
        } else {
            debug!("{}: flight already outstanding, ignoring request", self.family);
            None
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase.borrow().is_running()
    }

    pub fn phase(&self) -> P {
        self.phase.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<P> {
        self.phase.subscribe()
    }

    /// Overwrite a settled phase; refused while a flight is outstanding.
    pub(crate) fn set_settled(&self, phase: P) {
        self.phase.send_if_modified(|current| {
            if current.is_running() {
                false
            } else {
                *current = phase;
                true
            }
        });
    }
}

/// Token proving the holder owns the only outstanding flight of a family.
#[must_use = "dropping the flight immediately releases the guard"]
pub struct Flight<'a, P: Phase> {
    owner: &'a Guarded<P>,
    finished: bool,
}

impl<P: Phase> Flight<'_, P> {
    /// End the flight, publishing `phase` as its result.
    pub fn finish(mut self, phase: P) {
        debug!("{}: flight finished", self.owner.family);
        self.owner.phase.send_replace(phase);
        self.finished = true;
    }
}

impl<P: Phase> Drop for Flight<'_, P> {
    fn drop(&mut self) {
        if !self.finished {
            warn!("{}: flight abandoned before completion", self.owner.family);
            self.owner.phase.send_replace(P::settled());
        }
    }
}
