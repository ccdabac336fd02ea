//! Settings and premium coordination layer for AIChatty.
//!
//! Two user-initiated workflows live here: validating and persisting API
//! credentials, and purchasing or restoring the premium subscription. Both
//! report back through a shared [`state::AppState`] and its single-slot
//! toast channel.

pub mod api;
pub mod app;
pub mod billing;
pub mod config;
pub mod credentials;
pub mod domain;
pub mod error;
pub mod guard;
pub mod mode;
pub mod purchase;
pub mod state;
pub mod store;
pub mod toast;

#[cfg(test)]
mod testing;

pub use app::App;
pub use error::TransportError;
