//! Redirect subsystem.
//!
//! # Data Flow
//! ```text
//! Blocking AccessDecision
//!     → plan.rs (RedirectTarget → RedirectPlan)
//!     → coordinator.rs (SPA navigate now, arm fallback timer)
//!     → Navigator (router / browser location)
//! ```

pub mod coordinator;
pub mod plan;

pub use coordinator::RedirectCoordinator;
pub use plan::{HardReplaceAction, NavigateAction, RedirectKind, RedirectPlan, RedirectTarget};

/// Router and browser location as seen by the guard.
///
/// `navigate` is fire-and-forget: no completion signal is assumed and a
/// router mid-transition may ignore it.
pub trait Navigator: Send + Sync + 'static {
    /// Path of the current location.
    fn current_path(&self) -> String;

    /// Request an SPA-level navigation.
    fn navigate(&self, path: &str);

    /// Replace the location with a full page load.
    fn hard_replace(&self, url: &str);
}
