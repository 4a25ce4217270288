//! Route guard subsystem.
//!
//! # Data Flow
//! ```text
//! Auth provider (Session) + Router (path) + host
//!     → route_guard.rs (observe)
//!     → access engine (pure decision)
//!     → redirect coordinator (SPA navigate, fallback timer)
//!     → state.rs (GuardView for the host UI)
//! ```

pub mod emergency;
pub mod route_guard;
pub mod state;

pub use emergency::{EmergencyAccess, FileLoginErrorStore, LoginErrorStore, MemoryLoginErrorStore};
pub use route_guard::RouteGuard;
pub use state::{GuardState, GuardView, RedirectNotice};
