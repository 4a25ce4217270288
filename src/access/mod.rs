//! Access decision subsystem.
//!
//! # Data Flow
//! ```text
//! (Session, path, Subdomain)
//!     → engine.rs (RoutePolicy + tenant lookups)
//!     → decision.rs (AccessDecision)
//!     → RouteGuard / HTTP edge act on it
//! ```

pub mod decision;
pub mod engine;

use thiserror::Error;

pub use decision::{AccessDecision, DenyReason};
pub use engine::AccessDecisionEngine;

/// Failures inside an evaluation. Never escapes `AccessDecisionEngine::decide`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    #[error("unrecognized role `{0}`")]
    UnrecognizedRole(String),
}
