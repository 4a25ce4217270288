//! Guard states and the views they render.

use serde::Serialize;

use crate::access::DenyReason;
use crate::session::Role;

/// Where the guard currently stands for the observed `(session, path)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum GuardState {
    /// The auth provider has not resolved; nothing is evaluated.
    Loading,
    PublicAllowed,
    Authorized,
    Unauthenticated { reason: DenyReason },
    RoleMismatch { role: Role },
}

impl GuardState {
    /// States that spawn a redirect.
    pub fn is_blocked(&self) -> bool {
        matches!(self, GuardState::Unauthenticated { .. } | GuardState::RoleMismatch { .. })
    }
}

/// Interim notice shown while a redirect is in flight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RedirectNotice {
    pub title: String,
    pub message: String,
    /// Label of the escape-hatch action.
    pub action_label: String,
    /// Link the escape-hatch action follows.
    pub action_href: String,
    /// Present when the emergency-access link is offered.
    pub emergency_href: Option<String>,
}

/// What the host UI should render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "view", content = "notice", rename_all = "snake_case")]
pub enum GuardView {
    Loading,
    Redirecting(RedirectNotice),
    /// Render the guarded content unchanged.
    Children,
}
