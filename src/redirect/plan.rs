//! Redirect targets and two-tier redirect plans.

use std::time::Duration;

use serde::Serialize;
use tokio::time::Instant;

use crate::access::AccessDecision;
use crate::routing::RoutePolicy;
use crate::session::Role;

/// Where a blocking decision sends the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "role", rename_all = "snake_case")]
pub enum RedirectKind {
    Auth,
    RoleHome(Role),
}

impl RedirectKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RedirectKind::Auth => "auth",
            RedirectKind::RoleHome(_) => "role_home",
        }
    }
}

/// Destination of a redirect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RedirectTarget {
    pub kind: RedirectKind,
    pub path: String,
}

impl RedirectTarget {
    /// The authentication entry point.
    pub fn auth(policy: &RoutePolicy) -> Self {
        Self {
            kind: RedirectKind::Auth,
            path: policy.auth_path().to_string(),
        }
    }

    /// The home dashboard of `role`.
    pub fn role_home(role: Role, policy: &RoutePolicy) -> Self {
        Self {
            kind: RedirectKind::RoleHome(role),
            path: policy.home_path_for(role),
        }
    }

    /// Target for a blocking decision; `None` for `Allow` and warnings.
    pub fn from_decision(decision: &AccessDecision, policy: &RoutePolicy) -> Option<Self> {
        match decision {
            AccessDecision::RedirectToAuth { .. } => Some(Self::auth(policy)),
            AccessDecision::RedirectToRoleHome { role, .. } => Some(Self::role_home(*role, policy)),
            AccessDecision::Allow | AccessDecision::WarnSubdomainMismatch { .. } => None,
        }
    }

    /// Returns true if the normalized location `path` is the target itself.
    ///
    /// Pages below the target do not count: a denied page may sit under it.
    pub fn is_reached_by(&self, path: &str) -> bool {
        path == self.path
    }
}

/// Soft, SPA-level navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigateAction {
    pub path: String,
}

/// Full page replacement used as a correctness backstop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HardReplaceAction {
    pub url: String,
}

/// A pending two-tier redirect.
///
/// Disposed when a newer evaluation supersedes it or when the fallback fires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectPlan {
    pub target: RedirectTarget,
    pub primary: NavigateAction,
    pub fallback: HardReplaceAction,
    pub fallback_delay: Duration,
    pub fallback_armed_at: Instant,
    /// Location the redirect was requested from.
    pub origin_path: String,
    pub generation: u64,
}

impl RedirectPlan {
    /// Instant at which the fallback fires.
    pub fn fallback_deadline(&self) -> Instant {
        self.fallback_armed_at + self.fallback_delay
    }
}
