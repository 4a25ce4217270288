//! Access decisions produced by the engine.

use std::fmt;

use serde::Serialize;

use crate::session::Role;
use crate::tenant::Subdomain;

/// Why a viewer is being sent elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenyReason {
    NotAuthenticated,
    UnrecognizedRole,
    InsufficientRole,
}

impl DenyReason {
    pub fn as_str(self) -> &'static str {
        match self {
            DenyReason::NotAuthenticated => "not authenticated",
            DenyReason::UnrecognizedRole => "unrecognized role",
            DenyReason::InsufficientRole => "insufficient role",
        }
    }
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one evaluation. Created fresh per call, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum AccessDecision {
    Allow,
    RedirectToAuth {
        reason: DenyReason,
    },
    RedirectToRoleHome {
        role: Role,
        reason: DenyReason,
    },
    /// Non-blocking; the viewer stays where they are.
    WarnSubdomainMismatch {
        expected: Subdomain,
        actual: Subdomain,
    },
}

impl AccessDecision {
    /// Returns true if the decision requires navigation.
    pub fn is_blocking(&self) -> bool {
        matches!(
            self,
            AccessDecision::RedirectToAuth { .. } | AccessDecision::RedirectToRoleHome { .. }
        )
    }

    /// Short label for logs and metrics.
    pub fn outcome(&self) -> &'static str {
        match self {
            AccessDecision::Allow => "allow",
            AccessDecision::RedirectToAuth { .. } => "redirect_to_auth",
            AccessDecision::RedirectToRoleHome { .. } => "redirect_to_role_home",
            AccessDecision::WarnSubdomainMismatch { .. } => "warn_subdomain_mismatch",
        }
    }
}
