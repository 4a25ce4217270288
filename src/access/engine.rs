//! Access decision engine.
//!
//! # Responsibilities
//! - Combine session, path and tenant into one `AccessDecision`
//!
//! # Decision Order
//! ```text
//! public path                      → Allow
//! no user                          → RedirectToAuth(not authenticated)
//! unparsable role claim            → RedirectToAuth(unrecognized role)
//! role not allowed for path        → RedirectToRoleHome(role, insufficient role)
//! dashboard on a foreign tenant    → WarnSubdomainMismatch(expected, actual)
//! otherwise                        → Allow
//! ```
//!
//! # Design Decisions
//! - Pure: no I/O, no clock, no randomness
//! - The role check runs before the tenant check so a foreign tenant can
//!   never mask a role violation
//! - Errors become the most restrictive decision; nothing propagates

use std::sync::Arc;

use crate::access::decision::{AccessDecision, DenyReason};
use crate::access::AccessError;
use crate::routing::RoutePolicy;
use crate::session::Session;
use crate::tenant::{default_subdomain_for, Subdomain};

/// Pure evaluator over a frozen `RoutePolicy`.
#[derive(Debug, Clone)]
pub struct AccessDecisionEngine {
    policy: Arc<RoutePolicy>,
}

impl AccessDecisionEngine {
    pub fn new(policy: Arc<RoutePolicy>) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &RoutePolicy {
        &self.policy
    }

    /// Decide whether the session may view `path` on `subdomain`.
    ///
    /// Callers must not evaluate while `session.is_loading`; a loading
    /// session is treated as having no user.
    pub fn decide(&self, session: &Session, path: &str, subdomain: Subdomain) -> AccessDecision {
        match self.try_decide(session, path, subdomain) {
            Ok(decision) => decision,
            Err(AccessError::UnrecognizedRole(claim)) => {
                tracing::warn!(role = %claim, path, "Unrecognized role claim, treating as unauthenticated");
                AccessDecision::RedirectToAuth {
                    reason: DenyReason::UnrecognizedRole,
                }
            }
        }
    }

    fn try_decide(
        &self,
        session: &Session,
        path: &str,
        subdomain: Subdomain,
    ) -> Result<AccessDecision, AccessError> {
        if self.policy.is_public_route(path) {
            return Ok(AccessDecision::Allow);
        }

        let user = match &session.user {
            Some(user) if !session.is_loading => user,
            _ => {
                return Ok(AccessDecision::RedirectToAuth {
                    reason: DenyReason::NotAuthenticated,
                })
            }
        };
        let role = user.role()?;

        if self.policy.enforces_roles() && !self.policy.roles_allowed_for(path).permits(role) {
            return Ok(AccessDecision::RedirectToRoleHome {
                role,
                reason: DenyReason::InsufficientRole,
            });
        }

        let expected = default_subdomain_for(role);
        if subdomain != Subdomain::Www && subdomain != expected && self.policy.is_dashboard_path(path) {
            return Ok(AccessDecision::WarnSubdomainMismatch {
                expected,
                actual: subdomain,
            });
        }

        Ok(AccessDecision::Allow)
    }
}

impl Default for AccessDecisionEngine {
    fn default() -> Self {
        Self::new(Arc::new(RoutePolicy::default()))
    }
}
