//! Route guard composition root.
//!
//! # Responsibilities
//! - Observe every `(session, path, host)` change
//! - Evaluate the access engine once the session has resolved
//! - Drive the redirect coordinator and describe what to render
//!
//! # State Transitions
//! ```text
//! Loading → PublicAllowed | Authorized | Unauthenticated | RoleMismatch
//! Unauthenticated / RoleMismatch → Redirecting (until the fallback
//!     fires or a newer observation cancels it)
//! ```
//!
//! # Design Decisions
//! - No evaluation while loading; an unresolved session would always look
//!   unauthenticated
//! - Tenant mismatches are logged and counted, never rendered
//! - Every non-blocking observation cancels a pending redirect
//! - Dropping the guard cancels the pending fallback

use std::sync::Arc;
use std::time::Duration;

use crate::access::{AccessDecision, AccessDecisionEngine, DenyReason};
use crate::config::GuardConfig;
use crate::guard::emergency::{EmergencyAccess, LoginErrorStore};
use crate::guard::state::{GuardState, GuardView, RedirectNotice};
use crate::observability::metrics;
use crate::redirect::{Navigator, RedirectCoordinator, RedirectPlan, RedirectTarget};
use crate::routing::RoutePolicy;
use crate::session::Session;
use crate::tenant::SubdomainResolver;

/// Session-aware, multi-tenant route guard.
pub struct RouteGuard {
    engine: AccessDecisionEngine,
    resolver: SubdomainResolver,
    coordinator: RedirectCoordinator,
    emergency: EmergencyAccess,
    login_errors: Arc<dyn LoginErrorStore>,
    state: GuardState,
    last_decision: Option<AccessDecision>,
}

impl RouteGuard {
    pub fn new(
        engine: AccessDecisionEngine,
        resolver: SubdomainResolver,
        coordinator: RedirectCoordinator,
        emergency: EmergencyAccess,
        login_errors: Arc<dyn LoginErrorStore>,
    ) -> Self {
        Self {
            engine,
            resolver,
            coordinator,
            emergency,
            login_errors,
            state: GuardState::Loading,
            last_decision: None,
        }
    }

    /// Build a guard from validated configuration.
    pub fn from_config(
        config: &GuardConfig,
        navigator: Arc<dyn Navigator>,
        login_errors: Arc<dyn LoginErrorStore>,
    ) -> Self {
        let policy = Arc::new(RoutePolicy::from_config(&config.policy));
        let resolver = SubdomainResolver::from_config(&config.tenant);
        let coordinator = RedirectCoordinator::new(
            navigator,
            resolver.clone(),
            Duration::from_millis(config.redirect.fallback_delay_ms),
        );
        Self::new(
            AccessDecisionEngine::new(policy),
            resolver,
            coordinator,
            EmergencyAccess::from_config(&config.emergency),
            login_errors,
        )
    }

    /// React to a session or location change.
    pub fn observe(&mut self, session: &Session, path: &str, host: &str) -> GuardView {
        if session.is_loading {
            self.coordinator.cancel();
            self.state = GuardState::Loading;
            self.last_decision = None;
            return GuardView::Loading;
        }

        let subdomain = self.resolver.current_subdomain(host);
        let decision = self.engine.decide(session, path, subdomain);
        metrics::record_decision(decision.outcome());
        tracing::debug!(path, subdomain = %subdomain, outcome = decision.outcome(), "Access evaluated");

        let view = match &decision {
            AccessDecision::Allow => {
                self.coordinator.cancel();
                self.state = if self.engine.policy().is_public_route(path) {
                    GuardState::PublicAllowed
                } else {
                    GuardState::Authorized
                };
                GuardView::Children
            }
            AccessDecision::WarnSubdomainMismatch { expected, actual } => {
                tracing::warn!(
                    path,
                    expected = %expected,
                    actual = %actual,
                    "Dashboard viewed from another tenant's subdomain"
                );
                metrics::record_subdomain_mismatch(
                    expected.label().unwrap_or("unknown"),
                    actual.label().unwrap_or("unknown"),
                );
                self.coordinator.cancel();
                self.state = GuardState::Authorized;
                GuardView::Children
            }
            AccessDecision::RedirectToAuth { reason } => {
                self.state = GuardState::Unauthenticated { reason: *reason };
                let target = RedirectTarget::auth(self.engine.policy());
                let plan = self.coordinator.execute(target, path, host);
                GuardView::Redirecting(self.login_notice(*reason, &plan, host))
            }
            AccessDecision::RedirectToRoleHome { role, .. } => {
                self.state = GuardState::RoleMismatch { role: *role };
                let target = RedirectTarget::role_home(*role, self.engine.policy());
                let plan = self.coordinator.execute(target, path, host);
                GuardView::Redirecting(self.home_notice(&plan))
            }
        };

        self.last_decision = Some(decision);
        view
    }

    fn login_notice(&self, reason: DenyReason, plan: &RedirectPlan, host: &str) -> RedirectNotice {
        let message = match reason {
            DenyReason::UnrecognizedRole => "Your account could not be verified. Please sign in again.",
            _ => "You need to sign in to see this page.",
        };
        let emergency_href = self
            .emergency
            .should_offer(self.login_errors.as_ref())
            .then(|| self.resolver.create_internal_link(host, self.emergency.path()));
        RedirectNotice {
            title: "Access restricted".to_string(),
            message: message.to_string(),
            action_label: "Go to login".to_string(),
            action_href: plan.fallback.url.clone(),
            emergency_href,
        }
    }

    fn home_notice(&self, plan: &RedirectPlan) -> RedirectNotice {
        RedirectNotice {
            title: "Access restricted".to_string(),
            message: "This area belongs to another kind of account. Taking you to your dashboard."
                .to_string(),
            action_label: "Go to my dashboard".to_string(),
            action_href: plan.fallback.url.clone(),
            emergency_href: None,
        }
    }

    /// Escape hatch: hard-replace to the pending target right away.
    pub fn continue_now(&mut self) -> Option<String> {
        self.coordinator.continue_now()
    }

    pub fn state(&self) -> GuardState {
        self.state
    }

    /// Returns true while a blocking state still has its fallback armed.
    pub fn is_redirecting(&self) -> bool {
        self.state.is_blocked() && self.coordinator.is_armed()
    }

    pub fn last_decision(&self) -> Option<&AccessDecision> {
        self.last_decision.as_ref()
    }

    pub fn pending_redirect(&self) -> Option<&RedirectPlan> {
        self.coordinator.pending_plan()
    }
}
