//! Redirect execution with a hard-replace fallback.
//!
//! # Responsibilities
//! - Issue the SPA navigation for a blocking decision
//! - Arm one fallback timer that hard-replaces the location if the SPA
//!   navigation did not take effect
//! - Cancel the fallback when a newer evaluation supersedes it
//!
//! # State Transitions
//! ```text
//! Idle → Armed: execute(target)
//! Armed → Armed: execute(same target) (no-op, plan reused)
//! Armed → Armed': execute(other target) (old timer cancelled first)
//! Armed → Idle: cancel() / drop
//! Armed → Done: timer fires (hard replace or stand down)
//! Fired → Fired: execute(same target, same origin) (no-op until cleared)
//! ```
//!
//! # Design Decisions
//! - At most one live timer per coordinator
//! - The browser location is the source of truth: the fallback only fires
//!   while the location still equals the origin of the redirect
//! - A generation counter stops a superseded timer that already woke up
//! - The fallback is never retried; once it fired, only `cancel` or a
//!   different redirect clears it and `continue_now` stays available

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::observability::metrics;
use crate::redirect::plan::{HardReplaceAction, NavigateAction, RedirectPlan, RedirectTarget};
use crate::redirect::Navigator;
use crate::routing::normalize_path;
use crate::tenant::SubdomainResolver;

struct Pending {
    plan: RedirectPlan,
    timer: JoinHandle<()>,
    fired: Arc<AtomicBool>,
}

/// Executes blocking decisions against a `Navigator`.
///
/// Must be used from within a tokio runtime.
pub struct RedirectCoordinator {
    navigator: Arc<dyn Navigator>,
    resolver: SubdomainResolver,
    fallback_delay: Duration,
    generation: Arc<AtomicU64>,
    pending: Option<Pending>,
}

impl RedirectCoordinator {
    pub fn new(
        navigator: Arc<dyn Navigator>,
        resolver: SubdomainResolver,
        fallback_delay: Duration,
    ) -> Self {
        Self {
            navigator,
            resolver,
            fallback_delay,
            generation: Arc::new(AtomicU64::new(0)),
            pending: None,
        }
    }

    /// Navigate to `target` and arm the fallback.
    ///
    /// Reuses the pending plan for the same destination and origin while its
    /// fallback is armed, and for good once the fallback has fired.
    pub fn execute(&mut self, target: RedirectTarget, origin_path: &str, host: &str) -> RedirectPlan {
        let origin_path = normalize_path(origin_path);
        if let Some(pending) = &self.pending {
            if pending.plan.target == target && pending.plan.origin_path == origin_path {
                if pending.fired.load(Ordering::SeqCst) {
                    tracing::debug!(destination = %target.path, "Fallback already fired, not retrying");
                    return pending.plan.clone();
                }
                if !pending.timer.is_finished() {
                    tracing::debug!(destination = %target.path, "Redirect already pending, reusing plan");
                    return pending.plan.clone();
                }
            }
        }
        self.cancel();

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let plan = RedirectPlan {
            primary: NavigateAction {
                path: target.path.clone(),
            },
            fallback: HardReplaceAction {
                url: self.resolver.create_internal_link(host, &target.path),
            },
            fallback_delay: self.fallback_delay,
            fallback_armed_at: Instant::now(),
            origin_path,
            generation,
            target,
        };

        tracing::info!(
            destination = %plan.target.path,
            kind = plan.target.kind.as_str(),
            origin = %plan.origin_path,
            delay_ms = plan.fallback_delay.as_millis() as u64,
            "Redirecting"
        );
        self.navigator.navigate(&plan.primary.path);
        metrics::record_redirect(plan.target.kind.as_str());

        let fired = Arc::new(AtomicBool::new(false));
        let timer = tokio::spawn(run_fallback(
            self.navigator.clone(),
            self.generation.clone(),
            fired.clone(),
            plan.clone(),
        ));
        self.pending = Some(Pending {
            plan: plan.clone(),
            timer,
            fired,
        });
        plan
    }

    /// Cancel the pending plan. Returns true if a live timer was stopped.
    pub fn cancel(&mut self) -> bool {
        let Some(pending) = self.pending.take() else {
            return false;
        };
        self.generation.fetch_add(1, Ordering::SeqCst);
        if pending.timer.is_finished() {
            return false;
        }
        pending.timer.abort();
        tracing::debug!(destination = %pending.plan.target.path, "Redirect fallback cancelled");
        metrics::record_fallback("cancelled");
        true
    }

    /// The plan whose fallback is still armed, if any.
    pub fn pending_plan(&self) -> Option<&RedirectPlan> {
        self.pending
            .as_ref()
            .filter(|p| !p.timer.is_finished())
            .map(|p| &p.plan)
    }

    pub fn is_armed(&self) -> bool {
        self.pending_plan().is_some()
    }

    /// Perform the pending hard replace immediately.
    ///
    /// Returns the URL replaced to, or `None` when nothing was pending.
    pub fn continue_now(&mut self) -> Option<String> {
        let url = self.pending.as_ref()?.plan.fallback.url.clone();
        self.cancel();
        tracing::info!(url = %url, "Redirect continued manually");
        self.navigator.hard_replace(&url);
        Some(url)
    }
}

impl Drop for RedirectCoordinator {
    fn drop(&mut self) {
        self.cancel();
    }
}

async fn run_fallback(
    navigator: Arc<dyn Navigator>,
    generation: Arc<AtomicU64>,
    fired: Arc<AtomicBool>,
    plan: RedirectPlan,
) {
    tokio::time::sleep_until(plan.fallback_deadline()).await;

    if generation.load(Ordering::SeqCst) != plan.generation {
        return;
    }

    // Only the denied page itself counts as "navigation did not happen".
    let current = normalize_path(&navigator.current_path());
    if current != plan.origin_path {
        if plan.target.is_reached_by(&current) {
            tracing::debug!(destination = %plan.target.path, "SPA navigation reached target");
        } else {
            tracing::debug!(
                origin = %plan.origin_path,
                current = %current,
                "Location changed since redirect was requested, standing down"
            );
        }
        metrics::record_fallback("stood_down");
        return;
    }

    tracing::warn!(
        destination = %plan.target.path,
        url = %plan.fallback.url,
        "SPA navigation did not resolve, forcing hard replace"
    );
    fired.store(true, Ordering::SeqCst);
    navigator.hard_replace(&plan.fallback.url);
    metrics::record_fallback("fired");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::redirect::plan::RedirectKind;
    use std::sync::Mutex;

    /// Router that silently ignores SPA navigations unless told otherwise.
    #[derive(Default)]
    struct StuckRouter {
        location: Mutex<String>,
        follow: bool,
        navigations: Mutex<Vec<String>>,
        replaces: Mutex<Vec<String>>,
    }

    impl StuckRouter {
        fn at(path: &str, follow: bool) -> Arc<Self> {
            Arc::new(Self {
                location: Mutex::new(path.to_string()),
                follow,
                ..Self::default()
            })
        }
    }

    impl Navigator for StuckRouter {
        fn current_path(&self) -> String {
            self.location.lock().unwrap().clone()
        }

        fn navigate(&self, path: &str) {
            self.navigations.lock().unwrap().push(path.to_string());
            if self.follow {
                *self.location.lock().unwrap() = path.to_string();
            }
        }

        fn hard_replace(&self, url: &str) {
            self.replaces.lock().unwrap().push(url.to_string());
        }
    }

    fn auth_target() -> RedirectTarget {
        RedirectTarget {
            kind: RedirectKind::Auth,
            path: "/auth".into(),
        }
    }

    fn coordinator(router: &Arc<StuckRouter>) -> RedirectCoordinator {
        RedirectCoordinator::new(
            router.clone(),
            SubdomainResolver::default(),
            Duration::from_millis(300),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_fallback_fires_when_spa_navigation_is_ignored() {
        let router = StuckRouter::at("/dashboard/patient", false);
        let mut coordinator = coordinator(&router);

        let plan = coordinator.execute(auth_target(), "/dashboard/patient", "patient.medcitas.com");
        assert_eq!(plan.fallback.url, "//patient.medcitas.com/auth");
        assert_eq!(*router.navigations.lock().unwrap(), vec!["/auth"]);

        tokio::time::sleep(Duration::from_millis(299)).await;
        assert!(router.replaces.lock().unwrap().is_empty());

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(*router.replaces.lock().unwrap(), vec!["//patient.medcitas.com/auth"]);
        assert!(!coordinator.is_armed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_fallback_stands_down_when_spa_navigation_worked() {
        let router = StuckRouter::at("/dashboard/patient", true);
        let mut coordinator = coordinator(&router);

        coordinator.execute(auth_target(), "/dashboard/patient", "patient.medcitas.com");
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(router.replaces.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_fallback_respects_manual_navigation() {
        let router = StuckRouter::at("/dashboard/patient", false);
        let mut coordinator = coordinator(&router);

        coordinator.execute(auth_target(), "/dashboard/patient", "patient.medcitas.com");
        *router.location.lock().unwrap() = "/precios".into();
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(router.replaces.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_execute_is_idempotent() {
        let router = StuckRouter::at("/dashboard/patient", false);
        let mut coordinator = coordinator(&router);

        let first = coordinator.execute(auth_target(), "/dashboard/patient", "h.medcitas.com");
        tokio::time::sleep(Duration::from_millis(100)).await;
        let second = coordinator.execute(auth_target(), "/dashboard/patient", "h.medcitas.com");
        assert_eq!(first, second);
        assert_eq!(router.navigations.lock().unwrap().len(), 1);

        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert_eq!(router.replaces.lock().unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_target_supersedes_old_timer() {
        let router = StuckRouter::at("/dashboard/admin", false);
        let mut coordinator = coordinator(&router);

        let first = coordinator.execute(auth_target(), "/dashboard/admin", "h.medcitas.com");
        tokio::time::sleep(Duration::from_millis(200)).await;
        let home = RedirectTarget {
            kind: RedirectKind::RoleHome(crate::session::Role::Doctor),
            path: "/dashboard/doctor".into(),
        };
        let plan = coordinator.execute(home, "/dashboard/admin", "h.medcitas.com");
        assert!(plan.generation > first.generation);

        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert_eq!(*router.replaces.lock().unwrap(), vec!["//h.medcitas.com/dashboard/doctor"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fallback_fires_when_origin_is_below_target() {
        let router = StuckRouter::at("/dashboard/patient/billing", false);
        let mut coordinator = coordinator(&router);
        let home = RedirectTarget {
            kind: RedirectKind::RoleHome(crate::session::Role::Patient),
            path: "/dashboard/patient".into(),
        };

        coordinator.execute(home, "/dashboard/patient/billing", "patient.medcitas.com");
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(
            *router.replaces.lock().unwrap(),
            vec!["//patient.medcitas.com/dashboard/patient"]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_fired_fallback_is_not_retried() {
        let router = StuckRouter::at("/dashboard/patient", false);
        let mut coordinator = coordinator(&router);

        let first = coordinator.execute(auth_target(), "/dashboard/patient", "patient.medcitas.com");
        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_eq!(router.replaces.lock().unwrap().len(), 1);

        let again = coordinator.execute(auth_target(), "/dashboard/patient", "patient.medcitas.com");
        assert_eq!(again, first);
        assert!(!coordinator.is_armed());
        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_eq!(router.navigations.lock().unwrap().len(), 1);
        assert_eq!(router.replaces.lock().unwrap().len(), 1);

        // Manual escalation still works, and clearing allows a new attempt.
        assert_eq!(coordinator.continue_now().as_deref(), Some("//patient.medcitas.com/auth"));
        coordinator.execute(auth_target(), "/dashboard/patient", "patient.medcitas.com");
        assert_eq!(router.navigations.lock().unwrap().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stood_down_plan_can_redirect_again() {
        let router = StuckRouter::at("/dashboard/patient", false);
        let mut coordinator = coordinator(&router);

        coordinator.execute(auth_target(), "/dashboard/patient", "h.medcitas.com");
        *router.location.lock().unwrap() = "/precios".into();
        tokio::time::sleep(Duration::from_millis(400)).await;

        *router.location.lock().unwrap() = "/dashboard/patient".into();
        coordinator.execute(auth_target(), "/dashboard/patient", "h.medcitas.com");
        assert_eq!(router.navigations.lock().unwrap().len(), 2);
        assert!(coordinator.is_armed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_and_drop_disarm() {
        let router = StuckRouter::at("/dashboard/patient", false);
        let mut coordinator = coordinator(&router);

        coordinator.execute(auth_target(), "/dashboard/patient", "h.medcitas.com");
        assert!(coordinator.cancel());
        assert!(!coordinator.cancel());

        coordinator.execute(auth_target(), "/dashboard/patient", "h.medcitas.com");
        drop(coordinator);

        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert!(router.replaces.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_continue_now() {
        let router = StuckRouter::at("/dashboard/patient", false);
        let mut coordinator = coordinator(&router);

        assert_eq!(coordinator.continue_now(), None);
        coordinator.execute(auth_target(), "/dashboard/patient", "h.medcitas.com");
        assert_eq!(coordinator.continue_now().as_deref(), Some("//h.medcitas.com/auth"));

        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert_eq!(router.replaces.lock().unwrap().len(), 1);
    }
}
