//! End-to-end guard behavior against a fake browser router.

mod common;

use std::time::Duration;

use common::{default_guard, guard_with, RecordingNavigator};
use portal_guard::access::DenyReason;
use portal_guard::config::{parse_config, GuardConfig, ProtectedRouteConfig};
use portal_guard::{AccessDecision, GuardState, GuardView, Navigator, Role, Session, Subdomain, UserIdentity};

fn user(role: Role) -> Session {
    Session::authenticated(UserIdentity::new("u-1", "someone", role))
}

#[tokio::test(start_paused = true)]
async fn test_anonymous_dashboard_falls_back_to_hard_replace() {
    let nav = RecordingNavigator::at("/dashboard/patient", false);
    let mut guard = default_guard(&nav);

    let view = guard.observe(&Session::anonymous(), "/dashboard/patient", "patient.medcitas.com");
    assert!(matches!(view, GuardView::Redirecting(_)));
    assert_eq!(
        guard.state(),
        GuardState::Unauthenticated {
            reason: DenyReason::NotAuthenticated
        }
    );
    assert_eq!(nav.navigations(), vec!["/auth"]);

    tokio::time::sleep(Duration::from_millis(250)).await;
    assert!(nav.replaces().is_empty());

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(nav.replaces(), vec!["//patient.medcitas.com/auth"]);
    assert!(!guard.is_redirecting());
}

#[tokio::test(start_paused = true)]
async fn test_successful_navigation_needs_no_fallback() {
    let nav = RecordingNavigator::at("/dashboard/admin", true);
    let mut guard = default_guard(&nav);

    guard.observe(&user(Role::Doctor), "/dashboard/admin", "doctor.medcitas.com");
    assert_eq!(nav.current_path(), "/dashboard/doctor");

    // The router re-renders the guard at the new location.
    let view = guard.observe(&user(Role::Doctor), "/dashboard/doctor", "doctor.medcitas.com");
    assert_eq!(view, GuardView::Children);
    assert_eq!(guard.state(), GuardState::Authorized);

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert!(nav.replaces().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_session_resolving_within_window_cancels_redirect() {
    let nav = RecordingNavigator::at("/dashboard/patient", false);
    let mut guard = default_guard(&nav);

    guard.observe(&Session::anonymous(), "/dashboard/patient", "patient.medcitas.com");
    tokio::time::sleep(Duration::from_millis(100)).await;

    let view = guard.observe(&user(Role::Patient), "/dashboard/patient", "patient.medcitas.com");
    assert_eq!(view, GuardView::Children);
    assert!(guard.pending_redirect().is_none());

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert!(nav.replaces().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_repeated_observation_arms_a_single_timer() {
    let nav = RecordingNavigator::at("/dashboard/patient", false);
    let mut guard = default_guard(&nav);

    for _ in 0..5 {
        guard.observe(&Session::anonymous(), "/dashboard/patient", "patient.medcitas.com");
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert_eq!(nav.navigations().len(), 1);

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(nav.replaces().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_loading_session_cancels_pending_redirect() {
    let nav = RecordingNavigator::at("/dashboard/patient", false);
    let mut guard = default_guard(&nav);

    guard.observe(&Session::anonymous(), "/dashboard/patient", "patient.medcitas.com");
    let view = guard.observe(&Session::loading(), "/dashboard/patient", "patient.medcitas.com");
    assert_eq!(view, GuardView::Loading);

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert!(nav.replaces().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_dropping_guard_cancels_fallback() {
    let nav = RecordingNavigator::at("/dashboard/admin", false);
    let mut guard = default_guard(&nav);

    guard.observe(&user(Role::Patient), "/dashboard/admin", "admin.medcitas.com");
    drop(guard);

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert!(nav.replaces().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_continue_now_replaces_immediately() {
    let nav = RecordingNavigator::at("/dashboard/admin", false);
    let mut guard = default_guard(&nav);

    guard.observe(&user(Role::Laboratory), "/dashboard/admin", "admin.medcitas.com");
    assert_eq!(
        guard.continue_now().as_deref(),
        Some("//admin.medcitas.com/dashboard/laboratory")
    );

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(nav.replaces(), vec!["//admin.medcitas.com/dashboard/laboratory"]);
}

#[tokio::test]
async fn test_subdomain_mismatch_renders_children() {
    let nav = RecordingNavigator::at("/dashboard/doctor", true);
    let mut guard = default_guard(&nav);

    let view = guard.observe(&user(Role::Doctor), "/dashboard/doctor", "patient.medcitas.com");
    assert_eq!(view, GuardView::Children);
    assert_eq!(
        guard.last_decision(),
        Some(&AccessDecision::WarnSubdomainMismatch {
            expected: Subdomain::Doctor,
            actual: Subdomain::Patient,
        })
    );
    assert!(nav.navigations().is_empty());
}

#[tokio::test]
async fn test_public_routes_for_everyone() {
    let nav = RecordingNavigator::at("/", true);
    let mut guard = default_guard(&nav);

    for session in [Session::anonymous(), user(Role::Admin)] {
        for path in ["/", "/precios", "/auth/callback", "/catalogo/cardiologia"] {
            assert_eq!(guard.observe(&session, path, "www.medcitas.com"), GuardView::Children);
            assert_eq!(guard.state(), GuardState::PublicAllowed);
        }
    }
    assert!(nav.navigations().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_configured_policy_and_delay() {
    let config = parse_config(
        r#"
        [policy]
        public_routes = ["/", "/auth"]

        [[policy.protected_routes]]
        path = "/dashboard/reports"
        roles = ["admin", "doctor"]

        [redirect]
        fallback_delay_ms = 1000

        [emergency]
        enabled = true
        failure_threshold = 2
        "#,
    )
    .unwrap();

    let nav = RecordingNavigator::at("/dashboard/reports", false);
    let mut guard = guard_with(&config, &nav, 5);

    assert_eq!(
        guard.observe(&user(Role::Doctor), "/dashboard/reports", "doctor.medcitas.com"),
        GuardView::Children
    );

    let GuardView::Redirecting(notice) =
        guard.observe(&Session::anonymous(), "/dashboard/reports", "doctor.medcitas.com")
    else {
        panic!("expected redirect");
    };
    assert_eq!(notice.emergency_href.as_deref(), Some("//doctor.medcitas.com/auth/emergency"));

    tokio::time::sleep(Duration::from_millis(900)).await;
    assert!(nav.replaces().is_empty());
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(nav.replaces().len(), 1);
}

#[tokio::test]
async fn test_role_enforcement_can_be_disabled() {
    let mut config = GuardConfig::default();
    config.policy.enforce_roles = false;

    let nav = RecordingNavigator::at("/dashboard/admin", true);
    let mut guard = guard_with(&config, &nav, 0);

    let view = guard.observe(&user(Role::Patient), "/dashboard/admin", "admin.medcitas.com");
    assert_eq!(view, GuardView::Children);
    assert!(nav.navigations().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_denied_page_under_role_home_still_falls_back() {
    let mut config = GuardConfig::default();
    config.policy.protected_routes.push(ProtectedRouteConfig {
        path: "/dashboard/patient/billing".into(),
        roles: vec![Role::Admin],
    });

    let nav = RecordingNavigator::at("/dashboard/patient/billing", false);
    let mut guard = guard_with(&config, &nav, 0);

    let view = guard.observe(&user(Role::Patient), "/dashboard/patient/billing", "patient.medcitas.com");
    assert!(matches!(view, GuardView::Redirecting(_)));
    assert_eq!(nav.navigations(), vec!["/dashboard/patient"]);

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(nav.replaces(), vec!["//patient.medcitas.com/dashboard/patient"]);
}

#[tokio::test(start_paused = true)]
async fn test_fallback_fires_once_per_denied_page() {
    let nav = RecordingNavigator::at("/dashboard/patient", false);
    let mut guard = default_guard(&nav);

    guard.observe(&Session::anonymous(), "/dashboard/patient", "patient.medcitas.com");
    tokio::time::sleep(Duration::from_millis(400)).await;

    let view = guard.observe(&Session::anonymous(), "/dashboard/patient", "patient.medcitas.com");
    let GuardView::Redirecting(notice) = view else {
        panic!("expected redirect notice, got {view:?}");
    };
    assert_eq!(notice.action_href, "//patient.medcitas.com/auth");
    tokio::time::sleep(Duration::from_millis(400)).await;

    assert_eq!(nav.navigations(), vec!["/auth"]);
    assert_eq!(nav.replaces(), vec!["//patient.medcitas.com/auth"]);
}
