//! Edge guard middleware.
//! Applies the access engine to every HTTP request before the tenant shell
//! is served.

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::access::{AccessDecision, AccessDecisionEngine};
use crate::http::request::{request_host, session_from_headers};
use crate::observability::metrics;
use crate::redirect::RedirectTarget;
use crate::session::Session;
use crate::tenant::{Subdomain, SubdomainResolver};

/// State required for the edge guard.
#[derive(Clone)]
pub struct EdgeGuardState {
    pub engine: AccessDecisionEngine,
    pub resolver: SubdomainResolver,
}

/// Context attached to requests the guard let through.
#[derive(Clone, Debug, Serialize)]
pub struct ViewerContext {
    pub session: Session,
    pub subdomain: Subdomain,
}

pub async fn guard_middleware(
    State(state): State<EdgeGuardState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let host = request_host(&req);
    let path = req.uri().path().to_string();
    let session = session_from_headers(req.headers());
    let subdomain = state.resolver.current_subdomain(&host);

    let decision = state.engine.decide(&session, &path, subdomain);
    metrics::record_decision(decision.outcome());

    match &decision {
        AccessDecision::Allow => {}
        AccessDecision::WarnSubdomainMismatch { expected, actual } => {
            tracing::warn!(
                path = %path,
                expected = %expected,
                actual = %actual,
                "Dashboard requested from another tenant's subdomain"
            );
            metrics::record_subdomain_mismatch(
                expected.label().unwrap_or("unknown"),
                actual.label().unwrap_or("unknown"),
            );
        }
        AccessDecision::RedirectToAuth { .. } | AccessDecision::RedirectToRoleHome { .. } => {
            if let Some(target) = RedirectTarget::from_decision(&decision, state.engine.policy()) {
                tracing::info!(
                    path = %path,
                    host = %host,
                    destination = %target.path,
                    outcome = decision.outcome(),
                    "Request redirected"
                );
                metrics::record_redirect(target.kind.as_str());
                return (
                    StatusCode::SEE_OTHER,
                    [(header::LOCATION, target.path)],
                    "Access restricted",
                )
                    .into_response();
            }
        }
    }

    req.extensions_mut().insert(ViewerContext { session, subdomain });
    next.run(req).await
}
