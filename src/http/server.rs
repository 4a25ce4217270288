//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the tenant shell and health handlers
//! - Wire up middleware (tracing, timeout, request ID, edge guard)
//! - Bind server to listener
//! - Stop on the shutdown broadcast

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::Extension,
    middleware,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::access::AccessDecisionEngine;
use crate::config::GuardConfig;
use crate::http::middleware::{guard_middleware, EdgeGuardState, ViewerContext};
use crate::http::request::MakeRequestUuidV4;
use crate::routing::RoutePolicy;
use crate::tenant::SubdomainResolver;

/// HTTP edge guard.
pub struct GuardServer {
    router: Router,
    config: GuardConfig,
}

impl GuardServer {
    /// Create a new server with the given configuration.
    pub fn new(config: GuardConfig) -> Self {
        let policy = Arc::new(RoutePolicy::from_config(&config.policy));
        let state = EdgeGuardState {
            engine: AccessDecisionEngine::new(policy),
            resolver: SubdomainResolver::from_config(&config.tenant),
        };
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &GuardConfig, state: EdgeGuardState) -> Router {
        let guarded = Router::new()
            .route("/", get(shell_handler))
            .route("/{*path}", get(shell_handler))
            .layer(middleware::from_fn_with_state(state, guard_middleware));

        Router::new()
            .route("/_guard/health", get(health_handler))
            .merge(guarded)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV4))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::x_request_id())
                    .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs))),
            )
    }

    /// Router with all layers, for embedding or in-process tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            fallback_delay_ms = self.config.redirect.fallback_delay_ms,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GuardConfig {
        &self.config
    }
}

/// Tenant shell placeholder: echoes what the guard let through.
async fn shell_handler(
    Extension(viewer): Extension<ViewerContext>,
    uri: axum::http::Uri,
) -> Json<Value> {
    Json(json!({
        "path": uri.path(),
        "subdomain": viewer.subdomain,
        "user": viewer.session.user,
    }))
}

async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
