//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate route patterns and value ranges
//! - Detect routes that are both public and protected
//! - Reject policies whose redirect targets would redirect again
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GuardConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::GuardConfig;
use crate::routing::matcher::normalize_path;
use crate::routing::RoutePolicy;
use crate::session::Role;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: path `{path}` must start with `/`")]
    RelativePath { field: &'static str, path: String },

    #[error("policy: `{0}` is listed as both public and protected")]
    PublicAndProtected(String),

    #[error("policy.auth_path `{0}` is not covered by policy.public_routes")]
    AuthPathNotPublic(String),

    #[error("policy: role `{role}` is denied its own home `{path}`")]
    HomeDenied { role: Role, path: String },

    #[error("policy.dashboard_prefix must not be `/`")]
    RootDashboardPrefix,

    #[error("redirect.fallback_delay_ms must be greater than zero")]
    ZeroFallbackDelay,

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroRequestTimeout,

    #[error("{field}: `{value}` is not a socket address")]
    BadAddress { field: &'static str, value: String },
}

/// Validate a parsed configuration.
pub fn validate_config(config: &GuardConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let policy = &config.policy;

    for path in &policy.public_routes {
        check_absolute("policy.public_routes", path, &mut errors);
    }
    for route in &policy.protected_routes {
        check_absolute("policy.protected_routes", &route.path, &mut errors);
        let normalized = normalize_path(&route.path);
        if policy
            .public_routes
            .iter()
            .any(|p| normalize_path(p) == normalized)
        {
            errors.push(ValidationError::PublicAndProtected(route.path.clone()));
        }
    }
    check_absolute("policy.auth_path", &policy.auth_path, &mut errors);
    check_absolute("policy.dashboard_prefix", &policy.dashboard_prefix, &mut errors);
    if normalize_path(&policy.dashboard_prefix) == "/" {
        errors.push(ValidationError::RootDashboardPrefix);
    }
    check_absolute("emergency.path", &config.emergency.path, &mut errors);
    check_redirect_targets(config, &mut errors);

    if config.redirect.fallback_delay_ms == 0 {
        errors.push(ValidationError::ZeroFallbackDelay);
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }

    check_address("listener.bind_address", &config.listener.bind_address, &mut errors);
    if config.observability.metrics_enabled {
        check_address(
            "observability.metrics_address",
            &config.observability.metrics_address,
            &mut errors,
        );
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_absolute(field: &'static str, path: &str, errors: &mut Vec<ValidationError>) {
    if !path.starts_with('/') {
        errors.push(ValidationError::RelativePath {
            field,
            path: path.to_string(),
        });
    }
}

/// Redirect targets must be viewable by whoever is sent there.
fn check_redirect_targets(config: &GuardConfig, errors: &mut Vec<ValidationError>) {
    let policy = RoutePolicy::from_config(&config.policy);

    if !policy.is_public_route(&config.policy.auth_path) {
        errors.push(ValidationError::AuthPathNotPublic(config.policy.auth_path.clone()));
    }
    if !policy.enforces_roles() {
        return;
    }
    for role in Role::ALL {
        let home = policy.home_path_for(role);
        if !policy.is_public_route(&home) && !policy.roles_allowed_for(&home).permits(role) {
            errors.push(ValidationError::HomeDenied { role, path: home });
        }
    }
}

fn check_address(field: &'static str, value: &str, errors: &mut Vec<ValidationError>) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BadAddress {
            field,
            value: value.to_string(),
        });
    }
}
