//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the guard.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::session::Role;

/// Root configuration for the route guard.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GuardConfig {
    /// Listener configuration for the HTTP edge guard.
    pub listener: ListenerConfig,

    /// Tenant host settings.
    pub tenant: TenantConfig,

    /// Public allow-list and protected route table.
    pub policy: PolicyConfig,

    /// Redirect fallback settings.
    pub redirect: RedirectConfig,

    /// Emergency-access affordance.
    pub emergency: EmergencyConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Tenant host configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct TenantConfig {
    /// Registrable domain shared by all tenants (e.g., "medcitas.com").
    /// When unset, cross-tenant hosts are derived from the current host.
    pub base_domain: Option<String>,
}

/// Route policy configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Paths anyone may view. `/` matches only the root; every other entry
    /// matches itself and its sub-paths.
    pub public_routes: Vec<String>,

    /// Protected paths with role restrictions.
    pub protected_routes: Vec<ProtectedRouteConfig>,

    /// Authentication entry point.
    pub auth_path: String,

    /// Prefix of the per-role dashboards.
    pub dashboard_prefix: String,

    /// Apply the role table. Disabling reproduces the legacy always-allow
    /// behavior for authenticated viewers.
    pub enforce_roles: bool,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        let public_routes = [
            "/",
            "/precios",
            "/especialidades",
            "/como-funciona",
            "/terminos",
            "/privacidad",
            "/cookies",
            "/aviso-legal",
            "/contacto",
            "/catalogo",
            "/auth",
        ]
        .into_iter()
        .map(String::from)
        .collect();

        let protected_routes = Role::ALL
            .into_iter()
            .map(|role| ProtectedRouteConfig {
                path: format!("/dashboard/{role}"),
                roles: vec![role],
            })
            .collect();

        Self {
            public_routes,
            protected_routes,
            auth_path: "/auth".to_string(),
            dashboard_prefix: "/dashboard".to_string(),
            enforce_roles: true,
        }
    }
}

/// A protected route entry.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProtectedRouteConfig {
    /// Path prefix of the route.
    pub path: String,

    /// Roles allowed to view it. Empty means any authenticated viewer.
    #[serde(default)]
    pub roles: Vec<Role>,
}

/// Redirect configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RedirectConfig {
    /// Delay before a hard location replace backs up an SPA navigation.
    pub fallback_delay_ms: u64,
}

impl Default for RedirectConfig {
    fn default() -> Self {
        Self {
            fallback_delay_ms: 300,
        }
    }
}

/// Emergency-access configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EmergencyConfig {
    /// Offer the emergency-access link at all.
    pub enabled: bool,

    /// Failed logins before the link is offered.
    pub failure_threshold: u32,

    /// Target of the emergency-access link.
    pub path: String,
}

impl Default for EmergencyConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            failure_threshold: 3,
            path: "/auth/emergency".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
