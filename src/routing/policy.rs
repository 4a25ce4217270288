//! Route access policy.
//!
//! # Responsibilities
//! - Classify paths as public or protected
//! - Look up which roles may view a protected path
//! - Name the auth entry point and each role's home
//!
//! # Design Decisions
//! - Immutable after construction (shared via Arc, no locks)
//! - Unmatched paths are protected (fail-closed on authentication)
//! - Unmatched protected paths allow any authenticated role (fail-open on
//!   role); unknown pages require login but not a specific role
//! - Longest matching protected rule wins

use std::collections::BTreeSet;

use crate::config::PolicyConfig;
use crate::routing::matcher::{normalize_path, PathPattern};
use crate::session::Role;

/// Who may view a protected route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteAccess {
    AnyAuthenticated,
    Roles(BTreeSet<Role>),
}

impl RouteAccess {
    pub fn permits(&self, role: Role) -> bool {
        match self {
            RouteAccess::AnyAuthenticated => true,
            RouteAccess::Roles(roles) => roles.contains(&role),
        }
    }
}

static ANY_AUTHENTICATED: RouteAccess = RouteAccess::AnyAuthenticated;

/// A protected route entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRule {
    pub pattern: PathPattern,
    pub access: RouteAccess,
}

/// Static classification table consulted on every evaluation.
#[derive(Debug, Clone)]
pub struct RoutePolicy {
    public: Vec<PathPattern>,
    /// Sorted by descending specificity.
    protected: Vec<RouteRule>,
    auth_path: String,
    dashboard_prefix: PathPattern,
    enforce_roles: bool,
}

impl RoutePolicy {
    /// Compile the policy from validated configuration.
    pub fn from_config(config: &PolicyConfig) -> Self {
        let public = config
            .public_routes
            .iter()
            .map(|p| PathPattern::parse(p))
            .collect();

        let mut protected: Vec<RouteRule> = config
            .protected_routes
            .iter()
            .map(|route| RouteRule {
                pattern: PathPattern::parse(&route.path),
                access: if route.roles.is_empty() {
                    RouteAccess::AnyAuthenticated
                } else {
                    RouteAccess::Roles(route.roles.iter().copied().collect())
                },
            })
            .collect();
        protected.sort_by(|a, b| b.pattern.specificity().cmp(&a.pattern.specificity()));

        Self {
            public,
            protected,
            auth_path: normalize_path(&config.auth_path),
            dashboard_prefix: PathPattern::parse(&config.dashboard_prefix),
            enforce_roles: config.enforce_roles,
        }
    }

    /// Returns true if anyone may view `path`.
    pub fn is_public_route(&self, path: &str) -> bool {
        let path = normalize_path(path);
        self.public.iter().any(|p| p.matches(&path))
    }

    /// Roles allowed to view the protected `path`.
    pub fn roles_allowed_for(&self, path: &str) -> &RouteAccess {
        let path = normalize_path(path);
        self.protected
            .iter()
            .find(|rule| rule.pattern.matches(&path))
            .map_or(&ANY_AUTHENTICATED, |rule| &rule.access)
    }

    /// Returns true if `path` is under the per-role dashboards.
    pub fn is_dashboard_path(&self, path: &str) -> bool {
        self.dashboard_prefix.matches(&normalize_path(path))
    }

    /// Authentication entry point.
    pub fn auth_path(&self) -> &str {
        &self.auth_path
    }

    /// Canonical home of a role, e.g. `/dashboard/doctor`.
    pub fn home_path_for(&self, role: Role) -> String {
        format!("{}/{}", self.dashboard_prefix.as_str(), role)
    }

    /// Whether the role table is applied.
    pub fn enforces_roles(&self) -> bool {
        self.enforce_roles
    }
}

impl Default for RoutePolicy {
    fn default() -> Self {
        Self::from_config(&PolicyConfig::default())
    }
}
