//! Cross-tenant URL and internal link construction.
//!
//! # Responsibilities
//! - Build absolute URLs that move the viewer to another tenant
//! - Build protocol-relative links that stay on the current tenant
//!
//! # Design Decisions
//! - Scheme and port of the origin are preserved; only the tenant label moves
//! - Best-effort: unparsable origins degrade to the bare path, IP hosts and
//!   `Unknown` targets keep the origin host unchanged
//! - Paths are normalized to start with `/`

use url::{Host, Url};

use crate::config::TenantConfig;
use crate::tenant::subdomain::{self, Subdomain};

/// Resolves tenant context and builds links between tenants.
#[derive(Debug, Clone, Default)]
pub struct SubdomainResolver {
    base_domain: Option<String>,
}

impl SubdomainResolver {
    /// Create a resolver; `base_domain` pins cross-tenant hosts to
    /// `<label>.<base_domain>`.
    pub fn new(base_domain: Option<String>) -> Self {
        let base_domain = base_domain
            .map(|d| d.trim().trim_matches('.').to_ascii_lowercase())
            .filter(|d| !d.is_empty());
        Self { base_domain }
    }

    pub fn from_config(config: &TenantConfig) -> Self {
        Self::new(config.base_domain.clone())
    }

    /// See [`subdomain::current_subdomain`].
    pub fn current_subdomain(&self, host: &str) -> Subdomain {
        subdomain::current_subdomain(host)
    }

    /// Absolute URL for `path` on the `target` tenant, derived from `origin`
    /// (e.g. `https://patient.medcitas.com:8443`).
    pub fn build_subdomain_url(&self, origin: &str, target: Subdomain, path: &str) -> String {
        let path = ensure_leading_slash(path);
        let mut url = match Url::parse(origin.trim()) {
            Ok(url) if url.has_host() => url,
            _ => {
                tracing::debug!(origin, "Unparsable origin, falling back to bare path");
                return path;
            }
        };

        if let Some(new_host) = self.swap_label(&url, target) {
            if url.set_host(Some(&new_host)).is_err() {
                tracing::debug!(host = %new_host, "Rejected tenant host, keeping origin host");
            }
        }

        let (path_part, query) = match path.split_once('?') {
            Some((p, q)) => (p, Some(q)),
            None => (path.as_str(), None),
        };
        url.set_path(path_part);
        url.set_query(query);
        url.set_fragment(None);
        url.to_string()
    }

    /// Protocol-relative link to `path` on the current host.
    pub fn create_internal_link(&self, host: &str, path: &str) -> String {
        let path = ensure_leading_slash(path);
        let host = host.trim();
        if host.is_empty() || host.contains(['/', '\\', ' ', '?', '#', '@']) {
            return path;
        }
        format!("//{host}{path}")
    }

    fn swap_label(&self, url: &Url, target: Subdomain) -> Option<String> {
        let label = target.label()?;
        let host = match url.host()? {
            Host::Domain(domain) => domain.to_ascii_lowercase(),
            Host::Ipv4(_) | Host::Ipv6(_) => return None,
        };

        if let Some(base) = &self.base_domain {
            return Some(format!("{label}.{base}"));
        }

        match host.split_once('.') {
            Some((first, rest)) if Subdomain::from_label(first) != Subdomain::Unknown => {
                Some(format!("{label}.{rest}"))
            }
            _ => Some(format!("{label}.{host}")),
        }
    }
}

/// Normalize a path so it always starts with `/`.
pub fn ensure_leading_slash(path: &str) -> String {
    let path = path.trim();
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}
