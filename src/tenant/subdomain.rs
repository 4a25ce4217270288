//! Tenant subdomain classification.
//!
//! # Responsibilities
//! - Derive the tenant (`Subdomain`) from a raw host string
//! - Map each role to its canonical tenant
//!
//! # Design Decisions
//! - Never fails: malformed hosts, IP literals and unexpected labels are
//!   `Unknown`, since this runs on every evaluation
//! - Host matching is case-insensitive (RFC 4343)
//! - Only the leftmost label is inspected; the rest of the host is opaque

use std::fmt;

use serde::{Deserialize, Serialize};
use url::Host;

use crate::session::Role;

/// Tenant context derived from the active host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Subdomain {
    Www,
    Patient,
    Doctor,
    Admin,
    Laboratory,
    Unknown,
}

impl Subdomain {
    /// Tenants with a host label, in a stable order.
    pub const KNOWN: [Subdomain; 5] = [
        Subdomain::Www,
        Subdomain::Patient,
        Subdomain::Doctor,
        Subdomain::Admin,
        Subdomain::Laboratory,
    ];

    /// Host label of this tenant, `None` for `Unknown`.
    pub fn label(self) -> Option<&'static str> {
        match self {
            Subdomain::Www => Some("www"),
            Subdomain::Patient => Some("patient"),
            Subdomain::Doctor => Some("doctor"),
            Subdomain::Admin => Some("admin"),
            Subdomain::Laboratory => Some("laboratory"),
            Subdomain::Unknown => None,
        }
    }

    /// Classify a single host label.
    pub fn from_label(label: &str) -> Self {
        match label.to_ascii_lowercase().as_str() {
            "www" => Subdomain::Www,
            "patient" => Subdomain::Patient,
            "doctor" => Subdomain::Doctor,
            "admin" => Subdomain::Admin,
            "laboratory" => Subdomain::Laboratory,
            _ => Subdomain::Unknown,
        }
    }
}

impl fmt::Display for Subdomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label().unwrap_or("unknown"))
    }
}

/// Strip port and trailing dot from a host, lowercased.
///
/// Returns `None` for IP literals, bad ports and hosts `url` rejects.
pub(crate) fn hostname_of(host: &str) -> Option<String> {
    let host = host.trim();
    let name = match host.rsplit_once(':') {
        Some((name, port)) if !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()) => name,
        Some(_) => return None,
        None => host,
    };

    match Host::parse(name).ok()? {
        Host::Domain(domain) => {
            let domain = domain.trim_end_matches('.').to_ascii_lowercase();
            (!domain.is_empty()).then_some(domain)
        }
        Host::Ipv4(_) | Host::Ipv6(_) => None,
    }
}

/// Derive the tenant from a host such as `patient.example.com:8080`.
pub fn current_subdomain(host: &str) -> Subdomain {
    let Some(name) = hostname_of(host) else {
        return Subdomain::Unknown;
    };

    let mut labels = name.split('.');
    let first = labels.next().unwrap_or_default();
    // A single label (e.g. `localhost`) carries no tenant.
    if labels.next().is_none() {
        return Subdomain::Unknown;
    }
    Subdomain::from_label(first)
}

/// Canonical tenant of a role.
pub fn default_subdomain_for(role: Role) -> Subdomain {
    match role {
        Role::Patient => Subdomain::Patient,
        Role::Doctor => Subdomain::Doctor,
        Role::Admin => Subdomain::Admin,
        Role::Laboratory => Subdomain::Laboratory,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_tenants() {
        assert_eq!(current_subdomain("patient.medcitas.com"), Subdomain::Patient);
        assert_eq!(current_subdomain("Doctor.MedCitas.com:8443"), Subdomain::Doctor);
        assert_eq!(current_subdomain("www.medcitas.com"), Subdomain::Www);
        assert_eq!(current_subdomain("laboratory.localhost:3000"), Subdomain::Laboratory);
        assert_eq!(current_subdomain("admin.medcitas.com."), Subdomain::Admin);
    }

    #[test]
    fn test_unknown_hosts() {
        assert_eq!(current_subdomain(""), Subdomain::Unknown);
        assert_eq!(current_subdomain("localhost:3000"), Subdomain::Unknown);
        assert_eq!(current_subdomain("127.0.0.1:8080"), Subdomain::Unknown);
        assert_eq!(current_subdomain("[::1]:8080"), Subdomain::Unknown);
        assert_eq!(current_subdomain("::1"), Subdomain::Unknown);
        assert_eq!(current_subdomain("billing.medcitas.com"), Subdomain::Unknown);
        assert_eq!(current_subdomain("medcitas.com"), Subdomain::Unknown);
        assert_eq!(current_subdomain("patient.medcitas.com:http"), Subdomain::Unknown);
        assert_eq!(current_subdomain("patient medcitas.com"), Subdomain::Unknown);
        assert_eq!(current_subdomain("patient.medcitas.com:"), Subdomain::Unknown);
    }

    #[test]
    fn test_hostname_of() {
        assert_eq!(hostname_of("Patient.MedCitas.com.:8443").as_deref(), Some("patient.medcitas.com"));
        assert_eq!(hostname_of(" doctor.medcitas.com ").as_deref(), Some("doctor.medcitas.com"));
        assert_eq!(hostname_of("10.0.0.7"), None);
        assert_eq!(hostname_of("[2001:db8::1]:443"), None);
        assert_eq!(hostname_of("."), None);
    }

    #[test]
    fn test_default_subdomain_is_total() {
        for role in Role::ALL {
            let sub = default_subdomain_for(role);
            assert_ne!(sub, Subdomain::Unknown);
            assert_ne!(sub, Subdomain::Www);
            assert_eq!(sub.label(), Some(role.as_str()));
        }
    }
}
