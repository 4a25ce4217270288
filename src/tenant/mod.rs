//! Tenant (subdomain) subsystem.
//!
//! # Data Flow
//! ```text
//! Host header / browser location
//!     → subdomain.rs (leftmost label → Subdomain)
//!     → links.rs (cross-tenant URLs, internal links)
//! ```
//!
//! # Design Decisions
//! - Derived on every call, never cached
//! - Pure functions of host and inputs; no I/O

pub mod links;
pub mod subdomain;

pub use links::SubdomainResolver;
pub use subdomain::{current_subdomain, default_subdomain_for, Subdomain};
