//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Current path (SPA location or request URI)
//!     → matcher.rs (normalize, evaluate path patterns)
//!     → policy.rs (public? which roles?)
//!     → Return: classification consumed by the access engine
//!
//! Policy Compilation (at startup):
//!     PolicyConfig
//!     → Compile patterns
//!     → Sort protected rules by specificity
//!     → Freeze as immutable RoutePolicy
//! ```
//!
//! # Design Decisions
//! - Policy compiled at startup, immutable at runtime
//! - No regex in hot path (prefix matching only)
//! - Deterministic: same input always yields the same classification

pub mod matcher;
pub mod policy;

pub use matcher::{normalize_path, PathPattern};
pub use policy::{RouteAccess, RoutePolicy, RouteRule};
