//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → GuardConfig (validated, immutable)
//!     → RoutePolicy / RouteGuard / HTTP edge built once at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; the route policy is never reloaded
//!   while the process runs
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    EmergencyConfig, GuardConfig, ListenerConfig, LogFormat, ObservabilityConfig, PolicyConfig,
    ProtectedRouteConfig, RedirectConfig, TenantConfig, TimeoutConfig,
};
