//! Session-aware, multi-subdomain route guard.

pub mod access;
pub mod config;
pub mod error;
pub mod guard;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod redirect;
pub mod routing;
pub mod session;
pub mod tenant;

pub use access::{AccessDecision, AccessDecisionEngine};
pub use config::schema::GuardConfig;
pub use error::GuardError;
pub use guard::{GuardState, GuardView, RouteGuard};
pub use http::GuardServer;
pub use lifecycle::Shutdown;
pub use redirect::{Navigator, RedirectCoordinator};
pub use routing::RoutePolicy;
pub use session::{Role, Session, UserIdentity};
pub use tenant::{Subdomain, SubdomainResolver};
