//! HTTP edge guard subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, layers)
//!     → request.rs (request ID, host, session headers)
//!     → middleware.rs (access engine → pass through or 303)
//!     → tenant shell handler
//! ```

pub mod middleware;
pub mod request;
pub mod server;

pub use middleware::{guard_middleware, EdgeGuardState, ViewerContext};
pub use request::{session_from_headers, MakeRequestUuidV4};
pub use server::GuardServer;
