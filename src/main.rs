//! Portal route guard, HTTP edge.
//!
//! # Architecture Overview
//!
//! ```text
//!     Auth proxy (x-auth-* headers)
//!     ──────────────────────────────▶ ┌──────────────┐    ┌──────────────┐
//!                                     │ http server  │───▶│ edge guard   │
//!                                     │ (layers)     │    │ middleware   │
//!                                     └──────────────┘    └──────┬───────┘
//!                                                                │
//!                               ┌────────────────────────────────┤
//!                               ▼                                ▼
//!                        ┌──────────────┐                ┌──────────────┐
//!                        │ tenant       │                │ access       │
//!                        │ resolver     │                │ engine       │
//!                        └──────────────┘                └──────┬───────┘
//!                                                               │
//!     303 See Other / tenant shell  ◀───────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use portal_guard::config::{load_config, GuardConfig};
use portal_guard::lifecycle::{shutdown_on_signal, Shutdown};
use portal_guard::observability::{logging, metrics};
use portal_guard::{GuardError, GuardServer};

#[derive(Parser)]
#[command(name = "portal-guard")]
#[command(about = "Multi-tenant route guard for the patient portal", long_about = None)]
struct Args {
    /// Path to a TOML configuration file. Built-in defaults when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), GuardError> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => GuardConfig::default(),
    };

    logging::init_logging(&config.observability);
    tracing::info!("portal-guard v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        public_routes = config.policy.public_routes.len(),
        protected_routes = config.policy.protected_routes.len(),
        enforce_roles = config.policy.enforce_roles,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Arc::new(Shutdown::new());
    let server_shutdown = shutdown.subscribe();
    let signal_shutdown = shutdown.clone();
    tokio::spawn(async move { shutdown_on_signal(&signal_shutdown).await });

    GuardServer::new(config).run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
