//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define guard metrics (decisions, redirects, fallbacks, tenant mismatches)
//! - Expose Prometheus-compatible metrics endpoint
//!
//! # Metrics
//! - `guard_decisions_total` (counter): evaluations by outcome
//! - `guard_subdomain_mismatch_total` (counter): by expected/actual tenant
//! - `guard_redirects_total` (counter): SPA navigations issued, by kind
//! - `guard_fallback_total` (counter): fallback results (fired, stood_down, cancelled)
//!
//! # Design Decisions
//! - Recording without an installed recorder is a no-op, so the core
//!   library never requires the exporter

use std::net::SocketAddr;

use metrics::counter;
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint started"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_decision(outcome: &'static str) {
    counter!("guard_decisions_total", "outcome" => outcome).increment(1);
}

pub fn record_subdomain_mismatch(expected: &'static str, actual: &'static str) {
    counter!("guard_subdomain_mismatch_total", "expected" => expected, "actual" => actual).increment(1);
}

pub fn record_redirect(kind: &'static str) {
    counter!("guard_redirects_total", "kind" => kind).increment(1);
}

pub fn record_fallback(result: &'static str) {
    counter!("guard_fallback_total", "result" => result).increment(1);
}
