//! Prometheus metrics helpers for the preview pipeline.
//!
//! # Usage
//!
//! ```rust,ignore
//! use draftpass_core::metrics::{init_metrics, start_metrics_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let handle = init_metrics();
//!     start_metrics_server(9092, handle).await.unwrap();
//! }
//! ```
//!
//! # Metric Naming Conventions
//!
//! - Prefix: `preview_`
//! - Suffix: `_total` for counters
//! - Labels: `reason`, `adapter`, `status`; all drawn from small fixed sets

use axum::{Router, routing::get};
use metrics::describe_counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::net::SocketAddr;

/// Initialize the Prometheus metrics recorder.
///
/// This must be called once at startup before any metrics are recorded.
///
/// # Panics
///
/// Panics if called more than once (the recorder can only be installed once).
pub fn init_metrics() -> PrometheusHandle {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus recorder");

    register_preview_metrics();

    handle
}

/// Like [`init_metrics`] but returns `None` if a recorder is already
/// installed.
pub fn try_init_metrics() -> Option<PrometheusHandle> {
    let handle = PrometheusBuilder::new().install_recorder().ok()?;
    register_preview_metrics();
    Some(handle)
}

/// Serve `/metrics` on `port` from a background task.
pub async fn start_metrics_server(
    port: u16,
    handle: PrometheusHandle,
) -> Result<(), std::io::Error> {
    let app = Router::new().route(
        "/metrics",
        get(move || {
            let handle = handle.clone();
            async move { handle.render() }
        }),
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Metrics server listening on http://{}/metrics", addr);

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!(error = %e, "metrics server stopped");
        }
    });

    Ok(())
}

fn register_preview_metrics() {
    describe_counter!(
        "preview_requests_total",
        "Requests that carried a preview token"
    );
    describe_counter!(
        "preview_authorized_total",
        "Preview requests that passed every check"
    );
    describe_counter!(
        "preview_rejected_total",
        "Preview requests silently rejected (label: reason)"
    );
    describe_counter!(
        "preview_adapter_handled_total",
        "Render substitutions committed (label: adapter)"
    );
    describe_counter!(
        "preview_legacy_denials_total",
        "Explicit denials from the legacy verification endpoint (label: status)"
    );
}

/// Increment a counter.
#[inline]
pub fn increment(name: &'static str, count: u64) {
    metrics::counter!(name).increment(count);
}

pub fn record_rejection(reason: &'static str) {
    metrics::counter!("preview_rejected_total", "reason" => reason).increment(1);
}

pub fn record_adapter_handled(adapter: &'static str) {
    metrics::counter!("preview_adapter_handled_total", "adapter" => adapter).increment(1);
}

pub fn record_legacy_denial(status: u16) {
    let status = if status == 403 { "403" } else { "404" };
    metrics::counter!("preview_legacy_denials_total", "status" => status).increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Once;

    static INIT: Once = Once::new();

    fn ensure_metrics_init() {
        INIT.call_once(|| {
            let _ = try_init_metrics();
        });
    }

    #[test]
    fn test_try_init_metrics_idempotent() {
        let handle1 = try_init_metrics();
        let handle2 = try_init_metrics();
        assert!(handle1.is_none() || handle2.is_none());
    }

    #[test]
    fn test_recording_helpers_do_not_panic() {
        ensure_metrics_init();
        increment("preview_requests_total", 1);
        record_rejection("invalid_token");
        record_adapter_handled("default");
        record_legacy_denial(403);
        record_legacy_denial(404);
    }

    #[test]
    fn test_recording_without_recorder_is_a_no_op() {
        // Metrics calls are fire-and-forget whether or not a recorder exists.
        increment("preview_authorized_total", 0);
        record_rejection("missing_token");
    }

    #[test]
    fn test_register_preview_metrics_repeatable() {
        ensure_metrics_init();
        register_preview_metrics();
        register_preview_metrics();
    }
}
