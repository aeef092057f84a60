//! Health check endpoint.

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::state::AppState;

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    status: &'static str,
    service: &'static str,
    version: &'static str,
    items: usize,
    preview_enabled: usize,
}

/// Public health check endpoint.
///
/// Returns basic service health and catalog size for load balancer probes.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: "draftpass-preview",
        version: env!("CARGO_PKG_VERSION"),
        items: state.catalog.len(),
        preview_enabled: state.catalog.enabled_count(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::fixtures::state;

    #[tokio::test]
    async fn health_reports_catalog() {
        let Json(health) = health_check(State(state(false))).await;
        let json = serde_json::to_value(&health).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["service"], "draftpass-preview");
        assert_eq!(json["items"], 4);
        assert_eq!(json["preview_enabled"], 2);
    }
}
