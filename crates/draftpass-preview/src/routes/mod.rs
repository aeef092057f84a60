//! Route definitions for the content host.
//!
//! ## Routes
//!
//! - `GET /` - Home page; query addressing (`p`, `page_id`, `post_id`, `include`)
//! - `GET /health` - Health check (JSON)
//! - `GET /robots.txt` - Crawler instructions
//! - `GET /preview/verify` - Legacy token verification (JSON, 403/404 denials)
//! - `GET /p/{id}` - Post by id
//! - `GET /page/{id}` - Page by id
//! - `GET /{slug}` - Published permalink
//!
//! Every content route accepts the `_ppp` preview token.

mod health;
mod serve;
mod verify;

use axum::Router;
use axum::response::IntoResponse;
use axum::routing::get;
use draftpass_core::TOKEN_PARAM;

use crate::state::AppState;

/// Build the complete router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(serve::home))
        .route("/health", get(health::health_check))
        .route("/robots.txt", get(robots_txt))
        .route("/preview/verify", get(verify::verify_handler))
        .route("/p/{id}", get(serve::post_by_id))
        .route("/page/{id}", get(serve::page_by_id))
        .route("/{slug}", get(serve::by_slug))
        .with_state(state)
}

/// Serve robots.txt. Published pages are crawlable; the verify endpoint is not.
async fn robots_txt() -> impl IntoResponse {
    (
        [("content-type", "text/plain; charset=utf-8")],
        "User-agent: *\nAllow: /\nDisallow: /preview/\n",
    )
}

/// A raw query string with preview token values masked, for logging.
pub fn redact_token(query: &str) -> String {
    query
        .split('&')
        .map(|pair| match pair.split_once('=') {
            Some((key, _)) if key == TOKEN_PARAM => format!("{key}=[redacted]"),
            _ => pair.to_string(),
        })
        .collect::<Vec<_>>()
        .join("&")
}
