//! Draftpass Preview - content host with shareable draft previews.
//!
//! This crate serves published content from a JSON catalog and hooks the
//! `draftpass-core` pipeline into its request lifecycle, so anyone holding a
//! valid preview link can read an unpublished item without an account.
//!
//! # Architecture
//!
//! - **Catalog**: content items and preview registrations, loaded once
//! - **Routes**: axum handlers that run `on_request_parsed` before the
//!   published lookup and `on_before_render` before output
//! - **Render**: maud templates per document type, markdown via pulldown-cmark
//! - **Cache**: published pages only, in-process moka cache with ETags
//!
//! # Security
//!
//! - All dynamic content is HTML-escaped by maud; raw HTML in markdown is escaped
//! - Strict Content-Security-Policy: no JavaScript execution
//! - Preview responses are `no-store` and `noindex`

pub mod catalog;
pub mod config;
pub mod error;
pub mod render;
pub mod routes;
pub mod state;

pub use catalog::Catalog;
pub use config::Config;
pub use routes::router;
pub use state::AppState;
