//! Application configuration loaded from environment variables.

use std::path::PathBuf;

use anyhow::Context;
use draftpass_core::ExpirationHours;
use secrecy::SecretString;

/// Application configuration.
#[derive(Debug)]
pub struct Config {
    /// Server bind address (e.g., "0.0.0.0:8082").
    pub bind_addr: String,

    /// Process-wide token secret.
    pub secret: SecretString,

    /// Token lifetime option.
    pub expiration: ExpirationHours,

    /// Home URL of the site, used for preview links and permalinks.
    /// e.g., "https://blog.example.org"
    pub base_url: String,

    /// Site name shown in page titles and the footer.
    pub site_name: String,

    /// Path of the JSON content catalog.
    pub catalog_path: PathBuf,

    /// Whether the page-builder renderer is installed.
    pub builder_renderer: bool,

    /// Port for the Prometheus endpoint; disabled when unset.
    pub metrics_port: Option<u16>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required:
    /// - `DRAFTPASS_SECRET`: Token secret
    ///
    /// Optional:
    /// - `DRAFTPASS_BIND_ADDR`: Server bind address (default: "0.0.0.0:8082")
    /// - `DRAFTPASS_EXPIRATION_HOURS`: Token lifetime in hours (default: 48)
    /// - `DRAFTPASS_BASE_URL`: Home URL (default: "http://localhost:8082")
    /// - `DRAFTPASS_SITE_NAME`: Site name (default: "Draftpass")
    /// - `DRAFTPASS_CATALOG`: Catalog path (default: "catalog.json")
    /// - `DRAFTPASS_BUILDER_RENDERER`: "true"/"1"/"yes"/"on" enables the builder adapter
    /// - `DRAFTPASS_METRICS_PORT`: Prometheus port
    pub fn from_env() -> anyhow::Result<Self> {
        let bind_addr =
            std::env::var("DRAFTPASS_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8082".to_string());

        let secret = std::env::var("DRAFTPASS_SECRET")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .context("DRAFTPASS_SECRET must be set")?;

        let expiration =
            ExpirationHours::parse(std::env::var("DRAFTPASS_EXPIRATION_HOURS").ok().as_deref());

        let base_url = std::env::var("DRAFTPASS_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:8082".to_string())
            .trim_end_matches('/')
            .to_string();

        let site_name =
            std::env::var("DRAFTPASS_SITE_NAME").unwrap_or_else(|_| "Draftpass".to_string());

        let catalog_path: PathBuf = std::env::var("DRAFTPASS_CATALOG")
            .unwrap_or_else(|_| "catalog.json".to_string())
            .into();

        let builder_renderer = std::env::var("DRAFTPASS_BUILDER_RENDERER")
            .map(|v| parse_flag(&v))
            .unwrap_or(false);

        let metrics_port = match std::env::var("DRAFTPASS_METRICS_PORT") {
            Ok(raw) if !raw.trim().is_empty() => Some(
                raw.trim()
                    .parse::<u16>()
                    .with_context(|| format!("invalid DRAFTPASS_METRICS_PORT: {raw}"))?,
            ),
            _ => None,
        };

        tracing::info!(
            bind_addr = %bind_addr,
            base_url = %base_url,
            site_name = %site_name,
            catalog = %catalog_path.display(),
            expiration_hours = expiration.hours(),
            builder_renderer,
            metrics_port = ?metrics_port,
            "configuration loaded"
        );

        Ok(Self {
            bind_addr,
            secret: SecretString::from(secret),
            expiration,
            base_url,
            site_name,
            catalog_path,
            builder_renderer,
            metrics_port,
        })
    }
}

fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
