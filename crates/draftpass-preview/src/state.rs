//! Application state shared across all request handlers.

use std::sync::Arc;

use draftpass_core::{
    AdapterBus, BuilderAdapter, PreviewController, PreviewLinks, PreviewResolver, TokenCodec,
};
use moka::future::Cache;
use secrecy::{ExposeSecret, SecretString};

use crate::catalog::Catalog;
use crate::config::Config;

/// Cached published page.
#[derive(Clone, Debug)]
pub struct CachedHtml {
    /// Rendered HTML string.
    pub html: String,
    /// Quoted strong validator for the HTML.
    pub etag: String,
    /// When this entry was cached.
    pub cached_at: chrono::DateTime<chrono::Utc>,
}

/// Published page cache keyed by content id. Previews never enter it.
pub type HtmlCache = Cache<u64, CachedHtml>;

/// Default cache capacity (number of entries).
const DEFAULT_CACHE_CAPACITY: u64 = 10_000;

/// Default cache TTL.
const DEFAULT_CACHE_TTL: std::time::Duration = std::time::Duration::from_secs(300);

/// Shared application state available to all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<Config>,

    /// Content store and preview registrations.
    pub catalog: Arc<Catalog>,

    /// The preview pipeline.
    pub controller: Arc<PreviewController>,

    /// Preview link and permalink builder.
    pub links: Arc<PreviewLinks>,

    /// In-memory cache of rendered published pages.
    pub cache: HtmlCache,
}

impl AppState {
    /// Create a new application state on the wall clock.
    pub fn new(config: Config, catalog: Catalog) -> anyhow::Result<Self> {
        let codec = codec_for(&config);
        Self::with_codec(config, catalog, codec)
    }

    /// Create a new application state with an explicit token codec.
    pub fn with_codec(
        config: Config,
        catalog: Catalog,
        codec: TokenCodec,
    ) -> anyhow::Result<Self> {
        let catalog = Arc::new(catalog);
        let codec = Arc::new(codec);

        let links = PreviewLinks::new(&config.base_url, Arc::clone(&codec))?;

        let resolver = PreviewResolver::new(catalog.clone(), catalog.clone(), codec);
        let builder_present = config.builder_renderer;
        let bus = AdapterBus::with_default(vec![Box::new(BuilderAdapter::new(Arc::new(
            move || builder_present,
        )))]);
        let controller = PreviewController::new(resolver, bus);

        let cache = Cache::builder()
            .max_capacity(DEFAULT_CACHE_CAPACITY)
            .time_to_live(DEFAULT_CACHE_TTL)
            .build();

        tracing::info!(
            cache_capacity = DEFAULT_CACHE_CAPACITY,
            cache_ttl_secs = DEFAULT_CACHE_TTL.as_secs(),
            items = catalog.len(),
            preview_enabled = catalog.enabled_count(),
            "application state initialized"
        );

        Ok(Self {
            config: Arc::new(config),
            catalog,
            controller: Arc::new(controller),
            links: Arc::new(links),
            cache,
        })
    }
}

/// Token codec keyed with the configured secret and lifetime.
pub fn codec_for(config: &Config) -> TokenCodec {
    TokenCodec::new(
        SecretString::from(config.secret.expose_secret()),
        config.expiration,
    )
}


#[cfg(test)]
mod tests {
    use super::fixtures::state;

    #[test]
    fn state_builds_pipeline_from_config() {
        let s = state(true);
        assert_eq!(s.controller.resolver().codec().lifetime().as_secs(), 48 * 3600);
        assert_eq!(s.catalog.len(), 4);
    }

    #[test]
    fn state_rejects_bad_base_url() {
        let mut config = super::fixtures::config(false);
        config.base_url = "not a url".into();
        let result = super::AppState::with_codec(
            config,
            crate::catalog::fixtures::sample(),
            super::fixtures::codec(),
        );
        assert!(result.is_err());
    }
}
