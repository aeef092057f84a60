//! Content serving with the preview pipeline hooked in.
//!
//! Every content route runs the same sequence:
//! 1. Build a [`PreviewRequest`] from the query string and route variables
//! 2. `on_request_parsed`: detect and authorize a preview
//! 3. Look the address up among published items (the ordinary path)
//! 4. For an authorized preview, `on_before_render` commits the preview
//!    view, which is rendered instead of the ordinary result
//! 5. Otherwise serve the published item, the index, or a 404
//!
//! Published pages go through the in-process cache and carry an ETag.
//! Previews are never cached.

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use draftpass_core::adapter::BUILDER_PREVIEW_PARAM;
use draftpass_core::{ContentItem, DocumentView, PreviewRequest, RequestScope, RouteVars};

use crate::error::PreviewError;
use crate::render::{self, PageMeta, components::CSP_HEADER, document::display_title};
use crate::state::{AppState, CachedHtml};

/// Raw query pairs in request order, duplicates included.
type QueryPairs = Query<Vec<(String, String)>>;

/// Query parameter holding the comma-separated id-in-set filter.
const INCLUDE_PARAM: &str = "include";

const PREVIEW_CACHE_CONTROL: &str = "no-cache, must-revalidate, max-age=0, no-store, private";
const PUBLISHED_CACHE_CONTROL: &str = "public, max-age=60, s-maxage=300, stale-while-revalidate=60";

const X_ROBOTS_TAG: &str = "x-robots-tag";

/// `GET /`: query-string addressing (`p`, `page_id`, `post_id`, `include`).
pub async fn home(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(pairs): QueryPairs,
) -> Result<Response, PreviewError> {
    serve(&state, &headers, pairs, RouteVars::default(), None).await
}

/// `GET /p/{id}`.
pub async fn post_by_id(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Query(pairs): QueryPairs,
) -> Result<Response, PreviewError> {
    let route = RouteVars {
        p: Some(id),
        ..RouteVars::default()
    };
    serve(&state, &headers, pairs, route, None).await
}

/// `GET /page/{id}`.
pub async fn page_by_id(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Query(pairs): QueryPairs,
) -> Result<Response, PreviewError> {
    let route = RouteVars {
        page_id: Some(id),
        ..RouteVars::default()
    };
    serve(&state, &headers, pairs, route, None).await
}

/// `GET /{slug}`: published permalinks.
pub async fn by_slug(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(slug): Path<String>,
    Query(pairs): QueryPairs,
) -> Result<Response, PreviewError> {
    serve(&state, &headers, pairs, RouteVars::default(), Some(slug)).await
}

async fn serve(
    state: &AppState,
    request_headers: &HeaderMap,
    pairs: Vec<(String, String)>,
    mut route: RouteVars,
    slug: Option<String>,
) -> Result<Response, PreviewError> {
    route.id_in_set = include_filter(&pairs);
    let request = PreviewRequest::new(pairs, route);
    let mut scope = RequestScope::new();

    let preview = state.controller.on_request_parsed(&request, &mut scope);

    let addressed_id = request.resolve_content_id();
    let published = match slug.as_deref() {
        Some(slug) => state.catalog.published_by_slug(slug.trim()),
        None if addressed_id > 0 => state.catalog.published_by_id(addressed_id),
        None => None,
    };

    if let Some(ctx) = preview {
        if ctx.item().status.is_published() {
            let location = state.links.permalink(ctx.item());
            tracing::info!(
                content_id = ctx.content_id(),
                request_id = %ctx.request_id(),
                location = %location,
                "previewed item is published, redirecting"
            );
            return Ok(redirect_permanent(&location));
        }

        state.controller.on_before_render(&ctx, &mut scope);
        if let Some(view) = scope.take_main_view() {
            return Ok(preview_response(state, &view, &scope));
        }
    }

    match published {
        Some(item) => Ok(published_response(state, request_headers, item).await),
        None if slug.is_none() && addressed_id == 0 => Ok(index_response(state)),
        None if scope.resolve_not_found(false) => Err(PreviewError::Internal(anyhow::anyhow!(
            "not-found suppressed but no preview view committed"
        ))),
        None => Err(PreviewError::NotFound(match slug {
            Some(slug) => format!("/{slug}"),
            None => format!("content {addressed_id}"),
        })),
    }
}

/// The last `include` parameter, split on commas.
fn include_filter(pairs: &[(String, String)]) -> Vec<String> {
    pairs
        .iter()
        .rev()
        .find(|(key, _)| key == INCLUDE_PARAM)
        .map(|(_, value)| {
            value
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn preview_response(state: &AppState, view: &DocumentView, scope: &RequestScope) -> Response {
    let canonical = state.links.permalink(view.item());
    let meta = PageMeta {
        site_name: &state.config.site_name,
        canonical_url: &canonical,
        noindex: scope.no_robots(),
        builder_preview_id: scope.primed(BUILDER_PREVIEW_PARAM),
    };
    let html = render::render_view(view, &meta).into_string();

    let mut headers = security_headers();
    if scope.no_cache() {
        headers.insert(
            header::CACHE_CONTROL,
            HeaderValue::from_static(PREVIEW_CACHE_CONTROL),
        );
        headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
    }
    if scope.no_robots() {
        headers.insert(
            HeaderName::from_static(X_ROBOTS_TAG),
            HeaderValue::from_static("noindex"),
        );
    }

    (StatusCode::OK, headers, html).into_response()
}

async fn published_response(
    state: &AppState,
    request_headers: &HeaderMap,
    item: ContentItem,
) -> Response {
    let cached = match state.cache.get(&item.id).await {
        Some(hit) => {
            tracing::debug!(content_id = item.id, "cache hit");
            hit
        }
        None => {
            tracing::debug!(content_id = item.id, "cache miss, rendering");
            let canonical = state.links.permalink(&item);
            let meta = PageMeta {
                site_name: &state.config.site_name,
                canonical_url: &canonical,
                noindex: false,
                builder_preview_id: None,
            };
            let html = render::render_published(&item, &meta).into_string();
            let entry = CachedHtml {
                etag: etag_for(&html),
                html,
                cached_at: chrono::Utc::now(),
            };
            state.cache.insert(item.id, entry.clone()).await;
            entry
        }
    };

    let mut headers = security_headers();
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static(PUBLISHED_CACHE_CONTROL),
    );
    if let Ok(val) = HeaderValue::from_str(&cached.etag) {
        headers.insert(header::ETAG, val);
    }

    if etag_matches(request_headers, &cached.etag) {
        return (StatusCode::NOT_MODIFIED, headers).into_response();
    }

    (StatusCode::OK, headers, cached.html).into_response()
}

fn index_response(state: &AppState) -> Response {
    let entries: Vec<(String, String)> = state
        .catalog
        .published()
        .iter()
        .map(|item| (display_title(item), state.links.permalink(item)))
        .collect();

    let home = format!("{}/", state.config.base_url);
    let meta = PageMeta {
        site_name: &state.config.site_name,
        canonical_url: &home,
        noindex: false,
        builder_preview_id: None,
    };
    let html = render::render_index(&entries, &meta).into_string();

    let mut headers = security_headers();
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static(PUBLISHED_CACHE_CONTROL),
    );
    (StatusCode::OK, headers, html).into_response()
}

/// 301 to `location`.
fn redirect_permanent(location: &str) -> Response {
    match HeaderValue::from_str(location) {
        Ok(val) => (StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, val)]).into_response(),
        Err(_) => PreviewError::Internal(anyhow::anyhow!("invalid redirect target: {location}"))
            .into_response(),
    }
}

fn security_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/html; charset=utf-8"),
    );
    headers.insert(
        header::CONTENT_SECURITY_POLICY,
        HeaderValue::from_static(CSP_HEADER),
    );
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers
}

/// Quoted xxh3 hash of the page.
fn etag_for(html: &str) -> String {
    let hash = xxhash_rust::xxh3::xxh3_64(html.as_bytes());
    format!("\"{}\"", hex::encode(hash.to_be_bytes()))
}

fn etag_matches(request_headers: &HeaderMap, etag: &str) -> bool {
    request_headers
        .get(header::IF_NONE_MATCH)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.split(',').map(str::trim).any(|t| t == etag || t == "*"))
}
