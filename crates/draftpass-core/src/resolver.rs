//! Turns a [`PreviewRequest`] into an authorization decision.
//!
//! The resolver walks a fixed sequence of checks: token present, content id
//! resolved, content loaded, registration enabled, token verified. The first
//! failing check ends resolution with a [`RejectReason`] and a warning log;
//! nothing is raised to the caller, so the request can fall back to ordinary
//! serving.

use std::sync::Arc;

use crate::content::{ContentItem, ContentStore, Registry};
use crate::error::{Error, RejectReason, Result};
use crate::metrics;
use crate::request::PreviewRequest;
use crate::token::{TickMatch, TokenCodec, subject_action};

/// Proof that one request passed every preview check.
///
/// Only [`PreviewResolver::resolve`] constructs it. It belongs to the request
/// it was built for and is dropped with it.
#[derive(Debug, Clone)]
pub struct AuthorizationContext {
    item: ContentItem,
    token: String,
    request_id: String,
    matched: TickMatch,
}

impl AuthorizationContext {
    /// The previewed content.
    pub fn item(&self) -> &ContentItem {
        &self.item
    }

    pub fn content_id(&self) -> u64 {
        self.item.id
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    /// Log correlation id. Never used for authorization.
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    pub fn matched_tick(&self) -> TickMatch {
        self.matched
    }
}

/// Outcome of [`PreviewResolver::resolve`].
pub type Resolution = std::result::Result<AuthorizationContext, RejectReason>;

/// Combines the identifier rules, the content store, the registration set and
/// the token codec into a single decision.
#[derive(Clone)]
pub struct PreviewResolver {
    store: Arc<dyn ContentStore>,
    registry: Arc<dyn Registry>,
    codec: Arc<TokenCodec>,
}

impl PreviewResolver {
    pub fn new(
        store: Arc<dyn ContentStore>,
        registry: Arc<dyn Registry>,
        codec: Arc<TokenCodec>,
    ) -> Self {
        Self {
            store,
            registry,
            codec,
        }
    }

    pub fn codec(&self) -> &Arc<TokenCodec> {
        &self.codec
    }

    /// Runs every check in order and stops at the first failure.
    pub fn resolve(&self, request: &PreviewRequest) -> Resolution {
        let result = self.run_checks(request);

        match &result {
            Ok(ctx) => {
                metrics::increment("preview_authorized_total", 1);
                tracing::info!(
                    content_id = ctx.content_id(),
                    request_id = %ctx.request_id(),
                    tick = ctx.matched_tick().as_u8(),
                    "preview context resolved"
                );
            }
            Err(reason) => {
                metrics::record_rejection(reason.label());
                tracing::warn!(
                    reason = reason.label(),
                    stage = ?reason.stage(),
                    "{reason}"
                );
            }
        }

        result
    }

    fn run_checks(&self, request: &PreviewRequest) -> Resolution {
        let token = request.token().ok_or(RejectReason::MissingToken)?;

        let id = request.resolve_content_id();
        if id == 0 {
            return Err(RejectReason::UnresolvedIdentifier);
        }

        let item = self
            .store
            .load_by_id(id)
            .ok_or(RejectReason::ContentNotFound { id })?;

        if !self.registry.is_enabled(id) {
            return Err(RejectReason::NotRegistered { id });
        }

        let matched = self
            .codec
            .verify(token, &subject_action(id))
            .ok_or(RejectReason::InvalidToken { id })?;

        Ok(AuthorizationContext {
            request_id: self.correlation_id(id),
            item,
            token: token.to_string(),
            matched,
        })
    }

    /// Direct verification entry point with visible denials.
    ///
    /// Unlike [`resolve`](Self::resolve) this answers a bad token with
    /// [`Error::LinkExpired`] and an unregistered id with
    /// [`Error::PreviewUnavailable`]. An id of 0 is simply `Ok(false)`.
    pub fn verify_legacy(&self, token: &str, id: u64) -> Result<bool> {
        if id == 0 {
            return Ok(false);
        }

        if self.codec.verify(token, &subject_action(id)).is_none() {
            metrics::record_legacy_denial(403);
            tracing::warn!(content_id = id, "legacy preview check: link expired");
            return Err(Error::LinkExpired);
        }

        if !self.registry.is_enabled(id) {
            metrics::record_legacy_denial(404);
            tracing::warn!(content_id = id, "legacy preview check: no preview available");
            return Err(Error::PreviewUnavailable);
        }

        Ok(true)
    }

    /// `DP-<yyyymmdd-hhmmss>-<id>-<8 hex>`.
    fn correlation_id(&self, id: u64) -> String {
        let stamp = self.codec.clock().now().format("%Y%m%d-%H%M%S");
        let suffix: u32 = rand::random();
        format!("DP-{stamp}-{id}-{suffix:08x}")
    }
}

impl std::fmt::Debug for PreviewResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreviewResolver")
            .field("codec", &self.codec)
            .finish_non_exhaustive()
    }
}
