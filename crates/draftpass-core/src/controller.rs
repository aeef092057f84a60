//! Wires the pipeline into the host's two request lifecycle points.
//!
//! - [`PreviewController::on_request_parsed`]: the earliest point. Resolves
//!   the request and, when authorized, bootstraps adapters and suppresses the
//!   host's not-found outcome.
//! - [`PreviewController::on_before_render`]: the last point before output.
//!   Builds the document view and runs adapter finalize.
//!
//! A request that does not authorize is left untouched.

use crate::adapter::AdapterBus;
use crate::metrics;
use crate::request::PreviewRequest;
use crate::resolver::{AuthorizationContext, PreviewResolver};
use crate::scope::RequestScope;
use crate::view::DocumentViewFactory;

#[derive(Debug)]
pub struct PreviewController {
    resolver: PreviewResolver,
    factory: DocumentViewFactory,
    bus: AdapterBus,
}

impl PreviewController {
    pub fn new(resolver: PreviewResolver, bus: AdapterBus) -> Self {
        Self {
            resolver,
            factory: DocumentViewFactory,
            bus,
        }
    }

    pub fn resolver(&self) -> &PreviewResolver {
        &self.resolver
    }

    /// Detection phase. Returns the context to carry into the render phase,
    /// or `None` when the request is not an authorized preview.
    pub fn on_request_parsed(
        &self,
        request: &PreviewRequest,
        scope: &mut RequestScope,
    ) -> Option<AuthorizationContext> {
        // Requests without a token are ordinary traffic.
        request.token()?;
        metrics::increment("preview_requests_total", 1);

        let ctx = self.resolver.resolve(request).ok()?;

        self.bus.bootstrap(&ctx, scope);
        scope.suppress_not_found();
        scope.mark_no_robots();

        Some(ctx)
    }

    /// Render phase. Commits the preview view into `scope` and returns the
    /// adapter that handled it.
    pub fn on_before_render(
        &self,
        ctx: &AuthorizationContext,
        scope: &mut RequestScope,
    ) -> Option<&'static str> {
        scope.mark_no_cache();

        let view = self.factory.build(ctx);
        let handled_by = self.bus.finalize(ctx, &view, scope);

        if handled_by.is_none() {
            // Still show the preview when no adapter claimed the swap.
            scope.commit_view(view);
        }

        tracing::info!(
            content_id = ctx.content_id(),
            request_id = %ctx.request_id(),
            adapter_handled = handled_by.unwrap_or("none"),
            "preview pipeline completed"
        );

        handled_by
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use secrecy::SecretString;

    use super::*;
    use crate::adapter::recording::{Journal, Recording};
    use crate::adapter::{AdapterOutcome, BUILDER_PREVIEW_PARAM, BuilderAdapter};
    use crate::content::fixtures::item;
    use crate::content::{ContentKind, EnabledSet, MemoryStore};
    use crate::request::{RouteVars, TOKEN_PARAM};
    use crate::token::{ExpirationHours, FixedClock, TokenCodec, subject_action};

    const T0: i64 = 1_710_000_000;

    fn codec() -> Arc<TokenCodec> {
        Arc::new(
            TokenCodec::new(SecretString::from("ctl"), ExpirationHours::default())
                .with_clock(Arc::new(FixedClock::from_timestamp(T0))),
        )
    }

    fn controller(enabled: &[u64], bus: AdapterBus) -> PreviewController {
        let resolver = PreviewResolver::new(
            Arc::new(MemoryStore::new([item(42, ContentKind::Post, "draft")])),
            Arc::new(EnabledSet::new(enabled.iter().copied())),
            codec(),
        );
        PreviewController::new(resolver, bus)
    }

    fn preview_request(id: u64) -> PreviewRequest {
        let token = codec().create(&subject_action(id));
        PreviewRequest::new(
            [("p".to_string(), id.to_string()), (TOKEN_PARAM.to_string(), token)],
            RouteVars::default(),
        )
    }

    #[test]
    fn test_authorized_request_runs_both_phases() {
        let ctl = controller(&[42], AdapterBus::with_default(vec![]));
        let mut scope = RequestScope::new();

        let ctx = ctl.on_request_parsed(&preview_request(42), &mut scope).unwrap();
        assert!(scope.is_not_found_suppressed());
        assert!(scope.no_robots());
        assert!(scope.main_view().is_none());

        assert_eq!(ctl.on_before_render(&ctx, &mut scope), Some("default"));
        assert!(scope.no_cache());
        assert_eq!(scope.main_view().unwrap().queried_object_id(), 42);
    }

    #[test]
    fn test_rejected_request_leaves_scope_untouched() {
        let ctl = controller(&[], AdapterBus::with_default(vec![]));
        let mut scope = RequestScope::new();

        assert!(ctl.on_request_parsed(&preview_request(42), &mut scope).is_none());
        assert!(!scope.is_not_found_suppressed());
        assert!(!scope.no_robots());
        assert!(scope.primed_params().is_empty());
    }

    #[test]
    fn test_tokenless_request_is_ignored() {
        let ctl = controller(&[42], AdapterBus::with_default(vec![]));
        let req = PreviewRequest::new([("p", "42")], RouteVars::default());
        assert!(ctl.on_request_parsed(&req, &mut RequestScope::new()).is_none());
    }

    #[test]
    fn test_all_bootstraps_precede_any_finalize() {
        let j = Journal::default();
        let bus = AdapterBus::new(vec![
            Recording::boxed("special", true, AdapterOutcome::NotHandled, &j),
            Recording::boxed("default", true, AdapterOutcome::Handled, &j),
        ]);
        let ctl = controller(&[42], bus);
        let mut scope = RequestScope::new();

        let ctx = ctl.on_request_parsed(&preview_request(42), &mut scope).unwrap();
        ctl.on_before_render(&ctx, &mut scope);

        assert_eq!(
            *j.lock().unwrap(),
            vec![
                "bootstrap:special",
                "bootstrap:default",
                "finalize:special",
                "finalize:default",
            ]
        );
    }

    #[test]
    fn test_view_committed_when_no_adapter_handles() {
        let j = Journal::default();
        let bus = AdapterBus::new(vec![Recording::boxed(
            "special",
            true,
            AdapterOutcome::NotHandled,
            &j,
        )]);
        let ctl = controller(&[42], bus);
        let mut scope = RequestScope::new();

        let ctx = ctl.on_request_parsed(&preview_request(42), &mut scope).unwrap();
        assert_eq!(ctl.on_before_render(&ctx, &mut scope), None);
        assert_eq!(scope.main_view().unwrap().queried_object_id(), 42);
    }

    #[test]
    fn test_builder_priming_reaches_scope() {
        let bus = AdapterBus::with_default(vec![Box::new(BuilderAdapter::fixed(true))]);
        let ctl = controller(&[42], bus);
        let mut scope = RequestScope::new();

        ctl.on_request_parsed(&preview_request(42), &mut scope).unwrap();
        assert_eq!(scope.primed(BUILDER_PREVIEW_PARAM), Some("42"));
    }
}
