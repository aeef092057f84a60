//! Adapter for the page-builder renderer.
//!
//! The builder captures its own render state early and looks for the
//! previewed id in request parameters, so this adapter only primes that
//! parameter and leaves the actual swap to the default adapter.

use std::sync::Arc;

use super::{AdapterOutcome, PreviewAdapter};
use crate::resolver::AuthorizationContext;
use crate::scope::RequestScope;
use crate::view::DocumentView;

/// Request parameter the builder reads the previewed id from.
pub const BUILDER_PREVIEW_PARAM: &str = "builder_preview_id";

/// Reports whether an optional rendering subsystem is present.
pub type CapabilityProbe = Arc<dyn Fn() -> bool + Send + Sync>;

pub struct BuilderAdapter {
    probe: CapabilityProbe,
}

impl BuilderAdapter {
    pub fn new(probe: CapabilityProbe) -> Self {
        Self { probe }
    }

    /// Adapter whose probe always answers `present`.
    pub fn fixed(present: bool) -> Self {
        Self::new(Arc::new(move || present))
    }
}

impl PreviewAdapter for BuilderAdapter {
    fn name(&self) -> &'static str {
        "builder"
    }

    fn supports(&self, _ctx: &AuthorizationContext) -> bool {
        (self.probe)()
    }

    fn bootstrap(&self, ctx: &AuthorizationContext, scope: &mut RequestScope) {
        scope.prime(BUILDER_PREVIEW_PARAM, ctx.content_id().to_string());
    }

    fn finalize(
        &self,
        _ctx: &AuthorizationContext,
        _view: &DocumentView,
        _scope: &mut RequestScope,
    ) -> AdapterOutcome {
        AdapterOutcome::NotHandled
    }
}

impl std::fmt::Debug for BuilderAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuilderAdapter").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use super::*;
    use crate::adapter::AdapterBus;
    use crate::content::ContentKind;
    use crate::content::fixtures::item;
    use crate::view::DocumentViewFactory;
    use crate::view::fixtures::authorized;

    #[test]
    fn test_supports_follows_probe() {
        let ctx = authorized(item(4, ContentKind::Post, "x"));
        assert!(BuilderAdapter::fixed(true).supports(&ctx));
        assert!(!BuilderAdapter::fixed(false).supports(&ctx));

        let flag = Arc::new(AtomicBool::new(false));
        let probe_flag = Arc::clone(&flag);
        let adapter = BuilderAdapter::new(Arc::new(move || probe_flag.load(Ordering::SeqCst)));
        assert!(!adapter.supports(&ctx));
        flag.store(true, Ordering::SeqCst);
        assert!(adapter.supports(&ctx));
    }

    #[test]
    fn test_bootstrap_primes_id_idempotently() {
        let ctx = authorized(item(4, ContentKind::Post, "x"));
        let mut scope = RequestScope::new();
        let adapter = BuilderAdapter::fixed(true);
        adapter.bootstrap(&ctx, &mut scope);
        adapter.bootstrap(&ctx, &mut scope);
        assert_eq!(scope.primed(BUILDER_PREVIEW_PARAM), Some("4"));
        assert_eq!(scope.primed_params().len(), 1);
    }

    #[test]
    fn test_defers_swap_to_default() {
        let ctx = authorized(item(4, ContentKind::Post, "x"));
        let view = DocumentViewFactory.build(&ctx);
        let mut scope = RequestScope::new();
        assert_eq!(
            BuilderAdapter::fixed(true).finalize(&ctx, &view, &mut scope),
            AdapterOutcome::NotHandled
        );

        let bus = AdapterBus::with_default(vec![Box::new(BuilderAdapter::fixed(true))]);
        bus.bootstrap(&ctx, &mut scope);
        assert_eq!(bus.finalize(&ctx, &view, &mut scope), Some("default"));
        assert_eq!(scope.primed(BUILDER_PREVIEW_PARAM), Some("4"));
    }
}
