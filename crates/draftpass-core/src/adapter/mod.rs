//! Render substitution adapters.
//!
//! Each adapter can claim the final substitution of the preview view for one
//! rendering subsystem. The [`AdapterBus`] runs them in registration order:
//! every supporting adapter is bootstrapped when the request is detected, and
//! at render time finalize stops at the first adapter that reports
//! [`AdapterOutcome::Handled`].
//!
//! Registration order matters. Specialized adapters go first and
//! [`DefaultAdapter`] goes last; it supports every request and always
//! handles, so a bus ending in it always commits exactly one substitution.

mod builder;
mod default;

pub use builder::{BUILDER_PREVIEW_PARAM, BuilderAdapter, CapabilityProbe};
pub use default::DefaultAdapter;

use crate::metrics;
use crate::resolver::AuthorizationContext;
use crate::scope::RequestScope;
use crate::view::DocumentView;

/// Result of [`PreviewAdapter::finalize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdapterOutcome {
    Handled,
    NotHandled,
}

/// A pluggable render substitution handler.
pub trait PreviewAdapter: Send + Sync {
    /// Stable name for logs and metrics.
    fn name(&self) -> &'static str;

    /// Whether this adapter takes part in the request. Must not mutate.
    fn supports(&self, ctx: &AuthorizationContext) -> bool;

    /// Early priming, before other subsystems capture render state.
    /// Must be idempotent.
    fn bootstrap(&self, ctx: &AuthorizationContext, scope: &mut RequestScope);

    /// Attempts the substitution at render time.
    fn finalize(
        &self,
        ctx: &AuthorizationContext,
        view: &DocumentView,
        scope: &mut RequestScope,
    ) -> AdapterOutcome;
}

/// Ordered chain of adapters.
pub struct AdapterBus {
    adapters: Vec<Box<dyn PreviewAdapter>>,
}

impl AdapterBus {
    /// A bus with exactly these adapters, in this order.
    pub fn new(adapters: Vec<Box<dyn PreviewAdapter>>) -> Self {
        Self { adapters }
    }

    /// `specialized` followed by a [`DefaultAdapter`].
    pub fn with_default(mut specialized: Vec<Box<dyn PreviewAdapter>>) -> Self {
        specialized.push(Box::new(DefaultAdapter));
        Self::new(specialized)
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.adapters.iter().map(|a| a.name()).collect()
    }

    /// Bootstraps every supporting adapter in order. Returns how many ran.
    pub fn bootstrap(&self, ctx: &AuthorizationContext, scope: &mut RequestScope) -> usize {
        let mut ran = 0;
        for adapter in self.adapters.iter().filter(|a| a.supports(ctx)) {
            adapter.bootstrap(ctx, scope);
            tracing::debug!(
                adapter = adapter.name(),
                request_id = %ctx.request_id(),
                "adapter bootstrapped"
            );
            ran += 1;
        }
        ran
    }

    /// Finalizes supporting adapters in order until one handles.
    ///
    /// Returns the name of the handling adapter, or `None` if none did.
    pub fn finalize(
        &self,
        ctx: &AuthorizationContext,
        view: &DocumentView,
        scope: &mut RequestScope,
    ) -> Option<&'static str> {
        for adapter in self.adapters.iter().filter(|a| a.supports(ctx)) {
            if adapter.finalize(ctx, view, scope) == AdapterOutcome::Handled {
                metrics::record_adapter_handled(adapter.name());
                tracing::info!(
                    adapter = adapter.name(),
                    content_id = ctx.content_id(),
                    request_id = %ctx.request_id(),
                    "preview swap handled by adapter"
                );
                return Some(adapter.name());
            }
        }
        None
    }
}

impl std::fmt::Debug for AdapterBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdapterBus")
            .field("adapters", &self.names())
            .finish()
    }
}
