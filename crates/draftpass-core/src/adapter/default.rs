//! Universal fallback adapter.

use super::{AdapterOutcome, PreviewAdapter};
use crate::resolver::AuthorizationContext;
use crate::scope::RequestScope;
use crate::view::DocumentView;

/// Swaps the host's main result for the preview view. Supports every
/// request and always handles, so it must be registered last.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultAdapter;

impl PreviewAdapter for DefaultAdapter {
    fn name(&self) -> &'static str {
        "default"
    }

    fn supports(&self, _ctx: &AuthorizationContext) -> bool {
        true
    }

    fn bootstrap(&self, _ctx: &AuthorizationContext, _scope: &mut RequestScope) {}

    fn finalize(
        &self,
        _ctx: &AuthorizationContext,
        view: &DocumentView,
        scope: &mut RequestScope,
    ) -> AdapterOutcome {
        scope.commit_view(view.clone());
        AdapterOutcome::Handled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentKind;
    use crate::content::fixtures::item;
    use crate::view::DocumentViewFactory;
    use crate::view::fixtures::authorized;

    #[test]
    fn test_default_commits_view() {
        let ctx = authorized(item(11, ContentKind::Attachment, "img"));
        let view = DocumentViewFactory.build(&ctx);
        let mut scope = RequestScope::new();

        assert!(DefaultAdapter.supports(&ctx));
        DefaultAdapter.bootstrap(&ctx, &mut scope);
        assert!(scope.primed_params().is_empty());

        let outcome = DefaultAdapter.finalize(&ctx, &view, &mut scope);
        assert_eq!(outcome, AdapterOutcome::Handled);
        let committed = scope.main_view().unwrap();
        assert_eq!(committed.item(), view.item());
        assert!(committed.is_attachment());
    }
}
