//! Per-request mutable state shared by the host and the preview pipeline.
//!
//! The host creates one [`RequestScope`] per request and passes it to both
//! controller phases. Adapters prime it during bootstrap and commit the
//! substituted view into it during finalize.

use std::collections::BTreeMap;

use crate::view::DocumentView;

#[derive(Debug, Default)]
pub struct RequestScope {
    primed: BTreeMap<String, String>,
    main_view: Option<DocumentView>,
    suppress_not_found: bool,
    no_robots: bool,
    no_cache: bool,
}

impl RequestScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a parameter for renderers that read request state.
    pub fn prime(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.primed.insert(key.into(), value.into());
    }

    pub fn primed(&self, key: &str) -> Option<&str> {
        self.primed.get(key).map(String::as_str)
    }

    pub fn primed_params(&self) -> &BTreeMap<String, String> {
        &self.primed
    }

    /// Replaces the host's main result with `view`.
    pub fn commit_view(&mut self, view: DocumentView) {
        self.main_view = Some(view);
    }

    pub fn main_view(&self) -> Option<&DocumentView> {
        self.main_view.as_ref()
    }

    pub fn take_main_view(&mut self) -> Option<DocumentView> {
        self.main_view.take()
    }

    pub fn suppress_not_found(&mut self) {
        self.suppress_not_found = true;
    }

    /// Whether a host "not found" outcome must be overridden.
    ///
    /// A `preempt` already decided elsewhere is left alone.
    pub fn resolve_not_found(&self, preempt: bool) -> bool {
        preempt || self.suppress_not_found
    }

    pub fn is_not_found_suppressed(&self) -> bool {
        self.suppress_not_found
    }

    pub fn mark_no_robots(&mut self) {
        self.no_robots = true;
    }

    pub fn no_robots(&self) -> bool {
        self.no_robots
    }

    pub fn mark_no_cache(&mut self) {
        self.no_cache = true;
    }

    pub fn no_cache(&self) -> bool {
        self.no_cache
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_scope_is_inert() {
        let scope = RequestScope::new();
        assert!(scope.main_view().is_none());
        assert!(!scope.is_not_found_suppressed());
        assert!(!scope.resolve_not_found(false));
        assert!(scope.resolve_not_found(true));
        assert!(!scope.no_robots());
        assert!(!scope.no_cache());
    }

    #[test]
    fn test_primed_params() {
        let mut scope = RequestScope::new();
        scope.prime("builder_preview_id", "42");
        scope.prime("builder_preview_id", "43");
        assert_eq!(scope.primed("builder_preview_id"), Some("43"));
        assert_eq!(scope.primed_params().len(), 1);
        assert_eq!(scope.primed("other"), None);
    }

    #[test]
    fn test_suppression() {
        let mut scope = RequestScope::new();
        scope.suppress_not_found();
        assert!(scope.resolve_not_found(false));
    }
}
