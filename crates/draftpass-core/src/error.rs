//! Error types for the draftpass preview pipeline.
//!
//! Two families live here. [`RejectReason`] is the silent path: a preview
//! request that does not authorize simply falls through to normal serving.
//! [`Error`] is everything that is allowed to surface to a caller, including
//! the explicit 403/404 denials of the legacy verification entry point.

use thiserror::Error;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can be reported to a caller.
#[derive(Error, Debug)]
pub enum Error {
    /// The supplied token did not verify for either accepted tick.
    #[error("This link has expired!")]
    LinkExpired,

    /// The content item is not registered for public preview.
    #[error("No public preview available!")]
    PreviewUnavailable,

    /// A configuration value could not be used.
    #[error("invalid config '{field}': {reason}")]
    InvalidConfig {
        /// The name of the offending setting.
        field: &'static str,
        /// Description of what's wrong.
        reason: String,
    },

    /// A link could not be assembled from the configured base URL.
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// HTTP status code a host should answer with for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::LinkExpired => 403,
            Self::PreviewUnavailable => 404,
            _ => 500,
        }
    }
}

/// Resolver stage reached before a request was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Start,
    TokenPresent,
    IdentifierResolved,
    ContentLoaded,
    RegistrationChecked,
}

/// Why a preview request did not authorize.
///
/// These are never shown to the visitor. The controller logs them and lets
/// the request continue through ordinary handling.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    #[error("no preview token on request")]
    MissingToken,

    #[error("no preview content id detected")]
    UnresolvedIdentifier,

    #[error("preview content {id} could not be loaded")]
    ContentNotFound { id: u64 },

    #[error("preview attempted for content {id} without public preview enabled")]
    NotRegistered { id: u64 },

    #[error("preview token invalid for content {id}")]
    InvalidToken { id: u64 },
}

impl RejectReason {
    /// The last state the resolver successfully entered.
    pub fn stage(&self) -> Stage {
        match self {
            Self::MissingToken => Stage::Start,
            Self::UnresolvedIdentifier => Stage::TokenPresent,
            Self::ContentNotFound { .. } => Stage::IdentifierResolved,
            Self::NotRegistered { .. } => Stage::ContentLoaded,
            Self::InvalidToken { .. } => Stage::RegistrationChecked,
        }
    }

    /// Short label used for metrics.
    pub fn label(&self) -> &'static str {
        match self {
            Self::MissingToken => "missing_token",
            Self::UnresolvedIdentifier => "unresolved_identifier",
            Self::ContentNotFound { .. } => "content_not_found",
            Self::NotRegistered { .. } => "not_registered",
            Self::InvalidToken { .. } => "invalid_token",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // Error Display formatting tests
    // =========================================================================

    #[test]
    fn test_link_expired_display() {
        assert_eq!(Error::LinkExpired.to_string(), "This link has expired!");
    }

    #[test]
    fn test_preview_unavailable_display() {
        assert_eq!(
            Error::PreviewUnavailable.to_string(),
            "No public preview available!"
        );
    }

    #[test]
    fn test_invalid_config_display() {
        let err = Error::InvalidConfig {
            field: "secret",
            reason: "must not be empty".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("secret"));
        assert!(msg.contains("must not be empty"));
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(Error::LinkExpired.status_code(), 403);
        assert_eq!(Error::PreviewUnavailable.status_code(), 404);
        let io = Error::Io(std::io::Error::other("disk"));
        assert_eq!(io.status_code(), 500);
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("not valid json").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Json(_)));
        assert!(err.to_string().contains("JSON error"));
    }

    // =========================================================================
    // Reject reasons
    // =========================================================================

    #[test]
    fn test_reject_reason_stages_follow_pipeline_order() {
        assert_eq!(RejectReason::MissingToken.stage(), Stage::Start);
        assert_eq!(
            RejectReason::UnresolvedIdentifier.stage(),
            Stage::TokenPresent
        );
        assert_eq!(
            RejectReason::ContentNotFound { id: 3 }.stage(),
            Stage::IdentifierResolved
        );
        assert_eq!(
            RejectReason::NotRegistered { id: 3 }.stage(),
            Stage::ContentLoaded
        );
        assert_eq!(
            RejectReason::InvalidToken { id: 3 }.stage(),
            Stage::RegistrationChecked
        );
    }

    #[test]
    fn test_reject_reason_display_includes_id() {
        let msg = RejectReason::NotRegistered { id: 42 }.to_string();
        assert!(msg.contains("42"));
        assert_eq!(RejectReason::InvalidToken { id: 1 }.label(), "invalid_token");
    }
}
