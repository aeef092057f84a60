//! Error types for the preview host.
//!
//! Errors are rendered as simple HTML error pages rather than JSON,
//! since every route except `/health` serves HTML.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use maud::{DOCTYPE, PreEscaped, html};

use crate::render::components::ERROR_CSS;

/// Host error type.
#[derive(Debug, thiserror::Error)]
pub enum PreviewError {
    /// A preview token failed verification on the legacy endpoint.
    #[error("This link has expired!")]
    LinkExpired,

    /// The item is not registered for public preview.
    #[error("No public preview available!")]
    Unavailable,

    /// Nothing published lives at this address.
    #[error("not found: {0}")]
    NotFound(String),

    /// Internal server error (catalog, rendering, etc.).
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<draftpass_core::Error> for PreviewError {
    fn from(err: draftpass_core::Error) -> Self {
        match err {
            draftpass_core::Error::LinkExpired => Self::LinkExpired,
            draftpass_core::Error::PreviewUnavailable => Self::Unavailable,
            other => Self::Internal(other.into()),
        }
    }
}

impl PreviewError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::LinkExpired => StatusCode::FORBIDDEN,
            Self::Unavailable | Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for PreviewError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (title, message) = match &self {
            Self::LinkExpired => ("Link expired", self.to_string()),
            Self::Unavailable => ("Preview unavailable", self.to_string()),
            Self::NotFound(_) => (
                "Not Found",
                "The page you requested does not exist or is not published yet.".to_string(),
            ),
            Self::Internal(err) => {
                tracing::error!(error = %err, "internal server error");
                (
                    "Internal Error",
                    "An internal error occurred. Please try again later.".to_string(),
                )
            }
        };

        let markup = html! {
            (DOCTYPE)
            html lang="en" {
                head {
                    meta charset="utf-8";
                    meta name="viewport" content="width=device-width, initial-scale=1";
                    title { (title) }
                    meta name="robots" content="noindex";
                    style { (PreEscaped(ERROR_CSS)) }
                }
                body {
                    main class="error-page" {
                        h1 { (title) }
                        p { (message) }
                        a href="/" { "Back to the home page" }
                    }
                }
            }
        };

        (status, markup).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_matches_denial_messages() {
        assert_eq!(PreviewError::LinkExpired.to_string(), "This link has expired!");
        assert_eq!(
            PreviewError::Unavailable.to_string(),
            "No public preview available!"
        );
        assert_eq!(
            PreviewError::NotFound("/nope".into()).to_string(),
            "not found: /nope"
        );
    }

    #[test]
    fn error_from_core_error() {
        assert!(matches!(
            PreviewError::from(draftpass_core::Error::LinkExpired),
            PreviewError::LinkExpired
        ));
        assert!(matches!(
            PreviewError::from(draftpass_core::Error::PreviewUnavailable),
            PreviewError::Unavailable
        ));
        let io = std::io::Error::other("disk");
        assert!(matches!(
            PreviewError::from(draftpass_core::Error::Io(io)),
            PreviewError::Internal(_)
        ));
    }

    #[test]
    fn error_into_response_status() {
        assert_eq!(
            PreviewError::LinkExpired.into_response().status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            PreviewError::Unavailable.into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            PreviewError::NotFound("x".into()).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            PreviewError::Internal(anyhow::anyhow!("boom"))
                .into_response()
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
