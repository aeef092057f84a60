//! Legacy verification endpoint.
//!
//! `GET /preview/verify?id=N&_ppp=TOKEN` answers with explicit denials
//! instead of falling through: 403 for a bad token, 404 for an item that is
//! not registered for preview.

use axum::Json;
use axum::extract::{Query, State};
use draftpass_core::request::coerce_id;
use draftpass_core::{PreviewRequest, RouteVars};
use serde::Serialize;

use crate::error::PreviewError;
use crate::state::AppState;

/// Verification result.
#[derive(Debug, Clone, Serialize)]
pub struct VerifyResponse {
    pub content_id: u64,
    /// False only when no content id was given.
    pub preview: bool,
}

pub async fn verify_handler(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<VerifyResponse>, PreviewError> {
    let request = PreviewRequest::new(pairs, RouteVars::default());
    let content_id = request.param("id").map(coerce_id).unwrap_or(0);
    let token = request.token().unwrap_or_default();

    let preview = state
        .controller
        .resolver()
        .verify_legacy(token, content_id)?;

    Ok(Json(VerifyResponse {
        content_id,
        preview,
    }))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use draftpass_core::TOKEN_PARAM;
    use draftpass_core::token::subject_action;

    use super::*;
    use crate::state::fixtures::{codec, state};

    async fn call(pairs: &[(&str, &str)]) -> Result<Json<VerifyResponse>, PreviewError> {
        let pairs = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        verify_handler(State(state(false)), Query(pairs)).await
    }

    #[tokio::test]
    async fn verify_accepts_valid_registered_token() {
        let t = codec().create(&subject_action(42));
        let Json(result) = call(&[("id", "42"), (TOKEN_PARAM, &t)]).await.unwrap();
        assert_eq!(result.content_id, 42);
        assert!(result.preview);
    }

    #[tokio::test]
    async fn verify_without_id_is_false() {
        let Json(result) = call(&[(TOKEN_PARAM, "abc")]).await.unwrap();
        assert!(!result.preview);
    }

    #[tokio::test]
    async fn verify_denies_bad_token_with_403() {
        let err = call(&[("id", "42"), (TOKEN_PARAM, "0000000000")])
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::FORBIDDEN);
        assert_eq!(err.to_string(), "This link has expired!");

        let err = call(&[("id", "42")]).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn verify_denies_unregistered_with_404() {
        let t = codec().create(&subject_action(43));
        let err = call(&[("id", "43"), (TOKEN_PARAM, &t)]).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "No public preview available!");
    }
}
