//! HTTP-facing error type.
//!
//! Every failure a handler can produce is converted into an [`AppError`], which
//! renders as a status code and a flat JSON body:
//!
//! ```json
//! {"error": "CEP não encontrado."}
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Response body for every error status.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{message}")]
    Validation { message: String },
    #[error("{message}")]
    NotFound { message: String },
    #[error("{message}")]
    Internal { message: String },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (AppError::Validation { message }
        | AppError::NotFound { message }
        | AppError::Internal { message }) = self;

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn render(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_validation_renders_400() {
        let (status, body) = render(AppError::bad_request("bad input")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, serde_json::json!({ "error": "bad input" }));
    }

    #[tokio::test]
    async fn test_not_found_renders_404() {
        let (status, body) = render(AppError::not_found("missing")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "missing");
    }

    #[tokio::test]
    async fn test_internal_renders_500() {
        let (status, body) = render(AppError::internal("boom")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "boom");
    }

    #[test]
    fn test_display_is_the_client_message() {
        let err = AppError::internal("Erro interno ao buscar CEP.");
        let source: &dyn std::error::Error = &err;

        assert_eq!(source.to_string(), "Erro interno ao buscar CEP.");
        assert!(source.source().is_none());
    }
}
