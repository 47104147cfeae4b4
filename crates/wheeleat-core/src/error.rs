use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Errors surfaced to API clients as JSON bodies.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("Method not allowed")]
    MethodNotAllowed,
    #[error("Not found")]
    NotFound,
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn bad_request(detail: impl Into<String>) -> Self {
        ApiError::BadRequest(detail.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        // Validation failures use `detail`; everything else uses `error`.
        let body = match &self {
            ApiError::BadRequest(detail) => json!({ "detail": detail }),
            ApiError::MethodNotAllowed => json!({ "error": "Method not allowed" }),
            ApiError::NotFound => json!({ "error": "Not found" }),
            ApiError::Internal(message) => {
                log::error!("internal error: {}", message);
                json!({ "error": "Internal server error", "message": message })
            }
        };
        (status, Json(body)).into_response()
    }
}
