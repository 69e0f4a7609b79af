/// API error handling
///
/// Every JSON endpoint funnels failures through [`ApiError`], which maps to
/// an HTTP status and a uniform `{"error", "message"}` body. Page routes
/// mostly answer failures with redirects instead; they only reach this type
/// for genuine server-side faults.
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use taskhub_shared::auth::authorization::AccessError;
use taskhub_shared::auth::session::SessionError;

/// Error type for API route handlers
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Malformed or invalid request input
    #[error("{0}")]
    BadRequest(String),

    /// No valid session
    #[error("Authentication required")]
    Unauthorized,

    /// Authenticated but not allowed
    #[error("Access denied")]
    Forbidden,

    /// The referenced resource does not exist
    #[error("{0}")]
    NotFound(String),

    /// A uniqueness rule was violated
    #[error("{0}")]
    Conflict(String),

    /// Unexpected server-side failure
    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

/// JSON body for error responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_kind(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "bad_request",
            ApiError::Unauthorized => "unauthorized",
            ApiError::Forbidden => "forbidden",
            ApiError::NotFound(_) => "not_found",
            ApiError::Conflict(_) => "conflict",
            ApiError::Internal(_) => "internal_error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(ref source) = self {
            tracing::error!(error = %source, "Internal server error");
        }

        let body = ErrorResponse {
            error: self.error_kind().to_string(),
            message: self.to_string(),
        };

        (self.status_code(), Json(body)).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".to_string()),
            sqlx::Error::Database(db_err) if db_err.message().contains("UNIQUE constraint") => {
                ApiError::Conflict("Resource already exists".to_string())
            }
            _ => ApiError::Internal(err.into()),
        }
    }
}

impl From<AccessError> for ApiError {
    fn from(err: AccessError) -> Self {
        match err {
            AccessError::NotFound => ApiError::NotFound("Task not found".to_string()),
            AccessError::Denied => ApiError::Forbidden,
            AccessError::Database(db_err) => db_err.into(),
        }
    }
}

impl From<SessionError> for ApiError {
    fn from(_: SessionError) -> Self {
        ApiError::Unauthorized
    }
}
