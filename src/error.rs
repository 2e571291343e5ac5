use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// ApiError
///
/// The single error type surfaced by handlers and the repository layer.
/// Each variant maps to one class of the failure taxonomy: authentication,
/// authorization, validation, not-found, upstream collaborator, database.
/// No variant is fatal to the process; every request resolves to a response.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request carried no valid session (bad/expired link or token).
    #[error("{0}")]
    Unauthorized(String),

    /// The session is valid but the account lacks the required flags.
    #[error("{0}")]
    Forbidden(String),

    /// The request payload failed a required-field or reference check.
    #[error("{0}")]
    Validation(String),

    /// The targeted row does not exist (or was deleted concurrently).
    #[error("not found")]
    NotFound,

    /// The storage or auth collaborator could not be reached or rejected the call.
    #[error("upstream service failure: {0}")]
    Upstream(String),

    /// The data store reported an unexpected failure.
    #[error("database failure: {0}")]
    Database(String),
}

/// ErrorBody
///
/// The JSON shape of every error response: `{"error": "<reason>"}`.
/// Kept deliberately flat so the frontend can surface the reason verbatim.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

impl ApiError {
    /// The HTTP status this error renders as.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Database details stay in the logs; the client gets a generic reason.
        let reason = match &self {
            ApiError::Database(detail) => {
                tracing::error!("database failure: {}", detail);
                "internal error".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(ErrorBody { error: reason })).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    /// Maps store-level failures onto the taxonomy. Foreign-key violations
    /// surface as validation failures (the referenced subject is gone),
    /// unique violations as duplicate-row validation failures.
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => ApiError::NotFound,
            sqlx::Error::Database(db) => match db.code().as_deref() {
                // 23503: foreign_key_violation — the parent subject does not exist.
                Some("23503") => {
                    ApiError::Validation("referenced subject does not exist".to_string())
                }
                // 23505: unique_violation — duplicate row (e.g., email already registered).
                Some("23505") => ApiError::Validation("row already exists".to_string()),
                _ => ApiError::Database(err.to_string()),
            },
            _ => ApiError::Database(err.to_string()),
        }
    }
}

impl From<crate::authz::AccessDenied> for ApiError {
    fn from(denied: crate::authz::AccessDenied) -> Self {
        ApiError::Forbidden(denied.reason().to_string())
    }
}
