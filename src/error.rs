//! Unified API error model and HTTP mapping.
//! Every handler returns `ApiResult<T>`; conversion impls funnel store
//! failures and body-deserialization rejections into the same taxonomy so
//! the wire shape is uniform: `{"error": "<message>"}`.

use axum::{
    Json,
    extract::rejection::{FormRejection, JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::store::{InvalidRecordId, StoreError};

#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing, malformed, expired or unknown credential. One fixed message
    /// for all of them so a caller cannot probe which case it hit.
    #[error("invalid or missing credentials")]
    Unauthorized,

    #[error("{0}")]
    BadRequest(String),

    /// Request body did not match the declared schema.
    #[error("{0}")]
    Validation(String),

    /// External identifier that does not parse back to an internal record id.
    /// Deliberately distinct from `NotFound`: a malformed id is a client
    /// error, not a failed lookup.
    #[error("Invalid server ID")]
    InvalidIdentifier,

    #[error("{0}")]
    NotFound(String),

    /// Backing store unreachable or erroring. Propagated, never retried here.
    #[error("store failure: {0}")]
    Store(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn http_status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::BadRequest(_) | ApiError::InvalidIdentifier => StatusCode::BAD_REQUEST,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Store(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.http_status();
        let message = match &self {
            ApiError::Store(detail) => {
                tracing::error!("store failure: {detail}");
                "internal server error".to_string()
            }
            ApiError::Internal(detail) => {
                tracing::error!("internal error: {detail}");
                "internal server error".to_string()
            }
            other => other.to_string(),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate(msg) => ApiError::BadRequest(msg),
            StoreError::Backend(msg) => ApiError::Store(msg),
        }
    }
}

impl From<InvalidRecordId> for ApiError {
    fn from(_: InvalidRecordId) -> Self {
        ApiError::InvalidIdentifier
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rej: JsonRejection) -> Self {
        ApiError::Validation(rej.body_text())
    }
}

impl From<FormRejection> for ApiError {
    fn from(rej: FormRejection) -> Self {
        ApiError::Validation(rej.body_text())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
