//! Single HTTP-boundary error type. Per-adapter error enums (e.g.
//! `BlobStoreError`, `MediaRepositoryError`-style outgoing-port errors)
//! convert into this with `From` impls at the service boundary; nothing
//! downstream of a handler should construct a raw `HttpResponse` for an
//! error path directly.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

use crate::shared::api::ApiResponse;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("unauthorized")]
    Unauthorized,

    #[error("forbidden")]
    Forbidden,

    #[error("not found: {0}")]
    NotFound(String),

    #[error("quota exceeded")]
    QuotaExceeded,

    #[error("storage missing for {0}")]
    StorageMissing(String),

    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::QuotaExceeded => StatusCode::BAD_REQUEST,
            AppError::StorageMissing(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::BadRequest(msg) => ApiResponse::bad_request("BAD_REQUEST", msg),
            AppError::Unauthorized => {
                ApiResponse::unauthorized("UNAUTHORIZED", "authentication required")
            }
            AppError::Forbidden => ApiResponse::forbidden("FORBIDDEN", "permission denied"),
            AppError::NotFound(what) => ApiResponse::not_found("NOT_FOUND", what),
            AppError::QuotaExceeded => {
                ApiResponse::bad_request("QUOTA_EXCEEDED", "upload would exceed storage quota")
            }
            AppError::StorageMissing(what) => ApiResponse::not_found("STORAGE_MISSING", what),
            AppError::Internal(err) => {
                tracing::error!(error = %err, "internal error");
                ApiResponse::internal_error()
            }
        }
    }
}

impl From<sea_orm::DbErr> for AppError {
    fn from(err: sea_orm::DbErr) -> Self {
        AppError::Internal(err.into())
    }
}

pub type AppResult<T> = Result<T, AppError>;
