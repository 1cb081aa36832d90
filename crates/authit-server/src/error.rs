use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use authit_core::error::{StoreError, ValidationError};

/// Errors the ingestion endpoints map to HTTP responses.
///
/// The [`IntoResponse`] impl renders the JSON body used by the lead endpoint.
/// The visit endpoint answers in plain text; wrap the error in [`PlainError`].
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("method not allowed")]
    MethodNotAllowed,

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Log store failures with full detail. Validation and method errors are
    /// caller mistakes and are not logged.
    fn log(&self) {
        if let AppError::Store(e) = self {
            tracing::error!(error = %e, "Store operation failed");
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.log();
        let message = match &self {
            AppError::Validation(ValidationError::InvalidEmail) => "Invalid email",
            AppError::Validation(ValidationError::InvalidPage) => "Invalid page",
            AppError::MethodNotAllowed => "Method Not Allowed",
            AppError::Store(_) => "Internal Server Error",
        };
        (self.status(), Json(json!({ "error": message }))).into_response()
    }
}

/// Plain-text rendering of [`AppError`].
#[derive(Debug)]
pub struct PlainError(pub AppError);

impl From<AppError> for PlainError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<ValidationError> for PlainError {
    fn from(err: ValidationError) -> Self {
        Self(AppError::Validation(err))
    }
}

impl From<StoreError> for PlainError {
    fn from(err: StoreError) -> Self {
        Self(AppError::Store(err))
    }
}

impl IntoResponse for PlainError {
    fn into_response(self) -> Response {
        let PlainError(err) = self;
        err.log();
        let body = match &err {
            AppError::Validation(ValidationError::InvalidEmail) => "Invalid email",
            AppError::Validation(ValidationError::InvalidPage) => "Invalid page",
            AppError::MethodNotAllowed => "Method Not Allowed",
            AppError::Store(_) => "Error",
        };
        (err.status(), body).into_response()
    }
}
