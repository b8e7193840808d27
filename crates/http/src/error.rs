//! Error handling for the Libris HTTP layer

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use libris_db::StoreError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Body of every non-2xx response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

/// Application error types that map to HTTP responses
#[derive(Error, Debug)]
pub enum AppError {
    #[error("validation error: {message}")]
    Validation {
        fields: Vec<&'static str>,
        code: String,
        message: String,
    },

    #[error("not found: {message}")]
    NotFound { message: String, code: String },

    #[error("bad request: {message}")]
    BadRequest { message: String, code: String },

    #[error("method not allowed: {message}")]
    MethodNotAllowed { message: String, code: String },

    #[error("request timed out")]
    Timeout,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Message returned for every internal failure; details stay in the logs.
    pub const INTERNAL_MESSAGE: &'static str = "Server error";

    /// Create a validation error
    pub fn validation(fields: Vec<&'static str>, message: impl Into<String>) -> Self {
        Self::Validation {
            fields,
            code: "validation_error".to_string(),
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
            code: "not_found".to_string(),
        }
    }

    /// Create a bad request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
            code: "bad_request".to_string(),
        }
    }

    /// Create a method not allowed error
    pub fn method_not_allowed(message: impl Into<String>) -> Self {
        Self::MethodNotAllowed {
            message: message.into(),
            code: "method_not_allowed".to_string(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } | AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Timeout => StatusCode::REQUEST_TIMEOUT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Validation { message, fields } => AppError::validation(fields, message),
            StoreError::NotFound(_) => AppError::not_found("Book not found"),
            StoreError::InvalidIdentifier(_) => AppError::bad_request("Invalid ID"),
            internal @ (StoreError::Io(_) | StoreError::Serde(_)) => {
                AppError::Internal(anyhow::Error::new(internal))
            }
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::bad_request(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let error_id = Uuid::now_v7();
        let status = self.status();

        let (error_code, message) = match self {
            AppError::Validation {
                fields,
                code,
                message,
            } => {
                tracing::warn!(
                    error_id = %error_id,
                    error_code = %code,
                    fields = ?fields,
                    status_code = %status.as_u16(),
                    "Request rejected"
                );
                (code, message)
            }
            AppError::NotFound { message, code }
            | AppError::BadRequest { message, code }
            | AppError::MethodNotAllowed { message, code } => {
                tracing::warn!(
                    error_id = %error_id,
                    error_code = %code,
                    status_code = %status.as_u16(),
                    "Request rejected"
                );
                (code, message)
            }
            AppError::Timeout => {
                tracing::warn!(
                    error_id = %error_id,
                    status_code = %status.as_u16(),
                    "Request timed out"
                );
                ("timeout".to_string(), "Request timed out".to_string())
            }
            AppError::Internal(e) => {
                let detail = format!("{e:#}");
                tracing::error!(
                    error_id = %error_id,
                    error = %detail,
                    status_code = %status.as_u16(),
                    "Request error"
                );
                (
                    "internal_error".to_string(),
                    Self::INTERNAL_MESSAGE.to_string(),
                )
            }
        };

        tracing::debug!(error_id = %error_id, error_code = %error_code, "error response built");

        (status, Json(ErrorBody { message })).into_response()
    }
}
