//! HTTP error mapping

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use crate::Error;

/// Result type for handlers
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Body of every message-only response, errors included
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

/// Errors a handler can answer with
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Body missing, not a JSON object, or lacking a required key
    #[error("Invalid data")]
    InvalidData,

    /// A key or value the entity cannot accept
    #[error("Invalid data: {0}")]
    InvalidField(String),

    /// No entity with the requested id
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Storage failure while writing; the unit of work was rolled back
    #[error("Error {action} {entity}: {source}")]
    Persistence {
        action: &'static str,
        entity: String,
        source: Error,
    },

    /// Storage failure outside a write
    #[error("{0}")]
    Internal(#[from] Error),
}

impl ApiError {
    /// Wrap an error raised by a mutating manager call.
    ///
    /// `action` is the verb in progressive form ("creating", "updating").
    pub fn write(action: &'static str, label: &str, err: Error) -> Self {
        match err {
            Error::UnknownField { .. } | Error::InvalidField { .. } => {
                ApiError::InvalidField(err.to_string())
            }
            other => ApiError::Persistence {
                action,
                entity: label.to_lowercase(),
                source: other,
            },
        }
    }

    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidData | ApiError::InvalidField(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Persistence { .. } | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::warn!("Request failed: {}", self);
        }
        (status, Json(MessageResponse::new(self.to_string()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::InvalidData.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::NotFound("Product").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::Internal(Error::Storage(rusqlite::Error::InvalidQuery)).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_messages() {
        assert_eq!(ApiError::NotFound("Order").to_string(), "Order not found");
        assert_eq!(ApiError::InvalidData.to_string(), "Invalid data");
    }

    #[test]
    fn test_write_classifies_field_errors_as_bad_request() {
        let err = ApiError::write(
            "updating",
            "Product",
            Error::UnknownField { entity: "Product", field: "colour".into() },
        );
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Invalid data: Unknown field 'colour' for Product");

        let err = ApiError::write(
            "creating",
            "Product",
            Error::Storage(rusqlite::Error::InvalidQuery),
        );
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.to_string().starts_with("Error creating product: "));
    }
}
