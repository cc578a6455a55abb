//! Request-level error taxonomy and its HTTP mapping.
//!
//! Every failure leaves the server as `{"error": "<message>"}` plus a status
//! code. Underlying causes are logged where they happen, never echoed.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid signature")]
    InvalidSignature,

    #[error("{0}")]
    Validation(&'static str),

    #[error("Server not initialized")]
    Uninitialized,

    #[error("Failed to send message")]
    Delivery,

    #[error("Not Found")]
    NotFound,

    #[error("Method Not Allowed")]
    MethodNotAllowed,

    #[error("Internal Server Error")]
    Internal,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidSignature | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Uninitialized | Self::Delivery | Self::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (
            self.status(),
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(AppError::InvalidSignature.status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::Validation("x").status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::Uninitialized.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(AppError::Delivery.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(AppError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::MethodNotAllowed.status(),
            StatusCode::METHOD_NOT_ALLOWED
        );
    }

    #[test]
    fn test_messages() {
        assert_eq!(AppError::Uninitialized.to_string(), "Server not initialized");
        assert_eq!(AppError::NotFound.to_string(), "Not Found");
        assert_eq!(
            AppError::Validation("group_id and message are required").to_string(),
            "group_id and message are required"
        );
    }
}
