//! Unified API error mapping.
//!
//! Business-rule violations from the core are caught here and mapped to
//! the HTTP taxonomy; raw internal faults are logged, never leaked.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use faregate_core::{AuthError, PayError, PaymentError, TicketError, UserError};

/// Errors surfaced to API clients.
///
/// Duplicate registration maps to 400 rather than 409, and a non-owner
/// lookup to 403 rather than a masking 404; both follow the published API
/// contract.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthenticated(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Internal(String),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::Conflict(_) => StatusCode::BAD_REQUEST,
            Self::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            Self::Internal(detail) => {
                error!(detail = %detail, "Internal error");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        Self::Unauthenticated(e.to_string())
    }
}

impl From<TicketError> for ApiError {
    fn from(e: TicketError) -> Self {
        match e {
            TicketError::NotFound(_) => Self::NotFound(e.to_string()),
            TicketError::Database(detail) => Self::Internal(detail),
        }
    }
}

impl From<PaymentError> for ApiError {
    fn from(e: PaymentError) -> Self {
        match e {
            PaymentError::NotFound(_) => Self::NotFound(e.to_string()),
            PaymentError::Database(detail) => Self::Internal(detail),
        }
    }
}

impl From<UserError> for ApiError {
    fn from(e: UserError) -> Self {
        match e {
            UserError::NotFound(_) => Self::NotFound(e.to_string()),
            UserError::Conflict(message) => Self::Conflict(message),
            UserError::Database(detail) => Self::Internal(detail),
        }
    }
}

impl From<PayError> for ApiError {
    fn from(e: PayError) -> Self {
        match e {
            PayError::NotFound(_) => Self::NotFound(e.to_string()),
            PayError::Forbidden(_) => Self::Forbidden(e.to_string()),
            PayError::Database(detail) => Self::Internal(detail),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::Validation("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Unauthenticated("x".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::Forbidden("x".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        // Duplicates report 400 per the API contract, not 409.
        assert_eq!(
            ApiError::Conflict("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_internal_detail_not_leaked() {
        let response = ApiError::Internal("sqlite disk I/O error".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_conflict_keeps_store_message() {
        let err = ApiError::from(UserError::Conflict("Username already exists".to_string()));
        assert_eq!(err.to_string(), "Username already exists");
    }

    #[test]
    fn test_forbidden_from_pay_error() {
        let err = ApiError::from(PayError::Forbidden("t-1".to_string()));
        assert!(matches!(err, ApiError::Forbidden(_)));
    }
}
