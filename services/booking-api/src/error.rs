//! Error types for the Booking API service.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use manta_booking_core::{BookingError, EnrollmentError};

/// API error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// API error type
///
/// Booking and enrollment rejections carry their own reason codes and
/// status codes; the API maps them through unchanged.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Member not found")]
    MemberNotFound,

    #[error("Event not found")]
    EventNotFound,

    #[error("Subscription not found")]
    SubscriptionNotFound,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Booking rejected")]
    Booking(#[from] BookingError),

    #[error("Enrollment rejected")]
    Enrollment(#[from] EnrollmentError),

    #[error("Database error")]
    Database(#[from] manta_db::DbError),
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::MemberNotFound | Self::EventNotFound | Self::SubscriptionNotFound => {
                StatusCode::NOT_FOUND
            }
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Booking(e) => {
                StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            Self::Enrollment(e) => {
                StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            Self::Database(manta_db::DbError::CapacityBelowSignups { .. }) => StatusCode::CONFLICT,
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::MemberNotFound => "MEMBER_NOT_FOUND",
            Self::EventNotFound => "EVENT_NOT_FOUND",
            Self::SubscriptionNotFound => "SUBSCRIPTION_NOT_FOUND",
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::Booking(e) => e.error_code(),
            Self::Enrollment(e) => e.error_code(),
            Self::Database(manta_db::DbError::CapacityBelowSignups { .. }) => {
                "CAPACITY_BELOW_SIGNUPS"
            }
            Self::Database(_) => "INTERNAL_ERROR",
        }
    }

    fn message(&self) -> String {
        match self {
            Self::Booking(e) => e.to_string(),
            Self::Enrollment(e) => e.to_string(),
            Self::Database(e @ manta_db::DbError::CapacityBelowSignups { .. }) => e.to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.error_code();

        // Log store faults; policy rejections are expected outcomes
        if status.is_server_error() {
            tracing::error!(error = ?self, "Internal API error");
        }

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.message(),
                details: None,
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_booking_rejections_keep_their_codes() {
        let err = ApiError::from(BookingError::EventFull);
        assert_eq!(err.error_code(), "EVENT_FULL");
        assert_eq!(err.status_code(), StatusCode::CONFLICT);

        let err = ApiError::from(BookingError::CutoffExceeded);
        assert_eq!(err.error_code(), "CUTOFF_EXCEEDED");
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_capacity_shrink_rejection_is_conflict() {
        let err = ApiError::from(manta_db::DbError::CapacityBelowSignups { signups: 8 });
        assert_eq!(err.error_code(), "CAPACITY_BELOW_SIGNUPS");
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert!(err.message().contains('8'));
    }

    #[test]
    fn test_transient_store_maps_to_unavailable() {
        let err = ApiError::from(BookingError::TransientStore("pool closed".to_string()));
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
