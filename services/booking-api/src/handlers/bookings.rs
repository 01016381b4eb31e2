//! Booking handlers
//!
//! The write path of the service. Handlers validate identifiers and hand the
//! decision to the engine; every rejection comes back with a stable reason
//! code that is surfaced verbatim.

use std::time::Instant;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use manta_db::SignupRepository;
use manta_types::Signup;

use crate::error::{ApiError, ApiResult};
use crate::handlers::events::parse_event_id;
use crate::handlers::members::parse_member_id;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateSignupRequest {
    pub member_id: String,
}

#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub id: String,
    pub member_id: String,
    pub event_id: String,
    pub created_at: DateTime<Utc>,
}

impl From<Signup> for SignupResponse {
    fn from(signup: Signup) -> Self {
        Self {
            id: signup.id.to_string(),
            member_id: signup.member_id.to_string(),
            event_id: signup.event_id.to_string(),
            created_at: signup.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SignupListResponse {
    pub signups: Vec<SignupResponse>,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/v1/events/{id}/signups
pub async fn create_signup(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<CreateSignupRequest>,
) -> ApiResult<(StatusCode, Json<SignupResponse>)> {
    let start = Instant::now();

    let event_id = parse_event_id(&id)?;
    let member_id = parse_member_id(&req.member_id)?;

    let result = state.booking.book(member_id, event_id, Utc::now()).await;

    match result {
        Ok(signup) => {
            metrics::counter!("booking_signups_created_total").increment(1);
            metrics::histogram!("booking_operation_duration_seconds", "operation" => "book")
                .record(start.elapsed().as_secs_f64());

            tracing::info!(member_id = %member_id, event_id = %event_id, "Signup created");
            Ok((StatusCode::CREATED, Json(signup.into())))
        }
        Err(err) => {
            metrics::counter!(
                "booking_rejections_total",
                "operation" => "book",
                "reason" => err.error_code()
            )
            .increment(1);
            metrics::histogram!("booking_operation_duration_seconds", "operation" => "book")
                .record(start.elapsed().as_secs_f64());

            Err(ApiError::from(err))
        }
    }
}

/// DELETE /api/v1/events/{id}/signups/{member_id}
pub async fn delete_signup(
    State(state): State<AppState>,
    Path((id, member)): Path<(String, String)>,
) -> ApiResult<StatusCode> {
    let start = Instant::now();

    let event_id = parse_event_id(&id)?;
    let member_id = parse_member_id(&member)?;

    let result = state.booking.cancel(member_id, event_id, Utc::now()).await;

    match result {
        Ok(()) => {
            metrics::counter!("booking_signups_cancelled_total").increment(1);
            metrics::histogram!("booking_operation_duration_seconds", "operation" => "cancel")
                .record(start.elapsed().as_secs_f64());

            tracing::info!(member_id = %member_id, event_id = %event_id, "Signup cancelled");
            Ok(StatusCode::NO_CONTENT)
        }
        Err(err) => {
            metrics::counter!(
                "booking_rejections_total",
                "operation" => "cancel",
                "reason" => err.error_code()
            )
            .increment(1);

            Err(ApiError::from(err))
        }
    }
}

/// GET /api/v1/members/{id}/signups
pub async fn list_member_signups(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<SignupListResponse>> {
    let member_id = parse_member_id(&id)?;

    let rows = state
        .repos
        .signups
        .find_by_member(member_id.0)
        .await?;

    let signups = rows.into_iter().map(|row| Signup::from(row).into()).collect();
    Ok(Json(SignupListResponse { signups }))
}
