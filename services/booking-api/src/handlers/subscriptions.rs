//! Subscription handlers

use std::time::Instant;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use manta_booking_core::TierGrant;
use manta_db::SubscriptionRepository;
use manta_types::{Subscription, SubscriptionId, Tier};

use crate::error::{ApiError, ApiResult};
use crate::handlers::members::parse_member_id;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateSubscriptionRequest {
    pub member_id: String,
    pub starts_on: NaiveDate,
    pub ends_on: NaiveDate,
    pub amount_cents: i64,
    pub currency: String,
    pub entries: i32,
}

#[derive(Debug, Deserialize)]
pub struct ActivateSubscriptionRequest {
    pub tier: Tier,
    /// Optional grant window override; defaults to the subscription's window
    pub valid_from: Option<NaiveDate>,
    pub valid_to: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct SubscriptionResponse {
    pub id: String,
    pub member_id: String,
    pub starts_on: NaiveDate,
    pub ends_on: NaiveDate,
    pub amount_cents: i64,
    pub currency: String,
    pub entries_left: i32,
    pub status: String,
}

impl From<Subscription> for SubscriptionResponse {
    fn from(sub: Subscription) -> Self {
        Self {
            id: sub.id.to_string(),
            member_id: sub.member_id.to_string(),
            starts_on: sub.starts_on,
            ends_on: sub.ends_on,
            amount_cents: sub.amount_cents,
            currency: sub.currency,
            entries_left: sub.entries_left,
            status: sub.status.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SubscriptionListResponse {
    pub subscriptions: Vec<SubscriptionResponse>,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/v1/subscriptions
pub async fn create_subscription(
    State(state): State<AppState>,
    Json(req): Json<CreateSubscriptionRequest>,
) -> ApiResult<(StatusCode, Json<SubscriptionResponse>)> {
    let start = Instant::now();

    let member_id = parse_member_id(&req.member_id)?;

    if req.ends_on <= req.starts_on {
        return Err(ApiError::BadRequest(
            "ends_on must be after starts_on".to_string(),
        ));
    }
    if req.entries < 0 {
        return Err(ApiError::BadRequest(
            "entries cannot be negative".to_string(),
        ));
    }
    if req.currency.len() != 3 {
        return Err(ApiError::BadRequest(
            "currency must be a 3-letter code".to_string(),
        ));
    }

    let sub = state
        .booking
        .create_subscription(
            member_id,
            req.starts_on,
            req.ends_on,
            req.amount_cents,
            req.currency.to_uppercase(),
            req.entries,
        )
        .await?;

    metrics::counter!("booking_subscriptions_created_total").increment(1);
    metrics::histogram!(
        "booking_operation_duration_seconds",
        "operation" => "create_subscription"
    )
    .record(start.elapsed().as_secs_f64());

    tracing::info!(member_id = %member_id, subscription_id = %sub.id, "Subscription created");

    Ok((StatusCode::CREATED, Json(sub.into())))
}

/// POST /api/v1/subscriptions/{id}/activate
pub async fn activate_subscription(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ActivateSubscriptionRequest>,
) -> ApiResult<Json<SubscriptionResponse>> {
    let start = Instant::now();

    let subscription_id = SubscriptionId::parse(&id)
        .map_err(|_| ApiError::BadRequest("Invalid subscription id".to_string()))?;

    let mut grant = TierGrant::new(req.tier);
    if let (Some(from), Some(to)) = (req.valid_from, req.valid_to) {
        if to <= from {
            return Err(ApiError::BadRequest(
                "valid_to must be after valid_from".to_string(),
            ));
        }
        grant = grant.with_window(from, to);
    }

    let sub = state
        .booking
        .activate_subscription(subscription_id, grant)
        .await?;

    metrics::counter!("booking_subscriptions_activated_total").increment(1);
    metrics::histogram!(
        "booking_operation_duration_seconds",
        "operation" => "activate_subscription"
    )
    .record(start.elapsed().as_secs_f64());

    Ok(Json(sub.into()))
}

/// GET /api/v1/members/{id}/subscriptions
pub async fn list_member_subscriptions(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<SubscriptionListResponse>> {
    let member_id = parse_member_id(&id)?;

    let rows = state
        .repos
        .subscriptions
        .find_by_member(member_id.0)
        .await?;

    let subscriptions = rows
        .into_iter()
        .map(|row| row.try_into().map(Subscription::into))
        .collect::<Result<Vec<SubscriptionResponse>, _>>()?;

    Ok(Json(SubscriptionListResponse { subscriptions }))
}
