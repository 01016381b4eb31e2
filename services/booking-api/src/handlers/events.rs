//! Event admin handlers

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::{NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use manta_db::{CreateEvent, EventRepository, SignupRepository};
use manta_types::{Event, EventId, EventPatch};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateEventRequest {
    pub category: String,
    pub date: NaiveDate,
    pub starts_at: NaiveTime,
    pub ends_at: NaiveTime,
    pub max_slots: i32,
}

#[derive(Debug, Deserialize)]
pub struct ListEventsQuery {
    /// Earliest date to include; defaults to the club-local today
    pub from: Option<NaiveDate>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct EventResponse {
    pub id: String,
    pub category: String,
    pub date: NaiveDate,
    pub starts_at: NaiveTime,
    pub ends_at: NaiveTime,
    pub max_slots: i32,
    pub status: String,
}

impl From<Event> for EventResponse {
    fn from(event: Event) -> Self {
        Self {
            id: event.id.to_string(),
            category: event.category.0,
            date: event.date,
            starts_at: event.starts_at,
            ends_at: event.ends_at,
            max_slots: event.max_slots,
            status: event.status.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EventListResponse {
    pub events: Vec<EventResponse>,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/v1/events
pub async fn create_event(
    State(state): State<AppState>,
    Json(req): Json<CreateEventRequest>,
) -> ApiResult<Json<EventResponse>> {
    if req.category.trim().is_empty() {
        return Err(ApiError::BadRequest("category cannot be empty".to_string()));
    }
    if req.max_slots <= 0 {
        return Err(ApiError::BadRequest(
            "max_slots must be positive".to_string(),
        ));
    }
    if req.ends_at <= req.starts_at {
        return Err(ApiError::BadRequest(
            "ends_at must be after starts_at".to_string(),
        ));
    }

    let row = state
        .repos
        .events
        .create(CreateEvent {
            id: Uuid::new_v4(),
            category: req.category,
            event_date: req.date,
            starts_at: req.starts_at,
            ends_at: req.ends_at,
            max_slots: req.max_slots,
        })
        .await?;

    let event: Event = row.try_into()?;
    tracing::info!(event_id = %event.id, category = %event.category, "Event created");

    Ok(Json(event.into()))
}

/// GET /api/v1/events
pub async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<ListEventsQuery>,
) -> ApiResult<Json<EventListResponse>> {
    let tz = state.booking.config().timezone;
    let from = query
        .from
        .unwrap_or_else(|| Utc::now().with_timezone(&tz).date_naive());
    let limit = query.limit.unwrap_or(100).clamp(1, 500);

    let rows = state.repos.events.list_from(from, limit).await?;

    let events = rows
        .into_iter()
        .map(|row| row.try_into().map(Event::into))
        .collect::<Result<Vec<EventResponse>, _>>()?;

    Ok(Json(EventListResponse { events }))
}

/// GET /api/v1/events/{id}
pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<EventResponse>> {
    let event_id = parse_event_id(&id)?;

    let row = state
        .repos
        .events
        .find_by_id(event_id.0)
        .await?
        .ok_or(ApiError::EventNotFound)?;

    let event: Event = row.try_into()?;
    Ok(Json(event.into()))
}

/// PATCH /api/v1/events/{id}
pub async fn update_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<EventPatch>,
) -> ApiResult<Json<EventResponse>> {
    let event_id = parse_event_id(&id)?;

    if patch.is_empty() {
        return Err(ApiError::BadRequest("empty patch".to_string()));
    }
    if matches!(patch.max_slots, Some(slots) if slots <= 0) {
        return Err(ApiError::BadRequest(
            "max_slots must be positive".to_string(),
        ));
    }

    // The repository rejects a max_slots shrink below the live signup count
    // under the event row lock; that surfaces as CAPACITY_BELOW_SIGNUPS.
    let row = state
        .repos
        .events
        .update(event_id.0, patch)
        .await
        .map_err(|e| match e {
            manta_db::DbError::NotFound => ApiError::EventNotFound,
            other => ApiError::Database(other),
        })?;

    let event: Event = row.try_into()?;
    tracing::info!(event_id = %event.id, "Event updated");

    Ok(Json(event.into()))
}

/// GET /api/v1/events/{id}/signups
pub async fn list_event_signups(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<crate::handlers::bookings::SignupListResponse>> {
    let event_id = parse_event_id(&id)?;

    state
        .repos
        .events
        .find_by_id(event_id.0)
        .await?
        .ok_or(ApiError::EventNotFound)?;

    let rows = state.repos.signups.find_by_event(event_id.0).await?;
    let signups = rows
        .into_iter()
        .map(|row| manta_types::Signup::from(row).into())
        .collect();

    Ok(Json(crate::handlers::bookings::SignupListResponse {
        signups,
    }))
}

pub(crate) fn parse_event_id(s: &str) -> Result<EventId, ApiError> {
    EventId::parse(s).map_err(|_| ApiError::BadRequest("Invalid event id".to_string()))
}
