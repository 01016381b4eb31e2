//! Member handlers

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use manta_db::{CreateMember, MemberRepository};
use manta_types::{Member, MemberId};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateMemberRequest {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct MemberResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub status: String,
}

impl From<Member> for MemberResponse {
    fn from(member: Member) -> Self {
        Self {
            id: member.id.to_string(),
            name: member.name,
            email: member.email,
            status: member.status.to_string(),
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/v1/members
pub async fn create_member(
    State(state): State<AppState>,
    Json(req): Json<CreateMemberRequest>,
) -> ApiResult<Json<MemberResponse>> {
    if req.name.trim().is_empty() {
        return Err(ApiError::BadRequest("name cannot be empty".to_string()));
    }
    if !req.email.contains('@') {
        return Err(ApiError::BadRequest("invalid email".to_string()));
    }

    let row = state
        .repos
        .members
        .create(CreateMember {
            id: Uuid::new_v4(),
            name: req.name,
            email: req.email,
        })
        .await?;

    let member: Member = row.try_into()?;
    tracing::info!(member_id = %member.id, "Member created");

    Ok(Json(member.into()))
}

/// GET /api/v1/members/{id}
pub async fn get_member(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MemberResponse>> {
    let member_id = parse_member_id(&id)?;

    let row = state
        .repos
        .members
        .find_by_id(member_id.0)
        .await?
        .ok_or(ApiError::MemberNotFound)?;

    let member: Member = row.try_into()?;
    Ok(Json(member.into()))
}

pub(crate) fn parse_member_id(s: &str) -> Result<MemberId, ApiError> {
    MemberId::parse(s).map_err(|_| ApiError::BadRequest("Invalid member id".to_string()))
}
