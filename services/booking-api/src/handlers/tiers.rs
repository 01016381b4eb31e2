//! Entitlement handlers
//!
//! Advisory reads of a member's resolved tier set. The booking transaction
//! re-resolves entitlements under lock; this endpoint exists for display.

use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use serde::Serialize;

use manta_types::Tier;

use crate::error::ApiResult;
use crate::handlers::members::parse_member_id;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct TiersResponse {
    pub member_id: String,
    pub tiers: Vec<String>,
}

/// GET /api/v1/members/{id}/tiers
pub async fn get_member_tiers(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<TiersResponse>> {
    let member_id = parse_member_id(&id)?;

    let resolved = state.booking.resolve_tiers(member_id, Utc::now()).await?;

    // Stable order for clients
    let tiers = Tier::ALL_TIERS
        .into_iter()
        .filter(|t| resolved.contains(t))
        .map(|t| t.as_str().to_string())
        .collect();

    Ok(Json(TiersResponse {
        member_id: member_id.to_string(),
        tiers,
    }))
}
