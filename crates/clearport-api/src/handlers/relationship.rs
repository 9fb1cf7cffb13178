//! Importer↔agent relationship handlers.

use axum::Json;
use axum::extract::State;

use clearport_entity::relationship::Relationship;

use crate::dto::request::{InviteRequest, validated};
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/relationships/invite
pub async fn invite(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<InviteRequest>,
) -> Result<Json<ApiResponse<Relationship>>, ApiError> {
    let req = validated(req)?;
    let relationship = state.relationship_service.invite(&auth, &req.email).await?;
    Ok(Json(ApiResponse::ok(relationship)))
}

/// GET /api/relationships
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<Relationship>>>, ApiError> {
    let relationships = state.relationship_service.list(&auth).await?;
    Ok(Json(ApiResponse::ok(relationships)))
}
