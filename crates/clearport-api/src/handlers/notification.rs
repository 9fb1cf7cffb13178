//! Notification feed handlers.

use axum::Json;
use axum::extract::{Query, State};

use clearport_service::notification::NotificationFeed;

use crate::dto::request::{MarkReadRequest, validated};
use crate::dto::response::{ApiResponse, CountResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, PaginationParams};
use crate::state::AppState;

/// GET /api/notifications
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> Result<Json<ApiResponse<NotificationFeed>>, ApiError> {
    let feed = state
        .notification_service
        .feed(&auth, &params.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(feed)))
}

/// GET /api/notifications/unread-count
pub async fn unread_count(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<CountResponse>>, ApiError> {
    let count = state.notification_service.unread_count(&auth).await?;
    Ok(Json(ApiResponse::ok(CountResponse { count })))
}

/// PUT /api/notifications/read
pub async fn mark_read(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<MarkReadRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let req = validated(req)?;
    let marked = state
        .notification_service
        .mark_read(&auth, &req.ids)
        .await?;
    Ok(Json(
        serde_json::json!({ "success": true, "data": { "marked": marked } }),
    ))
}
