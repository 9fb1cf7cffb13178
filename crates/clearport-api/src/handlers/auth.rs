//! Authentication handlers.

use axum::Json;
use axum::extract::State;

use clearport_entity::user::User;
use clearport_service::user::RegisterUser;

use crate::dto::request::{LoginRequest, RegisterRequest, validated};
use crate::dto::response::{ApiResponse, LoginResponse};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    let req = validated(req)?;
    let authed = state
        .user_service
        .register(RegisterUser {
            email: req.email,
            name: req.name,
            password: req.password,
            role: req.role,
            phone: req.phone,
            company: req.company,
        })
        .await?;
    Ok(Json(ApiResponse::ok(LoginResponse {
        access_token: authed.access_token,
        expires_at: authed.expires_at,
        user: authed.user,
    })))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    let req = validated(req)?;
    let authed = state.user_service.login(&req.email, &req.password).await?;
    Ok(Json(ApiResponse::ok(LoginResponse {
        access_token: authed.access_token,
        expires_at: authed.expires_at,
        user: authed.user,
    })))
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<User>>, ApiError> {
    let user = state.user_service.me(auth.user_id).await?;
    Ok(Json(ApiResponse::ok(user)))
}
