//! Payment handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use uuid::Uuid;

use clearport_core::types::pagination::PageResponse;
use clearport_entity::payment::Payment;
use clearport_service::payment::CreatePayment;

use crate::dto::request::{CompletePaymentRequest, CreatePaymentRequest, validated};
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, PaginationParams};
use crate::state::AppState;

/// POST /api/payments
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreatePaymentRequest>,
) -> Result<Json<ApiResponse<Payment>>, ApiError> {
    let req = validated(req)?;
    let invoice = req.invoice.as_ref().map(|d| d.decode()).transpose()?;
    let payment = state
        .payment_service
        .create(
            &auth,
            CreatePayment {
                shipment_id: req.shipment_id,
                amount_minor: req.amount_minor,
                description: req.description,
                bill_number: req.bill_number,
                bayan_number: req.bayan_number,
                payment_deadline: req.payment_deadline,
                payment_type: req.payment_type,
                invoice,
            },
        )
        .await?;
    Ok(Json(ApiResponse::ok(payment)))
}

/// GET /api/payments
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> Result<Json<ApiResponse<PageResponse<Payment>>>, ApiError> {
    let page = state
        .payment_service
        .list(&auth, &params.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(page)))
}

/// GET /api/payments/{id}
pub async fn get(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Payment>>, ApiError> {
    let payment = state.payment_service.get(&auth, id).await?;
    Ok(Json(ApiResponse::ok(payment)))
}

/// POST /api/payments/{id}/confirm
pub async fn confirm(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Payment>>, ApiError> {
    let payment = state.payment_service.confirm(&auth, id).await?;
    Ok(Json(ApiResponse::ok(payment)))
}

/// POST /api/payments/{id}/reject
pub async fn reject(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Payment>>, ApiError> {
    let payment = state.payment_service.reject(&auth, id).await?;
    Ok(Json(ApiResponse::ok(payment)))
}

/// POST /api/payments/{id}/complete
pub async fn complete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<CompletePaymentRequest>,
) -> Result<Json<ApiResponse<Payment>>, ApiError> {
    let req = validated(req)?;
    let receipt = req.receipt.decode()?;
    let payment = state.payment_service.complete(&auth, id, receipt).await?;
    Ok(Json(ApiResponse::ok(payment)))
}

/// DELETE /api/payments/{id}
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.payment_service.delete(&auth, id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse {
        message: "Payment deleted".to_string(),
    })))
}
