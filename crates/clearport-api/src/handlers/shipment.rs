//! Shipment handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use uuid::Uuid;

use clearport_core::types::pagination::PageResponse;
use clearport_entity::payment::Payment;
use clearport_entity::shipment::{Shipment, ShipmentTruck, ShipmentUpdate};
use clearport_service::shipment::{CreateShipment, ShipmentChange, TruckInput};

use crate::dto::request::{
    CreateShipmentRequest, TransitionRequest, UpdateShipmentRequest, validated,
};
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::{AuthUser, PaginationParams};
use crate::state::AppState;

/// POST /api/shipments
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateShipmentRequest>,
) -> Result<Json<ApiResponse<Shipment>>, ApiError> {
    let req = validated(req)?;
    let document = req.document.as_ref().map(|d| d.decode()).transpose()?;
    let shipment = state
        .shipment_service
        .create(
            &auth,
            CreateShipment {
                mode: req.mode,
                origin_port: req.origin_port,
                destination_port: req.destination_port,
                etd: req.etd,
                eta: req.eta,
                bill_of_lading_number: req.bill_of_lading_number,
                bayan_number: req.bayan_number,
                counterparty_id: req.counterparty_id,
                clearance_charges_minor: req.clearance_charges_minor,
                document,
                trucks: req
                    .trucks
                    .into_iter()
                    .map(|t| TruckInput {
                        truck_number: t.truck_number,
                        driver_name: t.driver_name,
                        driver_phone: t.driver_phone,
                    })
                    .collect(),
            },
        )
        .await?;
    Ok(Json(ApiResponse::ok(shipment)))
}

/// GET /api/shipments
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> Result<Json<ApiResponse<PageResponse<Shipment>>>, ApiError> {
    let page = state
        .shipment_service
        .list(&auth, &params.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(page)))
}

/// GET /api/shipments/{id}
pub async fn get(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Shipment>>, ApiError> {
    let shipment = state.shipment_service.get(&auth, id).await?;
    Ok(Json(ApiResponse::ok(shipment)))
}

/// GET /api/shipments/{id}/trucks
pub async fn trucks(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<ShipmentTruck>>>, ApiError> {
    let trucks = state.shipment_service.trucks(&auth, id).await?;
    Ok(Json(ApiResponse::ok(trucks)))
}

/// GET /api/shipments/{id}/updates
pub async fn updates(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<ApiResponse<PageResponse<ShipmentUpdate>>>, ApiError> {
    let page = state
        .shipment_service
        .updates(&auth, id, &params.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(page)))
}

/// GET /api/shipments/{id}/payments
pub async fn payments(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<Payment>>>, ApiError> {
    let payments = state.payment_service.list_for_shipment(&auth, id).await?;
    Ok(Json(ApiResponse::ok(payments)))
}

/// POST /api/shipments/{id}/accept
pub async fn accept(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<TransitionRequest>,
) -> Result<Json<ApiResponse<Shipment>>, ApiError> {
    let req = validated(req)?;
    let shipment = state.shipment_service.accept(&auth, id, req.note).await?;
    Ok(Json(ApiResponse::ok(shipment)))
}

/// POST /api/shipments/{id}/complete
pub async fn complete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<TransitionRequest>,
) -> Result<Json<ApiResponse<Shipment>>, ApiError> {
    let req = validated(req)?;
    let shipment = state.shipment_service.complete(&auth, id, req.note).await?;
    Ok(Json(ApiResponse::ok(shipment)))
}

/// POST /api/shipments/{id}/status
pub async fn update_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateShipmentRequest>,
) -> Result<Json<ApiResponse<Shipment>>, ApiError> {
    let req = validated(req)?;
    let document = req.document.as_ref().map(|d| d.decode()).transpose()?;
    let shipment = state
        .shipment_service
        .update(
            &auth,
            id,
            ShipmentChange {
                status: req.status,
                note: req.note,
                document,
            },
        )
        .await?;
    Ok(Json(ApiResponse::ok(shipment)))
}
