//! Route definitions for the ClearPort HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`.
//! The router receives `AppState` and passes it to all handlers via Axum's `State` extractor.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, header},
    routing::{delete, get, post, put},
};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
///
/// Receives the fully-constructed `AppState` and threads it through
/// every route via `.with_state(state)`.
pub fn build_router(state: AppState) -> Router {
    let max_body = state.config.server.max_body_bytes;

    let api_routes = Router::new()
        .merge(auth_routes())
        .merge(shipment_routes())
        .merge(payment_routes())
        .merge(notification_routes())
        .merge(relationship_routes())
        .merge(event_routes())
        .merge(health_routes());

    let cors = build_cors_layer(&state);

    Router::new()
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(max_body))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Auth endpoints: register, login, me
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/me", get(handlers::auth::me))
}

/// Shipment CRUD, lifecycle transitions, trucks, updates
fn shipment_routes() -> Router<AppState> {
    Router::new()
        .route("/shipments", post(handlers::shipment::create))
        .route("/shipments", get(handlers::shipment::list))
        .route("/shipments/{id}", get(handlers::shipment::get))
        .route("/shipments/{id}/trucks", get(handlers::shipment::trucks))
        .route("/shipments/{id}/updates", get(handlers::shipment::updates))
        .route(
            "/shipments/{id}/payments",
            get(handlers::shipment::payments),
        )
        .route("/shipments/{id}/accept", post(handlers::shipment::accept))
        .route(
            "/shipments/{id}/complete",
            post(handlers::shipment::complete),
        )
        .route(
            "/shipments/{id}/status",
            post(handlers::shipment::update_status),
        )
}

/// Payment requests and their lifecycle
fn payment_routes() -> Router<AppState> {
    Router::new()
        .route("/payments", post(handlers::payment::create))
        .route("/payments", get(handlers::payment::list))
        .route("/payments/{id}", get(handlers::payment::get))
        .route("/payments/{id}", delete(handlers::payment::delete))
        .route("/payments/{id}/confirm", post(handlers::payment::confirm))
        .route("/payments/{id}/reject", post(handlers::payment::reject))
        .route("/payments/{id}/complete", post(handlers::payment::complete))
}

/// Notification feed and read tracking
fn notification_routes() -> Router<AppState> {
    Router::new()
        .route("/notifications", get(handlers::notification::list))
        .route(
            "/notifications/unread-count",
            get(handlers::notification::unread_count),
        )
        .route(
            "/notifications/read",
            put(handlers::notification::mark_read),
        )
}

/// Importer↔agent relationship endpoints
fn relationship_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/relationships/invite",
            post(handlers::relationship::invite),
        )
        .route("/relationships", get(handlers::relationship::list))
}

/// Server-sent events stream
fn event_routes() -> Router<AppState> {
    Router::new().route("/events", get(handlers::events::subscribe))
}

/// Health check endpoints (no auth required)
fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/health/detailed", get(handlers::health::detailed_health))
}

/// Build CORS layer from configuration
fn build_cors_layer(state: &AppState) -> CorsLayer {
    use tower_http::cors::Any;

    let cors_config = &state.config.server.cors;

    let mut cors = CorsLayer::new();

    if cors_config.allowed_origins.contains(&"*".to_string()) {
        cors = cors.allow_origin(Any).allow_headers(Any);
    } else {
        let origins: Vec<HeaderValue> = cors_config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        cors = cors
            .allow_origin(origins)
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);
    }

    let methods: Vec<Method> = cors_config
        .allowed_methods
        .iter()
        .filter_map(|m| m.parse().ok())
        .collect();
    cors = cors.allow_methods(methods);

    cors.max_age(std::time::Duration::from_secs(cors_config.max_age_seconds))
}
