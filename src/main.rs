//! ClearPort Server: customs clearance coordination platform
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use clearport_core::config::AppConfig;
use clearport_core::error::AppError;

#[tokio::main]
async fn main() {
    let env = std::env::var("CLEARPORT_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting ClearPort v{}", env!("CARGO_PKG_VERSION"));

    // Database connection + migrations
    let db_pool = clearport_database::connection::create_pool(&config.database).await?;
    clearport_database::connection::run_migrations(&db_pool).await?;

    // Document storage
    tracing::info!(
        "Initializing document store (provider: {})...",
        config.storage.provider
    );
    let store = clearport_storage::manager::build_document_store(&config.storage).await?;

    // Event bus feeding the SSE streams
    let bus = Arc::new(clearport_realtime::bus::EventBus::new(
        config.realtime.channel_buffer_size,
    ));

    // Repositories
    let user_repo = Arc::new(
        clearport_database::repositories::user::UserRepository::new(db_pool.clone()),
    );
    let notification_repo = Arc::new(
        clearport_database::repositories::notification::NotificationRepository::new(
            db_pool.clone(),
        ),
    );
    let shipment_repo = Arc::new(
        clearport_database::repositories::shipment::ShipmentRepository::new(db_pool.clone()),
    );
    let update_repo = Arc::new(
        clearport_database::repositories::shipment_update::ShipmentUpdateRepository::new(
            db_pool.clone(),
        ),
    );
    let payment_repo = Arc::new(
        clearport_database::repositories::payment::PaymentRepository::new(db_pool.clone()),
    );
    let relationship_repo = Arc::new(
        clearport_database::repositories::relationship::RelationshipRepository::new(
            db_pool.clone(),
        ),
    );

    // Auth
    let jwt_codec = Arc::new(clearport_auth::jwt::codec::JwtCodec::new(&config.auth));
    let password_hasher = clearport_auth::password::PasswordHasher::new(&config.auth)?;

    // Services
    tracing::info!("Initializing services...");
    let notification_service = Arc::new(
        clearport_service::notification::NotificationService::new(
            Arc::clone(&notification_repo),
            Arc::clone(&bus),
        ),
    );
    let shipment_service = Arc::new(clearport_service::shipment::ShipmentService::new(
        db_pool.clone(),
        Arc::clone(&shipment_repo),
        Arc::clone(&update_repo),
        Arc::clone(&notification_service),
        Arc::clone(&store),
    ));
    let payment_service = Arc::new(clearport_service::payment::PaymentService::new(
        db_pool.clone(),
        Arc::clone(&payment_repo),
        Arc::clone(&shipment_repo),
        Arc::clone(&update_repo),
        Arc::clone(&notification_service),
        Arc::clone(&store),
        clearport_service::payment::PaymentMachine::new(
            config.payments.require_confirmed_completion,
        ),
        config.payments.currency.clone(),
    ));
    let relationship_service = Arc::new(clearport_service::relationship::RelationshipService::new(
        Arc::clone(&relationship_repo),
        Arc::clone(&user_repo),
        Arc::new(clearport_service::mailer::LogMailer),
    ));
    let user_service = Arc::new(clearport_service::user::UserService::new(
        db_pool.clone(),
        Arc::clone(&user_repo),
        Arc::clone(&relationship_repo),
        password_hasher,
        Arc::clone(&jwt_codec),
    ));
    tracing::info!("Services initialized");

    // Build and start HTTP server
    let app_state = clearport_api::state::AppState {
        config: Arc::new(config.clone()),
        db_pool: db_pool.clone(),
        bus,
        jwt_codec,
        user_service,
        notification_service,
        shipment_service,
        payment_service,
        relationship_service,
    };

    let app = clearport_api::router::build_router(app_state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("ClearPort server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    tracing::info!("ClearPort server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
