//! Lumen Notify — notification delivery service.
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, fmt};

use notify_core::config::AppConfig;
use notify_core::error::AppError;

#[tokio::main]
async fn main() {
    let env = std::env::var("NOTIFY_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {e}");
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
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Lumen Notify v{}", env!("CARGO_PKG_VERSION"));

    // ── Database connection + migrations ─────────────────────────
    let db = notify_database::DatabasePool::connect(&config.database).await?;
    notify_database::migration::run_migrations(db.pool()).await?;

    // ── Cache ────────────────────────────────────────────────────
    tracing::info!(provider = %config.cache.provider, "Initializing cache");
    let cache = notify_cache::CacheManager::new(&config.cache).await?;

    // ── Event bus ────────────────────────────────────────────────
    tracing::info!(provider = %config.bus.provider, "Initializing event bus");
    let bus = notify_bus::build_event_bus(&config.bus).await?;

    // ── Auth ─────────────────────────────────────────────────────
    let verifier = Arc::new(notify_auth::JwtVerifier::new(&config.auth));

    // ── Service layer ────────────────────────────────────────────
    let store = Arc::new(notify_database::PgNotificationStore::new(db.pool().clone()));
    let service = Arc::new(notify_service::NotificationService::new(
        store,
        cache.clone(),
        Arc::clone(&bus),
        &config.notifications,
    ));

    // ── Delivery gateway ─────────────────────────────────────────
    let presence = notify_service::ConnectionRegistry::new(
        cache.clone(),
        Duration::from_secs(config.gateway.presence_ttl_seconds),
    );
    let gateway = Arc::new(notify_gateway::DeliveryGateway::new(
        Arc::clone(&service),
        presence,
        Arc::clone(&bus),
        config.gateway.clone(),
        &config.bus,
    ));

    // ── Shutdown channel ─────────────────────────────────────────
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // ── Background tasks ─────────────────────────────────────────
    let listener = notify_listener::EventListener::new(
        Arc::clone(&bus),
        Arc::clone(&service),
        &config.bus,
    );
    let mut listener_shutdown = shutdown_rx.clone();
    let listener_handle = tokio::spawn(async move {
        tokio::select! {
            _ = listener.run() => {}
            _ = listener_shutdown.changed() => {}
        }
    });

    let fanout_gateway = Arc::clone(&gateway);
    let mut fanout_shutdown = shutdown_rx.clone();
    let fanout_handle = tokio::spawn(async move {
        tokio::select! {
            _ = fanout_gateway.run_fanout() => {}
            _ = fanout_shutdown.changed() => {}
        }
    });

    let cleanup_service = Arc::clone(&service);
    let cleanup_interval = Duration::from_secs(config.notifications.cleanup_interval_seconds);
    let mut cleanup_shutdown = shutdown_rx.clone();
    let cleanup_handle = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(cleanup_interval);
        ticker.tick().await;
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = cleanup_service.cleanup_expired().await {
                        tracing::warn!(error = %e, "Expired-notification cleanup failed");
                    }
                }
                _ = cleanup_shutdown.changed() => break,
            }
        }
    });

    // ── HTTP server ──────────────────────────────────────────────
    let app_state = notify_api::AppState {
        config: Arc::new(config.clone()),
        db_pool: db.pool().clone(),
        cache,
        bus,
        verifier,
        service,
        gateway,
    };

    let app = notify_api::build_router(app_state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener_socket = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("Lumen Notify listening on {addr}");

    axum::serve(listener_socket, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            tracing::info!("Shutdown signal received, starting graceful shutdown...");
            let _ = shutdown_tx.send(true);
        })
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    for handle in [listener_handle, fanout_handle, cleanup_handle] {
        let _ = tokio::time::timeout(Duration::from_secs(10), handle).await;
    }

    db.close().await;
    tracing::info!("Lumen Notify shut down gracefully");
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
