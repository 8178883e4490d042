//! Application state shared across all handlers.

use std::sync::Arc;

use sqlx::PgPool;

use notify_auth::JwtVerifier;
use notify_cache::CacheManager;
use notify_core::config::AppConfig;
use notify_core::traits::bus::EventBus;
use notify_gateway::DeliveryGateway;
use notify_service::NotificationService;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`. All fields are
/// cheap to clone.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// PostgreSQL connection pool, kept for health reporting.
    pub db_pool: PgPool,
    /// Cache manager (Redis or in-memory).
    pub cache: CacheManager,
    /// Event bus handle, kept for health reporting.
    pub bus: Arc<dyn EventBus>,
    /// JWT token verifier.
    pub verifier: Arc<JwtVerifier>,
    /// Notification service.
    pub service: Arc<NotificationService>,
    /// Push-delivery gateway.
    pub gateway: Arc<DeliveryGateway>,
}
