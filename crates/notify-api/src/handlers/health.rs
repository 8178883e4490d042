//! Health check handlers.

use axum::Json;
use axum::extract::State;

use notify_core::traits::cache::CacheProvider;

use crate::dto::{ApiResponse, DetailedHealthResponse, HealthResponse};
use crate::state::AppState;

/// GET /api/health
pub async fn health() -> Json<ApiResponse<HealthResponse>> {
    Json(ApiResponse::ok(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }))
}

/// GET /api/health/detailed
///
/// Probes each backing service; the endpoint itself always answers 200 so
/// operators can see which dependency is down.
pub async fn health_detailed(
    State(state): State<AppState>,
) -> Json<ApiResponse<DetailedHealthResponse>> {
    let database = match sqlx::query("SELECT 1").execute(&state.db_pool).await {
        Ok(_) => "connected",
        Err(_) => "unreachable",
    };
    let cache = match state.cache.health_check().await {
        Ok(true) => "connected",
        _ => "unreachable",
    };
    let bus = match state.bus.health_check().await {
        Ok(true) => "connected",
        _ => "unreachable",
    };

    let status = if database == "connected" && cache == "connected" && bus == "connected" {
        "ok"
    } else {
        "degraded"
    };

    Json(ApiResponse::ok(DetailedHealthResponse {
        status: status.to_string(),
        database: database.to_string(),
        cache: cache.to_string(),
        bus: bus.to_string(),
        ws_connections: state.gateway.connection_count(),
    }))
}
