//! Event bus construction from configuration.

use std::sync::Arc;

use tracing::info;

use notify_core::config::bus::BusConfig;
use notify_core::error::AppError;
use notify_core::result::AppResult;
use notify_core::traits::bus::EventBus;

/// Build the configured event bus backend.
pub async fn build_event_bus(config: &BusConfig) -> AppResult<Arc<dyn EventBus>> {
    match config.provider.as_str() {
        #[cfg(feature = "redis-backend")]
        "redis" => {
            info!("Initializing Redis event bus");
            let bus = crate::redis_bus::RedisEventBus::connect(config).await?;
            Ok(Arc::new(bus))
        }
        #[cfg(feature = "memory")]
        "memory" => {
            info!("Initializing in-process event bus");
            Ok(Arc::new(crate::memory::MemoryEventBus::new(config)))
        }
        other => Err(AppError::configuration(format!(
            "Unknown bus provider: '{other}'. Supported: memory, redis"
        ))),
    }
}
