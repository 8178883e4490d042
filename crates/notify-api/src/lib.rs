//! # notify-api
//!
//! HTTP API layer for Lumen Notify built on Axum.
//!
//! Provides the WebSocket upgrade endpoint, a small REST surface for
//! polling notifications when push is unavailable, health endpoints,
//! extractors, DTOs, and error mapping.

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;
pub mod state;

pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;
