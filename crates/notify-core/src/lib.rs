//! # notify-core
//!
//! Core crate for Lumen Notify. Contains traits, configuration schemas,
//! domain-event types, pagination types, and the unified error system.
//!
//! This crate has **no** internal dependencies on other Lumen crates.

pub mod config;
pub mod error;
pub mod events;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
