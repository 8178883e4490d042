//! # notify-entity
//!
//! Domain entity models and enums for Lumen Notify.

pub mod notification;
