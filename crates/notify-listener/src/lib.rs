//! # notify-listener
//!
//! Consumes domain events from other services and turns them into
//! notifications. The listener never exits on bad input: malformed and
//! unrecognized messages are logged and dropped, and a lost subscription
//! is re-established indefinitely.

pub mod handlers;
pub mod listener;

pub use listener::EventListener;
