//! Cross-service domain events consumed from the inbound bus channel.
//!
//! Producer microservices (auth, media, comments) publish envelopes of the
//! shape `{ "event": string, "data": object, "service": string }`. The
//! recognized event types are modelled as a closed tagged union so that
//! handlers are exhaustively checked; anything else lands in
//! [`DomainEvent::Unknown`] and is logged and dropped by the listener.

pub mod payload;

use serde::{Deserialize, Serialize};

use crate::result::AppResult;

pub use payload::{NewCommentEvent, UploadCompletedEvent, UserLoginEvent, UserRegisteredEvent};

/// Raw envelope published by producer services.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    /// Event type discriminator (e.g., `"user_registered"`).
    pub event: String,
    /// Event payload, interpreted per event type.
    #[serde(default)]
    pub data: serde_json::Value,
    /// Name of the producing service.
    #[serde(default)]
    pub service: String,
}

/// A recognized (or explicitly unrecognized) inbound domain event.
#[derive(Debug, Clone)]
pub enum DomainEvent {
    /// A new user account was created.
    UserRegistered(UserRegisteredEvent),
    /// A user logged in.
    UserLogin(UserLoginEvent),
    /// A media upload finished processing.
    UploadCompleted(UploadCompletedEvent),
    /// A comment was posted on a media item.
    NewComment(NewCommentEvent),
    /// An event type this service does not handle.
    Unknown {
        /// The unrecognized event discriminator.
        event: String,
        /// The raw payload, retained for logging.
        data: serde_json::Value,
    },
}

impl DomainEvent {
    /// Parse a raw bus message into a domain event.
    ///
    /// Fails only when the message is not a valid envelope or a recognized
    /// event carries a payload that does not match its schema. Unrecognized
    /// event types parse successfully into [`DomainEvent::Unknown`].
    pub fn parse(raw: &str) -> AppResult<Self> {
        let envelope: EventEnvelope = serde_json::from_str(raw)?;
        Self::from_envelope(envelope)
    }

    /// Interpret an already-parsed envelope.
    pub fn from_envelope(envelope: EventEnvelope) -> AppResult<Self> {
        let event = match envelope.event.as_str() {
            "user_registered" => Self::UserRegistered(serde_json::from_value(envelope.data)?),
            "user_login" => Self::UserLogin(serde_json::from_value(envelope.data)?),
            "upload_completed" => Self::UploadCompleted(serde_json::from_value(envelope.data)?),
            "new_comment" => Self::NewComment(serde_json::from_value(envelope.data)?),
            _ => Self::Unknown {
                event: envelope.event,
                data: envelope.data,
            },
        };
        Ok(event)
    }
}
