//! Translates raw server payloads into protocol messages
//!
//! Everything the server sends arrives as a text frame. This module is the one
//! place that decides whether a frame is a message the session understands; any
//! other frame is reported as [`MalformedMessage`] and never reaches the state
//! machine as a transition.

use roshambo_shared::ServerMessage;

/// A payload the session cannot act on.
#[derive(Debug, thiserror::Error)]
pub enum MalformedMessage {
    /// Not JSON, or JSON missing the fields its action requires
    #[error("Payload is not a valid server message: {0}")]
    Decode(#[from] serde_json::Error),

    /// Well-formed, but carries an action this client does not know
    #[error("Unrecognized server action")]
    UnknownAction,
}

/// Decode one text payload into a [`ServerMessage`].
pub fn translate(payload: &str) -> Result<ServerMessage, MalformedMessage> {
    match serde_json::from_str::<ServerMessage>(payload)? {
        ServerMessage::Unknown => Err(MalformedMessage::UnknownAction),
        message => Ok(message),
    }
}
