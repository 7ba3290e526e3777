//! WebSocket message types for Server-Player communication
//!
//! Both directions are JSON objects discriminated by their `action` field.

use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use crate::types::{Move, PlayerId, ScoreBoard};

// =============================================================================
// Client Messages (Player → Server)
// =============================================================================

/// Messages from client (Player) to server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Player throws a move for the current round
    Move {
        #[serde(rename = "move")]
        choice: Move,
    },
}

impl ClientMessage {
    pub fn action(&self) -> &'static str {
        match self {
            ClientMessage::Move { .. } => "move",
        }
    }
}

// =============================================================================
// Server Messages (Server → Player)
// =============================================================================

/// Messages from server to client (Player)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Both seats are filled; tells this client which seat it holds
    GameStarted { player_id: PlayerId },

    /// Both moves for a round are in
    #[serde(rename = "result")]
    RoundResult {
        /// `None` when the round was a tie (sent as `null` or a negative id)
        #[serde(default, deserialize_with = "deserialize_round_winner")]
        winner: Option<PlayerId>,
        opponent_move: Move,
        /// Authoritative running totals, when the server includes them
        #[serde(default, skip_serializing_if = "Option::is_none")]
        scores: Option<ScoreBoard>,
    },

    /// A player reached the winning score
    GameOver { winner: PlayerId },

    /// Unknown action for forward compatibility
    ///
    /// When deserializing an unknown action, this variant is used instead of
    /// failing. Allows older clients to gracefully skip new message types.
    #[serde(other)]
    Unknown,
}

impl ServerMessage {
    /// The `action` tag this message travels under, for logging.
    pub fn action(&self) -> &'static str {
        match self {
            ServerMessage::GameStarted { .. } => "game_started",
            ServerMessage::RoundResult { .. } => "result",
            ServerMessage::GameOver { .. } => "game_over",
            ServerMessage::Unknown => "unknown",
        }
    }
}

/// A round's winner: a player id, or a tie.
///
/// Some servers mark a tie with `-1` instead of `null`; any negative id is read
/// as a tie. Other values must be a valid [`PlayerId`].
fn deserialize_round_winner<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<PlayerId>, D::Error> {
    deserializer.deserialize_any(RoundWinnerVisitor)
}

struct RoundWinnerVisitor;

impl<'de> Visitor<'de> for RoundWinnerVisitor {
    type Value = Option<PlayerId>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a player id, null or a negative number for a tie")
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_any(self)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        if v < 0 {
            return Ok(None);
        }
        self.visit_u64(v.unsigned_abs())
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        u8::try_from(v)
            .ok()
            .and_then(|v| PlayerId::new(v).ok())
            .map(Some)
            .ok_or_else(|| E::invalid_value(de::Unexpected::Unsigned(v), &self))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        match v.trim().parse::<i64>() {
            Ok(n) if n < 0 => Ok(None),
            _ => v.parse::<PlayerId>().map(Some).map_err(E::custom),
        }
    }
}
