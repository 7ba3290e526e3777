//! Vocabulary types shared by every Roshambo message.
//!
//! These are value objects only: validation happens at construction so that
//! anything holding a `RoomCode` or a `PlayerId` can rely on it being well formed.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Number of characters in a room code.
pub const ROOM_CODE_LEN: usize = 4;

// =============================================================================
// Room Code
// =============================================================================

/// Room code failed the fixed-length check.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Room code must be exactly 4 visible characters, got {input:?}")]
pub struct InvalidRoomCode {
    pub input: String,
}

/// Short identifier pairing two clients into one game.
///
/// Immutable once constructed; the only way to get one is through [`RoomCode::parse`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoomCode(String);

impl RoomCode {
    /// Validate a user-supplied room code.
    ///
    /// A code is valid when it is exactly [`ROOM_CODE_LEN`] characters long and
    /// contains no whitespace or control characters.
    pub fn parse(raw: &str) -> Result<Self, InvalidRoomCode> {
        let valid = raw.chars().count() == ROOM_CODE_LEN
            && raw.chars().all(|c| !c.is_whitespace() && !c.is_control());

        if valid {
            Ok(Self(raw.to_string()))
        } else {
            Err(InvalidRoomCode {
                input: raw.to_string(),
            })
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for RoomCode {
    type Err = InvalidRoomCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// =============================================================================
// Player Id
// =============================================================================

/// Player id outside {0, 1}.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid player id: {0}")]
pub struct InvalidPlayerId(pub String);

/// Seat assigned by the server when the game starts: either 0 or 1.
///
/// On the wire the server may send the id as a number (`0`) or as a string
/// (`"0"`); score maps use it as a string key. All forms decode to this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlayerId(u8);

impl PlayerId {
    pub const FIRST: PlayerId = PlayerId(0);
    pub const SECOND: PlayerId = PlayerId(1);

    pub fn new(value: u8) -> Result<Self, InvalidPlayerId> {
        match value {
            0 | 1 => Ok(Self(value)),
            other => Err(InvalidPlayerId(other.to_string())),
        }
    }

    /// The other seat in a two-player game.
    pub fn opponent(self) -> PlayerId {
        PlayerId(1 - self.0)
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PlayerId {
    type Err = InvalidPlayerId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: u8 = s
            .trim()
            .parse()
            .map_err(|_| InvalidPlayerId(s.to_string()))?;
        Self::new(value)
    }
}

impl Serialize for PlayerId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.0)
    }
}

struct PlayerIdVisitor;

impl Visitor<'_> for PlayerIdVisitor {
    type Value = PlayerId;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a player id (0 or 1) as a number or a string")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<PlayerId, E> {
        u8::try_from(v)
            .ok()
            .and_then(|v| PlayerId::new(v).ok())
            .ok_or_else(|| E::custom(InvalidPlayerId(v.to_string())))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<PlayerId, E> {
        u8::try_from(v)
            .ok()
            .and_then(|v| PlayerId::new(v).ok())
            .ok_or_else(|| E::custom(InvalidPlayerId(v.to_string())))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<PlayerId, E> {
        v.parse().map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for PlayerId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(PlayerIdVisitor)
    }
}

// =============================================================================
// Move
// =============================================================================

/// Text did not name a move.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown move: {0:?}")]
pub struct UnknownMove(pub String);

/// One throw of the game.
///
/// Serialized as the full lowercase word. The single-letter forms used by the
/// reference server (`r`, `p`, `s`) are accepted when decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Move {
    #[serde(alias = "r")]
    Rock,
    #[serde(alias = "p")]
    Paper,
    #[serde(alias = "s")]
    Scissors,
}

impl Move {
    pub fn as_str(self) -> &'static str {
        match self {
            Move::Rock => "rock",
            Move::Paper => "paper",
            Move::Scissors => "scissors",
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Move {
    type Err = UnknownMove;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rock" | "r" => Ok(Move::Rock),
            "paper" | "p" => Ok(Move::Paper),
            "scissors" | "s" => Ok(Move::Scissors),
            _ => Err(UnknownMove(s.to_string())),
        }
    }
}

// =============================================================================
// Score Board
// =============================================================================

/// Rounds won per player, as reported by the server.
///
/// The board is authoritative: clients replace their copy wholesale whenever a
/// new one arrives and never count wins themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreBoard(BTreeMap<PlayerId, u32>);

impl ScoreBoard {
    /// Rounds won by `player`; players missing from the board have won none.
    pub fn score(&self, player: PlayerId) -> u32 {
        self.0.get(&player).copied().unwrap_or(0)
    }
}

impl FromIterator<(PlayerId, u32)> for ScoreBoard {
    fn from_iter<I: IntoIterator<Item = (PlayerId, u32)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
