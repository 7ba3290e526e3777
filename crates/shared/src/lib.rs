//! Roshambo Shared - wire protocol types for Server and Player communication
//!
//! This crate contains the types exchanged over the game WebSocket:
//! - WebSocket message types (ClientMessage, ServerMessage)
//! - Value objects carried by those messages (RoomCode, PlayerId, Move, ScoreBoard)
//!
//! # Design Principles
//!
//! 1. **Minimal dependencies** - Only serde, serde_json, and thiserror
//! 2. **No business logic** - Pure data types and serialization

pub mod messages;
pub mod types;

pub use messages::{ClientMessage, ServerMessage};
pub use types::{
    InvalidPlayerId, InvalidRoomCode, Move, PlayerId, RoomCode, ScoreBoard, UnknownMove,
    ROOM_CODE_LEN,
};
