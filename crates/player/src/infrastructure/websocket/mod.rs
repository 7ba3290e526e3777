//! WebSocket transport for the game server connection
//!
//! - `client`: the tokio-tungstenite task that owns the socket
//! - `connector`: `GameConnector` / `GameConnection` implementations around it

mod client;
mod connector;

pub use connector::{WebSocketConnection, WebSocketConnector};
