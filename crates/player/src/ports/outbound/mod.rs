//! Outbound ports - Interfaces for external services
//!
//! These ports define the contracts that infrastructure adapters must implement,
//! allowing the session core to drive a connection and a presentation surface
//! without depending on concrete implementations.

pub mod game_connection_port;
pub mod render_port;

pub use game_connection_port::{
    ConnectionError, ConnectionSignal, ConnectionState, GameConnection, GameConnector,
    SignalCallback,
};
pub use render_port::{RenderInstruction, RenderPort};

#[cfg(test)]
pub use render_port::MockRenderPort;
