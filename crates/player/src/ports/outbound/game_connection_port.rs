//! Game Connection Port - Outbound port for the game server connection
//!
//! This port abstracts the single WebSocket connection a session owns, so the
//! session controller can open, use and release it without depending on the
//! concrete transport. Lifecycle events come back through a callback, one
//! [`ConnectionSignal`] per transport event, in transport order.

use roshambo_shared::{ClientMessage, InvalidRoomCode, RoomCode};

/// Transport-level state of one connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Handshake in progress
    Connecting,
    /// Ready to send and receive
    Open,
    /// Local close requested, not yet finished
    Closing,
    /// Released, by either side or by a failure
    Closed,
}

/// Lifecycle event delivered by a connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionSignal {
    /// Transport is open
    Opened,
    /// One text payload received from the server
    Message(String),
    /// Server (or the network) closed the connection
    Closed,
    /// Transport failed to open or broke mid-session; carries the raw detail for logs
    Errored(String),
}

impl ConnectionSignal {
    /// Closed and errored end a connection; nothing follows them.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ConnectionSignal::Closed | ConnectionSignal::Errored(_))
    }
}

/// Receives lifecycle signals for one connection.
pub type SignalCallback = Box<dyn Fn(ConnectionSignal) + Send + Sync + 'static>;

#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    #[error(transparent)]
    InvalidRoomCode(#[from] InvalidRoomCode),

    #[error("Server URL {url} cannot address a room")]
    InvalidServerUrl { url: String },

    #[error("Connection is not open")]
    NotOpen,

    #[error("Failed to serialize message: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Handle to one open (or opening) connection.
pub trait GameConnection: Send {
    /// Room this connection was opened for
    fn room_code(&self) -> &RoomCode;

    /// Current transport state
    fn state(&self) -> ConnectionState;

    fn is_open(&self) -> bool {
        self.state() == ConnectionState::Open
    }

    /// Transmit one message.
    ///
    /// Returns [`ConnectionError::NotOpen`] without transmitting anything when the
    /// connection is not [`ConnectionState::Open`].
    fn send(&self, message: &ClientMessage) -> Result<(), ConnectionError>;

    /// Release the transport. Safe to call more than once.
    fn close(&self);
}

/// Opens connections addressed by room code.
pub trait GameConnector {
    /// Validate `room_code` and start connecting.
    ///
    /// Returns immediately; the outcome of the attempt arrives through `on_signal`.
    /// An invalid room code fails here and no transport attempt is made.
    fn open(
        &self,
        room_code: &str,
        on_signal: SignalCallback,
    ) -> Result<Box<dyn GameConnection>, ConnectionError>;
}
