//! Mock implementation of GameConnector for testing
//!
//! Lets tests drive connection state + inbound signals and assert what the
//! session opened, sent and closed, without a socket.

use std::sync::{Arc, Mutex, MutexGuard};

use roshambo_shared::{ClientMessage, RoomCode};

use crate::ports::outbound::{
    ConnectionError, ConnectionSignal, ConnectionState, GameConnection, GameConnector,
    SignalCallback,
};

struct State {
    conn_state: ConnectionState,
    open_attempts: Vec<String>,
    opened: Vec<RoomCode>,
    sent: Vec<ClientMessage>,
    close_calls: usize,
    on_signal: Option<SignalCallback>,
}

impl Default for State {
    fn default() -> Self {
        Self {
            conn_state: ConnectionState::Closed,
            open_attempts: Vec::new(),
            opened: Vec::new(),
            sent: Vec::new(),
            close_calls: 0,
            on_signal: None,
        }
    }
}

/// Mock `GameConnector` for tests.
///
/// Every connection it opens shares this connector's state, so a test keeps
/// the connector and inspects it after handing a clone to the code under test.
#[derive(Clone, Default)]
pub struct MockGameConnector {
    state: Arc<Mutex<State>>,
}

impl MockGameConnector {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().expect("mock connection state poisoned")
    }

    /// Deliver a lifecycle signal to the most recently opened connection.
    ///
    /// Mirrors the real transport: `Opened` makes the connection open, closed
    /// and errored make it closed.
    pub fn emit(&self, signal: ConnectionSignal) {
        let mut s = self.lock();
        match signal {
            ConnectionSignal::Opened => s.conn_state = ConnectionState::Open,
            ConnectionSignal::Closed | ConnectionSignal::Errored(_) => {
                s.conn_state = ConnectionState::Closed
            }
            ConnectionSignal::Message(_) => {}
        }
        if let Some(cb) = s.on_signal.as_ref() {
            cb(signal);
        }
    }

    pub fn emit_message(&self, payload: &str) {
        self.emit(ConnectionSignal::Message(payload.to_string()));
    }

    /// Change the transport state without emitting a signal (a half-open link).
    pub fn set_state(&self, new_state: ConnectionState) {
        self.lock().conn_state = new_state;
    }

    /// Every raw code passed to `open`, valid or not.
    pub fn open_attempts(&self) -> Vec<String> {
        self.lock().open_attempts.clone()
    }

    /// Codes for which a transport attempt was actually started.
    pub fn opened(&self) -> Vec<RoomCode> {
        self.lock().opened.clone()
    }

    pub fn sent(&self) -> Vec<ClientMessage> {
        self.lock().sent.clone()
    }

    pub fn close_calls(&self) -> usize {
        self.lock().close_calls
    }
}

impl GameConnector for MockGameConnector {
    fn open(
        &self,
        room_code: &str,
        on_signal: SignalCallback,
    ) -> Result<Box<dyn GameConnection>, ConnectionError> {
        let mut s = self.lock();
        s.open_attempts.push(room_code.to_string());
        let room_code = RoomCode::parse(room_code)?;

        s.opened.push(room_code.clone());
        s.conn_state = ConnectionState::Connecting;
        s.on_signal = Some(on_signal);

        Ok(Box::new(MockGameConnection {
            room_code,
            state: Arc::clone(&self.state),
        }))
    }
}

/// Connection handed out by [`MockGameConnector`].
pub struct MockGameConnection {
    room_code: RoomCode,
    state: Arc<Mutex<State>>,
}

impl GameConnection for MockGameConnection {
    fn room_code(&self) -> &RoomCode {
        &self.room_code
    }

    fn state(&self) -> ConnectionState {
        self.state
            .lock()
            .expect("mock connection state poisoned")
            .conn_state
    }

    fn send(&self, message: &ClientMessage) -> Result<(), ConnectionError> {
        let mut s = self.state.lock().expect("mock connection state poisoned");
        if s.conn_state != ConnectionState::Open {
            return Err(ConnectionError::NotOpen);
        }
        s.sent.push(message.clone());
        Ok(())
    }

    fn close(&self) {
        let mut s = self.state.lock().expect("mock connection state poisoned");
        s.close_calls += 1;
        s.conn_state = ConnectionState::Closed;
    }
}
