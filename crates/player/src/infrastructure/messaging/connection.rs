//! Connection lifecycle management.
//!
//! This module provides types for sharing connection state between a
//! connection handle and its transport task, and for delivering lifecycle
//! signals to the session.

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;

use crate::ports::outbound::{ConnectionSignal, ConnectionState, SignalCallback};

/// Convert to u8 for atomic storage.
fn state_to_u8(state: ConnectionState) -> u8 {
    match state {
        ConnectionState::Connecting => 0,
        ConnectionState::Open => 1,
        ConnectionState::Closing => 2,
        ConnectionState::Closed => 3,
    }
}

/// Convert from u8 (atomic storage).
fn u8_to_state(v: u8) -> ConnectionState {
    match v {
        0 => ConnectionState::Connecting,
        1 => ConnectionState::Open,
        2 => ConnectionState::Closing,
        _ => ConnectionState::Closed,
    }
}

/// Shared, observable connection state.
///
/// Cloning yields another view of the same state; the transport task writes it
/// and the connection handle reads it.
#[derive(Debug, Clone)]
pub struct ConnectionStateCell {
    state: Arc<AtomicU8>,
}

impl ConnectionStateCell {
    pub fn new(initial: ConnectionState) -> Self {
        Self {
            state: Arc::new(AtomicU8::new(state_to_u8(initial))),
        }
    }

    /// Get the current connection state.
    pub fn get(&self) -> ConnectionState {
        u8_to_state(self.state.load(Ordering::SeqCst))
    }

    pub fn set(&self, new_state: ConnectionState) {
        self.state.store(state_to_u8(new_state), Ordering::SeqCst);
    }

    /// Check if currently open.
    pub fn is_open(&self) -> bool {
        self.get() == ConnectionState::Open
    }
}

/// Delivers lifecycle signals for one connection.
///
/// Signals are forwarded in the order they are emitted. Once a terminal signal
/// (closed or errored) has gone out, everything after it is dropped.
pub struct SignalDispatcher {
    callback: SignalCallback,
    finished: AtomicBool,
}

impl SignalDispatcher {
    pub fn new(callback: SignalCallback) -> Self {
        Self {
            callback,
            finished: AtomicBool::new(false),
        }
    }

    pub fn emit(&self, signal: ConnectionSignal) {
        if signal.is_terminal() {
            if self.finished.swap(true, Ordering::SeqCst) {
                tracing::trace!(?signal, "Dropping signal after connection finished");
                return;
            }
        } else if self.finished.load(Ordering::SeqCst) {
            tracing::trace!(?signal, "Dropping signal after connection finished");
            return;
        }

        (self.callback)(signal);
    }
}
