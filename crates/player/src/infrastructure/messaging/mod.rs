//! Connection lifecycle messaging primitives.
//!
//! This module provides the pieces shared between a connection handle and the
//! task that drives its transport:
//! - `ConnectionStateCell`: lock-free, shareable connection state
//! - `SignalDispatcher`: ordered, terminate-once delivery of lifecycle signals
//!
//! The WebSocket connector (in the websocket module) wires these to the actual transport.

pub mod connection;

pub use connection::{ConnectionStateCell, SignalDispatcher};
