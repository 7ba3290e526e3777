//! Rock-paper-scissors player client.
//!
//! The session core lives in `application`, the ports it talks through in
//! `ports`, and the WebSocket transport and test doubles in `infrastructure`.
//! `ui` holds the terminal front end used by the binary.

pub mod application;
pub mod config;
pub mod infrastructure;
pub mod ports;
pub mod ui;
