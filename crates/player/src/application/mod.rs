//! Application layer: the session state machine and the controller that drives it.

pub mod controller;
pub mod session;

pub use controller::{ControlFlow, SessionController, SessionInput, UserIntent};
pub use session::{Session, SessionEffect, SessionEvent, SessionPhase};
