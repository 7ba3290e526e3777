//! Session state machine
//!
//! One [`Session`] lives for exactly one game attempt: it is created before a
//! room code is entered and discarded once its connection is gone. All state
//! changes go through [`Session::handle`], which maps an event to the effects
//! the controller must carry out.

mod machine;
mod outcome;
mod phase;

pub use machine::{Session, SessionEffect, SessionEvent};
pub use outcome::{GameOutcome, RoundOutcome, RoundSummary};
pub use phase::SessionPhase;
