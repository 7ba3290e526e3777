//! Ports - the seams between the session core and the outside world.

pub mod outbound;
