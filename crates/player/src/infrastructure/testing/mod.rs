//! Test doubles for the outbound ports.

mod mock_game_connection;

pub use mock_game_connection::{MockGameConnection, MockGameConnector};
