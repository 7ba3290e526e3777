//! Presentation surfaces.

pub mod terminal;

pub use terminal::{parse_line, read_intents, ParsedLine, TerminalRenderer};
