//! Warlight bot protocol handling.
//!
//! This module implements parsing of the server's line-oriented commands
//! and serialization of the moves the bot sends back.

pub mod format;
pub mod parser;

pub use format::{format_move, format_moves, NO_MOVES};
pub use parser::{parse_command, parse_moves, Command, ProtocolError};
