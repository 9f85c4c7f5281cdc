//! Chat command parsing

pub mod parser;

pub use parser::{parse_command, parse_target, Command, ParseError};
