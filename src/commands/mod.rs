//! Command surface for the local user.
//!
//! [`Command::parse`] turns a `/welcomer ...` line into a [`Command`];
//! [`CommandController`] applies it and returns feedback lines.

pub mod controller;
pub mod parser;

pub use controller::{AUTHOR, CommandController, PROJECT_URL, info_lines};
pub use parser::{COMMAND_PREFIX, Command, USAGE, is_command_line};
