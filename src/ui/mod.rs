mod commands;
mod terminal;

pub use commands::{Command, COMMAND_BOX};
pub use terminal::{TerminalUI, TerminalView};
