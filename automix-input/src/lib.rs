//! Modal keyboard input handling for automix

mod commands;
mod modal;

pub use commands::{Command, Direction, View};
pub use modal::{InputHandler, Mode};
