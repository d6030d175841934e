//! Core vocabulary shared by the kernel and the application layer.
//!
//! - Command: semantic user commands (palette entries, key bindings)

pub mod command;

pub use command::Command;
