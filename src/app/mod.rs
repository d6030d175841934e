//! Application layer: wires the store to real I/O.

pub mod workbench;

pub use workbench::Workbench;
