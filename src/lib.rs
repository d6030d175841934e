//! mdspace - headless core of a markdown document workspace
//!
//! Module layout:
//! - core: shared vocabulary (Command)
//! - kernel: state, actions, effects, store, reconciliation, search, services
//! - app: host layer (Workbench) that executes effects

pub mod app;
pub mod core;
pub mod kernel;
