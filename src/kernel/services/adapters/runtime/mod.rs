//! Async runtime adapter: executes IO effects and sends completions back to the workbench.

mod async_runtime;
mod message;

pub use async_runtime::AsyncRuntime;
pub use message::AppMessage;
