//! Adapter implementations for lifecycle ports.

mod log_dispatcher;
pub mod memory;
pub mod postgres;

pub use log_dispatcher::TracingEventDispatcher;
