//! Application services orchestrating issue lifecycle operations.

mod command;
mod config;
mod lifecycle;
mod locks;

pub use command::{CommandRequest, CommandRequestError};
pub use config::LifecycleConfig;
pub use lifecycle::{
    CloseFailure, CloseReleaseReport, CommandOutcome, LifecycleResult, LifecycleService,
    LifecycleServiceError,
};
pub use locks::IssueLocks;
