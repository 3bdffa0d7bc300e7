//! Issue lifecycle workflow engine.
//!
//! Issues move from intake through assignment, triage, implementation, and
//! resolution, and are finally closed when the release they target ships.
//! The module follows hexagonal architecture:
//!
//! - Domain types and the transition function in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
