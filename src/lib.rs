//! Issue lifecycle workflow engine.
//!
//! Tracks issues through triage, resolution, and release-bound closure,
//! independent of any tracker UI. Callers submit commands against issues;
//! the engine validates each command against the issue's current state and
//! the release catalogue, commits the transition with its events, and hands
//! the events to an external dispatcher.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain**: Pure lifecycle rules with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for storage and event delivery
//! - **Adapters**: In-memory, logging, and `PostgreSQL` implementations
//!
//! # Modules
//!
//! - [`lifecycle`]: Issue state machine, release catalogue, and services

pub mod lifecycle;
