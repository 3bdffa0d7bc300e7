//! Step definitions for issue lifecycle behaviour scenarios.

pub mod world;

mod given;
mod then;
mod when;
