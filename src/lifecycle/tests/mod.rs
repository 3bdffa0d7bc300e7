//! Unit tests for the issue lifecycle.

mod support;
