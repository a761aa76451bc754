//! Shared utilities for the Hiroba video meeting application.
//!
//! Cross-cutting concerns used by the server (and any future tooling):
//! timestamp helpers and tracing setup.

pub mod logger;
pub mod time;
