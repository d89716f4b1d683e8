//! Contract-violation errors shared across the crate.
//!
//! These are programmer errors raised immediately to the caller: zero row or
//! column numbers, empty names, extensions a property kind does not allow,
//! cursor misuse and malformed worksheet XML. Domain failures (build-time
//! conversions, read-time header and body failures) are values, not errors,
//! and live next to the code that produces them.

// Submodule declarations
pub mod types;

// Re-exports
pub use types::{Error, Result};
