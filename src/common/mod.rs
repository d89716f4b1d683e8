//! Common types and utilities shared by the mapping, reading and writing layers.

// Submodule declarations
pub mod date;
pub mod element;
pub mod error;
pub mod reference;
pub mod xml;

// Re-exports for convenience
pub use element::{AttributeKind, ElementKind};
pub use error::{Error, Result};
pub use reference::{cell_reference, column_to_letters, letters_to_column, parse_cell_reference};
