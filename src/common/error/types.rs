//! Error type for contract violations.
use thiserror::Error;

use crate::value::ValueKind;

/// Main error type for sheet-cartographer operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// An argument was outside its documented domain (zero row, empty name, ...).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// An extension was attached to a property whose kind it does not allow.
    #[error("Extension '{extension}' is not allowed on a property of kind {kind:?}")]
    ExtensionNotAllowed {
        extension: &'static str,
        kind: ValueKind,
    },

    /// The write cursor was asked to move behind its current position.
    #[error("Cannot move the cursor from {current} back to {requested}")]
    CursorBehind { current: String, requested: String },

    /// The write cursor was used after `finish`.
    #[error("The page writer has already been finished")]
    WriterFinished,

    /// Two properties were laid out on the same column.
    #[error("Column {column} is claimed by both '{first}' and '{second}'")]
    ColumnConflict {
        column: u32,
        first: String,
        second: String,
    },

    /// Named page does not exist in the document.
    #[error("Page not found: {0}")]
    PageNotFound(String),

    /// A page with the same name already exists in the document.
    #[error("Page already exists: {0}")]
    DuplicatePage(String),

    /// XML parsing error
    #[error("XML error: {0}")]
    Xml(String),
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::Xml(err.to_string())
    }
}

impl From<std::fmt::Error> for Error {
    fn from(err: std::fmt::Error) -> Self {
        Error::Xml(format!("XML write error: {}", err))
    }
}

/// Result type for sheet-cartographer operations.
pub type Result<T> = std::result::Result<T, Error>;
