//! Read engine: header resolution and body resolution over a forward-only
//! cell cursor.
//!
//! [`PageReader::read_all`] is the usual entry point. [`ResourceReader`]
//! exposes the same steps one row at a time.

pub mod body;
pub mod cursor;
pub mod element;
pub mod failure;
pub mod header;
pub mod reader;

pub use body::resolve_row;
pub use cursor::{CellCursor, RawCell};
pub use element::{ElementReader, XmlElementReader};
pub use failure::{
    HeaderReadingFailure, InvalidHeaderReadingFailure, InvalidResourcePropertyReadingFailure,
    MissingHeaderReadingFailure, MissingResourcePropertyReadingFailure, NumberedResource,
    ResourceReadingFailure, ResourceReadingResult,
};
pub use header::{ResourcePropertyHeaders, resolve_headers};
pub use reader::{PageReader, ResourceReader, RowReading};
