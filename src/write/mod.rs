//! Write engine: cell cursor, style and shared-string indexers, page writer.
//!
//! A [`CellWriter`] emits worksheet XML through an [`ElementWriter`] while
//! registering styles and strings with the document-wide indexers.
//! [`write_resources`] lays mapped resources out on top of it.

pub mod cursor;
pub mod element;
pub mod format;
pub mod page;
pub mod strings;
pub mod style;

pub use cursor::{CellWriter, WritingCell};
pub use element::{ElementWriter, XmlElementWriter};
pub use format::{
    CellBorder, CellBorderLineStyle, CellBorderSide, CellFill, CellFillPatternType, CellFont,
    CellFormat,
};
pub use page::{column_layout, write_resources};
pub use strings::SharedStringIndexer;
pub use style::{StyleIndexer, StyleRef};
