//! Sheet Cartographer - declarative mapping of Rust records to and from
//! spreadsheet rows
//!
//! A resource type is described once with a fluent [`ResourceMapBuilder`]:
//! which properties map to which header names or column numbers, how missing or
//! unparsable cells are defaulted, how cells are styled, and how resources are
//! constructed. Building checks the whole configuration at once and either
//! produces an immutable [`ResourceMap`] or reports every problem found.
//!
//! The same map then drives both directions:
//!
//! - **Reading**: the header row is matched against the map's keys, then each
//!   body row is parsed, defaulted and turned into a resource. Failures are
//!   returned as data next to the resources that did read.
//! - **Writing**: a header row followed by one row per resource, with shared
//!   strings and styles de-duplicated across the document.
//!
//! # Example
//!
//! ```
//! use sheet_cartographer::document::Document;
//! use sheet_cartographer::{Cartographer, Constructor, Resource, ResourceMapBuilder, Result};
//!
//! #[derive(Debug, Clone, PartialEq)]
//! struct Person {
//!     id: i32,
//!     name: String,
//! }
//!
//! impl Resource for Person {
//!     fn constructors() -> Vec<Constructor<Self>> {
//!         vec![Constructor::new(|(id, name): (i32, String)| Person { id, name })]
//!     }
//! }
//!
//! # fn main() -> Result<()> {
//! let cartographer = Cartographer::builder()
//!     .register(|builder: &mut ResourceMapBuilder<Person>| -> Result<()> {
//!         builder.implicit_constructor();
//!         builder.property("id", |p: &Person| &p.id)?.name("Id")?;
//!         builder.property("name", |p: &Person| &p.name)?.name("Name")?;
//!         Ok(())
//!     })?
//!     .build();
//! let map = cartographer.get_map::<Person>().expect("map is valid");
//!
//! let people = vec![Person { id: 1, name: "Alice".into() }];
//! let mut document = Document::new();
//! document.write_page("People", map, &people)?;
//!
//! let read = document.read_all("People", map)?;
//! assert!(read.is_success());
//! assert_eq!(read.into_resources(), people);
//! # Ok(())
//! # }
//! ```

/// Errors, cell references, serial dates and XML helpers
pub mod common;

/// Value kinds, dynamic cell values and typed property values
pub mod value;

/// Option bags and the standard options
pub mod options;

/// Resource map configuration, build and validation
pub mod map;

/// Registry of built resource maps
pub mod cartographer;

/// Header and body resolution over a forward-only cell cursor
pub mod read;

/// Cell cursor, style and shared-string indexers, page writer
pub mod write;

/// In-memory document holding worksheet parts and their shared tables
pub mod document;

// Re-export commonly used types for convenience
pub use cartographer::{Cartographer, CartographerBuilder, CartographerError, ResourceMapConfiguration};
pub use common::{Error, Result};
pub use map::{
    Constructor, PropertyMapKey, Resource, ResourceMap, ResourceMapBuilder, ResourceMapError,
};
pub use options::{DateKind, OptionalElements, ResourceReadingPolicy, StringKind};
pub use value::{PropertyValue, Resolutions, Value, ValueKind};
