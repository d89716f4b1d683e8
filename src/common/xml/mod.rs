//! XML text helpers shared by the element reader and writer.

pub mod entity;
pub mod escape;

pub use entity::resolve_entity;
pub use escape::escape_xml;
