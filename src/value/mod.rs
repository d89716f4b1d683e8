//! Values flowing between resources and cells.
//!
//! A mapped property has a static Rust type implementing [`PropertyValue`].
//! Between the typed world and the cell world values travel as the dynamic
//! [`Value`]; restrictions on options are expressed over [`ValueKind`].

mod kind;
mod parse;
mod property_value;

pub use kind::{PropertyType, Value, ValueKind};
pub use parse::{CellParse, Resolutions, classify};
pub use property_value::{PropertyValue, TemporalValue, TextValue};
