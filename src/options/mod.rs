//! Type-keyed option bags and the standard options stored in them.
//!
//! A bag starts out as a [`Draft`] and is turned into a [`Frozen`] bag once
//! the map that owns it is assembled. Only drafts can gain extensions, so
//! mutating a frozen bag does not compile.

mod bag;
mod extension;
mod standard;

pub use bag::{Draft, Frozen, PropertyMapOptions, ResourceMapOptions};
pub use extension::{Extension, ExtensionEntry, Extensions};
pub(crate) use extension::short_type_name;
pub use standard::{
    BodyStyle, DateKind, DefaultValue, ExplicitConstructorOption, HeaderRowNumber, HeaderStyle,
    ImplicitConstructorOption, OptionalElements, ResourceReadingPolicy, StringKind,
};
