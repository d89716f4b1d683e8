use std::fmt;

use super::{PropertyAccessor, PropertyMapKey};
use crate::options::{
    BodyStyle, DateKind, DefaultValue, HeaderStyle, OptionalElements, PropertyMapOptions,
    StringKind,
};
use crate::value::PropertyType;
use crate::write::StyleRef;

/// Immutable binding of one resource property to a key and options.
pub struct PropertyMap<T> {
    name: String,
    accessor: PropertyAccessor<T>,
    key: PropertyMapKey,
    options: PropertyMapOptions<T>,
}

impl<T> PropertyMap<T> {
    pub(crate) fn new(
        name: String,
        accessor: PropertyAccessor<T>,
        key: PropertyMapKey,
        options: PropertyMapOptions<T>,
    ) -> Self {
        Self {
            name,
            accessor,
            key,
            options,
        }
    }

    /// Name the property was declared with.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn accessor(&self) -> &PropertyAccessor<T> {
        &self.accessor
    }

    pub fn key(&self) -> &PropertyMapKey {
        &self.key
    }

    pub fn options(&self) -> &PropertyMapOptions<T> {
        &self.options
    }

    pub fn property_type(&self) -> PropertyType {
        self.accessor.property_type()
    }

    /// Whether the property may be absent from every element in `elements`.
    pub fn is_optional(&self, elements: OptionalElements) -> bool {
        self.options
            .find::<OptionalElements>()
            .is_some_and(|optional| optional.contains(elements))
    }

    pub fn default_value(&self) -> Option<&DefaultValue> {
        self.options.find::<DefaultValue>()
    }

    pub fn header_style(&self) -> Option<&StyleRef> {
        self.options.find::<HeaderStyle>().map(|style| &style.0)
    }

    pub fn body_style(&self) -> Option<&StyleRef> {
        self.options.find::<BodyStyle>().map(|style| &style.0)
    }

    pub fn date_kind(&self) -> DateKind {
        self.options.find::<DateKind>().copied().unwrap_or_default()
    }

    pub fn string_kind(&self) -> StringKind {
        self.options.find::<StringKind>().copied().unwrap_or_default()
    }
}

impl<T> Clone for PropertyMap<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            accessor: self.accessor.clone(),
            key: self.key.clone(),
            options: self.options.clone(),
        }
    }
}

impl<T> fmt::Debug for PropertyMap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyMap")
            .field("name", &self.name)
            .field("key", &self.key)
            .field("accessor", &self.accessor)
            .field("options", &self.options)
            .finish()
    }
}
