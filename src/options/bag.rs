use std::fmt;
use std::marker::PhantomData;

use super::{Extension, ExtensionEntry, Extensions};
use crate::common::{Error, Result};
use crate::value::PropertyType;

/// Marker for a bag that still accepts extensions.
#[derive(Debug, Clone, Copy)]
pub enum Draft {}

/// Marker for a bag that can only be read.
#[derive(Debug, Clone, Copy)]
pub enum Frozen {}

/// Options attached to a whole resource map.
pub struct ResourceMapOptions<T, S = Frozen> {
    extensions: Extensions,
    _marker: PhantomData<(fn() -> T, S)>,
}

impl<T, S> ResourceMapOptions<T, S> {
    pub fn find<E: Extension>(&self) -> Option<&E> {
        self.extensions.find::<E>()
    }

    pub fn has<E: Extension>(&self) -> bool {
        self.extensions.has::<E>()
    }

    pub fn extensions(&self) -> &Extensions {
        &self.extensions
    }
}

impl<T> ResourceMapOptions<T, Draft> {
    pub fn new() -> Self {
        Self {
            extensions: Extensions::new(),
            _marker: PhantomData,
        }
    }

    /// Return a bag with `extension` added, replacing any of the same type.
    pub fn with_extension<E: Extension>(self, extension: E) -> Self {
        self.with_entry(ExtensionEntry::new(extension))
    }

    pub fn with_entry(mut self, entry: ExtensionEntry) -> Self {
        self.extensions.insert(entry);
        self
    }

    pub fn freeze(self) -> ResourceMapOptions<T, Frozen> {
        ResourceMapOptions {
            extensions: self.extensions,
            _marker: PhantomData,
        }
    }
}

impl<T> Default for ResourceMapOptions<T, Draft> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, S> Clone for ResourceMapOptions<T, S> {
    fn clone(&self) -> Self {
        Self {
            extensions: self.extensions.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T, S> fmt::Debug for ResourceMapOptions<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceMapOptions")
            .field("extensions", &self.extensions)
            .finish()
    }
}

/// Options attached to one property of a resource map.
///
/// The bag knows the type of its host property and rejects extensions whose
/// allowed kinds exclude it.
pub struct PropertyMapOptions<T, S = Frozen> {
    property_type: PropertyType,
    extensions: Extensions,
    _marker: PhantomData<(fn() -> T, S)>,
}

impl<T, S> PropertyMapOptions<T, S> {
    pub fn property_type(&self) -> PropertyType {
        self.property_type
    }

    pub fn find<E: Extension>(&self) -> Option<&E> {
        self.extensions.find::<E>()
    }

    pub fn has<E: Extension>(&self) -> bool {
        self.extensions.has::<E>()
    }

    pub fn extensions(&self) -> &Extensions {
        &self.extensions
    }
}

impl<T> PropertyMapOptions<T, Draft> {
    pub fn new(property_type: PropertyType) -> Self {
        Self {
            property_type,
            extensions: Extensions::new(),
            _marker: PhantomData,
        }
    }

    /// Return a bag with `extension` added, replacing any of the same type.
    ///
    /// Fails when the extension does not allow the host property's kind.
    pub fn with_extension<E: Extension>(self, extension: E) -> Result<Self> {
        self.with_entry(ExtensionEntry::new(extension))
    }

    pub fn with_entry(mut self, entry: ExtensionEntry) -> Result<Self> {
        self.insert_entry(entry)?;
        Ok(self)
    }

    pub(crate) fn insert_entry(&mut self, entry: ExtensionEntry) -> Result<()> {
        if !self.property_type.allows(entry.allowed_kinds()) {
            return Err(Error::ExtensionNotAllowed {
                extension: entry.name(),
                kind: self.property_type.kind(),
            });
        }
        self.extensions.insert(entry);
        Ok(())
    }

    /// Add `entry` unless the bag already has one of its type or the host
    /// kind is not allowed. Used when cascading resource-level extensions.
    pub fn with_extension_no_overwrite(mut self, entry: ExtensionEntry) -> Self {
        if !self.extensions.contains(entry.id()) && self.property_type.allows(entry.allowed_kinds())
        {
            self.extensions.insert(entry);
        }
        self
    }

    pub fn freeze(self) -> PropertyMapOptions<T, Frozen> {
        PropertyMapOptions {
            property_type: self.property_type,
            extensions: self.extensions,
            _marker: PhantomData,
        }
    }
}

impl<T, S> Clone for PropertyMapOptions<T, S> {
    fn clone(&self) -> Self {
        Self {
            property_type: self.property_type,
            extensions: self.extensions.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T, S> fmt::Debug for PropertyMapOptions<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyMapOptions")
            .field("property_type", &self.property_type)
            .field("extensions", &self.extensions)
            .finish()
    }
}
