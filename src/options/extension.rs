use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

use crate::value::ValueKind;

/// A typed value stored in an option bag.
///
/// `ALLOWED_KINDS` restricts the property kinds a property-level bag accepts
/// the extension for; an empty set accepts every kind.
pub trait Extension: Any + Clone + fmt::Debug + Send + Sync {
    const ALLOWED_KINDS: &'static [ValueKind] = &[];
}

trait ErasedExtension: Any + fmt::Debug + Send + Sync {
    fn as_any(&self) -> &dyn Any;
}

impl<E: Extension> ErasedExtension for E {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Type-erased extension together with its identity and restrictions.
#[derive(Clone)]
pub struct ExtensionEntry {
    id: TypeId,
    name: &'static str,
    allowed: &'static [ValueKind],
    value: Arc<dyn ErasedExtension>,
}

impl ExtensionEntry {
    pub fn new<E: Extension>(extension: E) -> Self {
        Self {
            id: TypeId::of::<E>(),
            name: short_type_name::<E>(),
            allowed: E::ALLOWED_KINDS,
            value: Arc::new(extension),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn allowed_kinds(&self) -> &'static [ValueKind] {
        self.allowed
    }

    pub fn downcast_ref<E: Extension>(&self) -> Option<&E> {
        self.value.as_any().downcast_ref::<E>()
    }
}

impl fmt::Debug for ExtensionEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.value, f)
    }
}

/// Ordered collection of extensions, at most one per type.
#[derive(Debug, Clone, Default)]
pub struct Extensions {
    entries: Vec<ExtensionEntry>,
}

impl Extensions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn find<E: Extension>(&self) -> Option<&E> {
        let id = TypeId::of::<E>();
        self.entries
            .iter()
            .find(|entry| entry.id == id)
            .and_then(|entry| entry.downcast_ref::<E>())
    }

    pub fn has<E: Extension>(&self) -> bool {
        self.contains(TypeId::of::<E>())
    }

    pub fn contains(&self, id: TypeId) -> bool {
        self.entries.iter().any(|entry| entry.id == id)
    }

    /// Insert an entry, replacing one of the same type in place.
    pub(crate) fn insert(&mut self, entry: ExtensionEntry) {
        match self.entries.iter_mut().find(|existing| existing.id == entry.id) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ExtensionEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Last path segment of a type name, generics included.
pub(crate) fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    match base.rfind("::") {
        Some(pos) => &full[pos + 2..],
        None => full,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Marker(u8);

    impl Extension for Marker {}

    #[derive(Debug, Clone, PartialEq)]
    struct DatesOnly;

    impl Extension for DatesOnly {
        const ALLOWED_KINDS: &'static [ValueKind] = &[ValueKind::Date];
    }

    #[test]
    fn test_insert_replaces_same_type() {
        let mut extensions = Extensions::new();
        extensions.insert(ExtensionEntry::new(Marker(1)));
        extensions.insert(ExtensionEntry::new(DatesOnly));
        extensions.insert(ExtensionEntry::new(Marker(2)));

        assert_eq!(extensions.len(), 2);
        assert_eq!(extensions.find::<Marker>(), Some(&Marker(2)));
        assert!(extensions.has::<DatesOnly>());
    }

    #[test]
    fn test_entry_metadata() {
        let entry = ExtensionEntry::new(DatesOnly);
        assert_eq!(entry.name(), "DatesOnly");
        assert_eq!(entry.allowed_kinds(), &[ValueKind::Date]);
        assert!(entry.downcast_ref::<Marker>().is_none());
        assert_eq!(short_type_name::<Option<Vec<u8>>>(), "Option<alloc::vec::Vec<u8>>");
    }
}
