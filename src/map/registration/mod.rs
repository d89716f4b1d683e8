//! Registrations: intents declared on a builder, converted to options at
//! build time.
//!
//! A conversion sees the whole builder, so it can check the intent against
//! the rest of the configuration. It reports problems as a
//! [`ConversionFailure`] instead of failing the build on the spot.

mod property;
mod resource;

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

pub use property::{
    BodyStyleRegistration, DateKindRegistration, DefaultValueRegistration,
    HeaderStyleRegistration, OptionalElementsRegistration, StringKindRegistration,
};
pub use resource::{
    ExplicitConstructorRegistration, HeaderRowRegistration, ImplicitConstructorRegistration,
    ReadingPolicyRegistration,
};

use super::{ConversionFailure, PropertyMapBuilder, Resource, ResourceMapBuilder};
use crate::options::{ExtensionEntry, short_type_name};
use crate::value::ValueKind;

/// Outcome of converting one registration.
pub type Conversion = Result<ExtensionEntry, ConversionFailure>;

/// A registration converted against the resource builder.
pub trait ResourceRegistration<T: Resource>: Any + Send + Sync {
    fn convert(&self, builder: &ResourceMapBuilder<T>) -> Conversion;
}

/// A registration converted against one property builder.
///
/// Registered on a resource builder, it is cascaded to every property whose
/// kind is in `allowed_kinds` and that does not declare its own.
pub trait PropertyRegistration<T: Resource>: Any + Send + Sync {
    /// Kinds of property the registration may attach to; empty means any.
    fn allowed_kinds(&self) -> &'static [ValueKind] {
        &[]
    }

    fn convert(&self, builder: &PropertyMapBuilder<T>) -> Conversion;
}

struct RegistrationSlot<R: ?Sized> {
    id: TypeId,
    name: &'static str,
    any: Arc<dyn Any + Send + Sync>,
    registration: Arc<R>,
}

impl<R: ?Sized> Clone for RegistrationSlot<R> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            name: self.name,
            any: Arc::clone(&self.any),
            registration: Arc::clone(&self.registration),
        }
    }
}

/// Registrations of a builder, at most one per registration type, in the
/// order they were first declared.
pub struct Registrations<R: ?Sized> {
    slots: Vec<RegistrationSlot<R>>,
}

impl<R: ?Sized> Registrations<R> {
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    pub fn find<X: Any>(&self) -> Option<&X> {
        let id = TypeId::of::<X>();
        self.slots
            .iter()
            .find(|slot| slot.id == id)
            .and_then(|slot| slot.any.downcast_ref::<X>())
    }

    pub fn contains<X: Any>(&self) -> bool {
        let id = TypeId::of::<X>();
        self.slots.iter().any(|slot| slot.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &R> {
        self.slots.iter().map(|slot| slot.registration.as_ref())
    }

    /// Registrations paired with their type names.
    pub fn entries(&self) -> impl Iterator<Item = (&'static str, &R)> {
        self.slots
            .iter()
            .map(|slot| (slot.name, slot.registration.as_ref()))
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.slots.iter().map(|slot| slot.name)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Insert `slot`; with `replace` unset an existing slot of the same type
    /// wins and `false` is returned.
    fn insert(&mut self, slot: RegistrationSlot<R>, replace: bool) -> bool {
        match self.slots.iter_mut().find(|existing| existing.id == slot.id) {
            Some(existing) if replace => {
                *existing = slot;
                true
            },
            Some(_) => false,
            None => {
                self.slots.push(slot);
                true
            },
        }
    }
}

impl<R: ?Sized> Default for Registrations<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: ?Sized> fmt::Debug for Registrations<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

impl<T: Resource> Registrations<dyn ResourceRegistration<T>> {
    /// Declare `registration`, replacing one of the same type.
    pub fn set<X: ResourceRegistration<T>>(&mut self, registration: X) {
        let registration = Arc::new(registration);
        self.insert(
            RegistrationSlot {
                id: TypeId::of::<X>(),
                name: short_type_name::<X>(),
                any: registration.clone(),
                registration,
            },
            true,
        );
    }
}

impl<T: Resource> Registrations<dyn PropertyRegistration<T>> {
    /// Declare `registration`, replacing one of the same type.
    pub fn set<X: PropertyRegistration<T>>(&mut self, registration: X) {
        self.insert(Self::slot(registration), true);
    }

    /// Declare `registration` for a property of `kind`.
    ///
    /// Returns `false` when the registration does not allow `kind` or one of
    /// the same type is already present.
    pub fn try_add<X: PropertyRegistration<T>>(&mut self, registration: X, kind: ValueKind) -> bool {
        self.try_insert(Self::slot(registration), kind)
    }

    /// Copy every registration of `source` that `kind` allows and that is not
    /// already declared here.
    pub(crate) fn cascade_from(&mut self, source: &Self, kind: ValueKind) -> usize {
        let mut added = 0;
        for slot in &source.slots {
            if self.try_insert(RegistrationSlot::clone(slot), kind) {
                added += 1;
            }
        }
        added
    }

    fn try_insert(&mut self, slot: RegistrationSlot<dyn PropertyRegistration<T>>, kind: ValueKind) -> bool {
        let allowed = slot.registration.allowed_kinds();
        if !allowed.is_empty() && !allowed.contains(&kind) {
            return false;
        }
        self.insert(slot, false)
    }

    fn slot<X: PropertyRegistration<T>>(registration: X) -> RegistrationSlot<dyn PropertyRegistration<T>> {
        let registration = Arc::new(registration);
        RegistrationSlot {
            id: TypeId::of::<X>(),
            name: short_type_name::<X>(),
            any: registration.clone(),
            registration,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{DateKind, OptionalElements, StringKind};

    struct Row;

    impl Resource for Row {}

    #[test]
    fn test_set_replaces_and_try_add_keeps() {
        let mut registrations = Registrations::<dyn PropertyRegistration<Row>>::new();
        registrations.set(OptionalElementsRegistration(OptionalElements::HEADER));
        registrations.set(OptionalElementsRegistration(OptionalElements::BODY));
        assert!(!registrations.try_add(
            OptionalElementsRegistration(OptionalElements::ALL),
            ValueKind::Text
        ));

        assert_eq!(registrations.len(), 1);
        assert_eq!(
            registrations.find::<OptionalElementsRegistration>(),
            Some(&OptionalElementsRegistration(OptionalElements::BODY))
        );
    }

    #[test]
    fn test_try_add_rejects_disallowed_kind() {
        let mut registrations = Registrations::<dyn PropertyRegistration<Row>>::new();
        assert!(!registrations.try_add(DateKindRegistration(DateKind::Text), ValueKind::Integer));
        assert!(registrations.is_empty());

        assert!(registrations.try_add(DateKindRegistration(DateKind::Text), ValueKind::Date));
        assert!(!registrations.try_add(DateKindRegistration(DateKind::Serial), ValueKind::Date));
        assert_eq!(
            registrations.find::<DateKindRegistration>(),
            Some(&DateKindRegistration(DateKind::Text))
        );
    }

    #[test]
    fn test_cascade_respects_kinds_and_existing() {
        let mut resource_level = Registrations::<dyn PropertyRegistration<Row>>::new();
        resource_level.set(OptionalElementsRegistration(OptionalElements::ALL));
        resource_level.set(DateKindRegistration(DateKind::Text));
        resource_level.set(StringKindRegistration(StringKind::Inline));

        let mut text_property = Registrations::<dyn PropertyRegistration<Row>>::new();
        text_property.set(OptionalElementsRegistration(OptionalElements::BODY));
        let added = text_property.cascade_from(&resource_level, ValueKind::Text);

        assert_eq!(added, 1);
        assert!(text_property.contains::<StringKindRegistration>());
        assert!(!text_property.contains::<DateKindRegistration>());
        assert_eq!(
            text_property.find::<OptionalElementsRegistration>(),
            Some(&OptionalElementsRegistration(OptionalElements::BODY))
        );
    }
}
