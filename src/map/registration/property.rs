use super::{Conversion, PropertyRegistration};
use crate::map::{ConversionFailure, PropertyMapBuilder, Resource};
use crate::options::{
    BodyStyle, DateKind, DefaultValue, Extension, ExtensionEntry, HeaderStyle, OptionalElements,
    StringKind,
};
use crate::value::{Resolutions, Value, ValueKind};
use crate::write::StyleRef;

/// The property may be absent from the given elements of a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionalElementsRegistration(pub OptionalElements);

impl<T: Resource> PropertyRegistration<T> for OptionalElementsRegistration {
    fn convert(&self, _builder: &PropertyMapBuilder<T>) -> Conversion {
        Ok(ExtensionEntry::new(self.0))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeaderStyleRegistration(pub StyleRef);

impl<T: Resource> PropertyRegistration<T> for HeaderStyleRegistration {
    fn convert(&self, _builder: &PropertyMapBuilder<T>) -> Conversion {
        Ok(ExtensionEntry::new(HeaderStyle(self.0.clone())))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BodyStyleRegistration(pub StyleRef);

impl<T: Resource> PropertyRegistration<T> for BodyStyleRegistration {
    fn convert(&self, _builder: &PropertyMapBuilder<T>) -> Conversion {
        Ok(ExtensionEntry::new(BodyStyle(self.0.clone())))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateKindRegistration(pub DateKind);

impl<T: Resource> PropertyRegistration<T> for DateKindRegistration {
    fn allowed_kinds(&self) -> &'static [ValueKind] {
        DateKind::ALLOWED_KINDS
    }

    fn convert(&self, _builder: &PropertyMapBuilder<T>) -> Conversion {
        Ok(ExtensionEntry::new(self.0))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StringKindRegistration(pub StringKind);

impl<T: Resource> PropertyRegistration<T> for StringKindRegistration {
    fn allowed_kinds(&self) -> &'static [ValueKind] {
        StringKind::ALLOWED_KINDS
    }

    fn convert(&self, _builder: &PropertyMapBuilder<T>) -> Conversion {
        Ok(ExtensionEntry::new(self.0))
    }
}

/// Substitute `value` for cells classified as one of `resolutions`.
#[derive(Debug, Clone, PartialEq)]
pub struct DefaultValueRegistration {
    pub value: Value,
    pub resolutions: Resolutions,
}

impl<T: Resource> PropertyRegistration<T> for DefaultValueRegistration {
    fn convert(&self, builder: &PropertyMapBuilder<T>) -> Conversion {
        if self.resolutions.is_empty() {
            return Err(ConversionFailure::new::<Self>(
                "a default value must resolve at least one classification",
            ));
        }
        let property_type = builder.property_type();
        if !property_type.accepts(&self.value) {
            return Err(ConversionFailure::new::<Self>(format!(
                "default {:?} does not fit a property of type {}",
                self.value, property_type
            )));
        }
        Ok(ExtensionEntry::new(DefaultValue {
            value: self.value.clone(),
            resolutions: self.resolutions,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::ResourceMapBuilder;

    #[derive(Default)]
    struct Row {
        count: i32,
    }

    impl Resource for Row {}

    #[test]
    fn test_default_value_checks() {
        let mut builder = ResourceMapBuilder::<Row>::new();
        builder.property("count", |row: &Row| &row.count).unwrap();
        let property = builder.property_builder("count").unwrap();

        let valid = DefaultValueRegistration {
            value: Value::Integer(0),
            resolutions: Resolutions::MISSING,
        };
        let entry = valid.convert(property).unwrap();
        assert_eq!(
            entry.downcast_ref::<DefaultValue>().map(|d| d.resolutions),
            Some(Resolutions::MISSING)
        );

        let no_resolutions = DefaultValueRegistration {
            value: Value::Integer(0),
            resolutions: Resolutions::empty(),
        };
        assert!(no_resolutions.convert(property).is_err());

        let wrong_kind = DefaultValueRegistration {
            value: Value::from("zero"),
            resolutions: Resolutions::ALL,
        };
        assert!(wrong_kind.convert(property).is_err());
    }
}
