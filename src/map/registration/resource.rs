use std::collections::HashSet;

use super::{Conversion, ResourceRegistration};
use crate::map::{ConversionFailure, Resource, ResourceMapBuilder};
use crate::options::{
    ExplicitConstructorOption, ExtensionEntry, HeaderRowNumber, ImplicitConstructorOption,
    ResourceReadingPolicy,
};

/// Header cells are on this row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderRowRegistration(pub u32);

impl<T: Resource> ResourceRegistration<T> for HeaderRowRegistration {
    fn convert(&self, _builder: &ResourceMapBuilder<T>) -> Conversion {
        if self.0 == 0 {
            return Err(ConversionFailure::new::<Self>("row numbers start at 1"));
        }
        Ok(ExtensionEntry::new(HeaderRowNumber(self.0)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadingPolicyRegistration(pub ResourceReadingPolicy);

impl<T: Resource> ResourceRegistration<T> for ReadingPolicyRegistration {
    fn convert(&self, _builder: &ResourceMapBuilder<T>) -> Conversion {
        Ok(ExtensionEntry::new(self.0))
    }
}

/// Construct resources through the constructor taking the named properties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplicitConstructorRegistration {
    pub names: Vec<String>,
}

impl<T: Resource> ResourceRegistration<T> for ExplicitConstructorRegistration {
    fn convert(&self, _builder: &ResourceMapBuilder<T>) -> Conversion {
        if self.names.is_empty() {
            return Err(ConversionFailure::new::<Self>(
                "an explicit constructor needs at least one property name",
            ));
        }
        let mut seen = HashSet::with_capacity(self.names.len());
        for name in &self.names {
            if name.trim().is_empty() {
                return Err(ConversionFailure::new::<Self>("property names must not be empty"));
            }
            if !seen.insert(name.as_str()) {
                return Err(ConversionFailure::new::<Self>(format!(
                    "property '{}' is named more than once",
                    name
                )));
            }
        }
        Ok(ExtensionEntry::new(ExplicitConstructorOption {
            names: self.names.clone(),
        }))
    }
}

/// Construct resources through the constructor taking every mapped property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImplicitConstructorRegistration;

impl<T: Resource> ResourceRegistration<T> for ImplicitConstructorRegistration {
    fn convert(&self, _builder: &ResourceMapBuilder<T>) -> Conversion {
        Ok(ExtensionEntry::new(ImplicitConstructorOption))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Row;

    impl Resource for Row {}

    #[test]
    fn test_header_row_conversion() {
        let builder = ResourceMapBuilder::<Row>::new();
        let entry = ResourceRegistration::convert(&HeaderRowRegistration(4), &builder).unwrap();
        assert_eq!(entry.downcast_ref::<HeaderRowNumber>(), Some(&HeaderRowNumber(4)));
        assert!(ResourceRegistration::convert(&HeaderRowRegistration(0), &builder).is_err());
    }

    #[test]
    fn test_explicit_constructor_names() {
        let builder = ResourceMapBuilder::<Row>::new();
        let convert = |names: &[&str]| {
            let registration = ExplicitConstructorRegistration {
                names: names.iter().map(|s| s.to_string()).collect(),
            };
            ResourceRegistration::convert(&registration, &builder)
        };

        assert!(convert(&["id", "name"]).is_ok());
        assert!(convert(&[]).is_err());
        let failure = convert(&["id", "id"]).unwrap_err();
        assert_eq!(failure.registration, "ExplicitConstructorRegistration");
        assert!(failure.message.contains("'id'"));
    }
}
