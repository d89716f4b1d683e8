//! Aggregated build failures.
//!
//! Building a map never stops at the first problem: every failed conversion
//! and every failed structural check is collected into these values.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use super::ValidationFailure;
use crate::options::short_type_name;

/// A registration that could not be turned into an option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("{registration}: {message}")]
pub struct ConversionFailure {
    /// Type name of the failing registration.
    pub registration: &'static str,
    pub message: String,
}

impl ConversionFailure {
    pub fn new<R: ?Sized>(message: impl Into<String>) -> Self {
        Self {
            registration: short_type_name::<R>(),
            message: message.into(),
        }
    }
}

/// Every conversion failure of one property.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyMapError {
    pub property: String,
    pub failures: Vec<ConversionFailure>,
}

impl fmt::Display for PropertyMapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "property '{}' could not be mapped", self.property)?;
        for failure in &self.failures {
            write!(f, "; {}", failure)?;
        }
        Ok(())
    }
}

impl std::error::Error for PropertyMapError {}

/// Every failure collected while building one resource map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceMapError {
    /// Type name of the resource.
    pub resource: &'static str,
    pub conversion_failures: Vec<ConversionFailure>,
    pub property_errors: Vec<PropertyMapError>,
    pub validation_failures: Vec<ValidationFailure>,
}

impl ResourceMapError {
    pub(crate) fn new(resource: &'static str) -> Self {
        Self {
            resource,
            conversion_failures: Vec::new(),
            property_errors: Vec::new(),
            validation_failures: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.conversion_failures.is_empty()
            && self.property_errors.is_empty()
            && self.validation_failures.is_empty()
    }

    /// Total number of individual failures.
    pub fn failure_count(&self) -> usize {
        self.conversion_failures.len()
            + self
                .property_errors
                .iter()
                .map(|error| error.failures.len())
                .sum::<usize>()
            + self.validation_failures.len()
    }
}

impl fmt::Display for ResourceMapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "resource map for '{}' failed to build with {} failure(s)",
            self.resource,
            self.failure_count()
        )?;
        for failure in &self.conversion_failures {
            write!(f, "\n  {}", failure)?;
        }
        for error in &self.property_errors {
            write!(f, "\n  {}", error)?;
        }
        for failure in &self.validation_failures {
            write!(f, "\n  {}", failure)?;
        }
        Ok(())
    }
}

impl std::error::Error for ResourceMapError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::HeaderRowNumber;

    #[test]
    fn test_display_lists_every_failure() {
        let mut error = ResourceMapError::new("Person");
        error
            .conversion_failures
            .push(ConversionFailure::new::<HeaderRowNumber>("zero"));
        error.property_errors.push(PropertyMapError {
            property: "name".into(),
            failures: vec![ConversionFailure::new::<str>("bad"), ConversionFailure::new::<str>("worse")],
        });
        error.validation_failures.push(ValidationFailure::DuplicateConstructor);

        assert_eq!(error.failure_count(), 4);
        let text = error.to_string();
        assert!(text.starts_with("resource map for 'Person' failed to build with 4 failure(s)"));
        assert!(text.contains("HeaderRowNumber: zero"));
        assert!(text.contains("property 'name' could not be mapped; str: bad; str: worse"));
    }
}
