//! Reading results and the structured failures reported alongside them.

use serde::Serialize;

use crate::map::PropertyMapKey;

/// A mapped property whose header cell was not found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingHeaderReadingFailure {
    pub property: String,
    pub key: PropertyMapKey,
}

/// Two properties resolved to the same header column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvalidHeaderReadingFailure {
    pub column: u32,
    /// The property holding the column.
    pub property: String,
    pub key: PropertyMapKey,
    /// The property that also matched it.
    pub conflicting_property: String,
    pub conflicting_key: PropertyMapKey,
}

/// Everything wrong with a page's header row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderReadingFailure {
    pub row_number: u32,
    /// The header row itself does not exist.
    pub is_missing_row: bool,
    pub missing: Vec<MissingHeaderReadingFailure>,
    pub invalid: Vec<InvalidHeaderReadingFailure>,
}

impl HeaderReadingFailure {
    pub fn new(row_number: u32) -> Self {
        Self {
            row_number,
            is_missing_row: false,
            missing: Vec::new(),
            invalid: Vec::new(),
        }
    }

    pub fn missing_row(row_number: u32) -> Self {
        Self {
            is_missing_row: true,
            ..Self::new(row_number)
        }
    }

    pub fn is_empty(&self) -> bool {
        !self.is_missing_row && self.missing.is_empty() && self.invalid.is_empty()
    }
}

/// A property without a usable cell in a body row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingResourcePropertyReadingFailure {
    pub property: String,
    /// `None` when the property has no column on the page.
    pub column: Option<u32>,
}

/// A property whose cell text could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvalidResourcePropertyReadingFailure {
    pub property: String,
    pub column: u32,
    pub text: String,
}

/// Why a body row produced no resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceReadingFailure {
    pub row_number: u32,
    pub missing: Vec<MissingResourcePropertyReadingFailure>,
    pub invalid: Vec<InvalidResourcePropertyReadingFailure>,
}

impl ResourceReadingFailure {
    pub fn new(row_number: u32) -> Self {
        Self {
            row_number,
            missing: Vec::new(),
            invalid: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.missing.is_empty() && self.invalid.is_empty()
    }
}

/// A body row and the resource read from it; `None` for a blank row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumberedResource<T> {
    pub row_number: u32,
    pub resource: Option<T>,
}

/// Outcome of reading every resource on a page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceReadingResult<T> {
    pub resources: Vec<NumberedResource<T>>,
    pub header_failure: Option<HeaderReadingFailure>,
    pub resource_failures: Vec<ResourceReadingFailure>,
}

impl<T> ResourceReadingResult<T> {
    pub fn is_success(&self) -> bool {
        self.header_failure.is_none() && self.resource_failures.is_empty()
    }

    /// The resources, dropping their row numbers.
    pub fn into_resources(self) -> Vec<T> {
        self.resources
            .into_iter()
            .filter_map(|numbered| numbered.resource)
            .collect()
    }
}

impl<T> Default for ResourceReadingResult<T> {
    fn default() -> Self {
        Self {
            resources: Vec::new(),
            header_failure: None,
            resource_failures: Vec::new(),
        }
    }
}
