//! Matching a header row against the properties of a resource map.

use std::collections::BTreeMap;

use super::RawCell;
use super::failure::{HeaderReadingFailure, InvalidHeaderReadingFailure, MissingHeaderReadingFailure};
use crate::map::ResourceMap;
use crate::options::OptionalElements;

/// Columns of a page and the property read from each, by declaration index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourcePropertyHeaders {
    columns: BTreeMap<u32, usize>,
}

impl ResourcePropertyHeaders {
    /// Property index read from `column`.
    pub fn property_at(&self, column: u32) -> Option<usize> {
        self.columns.get(&column).copied()
    }

    /// Column of the property at `index`.
    pub fn column_of(&self, index: usize) -> Option<u32> {
        self.columns
            .iter()
            .find(|(_, property)| **property == index)
            .map(|(column, _)| *column)
    }

    /// `(column, property index)` pairs, left to right.
    pub fn iter(&self) -> impl Iterator<Item = (u32, usize)> + '_ {
        self.columns.iter().map(|(column, index)| (*column, *index))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Resolve the columns of `map`'s properties from the header cells of `row_number`.
///
/// Numbered keys hold their column whatever the header says. Other keys match
/// a header cell by name or alternate name; the first declared property wins a
/// column. Every other property resolving to a held column is reported as
/// invalid, and unresolved properties not optional in the header are missing.
pub fn resolve_headers<T>(
    map: &ResourceMap<T>,
    row_number: u32,
    cells: &[RawCell],
) -> (ResourcePropertyHeaders, HeaderReadingFailure) {
    let properties = map.properties();
    let mut headers = ResourcePropertyHeaders::default();
    let mut failure = HeaderReadingFailure::new(row_number);
    let mut resolved = vec![false; properties.len()];

    let conflict = |failure: &mut HeaderReadingFailure, column: u32, holder: usize, other: usize| {
        failure.invalid.push(InvalidHeaderReadingFailure {
            column,
            property: properties[holder].name().to_string(),
            key: properties[holder].key().clone(),
            conflicting_property: properties[other].name().to_string(),
            conflicting_key: properties[other].key().clone(),
        });
    };

    for (index, property) in properties.iter().enumerate() {
        let Some(column) = property.key().number() else {
            continue;
        };
        resolved[index] = true;
        match headers.property_at(column) {
            Some(holder) => conflict(&mut failure, column, holder, index),
            None => {
                headers.columns.insert(column, index);
            },
        }
    }

    for cell in cells {
        for (index, property) in properties.iter().enumerate() {
            if resolved[index] || !property.key().matches_name(&cell.text) {
                continue;
            }
            resolved[index] = true;
            match headers.property_at(cell.column) {
                Some(holder) => conflict(&mut failure, cell.column, holder, index),
                None => {
                    headers.columns.insert(cell.column, index);
                },
            }
        }
    }

    for (index, property) in properties.iter().enumerate() {
        if !resolved[index] && !property.is_optional(OptionalElements::HEADER) {
            failure.missing.push(MissingHeaderReadingFailure {
                property: property.name().to_string(),
                key: property.key().clone(),
            });
        }
    }

    tracing::debug!(
        resource = map.resource_name(),
        row = row_number,
        columns = headers.len(),
        missing = failure.missing.len(),
        invalid = failure.invalid.len(),
        "header resolved"
    );
    (headers, failure)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::{Constructor, Resource, ResourceMapBuilder};

    #[derive(Debug, Default)]
    struct Row {
        id: i32,
        name: String,
        code: Option<String>,
    }

    impl Resource for Row {
        fn constructors() -> Vec<Constructor<Self>> {
            vec![Constructor::from_default()]
        }
    }

    fn cells(texts: &[&str]) -> Vec<RawCell> {
        texts
            .iter()
            .enumerate()
            .map(|(i, text)| RawCell::new(i as u32 + 1, *text))
            .collect()
    }

    fn builder() -> ResourceMapBuilder<Row> {
        ResourceMapBuilder::new()
    }

    #[test]
    fn test_names_and_alternates_resolve_columns() {
        let mut builder = builder();
        builder.property("id", |r: &Row| &r.id).unwrap().setter(|r, v| r.id = v);
        builder
            .property("name", |r: &Row| &r.name)
            .unwrap()
            .setter(|r, v| r.name = v)
            .alternate_name("Full name")
            .unwrap();
        builder.property("code", |r: &Row| &r.code).unwrap().setter(|r, v| r.code = v);
        let map = builder.build().unwrap();

        let (headers, failure) = resolve_headers(&map, 1, &cells(&["code", " Full name ", "other", "id"]));
        assert!(failure.is_empty());
        assert_eq!(headers.property_at(1), Some(2));
        assert_eq!(headers.property_at(2), Some(1));
        assert_eq!(headers.property_at(3), None);
        assert_eq!(headers.column_of(0), Some(4));
    }

    #[test]
    fn test_missing_headers_unless_optional() {
        let mut builder = builder();
        builder.property("id", |r: &Row| &r.id).unwrap().setter(|r, v| r.id = v);
        builder.property("name", |r: &Row| &r.name).unwrap().setter(|r, v| r.name = v);
        builder
            .property("code", |r: &Row| &r.code)
            .unwrap()
            .setter(|r, v| r.code = v)
            .optional(OptionalElements::HEADER);
        let map = builder.build().unwrap();

        let (headers, failure) = resolve_headers(&map, 1, &cells(&["id"]));
        assert_eq!(headers.len(), 1);
        assert_eq!(failure.missing.len(), 1);
        assert_eq!(failure.missing[0].property, "name");
        assert!(failure.invalid.is_empty());
    }

    #[test]
    fn test_number_and_name_on_one_column_conflict() {
        let mut builder = builder();
        builder.property("id", |r: &Row| &r.id).unwrap().setter(|r, v| r.id = v);
        builder.property("name", |r: &Row| &r.name).unwrap().setter(|r, v| r.name = v);
        builder
            .property("code", |r: &Row| &r.code)
            .unwrap()
            .setter(|r, v| r.code = v)
            .ignore_name()
            .number(2)
            .unwrap();
        let map = builder.build().unwrap();

        let (_, failure) = resolve_headers(&map, 1, &cells(&["id", "name"]));
        assert!(failure.missing.is_empty());
        assert_eq!(failure.invalid.len(), 1);
        let invalid = &failure.invalid[0];
        assert_eq!(invalid.column, 2);
        assert_eq!(invalid.property, "code");
        assert_eq!(invalid.conflicting_property, "name");
        assert_eq!(invalid.conflicting_key.name(), Some("name"));
    }

    #[test]
    fn test_numbered_keys_need_no_header_cell() {
        let mut builder = builder();
        builder
            .property("id", |r: &Row| &r.id)
            .unwrap()
            .setter(|r, v| r.id = v)
            .number(3)
            .unwrap();
        builder.optional(OptionalElements::HEADER);
        builder.property("name", |r: &Row| &r.name).unwrap().setter(|r, v| r.name = v);
        builder.property("code", |r: &Row| &r.code).unwrap().setter(|r, v| r.code = v);
        let map = builder.build().unwrap();

        let (headers, failure) = resolve_headers(&map, 1, &[]);
        assert!(failure.is_empty());
        assert_eq!(headers.property_at(3), Some(0));
        assert_eq!(headers.len(), 1);
    }
}
