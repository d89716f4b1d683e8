//! Resolving body rows into resources.

use super::failure::{
    InvalidResourcePropertyReadingFailure, MissingResourcePropertyReadingFailure, NumberedResource,
    ResourceReadingFailure,
};
use super::{RawCell, ResourcePropertyHeaders};
use crate::map::{PropertyMap, ResourceMap};
use crate::options::OptionalElements;
use crate::value::{CellParse, Value};

/// Value of one property on one row.
enum Resolved {
    Value(Value),
    Unset,
    Missing,
    Invalid(String),
}

fn resolve_property<T>(
    property: &PropertyMap<T>,
    required: bool,
    raw: Option<&str>,
) -> Resolved {
    let parse = property.accessor().classify(raw);
    if let CellParse::Success(value) = parse {
        return Resolved::Value(value);
    }
    let resolution = parse.resolution();

    if let Some(resolution) = resolution
        && let Some(value) = property
            .default_value()
            .and_then(|default| default.resolve(resolution))
    {
        return Resolved::Value(value.clone());
    }
    if !required && property.is_optional(OptionalElements::BODY) {
        return Resolved::Unset;
    }
    match parse {
        CellParse::Invalid(text) => Resolved::Invalid(text),
        _ => Resolved::Missing,
    }
}

/// Read the resource on `row_number` from its cells.
///
/// Rows with no text in any resolved column are blank and yield no resource.
/// Properties without a column are only read when the construction plan
/// needs them.
pub fn resolve_row<T>(
    map: &ResourceMap<T>,
    headers: &ResourcePropertyHeaders,
    row_number: u32,
    cells: &[RawCell],
) -> Result<NumberedResource<T>, ResourceReadingFailure> {
    let cell_at = |column: u32| cells.iter().find(|cell| cell.column == column);

    let blank = headers
        .iter()
        .all(|(column, _)| cell_at(column).is_none_or(|cell| cell.text.is_empty()));
    if blank {
        tracing::trace!(row = row_number, "blank row skipped");
        return Ok(NumberedResource {
            row_number,
            resource: None,
        });
    }

    let plan = map.plan();
    let mut failure = ResourceReadingFailure::new(row_number);
    let mut values = Vec::with_capacity(map.properties().len());

    for (index, property) in map.properties().iter().enumerate() {
        let required = plan.requires(index);
        let column = headers.column_of(index);
        if column.is_none() && !required {
            values.push(None);
            continue;
        }

        // A valueless cell reads as absent for nullable properties
        let nullable = property.accessor().property_type().is_nullable();
        let raw = column
            .and_then(cell_at)
            .filter(|cell| cell.has_value || !nullable)
            .map(|cell| cell.text.as_str());

        match resolve_property(property, required, raw) {
            Resolved::Value(value) => values.push(Some(value)),
            Resolved::Unset => values.push(None),
            Resolved::Missing => {
                values.push(None);
                failure.missing.push(MissingResourcePropertyReadingFailure {
                    property: property.name().to_string(),
                    column,
                });
            },
            Resolved::Invalid(text) => {
                values.push(None);
                failure.invalid.push(InvalidResourcePropertyReadingFailure {
                    property: property.name().to_string(),
                    // only cells that exist can be invalid
                    column: column.unwrap_or_default(),
                    text,
                });
            },
        }
    }

    if !failure.is_empty() {
        tracing::trace!(
            row = row_number,
            missing = failure.missing.len(),
            invalid = failure.invalid.len(),
            "row failed"
        );
        return Err(failure);
    }

    let unset: Vec<usize> = values
        .iter()
        .enumerate()
        .filter(|(index, value)| value.is_none() && plan.requires(*index))
        .map(|(index, _)| index)
        .collect();

    match map.construct(values) {
        Some(resource) => {
            tracing::trace!(row = row_number, "resource read");
            Ok(NumberedResource {
                row_number,
                resource: Some(resource),
            })
        },
        None => {
            tracing::warn!(
                resource = map.resource_name(),
                row = row_number,
                "constructor rejected the row's values"
            );
            for index in unset {
                failure.missing.push(MissingResourcePropertyReadingFailure {
                    property: map.properties()[index].name().to_string(),
                    column: headers.column_of(index),
                });
            }
            Err(failure)
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::{Constructor, Resource, ResourceMapBuilder};
    use crate::read::resolve_headers;
    use crate::value::Resolutions;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        sku: String,
        qty: u32,
        price: Option<f64>,
    }

    impl Resource for Item {
        fn constructors() -> Vec<Constructor<Self>> {
            vec![Constructor::new(|(sku, qty, price): (String, u32, Option<f64>)| Item {
                sku,
                qty,
                price,
            })]
        }
    }

    fn row(texts: &[(u32, &str)]) -> Vec<RawCell> {
        texts
            .iter()
            .map(|(column, text)| RawCell::new(*column, *text))
            .collect()
    }

    fn item_map(qty_default: Option<Resolutions>) -> ResourceMap<Item> {
        let mut builder = ResourceMapBuilder::<Item>::new();
        builder.implicit_constructor();
        builder.property("sku", |i: &Item| &i.sku).unwrap();
        let qty = builder.property("qty", |i: &Item| &i.qty).unwrap();
        if let Some(resolutions) = qty_default {
            qty.default_value(1, resolutions);
        }
        builder.property("price", |i: &Item| &i.price).unwrap();
        builder.build().unwrap()
    }

    fn headers(map: &ResourceMap<Item>) -> ResourcePropertyHeaders {
        let (headers, failure) =
            resolve_headers(map, 1, &row(&[(1, "sku"), (2, "qty"), (3, "price")]));
        assert!(failure.is_empty());
        headers
    }

    #[test]
    fn test_row_builds_resource() {
        let map = item_map(None);
        let headers = headers(&map);
        let read =
            resolve_row(&map, &headers, 2, &row(&[(1, "A-1"), (2, "3"), (3, "9.5")])).unwrap();
        assert_eq!(
            read.resource,
            Some(Item {
                sku: "A-1".into(),
                qty: 3,
                price: Some(9.5),
            })
        );
        assert_eq!(read.row_number, 2);

        let without_price = resolve_row(&map, &headers, 3, &row(&[(1, "B"), (2, "1")])).unwrap();
        assert_eq!(without_price.resource.map(|i| i.price), Some(None));
    }

    #[test]
    fn test_failures_carry_column_and_text() {
        let map = item_map(None);
        let headers = headers(&map);
        let failure = resolve_row(&map, &headers, 4, &row(&[(1, ""), (2, "lots"), (3, "")])).unwrap_err();
        assert_eq!(failure.row_number, 4);
        // an empty String cell reads as ""
        assert!(failure.missing.is_empty());
        assert_eq!(
            failure.invalid,
            vec![InvalidResourcePropertyReadingFailure {
                property: "qty".into(),
                column: 2,
                text: "lots".into(),
            }]
        );

        let failure = resolve_row(&map, &headers, 5, &row(&[(1, "C")])).unwrap_err();
        assert_eq!(
            failure.missing,
            vec![MissingResourcePropertyReadingFailure {
                property: "qty".into(),
                column: Some(2),
            }]
        );
    }

    #[test]
    fn test_default_resolves_only_its_classifications() {
        let map = item_map(Some(Resolutions::MISSING));
        let headers = headers(&map);

        let read = resolve_row(&map, &headers, 2, &row(&[(1, "A")])).unwrap();
        assert_eq!(read.resource.map(|i| i.qty), Some(1));

        let failure = resolve_row(&map, &headers, 3, &row(&[(1, "A"), (2, "x")])).unwrap_err();
        assert_eq!(failure.invalid.len(), 1);

        let failure = resolve_row(&map, &headers, 4, &row(&[(1, "A"), (2, "")])).unwrap_err();
        assert_eq!(failure.missing.len(), 1);
    }

    #[test]
    fn test_valueless_cells() {
        let map = item_map(Some(Resolutions::EMPTY));
        let headers = headers(&map);
        let mut cells = row(&[(1, "A")]);
        cells.push(RawCell::valueless(2));
        cells.push(RawCell::valueless(3));

        let read = resolve_row(&map, &headers, 2, &cells).unwrap();
        assert_eq!(
            read.resource,
            Some(Item {
                sku: "A".into(),
                qty: 1,
                price: None,
            })
        );
    }

    #[test]
    fn test_blank_rows_yield_no_resource() {
        let map = item_map(None);
        let headers = headers(&map);
        let read = resolve_row(&map, &headers, 9, &row(&[(2, ""), (7, "note")])).unwrap();
        assert_eq!(read.resource, None);
    }
}
