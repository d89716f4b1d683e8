//! Writing mapped resources as a header row followed by one row per resource.

use super::{CellWriter, ElementWriter, StyleRef, WritingCell};
use crate::common::{Error, Result};
use crate::map::ResourceMap;
use crate::options::DateKind;
use crate::value::ValueKind;

/// Column of every property of `map`, in declaration order.
///
/// Numbered keys take their number. The remaining properties fill the free
/// columns from the left. Two properties on one column are an error.
pub fn column_layout<T>(map: &ResourceMap<T>) -> Result<Vec<u32>> {
    let properties = map.properties();
    let mut columns: Vec<Option<u32>> = properties.iter().map(|p| p.key().number()).collect();

    let mut claimed: Vec<(u32, usize)> = columns
        .iter()
        .enumerate()
        .filter_map(|(index, column)| column.map(|column| (column, index)))
        .collect();
    claimed.sort_unstable();
    for pair in claimed.windows(2) {
        if pair[0].0 == pair[1].0 {
            return Err(Error::ColumnConflict {
                column: pair[0].0,
                first: properties[pair[0].1].name().to_string(),
                second: properties[pair[1].1].name().to_string(),
            });
        }
    }

    let taken: Vec<u32> = claimed.iter().map(|(column, _)| *column).collect();
    let mut next = 1;
    for column in columns.iter_mut().filter(|column| column.is_none()) {
        while taken.binary_search(&next).is_ok() {
            next += 1;
        }
        *column = Some(next);
        next += 1;
    }

    Ok(columns.into_iter().flatten().collect())
}

/// Write the header row of `map`, then every resource below it.
///
/// The cursor must not be past the header row. Returns the number of
/// resources written.
pub fn write_resources<'r, T, W, I>(
    cells: &mut CellWriter<'_, W>,
    map: &ResourceMap<T>,
    resources: I,
) -> Result<usize>
where
    T: 'r,
    W: ElementWriter,
    I: IntoIterator<Item = &'r T>,
{
    let columns = column_layout(map)?;
    let mut order: Vec<usize> = (0..columns.len()).collect();
    order.sort_by_key(|&index| columns[index]);

    cells.advance_to_row(map.header_row_number())?;
    for &index in &order {
        let property = &map.properties()[index];
        let Some(text) = property.key().header_text() else {
            continue;
        };
        cells.advance_to_column(columns[index])?;
        let mut cell = WritingCell::new(text).with_string_kind(property.string_kind());
        if let Some(style) = property.header_style() {
            cell = cell.with_style(style.clone());
        }
        cells.add_cell(cell)?;
    }

    let mut written = 0;
    for resource in resources {
        cells.advance_row()?;
        for &index in &order {
            let property = &map.properties()[index];
            let value = property.accessor().get(resource);
            if value.is_empty() && property.body_style().is_none() {
                continue;
            }
            cells.advance_to_column(columns[index])?;

            let mut cell = WritingCell::new(value)
                .with_string_kind(property.string_kind())
                .with_date_kind(property.date_kind());
            cell.style = property
                .body_style()
                .cloned()
                .or_else(|| default_body_style(property.property_type().kind(), property.date_kind()));
            cells.add_cell(cell)?;
        }
        written += 1;
        tracing::trace!(row = cells.row(), "resource written");
    }

    tracing::debug!(
        resource = map.resource_name(),
        written,
        "resources written"
    );
    Ok(written)
}

fn default_body_style(kind: ValueKind, date_kind: DateKind) -> Option<StyleRef> {
    match (kind, date_kind) {
        (ValueKind::Date, DateKind::Serial) => Some(StyleRef::date()),
        (ValueKind::DateTime, DateKind::Serial) => Some(StyleRef::date_time()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::map::{Constructor, Resource, ResourceMapBuilder};
    use crate::write::{SharedStringIndexer, StyleIndexer, XmlElementWriter};

    #[derive(Debug, Clone, PartialEq)]
    struct Order {
        id: i32,
        note: Option<String>,
        placed: NaiveDate,
    }

    impl Resource for Order {
        fn constructors() -> Vec<Constructor<Self>> {
            vec![Constructor::new(|(id, note, placed): (i32, Option<String>, NaiveDate)| {
                Order { id, note, placed }
            })]
        }
    }

    fn order_map() -> ResourceMap<Order> {
        let mut builder = ResourceMapBuilder::<Order>::new();
        builder.implicit_constructor();
        builder.property("id", |o: &Order| &o.id).unwrap();
        builder.property("note", |o: &Order| &o.note).unwrap();
        builder.property("placed", |o: &Order| &o.placed).unwrap();
        builder.build().unwrap()
    }

    fn write(map: &ResourceMap<Order>, orders: &[Order]) -> (String, SharedStringIndexer) {
        let mut styles = StyleIndexer::new();
        let mut strings = SharedStringIndexer::new();
        let mut cells =
            CellWriter::new(XmlElementWriter::new(), &mut styles, &mut strings).unwrap();
        write_resources(&mut cells, map, orders).unwrap();
        cells.finish().unwrap();
        let xml = cells.into_inner().unwrap().into_xml().unwrap();
        (xml, strings)
    }

    fn sample() -> Vec<Order> {
        let placed = NaiveDate::from_ymd_opt(1970, 1, 2).unwrap();
        vec![
            Order { id: 7, note: Some("rush".into()), placed },
            Order { id: 8, note: None, placed },
        ]
    }

    #[test]
    fn test_header_and_body_rows() {
        let map = order_map();
        let (xml, strings) = write(&map, &sample());

        assert!(xml.contains(r#"<row r="1"><c r="A1" t="s"><v>0</v></c><c r="B1" t="s"><v>1</v></c><c r="C1" t="s"><v>2</v></c></row>"#));
        assert!(xml.contains(r#"<c r="A2"><v>7</v></c>"#));
        assert!(xml.contains(r#"<c r="C2" s="1"><v>25570</v></c>"#));
        // a None note leaves no cell
        assert!(!xml.contains(r#"r="B3""#));
        assert_eq!(strings.lookup(3), Some("rush"));
    }

    #[test]
    fn test_numbered_keys_claim_their_columns() {
        let map = order_map();
        assert_eq!(column_layout(&map).unwrap(), vec![1, 2, 3]);

        let mut builder = ResourceMapBuilder::<Order>::new();
        builder.implicit_constructor();
        builder.property("id", |o: &Order| &o.id).unwrap().number(3).unwrap();
        builder.property("note", |o: &Order| &o.note).unwrap();
        builder.property("placed", |o: &Order| &o.placed).unwrap().number(1).unwrap();
        let map = builder.build().unwrap();
        assert_eq!(column_layout(&map).unwrap(), vec![3, 2, 1]);

        let (xml, _) = write(&map, &sample()[..1]);
        assert!(xml.contains(r#"<c r="A2" s="1"><v>25570</v></c><c r="B2" t="s"><v>3</v></c><c r="C2"><v>7</v></c>"#));
    }

    #[test]
    fn test_same_column_twice_is_a_conflict() {
        let mut builder = ResourceMapBuilder::<Order>::new();
        builder.implicit_constructor();
        builder.property("id", |o: &Order| &o.id).unwrap().number(2).unwrap();
        builder.property("note", |o: &Order| &o.note).unwrap().number(2).unwrap();
        builder.property("placed", |o: &Order| &o.placed).unwrap();
        let map = builder.build().unwrap();

        assert!(matches!(
            column_layout(&map),
            Err(Error::ColumnConflict { column: 2, .. })
        ));
    }

    #[test]
    fn test_header_row_and_ignored_names() {
        let mut builder = ResourceMapBuilder::<Order>::new();
        builder.implicit_constructor().header_row(3).unwrap();
        builder.property("id", |o: &Order| &o.id).unwrap().ignore_name().number(1).unwrap();
        builder.property("note", |o: &Order| &o.note).unwrap();
        builder
            .property("placed", |o: &Order| &o.placed)
            .unwrap()
            .date_kind(DateKind::Text);
        let map = builder.build().unwrap();

        let (xml, _) = write(&map, &sample()[..1]);
        assert!(!xml.contains(r#"<row r="1">"#));
        assert!(xml.contains(r#"<row r="3"><c r="B3" t="s"><v>0</v></c><c r="C3" t="s"><v>1</v></c></row>"#));
        assert!(xml.contains(r#"<c r="C4" t="s"><v>3</v></c>"#));
    }
}
