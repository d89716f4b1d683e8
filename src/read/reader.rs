//! Streaming resource reader and the page-level driver.

use super::failure::{HeaderReadingFailure, NumberedResource, ResourceReadingFailure, ResourceReadingResult};
use super::{CellCursor, ElementReader, ResourcePropertyHeaders, XmlElementReader, resolve_headers, resolve_row};
use crate::common::{Error, Result};
use crate::map::ResourceMap;
use crate::options::ResourceReadingPolicy;
use crate::write::SharedStringIndexer;

/// Outcome of one body row.
pub type RowReading<T> = std::result::Result<NumberedResource<T>, ResourceReadingFailure>;

/// Reads resources row by row: the header first, then each body row.
pub struct ResourceReader<'a, T, R: ElementReader> {
    map: &'a ResourceMap<T>,
    cursor: CellCursor<'a, R>,
    headers: Option<ResourcePropertyHeaders>,
    header_read: bool,
}

impl<'a, T, R: ElementReader> ResourceReader<'a, T, R> {
    pub fn new(map: &'a ResourceMap<T>, cursor: CellCursor<'a, R>) -> Self {
        Self {
            map,
            cursor,
            headers: None,
            header_read: false,
        }
    }

    /// Resolve the header row. Returns the failure when the header is unusable,
    /// in which case no body rows are read.
    pub fn read_header(&mut self) -> Result<Option<HeaderReadingFailure>> {
        if self.header_read {
            return Err(Error::InvalidArgument("the header has already been read".into()));
        }
        self.header_read = true;

        let row_number = self.map.header_row_number();
        if !self.cursor.advance_to_row(row_number)? {
            tracing::debug!(
                resource = self.map.resource_name(),
                row = row_number,
                "header row missing"
            );
            return Ok(Some(HeaderReadingFailure::missing_row(row_number)));
        }

        let cells = self.cursor.row_cells()?;
        let (headers, failure) = resolve_headers(self.map, row_number, &cells);
        if !failure.is_empty() {
            return Ok(Some(failure));
        }
        self.headers = Some(headers);
        Ok(None)
    }

    /// Columns resolved by [`read_header`](Self::read_header).
    pub fn headers(&self) -> Option<&ResourcePropertyHeaders> {
        self.headers.as_ref()
    }

    /// Read the next body row. `None` once the page is exhausted or the
    /// header failed.
    pub fn next_resource(&mut self) -> Result<Option<RowReading<T>>> {
        if !self.header_read {
            return Err(Error::InvalidArgument(
                "the header must be read before the body".into(),
            ));
        }
        let Some(headers) = self.headers.as_ref() else {
            return Ok(None);
        };
        let Some(row_number) = self.cursor.next_row()? else {
            return Ok(None);
        };
        let cells = self.cursor.row_cells()?;
        Ok(Some(resolve_row(self.map, headers, row_number, &cells)))
    }

    /// Read the header and every body row, honoring the map's reading policy.
    ///
    /// Blank rows are skipped. Under [`ResourceReadingPolicy::ExitOnFailure`]
    /// reading stops at the first failing row; resources read before it are kept.
    pub fn read_all(mut self) -> Result<ResourceReadingResult<T>> {
        let mut result = ResourceReadingResult::default();
        if let Some(failure) = self.read_header()? {
            result.header_failure = Some(failure);
            return Ok(result);
        }

        let policy = self.map.reading_policy();
        while let Some(reading) = self.next_resource()? {
            match reading {
                Ok(numbered) if numbered.resource.is_some() => result.resources.push(numbered),
                Ok(_) => {},
                Err(failure) => {
                    result.resource_failures.push(failure);
                    if policy == ResourceReadingPolicy::ExitOnFailure {
                        tracing::debug!(
                            resource = self.map.resource_name(),
                            "stopped at the first failing row"
                        );
                        break;
                    }
                },
            }
        }

        tracing::debug!(
            resource = self.map.resource_name(),
            resources = result.resources.len(),
            failures = result.resource_failures.len(),
            "page read"
        );
        Ok(result)
    }
}

/// Reader over one worksheet part of a document.
#[derive(Debug, Clone, Copy)]
pub struct PageReader<'a> {
    xml: &'a str,
    strings: &'a SharedStringIndexer,
}

impl<'a> PageReader<'a> {
    pub fn new(xml: &'a str, strings: &'a SharedStringIndexer) -> Self {
        Self { xml, strings }
    }

    pub fn cells(&self) -> CellCursor<'a, XmlElementReader<'a>> {
        CellCursor::new(XmlElementReader::new(self.xml), self.strings)
    }

    pub fn resources<T>(&self, map: &'a ResourceMap<T>) -> ResourceReader<'a, T, XmlElementReader<'a>> {
        ResourceReader::new(map, self.cells())
    }

    pub fn read_all<T>(&self, map: &'a ResourceMap<T>) -> Result<ResourceReadingResult<T>> {
        self.resources(map).read_all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::{Constructor, Resource, ResourceMapBuilder};

    #[derive(Debug, Clone, PartialEq)]
    struct Reading {
        station: String,
        value: f64,
    }

    impl Resource for Reading {
        fn constructors() -> Vec<Constructor<Self>> {
            vec![Constructor::new(|(station, value): (String, f64)| Reading { station, value })]
        }
    }

    fn map(header_row: u32) -> ResourceMap<Reading> {
        let mut builder = ResourceMapBuilder::<Reading>::new();
        builder.implicit_constructor().header_row(header_row).unwrap();
        builder.property("station", |r: &Reading| &r.station).unwrap();
        builder.property("value", |r: &Reading| &r.value).unwrap();
        builder.build().unwrap()
    }

    const SHEET: &str = r#"<worksheet><sheetData>
<row r="2"><c r="A2" t="inlineStr"><is><t>station</t></is></c><c r="B2" t="inlineStr"><is><t>value</t></is></c></row>
<row r="3"><c r="A3" t="inlineStr"><is><t>north</t></is></c><c r="B3"><v>1.5</v></c></row>
<row r="5"><c r="A5" s="2"/></row>
<row r="6"><c r="A6" t="inlineStr"><is><t>south</t></is></c><c r="B6"><v>-2</v></c></row>
</sheetData></worksheet>"#;

    #[test]
    fn test_streams_rows_after_the_header() {
        let strings = SharedStringIndexer::new();
        let map = map(2);
        let mut reader = PageReader::new(SHEET, &strings).resources(&map);

        assert!(reader.next_resource().is_err());
        assert_eq!(reader.read_header().unwrap(), None);
        assert_eq!(reader.headers().map(ResourcePropertyHeaders::len), Some(2));

        let first = reader.next_resource().unwrap().unwrap().unwrap();
        assert_eq!(first.row_number, 3);
        let blank = reader.next_resource().unwrap().unwrap().unwrap();
        assert_eq!((blank.row_number, blank.resource), (5, None));
        let last = reader.next_resource().unwrap().unwrap().unwrap();
        assert_eq!(
            last.resource,
            Some(Reading {
                station: "south".into(),
                value: -2.0,
            })
        );
        assert!(reader.next_resource().unwrap().is_none());
    }

    #[test]
    fn test_read_all_skips_blank_rows() {
        let strings = SharedStringIndexer::new();
        let map = map(2);
        let result = PageReader::new(SHEET, &strings).read_all(&map).unwrap();
        assert!(result.is_success());
        let rows: Vec<u32> = result.resources.iter().map(|r| r.row_number).collect();
        assert_eq!(rows, vec![3, 6]);
    }

    #[test]
    fn test_missing_header_row_stops_reading() {
        let strings = SharedStringIndexer::new();
        let map = map(4);
        let result = PageReader::new(SHEET, &strings).read_all(&map).unwrap();
        let failure = result.header_failure.unwrap();
        assert!(failure.is_missing_row);
        assert_eq!(failure.row_number, 4);
        assert!(result.resources.is_empty());
        assert!(result.resource_failures.is_empty());
    }
}
