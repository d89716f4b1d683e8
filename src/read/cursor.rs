//! Forward-only row and cell cursor over a worksheet.

use super::ElementReader;
use crate::common::{AttributeKind, ElementKind, Error, Result, parse_cell_reference};
use crate::write::SharedStringIndexer;

/// A cell's column and its resolved text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCell {
    pub column: u32,
    pub text: String,
    /// Unset for a cell with no value, such as a styled placeholder.
    pub has_value: bool,
}

impl RawCell {
    pub fn new(column: u32, text: impl Into<String>) -> Self {
        Self {
            column,
            text: text.into(),
            has_value: true,
        }
    }

    pub fn valueless(column: u32) -> Self {
        Self {
            column,
            text: String::new(),
            has_value: false,
        }
    }
}

/// Walks the rows of a worksheet and the cells of the current row.
///
/// Shared strings are resolved through the document's string table. Rows and
/// cells lacking a reference take the position after the previous one.
pub struct CellCursor<'a, R: ElementReader> {
    reader: R,
    strings: &'a SharedStringIndexer,
    started: bool,
    done: bool,
    row: Option<u32>,
    row_open: bool,
    pending: bool,
    last_column: u32,
}

impl<'a, R: ElementReader> CellCursor<'a, R> {
    pub fn new(reader: R, strings: &'a SharedStringIndexer) -> Self {
        Self {
            reader,
            strings,
            started: false,
            done: false,
            row: None,
            row_open: false,
            pending: false,
            last_column: 0,
        }
    }

    /// Number of the current row.
    pub fn row(&self) -> Option<u32> {
        self.row
    }

    /// Move to the next row element and return its number.
    pub fn next_row(&mut self) -> Result<Option<u32>> {
        if self.pending {
            self.pending = false;
            return Ok(self.row);
        }
        if !self.enter_sheet_data()? {
            return Ok(None);
        }
        if !self.reader.read_next(&[ElementKind::Row], ElementKind::SheetData)? {
            self.done = true;
            self.row_open = false;
            return Ok(None);
        }

        let previous = self.row.unwrap_or(0);
        let number = match self.reader.attribute(AttributeKind::RowNumber) {
            Some(text) => atoi_simd::parse::<u32, false, false>(text.as_bytes())
                .map_err(|_| Error::Xml(format!("invalid row number '{}'", text)))?,
            None => previous + 1,
        };
        if number <= previous {
            return Err(Error::Xml(format!(
                "row {} follows row {}",
                number, previous
            )));
        }

        self.row = Some(number);
        self.row_open = true;
        self.last_column = 0;
        Ok(Some(number))
    }

    /// Move forward to `row`. Returns `false` when the sheet has no such row;
    /// a later row found on the way stays current for [`next_row`](Self::next_row).
    pub fn advance_to_row(&mut self, row: u32) -> Result<bool> {
        if let Some(current) = self.row
            && current >= row
        {
            if current == row {
                self.pending = false;
                return Ok(true);
            }
            return Ok(false);
        }
        while let Some(number) = self.next_row()? {
            if number == row {
                return Ok(true);
            }
            if number > row {
                self.pending = true;
                return Ok(false);
            }
        }
        Ok(false)
    }

    /// Next cell of the current row.
    pub fn next_cell(&mut self) -> Result<Option<RawCell>> {
        if !self.row_open || self.pending {
            return Ok(None);
        }
        if !self.reader.read_next(&[ElementKind::Cell], ElementKind::Row)? {
            self.row_open = false;
            return Ok(None);
        }

        let column = match self.reader.attribute(AttributeKind::Reference) {
            Some(reference) => parse_cell_reference(reference)
                .map(|(column, _)| column)
                .ok_or_else(|| Error::Xml(format!("invalid cell reference '{}'", reference)))?,
            None => self.last_column + 1,
        };
        self.last_column = column;

        let cell_type = self
            .reader
            .attribute(AttributeKind::CellType)
            .map(str::to_owned);
        let text = if self.reader.is_empty_element() {
            None
        } else {
            self.cell_text(cell_type.as_deref())?
        };
        Ok(Some(match text {
            Some(text) => RawCell::new(column, text),
            None => RawCell::valueless(column),
        }))
    }

    /// Remaining cells of the current row.
    pub fn row_cells(&mut self) -> Result<Vec<RawCell>> {
        let mut cells = Vec::new();
        while let Some(cell) = self.next_cell()? {
            cells.push(cell);
        }
        Ok(cells)
    }

    fn enter_sheet_data(&mut self) -> Result<bool> {
        if self.done {
            return Ok(false);
        }
        if !self.started {
            self.started = true;
            if !self
                .reader
                .read_next(&[ElementKind::SheetData], ElementKind::Worksheet)?
                || self.reader.is_empty_element()
            {
                self.done = true;
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Text of the open cell, `None` when it carries no value.
    fn cell_text(&mut self, cell_type: Option<&str>) -> Result<Option<String>> {
        match cell_type {
            Some("inlineStr") => {
                let mut text = None::<String>;
                while self.reader.read_next(&[ElementKind::Text], ElementKind::Cell)? {
                    text.get_or_insert_default()
                        .push_str(&self.reader.read_text()?);
                }
                Ok(text)
            },
            Some("s") => {
                let Some(value) = self.value_text()? else {
                    return Ok(None);
                };
                if value.trim().is_empty() {
                    return Ok(Some(String::new()));
                }
                let index = atoi_simd::parse::<usize, false, false>(value.trim().as_bytes())
                    .map_err(|_| Error::Xml(format!("invalid shared string index '{}'", value)))?;
                self.strings
                    .lookup(index)
                    .map(|text| Some(text.to_owned()))
                    .ok_or_else(|| Error::Xml(format!("shared string {} does not exist", index)))
            },
            _ => self.value_text(),
        }
    }

    fn value_text(&mut self) -> Result<Option<String>> {
        if self.reader.read_next(&[ElementKind::Value], ElementKind::Cell)? {
            self.reader.read_text().map(Some)
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::read::XmlElementReader;

    fn strings() -> SharedStringIndexer {
        let mut strings = SharedStringIndexer::new();
        strings.add("Id");
        strings.add("Name");
        strings
    }

    const SHEET: &str = r#"<worksheet><sheetData>
<row r="1"><c r="A1" t="s"><v>0</v></c><c r="B1" t="s"><v>1</v></c></row>
<row r="2"><c r="A2"><v>42</v></c><c r="C2" t="inlineStr"><is><r><t>Al</t></r><r><t>ice</t></r></is></c><c r="D2" s="1"/></row>
<row><c><v>1</v></c><c t="b"><v>0</v></c></row>
</sheetData></worksheet>"#;

    #[test]
    fn test_reads_rows_and_resolves_cells() {
        let strings = strings();
        let mut cursor = CellCursor::new(XmlElementReader::new(SHEET), &strings);

        assert_eq!(cursor.next_row().unwrap(), Some(1));
        let header = cursor.row_cells().unwrap();
        assert_eq!(
            header,
            vec![
                RawCell::new(1, "Id"),
                RawCell::new(2, "Name"),
            ]
        );

        assert_eq!(cursor.next_row().unwrap(), Some(2));
        let body = cursor.row_cells().unwrap();
        assert_eq!(body.len(), 3);
        assert_eq!(body[0].text, "42");
        assert_eq!((body[1].column, body[1].text.as_str()), (3, "Alice"));
        assert_eq!(body[2], RawCell::valueless(4));

        assert_eq!(cursor.next_row().unwrap(), Some(3));
        let implicit = cursor.row_cells().unwrap();
        assert_eq!(implicit[1], RawCell::new(2, "0"));

        assert_eq!(cursor.next_row().unwrap(), None);
        assert_eq!(cursor.next_row().unwrap(), None);
    }

    #[test]
    fn test_unread_cells_are_skipped() {
        let strings = strings();
        let mut cursor = CellCursor::new(XmlElementReader::new(SHEET), &strings);
        assert_eq!(cursor.next_row().unwrap(), Some(1));
        assert!(cursor.next_cell().unwrap().is_some());
        assert_eq!(cursor.next_row().unwrap(), Some(2));
        assert_eq!(cursor.next_cell().unwrap().map(|c| c.column), Some(1));
    }

    #[test]
    fn test_advance_to_missing_row_keeps_the_later_row() {
        let strings = strings();
        let xml = r#"<worksheet><sheetData><row r="4"><c r="A4"><v>7</v></c></row></sheetData></worksheet>"#;
        let mut cursor = CellCursor::new(XmlElementReader::new(xml), &strings);

        assert!(!cursor.advance_to_row(2).unwrap());
        assert!(cursor.next_cell().unwrap().is_none());
        assert_eq!(cursor.next_row().unwrap(), Some(4));
        assert_eq!(cursor.row_cells().unwrap()[0].text, "7");
    }

    #[test]
    fn test_empty_sheet_data_has_no_rows() {
        let strings = SharedStringIndexer::new();
        let mut cursor =
            CellCursor::new(XmlElementReader::new("<worksheet><sheetData/></worksheet>"), &strings);
        assert!(!cursor.advance_to_row(1).unwrap());
        assert_eq!(cursor.next_row().unwrap(), None);
    }

    #[test]
    fn test_unknown_shared_string_is_an_error() {
        let strings = SharedStringIndexer::new();
        let xml = r#"<worksheet><sheetData><row r="1"><c r="A1" t="s"><v>9</v></c></row></sheetData></worksheet>"#;
        let mut cursor = CellCursor::new(XmlElementReader::new(xml), &strings);
        cursor.next_row().unwrap();
        assert!(matches!(cursor.next_cell(), Err(Error::Xml(_))));
    }
}
