//! Forward-only cell cursor over one worksheet.

use super::{ElementWriter, SharedStringIndexer, StyleIndexer, StyleRef};
use crate::common::date::{date_to_serial, datetime_to_serial};
use crate::common::reference::{MAX_COLUMN, MAX_ROW};
use crate::common::{AttributeKind, ElementKind, Error, Result, cell_reference};
use crate::options::{DateKind, StringKind};
use crate::value::Value;
use crate::write::element::XmlElementWriter;
use crate::write::strings::needs_space_preserve;

/// One cell to emit: a value and how to format it.
#[derive(Debug, Clone, PartialEq)]
pub struct WritingCell {
    pub value: Value,
    pub style: Option<StyleRef>,
    pub string_kind: StringKind,
    pub date_kind: DateKind,
}

impl WritingCell {
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
            style: None,
            string_kind: StringKind::default(),
            date_kind: DateKind::default(),
        }
    }

    pub fn with_style(mut self, style: StyleRef) -> Self {
        self.style = Some(style);
        self
    }

    pub fn with_string_kind(mut self, kind: StringKind) -> Self {
        self.string_kind = kind;
        self
    }

    pub fn with_date_kind(mut self, kind: DateKind) -> Self {
        self.date_kind = kind;
        self
    }
}

/// Writes cells at a cursor that only moves right and down.
///
/// The cursor starts at `A1`. Adding a cell writes it at the cursor and moves
/// one column right. Rows are opened on their first cell, so skipped rows
/// leave no element behind.
pub struct CellWriter<'a, W: ElementWriter = XmlElementWriter> {
    writer: W,
    styles: &'a mut StyleIndexer,
    strings: &'a mut SharedStringIndexer,
    row: u32,
    column: u32,
    row_open: bool,
    finished: bool,
}

impl<'a, W: ElementWriter> CellWriter<'a, W> {
    /// Open the worksheet and its sheet data on `writer`.
    pub fn new(
        mut writer: W,
        styles: &'a mut StyleIndexer,
        strings: &'a mut SharedStringIndexer,
    ) -> Result<Self> {
        writer.write_start_element(ElementKind::Worksheet, &XmlElementWriter::root_attributes())?;
        writer.write_start_element(ElementKind::SheetData, &[])?;
        Ok(Self {
            writer,
            styles,
            strings,
            row: 1,
            column: 1,
            row_open: false,
            finished: false,
        })
    }

    pub fn row(&self) -> u32 {
        self.row
    }

    pub fn column(&self) -> u32 {
        self.column
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Write `cell` at the cursor and move one column right.
    pub fn add_cell(&mut self, cell: WritingCell) -> Result<()> {
        self.ensure_active()?;
        if self.column > MAX_COLUMN {
            return Err(Error::InvalidArgument(format!(
                "column {} is past the last column",
                self.column
            )));
        }

        let style = cell
            .style
            .as_ref()
            .map(|style| self.styles.add_style(style))
            .filter(|&index| index != 0);

        if cell.value.is_empty() && style.is_none() {
            self.column += 1;
            return Ok(());
        }

        if !self.row_open {
            let number = itoa::Buffer::new().format(self.row).to_string();
            self.writer
                .write_start_element(ElementKind::Row, &[(AttributeKind::RowNumber, &number)])?;
            self.row_open = true;
        }

        let reference = cell_reference(self.row, self.column);
        let mut style_buf = itoa::Buffer::new();
        let mut attributes = smallvec::SmallVec::<[(AttributeKind, &str); 3]>::new();
        attributes.push((AttributeKind::Reference, &reference));
        if let Some(index) = style {
            attributes.push((AttributeKind::Style, style_buf.format(index)));
        }

        match cell.value {
            Value::Empty => {
                self.writer
                    .write_element(ElementKind::Cell, &attributes, None)?;
            },
            Value::Bool(b) => {
                attributes.push((AttributeKind::CellType, "b"));
                self.write_value(&attributes, if b { "1" } else { "0" })?;
            },
            Value::Integer(i) => {
                self.write_value(&attributes, itoa::Buffer::new().format(i))?;
            },
            Value::Float(f) => {
                if f.is_finite() {
                    self.write_value(&attributes, ryu::Buffer::new().format_finite(f))?;
                } else {
                    self.write_string(attributes, &f.to_string(), cell.string_kind)?;
                }
            },
            Value::Text(text) => {
                self.write_string(attributes, &text, cell.string_kind)?;
            },
            Value::Date(date) => match cell.date_kind {
                DateKind::Serial => {
                    let serial = date_to_serial(date) as i64;
                    self.write_value(&attributes, itoa::Buffer::new().format(serial))?;
                },
                DateKind::Text => {
                    let text = date.format("%Y-%m-%d").to_string();
                    self.write_string(attributes, &text, cell.string_kind)?;
                },
            },
            Value::DateTime(dt) => match cell.date_kind {
                DateKind::Serial => {
                    let serial = datetime_to_serial(dt);
                    self.write_value(&attributes, ryu::Buffer::new().format_finite(serial))?;
                },
                DateKind::Text => {
                    let text = dt.format("%Y-%m-%dT%H:%M:%S%.f").to_string();
                    self.write_string(attributes, &text, cell.string_kind)?;
                },
            },
        }

        self.column += 1;
        Ok(())
    }

    fn write_value(&mut self, attributes: &[(AttributeKind, &str)], value: &str) -> Result<()> {
        self.writer.write_start_element(ElementKind::Cell, attributes)?;
        self.writer
            .write_element(ElementKind::Value, &[], Some(value))?;
        self.writer.write_end_element(ElementKind::Cell)
    }

    fn write_string(
        &mut self,
        mut attributes: smallvec::SmallVec<[(AttributeKind, &str); 3]>,
        text: &str,
        kind: StringKind,
    ) -> Result<()> {
        match kind {
            StringKind::Shared => {
                let index = self.strings.add(text);
                attributes.push((AttributeKind::CellType, "s"));
                self.write_value(&attributes, itoa::Buffer::new().format(index))
            },
            StringKind::Inline => {
                attributes.push((AttributeKind::CellType, "inlineStr"));
                self.writer
                    .write_start_element(ElementKind::Cell, &attributes)?;
                self.writer
                    .write_start_element(ElementKind::InlineString, &[])?;
                let space: &[(AttributeKind, &str)] = if needs_space_preserve(text) {
                    &[(AttributeKind::Space, "preserve")]
                } else {
                    &[]
                };
                self.writer
                    .write_element(ElementKind::Text, space, Some(text))?;
                self.writer.write_end_element(ElementKind::InlineString)?;
                self.writer.write_end_element(ElementKind::Cell)
            },
        }
    }

    /// Move to the first column of the next row.
    pub fn advance_row(&mut self) -> Result<()> {
        self.advance_rows(1)
    }

    pub fn advance_rows(&mut self, count: u32) -> Result<()> {
        self.ensure_active()?;
        let target = self
            .row
            .checked_add(count)
            .filter(|&row| row <= MAX_ROW)
            .ok_or_else(|| Error::InvalidArgument(format!("cannot advance {} rows", count)))?;
        if count > 0 {
            self.close_row()?;
            self.row = target;
            self.column = 1;
        }
        Ok(())
    }

    /// Skip the cell at the cursor.
    pub fn advance_column(&mut self) -> Result<()> {
        self.advance_columns(1)
    }

    pub fn advance_columns(&mut self, count: u32) -> Result<()> {
        self.ensure_active()?;
        self.column = self
            .column
            .checked_add(count)
            .filter(|&column| column <= MAX_COLUMN + 1)
            .ok_or_else(|| Error::InvalidArgument(format!("cannot advance {} columns", count)))?;
        Ok(())
    }

    /// Move to the first column of `row`, which must not be behind the cursor.
    pub fn advance_to_row(&mut self, row: u32) -> Result<()> {
        self.ensure_active()?;
        if row == 0 || row > MAX_ROW {
            return Err(Error::InvalidArgument(format!("row {} is out of range", row)));
        }
        if row < self.row {
            return Err(self.behind(row, self.column));
        }
        self.advance_rows(row - self.row)
    }

    /// Move to `column` on the current row, which must not be behind the cursor.
    pub fn advance_to_column(&mut self, column: u32) -> Result<()> {
        self.ensure_active()?;
        if column == 0 || column > MAX_COLUMN {
            return Err(Error::InvalidArgument(format!(
                "column {} is out of range",
                column
            )));
        }
        if column < self.column {
            return Err(self.behind(self.row, column));
        }
        self.column = column;
        Ok(())
    }

    /// Close the open row and the worksheet. The cursor is unusable afterwards.
    pub fn finish(&mut self) -> Result<()> {
        self.ensure_active()?;
        self.close_row()?;
        self.writer.write_end_element(ElementKind::SheetData)?;
        self.writer.write_end_element(ElementKind::Worksheet)?;
        self.finished = true;
        tracing::debug!(last_row = self.row, "worksheet finished");
        Ok(())
    }

    /// The underlying writer, once finished.
    pub fn into_inner(self) -> Result<W> {
        if !self.finished {
            return Err(Error::InvalidArgument(
                "the cell writer must be finished first".into(),
            ));
        }
        Ok(self.writer)
    }

    fn close_row(&mut self) -> Result<()> {
        if self.row_open {
            self.writer.write_end_element(ElementKind::Row)?;
            self.row_open = false;
            tracing::trace!(row = self.row, "row written");
        }
        Ok(())
    }

    fn ensure_active(&self) -> Result<()> {
        if self.finished {
            Err(Error::WriterFinished)
        } else {
            Ok(())
        }
    }

    fn behind(&self, row: u32, column: u32) -> Error {
        Error::CursorBehind {
            current: cell_reference(self.row, self.column),
            requested: cell_reference(row, column),
        }
    }
}
