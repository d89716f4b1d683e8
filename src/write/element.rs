//! Element writer seam and its XML string implementation.

use std::fmt::Write as FmtWrite;

use crate::common::xml::escape_xml;
use crate::common::{AttributeKind, ElementKind, Error, Result};

const SPREADSHEET_NAMESPACE: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";

/// Forward-only writer of worksheet elements.
pub trait ElementWriter {
    fn write_start_element(
        &mut self,
        kind: ElementKind,
        attributes: &[(AttributeKind, &str)],
    ) -> Result<()>;

    /// Write a complete element; without text it is written empty.
    fn write_element(
        &mut self,
        kind: ElementKind,
        attributes: &[(AttributeKind, &str)],
        text: Option<&str>,
    ) -> Result<()>;

    fn write_end_element(&mut self, kind: ElementKind) -> Result<()>;
}

/// [`ElementWriter`] building the worksheet XML in memory.
#[derive(Debug)]
pub struct XmlElementWriter {
    xml: String,
    open: Vec<ElementKind>,
}

impl XmlElementWriter {
    pub fn new() -> Self {
        let mut xml = String::with_capacity(4096);
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        Self {
            xml,
            open: Vec::new(),
        }
    }

    /// Namespace attribute for the root element.
    pub fn root_attributes() -> [(AttributeKind, &'static str); 1] {
        [(AttributeKind::Namespace, SPREADSHEET_NAMESPACE)]
    }

    /// The XML written so far. Fails while elements are still open.
    pub fn into_xml(self) -> Result<String> {
        if let Some(kind) = self.open.last() {
            return Err(Error::Xml(format!(
                "element <{}> was never closed",
                kind.local_name()
            )));
        }
        Ok(self.xml)
    }

    fn write_tag(&mut self, kind: ElementKind, attributes: &[(AttributeKind, &str)]) -> Result<()> {
        if kind == ElementKind::Other {
            return Err(Error::InvalidArgument(
                "cannot write an element of unknown kind".into(),
            ));
        }
        write!(self.xml, "<{}", kind.local_name())?;
        for (attribute, value) in attributes {
            write!(
                self.xml,
                r#" {}="{}""#,
                attribute.qualified_name(),
                escape_xml(value)
            )?;
        }
        Ok(())
    }
}

impl Default for XmlElementWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementWriter for XmlElementWriter {
    fn write_start_element(
        &mut self,
        kind: ElementKind,
        attributes: &[(AttributeKind, &str)],
    ) -> Result<()> {
        self.write_tag(kind, attributes)?;
        self.xml.push('>');
        self.open.push(kind);
        Ok(())
    }

    fn write_element(
        &mut self,
        kind: ElementKind,
        attributes: &[(AttributeKind, &str)],
        text: Option<&str>,
    ) -> Result<()> {
        self.write_tag(kind, attributes)?;
        match text {
            Some(text) => write!(
                self.xml,
                ">{}</{}>",
                escape_xml(text),
                kind.local_name()
            )?,
            None => self.xml.push_str("/>"),
        }
        Ok(())
    }

    fn write_end_element(&mut self, kind: ElementKind) -> Result<()> {
        match self.open.pop() {
            Some(open) if open == kind => {
                write!(self.xml, "</{}>", kind.local_name())?;
                Ok(())
            },
            other => Err(Error::Xml(format!(
                "cannot close <{}> while <{}> is open",
                kind.local_name(),
                other.map_or("", |open| open.local_name())
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writes_nested_elements() {
        let mut writer = XmlElementWriter::new();
        writer
            .write_start_element(ElementKind::Row, &[(AttributeKind::RowNumber, "1")])
            .unwrap();
        writer
            .write_start_element(ElementKind::Cell, &[(AttributeKind::Reference, "A1")])
            .unwrap();
        writer
            .write_element(ElementKind::Value, &[], Some("a<b"))
            .unwrap();
        writer.write_end_element(ElementKind::Cell).unwrap();
        writer
            .write_element(ElementKind::Cell, &[(AttributeKind::Reference, "B1")], None)
            .unwrap();
        writer.write_end_element(ElementKind::Row).unwrap();

        let xml = writer.into_xml().unwrap();
        assert!(xml.ends_with(r#"<row r="1"><c r="A1"><v>a&lt;b</v></c><c r="B1"/></row>"#));
    }

    #[test]
    fn test_mismatched_end_is_rejected() {
        let mut writer = XmlElementWriter::new();
        writer.write_start_element(ElementKind::Row, &[]).unwrap();
        assert!(writer.write_end_element(ElementKind::Cell).is_err());

        let mut unclosed = XmlElementWriter::new();
        unclosed.write_start_element(ElementKind::SheetData, &[]).unwrap();
        assert!(unclosed.into_xml().is_err());
    }
}
