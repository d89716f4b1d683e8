//! Shared string table of a document.

use std::collections::HashMap;
use std::fmt::Write as FmtWrite;

use quick_xml::Reader;
use quick_xml::events::Event;

use crate::common::xml::{escape_xml, resolve_entity};
use crate::common::{Error, Result};

/// Look-up-or-insert table of the strings referenced by `t="s"` cells.
#[derive(Debug, Default, Clone)]
pub struct SharedStringIndexer {
    strings: Vec<String>,
    string_to_index: HashMap<String, usize>,
}

impl SharedStringIndexer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of `value`, appending it on first use.
    pub fn add(&mut self, value: &str) -> usize {
        if let Some(&index) = self.string_to_index.get(value) {
            return index;
        }
        let index = self.strings.len();
        self.strings.push(value.to_string());
        self.string_to_index.insert(value.to_string(), index);
        index
    }

    pub fn lookup(&self, index: usize) -> Option<&str> {
        self.strings.get(index).map(String::as_str)
    }

    pub fn index_of(&self, value: &str) -> Option<usize> {
        self.string_to_index.get(value).copied()
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    /// Load a shared strings part.
    ///
    /// Rich-text items are flattened to their concatenated runs; phonetic
    /// runs are dropped.
    pub fn parse(content: &str) -> Result<Self> {
        let mut reader = Reader::from_str(content);
        let mut table = Self::new();
        let mut buf = Vec::with_capacity(512);

        let mut current: Option<String> = None;
        let mut in_text = false;
        let mut phonetic_depth = 0usize;

        loop {
            buf.clear();
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => match e.local_name().as_ref() {
                    b"si" => current = Some(String::new()),
                    b"rPh" => phonetic_depth += 1,
                    b"t" if phonetic_depth == 0 => in_text = true,
                    _ => {},
                },
                Ok(Event::Empty(e)) if e.local_name().as_ref() == b"si" => {
                    table.push_item(String::new());
                },
                Ok(Event::End(e)) => match e.local_name().as_ref() {
                    b"si" => {
                        if let Some(text) = current.take() {
                            table.push_item(text);
                        }
                    },
                    b"rPh" => phonetic_depth = phonetic_depth.saturating_sub(1),
                    b"t" => in_text = false,
                    _ => {},
                },
                Ok(Event::Text(e)) if in_text => {
                    if let Some(text) = current.as_mut() {
                        text.push_str(&String::from_utf8_lossy(&e));
                    }
                },
                Ok(Event::CData(e)) if in_text => {
                    if let Some(text) = current.as_mut() {
                        text.push_str(&String::from_utf8_lossy(&e));
                    }
                },
                Ok(Event::GeneralRef(e)) if in_text => {
                    if let Some(text) = current.as_mut() {
                        let resolved = resolve_entity(&e).ok_or_else(|| {
                            Error::Xml(format!(
                                "unknown entity &{};",
                                String::from_utf8_lossy(&e)
                            ))
                        })?;
                        text.push(resolved);
                    }
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(Error::Xml(format!("XML error in shared strings: {}", e))),
                _ => {},
            }
        }

        Ok(table)
    }

    // Parsed items keep their position even when duplicated.
    fn push_item(&mut self, text: String) {
        let index = self.strings.len();
        self.string_to_index.entry(text.clone()).or_insert(index);
        self.strings.push(text);
    }

    /// Serialize the shared strings part.
    pub fn to_xml(&self) -> Result<String> {
        let mut xml = String::with_capacity(256 + self.strings.len() * 16);

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        write!(
            xml,
            r#"<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="{}" uniqueCount="{}">"#,
            self.strings.len(),
            self.strings.len()
        )?;

        for s in &self.strings {
            if needs_space_preserve(s) {
                write!(xml, r#"<si><t xml:space="preserve">{}</t></si>"#, escape_xml(s))?;
            } else {
                write!(xml, "<si><t>{}</t></si>", escape_xml(s))?;
            }
        }

        xml.push_str("</sst>");
        Ok(xml)
    }
}

pub(crate) fn needs_space_preserve(s: &str) -> bool {
    s.starts_with(char::is_whitespace) || s.ends_with(char::is_whitespace)
}
