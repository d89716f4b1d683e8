//! Element reader seam and its quick-xml implementation.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use smallvec::SmallVec;

use crate::common::xml::resolve_entity;
use crate::common::{AttributeKind, ElementKind, Error, Result};

/// Forward-only reader of worksheet elements.
pub trait ElementReader {
    /// Advance to the next start of one of `kinds`.
    ///
    /// Returns `false` once the end of `bound` (or of the input) is reached;
    /// elements of other kinds are stepped over.
    fn read_next(&mut self, kinds: &[ElementKind], bound: ElementKind) -> Result<bool>;

    /// Whether the reader is positioned on the start of `kind`.
    fn is_start(&self, kind: ElementKind) -> bool;

    /// Whether the last call to [`read_next`](Self::read_next) stopped at the end of `kind`.
    fn is_end(&self, kind: ElementKind) -> bool;

    /// Whether the current start element is self-closing.
    fn is_empty_element(&self) -> bool;

    /// Attribute of the current start element.
    fn attribute(&self, kind: AttributeKind) -> Option<&str>;

    /// Text content of the current element, consuming it up to its end.
    fn read_text(&mut self) -> Result<String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
    None,
    Start { kind: ElementKind, empty: bool },
    End(ElementKind),
}

/// [`ElementReader`] over worksheet XML held in memory.
pub struct XmlElementReader<'a> {
    reader: Reader<&'a [u8]>,
    buf: Vec<u8>,
    position: Position,
    attributes: SmallVec<[(AttributeKind, String); 4]>,
}

impl<'a> XmlElementReader<'a> {
    pub fn new(xml: &'a str) -> Self {
        Self {
            reader: Reader::from_str(xml),
            buf: Vec::with_capacity(1024),
            position: Position::None,
            attributes: SmallVec::new(),
        }
    }
}

fn collect_attributes(
    kind: ElementKind,
    element: &BytesStart<'_>,
) -> Result<SmallVec<[(AttributeKind, String); 4]>> {
    let mut attributes = SmallVec::new();
    for attr in element.attributes().flatten() {
        if let Some(attribute) = AttributeKind::resolve(kind, attr.key.as_ref()) {
            let value = attr
                .unescape_value()
                .map_err(|e| Error::Xml(format!("bad attribute value: {}", e)))?;
            attributes.push((attribute, value.into_owned()));
        }
    }
    Ok(attributes)
}

impl ElementReader for XmlElementReader<'_> {
    fn read_next(&mut self, kinds: &[ElementKind], bound: ElementKind) -> Result<bool> {
        // A self-closing bound has no content to search.
        if self.position == (Position::Start { kind: bound, empty: true }) {
            self.position = Position::End(bound);
            return Ok(false);
        }

        loop {
            self.buf.clear();
            match self.reader.read_event_into(&mut self.buf) {
                Ok(Event::Start(e)) => {
                    let kind = ElementKind::from_local_name(e.local_name().as_ref());
                    if kinds.contains(&kind) {
                        self.attributes = collect_attributes(kind, &e)?;
                        self.position = Position::Start { kind, empty: false };
                        return Ok(true);
                    }
                },
                Ok(Event::Empty(e)) => {
                    let kind = ElementKind::from_local_name(e.local_name().as_ref());
                    if kinds.contains(&kind) {
                        self.attributes = collect_attributes(kind, &e)?;
                        self.position = Position::Start { kind, empty: true };
                        return Ok(true);
                    }
                },
                Ok(Event::End(e)) => {
                    let kind = ElementKind::from_local_name(e.local_name().as_ref());
                    if kind == bound {
                        self.position = Position::End(kind);
                        return Ok(false);
                    }
                },
                Ok(Event::Eof) => {
                    self.position = Position::None;
                    return Ok(false);
                },
                Err(e) => {
                    return Err(Error::Xml(format!(
                        "XML error at position {}: {}",
                        self.reader.buffer_position(),
                        e
                    )));
                },
                _ => {},
            }
        }
    }

    fn is_start(&self, kind: ElementKind) -> bool {
        matches!(self.position, Position::Start { kind: current, .. } if current == kind)
    }

    fn is_end(&self, kind: ElementKind) -> bool {
        self.position == Position::End(kind)
    }

    fn is_empty_element(&self) -> bool {
        matches!(self.position, Position::Start { empty: true, .. })
    }

    fn attribute(&self, kind: AttributeKind) -> Option<&str> {
        if !matches!(self.position, Position::Start { .. }) {
            return None;
        }
        self.attributes
            .iter()
            .find(|(attribute, _)| *attribute == kind)
            .map(|(_, value)| value.as_str())
    }

    fn read_text(&mut self) -> Result<String> {
        let kind = match self.position {
            Position::Start { empty: true, kind } => {
                self.position = Position::End(kind);
                return Ok(String::new());
            },
            Position::Start { kind, .. } => kind,
            _ => return Err(Error::Xml("no element to read text from".into())),
        };

        let mut text = String::new();
        let mut depth = 0usize;
        loop {
            self.buf.clear();
            match self.reader.read_event_into(&mut self.buf) {
                Ok(Event::Start(_)) => depth += 1,
                Ok(Event::End(_)) if depth > 0 => depth -= 1,
                Ok(Event::End(_)) => break,
                Ok(Event::Text(e)) => text.push_str(&String::from_utf8_lossy(&e)),
                Ok(Event::CData(e)) => text.push_str(&String::from_utf8_lossy(&e)),
                Ok(Event::GeneralRef(e)) => {
                    let resolved = resolve_entity(&e).ok_or_else(|| {
                        Error::Xml(format!(
                            "unknown entity &{};",
                            String::from_utf8_lossy(&e)
                        ))
                    })?;
                    text.push(resolved);
                },
                Ok(Event::Eof) => {
                    return Err(Error::Xml(format!(
                        "unexpected end of input inside <{}>",
                        kind.local_name()
                    )));
                },
                Err(e) => {
                    return Err(Error::Xml(format!(
                        "XML error in <{}>: {}",
                        kind.local_name(),
                        e
                    )));
                },
                _ => {},
            }
        }
        self.position = Position::End(kind);
        Ok(text)
    }
}
