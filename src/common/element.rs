//! Logical element and attribute kinds of a worksheet part.
//!
//! The element reader and writer seams address elements by kind so that the
//! engines never deal with qualified names.

/// Worksheet element kinds the engines work with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Worksheet,
    SheetData,
    Row,
    Cell,
    /// `<v>`: stored cell value
    Value,
    /// `<is>`: inline rich string
    InlineString,
    /// `<t>`: text run
    Text,
    Other,
}

impl ElementKind {
    pub fn local_name(&self) -> &'static str {
        match self {
            Self::Worksheet => "worksheet",
            Self::SheetData => "sheetData",
            Self::Row => "row",
            Self::Cell => "c",
            Self::Value => "v",
            Self::InlineString => "is",
            Self::Text => "t",
            Self::Other => "",
        }
    }

    pub fn from_local_name(name: &[u8]) -> Self {
        match name {
            b"worksheet" => Self::Worksheet,
            b"sheetData" => Self::SheetData,
            b"row" => Self::Row,
            b"c" => Self::Cell,
            b"v" => Self::Value,
            b"is" => Self::InlineString,
            b"t" => Self::Text,
            _ => Self::Other,
        }
    }
}

/// Attribute kinds, resolved against the element that carries them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeKind {
    /// `r` on a cell: its A1 reference
    Reference,
    /// `r` on a row: its 1-based number
    RowNumber,
    /// `t` on a cell
    CellType,
    /// `s` on a cell: style index
    Style,
    /// `xml:space` on a text run
    Space,
    /// `xmlns` on the root element
    Namespace,
}

impl AttributeKind {
    pub fn qualified_name(&self) -> &'static str {
        match self {
            Self::Reference | Self::RowNumber => "r",
            Self::CellType => "t",
            Self::Style => "s",
            Self::Space => "xml:space",
            Self::Namespace => "xmlns",
        }
    }

    /// Kind of the attribute `name` (qualified) found on an `element`.
    pub fn resolve(element: ElementKind, name: &[u8]) -> Option<Self> {
        match (element, name) {
            (ElementKind::Row, b"r") => Some(Self::RowNumber),
            (ElementKind::Cell, b"r") => Some(Self::Reference),
            (ElementKind::Cell, b"t") => Some(Self::CellType),
            (ElementKind::Cell, b"s") => Some(Self::Style),
            (_, b"xml:space") => Some(Self::Space),
            (_, b"xmlns") => Some(Self::Namespace),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for kind in [
            ElementKind::Worksheet,
            ElementKind::SheetData,
            ElementKind::Row,
            ElementKind::Cell,
            ElementKind::Value,
            ElementKind::InlineString,
            ElementKind::Text,
        ] {
            assert_eq!(ElementKind::from_local_name(kind.local_name().as_bytes()), kind);
        }
        assert_eq!(ElementKind::from_local_name(b"f"), ElementKind::Other);
    }

    #[test]
    fn test_attribute_depends_on_element() {
        assert_eq!(
            AttributeKind::resolve(ElementKind::Row, b"r"),
            Some(AttributeKind::RowNumber)
        );
        assert_eq!(
            AttributeKind::resolve(ElementKind::Cell, b"r"),
            Some(AttributeKind::Reference)
        );
        assert_eq!(AttributeKind::resolve(ElementKind::Row, b"spans"), None);
    }
}
