use bitflags::bitflags;
use serde::Serialize;

use super::{PropertyValue, Value};

bitflags! {
    /// Cell classifications a default value stands in for.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
    pub struct Resolutions: u8 {
        /// No cell in the column
        const MISSING = 0b001;
        /// Cell present without text
        const EMPTY = 0b010;
        /// Text that does not parse as the property type
        const INVALID = 0b100;
        /// Every non-success classification
        const ALL = Self::MISSING.bits() | Self::EMPTY.bits() | Self::INVALID.bits();
    }
}

/// Outcome of parsing one raw cell for one property.
#[derive(Debug, Clone, PartialEq)]
pub enum CellParse {
    Success(Value),
    Missing,
    Empty,
    /// Carries the raw cell text.
    Invalid(String),
}

impl CellParse {
    /// The resolution flag matching this classification, `None` on success.
    pub fn resolution(&self) -> Option<Resolutions> {
        match self {
            CellParse::Success(_) => None,
            CellParse::Missing => Some(Resolutions::MISSING),
            CellParse::Empty => Some(Resolutions::EMPTY),
            CellParse::Invalid(_) => Some(Resolutions::INVALID),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, CellParse::Success(_))
    }
}

/// Classify the raw text of a cell for a property of type `P`.
///
/// `None` means the row has no cell in the property's column. Nullable
/// types read an absent cell as `None` and an empty one as the inner type
/// would; `String` reads an empty cell as `""`.
pub fn classify<P: PropertyValue>(raw: Option<&str>) -> CellParse {
    match raw {
        None if P::NULLABLE => CellParse::Success(Value::Empty),
        None => CellParse::Missing,
        Some("") => match P::empty() {
            Some(value) => CellParse::Success(value.to_value()),
            None => CellParse::Empty,
        },
        Some(text) => match P::parse_text(text) {
            Some(value) => CellParse::Success(value.to_value()),
            None => CellParse::Invalid(text.to_string()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_integer() {
        assert_eq!(classify::<i32>(Some("42")), CellParse::Success(Value::Integer(42)));
        assert_eq!(classify::<i32>(None), CellParse::Missing);
        assert_eq!(classify::<i32>(Some("")), CellParse::Empty);
        assert_eq!(
            classify::<i32>(Some("forty-two")),
            CellParse::Invalid("forty-two".to_string())
        );
    }

    #[test]
    fn test_classify_nullable_and_text() {
        assert_eq!(classify::<Option<i32>>(None), CellParse::Success(Value::Empty));
        assert_eq!(classify::<Option<i32>>(Some("")), CellParse::Success(Value::Empty));
        assert_eq!(classify::<Option<i32>>(Some("7")), CellParse::Success(Value::Integer(7)));
        assert_eq!(classify::<String>(Some("")), CellParse::Success(Value::from("")));
        assert_eq!(classify::<String>(None), CellParse::Missing);
        assert_eq!(
            classify::<Option<String>>(Some("")),
            CellParse::Success(Value::from(""))
        );
        assert_eq!(classify::<Option<String>>(None), CellParse::Success(Value::Empty));
    }

    #[test]
    fn test_resolution_flags() {
        assert_eq!(CellParse::Missing.resolution(), Some(Resolutions::MISSING));
        assert_eq!(CellParse::Empty.resolution(), Some(Resolutions::EMPTY));
        assert_eq!(
            CellParse::Invalid(String::new()).resolution(),
            Some(Resolutions::INVALID)
        );
        assert_eq!(CellParse::Success(Value::Empty).resolution(), None);
        assert!(Resolutions::ALL.contains(Resolutions::MISSING | Resolutions::INVALID));
    }
}
