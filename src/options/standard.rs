//! Options understood by the read and write engines.

use bitflags::bitflags;
use serde::Serialize;

use super::Extension;
use crate::value::{Resolutions, Value, ValueKind};
use crate::write::StyleRef;

/// Row holding the header cells of a page (1-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderRowNumber(pub u32);

impl HeaderRowNumber {
    pub const DEFAULT: HeaderRowNumber = HeaderRowNumber(1);
}

impl Extension for HeaderRowNumber {}

/// What a page read does after a row fails to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum ResourceReadingPolicy {
    /// Record the failure and keep reading the remaining rows.
    #[default]
    ContinueOnFailure,
    /// Record the failure and stop. Resources read so far are kept.
    ExitOnFailure,
}

impl Extension for ResourceReadingPolicy {}

bitflags! {
    /// Elements of a page in which a property may be absent.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
    pub struct OptionalElements: u8 {
        const HEADER = 0b01;
        const BODY = 0b10;
        const ALL = Self::HEADER.bits() | Self::BODY.bits();
    }
}

impl Extension for OptionalElements {}

/// Value substituted for a cell whose classification is in `resolutions`.
#[derive(Debug, Clone, PartialEq)]
pub struct DefaultValue {
    pub value: Value,
    pub resolutions: Resolutions,
}

impl DefaultValue {
    /// The default for a cell of the given classification, if it resolves it.
    pub fn resolve(&self, classification: Resolutions) -> Option<&Value> {
        self.resolutions
            .contains(classification)
            .then_some(&self.value)
    }
}

impl Extension for DefaultValue {}

/// Style applied to a property's header cell.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderStyle(pub StyleRef);

impl Extension for HeaderStyle {}

/// Style applied to a property's body cells.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyStyle(pub StyleRef);

impl Extension for BodyStyle {}

/// How date and date-time cells are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateKind {
    /// 1900-system serial number with a date number format.
    #[default]
    Serial,
    /// ISO 8601 text.
    Text,
}

impl Extension for DateKind {
    const ALLOWED_KINDS: &'static [ValueKind] = &[ValueKind::Date, ValueKind::DateTime];
}

/// How text cells are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StringKind {
    /// Index into the document's shared string table.
    #[default]
    Shared,
    /// Inline `<is>` element in the cell.
    Inline,
}

impl Extension for StringKind {
    const ALLOWED_KINDS: &'static [ValueKind] = &[ValueKind::Text];
}

/// Resources are built by the constructor taking the named properties, in
/// this order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplicitConstructorOption {
    pub names: Vec<String>,
}

impl Extension for ExplicitConstructorOption {}

/// Resources are built by the constructor taking every mapped property in
/// declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImplicitConstructorOption;

impl Extension for ImplicitConstructorOption {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_value_resolves_selected_classifications() {
        let default = DefaultValue {
            value: Value::Integer(0),
            resolutions: Resolutions::MISSING,
        };
        assert_eq!(default.resolve(Resolutions::MISSING), Some(&Value::Integer(0)));
        assert_eq!(default.resolve(Resolutions::INVALID), None);
        assert_eq!(default.resolve(Resolutions::EMPTY), None);
    }

    #[test]
    fn test_optional_elements_all() {
        assert!(OptionalElements::ALL.contains(OptionalElements::HEADER));
        assert!(OptionalElements::ALL.contains(OptionalElements::BODY));
        assert!(!OptionalElements::BODY.contains(OptionalElements::HEADER));
    }
}
