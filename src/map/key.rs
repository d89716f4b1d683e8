//! Identity of a mapped property within a page.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::Serialize;
use smallvec::SmallVec;

use super::ConversionFailure;
use crate::common::{Error, Result, column_to_letters};

/// Name and column number used to locate a property's cells.
///
/// Two keys are equal when their names and numbers are equal. Alternate names
/// and the ignore-name flag only change how headers are matched.
#[derive(Debug, Clone, Serialize)]
pub struct PropertyMapKey {
    name: Option<String>,
    number: Option<u32>,
    #[serde(skip)]
    is_name_ignored: bool,
    #[serde(skip)]
    alternate_names: SmallVec<[String; 2]>,
}

impl PropertyMapKey {
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// 1-based column number.
    pub fn number(&self) -> Option<u32> {
        self.number
    }

    pub fn is_name_ignored(&self) -> bool {
        self.is_name_ignored
    }

    pub fn alternate_names(&self) -> &[String] {
        &self.alternate_names
    }

    /// Whether a header cell with this text names the key.
    pub fn matches_name(&self, text: &str) -> bool {
        if self.is_name_ignored {
            return false;
        }
        let text = text.trim();
        self.name.as_deref() == Some(text) || self.alternate_names.iter().any(|alt| alt == text)
    }

    /// Text written into the header cell.
    pub fn header_text(&self) -> Option<&str> {
        if self.is_name_ignored {
            None
        } else {
            self.name.as_deref()
        }
    }
}

impl PartialEq for PropertyMapKey {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.number == other.number
    }
}

impl Eq for PropertyMapKey {}

impl Hash for PropertyMapKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.number.hash(state);
    }
}

impl fmt::Display for PropertyMapKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.name, self.number) {
            (Some(name), Some(number)) => {
                write!(f, "'{}' (column {})", name, column_to_letters(number))
            },
            (Some(name), None) => write!(f, "'{}'", name),
            (None, Some(number)) => write!(f, "column {}", column_to_letters(number)),
            (None, None) => f.write_str("<unnamed>"),
        }
    }
}

/// Mutable form of a [`PropertyMapKey`] held by a property builder.
#[derive(Debug, Clone, Default)]
pub struct PropertyMapKeyBuilder {
    name: Option<String>,
    number: Option<u32>,
    is_name_ignored: bool,
    alternate_names: SmallVec<[String; 2]>,
}

impl PropertyMapKeyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(name: impl Into<String>) -> Result<Self> {
        let mut builder = Self::new();
        builder.name(name)?;
        Ok(builder)
    }

    pub fn name(&mut self, name: impl Into<String>) -> Result<&mut Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(Error::InvalidArgument("key name must not be empty".into()));
        }
        self.name = Some(name);
        Ok(self)
    }

    pub fn number(&mut self, number: u32) -> Result<&mut Self> {
        if number == 0 {
            return Err(Error::InvalidArgument(
                "column numbers start at 1".into(),
            ));
        }
        self.number = Some(number);
        Ok(self)
    }

    pub fn ignore_name(&mut self) -> &mut Self {
        self.is_name_ignored = true;
        self
    }

    /// Add a name also accepted in the header. Duplicates are kept once.
    pub fn alternate_name(&mut self, name: impl Into<String>) -> Result<&mut Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(Error::InvalidArgument(
                "alternate key name must not be empty".into(),
            ));
        }
        if !self.alternate_names.contains(&name) {
            self.alternate_names.push(name);
        }
        Ok(self)
    }

    pub fn build(&self) -> std::result::Result<PropertyMapKey, ConversionFailure> {
        if self.name.is_none() && self.number.is_none() {
            return Err(ConversionFailure::new::<PropertyMapKey>(
                "a key needs a name or a column number",
            ));
        }
        if self.is_name_ignored && self.number.is_none() {
            return Err(ConversionFailure::new::<PropertyMapKey>(
                "a key that ignores its name needs a column number",
            ));
        }
        Ok(PropertyMapKey {
            name: self.name.clone(),
            number: self.number,
            is_name_ignored: self.is_name_ignored,
            alternate_names: self.alternate_names.clone(),
        })
    }
}
