use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use super::PropertyValue;

/// Kind of value a property holds, with `Option` unwrapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ValueKind {
    Bool,
    Integer,
    Float,
    Text,
    Date,
    DateTime,
}

/// Dynamic value read from or written to a cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// No value (a `None` property, or an empty cell)
    Empty,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl Value {
    /// Kind of the value, `None` for [`Value::Empty`].
    pub fn kind(&self) -> Option<ValueKind> {
        match self {
            Value::Empty => None,
            Value::Bool(_) => Some(ValueKind::Bool),
            Value::Integer(_) => Some(ValueKind::Integer),
            Value::Float(_) => Some(ValueKind::Float),
            Value::Text(_) => Some(ValueKind::Text),
            Value::Date(_) => Some(ValueKind::Date),
            Value::DateTime(_) => Some(ValueKind::DateTime),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Value::Empty)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<NaiveDate> for Value {
    fn from(date: NaiveDate) -> Self {
        Value::Date(date)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(dt: NaiveDateTime) -> Self {
        Value::DateTime(dt)
    }
}

/// Static type of a mapped property.
///
/// Identity is the Rust [`TypeId`]: constructor parameters must match it
/// exactly. The kind ignores nullability, so `Option<NaiveDate>` and
/// `NaiveDate` share [`ValueKind::Date`].
#[derive(Clone, Copy)]
pub struct PropertyType {
    id: TypeId,
    name: &'static str,
    kind: ValueKind,
    nullable: bool,
}

impl PropertyType {
    pub fn of<P: PropertyValue>() -> Self {
        Self {
            id: TypeId::of::<P>(),
            name: std::any::type_name::<P>(),
            kind: P::KIND,
            nullable: P::NULLABLE,
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// Whether an option restricted to `allowed` may attach to this type.
    ///
    /// An empty set allows every kind.
    pub fn allows(&self, allowed: &[ValueKind]) -> bool {
        allowed.is_empty() || allowed.contains(&self.kind)
    }

    /// Whether `value` could be stored in a property of this type.
    pub fn accepts(&self, value: &Value) -> bool {
        match value.kind() {
            None => self.nullable,
            Some(kind) => kind == self.kind,
        }
    }
}

impl PartialEq for PropertyType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for PropertyType {}

impl Hash for PropertyType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
