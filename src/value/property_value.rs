use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use super::{Value, ValueKind};
use crate::common::date::{serial_to_date, serial_to_datetime};

/// A Rust type that can back a mapped property.
pub trait PropertyValue: Clone + Send + Sync + 'static {
    const KIND: ValueKind;
    const NULLABLE: bool = false;

    fn to_value(&self) -> Value;

    /// Convert a dynamic value back, `None` when it does not fit.
    fn from_value(value: Value) -> Option<Self>;

    /// Parse non-empty cell text.
    fn parse_text(text: &str) -> Option<Self>;

    /// The value an empty cell stands for, if the type has one.
    fn empty() -> Option<Self> {
        None
    }
}

/// Property types that date-kind options can attach to.
pub trait TemporalValue: PropertyValue {}

/// Property types that string-kind options can attach to.
pub trait TextValue: PropertyValue {}

fn parse_integer(text: &str) -> Option<i64> {
    let text = text.trim();
    if let Ok(value) = atoi_simd::parse::<i64, false, false>(text.as_bytes()) {
        return Some(value);
    }
    // Numeric cells written by other tools often carry "3.0"
    let float: f64 = fast_float2::parse(text).ok()?;
    if float.is_finite() && float.fract() == 0.0 && float.abs() < i64::MAX as f64 {
        Some(float as i64)
    } else {
        None
    }
}

fn parse_float(text: &str) -> Option<f64> {
    fast_float2::parse(text.trim()).ok()
}

macro_rules! impl_integer_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl PropertyValue for $ty {
                const KIND: ValueKind = ValueKind::Integer;

                fn to_value(&self) -> Value {
                    Value::Integer(i64::from(*self))
                }

                fn from_value(value: Value) -> Option<Self> {
                    match value {
                        Value::Integer(i) => <$ty>::try_from(i).ok(),
                        Value::Float(f) if f.fract() == 0.0 => <$ty>::try_from(f as i64).ok(),
                        _ => None,
                    }
                }

                fn parse_text(text: &str) -> Option<Self> {
                    parse_integer(text).and_then(|i| <$ty>::try_from(i).ok())
                }
            }
        )*
    };
}

impl_integer_value!(i8, i16, i32, i64, u8, u16, u32);

impl PropertyValue for f64 {
    const KIND: ValueKind = ValueKind::Float;

    fn to_value(&self) -> Value {
        Value::Float(*self)
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Float(f) => Some(f),
            Value::Integer(i) => Some(i as f64),
            _ => None,
        }
    }

    fn parse_text(text: &str) -> Option<Self> {
        parse_float(text)
    }
}

impl PropertyValue for f32 {
    const KIND: ValueKind = ValueKind::Float;

    fn to_value(&self) -> Value {
        Value::Float(f64::from(*self))
    }

    fn from_value(value: Value) -> Option<Self> {
        f64::from_value(value).map(|f| f as f32)
    }

    fn parse_text(text: &str) -> Option<Self> {
        parse_float(text).map(|f| f as f32)
    }
}

impl PropertyValue for bool {
    const KIND: ValueKind = ValueKind::Bool;

    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(b),
            _ => None,
        }
    }

    fn parse_text(text: &str) -> Option<Self> {
        match text.trim() {
            "1" => Some(true),
            "0" => Some(false),
            t if t.eq_ignore_ascii_case("true") => Some(true),
            t if t.eq_ignore_ascii_case("false") => Some(false),
            _ => None,
        }
    }
}

impl PropertyValue for String {
    const KIND: ValueKind = ValueKind::Text;

    fn to_value(&self) -> Value {
        Value::Text(self.clone())
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    fn parse_text(text: &str) -> Option<Self> {
        Some(text.to_string())
    }

    fn empty() -> Option<Self> {
        Some(String::new())
    }
}

impl TextValue for String {}

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

impl PropertyValue for NaiveDate {
    const KIND: ValueKind = ValueKind::Date;

    fn to_value(&self) -> Value {
        Value::Date(*self)
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Date(d) => Some(d),
            Value::DateTime(dt) => Some(dt.date()),
            _ => None,
        }
    }

    fn parse_text(text: &str) -> Option<Self> {
        let text = text.trim();
        DATE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
            .or_else(|| parse_float(text).and_then(serial_to_date))
            .or_else(|| NaiveDateTime::parse_text(text).map(|dt| dt.date()))
    }
}

impl TemporalValue for NaiveDate {}

impl PropertyValue for NaiveDateTime {
    const KIND: ValueKind = ValueKind::DateTime;

    fn to_value(&self) -> Value {
        Value::DateTime(*self)
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::DateTime(dt) => Some(dt),
            Value::Date(d) => NaiveTime::from_hms_opt(0, 0, 0).map(|t| d.and_time(t)),
            _ => None,
        }
    }

    fn parse_text(text: &str) -> Option<Self> {
        let text = text.trim();
        if let Some(dt) = DATETIME_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        {
            return Some(dt);
        }
        if let Some(date) = DATE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        {
            return NaiveTime::from_hms_opt(0, 0, 0).map(|t| date.and_time(t));
        }
        parse_float(text).and_then(serial_to_datetime)
    }
}

impl TemporalValue for NaiveDateTime {}

impl<P: PropertyValue> PropertyValue for Option<P> {
    const KIND: ValueKind = P::KIND;
    const NULLABLE: bool = true;

    fn to_value(&self) -> Value {
        match self {
            Some(value) => value.to_value(),
            None => Value::Empty,
        }
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Empty => Some(None),
            other => P::from_value(other).map(Some),
        }
    }

    fn parse_text(text: &str) -> Option<Self> {
        P::parse_text(text).map(Some)
    }

    fn empty() -> Option<Self> {
        Some(P::empty())
    }
}

impl<P: TemporalValue> TemporalValue for Option<P> {}

impl<P: TextValue> TextValue for Option<P> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_parsing() {
        assert_eq!(i32::parse_text("12"), Some(12));
        assert_eq!(i32::parse_text(" -3 "), Some(-3));
        assert_eq!(i64::parse_text("4.0"), Some(4));
        assert_eq!(i32::parse_text("4.5"), None);
        assert_eq!(u8::parse_text("300"), None);
        assert_eq!(u8::from_value(Value::Integer(-1)), None);
    }

    #[test]
    fn test_float_and_bool_parsing() {
        assert_eq!(f64::parse_text("1.25"), Some(1.25));
        assert_eq!(f64::parse_text("1e3"), Some(1000.0));
        assert_eq!(f64::parse_text("abc"), None);
        assert_eq!(bool::parse_text("1"), Some(true));
        assert_eq!(bool::parse_text("FALSE"), Some(false));
        assert_eq!(bool::parse_text("yes"), None);
    }

    #[test]
    fn test_date_parsing() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        assert_eq!(NaiveDate::parse_text("2024-03-15"), Some(date));
        assert_eq!(NaiveDate::parse_text("45366"), Some(date));
        assert_eq!(NaiveDate::parse_text("2024-03-15T10:00:00"), Some(date));
        assert_eq!(NaiveDate::parse_text("someday"), None);

        let dt = date.and_hms_opt(12, 0, 0).unwrap();
        assert_eq!(NaiveDateTime::parse_text("2024-03-15 12:00:00"), Some(dt));
        assert_eq!(NaiveDateTime::parse_text("45366.5"), Some(dt));
    }

    #[test]
    fn test_option_round_trip_through_value() {
        assert_eq!(Some(5i32).to_value(), Value::Integer(5));
        assert_eq!(None::<i32>.to_value(), Value::Empty);
        assert_eq!(Option::<i32>::from_value(Value::Empty), Some(None));
        assert_eq!(Option::<i32>::from_value(Value::Integer(5)), Some(Some(5)));
        assert_eq!(Option::<i32>::from_value(Value::from("x")), None);
    }
}
