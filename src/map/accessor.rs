use std::fmt;
use std::sync::Arc;

use crate::value::{CellParse, PropertyType, PropertyValue, Value, classify};

type Getter<T> = Arc<dyn Fn(&T) -> Value + Send + Sync>;
type Setter<T> = Arc<dyn Fn(&mut T, Value) -> bool + Send + Sync>;

/// Read and optional write capability for one property of `T`.
///
/// The typed getter and setter are captured once at configuration time and
/// exchange [`Value`]s with the engines.
pub struct PropertyAccessor<T> {
    property_type: PropertyType,
    getter: Getter<T>,
    setter: Option<Setter<T>>,
    classify: fn(Option<&str>) -> CellParse,
}

impl<T: 'static> PropertyAccessor<T> {
    pub fn new<P, G>(getter: G) -> Self
    where
        P: PropertyValue,
        G: Fn(&T) -> &P + Send + Sync + 'static,
    {
        Self {
            property_type: PropertyType::of::<P>(),
            getter: Arc::new(move |resource: &T| getter(resource).to_value()),
            setter: None,
            classify: classify::<P>,
        }
    }

    /// Attach a setter. `P` must be the getter's property type.
    pub(crate) fn set_setter<P, F>(&mut self, setter: F)
    where
        P: PropertyValue,
        F: Fn(&mut T, P) + Send + Sync + 'static,
    {
        debug_assert_eq!(self.property_type, PropertyType::of::<P>());
        self.setter = Some(Arc::new(move |resource: &mut T, value: Value| {
            match P::from_value(value) {
                Some(value) => {
                    setter(resource, value);
                    true
                },
                None => false,
            }
        }));
    }
}

impl<T> PropertyAccessor<T> {
    pub fn property_type(&self) -> PropertyType {
        self.property_type
    }

    pub fn get(&self, resource: &T) -> Value {
        (self.getter)(resource)
    }

    pub fn can_set(&self) -> bool {
        self.setter.is_some()
    }

    /// Store `value` into `resource`. Returns `false` without a setter or when
    /// the value does not fit the property type.
    pub fn set(&self, resource: &mut T, value: Value) -> bool {
        match &self.setter {
            Some(setter) => setter(resource, value),
            None => false,
        }
    }

    /// Classify raw cell text against the property type.
    pub fn classify(&self, raw: Option<&str>) -> CellParse {
        (self.classify)(raw)
    }
}

impl<T> Clone for PropertyAccessor<T> {
    fn clone(&self) -> Self {
        Self {
            property_type: self.property_type,
            getter: Arc::clone(&self.getter),
            setter: self.setter.clone(),
            classify: self.classify,
        }
    }
}

impl<T> fmt::Debug for PropertyAccessor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyAccessor")
            .field("property_type", &self.property_type)
            .field("can_set", &self.can_set())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Item {
        count: u16,
    }

    #[test]
    fn test_get_and_set() {
        let mut accessor = PropertyAccessor::<Item>::new(|item: &Item| &item.count);
        let mut item = Item { count: 3 };

        assert_eq!(accessor.get(&item), Value::Integer(3));
        assert!(!accessor.can_set());
        assert!(!accessor.set(&mut item, Value::Integer(4)));

        accessor.set_setter(|item: &mut Item, count: u16| item.count = count);
        assert!(accessor.set(&mut item, Value::Integer(4)));
        assert_eq!(item.count, 4);
        assert!(!accessor.set(&mut item, Value::Integer(-1)));
        assert!(!accessor.set(&mut item, Value::from("4")));
    }

    #[test]
    fn test_classify_uses_property_type() {
        let accessor = PropertyAccessor::<Item>::new(|item: &Item| &item.count);
        assert_eq!(accessor.classify(Some("9")), CellParse::Success(Value::Integer(9)));
        assert_eq!(accessor.classify(Some("-9")), CellParse::Invalid("-9".into()));
    }
}
