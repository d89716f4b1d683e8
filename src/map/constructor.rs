//! Resource construction: the constructors a resource offers and the plan a
//! built map uses to create resources from cell values.

use std::fmt;
use std::sync::Arc;

use super::PropertyMap;
use crate::value::{PropertyType, PropertyValue, Value};

/// A record type that can be mapped to spreadsheet rows.
///
/// `constructors` lists the ways to create the type from property values.
/// Types built through setters only need a parameterless constructor, which
/// [`Constructor::from_default`] provides for `Default` types.
pub trait Resource: Sized + Send + Sync + 'static {
    fn constructors() -> Vec<Constructor<Self>> {
        Vec::new()
    }
}

/// Parameter list of a constructor, implemented for tuples of property values.
pub trait ConstructorArgs: Sized + 'static {
    fn parameter_types() -> Vec<PropertyType>;

    /// Convert positional values into the tuple. `None` on arity or type mismatch.
    fn from_values(values: Vec<Value>) -> Option<Self>;
}

macro_rules! impl_constructor_args {
    ($($arg:ident),*) => {
        impl<$($arg: PropertyValue),*> ConstructorArgs for ($($arg,)*) {
            fn parameter_types() -> Vec<PropertyType> {
                vec![$(PropertyType::of::<$arg>()),*]
            }

            #[allow(non_snake_case)]
            fn from_values(values: Vec<Value>) -> Option<Self> {
                let mut values = values.into_iter();
                $(let $arg = <$arg as PropertyValue>::from_value(values.next()?)?;)*
                if values.next().is_some() {
                    return None;
                }
                Some(($($arg,)*))
            }
        }
    };
}

impl_constructor_args!();
impl_constructor_args!(A);
impl_constructor_args!(A, B);
impl_constructor_args!(A, B, C);
impl_constructor_args!(A, B, C, D);
impl_constructor_args!(A, B, C, D, E);
impl_constructor_args!(A, B, C, D, E, F);
impl_constructor_args!(A, B, C, D, E, F, G);
impl_constructor_args!(A, B, C, D, E, F, G, H);
impl_constructor_args!(A, B, C, D, E, F, G, H, I);
impl_constructor_args!(A, B, C, D, E, F, G, H, I, J);
impl_constructor_args!(A, B, C, D, E, F, G, H, I, J, K);
impl_constructor_args!(A, B, C, D, E, F, G, H, I, J, K, L);

/// One way of creating a `T` from positional property values.
pub struct Constructor<T> {
    parameters: Vec<PropertyType>,
    invoke: Arc<dyn Fn(Vec<Value>) -> Option<T> + Send + Sync>,
}

impl<T: 'static> Constructor<T> {
    /// Wrap a function taking a tuple of property values.
    ///
    /// ```
    /// use sheet_cartographer::Constructor;
    ///
    /// struct Person { id: i32, name: String }
    ///
    /// let ctor = Constructor::new(|(id, name): (i32, String)| Person { id, name });
    /// assert_eq!(ctor.parameters().len(), 2);
    /// ```
    pub fn new<A, F>(f: F) -> Self
    where
        A: ConstructorArgs,
        F: Fn(A) -> T + Send + Sync + 'static,
    {
        Self {
            parameters: A::parameter_types(),
            invoke: Arc::new(move |values| A::from_values(values).map(&f)),
        }
    }

    pub fn from_default() -> Self
    where
        T: Default,
    {
        Self::new(|(): ()| T::default())
    }
}

impl<T> Constructor<T> {
    pub fn parameters(&self) -> &[PropertyType] {
        &self.parameters
    }

    pub fn is_parameterless(&self) -> bool {
        self.parameters.is_empty()
    }

    /// Whether the parameter types are exactly `types`, in order.
    pub fn accepts(&self, types: &[PropertyType]) -> bool {
        self.parameters.as_slice() == types
    }

    pub fn invoke(&self, values: Vec<Value>) -> Option<T> {
        (self.invoke)(values)
    }
}

impl<T> Clone for Constructor<T> {
    fn clone(&self) -> Self {
        Self {
            parameters: self.parameters.clone(),
            invoke: Arc::clone(&self.invoke),
        }
    }
}

impl<T> fmt::Debug for Constructor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Constructor").field(&self.parameters).finish()
    }
}

/// How a built map creates resources.
pub enum ConstructionPlan<T> {
    /// Call `constructor` with the properties at `parameters`; set the rest.
    ExplicitConstructor {
        constructor: Constructor<T>,
        parameters: Vec<usize>,
    },
    /// Call `constructor` with every property in declaration order.
    ImplicitConstructor { constructor: Constructor<T> },
    /// Call the parameterless `constructor`, then set every property.
    PropertySetters { constructor: Constructor<T> },
}

impl<T> ConstructionPlan<T> {
    pub fn constructor(&self) -> &Constructor<T> {
        match self {
            ConstructionPlan::ExplicitConstructor { constructor, .. }
            | ConstructionPlan::ImplicitConstructor { constructor }
            | ConstructionPlan::PropertySetters { constructor } => constructor,
        }
    }

    /// Whether the property at `index` must have a value to construct.
    pub fn requires(&self, index: usize) -> bool {
        match self {
            ConstructionPlan::ExplicitConstructor { parameters, .. } => parameters.contains(&index),
            ConstructionPlan::ImplicitConstructor { .. } => true,
            ConstructionPlan::PropertySetters { .. } => false,
        }
    }

    /// Create a resource from per-property values, indexed like `properties`.
    ///
    /// `None` entries are properties without a value on this row; constructor
    /// parameters receive [`Value::Empty`] for them.
    pub fn construct(
        &self,
        properties: &[PropertyMap<T>],
        mut values: Vec<Option<Value>>,
    ) -> Option<T> {
        match self {
            ConstructionPlan::ExplicitConstructor {
                constructor,
                parameters,
            } => {
                let arguments = parameters
                    .iter()
                    .map(|&index| {
                        values
                            .get_mut(index)
                            .and_then(Option::take)
                            .unwrap_or(Value::Empty)
                    })
                    .collect();
                let mut resource = constructor.invoke(arguments)?;
                set_properties(&mut resource, properties, values);
                Some(resource)
            },
            ConstructionPlan::ImplicitConstructor { constructor } => {
                let arguments = values
                    .into_iter()
                    .map(|value| value.unwrap_or(Value::Empty))
                    .collect();
                constructor.invoke(arguments)
            },
            ConstructionPlan::PropertySetters { constructor } => {
                let mut resource = constructor.invoke(Vec::new())?;
                set_properties(&mut resource, properties, values);
                Some(resource)
            },
        }
    }
}

impl<T> Clone for ConstructionPlan<T> {
    fn clone(&self) -> Self {
        match self {
            ConstructionPlan::ExplicitConstructor {
                constructor,
                parameters,
            } => ConstructionPlan::ExplicitConstructor {
                constructor: constructor.clone(),
                parameters: parameters.clone(),
            },
            ConstructionPlan::ImplicitConstructor { constructor } => {
                ConstructionPlan::ImplicitConstructor {
                    constructor: constructor.clone(),
                }
            },
            ConstructionPlan::PropertySetters { constructor } => ConstructionPlan::PropertySetters {
                constructor: constructor.clone(),
            },
        }
    }
}

impl<T> fmt::Debug for ConstructionPlan<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstructionPlan::ExplicitConstructor {
                constructor,
                parameters,
            } => f
                .debug_struct("ExplicitConstructor")
                .field("constructor", constructor)
                .field("parameters", parameters)
                .finish(),
            ConstructionPlan::ImplicitConstructor { constructor } => f
                .debug_struct("ImplicitConstructor")
                .field("constructor", constructor)
                .finish(),
            ConstructionPlan::PropertySetters { constructor } => f
                .debug_struct("PropertySetters")
                .field("constructor", constructor)
                .finish(),
        }
    }
}

fn set_properties<T>(
    resource: &mut T,
    properties: &[PropertyMap<T>],
    values: Vec<Option<Value>>,
) {
    for (property, value) in properties.iter().zip(values) {
        if let Some(value) = value
            && property.accessor().can_set()
            && !property.accessor().set(resource, value)
        {
            tracing::warn!(property = property.name(), "value did not fit the property setter");
        }
    }
}
