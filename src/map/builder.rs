//! Fluent configuration of resource maps and the two-phase build.

use std::marker::PhantomData;

use super::registration::{
    BodyStyleRegistration, DateKindRegistration, DefaultValueRegistration,
    ExplicitConstructorRegistration, HeaderRowRegistration, HeaderStyleRegistration,
    ImplicitConstructorRegistration, OptionalElementsRegistration, PropertyRegistration,
    ReadingPolicyRegistration, Registrations, ResourceRegistration, StringKindRegistration,
};
use super::{
    AggregateValidator, ConstructionPlan, Constructor, ConversionFailure, PropertyAccessor,
    PropertyMap, PropertyMapError, PropertyMapKeyBuilder, Resource, ResourceMap,
    ResourceMapError, StructuralValidator, ValidationFailure,
};
use crate::common::{Error, Result};
use crate::options::{
    DateKind, Draft, ExplicitConstructorOption, ImplicitConstructorOption, OptionalElements,
    PropertyMapOptions, ResourceMapOptions, ResourceReadingPolicy, StringKind, short_type_name,
};
use crate::value::{PropertyType, PropertyValue, Resolutions, TemporalValue, TextValue};
use crate::write::StyleRef;

/// Either a built resource map or every failure found while building it.
pub type ResourceMapResult<T> = std::result::Result<ResourceMap<T>, ResourceMapError>;

/// Either a built property map or every failure found while building it.
pub type PropertyMapResult<T> = std::result::Result<PropertyMap<T>, PropertyMapError>;

/// Builder-time state of one mapped property.
pub struct PropertyMapBuilder<T: Resource> {
    name: String,
    accessor: PropertyAccessor<T>,
    key: PropertyMapKeyBuilder,
    registrations: Registrations<dyn PropertyRegistration<T>>,
}

impl<T: Resource> PropertyMapBuilder<T> {
    fn new(name: String, accessor: PropertyAccessor<T>) -> Result<Self> {
        let key = PropertyMapKeyBuilder::with_name(name.as_str())?;
        Ok(Self {
            name,
            accessor,
            key,
            registrations: Registrations::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn property_type(&self) -> PropertyType {
        self.accessor.property_type()
    }

    pub fn accessor(&self) -> &PropertyAccessor<T> {
        &self.accessor
    }

    pub fn key(&self) -> &PropertyMapKeyBuilder {
        &self.key
    }

    pub fn registrations(&self) -> &Registrations<dyn PropertyRegistration<T>> {
        &self.registrations
    }

    /// Convert the key and every registration, collecting all failures.
    pub fn build(&self) -> PropertyMapResult<T> {
        let mut failures = Vec::new();

        let key = match self.key.build() {
            Ok(key) => Some(key),
            Err(failure) => {
                failures.push(failure);
                None
            },
        };

        let mut options = PropertyMapOptions::<T, Draft>::new(self.property_type());
        for (name, registration) in self.registrations.entries() {
            let entry = match registration.convert(self) {
                Ok(entry) => entry,
                Err(failure) => {
                    failures.push(failure);
                    continue;
                },
            };
            if let Err(err) = options.insert_entry(entry) {
                failures.push(ConversionFailure {
                    registration: name,
                    message: err.to_string(),
                });
            }
        }

        match key {
            Some(key) if failures.is_empty() => Ok(PropertyMap::new(
                self.name.clone(),
                self.accessor.clone(),
                key,
                options.freeze(),
            )),
            _ => Err(PropertyMapError {
                property: self.name.clone(),
                failures,
            }),
        }
    }
}

/// Typed handle for configuring one property of `T` holding a `P`.
pub struct PropertyConfig<'a, T: Resource, P> {
    builder: &'a mut PropertyMapBuilder<T>,
    _marker: PhantomData<fn() -> P>,
}

impl<T: Resource, P: PropertyValue> PropertyConfig<'_, T, P> {
    /// Allow the property to be populated after construction.
    pub fn setter<F>(self, setter: F) -> Self
    where
        F: Fn(&mut T, P) + Send + Sync + 'static,
    {
        self.builder.accessor.set_setter(setter);
        self
    }

    /// Header name, replacing the property name.
    pub fn name(self, name: impl Into<String>) -> Result<Self> {
        self.builder.key.name(name)?;
        Ok(self)
    }

    /// 1-based column number.
    pub fn number(self, number: u32) -> Result<Self> {
        self.builder.key.number(number)?;
        Ok(self)
    }

    /// Match the header by column number only.
    pub fn ignore_name(self) -> Self {
        self.builder.key.ignore_name();
        self
    }

    pub fn alternate_name(self, name: impl Into<String>) -> Result<Self> {
        self.builder.key.alternate_name(name)?;
        Ok(self)
    }

    /// Use `value` when a cell is classified as one of `resolutions`.
    pub fn default_value(self, value: P, resolutions: Resolutions) -> Self {
        self.builder.registrations.set(DefaultValueRegistration {
            value: value.to_value(),
            resolutions,
        });
        self
    }

    pub fn optional(self, elements: OptionalElements) -> Self {
        self.builder
            .registrations
            .set(OptionalElementsRegistration(elements));
        self
    }

    pub fn header_style(self, style: StyleRef) -> Self {
        self.builder.registrations.set(HeaderStyleRegistration(style));
        self
    }

    pub fn body_style(self, style: StyleRef) -> Self {
        self.builder.registrations.set(BodyStyleRegistration(style));
        self
    }

    /// Declare an application-defined registration.
    ///
    /// Fails when the registration does not allow this property's kind.
    pub fn registration<X: PropertyRegistration<T>>(self, registration: X) -> Result<Self> {
        let property_type = self.builder.property_type();
        if !property_type.allows(registration.allowed_kinds()) {
            return Err(Error::ExtensionNotAllowed {
                extension: short_type_name::<X>(),
                kind: property_type.kind(),
            });
        }
        self.builder.registrations.set(registration);
        Ok(self)
    }

    /// Declare `registration` unless this property's kind is not allowed or
    /// one of the same type is already declared.
    pub fn try_registration<X: PropertyRegistration<T>>(&mut self, registration: X) -> bool {
        let kind = self.builder.property_type().kind();
        self.builder.registrations.try_add(registration, kind)
    }
}

impl<T: Resource, P: TemporalValue> PropertyConfig<'_, T, P> {
    pub fn date_kind(self, kind: DateKind) -> Self {
        self.builder.registrations.set(DateKindRegistration(kind));
        self
    }
}

impl<T: Resource, P: TextValue> PropertyConfig<'_, T, P> {
    pub fn string_kind(self, kind: StringKind) -> Self {
        self.builder.registrations.set(StringKindRegistration(kind));
        self
    }
}

/// Mutable configuration of the map for resource type `T`.
///
/// ```
/// use sheet_cartographer::{Constructor, Resource, ResourceMapBuilder};
///
/// #[derive(Default)]
/// struct Person {
///     id: i32,
///     name: String,
/// }
///
/// impl Resource for Person {
///     fn constructors() -> Vec<Constructor<Self>> {
///         vec![Constructor::from_default()]
///     }
/// }
///
/// # fn main() -> sheet_cartographer::Result<()> {
/// let mut builder = ResourceMapBuilder::<Person>::new();
/// builder
///     .property("id", |p: &Person| &p.id)?
///     .setter(|p, id| p.id = id)
///     .name("Id")?;
/// builder
///     .property("name", |p: &Person| &p.name)?
///     .setter(|p, name| p.name = name);
///
/// let map = builder.build().unwrap();
/// assert_eq!(map.properties().len(), 2);
/// # Ok(())
/// # }
/// ```
pub struct ResourceMapBuilder<T: Resource> {
    properties: Vec<PropertyMapBuilder<T>>,
    registrations: Registrations<dyn ResourceRegistration<T>>,
    property_registrations: Registrations<dyn PropertyRegistration<T>>,
    constructors: Vec<Constructor<T>>,
    validators: AggregateValidator<T>,
}

impl<T: Resource> ResourceMapBuilder<T> {
    pub fn new() -> Self {
        Self {
            properties: Vec::new(),
            registrations: Registrations::new(),
            property_registrations: Registrations::new(),
            constructors: T::constructors(),
            validators: AggregateValidator::default(),
        }
    }

    /// Map a property. Declaration order is the implicit constructor's
    /// parameter order and the default column order when writing.
    pub fn property<P, G>(
        &mut self,
        name: impl Into<String>,
        getter: G,
    ) -> Result<PropertyConfig<'_, T, P>>
    where
        P: PropertyValue,
        G: Fn(&T) -> &P + Send + Sync + 'static,
    {
        let name = name.into();
        if self.property_index(&name).is_some() {
            return Err(Error::InvalidArgument(format!(
                "property '{}' is already mapped",
                name
            )));
        }
        self.properties
            .push(PropertyMapBuilder::new(name, PropertyAccessor::new(getter))?);
        let index = self.properties.len() - 1;
        Ok(PropertyConfig {
            builder: &mut self.properties[index],
            _marker: PhantomData,
        })
    }

    pub fn header_row(&mut self, row: u32) -> Result<&mut Self> {
        if row == 0 {
            return Err(Error::InvalidArgument("row numbers start at 1".into()));
        }
        self.registrations.set(HeaderRowRegistration(row));
        Ok(self)
    }

    pub fn reading_policy(&mut self, policy: ResourceReadingPolicy) -> &mut Self {
        self.registrations.set(ReadingPolicyRegistration(policy));
        self
    }

    /// Construct resources through the constructor taking these properties.
    pub fn explicit_constructor<I, S>(&mut self, names: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.registrations.set(ExplicitConstructorRegistration {
            names: names.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Construct resources through the constructor taking every property.
    pub fn implicit_constructor(&mut self) -> &mut Self {
        self.registrations.set(ImplicitConstructorRegistration);
        self
    }

    /// Add a constructor to those declared by [`Resource::constructors`].
    pub fn constructor(&mut self, constructor: Constructor<T>) -> &mut Self {
        self.constructors.push(constructor);
        self
    }

    /// Make every property optional in `elements` unless it says otherwise.
    pub fn optional(&mut self, elements: OptionalElements) -> &mut Self {
        self.property_registration(OptionalElementsRegistration(elements))
    }

    pub fn header_style(&mut self, style: StyleRef) -> &mut Self {
        self.property_registration(HeaderStyleRegistration(style))
    }

    pub fn body_style(&mut self, style: StyleRef) -> &mut Self {
        self.property_registration(BodyStyleRegistration(style))
    }

    /// Date kind for every date property that does not set its own.
    pub fn date_kind(&mut self, kind: DateKind) -> &mut Self {
        self.property_registration(DateKindRegistration(kind))
    }

    /// String kind for every text property that does not set its own.
    pub fn string_kind(&mut self, kind: StringKind) -> &mut Self {
        self.property_registration(StringKindRegistration(kind))
    }

    pub fn registration<X: ResourceRegistration<T>>(&mut self, registration: X) -> &mut Self {
        self.registrations.set(registration);
        self
    }

    /// Declare a property registration for every property it allows.
    pub fn property_registration<X: PropertyRegistration<T>>(
        &mut self,
        registration: X,
    ) -> &mut Self {
        self.property_registrations.set(registration);
        self
    }

    pub fn validator<V: StructuralValidator<T> + 'static>(&mut self, validator: V) -> &mut Self {
        self.validators.push(validator);
        self
    }

    pub fn properties(&self) -> &[PropertyMapBuilder<T>] {
        &self.properties
    }

    pub fn property_builder(&self, name: &str) -> Option<&PropertyMapBuilder<T>> {
        self.properties.iter().find(|property| property.name == name)
    }

    fn property_index(&self, name: &str) -> Option<usize> {
        self.properties
            .iter()
            .position(|property| property.name == name)
    }

    /// Property types in declaration order.
    pub fn property_types(&self) -> Vec<PropertyType> {
        self.properties
            .iter()
            .map(PropertyMapBuilder::property_type)
            .collect()
    }

    pub fn registrations(&self) -> &Registrations<dyn ResourceRegistration<T>> {
        &self.registrations
    }

    pub fn property_registrations(&self) -> &Registrations<dyn PropertyRegistration<T>> {
        &self.property_registrations
    }

    pub fn constructors(&self) -> &[Constructor<T>] {
        &self.constructors
    }

    /// First constructor whose parameters are exactly `types`.
    pub fn find_constructor(&self, types: &[PropertyType]) -> Option<&Constructor<T>> {
        self.constructors
            .iter()
            .find(|constructor| constructor.accepts(types))
    }

    /// Convert, validate and assemble the map.
    ///
    /// Every failure is collected; the result is either the map or the full
    /// list of problems.
    pub fn build(mut self) -> ResourceMapResult<T> {
        let resource = short_type_name::<T>();

        for property in &mut self.properties {
            let kind = property.property_type().kind();
            property
                .registrations
                .cascade_from(&self.property_registrations, kind);
        }

        let mut error = ResourceMapError::new(resource);

        let mut properties = Vec::with_capacity(self.properties.len());
        for property in &self.properties {
            match property.build() {
                Ok(map) => properties.push(map),
                Err(property_error) => error.property_errors.push(property_error),
            }
        }

        let mut options = ResourceMapOptions::<T, Draft>::new();
        for registration in self.registrations.iter() {
            match registration.convert(&self) {
                Ok(entry) => options = options.with_entry(entry),
                Err(failure) => error.conversion_failures.push(failure),
            }
        }

        error.validation_failures = self.validators.validate(&self);

        if error.is_empty() {
            match self.resolve_plan(&options) {
                Ok(plan) => {
                    tracing::debug!(
                        resource,
                        properties = properties.len(),
                        "resource map built"
                    );
                    return Ok(ResourceMap::new(resource, properties, options.freeze(), plan));
                },
                Err(failure) => error.validation_failures.push(failure),
            }
        }

        tracing::warn!(
            resource,
            failures = error.failure_count(),
            "resource map failed to build"
        );
        Err(error)
    }

    fn resolve_plan(
        &self,
        options: &ResourceMapOptions<T, Draft>,
    ) -> std::result::Result<ConstructionPlan<T>, ValidationFailure> {
        if let Some(explicit) = options.find::<ExplicitConstructorOption>() {
            let mut parameters = Vec::with_capacity(explicit.names.len());
            let mut types = Vec::with_capacity(explicit.names.len());
            for name in &explicit.names {
                let index = self.property_index(name).ok_or_else(|| {
                    ValidationFailure::UnmappedConstructorParameter { name: name.clone() }
                })?;
                parameters.push(index);
                types.push(self.properties[index].property_type());
            }
            let constructor = self.matching_constructor(&types)?;
            return Ok(ConstructionPlan::ExplicitConstructor {
                constructor,
                parameters,
            });
        }

        if options.has::<ImplicitConstructorOption>() {
            let constructor = self.matching_constructor(&self.property_types())?;
            return Ok(ConstructionPlan::ImplicitConstructor { constructor });
        }

        let constructor = self
            .find_constructor(&[])
            .cloned()
            .ok_or(ValidationFailure::MissingParameterlessConstructor)?;
        Ok(ConstructionPlan::PropertySetters { constructor })
    }

    fn matching_constructor(
        &self,
        types: &[PropertyType],
    ) -> std::result::Result<Constructor<T>, ValidationFailure> {
        self.find_constructor(types).cloned().ok_or_else(|| {
            ValidationFailure::NoMatchingConstructor {
                parameters: types.iter().map(|ty| ty.name().to_string()).collect(),
            }
        })
    }
}

impl<T: Resource> Default for ResourceMapBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests;
