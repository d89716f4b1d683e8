//! Structural checks run once per map build, after conversions.

use serde::Serialize;
use thiserror::Error;

use super::registration::{ExplicitConstructorRegistration, ImplicitConstructorRegistration};
use super::{Resource, ResourceMapBuilder};
use crate::value::PropertyType;

/// A cross-cutting problem found in a resource builder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
pub enum ValidationFailure {
    /// Both an explicit and an implicit constructor were requested.
    #[error("both an explicit and an implicit constructor are configured")]
    DuplicateConstructor,

    /// An explicit constructor names a property that is not mapped.
    #[error("constructor parameter '{name}' is not a mapped property")]
    UnmappedConstructorParameter { name: String },

    /// No constructor takes exactly these parameter types.
    #[error("no constructor takes ({})", .parameters.join(", "))]
    NoMatchingConstructor { parameters: Vec<String> },

    /// Properties that can only be populated through a setter lack one.
    #[error("properties without a setter: {}", .properties.join(", "))]
    MissingSetters { properties: Vec<String> },

    /// Setter-based construction needs a parameterless constructor.
    #[error("no parameterless constructor is available")]
    MissingParameterlessConstructor,

    /// Failure reported by an application-supplied validator.
    #[error("{validator}: {message}")]
    Custom {
        validator: &'static str,
        message: String,
    },
}

/// A check over the whole builder that opts in through `is_applicable`.
pub trait StructuralValidator<T: Resource>: Send + Sync {
    fn is_applicable(&self, builder: &ResourceMapBuilder<T>) -> bool;

    fn validate(&self, builder: &ResourceMapBuilder<T>) -> Vec<ValidationFailure>;
}

fn has_explicit<T: Resource>(builder: &ResourceMapBuilder<T>) -> bool {
    builder
        .registrations()
        .contains::<ExplicitConstructorRegistration>()
}

fn has_implicit<T: Resource>(builder: &ResourceMapBuilder<T>) -> bool {
    builder
        .registrations()
        .contains::<ImplicitConstructorRegistration>()
}

fn describe(types: &[PropertyType]) -> Vec<String> {
    types.iter().map(|ty| ty.name().to_string()).collect()
}

/// Rejects maps that request both constructor strategies.
#[derive(Debug, Clone, Copy, Default)]
pub struct SingleConstructorValidator;

impl<T: Resource> StructuralValidator<T> for SingleConstructorValidator {
    fn is_applicable(&self, builder: &ResourceMapBuilder<T>) -> bool {
        has_explicit(builder) || has_implicit(builder)
    }

    fn validate(&self, builder: &ResourceMapBuilder<T>) -> Vec<ValidationFailure> {
        if has_explicit(builder) && has_implicit(builder) {
            vec![ValidationFailure::DuplicateConstructor]
        } else {
            Vec::new()
        }
    }
}

/// Checks the named parameters of an explicit constructor.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExplicitConstructorValidator;

impl<T: Resource> StructuralValidator<T> for ExplicitConstructorValidator {
    fn is_applicable(&self, builder: &ResourceMapBuilder<T>) -> bool {
        has_explicit(builder)
    }

    fn validate(&self, builder: &ResourceMapBuilder<T>) -> Vec<ValidationFailure> {
        let Some(registration) = builder
            .registrations()
            .find::<ExplicitConstructorRegistration>()
        else {
            return Vec::new();
        };

        let mut failures = Vec::new();
        let mut types = Vec::with_capacity(registration.names.len());
        for name in &registration.names {
            match builder.property_builder(name) {
                Some(property) => types.push(property.property_type()),
                None => failures.push(ValidationFailure::UnmappedConstructorParameter {
                    name: name.clone(),
                }),
            }
        }

        if failures.is_empty() && builder.find_constructor(&types).is_none() {
            failures.push(ValidationFailure::NoMatchingConstructor {
                parameters: describe(&types),
            });
        }
        failures
    }
}

/// Checks that a constructor takes every mapped property in order.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImplicitConstructorValidator;

impl<T: Resource> StructuralValidator<T> for ImplicitConstructorValidator {
    fn is_applicable(&self, builder: &ResourceMapBuilder<T>) -> bool {
        has_implicit(builder)
    }

    fn validate(&self, builder: &ResourceMapBuilder<T>) -> Vec<ValidationFailure> {
        let types = builder.property_types();
        if builder.find_constructor(&types).is_none() {
            vec![ValidationFailure::NoMatchingConstructor {
                parameters: describe(&types),
            }]
        } else {
            Vec::new()
        }
    }
}

/// Checks that setter-based construction can populate every property.
#[derive(Debug, Clone, Copy, Default)]
pub struct PropertySetterValidator;

impl<T: Resource> StructuralValidator<T> for PropertySetterValidator {
    fn is_applicable(&self, builder: &ResourceMapBuilder<T>) -> bool {
        !has_explicit(builder) && !has_implicit(builder)
    }

    fn validate(&self, builder: &ResourceMapBuilder<T>) -> Vec<ValidationFailure> {
        let mut failures = Vec::new();
        let missing: Vec<String> = builder
            .properties()
            .iter()
            .filter(|property| !property.accessor().can_set())
            .map(|property| property.name().to_string())
            .collect();
        if !missing.is_empty() {
            failures.push(ValidationFailure::MissingSetters {
                properties: missing,
            });
        }
        if builder.find_constructor(&[]).is_none() {
            failures.push(ValidationFailure::MissingParameterlessConstructor);
        }
        failures
    }
}

/// Runs every applicable validator and keeps all their failures.
pub struct AggregateValidator<T: Resource> {
    validators: Vec<Box<dyn StructuralValidator<T>>>,
}

impl<T: Resource> AggregateValidator<T> {
    pub fn empty() -> Self {
        Self {
            validators: Vec::new(),
        }
    }

    pub fn push<V: StructuralValidator<T> + 'static>(&mut self, validator: V) {
        self.validators.push(Box::new(validator));
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    pub fn validate(&self, builder: &ResourceMapBuilder<T>) -> Vec<ValidationFailure> {
        self.validators
            .iter()
            .filter(|validator| validator.is_applicable(builder))
            .flat_map(|validator| validator.validate(builder))
            .collect()
    }
}

impl<T: Resource> Default for AggregateValidator<T> {
    /// The construction-strategy validators.
    fn default() -> Self {
        let mut aggregate = Self::empty();
        aggregate.push(SingleConstructorValidator);
        aggregate.push(ExplicitConstructorValidator);
        aggregate.push(ImplicitConstructorValidator);
        aggregate.push(PropertySetterValidator);
        aggregate
    }
}
