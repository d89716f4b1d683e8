//! Resource maps: configuration, build and the resulting immutable maps.

mod accessor;
mod builder;
mod constructor;
mod error;
mod key;
mod property;
pub mod registration;
mod resource;
mod validate;

pub use accessor::PropertyAccessor;
pub use builder::{
    PropertyConfig, PropertyMapBuilder, PropertyMapResult, ResourceMapBuilder, ResourceMapResult,
};
pub use constructor::{ConstructionPlan, Constructor, ConstructorArgs, Resource};
pub use error::{ConversionFailure, PropertyMapError, ResourceMapError};
pub use key::{PropertyMapKey, PropertyMapKeyBuilder};
pub use property::PropertyMap;
pub use resource::ResourceMap;
pub use validate::{
    AggregateValidator, ExplicitConstructorValidator, ImplicitConstructorValidator,
    PropertySetterValidator, SingleConstructorValidator, StructuralValidator, ValidationFailure,
};
