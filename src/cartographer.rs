//! Registry of built resource maps, one per resource type.

use std::any::{Any, TypeId};
use std::collections::HashMap;

use thiserror::Error;

use crate::common::{Error, Result};
use crate::map::{Resource, ResourceMap, ResourceMapBuilder, ResourceMapError, ResourceMapResult};
use crate::options::short_type_name;

/// Failure to hand out a resource map.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CartographerError {
    #[error("No resource map is registered for {resource}")]
    NoMapRegistered { resource: &'static str },

    /// The map was registered but failed to build.
    #[error("{0}")]
    InvalidMap(ResourceMapError),
}

/// Configuration of the resource map for `T`.
pub trait ResourceMapConfiguration<T: Resource> {
    fn configure(&self, builder: &mut ResourceMapBuilder<T>) -> Result<()>;
}

impl<T, F> ResourceMapConfiguration<T> for F
where
    T: Resource,
    F: Fn(&mut ResourceMapBuilder<T>) -> Result<()>,
{
    fn configure(&self, builder: &mut ResourceMapBuilder<T>) -> Result<()> {
        self(builder)
    }
}

/// Immutable set of resource maps, built once from a list of configurations.
///
/// Maps that failed to build are kept with their errors and reported when
/// looked up.
#[derive(Default)]
pub struct Cartographer {
    maps: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl Cartographer {
    pub fn builder() -> CartographerBuilder {
        CartographerBuilder::default()
    }

    /// The map for `T`.
    pub fn get_map<T: Resource>(&self) -> std::result::Result<&ResourceMap<T>, CartographerError> {
        let result = self
            .maps
            .get(&TypeId::of::<T>())
            .and_then(|entry| entry.downcast_ref::<ResourceMapResult<T>>())
            .ok_or(CartographerError::NoMapRegistered {
                resource: short_type_name::<T>(),
            })?;
        result
            .as_ref()
            .map_err(|error| CartographerError::InvalidMap(error.clone()))
    }

    pub fn contains<T: Resource>(&self) -> bool {
        self.maps.contains_key(&TypeId::of::<T>())
    }

    pub fn len(&self) -> usize {
        self.maps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }
}

/// Collects `(resource type, configuration)` pairs into a [`Cartographer`].
#[derive(Default)]
pub struct CartographerBuilder {
    maps: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl CartographerBuilder {
    /// Configure and build the map for `T`.
    ///
    /// Errors raised by the configuration itself (a zero row, an empty name,
    /// a second registration for `T`) fail immediately. Build failures are
    /// stored and surface from [`Cartographer::get_map`].
    pub fn register<T, C>(mut self, configuration: C) -> Result<Self>
    where
        T: Resource,
        C: ResourceMapConfiguration<T>,
    {
        let resource = short_type_name::<T>();
        if self.maps.contains_key(&TypeId::of::<T>()) {
            return Err(Error::InvalidArgument(format!(
                "a resource map for {} is already registered",
                resource
            )));
        }

        let mut builder = ResourceMapBuilder::<T>::new();
        configuration.configure(&mut builder)?;
        let result: ResourceMapResult<T> = builder.build();
        if let Err(error) = &result {
            tracing::warn!(resource, failures = error.failure_count(), "registered an invalid map");
        }
        self.maps.insert(TypeId::of::<T>(), Box::new(result));
        Ok(self)
    }

    pub fn build(self) -> Cartographer {
        tracing::debug!(maps = self.maps.len(), "cartographer composed");
        Cartographer { maps: self.maps }
    }
}
