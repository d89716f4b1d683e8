use std::fmt;

use super::{ConstructionPlan, PropertyMap};
use crate::options::{HeaderRowNumber, ResourceMapOptions, ResourceReadingPolicy};
use crate::value::Value;

/// Immutable configuration binding a resource type to its properties.
pub struct ResourceMap<T> {
    resource: &'static str,
    properties: Vec<PropertyMap<T>>,
    options: ResourceMapOptions<T>,
    plan: ConstructionPlan<T>,
}

impl<T> ResourceMap<T> {
    pub(crate) fn new(
        resource: &'static str,
        properties: Vec<PropertyMap<T>>,
        options: ResourceMapOptions<T>,
        plan: ConstructionPlan<T>,
    ) -> Self {
        Self {
            resource,
            properties,
            options,
            plan,
        }
    }

    /// Type name of the mapped resource.
    pub fn resource_name(&self) -> &'static str {
        self.resource
    }

    /// Property maps in declaration order.
    pub fn properties(&self) -> &[PropertyMap<T>] {
        &self.properties
    }

    pub fn property(&self, name: &str) -> Option<&PropertyMap<T>> {
        self.properties.iter().find(|property| property.name() == name)
    }

    pub fn options(&self) -> &ResourceMapOptions<T> {
        &self.options
    }

    pub fn plan(&self) -> &ConstructionPlan<T> {
        &self.plan
    }

    pub fn header_row_number(&self) -> u32 {
        self.options
            .find::<HeaderRowNumber>()
            .copied()
            .unwrap_or(HeaderRowNumber::DEFAULT)
            .0
    }

    pub fn reading_policy(&self) -> ResourceReadingPolicy {
        self.options
            .find::<ResourceReadingPolicy>()
            .copied()
            .unwrap_or_default()
    }

    /// Create a resource from per-property values in declaration order.
    pub fn construct(&self, values: Vec<Option<Value>>) -> Option<T> {
        self.plan.construct(&self.properties, values)
    }

    /// Values of every property of `resource`, in declaration order.
    pub fn values_of(&self, resource: &T) -> Vec<Value> {
        self.properties
            .iter()
            .map(|property| property.accessor().get(resource))
            .collect()
    }
}

impl<T> fmt::Debug for ResourceMap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceMap")
            .field("resource", &self.resource)
            .field("properties", &self.properties)
            .field("options", &self.options)
            .field("plan", &self.plan)
            .finish()
    }
}
