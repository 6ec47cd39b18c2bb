//! Collection property injection.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;

use crate::introspect::ClassDescriptor;
use crate::points::CollectionInjectionPoint;

/// Finds writable collection-typed properties to fill with every
/// instance of their element type.
///
/// Unlike [`PropertyResolver`](super::PropertyResolver), an unmarked
/// collection is included whenever `autowire` is on, and no reference is
/// ever computed.
#[derive(Debug, Clone, Default)]
pub struct CollectionResolver;

impl CollectionResolver {
    pub fn new() -> Self {
        Self
    }

    pub fn resolve(
        &self,
        class: &ClassDescriptor,
        autowire: bool,
    ) -> Vec<CollectionInjectionPoint> {
        let mut used: HashSet<&str> = HashSet::new();
        let mut points = Vec::new();

        for level in class.hierarchy() {
            for property in level.declared_properties() {
                if !used.insert(property.name()) {
                    continue;
                }
                if !property.is_writable() || !property.ty().is_collection() {
                    continue;
                }
                if !autowire && property.inject_marker().is_none() {
                    continue;
                }

                debug!(
                    type_name = %class.name(),
                    property = %property.name(),
                    "Collection injection point"
                );
                points.push(CollectionInjectionPoint::new(Arc::clone(property)));
            }
        }
        points
    }
}
