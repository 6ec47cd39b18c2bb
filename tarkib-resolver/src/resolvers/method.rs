//! Injection through arbitrary methods.

use tracing::debug;

use crate::error::Result;
use crate::introspect::{ClassDescriptor, Executable};
use crate::points::MethodInjectionPoint;
use crate::references::{arity_mismatch, BeanReferences, ReferenceResolver};

/// Finds marked methods, other than setters, that take dependencies.
///
/// A method qualifies when it carries an inject marker or all of its
/// parameters do. References come only from what the markers declare;
/// no lookup strategy fills in a missing name.
#[derive(Debug, Clone)]
pub struct MethodResolver {
    references: ReferenceResolver,
}

impl MethodResolver {
    pub fn new(references: ReferenceResolver) -> Self {
        Self { references }
    }

    /// # Errors
    /// - [`ResolveError::PartialDeclaration`](crate::error::ResolveError::PartialDeclaration)
    /// - [`ResolveError::ArityMismatch`](crate::error::ResolveError::ArityMismatch) when
    ///   a parameter is left without a declared name
    pub fn resolve(&self, class: &ClassDescriptor) -> Result<Vec<MethodInjectionPoint>> {
        let mut points = Vec::new();

        for method in class.all_methods() {
            if method.is_property_setter() || method.params().is_empty() {
                continue;
            }

            let member = Executable::Method(&method);
            let Some(declared) = self.references.read_declared(member)? else {
                continue;
            };

            let declared_count = declared.iter().filter(|r| r.is_some()).count();
            let references: Vec<BeanReferences> = declared.into_iter().flatten().collect();
            if declared_count != method.params().len() {
                return Err(arity_mismatch(member, declared_count));
            }

            debug!(
                type_name = %class.name(),
                method = %method.signature(),
                "Method injection point"
            );
            points.push(MethodInjectionPoint::new(method, references));
        }
        Ok(points)
    }
}
