//! Constructor selection.

use std::sync::Arc;

use tracing::{debug, trace};

use crate::error::{AmbiguousConstructorError, ResolveError, Result};
use crate::introspect::{ClassDescriptor, CtorDescriptor, Executable};
use crate::points::ConstructorInjectionPoint;
use crate::references::{BeanReferences, ReferenceResolver};

/// Picks the constructor a container should call.
///
/// In order of preference:
/// 1. the one constructor carrying an inject marker (on itself or on all
///    of its parameters), when markers are scanned;
/// 2. the sole declared constructor;
/// 3. the zero-argument constructor;
/// 4. otherwise [`ConstructorInjectionPoint::none()`].
#[derive(Debug, Clone)]
pub struct CtorResolver {
    references: ReferenceResolver,
}

impl CtorResolver {
    pub fn new(references: ReferenceResolver) -> Self {
        Self { references }
    }

    /// # Errors
    /// - [`ResolveError::AmbiguousConstructor`] — a second marked constructor
    /// - errors from reading the chosen constructor's references
    pub fn resolve(
        &self,
        class: &ClassDescriptor,
        use_markers: bool,
    ) -> Result<ConstructorInjectionPoint> {
        let constructors = class.constructors();

        if use_markers {
            let mut marked: Option<(&Arc<CtorDescriptor>, Vec<BeanReferences>)> = None;

            for ctor in constructors {
                let Some(references) = self
                    .references
                    .read_from_markers(Executable::Ctor(ctor))?
                else {
                    continue;
                };

                if let Some((first, _)) = &marked {
                    return Err(ResolveError::AmbiguousConstructor(
                        AmbiguousConstructorError {
                            type_name: class.name().to_string(),
                            candidates: vec![first.signature(), ctor.signature()],
                        },
                    ));
                }
                marked = Some((ctor, references));
            }

            if let Some((ctor, references)) = marked {
                debug!(
                    type_name = %class.name(),
                    ctor = %ctor.signature(),
                    "Marked constructor selected"
                );
                return Ok(ConstructorInjectionPoint::new(Arc::clone(ctor), references));
            }
        }

        let fallback = match constructors {
            [only] => Some(only),
            _ => constructors.iter().find(|c| c.params().is_empty()),
        };

        let Some(ctor) = fallback else {
            trace!(
                type_name = %class.name(),
                constructors = constructors.len(),
                "No usable constructor"
            );
            return Ok(ConstructorInjectionPoint::none());
        };

        let references = self
            .references
            .resolve_from_values(Executable::Ctor(ctor), &[])?;
        debug!(
            type_name = %class.name(),
            ctor = %ctor.signature(),
            "Fallback constructor selected"
        );
        Ok(ConstructorInjectionPoint::new(Arc::clone(ctor), references))
    }
}
