//! Single-valued property injection.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::introspect::ClassDescriptor;
use crate::points::PropertyInjectionPoint;
use crate::references::ReferenceResolver;

/// Finds writable, non-collection properties to inject.
///
/// The hierarchy is walked most-derived first; a property name seen at a
/// more-derived level shadows the same name further up. A property is
/// wired when it carries an inject marker, or when `autowire` is on.
#[derive(Debug, Clone)]
pub struct PropertyResolver {
    references: ReferenceResolver,
}

impl PropertyResolver {
    pub fn new(references: ReferenceResolver) -> Self {
        Self { references }
    }

    pub fn resolve(&self, class: &ClassDescriptor, autowire: bool) -> Vec<PropertyInjectionPoint> {
        let mut used: HashSet<&str> = HashSet::new();
        let mut points = Vec::new();

        for level in class.hierarchy() {
            for property in level.declared_properties() {
                if !used.insert(property.name()) {
                    trace!(
                        type_name = %level.name(),
                        property = %property.name(),
                        "Property shadowed by subtype"
                    );
                    continue;
                }
                if !property.is_writable() || property.ty().is_collection() {
                    continue;
                }

                let reference = match self.references.read_property_marker(property) {
                    Some(reference) => reference,
                    None if autowire => self.references.resolve_property_value(property, None),
                    None => continue,
                };

                debug!(
                    type_name = %class.name(),
                    property = %property.name(),
                    reference = %reference,
                    "Property injection point"
                );
                points.push(PropertyInjectionPoint::new(Arc::clone(property), reference));
            }
        }
        points
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResolverConfig;
    use crate::marker::Marker;
    use crate::types::TypeRef;

    fn resolver() -> PropertyResolver {
        PropertyResolver::new(ReferenceResolver::from_config(&ResolverConfig::default()))
    }

    fn service() -> Arc<ClassDescriptor> {
        ClassDescriptor::builder("app::Svc")
            .field_property("repo", TypeRef::of("app::UserRepo"), &[Marker::inject()])
            .setter_property("mailer", TypeRef::of("app::Mailer"), &[Marker::inject_named("smtp")])
            .field_property("cache", TypeRef::of("app::Cache"), &[])
            .getter_property("status", TypeRef::of("String"))
            .field_property(
                "plugins",
                TypeRef::collection("Vec<app::Plugin>", Some(TypeRef::of("app::Plugin"))),
                &[Marker::inject()],
            )
            .build()
            .unwrap()
    }

    fn names(points: &[PropertyInjectionPoint]) -> Vec<&str> {
        points.iter().map(PropertyInjectionPoint::name).collect()
    }

    #[test]
    fn marked_properties_only() {
        let points = resolver().resolve(&service(), false);
        assert_eq!(names(&points), vec!["repo", "mailer"]);

        let repo: Vec<Option<&str>> = points[0].reference().names().collect();
        assert_eq!(repo, vec![Some("repo"), Some("userRepo"), Some("app::UserRepo")]);
        assert_eq!(points[1].reference().name(0), Some("smtp"));
    }

    #[test]
    fn autowire_adds_unmarked_writable() {
        let points = resolver().resolve(&service(), true);
        assert_eq!(names(&points), vec!["repo", "mailer", "cache"]);
    }

    #[test]
    fn subtype_shadows_supertype() {
        let leaf = ClassDescriptor::builder("app::Leaf")
            .extends(service())
            .field_property("repo", TypeRef::of("app::UserRepo"), &[])
            .field_property("audit", TypeRef::of("app::Audit"), &[Marker::inject()])
            .build()
            .unwrap();

        let points = resolver().resolve(&leaf, false);
        assert_eq!(names(&points), vec!["audit", "mailer"]);
    }

    #[test]
    fn read_only_subtype_property_still_shadows() {
        let leaf = ClassDescriptor::builder("app::Leaf")
            .extends(service())
            .getter_property("mailer", TypeRef::of("app::Mailer"))
            .build()
            .unwrap();

        let points = resolver().resolve(&leaf, true);
        assert_eq!(names(&points), vec!["repo", "cache"]);
    }

    #[test]
    fn deterministic() {
        let class = service();
        assert_eq!(resolver().resolve(&class, true), resolver().resolve(&class, true));
    }
}
