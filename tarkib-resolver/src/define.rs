//! Explicit injection point definitions.
//!
//! For types whose declarations carry no markers, or when the markers
//! should be bypassed, injection points can be named directly: by
//! member name and, where overloads exist, by parameter type names.
//! Providers can be defined the same way, from static or instance
//! methods.
//! Reference values given here follow the same rules as explicit
//! values in [`ReferenceResolver::resolve`]: missing or blank entries
//! fall back to the default references.

use std::sync::Arc;

use tracing::debug;

use crate::error::{LifecycleKind, LifecycleSignatureError, ResolveError, Result};
use crate::introspect::{ClassDescriptor, Executable, MethodDescriptor, unknown_member};
use crate::marker::InitInvocation;
use crate::points::{
    CollectionInjectionPoint, ConstructorInjectionPoint, DestroyMethodPoint, InitMethodPoint,
    MethodInjectionPoint, PropertyInjectionPoint, ProviderDefinition,
};
use crate::references::ReferenceResolver;

/// Defines the constructor injection point.
///
/// With `param_types`, the constructor whose parameter type names match
/// exactly is used; without, the type must declare exactly one
/// constructor.
///
/// # Errors
/// - [`ResolveError::UnknownMember`] — no matching constructor
/// - [`ResolveError::MultipleCandidates`] — no types given, several constructors
/// - [`ResolveError::ArityMismatch`] — wrong number of reference values
pub fn define_constructor(
    references: &ReferenceResolver,
    class: &ClassDescriptor,
    param_types: Option<&[&str]>,
    values: Option<&[&str]>,
) -> Result<ConstructorInjectionPoint> {
    let ctors = class.constructors();

    let ctor = match param_types {
        Some(types) => ctors
            .iter()
            .find(|ctor| ctor.param_types() == types)
            .ok_or_else(|| {
                let signatures: Vec<String> = ctors.iter().map(|c| c.signature()).collect();
                unknown_member(
                    class.ty(),
                    &format!("new({})", types.join(", ")),
                    "constructor",
                    signatures.iter().map(String::as_str),
                )
            })?,
        None => match ctors {
            [only] => only,
            [] => {
                let none = std::iter::empty();
                return Err(unknown_member(class.ty(), "new", "constructor", none));
            }
            _ => {
                return Err(ResolveError::MultipleCandidates {
                    type_name: class.name().to_string(),
                    member: "new".into(),
                    count: ctors.len(),
                });
            }
        },
    };

    let refs = references.resolve_from_values(Executable::Ctor(ctor), values.unwrap_or(&[]))?;
    debug!(
        type_name = %class.name(),
        ctor = %ctor.signature(),
        "Defined constructor injection point"
    );
    Ok(ConstructorInjectionPoint::new(Arc::clone(ctor), refs))
}

/// Defines a property injection point by name, anywhere in the hierarchy.
///
/// # Errors
/// [`ResolveError::UnknownMember`] if no property has that name.
pub fn define_property(
    references: &ReferenceResolver,
    class: &ClassDescriptor,
    name: &str,
    value: Option<&str>,
) -> Result<PropertyInjectionPoint> {
    let property = class.find_property(name).ok_or_else(|| {
        let known = property_names(class, |_| true);
        unknown_member(class.ty(), name, "property", known.into_iter())
    })?;

    let reference = references.resolve_property_value(property, value);
    debug!(
        type_name = %class.name(),
        property = %name,
        reference = %reference,
        "Defined property injection point"
    );
    Ok(PropertyInjectionPoint::new(Arc::clone(property), reference))
}

/// Defines a collection injection point by property name.
///
/// # Errors
/// [`ResolveError::UnknownMember`] if no collection-typed property has
/// that name.
pub fn define_collection(class: &ClassDescriptor, name: &str) -> Result<CollectionInjectionPoint> {
    let property = class
        .find_property(name)
        .filter(|p| p.ty().is_collection())
        .ok_or_else(|| {
            let collections = property_names(class, |p| p.ty().is_collection());
            unknown_member(class.ty(), name, "collection property", collections.into_iter())
        })?;

    debug!(type_name = %class.name(), property = %name, "Defined collection injection point");
    Ok(CollectionInjectionPoint::new(Arc::clone(property)))
}

/// Defines a method injection point by name and, for overloads, by
/// parameter type names.
///
/// # Errors
/// - [`ResolveError::UnknownMember`] — no such method
/// - [`ResolveError::MultipleCandidates`] — overloaded and no types given
/// - [`ResolveError::ArityMismatch`] — wrong number of reference values
pub fn define_method(
    references: &ReferenceResolver,
    class: &ClassDescriptor,
    name: &str,
    param_types: Option<&[&str]>,
    values: Option<&[&str]>,
) -> Result<MethodInjectionPoint> {
    let method = find_method(class, name, param_types)?;

    let refs =
        references.resolve_from_values(Executable::Method(&method), values.unwrap_or(&[]))?;
    debug!(
        type_name = %class.name(),
        method = %method.signature(),
        "Defined method injection point"
    );
    Ok(MethodInjectionPoint::new(method, refs))
}

/// Defines a provider backed by an instance method of `class`, invoked
/// on the object named `owner`.
///
/// # Errors
/// - [`ResolveError::UnknownMember`] — no such method
/// - [`ResolveError::MultipleCandidates`] — overloaded and no types given
pub fn define_provider(
    class: &ClassDescriptor,
    provider: &str,
    method: &str,
    param_types: Option<&[&str]>,
    owner: &str,
) -> Result<ProviderDefinition> {
    let method = find_method(class, method, param_types)?;
    debug!(
        type_name = %class.name(),
        provider = %provider,
        method = %method.signature(),
        owner = %owner,
        "Defined instance provider"
    );
    Ok(ProviderDefinition::new(provider, method, Some(owner.to_string())))
}

/// Defines a provider backed by a static method of `class`.
///
/// # Errors
/// Same as [`define_provider`].
pub fn define_static_provider(
    class: &ClassDescriptor,
    provider: &str,
    method: &str,
    param_types: Option<&[&str]>,
) -> Result<ProviderDefinition> {
    let method = find_method(class, method, param_types)?;
    debug!(
        type_name = %class.name(),
        provider = %provider,
        method = %method.signature(),
        "Defined static provider"
    );
    Ok(ProviderDefinition::new(provider, method, None))
}

/// Defines init methods by name. The position in `names` becomes the
/// order key; every point is invoked always, at `invocation`.
///
/// # Errors
/// - [`ResolveError::UnknownMember`] — no method with that name
/// - [`ResolveError::IllegalLifecycleSignature`] — only overloads taking arguments exist
pub fn define_init_methods(
    class: &ClassDescriptor,
    invocation: InitInvocation,
    names: &[&str],
) -> Result<Vec<InitMethodPoint>> {
    let methods = class.all_methods();
    names
        .iter()
        .enumerate()
        .map(|(position, name)| {
            let method = find_lifecycle_method(class, &methods, name, LifecycleKind::Init)?;
            let order = i32::try_from(position).unwrap_or(i32::MAX);
            Ok(InitMethodPoint::new(method, order, true, invocation))
        })
        .collect()
}

/// Defines destroy methods by name, in the given order.
///
/// # Errors
/// Same as [`define_init_methods`].
pub fn define_destroy_methods(
    class: &ClassDescriptor,
    names: &[&str],
) -> Result<Vec<DestroyMethodPoint>> {
    let methods = class.all_methods();
    names
        .iter()
        .map(|name| {
            find_lifecycle_method(class, &methods, name, LifecycleKind::Destroy)
                .map(DestroyMethodPoint::new)
        })
        .collect()
}

fn find_method(
    class: &ClassDescriptor,
    name: &str,
    param_types: Option<&[&str]>,
) -> Result<Arc<MethodDescriptor>> {
    let methods = class.all_methods();
    let mut candidates: Vec<&Arc<MethodDescriptor>> = methods
        .iter()
        .filter(|m| m.name() == name)
        .filter(|m| param_types.is_none_or(|types| m.param_types() == types))
        .collect();

    match candidates.len() {
        0 => {
            let member = match param_types {
                Some(types) => format!("{name}({})", types.join(", ")),
                None => name.to_string(),
            };
            let known = method_names(&methods);
            Err(unknown_member(class.ty(), &member, "method", known.into_iter()))
        }
        1 => Ok(Arc::clone(candidates.remove(0))),
        count => Err(ResolveError::MultipleCandidates {
            type_name: class.name().to_string(),
            member: name.to_string(),
            count,
        }),
    }
}

fn find_lifecycle_method(
    class: &ClassDescriptor,
    methods: &[Arc<MethodDescriptor>],
    name: &str,
    kind: LifecycleKind,
) -> Result<Arc<MethodDescriptor>> {
    let mut named = methods.iter().filter(|m| m.name() == name).peekable();
    let Some(first) = named.peek().cloned() else {
        let known = method_names(methods);
        return Err(unknown_member(class.ty(), name, "method", known.into_iter()));
    };

    if let Some(method) = named.find(|m| m.params().is_empty()) {
        return Ok(Arc::clone(method));
    }
    Err(ResolveError::IllegalLifecycleSignature(LifecycleSignatureError {
        type_name: first.declaring().name().to_string(),
        method: name.to_string(),
        kind,
        parameters: first.params().len(),
    }))
}

fn method_names(methods: &[Arc<MethodDescriptor>]) -> Vec<&str> {
    let mut names: Vec<&str> = methods.iter().map(|m| m.name()).collect();
    names.dedup();
    names
}

fn property_names<'a>(
    class: &'a ClassDescriptor,
    keep: impl Fn(&crate::introspect::PropertyDescriptor) -> bool,
) -> Vec<&'a str> {
    class
        .hierarchy()
        .flat_map(|level| level.declared_properties())
        .filter(|p| keep(p))
        .map(|p| p.name())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResolverConfig;
    use crate::introspect::{CtorDescriptor, ParamDescriptor};
    use crate::types::TypeRef;

    fn references() -> ReferenceResolver {
        ReferenceResolver::from_config(&ResolverConfig::default())
    }

    fn repo() -> ParamDescriptor {
        ParamDescriptor::named("repo", TypeRef::of("app::Repo"))
    }

    fn service() -> Arc<ClassDescriptor> {
        let base = ClassDescriptor::builder("app::Base")
            .method(MethodDescriptor::new("close"))
            .field_property("clock", TypeRef::of("app::Clock"), &[])
            .build()
            .unwrap();

        ClassDescriptor::builder("app::Svc")
            .extends(base)
            .ctor(CtorDescriptor::new())
            .ctor(CtorDescriptor::new().param(repo()))
            .method(MethodDescriptor::new("attach").param(repo()))
            .method(
                MethodDescriptor::new("attach")
                    .param(ParamDescriptor::named("pool", TypeRef::of("app::Pool"))),
            )
            .method(MethodDescriptor::new("start"))
            .method(MethodDescriptor::new("warm").param(repo()))
            .method(
                MethodDescriptor::new("defaults")
                    .returns(TypeRef::of("app::Settings"))
                    .static_fn(),
            )
            .field_property("repo", TypeRef::of("app::Repo"), &[])
            .field_property(
                "plugins",
                TypeRef::collection("Vec<app::Plugin>", Some(TypeRef::of("app::Plugin"))),
                &[],
            )
            .build()
            .unwrap()
    }

    #[test]
    fn constructor_by_param_types() {
        let point =
            define_constructor(&references(), &service(), Some(&["app::Repo"]), Some(&["mainRepo"]))
                .unwrap();
        assert_eq!(point.constructor().map(|c| c.params().len()), Some(1));
        assert_eq!(point.references()[0].name(0), Some("mainRepo"));
    }

    #[test]
    fn constructor_with_default_references() {
        let point =
            define_constructor(&references(), &service(), Some(&["app::Repo"]), None).unwrap();
        let names: Vec<Option<&str>> = point.references()[0].names().collect();
        assert_eq!(names, vec![Some("repo"), None, Some("app::Repo")]);
    }

    #[test]
    fn constructor_without_types_needs_single_candidate() {
        match define_constructor(&references(), &service(), None, None) {
            Err(ResolveError::MultipleCandidates { count, .. }) => assert_eq!(count, 2),
            other => panic!("Expected MultipleCandidates, got: {other:?}"),
        }

        let single = ClassDescriptor::builder("app::One")
            .ctor(CtorDescriptor::new())
            .build()
            .unwrap();
        assert!(define_constructor(&references(), &single, None, None).is_ok());
    }

    #[test]
    fn constructor_unknown_signature() {
        match define_constructor(&references(), &service(), Some(&["app::Pool"]), None) {
            Err(ResolveError::UnknownMember(err)) => {
                assert_eq!(err.member, "new(app::Pool)");
                assert_eq!(err.kind, "constructor");
            }
            other => panic!("Expected UnknownMember, got: {other:?}"),
        }
    }

    #[test]
    fn constructor_wrong_value_count() {
        let values: &[&str] = &["a", "b"];
        let result =
            define_constructor(&references(), &service(), Some(&["app::Repo"]), Some(values));
        assert!(matches!(result, Err(ResolveError::ArityMismatch(_))));
    }

    #[test]
    fn property_from_supertype() {
        let point = define_property(&references(), &service(), "clock", None).unwrap();
        assert_eq!(point.property().declaring().name(), "app::Base");
        assert_eq!(point.reference().name(0), Some("clock"));

        let named = define_property(&references(), &service(), "repo", Some("mainRepo")).unwrap();
        assert_eq!(named.reference().candidates().collect::<Vec<_>>(), vec!["mainRepo"]);
    }

    #[test]
    fn unknown_property_suggests() {
        match define_property(&references(), &service(), "clok", None) {
            Err(ResolveError::UnknownMember(err)) => {
                assert!(err.suggestions.contains(&"clock".to_string()));
            }
            other => panic!("Expected UnknownMember, got: {other:?}"),
        }
    }

    #[test]
    fn collection_must_be_collection_typed() {
        assert!(define_collection(&service(), "plugins").is_ok());
        assert!(matches!(
            define_collection(&service(), "repo"),
            Err(ResolveError::UnknownMember(_))
        ));
    }

    #[test]
    fn overloaded_method_needs_types() {
        let class = service();
        assert!(matches!(
            define_method(&references(), &class, "attach", None, None),
            Err(ResolveError::MultipleCandidates { count: 2, .. })
        ));

        let point =
            define_method(&references(), &class, "attach", Some(&["app::Pool"]), Some(&["pool1"]))
                .unwrap();
        assert_eq!(point.method().params()[0].name(), Some("pool"));
        assert_eq!(point.references()[0].name(0), Some("pool1"));
    }

    #[test]
    fn method_defaults_fill_blank_values() {
        let point = define_method(&references(), &service(), "warm", None, Some(&[" "])).unwrap();
        assert_eq!(point.references()[0].name(0), Some("repo"));
    }

    #[test]
    fn init_methods_ordered_by_position() {
        let points =
            define_init_methods(&service(), InitInvocation::PostDefine, &["start", "close"])
                .unwrap();

        assert_eq!(points[0].method().name(), "start");
        assert_eq!(points[1].order(), 1);
        assert!(points.iter().all(|p| p.invoke_always()));
        assert!(points.iter().all(|p| p.invocation() == InitInvocation::PostDefine));
    }

    #[test]
    fn init_method_with_arguments_rejected() {
        match define_init_methods(&service(), InitInvocation::PostInitialize, &["warm"]) {
            Err(ResolveError::IllegalLifecycleSignature(err)) => {
                assert_eq!(err.method, "warm");
                assert_eq!(err.parameters, 1);
            }
            other => panic!("Expected IllegalLifecycleSignature, got: {other:?}"),
        }
    }

    #[test]
    fn destroy_methods_by_name() {
        let points = define_destroy_methods(&service(), &["close"]).unwrap();
        assert_eq!(points[0].method().declaring().name(), "app::Base");

        assert!(matches!(
            define_destroy_methods(&service(), &["shutdown"]),
            Err(ResolveError::UnknownMember(_))
        ));
    }

    #[test]
    fn instance_provider_by_method_name() {
        let provider =
            define_provider(&service(), "pooled", "attach", Some(&["app::Pool"]), "svc").unwrap();

        assert_eq!(provider.name(), "pooled");
        assert_eq!(provider.owner(), Some("svc"));
        assert!(!provider.is_static());
        assert_eq!(provider.method().params()[0].name(), Some("pool"));
    }

    #[test]
    fn static_provider_has_no_owner() {
        let provider = define_static_provider(&service(), "settings", "defaults", None).unwrap();

        assert_eq!(provider.owner(), None);
        assert!(provider.is_static());
        assert_eq!(provider.method().name(), "defaults");
    }

    #[test]
    fn provider_method_must_exist() {
        match define_provider(&service(), "x", "attach", Some(&["app::Clock"]), "svc") {
            Err(ResolveError::UnknownMember(err)) => {
                assert_eq!(err.member, "attach(app::Clock)");
                assert_eq!(err.kind, "method");
            }
            other => panic!("Expected UnknownMember, got: {other:?}"),
        }

        assert!(matches!(
            define_static_provider(&service(), "x", "attach", None),
            Err(ResolveError::MultipleCandidates { count: 2, .. })
        ));
    }
}
