//! Init and destroy callbacks.

use tracing::debug;

use crate::error::{LifecycleKind, LifecycleSignatureError, ResolveError, Result};
use crate::introspect::{ClassDescriptor, MethodDescriptor};
use crate::points::{DestroyMethodPoint, InitMethodPoint};

fn check_no_params(method: &MethodDescriptor, kind: LifecycleKind) -> Result<()> {
    if method.params().is_empty() {
        return Ok(());
    }
    Err(ResolveError::IllegalLifecycleSignature(LifecycleSignatureError {
        type_name: method.declaring().name().to_string(),
        method: method.name().to_string(),
        kind,
        parameters: method.params().len(),
    }))
}

/// Finds init-marked methods, ordered by their order key.
///
/// Equal keys keep hierarchy order (most-derived first).
#[derive(Debug, Clone, Default)]
pub struct InitMethodResolver;

impl InitMethodResolver {
    pub fn new() -> Self {
        Self
    }

    pub fn resolve(&self, class: &ClassDescriptor) -> Result<Vec<InitMethodPoint>> {
        let mut points = Vec::new();

        for method in class.all_methods() {
            let Some(marker) = method.markers().init().cloned() else {
                continue;
            };
            check_no_params(&method, LifecycleKind::Init)?;
            points.push(InitMethodPoint::new(
                method,
                marker.order,
                marker.invoke_always,
                marker.invocation,
            ));
        }

        points.sort_by_key(InitMethodPoint::order);
        debug!(type_name = %class.name(), count = points.len(), "Init methods resolved");
        Ok(points)
    }
}

/// Finds destroy-marked methods, in hierarchy order.
#[derive(Debug, Clone, Default)]
pub struct DestroyMethodResolver;

impl DestroyMethodResolver {
    pub fn new() -> Self {
        Self
    }

    pub fn resolve(&self, class: &ClassDescriptor) -> Result<Vec<DestroyMethodPoint>> {
        let mut points = Vec::new();

        for method in class.all_methods() {
            if !method.markers().has_destroy() {
                continue;
            }
            check_no_params(&method, LifecycleKind::Destroy)?;
            points.push(DestroyMethodPoint::new(method));
        }

        debug!(type_name = %class.name(), count = points.len(), "Destroy methods resolved");
        Ok(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::introspect::ParamDescriptor;
    use crate::marker::{InitInvocation, InitMarker, Marker};
    use crate::types::TypeRef;

    #[test]
    fn init_methods_sorted_by_order() {
        let class = ClassDescriptor::builder("app::Svc")
            .method(MethodDescriptor::new("b").marker(Marker::init(2)))
            .method(MethodDescriptor::new("a").marker(Marker::init(1)))
            .method(MethodDescriptor::new("c").marker(Marker::init(2)))
            .method(MethodDescriptor::new("plain"))
            .build()
            .unwrap();

        let points = InitMethodResolver::new().resolve(&class).unwrap();
        let names: Vec<&str> = points.iter().map(|p| p.method().name()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn init_point_carries_marker_settings() {
        let class = ClassDescriptor::builder("app::Svc")
            .method(MethodDescriptor::new("warm_up").marker(Marker::Init(InitMarker {
                order: 5,
                invoke_always: false,
                invocation: InitInvocation::PostDefine,
            })))
            .build()
            .unwrap();

        let points = InitMethodResolver::new().resolve(&class).unwrap();
        assert_eq!(points[0].order(), 5);
        assert!(!points[0].invoke_always());
        assert_eq!(points[0].invocation(), InitInvocation::PostDefine);
    }

    #[test]
    fn init_with_parameters_rejected() {
        let class = ClassDescriptor::builder("app::Svc")
            .method(
                MethodDescriptor::new("start")
                    .param(ParamDescriptor::new(TypeRef::of("u32")))
                    .marker(Marker::init(0)),
            )
            .build()
            .unwrap();

        match InitMethodResolver::new().resolve(&class) {
            Err(ResolveError::IllegalLifecycleSignature(err)) => {
                assert_eq!(err.kind, LifecycleKind::Init);
                assert_eq!(err.method, "start");
                assert_eq!(err.type_name, "app::Svc");
            }
            other => panic!("Expected IllegalLifecycleSignature, got: {other:?}"),
        }
    }

    #[test]
    fn destroy_methods_in_hierarchy_order() {
        let base = ClassDescriptor::builder("app::Base")
            .method(MethodDescriptor::new("close").marker(Marker::destroy()))
            .method(MethodDescriptor::new("flush").marker(Marker::destroy()))
            .build()
            .unwrap();
        let leaf = ClassDescriptor::builder("app::Leaf")
            .extends(base)
            .method(MethodDescriptor::new("release").marker(Marker::destroy()))
            .method(MethodDescriptor::new("flush"))
            .build()
            .unwrap();

        let points = DestroyMethodResolver::new().resolve(&leaf).unwrap();
        let names: Vec<&str> = points.iter().map(|p| p.method().name()).collect();
        assert_eq!(names, vec!["release", "close"]);
    }

    #[test]
    fn destroy_with_parameters_rejected() {
        let class = ClassDescriptor::builder("app::Svc")
            .method(
                MethodDescriptor::new("close")
                    .param(ParamDescriptor::new(TypeRef::of("bool")))
                    .marker(Marker::destroy()),
            )
            .build()
            .unwrap();

        assert!(matches!(
            DestroyMethodResolver::new().resolve(&class),
            Err(ResolveError::IllegalLifecycleSignature(_))
        ));
    }
}
