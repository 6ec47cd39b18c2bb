//! Provider (factory method) discovery.

use tarkib_support::naming::strip_suffix_word;
use tracing::debug;

use crate::introspect::ClassDescriptor;
use crate::points::ProviderDefinition;

const PROVIDER_SUFFIXES: &[&str] = &["Provider", "_provider"];

/// Finds methods marked as providers.
///
/// The provider name is the marker value when non-blank, else the method
/// name without a trailing `Provider`/`_provider`. Static providers are
/// owner-less; instance providers remember the owner they were resolved
/// for.
#[derive(Debug, Clone, Default)]
pub struct ProviderResolver;

impl ProviderResolver {
    pub fn new() -> Self {
        Self
    }

    pub fn resolve(&self, class: &ClassDescriptor, owner: Option<&str>) -> Vec<ProviderDefinition> {
        class
            .all_methods()
            .into_iter()
            .filter_map(|method| {
                let marker = method.markers().provider()?;
                let name = match marker.value.trim() {
                    "" => strip_suffix_word(method.name(), PROVIDER_SUFFIXES).to_string(),
                    explicit => explicit.to_string(),
                };
                let owner = if method.is_static() {
                    None
                } else {
                    owner.map(str::to_string)
                };

                debug!(
                    type_name = %class.name(),
                    provider = %name,
                    method = %method.name(),
                    is_static = method.is_static(),
                    "Provider definition"
                );
                Some(ProviderDefinition::new(name, method, owner))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::introspect::MethodDescriptor;
    use crate::marker::Marker;
    use crate::types::TypeRef;

    fn factory() -> std::sync::Arc<ClassDescriptor> {
        ClassDescriptor::builder("app::Factory")
            .method(
                MethodDescriptor::new("clockProvider")
                    .returns(TypeRef::of("app::Clock"))
                    .static_fn()
                    .marker(Marker::provider("")),
            )
            .method(
                MethodDescriptor::new("make_pool")
                    .returns(TypeRef::of("app::Pool"))
                    .marker(Marker::provider("  pool ")),
            )
            .method(MethodDescriptor::new("session_provider").marker(Marker::provider("")))
            .method(MethodDescriptor::new("Provider").marker(Marker::provider("")))
            .method(MethodDescriptor::new("helper"))
            .build()
            .unwrap()
    }

    #[test]
    fn provider_naming() {
        let providers = ProviderResolver::new().resolve(&factory(), Some("factory"));
        let names: Vec<&str> = providers.iter().map(ProviderDefinition::name).collect();
        assert_eq!(names, vec!["clock", "pool", "session", "Provider"]);
    }

    #[test]
    fn static_providers_have_no_owner() {
        let providers = ProviderResolver::new().resolve(&factory(), Some("factory"));
        assert!(providers[0].is_static());
        assert_eq!(providers[1].owner(), Some("factory"));
    }

    #[test]
    fn instance_provider_without_owner_is_not_static() {
        let class = ClassDescriptor::builder("app::Widgets")
            .method(MethodDescriptor::new("widgetProvider").marker(Marker::provider("")))
            .build()
            .unwrap();

        let providers = ProviderResolver::new().resolve(&class, None);
        assert_eq!(providers[0].name(), "widget");
        assert_eq!(providers[0].owner(), None);
        assert!(!providers[0].is_static());
        assert_eq!(providers[0].is_static(), providers[0].method().is_static());
    }

    #[test]
    fn unmarked_type_has_no_providers() {
        let class = ClassDescriptor::builder("app::Plain")
            .method(MethodDescriptor::new("helperProvider"))
            .build()
            .unwrap();
        assert!(ProviderResolver::new().resolve(&class, None).is_empty());
    }
}
