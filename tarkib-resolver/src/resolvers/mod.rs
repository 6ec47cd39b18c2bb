//! The resolvers, one per kind of injection point.
//!
//! Every resolver is a pure function of the described type and its own
//! configuration: nothing is cached between calls, and all of them are
//! `Send + Sync` so a single [`Resolvers`] can be shared across threads.

pub mod collection;
pub mod ctor;
pub mod lifecycle;
pub mod method;
pub mod property;
pub mod provider;

pub use collection::CollectionResolver;
pub use ctor::CtorResolver;
pub use lifecycle::{DestroyMethodResolver, InitMethodResolver};
pub use method::MethodResolver;
pub use property::PropertyResolver;
pub use provider::ProviderResolver;

use crate::config::ResolverConfig;
use crate::references::ReferenceResolver;

/// All resolvers around one shared [`ReferenceResolver`].
#[derive(Debug, Clone)]
pub struct Resolvers {
    references: ReferenceResolver,
    ctor: CtorResolver,
    property: PropertyResolver,
    collection: CollectionResolver,
    method: MethodResolver,
    provider: ProviderResolver,
    init: InitMethodResolver,
    destroy: DestroyMethodResolver,
}

impl Resolvers {
    pub fn new(references: ReferenceResolver) -> Self {
        Self {
            ctor: CtorResolver::new(references.clone()),
            property: PropertyResolver::new(references.clone()),
            collection: CollectionResolver::new(),
            method: MethodResolver::new(references.clone()),
            provider: ProviderResolver::new(),
            init: InitMethodResolver::new(),
            destroy: DestroyMethodResolver::new(),
            references,
        }
    }

    pub fn from_config(config: &ResolverConfig) -> Self {
        Self::new(ReferenceResolver::from_config(config))
    }

    pub fn references(&self) -> &ReferenceResolver {
        &self.references
    }

    pub fn ctor(&self) -> &CtorResolver {
        &self.ctor
    }

    pub fn property(&self) -> &PropertyResolver {
        &self.property
    }

    pub fn collection(&self) -> &CollectionResolver {
        &self.collection
    }

    pub fn method(&self) -> &MethodResolver {
        &self.method
    }

    pub fn provider(&self) -> &ProviderResolver {
        &self.provider
    }

    pub fn init(&self) -> &InitMethodResolver {
        &self.init
    }

    pub fn destroy(&self) -> &DestroyMethodResolver {
        &self.destroy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn resolvers_are_thread_safe() {
        assert_send_sync::<Resolvers>();
        assert_send_sync::<ReferenceResolver>();
    }

    #[test]
    fn shared_lookup_order() {
        let resolvers = Resolvers::from_config(&ResolverConfig::default());
        assert_eq!(resolvers.references().lookup().len(), 3);
    }
}
