//! # The Engine — entry point of Tarkib
//!
//! Resolves, by type name, every injection point a container needs to
//! wire an instance of that type.
//!
//! # Architecture
//! ```text
//! EngineBuilder  ──build()──>  Engine ──plan(type)──> WiringPlan
//!   register / add_module        │
//!                                ├─ TypeRegistry (frozen)
//!                                └─ Resolvers ── ReferenceResolver
//! ```
//!
//! # Examples
//! ```rust
//! use tarkib_resolver::prelude::*;
//!
//! let service = ClassDescriptor::builder("app::UserService")
//!     .ctor(
//!         CtorDescriptor::new()
//!             .param(ParamDescriptor::named("repo", TypeRef::of("app::UserRepo"))),
//!     )
//!     .setter_property("mailer", TypeRef::of("app::Mailer"), &[Marker::inject()])
//!     .method(MethodDescriptor::new("start").marker(Marker::init(0)))
//!     .build()
//!     .expect("valid description");
//!
//! let engine = Engine::builder()
//!     .register(service)
//!     .build()
//!     .expect("Failed to build engine");
//!
//! let plan = engine.plan("app::UserService", Some("userService")).expect("Failed to plan");
//! assert_eq!(plan.constructor.references()[0].name(1), Some("userRepo"));
//! assert_eq!(plan.properties[0].name(), "mailer");
//! assert_eq!(plan.init_methods.len(), 1);
//! ```

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::config::ResolverConfig;
use crate::define;
use crate::error::{ResolveError, Result};
use crate::introspect::{ClassDescriptor, NameDiscovery};
use crate::marker::InitInvocation;
use crate::module::{ModuleEntry, TypeModule};
use crate::points::{
    CollectionInjectionPoint, ConstructorInjectionPoint, DestroyMethodPoint, InitMethodPoint,
    MethodInjectionPoint, PropertyInjectionPoint, ProviderDefinition,
};
use crate::references::ReferenceResolver;
use crate::registry::{Introspector, RegistrySink, TypeRegistry};
use crate::resolvers::Resolvers;
use crate::strategy::LookupStrategy;

// ═══════════════════════════════════════════
// EngineBuilder
// ═══════════════════════════════════════════

/// Builds an [`Engine`] from type descriptions and configuration.
///
/// Registration errors are kept and reported by
/// [`build()`](EngineBuilder::build), so the builder can be chained.
pub struct EngineBuilder {
    registry: TypeRegistry,
    config: ResolverConfig,
    names: Option<Arc<dyn NameDiscovery>>,
    allow_override: bool,
    first_error: Option<ResolveError>,
}

impl EngineBuilder {
    fn new() -> Self {
        Self {
            registry: TypeRegistry::new(),
            config: ResolverConfig::default(),
            names: None,
            allow_override: false,
            first_error: None,
        }
    }

    /// Replaces the whole configuration.
    pub fn config(mut self, config: ResolverConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the lookup strategy order for default references.
    pub fn lookup(mut self, lookup: impl IntoIterator<Item = LookupStrategy>) -> Self {
        self.config.lookup = lookup.into_iter().collect();
        self
    }

    pub fn autowire(mut self, autowire: bool) -> Self {
        self.config.autowire = autowire;
        self
    }

    pub fn use_markers(mut self, use_markers: bool) -> Self {
        self.config.use_markers = use_markers;
        self
    }

    /// Uses a custom parameter name service instead of the names
    /// recorded on the descriptors.
    pub fn name_discovery(mut self, names: impl NameDiscovery + 'static) -> Self {
        self.names = Some(Arc::new(names));
        self
    }

    /// Allow replacing previously registered descriptions.
    pub fn allow_override(mut self, allow: bool) -> Self {
        self.allow_override = allow;
        self
    }

    /// Registers a type description.
    pub fn register(mut self, class: Arc<ClassDescriptor>) -> Self {
        if let Err(err) = self.registry.register(class, self.allow_override) {
            self.record(err);
        }
        self
    }

    /// Makes `from` describe the same type as `to`.
    pub fn alias(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.registry.register_alias(from, to);
        self
    }

    /// Adds a [`TypeModule`].
    pub fn add_module(mut self, module: &dyn TypeModule) -> Self {
        debug!(module = module.name(), "Adding module");
        let result = {
            let mut sink = self.sink();
            module.register(&mut sink).and_then(|()| sink.first_error.map_or(Ok(()), Err))
        };
        if let Err(err) = result {
            self.record(err);
        }
        self
    }

    /// Adds every module submitted with `inventory::submit!`.
    pub fn linked_modules(mut self) -> Self {
        for entry in inventory::iter::<ModuleEntry>() {
            debug!(module = entry.name, "Adding linked module");
            let result = {
                let mut sink = self.sink();
                (entry.register)(&mut sink).and_then(|()| sink.first_error.map_or(Ok(()), Err))
            };
            if let Err(err) = result {
                self.record(err);
            }
        }
        self
    }

    /// Builds the engine.
    ///
    /// # Errors
    /// The first registration error, or
    /// [`ResolveError::InvalidConfig`] for an unusable configuration.
    #[instrument(skip(self), name = "engine_build")]
    pub fn build(self) -> Result<Engine> {
        info!(registered = self.registry.len(), "Building engine");

        if let Some(err) = self.first_error {
            return Err(err);
        }
        self.config.validate()?;

        let references = match self.names {
            Some(names) => ReferenceResolver::new(self.config.lookup.clone(), Some(names)),
            None => ReferenceResolver::from_config(&self.config),
        };

        info!("Engine built successfully ✓");
        Ok(Engine {
            introspector: Arc::new(self.registry),
            resolvers: Resolvers::new(references),
            config: self.config,
        })
    }

    fn sink(&mut self) -> RegistrySink<'_> {
        RegistrySink {
            registry: &mut self.registry,
            allow_override: self.allow_override,
            first_error: None,
        }
    }

    fn record(&mut self, err: ResolveError) {
        warn!(error = %err, "Registration failed");
        self.first_error.get_or_insert(err);
    }
}

// ═══════════════════════════════════════════
// Engine
// ═══════════════════════════════════════════

/// Immutable, thread-safe resolution engine.
///
/// Every operation is a pure function of the described type and the
/// configuration; nothing is cached.
pub struct Engine {
    introspector: Arc<dyn Introspector>,
    resolvers: Resolvers,
    config: ResolverConfig,
}

impl Engine {
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    /// An engine over a custom introspection facility.
    ///
    /// # Errors
    /// [`ResolveError::InvalidConfig`] for an unusable configuration.
    pub fn with_introspector(
        introspector: Arc<dyn Introspector>,
        config: ResolverConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            introspector,
            resolvers: Resolvers::from_config(&config),
            config,
        })
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn resolvers(&self) -> &Resolvers {
        &self.resolvers
    }

    pub fn introspector(&self) -> &dyn Introspector {
        self.introspector.as_ref()
    }

    /// Looks up a type description.
    pub fn describe(&self, type_name: &str) -> Result<Arc<ClassDescriptor>> {
        self.introspector.describe(type_name)
    }

    // ── Resolution ──

    pub fn constructor(&self, type_name: &str) -> Result<ConstructorInjectionPoint> {
        let class = self.describe(type_name)?;
        self.resolvers.ctor().resolve(&class, self.config.use_markers)
    }

    pub fn properties(&self, type_name: &str) -> Result<Vec<PropertyInjectionPoint>> {
        let class = self.describe(type_name)?;
        Ok(self.resolvers.property().resolve(&class, self.config.autowire))
    }

    pub fn collections(&self, type_name: &str) -> Result<Vec<CollectionInjectionPoint>> {
        let class = self.describe(type_name)?;
        Ok(self.resolvers.collection().resolve(&class, self.config.autowire))
    }

    pub fn methods(&self, type_name: &str) -> Result<Vec<MethodInjectionPoint>> {
        let class = self.describe(type_name)?;
        self.resolvers.method().resolve(&class)
    }

    /// Provider definitions; instance providers are bound to `owner`.
    pub fn providers(
        &self,
        type_name: &str,
        owner: Option<&str>,
    ) -> Result<Vec<ProviderDefinition>> {
        let class = self.describe(type_name)?;
        Ok(self.resolvers.provider().resolve(&class, owner))
    }

    pub fn init_methods(&self, type_name: &str) -> Result<Vec<InitMethodPoint>> {
        let class = self.describe(type_name)?;
        self.resolvers.init().resolve(&class)
    }

    pub fn destroy_methods(&self, type_name: &str) -> Result<Vec<DestroyMethodPoint>> {
        let class = self.describe(type_name)?;
        self.resolvers.destroy().resolve(&class)
    }

    /// Runs every resolver over one type.
    #[instrument(skip(self), name = "wiring_plan")]
    pub fn plan(&self, type_name: &str, owner: Option<&str>) -> Result<WiringPlan> {
        let class = self.describe(type_name)?;

        let plan = WiringPlan {
            type_name: class.name().to_string(),
            constructor: self.resolvers.ctor().resolve(&class, self.config.use_markers)?,
            properties: self.resolvers.property().resolve(&class, self.config.autowire),
            collections: self.resolvers.collection().resolve(&class, self.config.autowire),
            methods: self.resolvers.method().resolve(&class)?,
            providers: self.resolvers.provider().resolve(&class, owner),
            init_methods: self.resolvers.init().resolve(&class)?,
            destroy_methods: self.resolvers.destroy().resolve(&class)?,
        };

        debug!(
            type_name = %plan.type_name,
            properties = plan.properties.len(),
            collections = plan.collections.len(),
            methods = plan.methods.len(),
            providers = plan.providers.len(),
            "Wiring plan ready"
        );
        Ok(plan)
    }

    // ── Explicit definitions ──

    /// See [`define::define_constructor`].
    pub fn define_constructor(
        &self,
        type_name: &str,
        param_types: Option<&[&str]>,
        values: Option<&[&str]>,
    ) -> Result<ConstructorInjectionPoint> {
        let class = self.describe(type_name)?;
        define::define_constructor(self.resolvers.references(), &class, param_types, values)
    }

    /// See [`define::define_property`].
    pub fn define_property(
        &self,
        type_name: &str,
        property: &str,
        value: Option<&str>,
    ) -> Result<PropertyInjectionPoint> {
        let class = self.describe(type_name)?;
        define::define_property(self.resolvers.references(), &class, property, value)
    }

    /// See [`define::define_collection`].
    pub fn define_collection(
        &self,
        type_name: &str,
        property: &str,
    ) -> Result<CollectionInjectionPoint> {
        let class = self.describe(type_name)?;
        define::define_collection(&class, property)
    }

    /// See [`define::define_method`].
    pub fn define_method(
        &self,
        type_name: &str,
        method: &str,
        param_types: Option<&[&str]>,
        values: Option<&[&str]>,
    ) -> Result<MethodInjectionPoint> {
        let class = self.describe(type_name)?;
        define::define_method(self.resolvers.references(), &class, method, param_types, values)
    }

    /// See [`define::define_init_methods`].
    pub fn define_init_methods(
        &self,
        type_name: &str,
        invocation: InitInvocation,
        names: &[&str],
    ) -> Result<Vec<InitMethodPoint>> {
        let class = self.describe(type_name)?;
        define::define_init_methods(&class, invocation, names)
    }

    /// See [`define::define_destroy_methods`].
    pub fn define_destroy_methods(
        &self,
        type_name: &str,
        names: &[&str],
    ) -> Result<Vec<DestroyMethodPoint>> {
        let class = self.describe(type_name)?;
        define::define_destroy_methods(&class, names)
    }

    /// See [`define::define_provider`].
    pub fn define_provider(
        &self,
        type_name: &str,
        provider: &str,
        method: &str,
        param_types: Option<&[&str]>,
        owner: &str,
    ) -> Result<ProviderDefinition> {
        let class = self.describe(type_name)?;
        define::define_provider(&class, provider, method, param_types, owner)
    }

    /// See [`define::define_static_provider`].
    pub fn define_static_provider(
        &self,
        type_name: &str,
        provider: &str,
        method: &str,
        param_types: Option<&[&str]>,
    ) -> Result<ProviderDefinition> {
        let class = self.describe(type_name)?;
        define::define_static_provider(&class, provider, method, param_types)
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.config)
            .field("resolvers", &self.resolvers)
            .finish()
    }
}

// ═══════════════════════════════════════════
// WiringPlan
// ═══════════════════════════════════════════

/// Every injection point of one type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WiringPlan {
    pub type_name: String,
    pub constructor: ConstructorInjectionPoint,
    pub properties: Vec<PropertyInjectionPoint>,
    pub collections: Vec<CollectionInjectionPoint>,
    pub methods: Vec<MethodInjectionPoint>,
    pub providers: Vec<ProviderDefinition>,
    pub init_methods: Vec<InitMethodPoint>,
    pub destroy_methods: Vec<DestroyMethodPoint>,
}

impl WiringPlan {
    /// Init methods to run at `invocation`, in order.
    pub fn init_methods_for(
        &self,
        invocation: InitInvocation,
    ) -> impl Iterator<Item = &InitMethodPoint> {
        self.init_methods
            .iter()
            .filter(move |point| point.invocation() == invocation)
    }

    /// Returns `true` if anything besides the constructor gets wired.
    pub fn has_injections(&self) -> bool {
        !self.properties.is_empty() || !self.collections.is_empty() || !self.methods.is_empty()
    }
}

// ═══════════════════════════════════════════
// Prelude
// ═══════════════════════════════════════════

pub mod prelude {
    pub use super::{Engine, EngineBuilder, WiringPlan};
    pub use crate::config::ResolverConfig;
    pub use crate::error::{ResolveError, Result};
    pub use crate::introspect::{
        ClassDescriptor, CtorDescriptor, FieldDescriptor, MethodDescriptor, ParamDescriptor,
    };
    pub use crate::marker::{InitInvocation, Marker};
    pub use crate::module::{TypeModule, TypeSink};
    pub use crate::references::BeanReferences;
    pub use crate::strategy::LookupStrategy;
    pub use crate::types::TypeRef;
}

// ═══════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════
