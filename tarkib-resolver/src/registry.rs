//! Type registry: the introspection facility the resolvers query.
//!
//! The registry maps fully qualified type names to their
//! [`ClassDescriptor`]s. It is filled during the build phase and frozen
//! once the [`Engine`](crate::engine::Engine) is constructed.

use std::collections::HashMap;
use std::sync::Arc;

use tarkib_support::rendering::{render_chain, suggest_similar};
use tracing::{debug, trace, warn};

use crate::error::{AlreadyRegisteredError, ResolveError, Result, UnknownTypeError};
use crate::introspect::ClassDescriptor;
use crate::module::TypeSink;

/// Read-only lookup of type descriptions.
pub trait Introspector: Send + Sync {
    /// Returns the description registered under `type_name`.
    ///
    /// # Errors
    /// [`ResolveError::UnknownType`] if nothing is registered under that
    /// name or alias.
    fn describe(&self, type_name: &str) -> Result<Arc<ClassDescriptor>>;
}

/// Stores every registered type description.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    types: HashMap<String, Arc<ClassDescriptor>>,
    aliases: HashMap<String, String>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a type description under its own name.
    ///
    /// # Errors
    /// [`ResolveError::AlreadyRegistered`] if the name is taken and
    /// `allow_override` is false.
    pub fn register(&mut self, class: Arc<ClassDescriptor>, allow_override: bool) -> Result<()> {
        let name = class.name().to_string();

        if !allow_override && self.types.contains_key(&name) {
            return Err(ResolveError::AlreadyRegistered(AlreadyRegisteredError {
                type_name: name,
            }));
        }

        let hierarchy: Vec<&str> = class.hierarchy().map(ClassDescriptor::name).collect();
        debug!(type_name = %name, hierarchy = %render_chain(&hierarchy), "Registered type");
        self.types.insert(name, class);
        Ok(())
    }

    /// Registers an alias: describing `from` describes `to` instead.
    ///
    /// Used to look an implementation up by the name of the trait it
    /// provides. `to` may itself be an alias. A type registered under
    /// `from` keeps answering for that name.
    pub fn register_alias(&mut self, from: impl Into<String>, to: impl Into<String>) {
        let (from, to) = (from.into(), to.into());
        if self.types.contains_key(&from) {
            warn!(from = %from, to = %to, "Alias shadowed by a registered type");
        }
        debug!(from = %from, to = %to, "Registered alias");
        self.aliases.insert(from, to);
    }

    /// Looks up a description by name, following alias chains.
    ///
    /// Registered types take precedence over aliases. A cyclic chain
    /// finds nothing.
    pub fn get(&self, type_name: &str) -> Option<&Arc<ClassDescriptor>> {
        let mut name = type_name;
        // Each hop consumes one alias; more hops than aliases means a cycle.
        for _ in 0..=self.aliases.len() {
            if let Some(class) = self.types.get(name) {
                return Some(class);
            }
            let target = self.aliases.get(name)?;
            trace!(from = %name, to = %target, "Following alias");
            name = target.as_str();
        }
        warn!(type_name = %type_name, "Alias cycle");
        None
    }

    /// Number of registered descriptions, aliases excluded.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Every name that [`get`](Self::get) answers for, sorted.
    pub fn registered_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .types
            .keys()
            .chain(self.aliases.keys())
            .map(String::as_str)
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }
}

impl Introspector for TypeRegistry {
    fn describe(&self, type_name: &str) -> Result<Arc<ClassDescriptor>> {
        self.get(type_name).cloned().ok_or_else(|| {
            ResolveError::UnknownType(UnknownTypeError {
                requested: type_name.to_string(),
                suggestions: suggest_similar(type_name, &self.registered_names(), 3),
            })
        })
    }
}

/// Adapter through which modules write into a registry.
///
/// [`TypeSink`] methods cannot fail, so the first registration error is
/// kept and reported once the module is done.
pub(crate) struct RegistrySink<'a> {
    pub registry: &'a mut TypeRegistry,
    pub allow_override: bool,
    pub first_error: Option<ResolveError>,
}

impl TypeSink for RegistrySink<'_> {
    fn describe(&mut self, class: Arc<ClassDescriptor>) {
        if let Err(err) = self.registry.register(class, self.allow_override) {
            self.first_error.get_or_insert(err);
        }
    }

    fn alias(&mut self, from: &str, to: &str) {
        self.registry.register_alias(from, to);
    }
}
