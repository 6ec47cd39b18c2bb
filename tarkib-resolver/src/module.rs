//! Type modules: groups of related type descriptions.
//!
//! A module describes the types of one area of an application in one
//! place, instead of scattering `register` calls across the codebase.
//! Modules are added to an [`EngineBuilder`](crate::engine::EngineBuilder)
//! explicitly, or submitted at link time:
//!
//! ```rust
//! use tarkib_resolver::introspect::ClassDescriptor;
//! use tarkib_resolver::module::{ModuleEntry, TypeSink};
//!
//! fn describe_storage(sink: &mut dyn TypeSink) -> tarkib_resolver::Result<()> {
//!     sink.describe(ClassDescriptor::builder("app::PgRepo").build()?);
//!     sink.alias("app::Repo", "app::PgRepo");
//!     Ok(())
//! }
//!
//! inventory::submit! {
//!     ModuleEntry { name: "storage", register: describe_storage }
//! }
//! ```

use std::sync::Arc;

use crate::error::Result;
use crate::introspect::ClassDescriptor;

/// A set of related type descriptions.
pub trait TypeModule: Send + Sync {
    /// Writes the module's descriptions into `sink`.
    ///
    /// Called once, while the engine is being built.
    fn register(&self, sink: &mut dyn TypeSink) -> Result<()>;

    /// Human-readable name for logs.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// What a [`TypeModule`] can register into.
pub trait TypeSink {
    /// Adds a type description.
    fn describe(&mut self, class: Arc<ClassDescriptor>);

    /// Makes `from` an alias of `to`.
    fn alias(&mut self, from: &str, to: &str);
}

/// A module registered at link time with `inventory::submit!`.
pub struct ModuleEntry {
    /// Unique module name, used in logs.
    pub name: &'static str,
    /// Writes the module's descriptions.
    pub register: fn(&mut dyn TypeSink) -> Result<()>,
}

inventory::collect!(ModuleEntry);

/// Names of every module submitted at link time.
pub fn linked_modules() -> Vec<&'static str> {
    inventory::iter::<ModuleEntry>().map(|entry| entry.name).collect()
}
