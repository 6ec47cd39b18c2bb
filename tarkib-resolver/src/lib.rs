//! Injection point resolution for Tarkib.
//!
//! Given a described type, works out what a dependency injection
//! container must do to wire it: which constructor to call, which
//! properties, collections and methods to inject, which provider
//! methods it exposes and which lifecycle callbacks to run. Every
//! dependency is expressed as a list of candidate names
//! ([`BeanReferences`]) for the container to look up.

pub mod config;
pub mod define;
pub mod engine;
pub mod error;
pub mod introspect;
pub mod marker;
pub mod module;
pub mod points;
pub mod references;
pub mod registry;
pub mod resolvers;
pub mod strategy;
pub mod types;

pub use config::ResolverConfig;
pub use engine::{Engine, EngineBuilder, WiringPlan, prelude};
pub use error::{ResolveError, Result};
pub use references::{BeanReferences, ReferenceResolver};
pub use registry::{Introspector, TypeRegistry};
pub use strategy::LookupStrategy;
pub use types::TypeRef;
