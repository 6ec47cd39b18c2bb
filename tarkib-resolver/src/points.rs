//! Injection points: the output of resolution.
//!
//! Each point pairs a member of the described type with the references
//! a container should look up to feed it. Points are plain values that
//! share the underlying descriptors through `Arc`.

use std::fmt;
use std::sync::Arc;

use crate::introspect::{CtorDescriptor, MethodDescriptor, PropertyDescriptor};
use crate::marker::InitInvocation;
use crate::references::BeanReferences;
use crate::types::TypeRef;

/// The constructor to call and one reference per parameter.
///
/// [`ConstructorInjectionPoint::none()`] is the "no usable constructor"
/// result; it is not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstructorInjectionPoint {
    constructor: Option<Arc<CtorDescriptor>>,
    references: Vec<BeanReferences>,
}

impl ConstructorInjectionPoint {
    pub fn new(constructor: Arc<CtorDescriptor>, references: Vec<BeanReferences>) -> Self {
        Self {
            constructor: Some(constructor),
            references,
        }
    }

    /// The empty sentinel.
    pub fn none() -> Self {
        Self {
            constructor: None,
            references: Vec::new(),
        }
    }

    pub fn is_none(&self) -> bool {
        self.constructor.is_none()
    }

    pub fn constructor(&self) -> Option<&Arc<CtorDescriptor>> {
        self.constructor.as_ref()
    }

    pub fn references(&self) -> &[BeanReferences] {
        &self.references
    }
}

impl fmt::Display for ConstructorInjectionPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.constructor {
            Some(ctor) => write!(f, "{}#{}", ctor.declaring(), ctor.signature()),
            None => write!(f, "<no constructor>"),
        }
    }
}

/// A writable, non-collection property and its reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyInjectionPoint {
    property: Arc<PropertyDescriptor>,
    reference: BeanReferences,
}

impl PropertyInjectionPoint {
    pub fn new(property: Arc<PropertyDescriptor>, reference: BeanReferences) -> Self {
        Self { property, reference }
    }

    pub fn property(&self) -> &Arc<PropertyDescriptor> {
        &self.property
    }

    pub fn name(&self) -> &str {
        self.property.name()
    }

    pub fn reference(&self) -> &BeanReferences {
        &self.reference
    }
}

/// A collection-typed property to be filled with every instance of the
/// element type. No reference is carried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionInjectionPoint {
    property: Arc<PropertyDescriptor>,
}

impl CollectionInjectionPoint {
    pub fn new(property: Arc<PropertyDescriptor>) -> Self {
        Self { property }
    }

    pub fn property(&self) -> &Arc<PropertyDescriptor> {
        &self.property
    }

    pub fn name(&self) -> &str {
        self.property.name()
    }

    /// The declared collection type.
    pub fn collection_type(&self) -> &TypeRef {
        self.property.ty()
    }

    /// The element type, when the descriptor names one.
    pub fn element_type(&self) -> Option<&TypeRef> {
        self.property.ty().element()
    }
}

/// A method to call with one reference per parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodInjectionPoint {
    method: Arc<MethodDescriptor>,
    references: Vec<BeanReferences>,
}

impl MethodInjectionPoint {
    pub fn new(method: Arc<MethodDescriptor>, references: Vec<BeanReferences>) -> Self {
        Self { method, references }
    }

    pub fn method(&self) -> &Arc<MethodDescriptor> {
        &self.method
    }

    pub fn references(&self) -> &[BeanReferences] {
        &self.references
    }
}

/// A factory method that produces a named object on demand.
///
/// Whether the factory is static comes from the method itself. Instance
/// factories carry the name of the object they must be invoked on, when
/// one is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderDefinition {
    name: String,
    method: Arc<MethodDescriptor>,
    owner: Option<String>,
}

impl ProviderDefinition {
    pub fn new(
        name: impl Into<String>,
        method: Arc<MethodDescriptor>,
        owner: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            method,
            owner,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn method(&self) -> &Arc<MethodDescriptor> {
        &self.method
    }

    pub fn owner(&self) -> Option<&str> {
        self.owner.as_deref()
    }

    pub fn is_static(&self) -> bool {
        self.method.is_static()
    }
}

/// A zero-argument method to call after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitMethodPoint {
    method: Arc<MethodDescriptor>,
    order: i32,
    invoke_always: bool,
    invocation: InitInvocation,
}

impl InitMethodPoint {
    pub fn new(
        method: Arc<MethodDescriptor>,
        order: i32,
        invoke_always: bool,
        invocation: InitInvocation,
    ) -> Self {
        Self {
            method,
            order,
            invoke_always,
            invocation,
        }
    }

    pub fn method(&self) -> &Arc<MethodDescriptor> {
        &self.method
    }

    pub fn order(&self) -> i32 {
        self.order
    }

    pub fn invoke_always(&self) -> bool {
        self.invoke_always
    }

    pub fn invocation(&self) -> InitInvocation {
        self.invocation
    }
}

/// A zero-argument method to call before disposal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestroyMethodPoint {
    method: Arc<MethodDescriptor>,
}

impl DestroyMethodPoint {
    pub fn new(method: Arc<MethodDescriptor>) -> Self {
        Self { method }
    }

    pub fn method(&self) -> &Arc<MethodDescriptor> {
        &self.method
    }
}
