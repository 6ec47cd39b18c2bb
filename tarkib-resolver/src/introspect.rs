//! Type descriptions consumed by the resolvers.
//!
//! Rust has no runtime reflection, so a type's constructors, methods,
//! fields and properties are described once, ahead of time, through
//! [`ClassBuilder`]. The resulting [`ClassDescriptor`] is immutable and
//! shared behind `Arc`, so injection points can hold on to the members
//! they point at without borrowing from the registry.
//!
//! # Examples
//! ```
//! use tarkib_resolver::introspect::{ClassDescriptor, CtorDescriptor, ParamDescriptor};
//! use tarkib_resolver::marker::Marker;
//! use tarkib_resolver::types::TypeRef;
//!
//! let service = ClassDescriptor::builder("app::UserService")
//!     .ctor(
//!         CtorDescriptor::new()
//!             .param(ParamDescriptor::named("repo", TypeRef::of("app::UserRepo"))),
//!     )
//!     .field_property("logger", TypeRef::of("app::Logger"), &[Marker::inject()])
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(service.constructors().len(), 1);
//! assert!(service.find_property("logger").is_some());
//! ```

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crate::error::{Result, ResolveError, UnknownMemberError};
use crate::marker::{Marker, Markers};
use crate::types::TypeRef;

// ═══════════════════════════════════════════
// Members
// ═══════════════════════════════════════════

/// A constructor or method parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamDescriptor {
    ty: TypeRef,
    name: Option<String>,
    markers: Markers,
}

impl ParamDescriptor {
    /// A parameter whose source name is not available.
    pub fn new(ty: TypeRef) -> Self {
        Self {
            ty,
            name: None,
            markers: Markers::new(),
        }
    }

    /// A parameter with a discoverable source name.
    pub fn named(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            ty,
            name: Some(name.into()),
            markers: Markers::new(),
        }
    }

    pub fn marker(mut self, marker: Marker) -> Self {
        self.markers.push(marker);
        self
    }

    pub fn ty(&self) -> &TypeRef {
        &self.ty
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn markers(&self) -> &Markers {
        &self.markers
    }
}

/// A constructor of a described type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CtorDescriptor {
    declaring: TypeRef,
    params: Vec<ParamDescriptor>,
    markers: Markers,
}

impl CtorDescriptor {
    pub fn new() -> Self {
        Self {
            declaring: TypeRef::of(""),
            params: Vec::new(),
            markers: Markers::new(),
        }
    }

    pub fn param(mut self, param: ParamDescriptor) -> Self {
        self.params.push(param);
        self
    }

    pub fn marker(mut self, marker: Marker) -> Self {
        self.markers.push(marker);
        self
    }

    pub fn declaring(&self) -> &TypeRef {
        &self.declaring
    }

    pub fn params(&self) -> &[ParamDescriptor] {
        &self.params
    }

    pub fn markers(&self) -> &Markers {
        &self.markers
    }

    /// Parameter type names, in declaration order.
    pub fn param_types(&self) -> Vec<&str> {
        self.params.iter().map(|p| p.ty.name()).collect()
    }

    /// Human-readable signature, e.g. `new(app::A, app::B)`.
    pub fn signature(&self) -> String {
        format!("new({})", self.param_types().join(", "))
    }
}

impl Default for CtorDescriptor {
    fn default() -> Self {
        Self::new()
    }
}

/// A method of a described type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDescriptor {
    declaring: TypeRef,
    name: String,
    params: Vec<ParamDescriptor>,
    returns: Option<TypeRef>,
    is_static: bool,
    markers: Markers,
}

impl MethodDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            declaring: TypeRef::of(""),
            name: name.into(),
            params: Vec::new(),
            returns: None,
            is_static: false,
            markers: Markers::new(),
        }
    }

    pub fn param(mut self, param: ParamDescriptor) -> Self {
        self.params.push(param);
        self
    }

    pub fn returns(mut self, ty: TypeRef) -> Self {
        self.returns = Some(ty);
        self
    }

    /// Marks the method as static (callable without an owning instance).
    pub fn static_fn(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn marker(mut self, marker: Marker) -> Self {
        self.markers.push(marker);
        self
    }

    pub fn declaring(&self) -> &TypeRef {
        &self.declaring
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &[ParamDescriptor] {
        &self.params
    }

    pub fn return_type(&self) -> Option<&TypeRef> {
        self.returns.as_ref()
    }

    pub fn is_static(&self) -> bool {
        self.is_static
    }

    pub fn markers(&self) -> &Markers {
        &self.markers
    }

    pub fn param_types(&self) -> Vec<&str> {
        self.params.iter().map(|p| p.ty.name()).collect()
    }

    pub fn signature(&self) -> String {
        format!("{}({})", self.name, self.param_types().join(", "))
    }

    /// Returns `true` for conventional property setters: non-static,
    /// exactly one parameter, named `set_<x>` or `set<Upper…>`.
    ///
    /// ```
    /// use tarkib_resolver::introspect::{MethodDescriptor, ParamDescriptor};
    /// use tarkib_resolver::types::TypeRef;
    ///
    /// let p = || ParamDescriptor::new(TypeRef::of("app::Repo"));
    /// assert!(MethodDescriptor::new("set_repo").param(p()).is_property_setter());
    /// assert!(MethodDescriptor::new("setRepo").param(p()).is_property_setter());
    /// assert!(!MethodDescriptor::new("settle").param(p()).is_property_setter());
    /// assert!(!MethodDescriptor::new("set_repo").is_property_setter());
    /// ```
    pub fn is_property_setter(&self) -> bool {
        if self.is_static || self.params.len() != 1 {
            return false;
        }
        if let Some(rest) = self.name.strip_prefix("set_") {
            return !rest.is_empty();
        }
        match self.name.strip_prefix("set") {
            Some(rest) => rest.chars().next().is_some_and(char::is_uppercase),
            None => false,
        }
    }
}

/// A field of a described type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    name: String,
    ty: TypeRef,
    markers: Markers,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            markers: Markers::new(),
        }
    }

    pub fn marker(mut self, marker: Marker) -> Self {
        self.markers.push(marker);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> &TypeRef {
        &self.ty
    }

    pub fn markers(&self) -> &Markers {
        &self.markers
    }
}

/// A property: a getter/setter/backing-field triple sharing one name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDescriptor {
    declaring: TypeRef,
    name: String,
    ty: TypeRef,
    getter: Option<Arc<MethodDescriptor>>,
    setter: Option<Arc<MethodDescriptor>>,
    field: Option<Arc<FieldDescriptor>>,
}

impl PropertyDescriptor {
    pub fn declaring(&self) -> &TypeRef {
        &self.declaring
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> &TypeRef {
        &self.ty
    }

    pub fn getter(&self) -> Option<&Arc<MethodDescriptor>> {
        self.getter.as_ref()
    }

    pub fn setter(&self) -> Option<&Arc<MethodDescriptor>> {
        self.setter.as_ref()
    }

    pub fn field(&self) -> Option<&Arc<FieldDescriptor>> {
        self.field.as_ref()
    }

    /// A property is writable through its setter or its backing field.
    pub fn is_writable(&self) -> bool {
        self.setter.is_some() || self.field.is_some()
    }

    /// The inject marker on the setter, or else on the backing field.
    pub fn inject_marker(&self) -> Option<&crate::marker::InjectMarker> {
        self.setter
            .as_ref()
            .and_then(|m| m.markers().inject())
            .or_else(|| self.field.as_ref().and_then(|f| f.markers().inject()))
    }
}

// ═══════════════════════════════════════════
// Executable
// ═══════════════════════════════════════════

/// A borrowed view over something that takes parameters.
#[derive(Debug, Clone, Copy)]
pub enum Executable<'a> {
    Ctor(&'a CtorDescriptor),
    Method(&'a MethodDescriptor),
}

impl<'a> Executable<'a> {
    pub fn params(&self) -> &'a [ParamDescriptor] {
        match self {
            Executable::Ctor(c) => c.params(),
            Executable::Method(m) => m.params(),
        }
    }

    pub fn markers(&self) -> &'a Markers {
        match self {
            Executable::Ctor(c) => c.markers(),
            Executable::Method(m) => m.markers(),
        }
    }

    pub fn declaring(&self) -> &'a TypeRef {
        match self {
            Executable::Ctor(c) => c.declaring(),
            Executable::Method(m) => m.declaring(),
        }
    }

    /// Member name used in error messages.
    pub fn name(&self) -> String {
        match self {
            Executable::Ctor(c) => c.signature(),
            Executable::Method(m) => m.name().to_string(),
        }
    }
}

impl<'a> From<&'a CtorDescriptor> for Executable<'a> {
    fn from(ctor: &'a CtorDescriptor) -> Self {
        Executable::Ctor(ctor)
    }
}

impl<'a> From<&'a MethodDescriptor> for Executable<'a> {
    fn from(method: &'a MethodDescriptor) -> Self {
        Executable::Method(method)
    }
}

/// Optional service that maps a parameter position to its source name.
///
/// When absent, the [`Name`](crate::strategy::LookupStrategy::Name)
/// lookup strategy is skipped for parameters.
pub trait NameDiscovery: Send + Sync {
    fn parameter_name(&self, member: Executable<'_>, index: usize) -> Option<String>;
}

/// Reads the names recorded on the parameter descriptors.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeclaredNames;

impl NameDiscovery for DeclaredNames {
    fn parameter_name(&self, member: Executable<'_>, index: usize) -> Option<String> {
        member
            .params()
            .get(index)
            .and_then(|p| p.name())
            .map(str::to_string)
    }
}

// ═══════════════════════════════════════════
// ClassDescriptor
// ═══════════════════════════════════════════

/// Immutable description of one type and, through its supertype chain,
/// of everything it inherits.
///
/// The chain ends at the last described ancestor; the universal base
/// type is never part of it.
#[derive(Clone, PartialEq, Eq)]
pub struct ClassDescriptor {
    ty: TypeRef,
    supertype: Option<Arc<ClassDescriptor>>,
    ctors: Vec<Arc<CtorDescriptor>>,
    methods: Vec<Arc<MethodDescriptor>>,
    fields: Vec<Arc<FieldDescriptor>>,
    properties: Vec<Arc<PropertyDescriptor>>,
}

impl ClassDescriptor {
    /// Starts describing the type with the given fully qualified name.
    pub fn builder(name: impl Into<String>) -> ClassBuilder {
        ClassBuilder::new(TypeRef::of(name))
    }

    pub fn ty(&self) -> &TypeRef {
        &self.ty
    }

    pub fn name(&self) -> &str {
        self.ty.name()
    }

    pub fn supertype(&self) -> Option<&Arc<ClassDescriptor>> {
        self.supertype.as_ref()
    }

    pub fn constructors(&self) -> &[Arc<CtorDescriptor>] {
        &self.ctors
    }

    /// Methods declared on this type only.
    pub fn declared_methods(&self) -> &[Arc<MethodDescriptor>] {
        &self.methods
    }

    pub fn declared_fields(&self) -> &[Arc<FieldDescriptor>] {
        &self.fields
    }

    /// Properties declared on this type only.
    pub fn declared_properties(&self) -> &[Arc<PropertyDescriptor>] {
        &self.properties
    }

    /// Walks from this type to its least-derived described ancestor.
    pub fn hierarchy(&self) -> impl Iterator<Item = &ClassDescriptor> {
        std::iter::successors(Some(self), |class| class.supertype.as_deref())
    }

    /// Methods of the whole hierarchy, most-derived first.
    ///
    /// A method overridden further down (same name and parameter types)
    /// is reported once, at its most-derived declaration.
    pub fn all_methods(&self) -> Vec<Arc<MethodDescriptor>> {
        let mut seen: HashSet<(String, Vec<String>)> = HashSet::new();
        let mut methods = Vec::new();

        for class in self.hierarchy() {
            for method in &class.methods {
                let signature = (
                    method.name().to_string(),
                    method.param_types().into_iter().map(str::to_string).collect(),
                );
                if seen.insert(signature) {
                    methods.push(Arc::clone(method));
                }
            }
        }
        methods
    }

    /// Finds a property by name, most-derived declaration first.
    pub fn find_property(&self, name: &str) -> Option<&Arc<PropertyDescriptor>> {
        self.hierarchy()
            .flat_map(|class| class.properties.iter())
            .find(|p| p.name() == name)
    }
}

impl fmt::Debug for ClassDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassDescriptor")
            .field("type", &self.ty.name())
            .field("supertype", &self.supertype.as_ref().map(|s| s.name().to_string()))
            .field("constructors", &self.ctors.len())
            .field("methods", &self.methods.len())
            .field("fields", &self.fields.len())
            .field("properties", &self.properties.len())
            .finish()
    }
}

// ═══════════════════════════════════════════
// ClassBuilder
// ═══════════════════════════════════════════

struct PropertySpec {
    name: String,
    ty: TypeRef,
    getter: Option<String>,
    setter: Option<String>,
    field: Option<String>,
}

/// Builds a [`ClassDescriptor`].
///
/// Properties refer to their getter, setter and backing field by name;
/// [`build()`](ClassBuilder::build) resolves those names against the
/// members declared on the same type.
pub struct ClassBuilder {
    ty: TypeRef,
    supertype: Option<Arc<ClassDescriptor>>,
    ctors: Vec<CtorDescriptor>,
    methods: Vec<MethodDescriptor>,
    fields: Vec<FieldDescriptor>,
    properties: Vec<PropertySpec>,
}

impl ClassBuilder {
    fn new(ty: TypeRef) -> Self {
        Self {
            ty,
            supertype: None,
            ctors: Vec::new(),
            methods: Vec::new(),
            fields: Vec::new(),
            properties: Vec::new(),
        }
    }

    /// Sets the immediate supertype.
    pub fn extends(mut self, supertype: Arc<ClassDescriptor>) -> Self {
        self.supertype = Some(supertype);
        self
    }

    pub fn ctor(mut self, ctor: CtorDescriptor) -> Self {
        self.ctors.push(ctor);
        self
    }

    pub fn method(mut self, method: MethodDescriptor) -> Self {
        self.methods.push(method);
        self
    }

    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    /// Declares a property whose members are already declared.
    pub fn property(
        mut self,
        name: impl Into<String>,
        ty: TypeRef,
        getter: Option<&str>,
        setter: Option<&str>,
        field: Option<&str>,
    ) -> Self {
        self.properties.push(PropertySpec {
            name: name.into(),
            ty,
            getter: getter.map(str::to_string),
            setter: setter.map(str::to_string),
            field: field.map(str::to_string),
        });
        self
    }

    /// Declares a field together with the property it backs.
    pub fn field_property(
        self,
        name: &str,
        ty: TypeRef,
        markers: &[Marker],
    ) -> Self {
        let field = FieldDescriptor {
            name: name.to_string(),
            ty: ty.clone(),
            markers: markers.iter().cloned().collect(),
        };
        self.field(field).property(name, ty, None, None, Some(name))
    }

    /// Declares a `set_<name>` setter together with the property it writes.
    /// The markers go on the setter.
    pub fn setter_property(
        self,
        name: &str,
        ty: TypeRef,
        markers: &[Marker],
    ) -> Self {
        let setter_name = format!("set_{name}");
        let mut setter = MethodDescriptor::new(setter_name.clone())
            .param(ParamDescriptor::named(name, ty.clone()));
        for marker in markers {
            setter = setter.marker(marker.clone());
        }
        self.method(setter)
            .property(name, ty, None, Some(&setter_name), None)
    }

    /// Declares a getter-only (read-only) property.
    pub fn getter_property(self, name: &str, ty: TypeRef) -> Self {
        let getter = MethodDescriptor::new(name).returns(ty.clone());
        self.method(getter).property(name, ty, Some(name), None, None)
    }

    /// Freezes the description.
    ///
    /// # Errors
    /// Returns [`ResolveError::UnknownMember`] if a property names a
    /// getter, setter or field that is not declared on this type.
    pub fn build(self) -> Result<Arc<ClassDescriptor>> {
        let ty = self.ty;

        let ctors: Vec<Arc<CtorDescriptor>> = self
            .ctors
            .into_iter()
            .map(|mut ctor| {
                ctor.declaring = ty.clone();
                Arc::new(ctor)
            })
            .collect();

        let methods: Vec<Arc<MethodDescriptor>> = self
            .methods
            .into_iter()
            .map(|mut method| {
                method.declaring = ty.clone();
                Arc::new(method)
            })
            .collect();

        let fields: Vec<Arc<FieldDescriptor>> = self.fields.into_iter().map(Arc::new).collect();

        let mut properties = Vec::with_capacity(self.properties.len());
        for spec in self.properties {
            let getter = spec
                .getter
                .as_deref()
                .map(|name| find_method(&ty, &methods, name, "getter"))
                .transpose()?;
            let setter = spec
                .setter
                .as_deref()
                .map(|name| find_method(&ty, &methods, name, "setter"))
                .transpose()?;
            let field = spec
                .field
                .as_deref()
                .map(|name| {
                    fields.iter().find(|f| f.name() == name).cloned().ok_or_else(|| {
                        unknown_member(&ty, name, "field", fields.iter().map(|f| f.name()))
                    })
                })
                .transpose()?;

            properties.push(Arc::new(PropertyDescriptor {
                declaring: ty.clone(),
                name: spec.name,
                ty: spec.ty,
                getter,
                setter,
                field,
            }));
        }

        Ok(Arc::new(ClassDescriptor {
            ty,
            supertype: self.supertype,
            ctors,
            methods,
            fields,
            properties,
        }))
    }
}

fn find_method(
    ty: &TypeRef,
    methods: &[Arc<MethodDescriptor>],
    name: &str,
    kind: &'static str,
) -> Result<Arc<MethodDescriptor>> {
    methods
        .iter()
        .find(|m| m.name() == name)
        .cloned()
        .ok_or_else(|| unknown_member(ty, name, kind, methods.iter().map(|m| m.name())))
}

pub(crate) fn unknown_member<'a>(
    ty: &TypeRef,
    name: &str,
    kind: &'static str,
    available: impl Iterator<Item = &'a str>,
) -> ResolveError {
    let available: Vec<&str> = available.collect();
    ResolveError::UnknownMember(UnknownMemberError {
        type_name: ty.name().to_string(),
        member: name.to_string(),
        kind,
        suggestions: tarkib_support::rendering::suggest_similar(name, &available, 3),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Arc<ClassDescriptor> {
        ClassDescriptor::builder("app::Base")
            .method(MethodDescriptor::new("start"))
            .method(MethodDescriptor::new("stop"))
            .field_property("name", TypeRef::of("String"), &[])
            .build()
            .unwrap()
    }

    #[test]
    fn hierarchy_walks_most_derived_first() {
        let middle = ClassDescriptor::builder("app::Middle")
            .extends(base())
            .build()
            .unwrap();
        let leaf = ClassDescriptor::builder("app::Leaf")
            .extends(middle)
            .build()
            .unwrap();

        let names: Vec<&str> = leaf.hierarchy().map(ClassDescriptor::name).collect();
        assert_eq!(names, vec!["app::Leaf", "app::Middle", "app::Base"]);
    }

    #[test]
    fn overridden_method_reported_once() {
        let leaf = ClassDescriptor::builder("app::Leaf")
            .extends(base())
            .method(MethodDescriptor::new("stop").marker(Marker::destroy()))
            .build()
            .unwrap();

        let methods = leaf.all_methods();
        let names: Vec<&str> = methods.iter().map(|m| m.name()).collect();
        assert_eq!(names, vec!["stop", "start"]);
        assert_eq!(methods[0].declaring().name(), "app::Leaf");
        assert!(methods[0].markers().has_destroy());
    }

    #[test]
    fn overload_is_not_override() {
        let leaf = ClassDescriptor::builder("app::Leaf")
            .extends(base())
            .method(MethodDescriptor::new("start").param(ParamDescriptor::new(TypeRef::of("u32"))))
            .build()
            .unwrap();

        assert_eq!(leaf.all_methods().len(), 3);
    }

    #[test]
    fn declaring_type_is_filled_in() {
        let class = ClassDescriptor::builder("app::Svc")
            .ctor(CtorDescriptor::new())
            .method(MethodDescriptor::new("run"))
            .build()
            .unwrap();

        assert_eq!(class.constructors()[0].declaring().name(), "app::Svc");
        assert_eq!(class.declared_methods()[0].declaring().name(), "app::Svc");
    }

    #[test]
    fn property_with_unknown_setter_fails() {
        let result = ClassDescriptor::builder("app::Svc")
            .method(MethodDescriptor::new("set_repository"))
            .property("repo", TypeRef::of("app::Repo"), None, Some("set_repositroy"), None)
            .build();

        match result {
            Err(ResolveError::UnknownMember(err)) => {
                assert_eq!(err.kind, "setter");
                assert_eq!(err.suggestions, vec!["set_repository".to_string()]);
            }
            other => panic!("Expected UnknownMember, got: {other:?}"),
        }
    }

    #[test]
    fn property_markers_prefer_setter() {
        let class = ClassDescriptor::builder("app::Svc")
            .field(
                FieldDescriptor::new("repo", TypeRef::of("app::Repo"))
                    .marker(Marker::inject_named("fromField")),
            )
            .method(
                MethodDescriptor::new("set_repo")
                    .param(ParamDescriptor::new(TypeRef::of("app::Repo")))
                    .marker(Marker::inject_named("fromSetter")),
            )
            .property("repo", TypeRef::of("app::Repo"), None, Some("set_repo"), Some("repo"))
            .build()
            .unwrap();

        let property = class.find_property("repo").unwrap();
        assert_eq!(property.inject_marker().map(|m| m.value.as_str()), Some("fromSetter"));
    }

    #[test]
    fn getter_only_property_is_read_only() {
        let class = ClassDescriptor::builder("app::Svc")
            .getter_property("status", TypeRef::of("String"))
            .build()
            .unwrap();

        assert!(!class.find_property("status").unwrap().is_writable());
    }

    #[test]
    fn declared_names_discovery() {
        let method = MethodDescriptor::new("configure")
            .param(ParamDescriptor::named("pool", TypeRef::of("app::Pool")))
            .param(ParamDescriptor::new(TypeRef::of("app::Cache")));

        let names = DeclaredNames;
        assert_eq!(names.parameter_name(Executable::from(&method), 0), Some("pool".to_string()));
        assert_eq!(names.parameter_name(Executable::from(&method), 1), None);
        assert_eq!(names.parameter_name(Executable::from(&method), 5), None);
    }

    #[test]
    fn ctor_signature() {
        let ctor = CtorDescriptor::new()
            .param(ParamDescriptor::new(TypeRef::of("app::A")))
            .param(ParamDescriptor::new(TypeRef::of("app::B")));
        assert_eq!(ctor.signature(), "new(app::A, app::B)");
        assert_eq!(Executable::from(&ctor).name(), "new(app::A, app::B)");
    }
}
