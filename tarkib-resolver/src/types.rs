//! Type identification.
//!
//! [`TypeRef`] names a type the way the introspection facility reports
//! it: a fully qualified name plus whether the type is a collection.

use std::any::type_name;
use std::fmt;

use tarkib_support::naming::{simple_type_name, uncapitalize};

/// Shape of a described type, as far as wiring is concerned.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// A single value.
    Plain,
    /// A multi-valued container, optionally with a known element type.
    Collection { element: Option<Box<TypeRef>> },
}

/// Identifies a type inside descriptors and injection points.
///
/// # Examples
/// ```
/// use tarkib_resolver::types::TypeRef;
///
/// let ty = TypeRef::of("app::repo::UserRepo");
/// assert_eq!(ty.simple_name(), "UserRepo");
/// assert_eq!(ty.short_reference(), "userRepo");
/// assert!(!ty.is_collection());
///
/// let list = TypeRef::collection("Vec<app::Plugin>", Some(TypeRef::of("app::Plugin")));
/// assert!(list.is_collection());
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct TypeRef {
    name: String,
    kind: TypeKind,
}

impl TypeRef {
    /// Creates a plain type reference from its fully qualified name.
    pub fn of(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: TypeKind::Plain,
        }
    }

    /// Creates a plain type reference for the Rust type `T`.
    ///
    /// ```
    /// use tarkib_resolver::types::TypeRef;
    ///
    /// let ty = TypeRef::of_type::<String>();
    /// assert_eq!(ty.name(), "alloc::string::String");
    /// assert_eq!(ty.short_reference(), "string");
    /// ```
    #[inline]
    pub fn of_type<T: ?Sized + 'static>() -> Self {
        Self::of(type_name::<T>())
    }

    /// Creates a collection type reference.
    pub fn collection(name: impl Into<String>, element: Option<TypeRef>) -> Self {
        Self {
            name: name.into(),
            kind: TypeKind::Collection {
                element: element.map(Box::new),
            },
        }
    }

    /// Returns the fully qualified name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the kind of this type.
    #[inline]
    pub fn kind(&self) -> &TypeKind {
        &self.kind
    }

    /// Returns the simple (unqualified, non-generic) name.
    pub fn simple_name(&self) -> &str {
        simple_type_name(&self.name)
    }

    /// Returns the uncapitalized simple name, as used by
    /// [`LookupStrategy::TypeShortName`](crate::strategy::LookupStrategy::TypeShortName).
    pub fn short_reference(&self) -> String {
        uncapitalize(self.simple_name())
    }

    /// Returns `true` for collection types.
    #[inline]
    pub fn is_collection(&self) -> bool {
        matches!(self.kind, TypeKind::Collection { .. })
    }

    /// Returns the element type of a collection, when known.
    pub fn element(&self) -> Option<&TypeRef> {
        match &self.kind {
            TypeKind::Collection { element } => element.as_deref(),
            TypeKind::Plain => None,
        }
    }
}

impl fmt::Debug for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            TypeKind::Plain => write!(f, "TypeRef({})", self.name),
            TypeKind::Collection { element: Some(el) } => {
                write!(f, "TypeRef({}, collection of {})", self.name, el.name)
            }
            TypeKind::Collection { element: None } => {
                write!(f, "TypeRef({}, collection)", self.name)
            }
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MyStruct;

    #[test]
    fn type_of_rust_type() {
        let ty = TypeRef::of_type::<MyStruct>();
        assert!(ty.name().contains("MyStruct"));
        assert_eq!(ty.simple_name(), "MyStruct");
        assert_eq!(ty.short_reference(), "myStruct");
    }

    #[test]
    fn equality_respects_kind() {
        assert_eq!(TypeRef::of("a::B"), TypeRef::of("a::B"));
        assert_ne!(TypeRef::of("a::B"), TypeRef::collection("a::B", None));
    }

    #[test]
    fn collection_element() {
        let ty = TypeRef::collection("Vec<a::B>", Some(TypeRef::of("a::B")));
        assert_eq!(ty.element().map(TypeRef::name), Some("a::B"));
        assert_eq!(TypeRef::of("a::B").element(), None);
    }

    #[test]
    fn java_style_names() {
        let ty = TypeRef::of("java.lang.Integer");
        assert_eq!(ty.short_reference(), "integer");
    }

    #[test]
    fn debug_output() {
        let ty = TypeRef::collection("Vec<a::B>", Some(TypeRef::of("a::B")));
        assert_eq!(format!("{ty:?}"), "TypeRef(Vec<a::B>, collection of a::B)");
        assert_eq!(format!("{}", TypeRef::of("a::B")), "a::B");
    }

    #[test]
    fn usable_as_map_key() {
        use std::collections::HashMap;
        let mut map = HashMap::new();
        map.insert(TypeRef::of("a::B"), 1);
        assert_eq!(map.get(&TypeRef::of("a::B")), Some(&1));
    }
}
