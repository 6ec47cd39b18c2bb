//! Declarative markers attached to declarations.
//!
//! A marker is the wiring intent a declaration carries: "inject here",
//! "this method is a provider", "call this after construction". The
//! resolvers only ask whether a declaration carries a given marker and
//! with what value; how markers get attached is up to whoever builds the
//! descriptors.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Moment at which an init method should be invoked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InitInvocation {
    /// Right after the instance is constructed, before any wiring.
    PostConstruct,
    /// After constructor, property and method injection.
    PostDefine,
    /// After the instance is fully wired and registered.
    #[default]
    PostInitialize,
}

impl fmt::Display for InitInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InitInvocation::PostConstruct => write!(f, "post-construct"),
            InitInvocation::PostDefine => write!(f, "post-define"),
            InitInvocation::PostInitialize => write!(f, "post-initialize"),
        }
    }
}

/// "Inject here", optionally with reference names.
///
/// On a constructor or method the value is a comma-separated list, one
/// entry per parameter. On a parameter, field or setter it is a single
/// name. A blank value means "use the defaults".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InjectMarker {
    pub value: String,
}

/// Marks a factory method that produces a named object on demand.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderMarker {
    /// Explicit provider name; blank means "derive from the method name".
    pub value: String,
}

/// Marks a zero-argument method to run after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitMarker {
    pub order: i32,
    /// `true` to run on every wiring, `false` to run only once per instance.
    pub invoke_always: bool,
    pub invocation: InitInvocation,
}

impl Default for InitMarker {
    fn default() -> Self {
        Self {
            order: 0,
            invoke_always: true,
            invocation: InitInvocation::default(),
        }
    }
}

/// A single marker on a declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Marker {
    Inject(InjectMarker),
    Provider(ProviderMarker),
    Init(InitMarker),
    Destroy,
}

impl Marker {
    /// Inject marker without explicit references.
    pub fn inject() -> Self {
        Marker::Inject(InjectMarker::default())
    }

    /// Inject marker with the given reference value.
    pub fn inject_named(value: impl Into<String>) -> Self {
        Marker::Inject(InjectMarker { value: value.into() })
    }

    /// Provider marker; pass an empty string to derive the name.
    pub fn provider(value: impl Into<String>) -> Self {
        Marker::Provider(ProviderMarker { value: value.into() })
    }

    /// Init marker with the given order key and default invocation.
    pub fn init(order: i32) -> Self {
        Marker::Init(InitMarker {
            order,
            ..InitMarker::default()
        })
    }

    pub fn destroy() -> Self {
        Marker::Destroy
    }
}

/// The set of markers carried by one declaration.
///
/// Only the first marker of each kind is consulted.
///
/// # Examples
/// ```
/// use tarkib_resolver::marker::{Marker, Markers};
///
/// let markers = Markers::from(vec![Marker::inject_named("primaryDb")]);
/// assert_eq!(markers.inject().map(|m| m.value.as_str()), Some("primaryDb"));
/// assert!(markers.provider().is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Markers(Vec<Marker>);

impl Markers {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, marker: Marker) {
        self.0.push(marker);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn inject(&self) -> Option<&InjectMarker> {
        self.0.iter().find_map(|m| match m {
            Marker::Inject(inject) => Some(inject),
            _ => None,
        })
    }

    pub fn provider(&self) -> Option<&ProviderMarker> {
        self.0.iter().find_map(|m| match m {
            Marker::Provider(provider) => Some(provider),
            _ => None,
        })
    }

    pub fn init(&self) -> Option<&InitMarker> {
        self.0.iter().find_map(|m| match m {
            Marker::Init(init) => Some(init),
            _ => None,
        })
    }

    pub fn has_destroy(&self) -> bool {
        self.0.iter().any(|m| matches!(m, Marker::Destroy))
    }
}

impl From<Vec<Marker>> for Markers {
    fn from(markers: Vec<Marker>) -> Self {
        Self(markers)
    }
}

impl FromIterator<Marker> for Markers {
    fn from_iter<I: IntoIterator<Item = Marker>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
