//! Bean references and the resolver that computes them.
//!
//! A [`BeanReferences`] is the ordered list of names a registry tries,
//! one after another, to find a dependency. [`ReferenceResolver`] turns
//! explicit values, inject markers and the configured
//! [`LookupStrategy`] order into one reference per parameter.

use std::fmt;
use std::sync::Arc;

use tarkib_support::naming::split_csv;
use tracing::trace;

use crate::config::ResolverConfig;
use crate::error::{ArityMismatchError, PartialDeclarationError, ResolveError, Result};
use crate::introspect::{DeclaredNames, Executable, NameDiscovery, PropertyDescriptor};
use crate::strategy::LookupStrategy;

/// Ordered candidate names for one dependency.
///
/// Entries may be empty: a lookup strategy that cannot produce a name,
/// or a duplicate removed by [`remove_duplicate_names`](Self::remove_duplicate_names),
/// leaves a gap so positions stay aligned with the strategy order.
///
/// # Examples
/// ```
/// use tarkib_resolver::references::BeanReferences;
///
/// let refs = BeanReferences::from_names(vec![
///     Some("string".into()),
///     Some("string".into()),
///     Some("java.lang.String".into()),
/// ])
/// .remove_duplicate_names();
///
/// assert_eq!(refs.len(), 3);
/// assert_eq!(refs.name(0), Some("string"));
/// assert_eq!(refs.name(1), None);
/// assert_eq!(refs.candidates().collect::<Vec<_>>(), vec!["string", "java.lang.String"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BeanReferences {
    names: Vec<Option<String>>,
}

impl BeanReferences {
    /// A reference with exactly one name.
    pub fn of(name: impl Into<String>) -> Self {
        Self {
            names: vec![Some(name.into())],
        }
    }

    /// A reference from positional entries.
    pub fn from_names(names: Vec<Option<String>>) -> Self {
        Self { names }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// The entry at `index`, or `None` for a gap or out-of-range index.
    pub fn name(&self, index: usize) -> Option<&str> {
        self.names.get(index).and_then(|n| n.as_deref())
    }

    /// All positional entries, gaps included.
    pub fn names(&self) -> impl Iterator<Item = Option<&str>> {
        self.names.iter().map(|n| n.as_deref())
    }

    /// Non-empty entries, in lookup order.
    pub fn candidates(&self) -> impl Iterator<Item = &str> {
        self.names.iter().filter_map(|n| n.as_deref())
    }

    /// Clears every entry that repeats an earlier one.
    ///
    /// Comparison is case-sensitive and the first occurrence wins.
    /// Cleared entries become gaps; nothing is re-packed.
    pub fn remove_duplicate_names(mut self) -> Self {
        for i in 1..self.names.len() {
            let Some(current) = self.names[i].as_deref() else {
                continue;
            };
            let repeated = self.names[..i]
                .iter()
                .any(|earlier| earlier.as_deref() == Some(current));
            if repeated {
                self.names[i] = None;
            }
        }
        self
    }
}

impl fmt::Display for BeanReferences {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<&str> = self.names().map(|n| n.unwrap_or("-")).collect();
        write!(f, "[{}]", rendered.join(", "))
    }
}

/// Computes bean references for constructors, methods and properties.
///
/// Stateless apart from the lookup strategy order and the optional
/// name discovery service it was built with.
#[derive(Clone)]
pub struct ReferenceResolver {
    lookup: Vec<LookupStrategy>,
    names: Option<Arc<dyn NameDiscovery>>,
}

impl ReferenceResolver {
    pub fn new(lookup: Vec<LookupStrategy>, names: Option<Arc<dyn NameDiscovery>>) -> Self {
        Self { lookup, names }
    }

    /// Builds a resolver from configuration, reading parameter names
    /// from the descriptors when `use_param_names` is set.
    pub fn from_config(config: &ResolverConfig) -> Self {
        let names: Option<Arc<dyn NameDiscovery>> = if config.use_param_names {
            Some(Arc::new(DeclaredNames))
        } else {
            None
        };
        Self::new(config.lookup.clone(), names)
    }

    pub fn lookup(&self) -> &[LookupStrategy] {
        &self.lookup
    }

    /// Resolves one reference per parameter of `member`.
    ///
    /// Non-empty explicit values win; otherwise inject markers on the
    /// member and its parameters are read; otherwise every parameter
    /// gets its default reference.
    ///
    /// # Errors
    /// - [`ResolveError::PartialDeclaration`] — only some parameters marked
    /// - [`ResolveError::ArityMismatch`] — references and parameters differ in count
    pub fn resolve(
        &self,
        member: Executable<'_>,
        explicit: Option<&[&str]>,
    ) -> Result<Vec<BeanReferences>> {
        if let Some(values) = explicit.filter(|values| !values.is_empty()) {
            trace!(member = %member.name(), "Using explicit references");
            return self.resolve_from_values(member, values);
        }

        match self.read_from_markers(member)? {
            Some(references) => Ok(references),
            None => self.resolve_from_values(member, &[]),
        }
    }

    /// Converts explicit values into references, one per parameter.
    /// No values at all means defaults everywhere; a blank value means
    /// the default for that position.
    pub fn resolve_from_values(
        &self,
        member: Executable<'_>,
        values: &[&str],
    ) -> Result<Vec<BeanReferences>> {
        let declared: Vec<Option<BeanReferences>> = if values.is_empty() {
            vec![None; member.params().len()]
        } else {
            values.iter().map(|value| explicit_reference(value)).collect()
        };
        self.complete(member, declared)
    }

    /// Reads references from inject markers, filling gaps with defaults.
    ///
    /// Returns `Ok(None)` when neither the member nor any parameter is
    /// marked.
    pub fn read_from_markers(
        &self,
        member: Executable<'_>,
    ) -> Result<Option<Vec<BeanReferences>>> {
        match self.read_declared(member)? {
            Some(declared) => self.complete(member, declared).map(Some),
            None => Ok(None),
        }
    }

    /// Reads what the markers declare, without synthesizing defaults.
    ///
    /// Each position is `None` where nothing names the dependency.
    pub fn read_declared(
        &self,
        member: Executable<'_>,
    ) -> Result<Option<Vec<Option<BeanReferences>>>> {
        let params = member.params();
        let member_marker = member.markers().inject();

        let mut declared: Vec<Option<BeanReferences>> = match member_marker {
            Some(marker) => {
                let values = split_csv(&marker.value);
                if values.is_empty() {
                    vec![None; params.len()]
                } else {
                    if values.len() != params.len() {
                        return Err(arity_mismatch(member, values.len()));
                    }
                    values.into_iter().map(explicit_reference).collect()
                }
            }
            None => vec![None; params.len()],
        };

        let mut marked = 0;
        for (index, param) in params.iter().enumerate() {
            let Some(marker) = param.markers().inject() else {
                continue;
            };
            marked += 1;
            if let Some(reference) = explicit_reference(&marker.value) {
                declared[index] = Some(reference);
            }
        }

        if member_marker.is_none() {
            if marked == 0 {
                return Ok(None);
            }
            if marked != params.len() {
                return Err(ResolveError::PartialDeclaration(PartialDeclarationError {
                    type_name: member.declaring().name().to_string(),
                    member: member.name(),
                    marked,
                    parameters: params.len(),
                }));
            }
        }

        Ok(Some(declared))
    }

    /// Reads the inject marker of a property (setter first, then field).
    ///
    /// A blank marker value yields the default property reference.
    /// Returns `None` when the property is not marked.
    pub fn read_property_marker(&self, property: &PropertyDescriptor) -> Option<BeanReferences> {
        let marker = property.inject_marker()?;
        Some(self.resolve_property_value(property, Some(&marker.value)))
    }

    /// An explicit single name, or the default property reference when
    /// the value is missing or blank.
    pub fn resolve_property_value(
        &self,
        property: &PropertyDescriptor,
        value: Option<&str>,
    ) -> BeanReferences {
        value
            .and_then(explicit_reference)
            .unwrap_or_else(|| self.default_property_reference(property))
            .remove_duplicate_names()
    }

    /// Default reference for a property, treated as a single parameter
    /// named after the property.
    pub fn default_property_reference(&self, property: &PropertyDescriptor) -> BeanReferences {
        let names = self
            .lookup
            .iter()
            .map(|strategy| match strategy {
                LookupStrategy::Name => Some(property.name().to_string()),
                LookupStrategy::TypeShortName => Some(property.ty().short_reference()),
                LookupStrategy::TypeFullName => Some(property.ty().name().to_string()),
            })
            .collect();
        BeanReferences::from_names(names)
    }

    /// Default reference for the parameter at `index`.
    pub fn default_parameter_reference(
        &self,
        member: Executable<'_>,
        index: usize,
    ) -> BeanReferences {
        let param = &member.params()[index];
        let names = self
            .lookup
            .iter()
            .map(|strategy| match strategy {
                LookupStrategy::Name => self
                    .names
                    .as_ref()
                    .and_then(|names| names.parameter_name(member, index)),
                LookupStrategy::TypeShortName => Some(param.ty().short_reference()),
                LookupStrategy::TypeFullName => Some(param.ty().name().to_string()),
            })
            .collect();
        BeanReferences::from_names(names)
    }

    fn complete(
        &self,
        member: Executable<'_>,
        declared: Vec<Option<BeanReferences>>,
    ) -> Result<Vec<BeanReferences>> {
        if declared.len() != member.params().len() {
            return Err(arity_mismatch(member, declared.len()));
        }

        Ok(declared
            .into_iter()
            .enumerate()
            .map(|(index, reference)| {
                reference
                    .unwrap_or_else(|| self.default_parameter_reference(member, index))
                    .remove_duplicate_names()
            })
            .collect())
    }
}

impl fmt::Debug for ReferenceResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReferenceResolver")
            .field("lookup", &self.lookup)
            .field("name_discovery", &self.names.is_some())
            .finish()
    }
}

fn explicit_reference(value: &str) -> Option<BeanReferences> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(BeanReferences::of(value))
    }
}

pub(crate) fn arity_mismatch(member: Executable<'_>, references: usize) -> ResolveError {
    ResolveError::ArityMismatch(ArityMismatchError {
        type_name: member.declaring().name().to_string(),
        member: member.name(),
        parameters: member.params().len(),
        references,
    })
}
