//! Lookup strategies for default bean references.
//!
//! When nothing names a dependency explicitly, a default reference is
//! synthesized by applying every configured strategy in order:
//! - [`LookupStrategy::Name`] — the parameter's source name
//! - [`LookupStrategy::TypeShortName`] — uncapitalized simple type name
//! - [`LookupStrategy::TypeFullName`] — fully qualified type name
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A naming rule used to synthesize one candidate of a default reference.
///
/// # Examples
/// ```
/// use tarkib_resolver::strategy::LookupStrategy;
///
/// let strategy: LookupStrategy = "type-short-name".parse().unwrap();
/// assert_eq!(strategy, LookupStrategy::TypeShortName);
/// assert_eq!(strategy.to_string(), "type-short-name");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LookupStrategy {
    /// The declared source name of the parameter or property.
    ///
    /// For parameters it is only available when a name discovery service
    /// can supply it; otherwise the candidate stays empty.
    Name,

    /// The simple type name with its first letter lowercased,
    /// e.g. `userRepo` for `app::UserRepo`.
    TypeShortName,

    /// The fully qualified type name, e.g. `app::UserRepo`.
    TypeFullName,
}

impl LookupStrategy {
    /// The strategy order used when nothing else is configured.
    pub const DEFAULT: [LookupStrategy; 3] = [
        LookupStrategy::Name,
        LookupStrategy::TypeShortName,
        LookupStrategy::TypeFullName,
    ];

    /// Returns `true` if this strategy depends on source names.
    #[inline]
    pub fn needs_name(&self) -> bool {
        matches!(self, LookupStrategy::Name)
    }
}

impl fmt::Display for LookupStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupStrategy::Name => write!(f, "name"),
            LookupStrategy::TypeShortName => write!(f, "type-short-name"),
            LookupStrategy::TypeFullName => write!(f, "type-full-name"),
        }
    }
}

impl FromStr for LookupStrategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "name" => Ok(LookupStrategy::Name),
            "type-short-name" => Ok(LookupStrategy::TypeShortName),
            "type-full-name" => Ok(LookupStrategy::TypeFullName),
            other => Err(format!("Invalid lookup strategy: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_order() {
        assert_eq!(
            LookupStrategy::DEFAULT,
            [
                LookupStrategy::Name,
                LookupStrategy::TypeShortName,
                LookupStrategy::TypeFullName
            ]
        );
    }

    #[test]
    fn parse_accepts_screaming_case() {
        assert_eq!(
            "TYPE_FULL_NAME".parse::<LookupStrategy>(),
            Ok(LookupStrategy::TypeFullName)
        );
    }

    #[test]
    fn parse_rejects_unknown() {
        assert!("alias".parse::<LookupStrategy>().is_err());
    }

    #[test]
    fn only_name_needs_names() {
        assert!(LookupStrategy::Name.needs_name());
        assert!(!LookupStrategy::TypeFullName.needs_name());
    }
}
