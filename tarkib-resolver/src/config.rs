//! Resolver configuration.
//!
//! Decodable from any serde format; missing keys fall back to defaults.
//!
//! ```
//! use tarkib_resolver::config::ResolverConfig;
//! use tarkib_resolver::strategy::LookupStrategy;
//!
//! let config = ResolverConfig::default();
//! assert_eq!(config.lookup, LookupStrategy::DEFAULT.to_vec());
//! assert!(!config.autowire);
//! assert!(config.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{ResolveError, Result};
use crate::strategy::LookupStrategy;

/// Knobs shared by every resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ResolverConfig {
    /// Strategies applied, in order, to build default references.
    pub lookup: Vec<LookupStrategy>,
    /// Read parameter names from descriptors for the `name` strategy.
    pub use_param_names: bool,
    /// Wire unmarked writable properties and collections.
    pub autowire: bool,
    /// Scan constructor markers; when off, only the fallback rules apply.
    pub use_markers: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            lookup: LookupStrategy::DEFAULT.to_vec(),
            use_param_names: true,
            autowire: false,
            use_markers: true,
        }
    }
}

impl ResolverConfig {
    /// # Errors
    /// [`ResolveError::InvalidConfig`] when no lookup strategy is set,
    /// since default references could then never name anything.
    pub fn validate(&self) -> Result<()> {
        if self.lookup.is_empty() {
            return Err(ResolveError::InvalidConfig(
                "at least one lookup strategy is required".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_partial_document() {
        let config: ResolverConfig =
            serde_json::from_str(r#"{ "autowire": true, "lookup": ["type-full-name"] }"#).unwrap();

        assert!(config.autowire);
        assert!(config.use_markers);
        assert!(config.use_param_names);
        assert_eq!(config.lookup, vec![LookupStrategy::TypeFullName]);
    }

    #[test]
    fn empty_document_is_default() {
        let config: ResolverConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ResolverConfig::default());
    }

    #[test]
    fn unknown_strategy_rejected() {
        let result = serde_json::from_str::<ResolverConfig>(r#"{ "lookup": ["alias"] }"#);
        assert!(result.is_err());
    }

    #[test]
    fn empty_lookup_is_invalid() {
        let config = ResolverConfig {
            lookup: vec![],
            ..ResolverConfig::default()
        };
        match config.validate() {
            Err(ResolveError::InvalidConfig(msg)) => assert!(msg.contains("lookup")),
            other => panic!("Expected InvalidConfig, got: {other:?}"),
        }
    }
}
