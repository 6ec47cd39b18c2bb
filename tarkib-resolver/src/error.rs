//! Error types for wiring resolution.
//!
//! Every error names the type being resolved and the offending member,
//! rendered as `Type#member`, plus a hint on how to fix the declaration.
//! Resolution is a configuration-time activity, so all of these are
//! raised immediately and never retried.

use std::fmt;

use tarkib_support::rendering::render_member;

/// Main error type for all resolution operations.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// More than one constructor is marked for injection.
    #[error("{}", .0)]
    AmbiguousConstructor(AmbiguousConstructorError),

    /// Some but not all parameters carry a reference, and the member
    /// itself carries none.
    #[error("{}", .0)]
    PartialDeclaration(PartialDeclarationError),

    /// Number of references differs from the number of parameters.
    #[error("{}", .0)]
    ArityMismatch(ArityMismatchError),

    /// An init or destroy method declares parameters.
    #[error("{}", .0)]
    IllegalLifecycleSignature(LifecycleSignatureError),

    /// The requested type is not known to the introspection facility.
    #[error("{}", .0)]
    UnknownType(UnknownTypeError),

    /// A member named in an explicit definition does not exist.
    #[error("{}", .0)]
    UnknownMember(UnknownMemberError),

    /// An explicit definition matches more than one member.
    #[error(
        "{count} suitable candidates found for {}: specify parameter types",
        render_member(.type_name, .member)
    )]
    MultipleCandidates {
        type_name: String,
        member: String,
        count: usize,
    },

    /// A type description was already registered.
    #[error("{}", .0)]
    AlreadyRegistered(AlreadyRegisteredError),

    /// The resolver configuration is unusable.
    #[error("Invalid resolver configuration: {0}")]
    InvalidConfig(String),
}

/// Error when two or more constructors are marked for injection.
#[derive(Debug)]
pub struct AmbiguousConstructorError {
    pub type_name: String,
    /// Signatures of the marked constructors, in declaration order.
    pub candidates: Vec<String>,
}

impl fmt::Display for AmbiguousConstructorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Two or more constructors are marked as injection points in {}",
            self.type_name
        )?;
        for candidate in &self.candidates {
            write!(f, "\n    - {candidate}")?;
        }
        write!(f, "\n  Hint: Keep the inject marker on exactly one constructor")
    }
}

/// Error when only some parameters of an unmarked member are marked.
#[derive(Debug)]
pub struct PartialDeclarationError {
    pub type_name: String,
    pub member: String,
    pub marked: usize,
    pub parameters: usize,
}

impl fmt::Display for PartialDeclarationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "All parameters of {} must carry an inject marker ({} of {} do)",
            render_member(&self.type_name, &self.member),
            self.marked,
            self.parameters,
        )?;
        write!(
            f,
            "\n  Hint: Mark the remaining parameters, or mark the member itself"
        )
    }
}

/// Error when references and parameters do not line up.
#[derive(Debug)]
pub struct ArityMismatchError {
    pub type_name: String,
    pub member: String,
    pub parameters: usize,
    pub references: usize,
}

impl fmt::Display for ArityMismatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Different number of parameters and references for {}: {} parameter(s), {} reference(s)",
            render_member(&self.type_name, &self.member),
            self.parameters,
            self.references,
        )?;
        write!(f, "\n  Hint: Declare exactly one reference per parameter")
    }
}

/// Which lifecycle callback was misdeclared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleKind {
    Init,
    Destroy,
}

impl fmt::Display for LifecycleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecycleKind::Init => write!(f, "init"),
            LifecycleKind::Destroy => write!(f, "destroy"),
        }
    }
}

/// Error when a lifecycle method declares parameters.
#[derive(Debug)]
pub struct LifecycleSignatureError {
    pub type_name: String,
    pub method: String,
    pub kind: LifecycleKind,
    pub parameters: usize,
}

impl fmt::Display for LifecycleSignatureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Arguments are not allowed for {} method {} (found {})",
            self.kind,
            render_member(&self.type_name, &self.method),
            self.parameters,
        )?;
        write!(f, "\n  Hint: Lifecycle methods must take no arguments")
    }
}

/// Error when a type description cannot be found.
#[derive(Debug)]
pub struct UnknownTypeError {
    pub requested: String,
    /// Similar names that ARE registered.
    pub suggestions: Vec<String>,
}

impl fmt::Display for UnknownTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Type not described: {}", self.requested)?;

        if !self.suggestions.is_empty() {
            write!(f, "\n  Did you mean one of:")?;
            for suggestion in &self.suggestions {
                write!(f, "\n    - {suggestion}")?;
            }
        }

        write!(
            f,
            "\n  Hint: Did you forget to register a descriptor for {}?",
            self.requested
        )
    }
}

/// Error when an explicitly named member does not exist.
#[derive(Debug)]
pub struct UnknownMemberError {
    pub type_name: String,
    pub member: String,
    /// What was looked up: "constructor", "property", "method", ...
    pub kind: &'static str,
    pub suggestions: Vec<String>,
}

impl fmt::Display for UnknownMemberError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} not found: {}",
            capitalized(self.kind),
            render_member(&self.type_name, &self.member)
        )?;

        if !self.suggestions.is_empty() {
            write!(f, "\n  Did you mean one of:")?;
            for suggestion in &self.suggestions {
                write!(f, "\n    - {suggestion}")?;
            }
        }
        Ok(())
    }
}

fn capitalized(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Error when registering a type description twice.
#[derive(Debug)]
pub struct AlreadyRegisteredError {
    pub type_name: String,
}

impl fmt::Display for AlreadyRegisteredError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Type already described: {}", self.type_name)?;
        write!(
            f,
            "\n  Hint: Enable allow_override to replace an existing description"
        )
    }
}

/// Convenient Result type for resolution operations.
pub type Result<T> = std::result::Result<T, ResolveError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ambiguous_constructor_display() {
        let err = ResolveError::AmbiguousConstructor(AmbiguousConstructorError {
            type_name: "app::Engine".into(),
            candidates: vec!["new(app::A)".into(), "new(app::B)".into()],
        });

        let msg = format!("{err}");
        assert!(msg.contains("Two or more constructors"));
        assert!(msg.contains("app::Engine"));
        assert!(msg.contains("new(app::B)"));
    }

    #[test]
    fn partial_declaration_display() {
        let err = ResolveError::PartialDeclaration(PartialDeclarationError {
            type_name: "app::Engine".into(),
            member: "configure".into(),
            marked: 1,
            parameters: 2,
        });

        let msg = format!("{err}");
        assert!(msg.contains("app::Engine#configure"));
        assert!(msg.contains("1 of 2"));
    }

    #[test]
    fn lifecycle_signature_display() {
        let err = ResolveError::IllegalLifecycleSignature(LifecycleSignatureError {
            type_name: "app::Engine".into(),
            method: "start".into(),
            kind: LifecycleKind::Init,
            parameters: 1,
        });

        let msg = format!("{err}");
        assert!(msg.contains("init method app::Engine#start"));
    }

    #[test]
    fn unknown_member_display() {
        let err = ResolveError::UnknownMember(UnknownMemberError {
            type_name: "app::Engine".into(),
            member: "strat".into(),
            kind: "method",
            suggestions: vec!["start".into()],
        });

        let msg = format!("{err}");
        assert!(msg.starts_with("Method not found: app::Engine#strat"));
        assert!(msg.contains("- start"));
    }

    #[test]
    fn multiple_candidates_display() {
        let err = ResolveError::MultipleCandidates {
            type_name: "app::Engine".into(),
            member: "new".into(),
            count: 3,
        };

        assert!(format!("{err}").starts_with("3 suitable candidates found for app::Engine#new"));
    }
}
