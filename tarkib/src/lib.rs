//! # Tarkib — injection point resolution for dependency injection containers
//!
//! Describe your types once, then ask Tarkib how each of them should be
//! constructed and wired. See [`Engine`] for the entry point and
//! [`prelude`] for the everyday imports.

pub use tarkib_resolver::*;
pub use tarkib_support::{naming, rendering};
