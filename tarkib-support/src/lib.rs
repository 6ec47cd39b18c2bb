//! # Tarkib Support
//!
//! Shared utilities for the Tarkib wiring engine.
//!
//! This crate provides:
//! - Name derivation helpers used when synthesizing bean references
//! - Text rendering for error messages

pub mod naming;
pub mod rendering;
