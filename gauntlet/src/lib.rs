//! Gauntlet property-based testing library.
//!
//! This is the main entry point for the Gauntlet library, providing
//! a convenient API for property-based testing in Rust.

pub use gauntlet_core::*;
