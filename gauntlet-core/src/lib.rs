//! Core functionality for Gauntlet property-based testing.
//!
//! This crate provides the fundamental building blocks for property-based testing
//! with Gauntlet: a splittable rng, size-scaled generators, lazily shrinking
//! example spaces, the check state machine and replayable counterexamples.

pub mod check;
pub mod data;
pub mod error;
pub mod example_space;
pub mod gen;
pub mod property;
pub mod registry;
pub mod replay;
pub mod rng;
pub mod scaling;
pub mod shrink;
pub mod weighted;

// Re-export the main types
pub use check::{
    check, CheckMachine, CheckResult, Counterexample, ResizeStrategy, TerminationReason, Verdict,
};
pub use data::*;
pub use error::*;
pub use example_space::{Example, ExampleSpace, Exploration, Explorer};
pub use gen::*;
pub use property::*;
pub use registry::{GenRegistry, Resolver};
pub use replay::Replay;
pub use rng::{Integer, Rng};
pub use scaling::Bias;
pub use weighted::WeightedList;
