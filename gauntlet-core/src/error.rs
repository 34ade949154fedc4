//! Error types for Gauntlet property-based testing.

use thiserror::Error;

/// Main error type for Gauntlet.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GauntletError {
    /// A draw or generator was asked for a range whose minimum exceeds its maximum.
    #[error("Invalid range: 'min' ({min}) cannot be greater than 'max' ({max})")]
    InvalidRange { min: String, max: String },

    /// A generator's internal invariant was violated. Never retried.
    #[error("Error while running generator {gen_name}: {message}")]
    Generator { gen_name: String, message: String },

    /// Too many consecutive discards.
    #[error("Generation exhausted after {discards} consecutive discards")]
    Exhausted { discards: usize },

    /// The property was falsified.
    #[error("Property failed after {iterations} iterations and {shrinks} shrinks: {counterexample} (replay: {replay})")]
    PropertyFailed {
        counterexample: String,
        iterations: usize,
        shrinks: usize,
        replay: String,
    },

    /// A replay token could not be decoded.
    #[error("Error decoding replay \"{token}\": {reason}")]
    ReplayDecode { token: String, reason: String },

    /// A replay token decoded fine but no longer reproduces against the generator.
    #[error("Replay is no longer valid: {reason}")]
    StaleReplay { reason: String },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Invalid weighted list construction or sampling.
    #[error(transparent)]
    Weighted(#[from] WeightedListError),

    /// No generator factory was registered for a type.
    #[error("No generator registered for type {type_name}")]
    UnregisteredType { type_name: String },

    /// A generator factory (transitively) depends on itself.
    #[error("Circular reference while resolving generators: {}", path.join(" -> "))]
    CircularReference { path: Vec<String> },
}

impl GauntletError {
    /// Build a generator error for the named generator.
    pub fn generator(gen_name: impl Into<String>, message: impl Into<String>) -> Self {
        GauntletError::Generator {
            gen_name: gen_name.into(),
            message: message.into(),
        }
    }

    pub(crate) fn replay_decode(token: &str, reason: impl Into<String>) -> Self {
        GauntletError::ReplayDecode {
            token: token.to_string(),
            reason: reason.into(),
        }
    }
}

/// Errors raised by [`crate::weighted::WeightedList`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WeightedListError {
    #[error("Weighted list must contain at least one element")]
    Empty,

    #[error("Weight at position {position} must not be negative, got {weight}")]
    NegativeWeight { position: usize, weight: i64 },

    #[error("Total weight of a weighted list must be positive")]
    ZeroTotalWeight,

    #[error("Total weight overflows at position {position}")]
    TotalWeightOverflow { position: usize },

    #[error("Index {index} is out of range for total weight {total}")]
    IndexOutOfRange { index: u64, total: u64 },
}

/// Result type for Gauntlet operations.
pub type Result<T> = std::result::Result<T, GauntletError>;
