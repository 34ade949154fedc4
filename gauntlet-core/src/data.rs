//! Core data types for Gauntlet property-based testing.

use crate::error::{GauntletError, Result};
use crate::rng::Rng;
use std::fmt;

/// Size parameter for controlling test data generation.
///
/// Size ranges from 0 to 100. At 0 generators stay at their origin, at 100
/// they may reach the full extent of their range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Size(u8);

impl Size {
    pub const MIN: Size = Size(0);
    pub const MAX: Size = Size(100);

    /// Create a new size value, clamped to `0..=100`.
    pub fn new(value: usize) -> Self {
        Size(value.min(100) as u8)
    }

    /// Get the inner size value.
    pub fn get(&self) -> usize {
        self.0 as usize
    }

    /// Step up by one, wrapping back to 0 after 99.
    pub fn increment(&self) -> Self {
        Size((self.0 + 1) % 100)
    }

    /// Step up by five, wrapping modulo 100.
    pub fn big_increment(&self) -> Self {
        Size((self.0 + 5) % 100)
    }

    /// Scale size by a factor, clamping the result.
    pub fn scale(&self, factor: f64) -> Self {
        Size::new((self.0 as f64 * factor).max(0.0) as usize)
    }
}

impl From<usize> for Size {
    fn from(value: usize) -> Self {
        Size::new(value)
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Size({})", self.0)
    }
}

/// Everything a generator needs to produce one iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenParameters {
    pub rng: Rng,
    pub size: Size,
    /// When set, the next generation reseeds from this snapshot instead of `rng`.
    pub waypoint: Option<Rng>,
}

impl GenParameters {
    pub fn new(rng: Rng, size: Size) -> Self {
        GenParameters {
            rng,
            size,
            waypoint: None,
        }
    }

    /// Parameters at the start of the stream for `seed`.
    pub fn create(seed: u64, size: Size) -> Self {
        GenParameters::new(Rng::create(seed), size)
    }

    pub fn with_rng(self, rng: Rng) -> Self {
        GenParameters { rng, ..self }
    }

    pub fn with_size(self, size: Size) -> Self {
        GenParameters { size, ..self }
    }

    pub fn with_waypoint(self, waypoint: Option<Rng>) -> Self {
        GenParameters { waypoint, ..self }
    }

    /// Resolve a pending waypoint: the parameters generation actually starts from.
    pub fn resolve(self) -> Self {
        match self.waypoint {
            Some(waypoint) => GenParameters {
                rng: waypoint,
                size: self.size,
                waypoint: None,
            },
            None => self,
        }
    }

    /// Advance the rng by one draw.
    pub fn next(self) -> Self {
        GenParameters {
            rng: self.rng.next(),
            ..self
        }
    }
}

/// Consecutive discards tolerated before generation gives up, unless a
/// [`Config`] says otherwise.
pub const DEFAULT_DISCARD_LIMIT: usize = 100;

/// Configuration for checking a property.
///
/// There is no global default: every run takes its configuration explicitly.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Number of instances to check.
    pub iterations: usize,

    /// Root seed; a random one is chosen when absent.
    pub seed: Option<u64>,

    /// Fixed size; when absent sizes are planned across the run.
    pub size: Option<Size>,

    /// Maximum number of shrinks across the whole run.
    pub shrink_limit: usize,

    /// Keep searching for smaller counterexamples after the first one.
    pub deep_check: bool,

    /// Replay token pinning a single counterexample.
    pub replay: Option<String>,

    /// Maximum number of consecutive discards before giving up.
    pub discard_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            iterations: 100,
            seed: None,
            size: None,
            shrink_limit: 500,
            deep_check: true,
            replay: None,
            discard_limit: DEFAULT_DISCARD_LIMIT,
        }
    }
}

impl Config {
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_size(mut self, size: Size) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_shrink_limit(mut self, shrink_limit: usize) -> Self {
        self.shrink_limit = shrink_limit;
        self
    }

    pub fn with_deep_check(mut self, deep_check: bool) -> Self {
        self.deep_check = deep_check;
        self
    }

    pub fn with_replay(mut self, replay: impl Into<String>) -> Self {
        self.replay = Some(replay.into());
        self
    }

    pub fn with_discard_limit(mut self, discard_limit: usize) -> Self {
        self.discard_limit = discard_limit;
        self
    }

    /// Build a configuration from `GAUNTLET_*` environment variables, falling
    /// back to the defaults for unset ones.
    pub fn from_env() -> Result<Self> {
        Config::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(iterations) = parse_var(&lookup, "GAUNTLET_ITERATIONS")? {
            config.iterations = iterations;
        }
        if let Some(seed) = parse_var(&lookup, "GAUNTLET_SEED")? {
            config.seed = Some(seed);
        }
        if let Some(size) = parse_var::<usize, _>(&lookup, "GAUNTLET_SIZE")? {
            if size > 100 {
                return Err(GauntletError::InvalidConfig {
                    message: format!("GAUNTLET_SIZE must be between 0 and 100, got {size}"),
                });
            }
            config.size = Some(Size::new(size));
        }
        if let Some(shrink_limit) = parse_var(&lookup, "GAUNTLET_SHRINK_LIMIT")? {
            config.shrink_limit = shrink_limit;
        }
        if let Some(replay) = lookup("GAUNTLET_REPLAY").filter(|r| !r.trim().is_empty()) {
            config.replay = Some(replay.trim().to_string());
        }

        Ok(config)
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| GauntletError::InvalidConfig {
                message: format!("{key}={raw:?}: {e}"),
            }),
    }
}
