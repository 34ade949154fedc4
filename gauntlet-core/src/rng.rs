//! Splittable random number generation.

use crate::error::{GauntletError, Result};
use std::fmt;

const GOLDEN_GAMMA: u64 = 0x9e3779b97f4a7c15;

/// Primitive integer types that can be drawn from an [`Rng`] and generated by
/// [`crate::Gen::between`].
///
/// All arithmetic happens in `i128`, which holds every primitive up to 64 bits.
pub trait Integer: Copy + Ord + fmt::Debug + fmt::Display + 'static {
    const MIN: Self;
    const MAX: Self;

    fn to_i128(self) -> i128;

    /// Callers guarantee `value` is within `MIN..=MAX`.
    fn from_i128(value: i128) -> Self;
}

macro_rules! impl_integer {
    ($($t:ty),*) => {
        $(
            impl Integer for $t {
                const MIN: Self = <$t>::MIN;
                const MAX: Self = <$t>::MAX;

                fn to_i128(self) -> i128 {
                    self as i128
                }

                fn from_i128(value: i128) -> Self {
                    value as $t
                }
            }
        )*
    };
}

impl_integer!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

/// Splittable pseudo-random generator.
///
/// An `Rng` is an immutable value. Draws are computed from the current state
/// without changing it; [`Rng::next`] and [`Rng::fork`] return new values.
/// Everything an `Rng` produces is a pure function of its `seed`, so
/// `Rng::create(rng.seed())` reproduces the same draws as `rng`. `family` and
/// `order` are bookkeeping: the number of forks and of advances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rng {
    family: u64,
    seed: u64,
    order: u64,
}

impl Rng {
    /// Create a new generator at the start of the stream for `seed`.
    pub fn create(seed: u64) -> Self {
        Rng {
            family: seed,
            seed,
            order: 0,
        }
    }

    /// Create a generator from a random seed.
    pub fn random() -> Self {
        use rand::Rng as _;
        Rng::create(rand::thread_rng().gen())
    }

    pub fn family(&self) -> u64 {
        self.family
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn order(&self) -> u64 {
        self.order
    }

    /// Advance to the next position in this stream.
    pub fn next(&self) -> Self {
        Rng {
            family: self.family,
            seed: self.seed.wrapping_add(GOLDEN_GAMMA),
            order: self.order + 1,
        }
    }

    /// Derive an independent stream for a sub-generator.
    pub fn fork(&self) -> Self {
        Rng {
            family: self.family.wrapping_add(1),
            seed: mix_gamma(self.seed),
            order: 0,
        }
    }

    /// The raw 64-bit output at the current position.
    pub fn next_u64(&self) -> u64 {
        splitmix64_mix(self.seed)
    }

    /// Draw a value uniformly from `min..=max`.
    ///
    /// Uses Lemire's multiply-and-reject over a local SplitMix64 stream, so
    /// there is no boundary bias and `self` is never advanced: the draw is a
    /// pure function of the current seed.
    pub fn value<N: Integer>(&self, min: N, max: N) -> Result<N> {
        if min > max {
            return Err(GauntletError::InvalidRange {
                min: min.to_string(),
                max: max.to_string(),
            });
        }

        let (lo, hi) = (min.to_i128(), max.to_i128());
        let span = (hi - lo) as u128;
        let offset = if span >= u64::MAX as u128 {
            self.next_u64() as u128
        } else {
            bounded(self.seed, span as u64 + 1) as u128
        };

        Ok(N::from_i128(lo + offset as i128))
    }
}

impl fmt::Display for Rng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Rng(family: {}, seed: {}, order: {})",
            self.family, self.seed, self.order
        )
    }
}

/// Unbiased draw from `[0, bound)` for a non-zero `bound`.
fn bounded(seed: u64, bound: u64) -> u64 {
    let threshold = bound.wrapping_neg() % bound;
    let mut state = seed;
    loop {
        let product = splitmix64_mix(state) as u128 * bound as u128;
        if (product as u64) >= threshold {
            return (product >> 64) as u64;
        }
        state = state.wrapping_add(GOLDEN_GAMMA);
    }
}

/// SplitMix64 mixing function for high-quality output.
fn splitmix64_mix(mut z: u64) -> u64 {
    z = z.wrapping_add(GOLDEN_GAMMA);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
    z ^ (z >> 31)
}

/// Derive a decorrelated seed for a forked stream.
fn mix_gamma(z: u64) -> u64 {
    let z = splitmix64_mix(z ^ 0xd1b54a32d192ed03);
    // Odd multiplier keeps distinct inputs distinct
    (z | 1).wrapping_mul(GOLDEN_GAMMA)
}
