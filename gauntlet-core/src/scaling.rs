//! Bounds scaling: how a [`Size`] narrows a generator's range around its origin.

use crate::data::Size;
use crate::rng::Integer;

/// Strategy for scaling generation bounds by size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Bias {
    /// Ignore size; always use the full range.
    None,
    /// Each side's width grows linearly with size.
    Linear,
    /// Each side's width follows a ladder of powers of two, so small sizes
    /// stay close to the origin and the extremes are only reached near 100.
    #[default]
    Exponential,
}

impl Bias {
    /// Scale `min..=max` around `origin` for the given size.
    ///
    /// Callers guarantee `min <= origin <= max`.
    pub fn scale<N: Integer>(self, min: N, max: N, origin: N, size: Size) -> (N, N) {
        let (min, max, origin) = (min.to_i128(), max.to_i128(), origin.to_i128());
        let below = (origin - min) as u128;
        let above = (max - origin) as u128;
        let size = size.get() as u128;

        let (below, above) = match self {
            Bias::None => (below, above),
            Bias::Linear => (linear_width(below, size), linear_width(above, size)),
            Bias::Exponential => (
                exponential_width(below, size),
                exponential_width(above, size),
            ),
        };

        (
            N::from_i128(origin - below as i128),
            N::from_i128(origin + above as i128),
        )
    }
}

fn linear_width(width: u128, size: u128) -> u128 {
    width * size / 100
}

fn exponential_width(width: u128, size: u128) -> u128 {
    if width == 0 {
        return 0;
    }

    let bits = 128 - width.leading_zeros() as u128;
    let step = bits * size;
    let (rung, remainder) = (step / 100, step % 100);
    let base = 1u128 << rung;
    let scaled = (base - 1) + base * remainder / 100;

    scaled.min(width)
}
