//! Character generators.

use crate::gen::Gen;
use crate::scaling::Bias;

const SURROGATES_START: u32 = 0xD800;
const SURROGATES_LEN: u32 = 0x800;

const ALPHANUMERIC: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

impl Gen<char> {
    /// Generate a character in `lo..=hi`, skipping surrogate code points and
    /// shrinking towards `lo`. The reachable range grows linearly with size.
    pub fn char_between(lo: char, hi: char) -> Self {
        if lo > hi {
            return Gen::error(
                "Gen::char_between",
                format!("'lo' ({lo:?}) cannot be greater than 'hi' ({hi:?})"),
            );
        }

        let (lo_point, hi_point) = (lo as u32, hi as u32);
        let gap = if lo_point < SURROGATES_START && hi_point >= SURROGATES_START {
            SURROGATES_LEN
        } else {
            0
        };

        Gen::integer()
            .between(lo_point, hi_point - gap)
            .shrink_towards(lo_point)
            .with_bias(Bias::Linear)
            .build()
            .map(move |point| {
                let point = if point >= SURROGATES_START { point + gap } else { point };
                char::from_u32(point).unwrap_or(lo)
            })
    }

    /// Pick a character from `chars`, shrinking towards the first one.
    pub fn char_from(chars: &str) -> Self {
        Gen::element(chars.chars().collect())
    }

    /// ASCII letters and digits, shrinking towards `'a'`.
    pub fn ascii_alphanumeric() -> Self {
        Gen::char_from(ALPHANUMERIC)
    }
}
