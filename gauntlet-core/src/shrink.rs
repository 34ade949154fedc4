//! Shrink functions and distance measures used to unfold example spaces.

use crate::rng::Integer;
use std::iter;
use std::rc::Rc;

/// Lazily produces the next-smaller candidates for a value, best first.
///
/// Shrinkers are called again every time a space's children are enumerated,
/// which is what makes enumeration restartable.
pub type Shrinker<T> = Rc<dyn Fn(&T) -> Box<dyn Iterator<Item = T>>>;

/// Scores how far a value is from its generator's ideal. Lower is smaller.
pub type Measure<T> = Rc<dyn Fn(&T) -> f64>;

/// A shrinker that never produces candidates.
pub fn none<T: 'static>() -> Shrinker<T> {
    Rc::new(|_| Box::new(iter::empty()))
}

/// Shrink an integer towards `target`.
///
/// Yields `target` first, then values halving the remaining distance back
/// towards the original, ending with the neighbour one step closer to
/// `target`. Because that neighbour is always a candidate, a depth-first
/// search settles on the exact boundary of a failing region.
pub fn towards<N: Integer>(target: N) -> Shrinker<N> {
    Rc::new(move |value: &N| {
        let original = value.to_i128();
        let diff = original - target.to_i128();
        Box::new(
            iter::successors(Some(diff), |d| Some(d / 2))
                .take_while(|d| *d != 0)
                .map(move |d| N::from_i128(original - d)),
        )
    })
}

/// Distance of an integer from `origin`, as a percentage of the widest side
/// of `min..=max`.
pub fn integer_distance<N: Integer>(min: N, max: N, origin: N) -> Measure<N> {
    let origin = origin.to_i128();
    let extent = (origin - min.to_i128()).max(max.to_i128() - origin);
    Rc::new(move |value: &N| {
        if extent == 0 {
            return 0.0;
        }
        let offset = (value.to_i128() - origin).unsigned_abs();
        offset as f64 * 100.0 / extent as f64
    })
}

/// Chunks to remove from a list of `len` elements, without going below
/// `min_len`: the largest chunk first, halving down to single elements.
pub fn removals(len: usize, min_len: usize) -> impl Iterator<Item = (usize, usize)> {
    let removable = len.saturating_sub(min_len);
    iter::successors(Some(removable), |&count| Some(count / 2))
        .take_while(|&count| count > 0)
        .flat_map(move |count| (0..=len - count).step_by(count).map(move |start| (start, count)))
}
