//! Example spaces: lazy shrink trees over generated values.

use crate::shrink::{self, Measure, Shrinker};
use std::iter;
use std::rc::Rc;

pub mod explore;
pub mod render;

pub use explore::{Exploration, Explorer};

/// A value together with its distance from the generator's ideal value.
#[derive(Debug, Clone, PartialEq)]
pub struct Example<T> {
    pub value: T,
    pub distance: f64,
}

impl<T> Example<T> {
    pub fn new(value: T, distance: f64) -> Self {
        Example { value, distance }
    }
}

/// Lazily produces a node's children. Called afresh on every enumeration.
type Subspace<T> = Rc<dyn Fn() -> Box<dyn Iterator<Item = ExampleSpace<T>>>>;

/// A lazy rose tree of examples.
///
/// The root is the generated example; each child is a smaller candidate, in
/// the order shrinking should try them. Children are computed on demand, so a
/// space may be arbitrarily large (or infinite) without being materialized.
pub struct ExampleSpace<T> {
    current: Example<T>,
    subspace: Subspace<T>,
}

impl<T: Clone> Clone for ExampleSpace<T> {
    fn clone(&self) -> Self {
        ExampleSpace {
            current: self.current.clone(),
            subspace: Rc::clone(&self.subspace),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for ExampleSpace<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExampleSpace")
            .field("current", &self.current)
            .finish_non_exhaustive()
    }
}

impl<T> ExampleSpace<T>
where
    T: Clone + 'static,
{
    /// Create a space from a root example and a child producer.
    pub fn new<F>(current: Example<T>, subspace: F) -> Self
    where
        F: Fn() -> Box<dyn Iterator<Item = ExampleSpace<T>>> + 'static,
    {
        ExampleSpace {
            current,
            subspace: Rc::new(subspace),
        }
    }

    /// A space with a single example at distance zero and no shrinks.
    pub fn singleton(value: T) -> Self {
        ExampleSpace::new(Example::new(value, 0.0), || Box::new(iter::empty()))
    }

    /// Build a space by repeatedly applying `shrinker`, scoring each node with `measure`.
    pub fn unfold(value: T, shrinker: Shrinker<T>, measure: Measure<T>) -> Self {
        let distance = measure(&value);
        let seed = value.clone();
        ExampleSpace::new(Example::new(value, distance), move || {
            let shrinker_rc = Rc::clone(&shrinker);
            let measure_rc = Rc::clone(&measure);
            Box::new(shrinker(&seed).map(move |smaller| {
                ExampleSpace::unfold(smaller, Rc::clone(&shrinker_rc), Rc::clone(&measure_rc))
            }))
        })
    }

    pub fn current(&self) -> &Example<T> {
        &self.current
    }

    pub fn value(&self) -> &T {
        &self.current.value
    }

    pub fn distance(&self) -> f64 {
        self.current.distance
    }

    /// Enumerate the immediate children, best first.
    pub fn subspace(&self) -> Box<dyn Iterator<Item = ExampleSpace<T>>> {
        (self.subspace)()
    }

    /// Check whether the root has any shrinks.
    pub fn has_shrinks(&self) -> bool {
        self.subspace().next().is_some()
    }

    /// Map a function over every example, keeping distances and shrink order.
    pub fn map<U, F>(&self, f: F) -> ExampleSpace<U>
    where
        U: Clone + 'static,
        F: Fn(T) -> U + 'static,
    {
        self.map_rc(Rc::new(f))
    }

    fn map_rc<U>(&self, f: Rc<dyn Fn(T) -> U>) -> ExampleSpace<U>
    where
        U: Clone + 'static,
    {
        let inner = Rc::clone(&self.subspace);
        let value = f(self.current.value.clone());
        ExampleSpace::new(Example::new(value, self.current.distance), move || {
            let f = Rc::clone(&f);
            Box::new(inner().map(move |child| child.map_rc(Rc::clone(&f))))
        })
    }

    /// Keep only examples satisfying the predicate. Returns `None` when the
    /// root itself is filtered out; filtered children are pruned with their
    /// descendants.
    pub fn filter<F>(&self, predicate: F) -> Option<Self>
    where
        F: Fn(&T) -> bool + 'static,
    {
        self.filter_rc(Rc::new(predicate))
    }

    fn filter_rc(&self, predicate: Rc<dyn Fn(&T) -> bool>) -> Option<Self> {
        if !predicate(&self.current.value) {
            return None;
        }

        let inner = Rc::clone(&self.subspace);
        Some(ExampleSpace::new(self.current.clone(), move || {
            let predicate = Rc::clone(&predicate);
            Box::new(inner().filter_map(move |child| child.filter_rc(Rc::clone(&predicate))))
        }))
    }

    /// Drop every shrink, keeping the root.
    pub fn no_shrink(&self) -> Self {
        ExampleSpace::new(self.current.clone(), || Box::new(iter::empty()))
    }

    /// All examples in pre-order, lazily. Each call starts from the root again.
    pub fn traverse(&self) -> Box<dyn Iterator<Item = Example<T>>> {
        let mut stack: Vec<Box<dyn Iterator<Item = ExampleSpace<T>>>> =
            vec![Box::new(iter::once(self.clone()))];

        Box::new(iter::from_fn(move || loop {
            let top = stack.last_mut()?;
            match top.next() {
                Some(space) => {
                    stack.push(space.subspace());
                    return Some(space.current);
                }
                None => {
                    stack.pop();
                }
            }
        }))
    }

    /// Follow a path of child indices from the root.
    pub fn navigate(&self, path: &[usize]) -> Option<Self> {
        path.iter()
            .try_fold(self.clone(), |space, &index| space.subspace().nth(index))
    }

    /// Count the nodes reachable within `depth` levels below the root.
    pub fn count_nodes(&self, depth: usize) -> usize {
        if depth == 0 {
            return 1;
        }
        1 + self
            .subspace()
            .map(|child| child.count_nodes(depth - 1))
            .sum::<usize>()
    }

    /// Pair two spaces. Distances add; the left space shrinks first.
    pub fn zip<U>(left: &ExampleSpace<T>, right: &ExampleSpace<U>) -> ExampleSpace<(T, U)>
    where
        U: Clone + 'static,
    {
        let (left, right) = (left.clone(), right.clone());
        let current = Example::new(
            (left.current.value.clone(), right.current.value.clone()),
            left.current.distance + right.current.distance,
        );

        ExampleSpace::new(current, move || {
            let fixed_right = right.clone();
            let left_shrinks = left
                .subspace()
                .map(move |child| ExampleSpace::zip(&child, &fixed_right));

            let fixed_left = left.clone();
            let shrinking_right = right.clone();
            let right_shrinks = lazily(move || {
                let fixed_left = fixed_left.clone();
                shrinking_right
                    .subspace()
                    .map(move |child| ExampleSpace::zip(&fixed_left, &child))
            });

            Box::new(left_shrinks.chain(right_shrinks))
        })
    }

    /// Compose a space with a space derived from its value.
    ///
    /// `right` is the space derived from `left`'s root; `rebind` derives the
    /// right-hand space for each shrink of `left` (or rejects it with `None`).
    /// Distances add, and the left space shrinks first: every shrink of `left`
    /// is offered before any shrink of `right`.
    pub fn bind<U>(
        left: &ExampleSpace<T>,
        right: &ExampleSpace<U>,
        rebind: Rc<dyn Fn(&T) -> Option<ExampleSpace<U>>>,
    ) -> ExampleSpace<U>
    where
        U: Clone + 'static,
    {
        let (left, right) = (left.clone(), right.clone());
        let current = Example::new(
            right.current.value.clone(),
            left.current.distance + right.current.distance,
        );

        ExampleSpace::new(current, move || {
            let left_rebind = Rc::clone(&rebind);
            let left_shrinks = left.subspace().filter_map(move |child| {
                let rebound = left_rebind(&child.current.value)?;
                Some(ExampleSpace::bind(&child, &rebound, Rc::clone(&left_rebind)))
            });

            let fixed_left = left.clone();
            let shrinking_right = right.clone();
            let right_rebind = Rc::clone(&rebind);
            let right_shrinks = lazily(move || {
                let fixed_left = fixed_left.clone();
                let right_rebind = Rc::clone(&right_rebind);
                shrinking_right.subspace().map(move |child| {
                    ExampleSpace::bind(&fixed_left, &child, Rc::clone(&right_rebind))
                })
            });

            Box::new(left_shrinks.chain(right_shrinks))
        })
    }

    /// Combine element spaces into a space of lists.
    ///
    /// Shrinks first remove chunks of elements (largest chunk first, never
    /// going below `min_len`), then shrink elements one at a time from left to
    /// right. Shrinks of different elements are never combined into a single
    /// step. The distance is the sum of element distances plus one per element
    /// above `min_len`.
    pub fn merge(spaces: Vec<ExampleSpace<T>>, min_len: usize) -> ExampleSpace<Vec<T>> {
        let spaces = Rc::new(spaces);
        let value: Vec<T> = spaces.iter().map(|s| s.current.value.clone()).collect();
        let distance = spaces.iter().map(|s| s.current.distance).sum::<f64>()
            + spaces.len().saturating_sub(min_len) as f64;

        ExampleSpace::new(Example::new(value, distance), move || {
            let len = spaces.len();

            let removal_spaces = Rc::clone(&spaces);
            let removals = shrink::removals(len, min_len).map(move |(start, count)| {
                let remaining = removal_spaces
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| *i < start || *i >= start + count)
                    .map(|(_, space)| space.clone())
                    .collect();
                ExampleSpace::merge(remaining, min_len)
            });

            let element_spaces = Rc::clone(&spaces);
            let elements = (0..len).flat_map(move |i| {
                let siblings = Rc::clone(&element_spaces);
                element_spaces[i].subspace().map(move |child| {
                    let mut replaced: Vec<ExampleSpace<T>> = siblings.iter().cloned().collect();
                    replaced[i] = child;
                    ExampleSpace::merge(replaced, min_len)
                })
            });

            Box::new(removals.chain(elements))
        })
    }
}

/// Defer building an iterator until it is first polled.
fn lazily<I, F>(make: F) -> impl Iterator<Item = I::Item>
where
    I: Iterator,
    F: FnOnce() -> I,
{
    iter::once(make).flat_map(|make| make())
}
