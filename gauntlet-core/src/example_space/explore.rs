//! Depth-first search of an example space for a minimal counterexample.

use super::{Example, ExampleSpace};

/// Step-driven depth-first shrink search.
///
/// The explorer starts from a known counterexample and offers candidates one
/// at a time through [`Explorer::next_candidate`]; the caller evaluates each
/// and reports back with [`Explorer::observe`]. When a candidate fails, the
/// search descends into it and restarts from its first child. Siblings of a
/// failing candidate are never revisited, and candidates further from the
/// ideal than the current best are skipped, so the best distance only
/// improves.
pub struct Explorer<T> {
    best: ExampleSpace<T>,
    path: Vec<usize>,
    children: Box<dyn Iterator<Item = ExampleSpace<T>>>,
    position: usize,
    pending: Option<ExampleSpace<T>>,
    shrinks: usize,
}

/// The outcome of a completed exploration.
#[derive(Debug, Clone, PartialEq)]
pub struct Exploration<T> {
    pub counterexample: Example<T>,
    /// Child indices from the root to the counterexample.
    pub path: Vec<usize>,
    pub shrinks: usize,
}

impl<T> Explorer<T>
where
    T: Clone + 'static,
{
    /// Begin exploring below `root`, which must already be a counterexample.
    pub fn new(root: ExampleSpace<T>) -> Self {
        Explorer {
            children: root.subspace(),
            best: root,
            path: Vec::new(),
            position: 0,
            pending: None,
            shrinks: 0,
        }
    }

    /// The next candidate to evaluate, or `None` once the current best is a
    /// local minimum. Repeated calls without [`Explorer::observe`] return the
    /// same candidate.
    pub fn next_candidate(&mut self) -> Option<&Example<T>> {
        if self.pending.is_none() {
            let best_distance = self.best.distance();
            loop {
                let child = self.children.next()?;
                if child.distance() <= best_distance {
                    self.pending = Some(child);
                    break;
                }
                self.position += 1;
            }
        }
        self.pending.as_ref().map(|candidate| candidate.current())
    }

    /// Report whether the pending candidate is a counterexample.
    pub fn observe(&mut self, is_counterexample: bool) {
        let Some(candidate) = self.pending.take() else {
            return;
        };

        if is_counterexample {
            self.path.push(self.position);
            self.children = candidate.subspace();
            self.best = candidate;
            self.position = 0;
            self.shrinks += 1;
        } else {
            self.position += 1;
        }
    }

    pub fn best(&self) -> &ExampleSpace<T> {
        &self.best
    }

    pub fn path(&self) -> &[usize] {
        &self.path
    }

    pub fn shrinks(&self) -> usize {
        self.shrinks
    }

    pub fn finish(self) -> Exploration<T> {
        Exploration {
            counterexample: self.best.current().clone(),
            path: self.path,
            shrinks: self.shrinks,
        }
    }
}

impl<T> ExampleSpace<T>
where
    T: Clone + 'static,
{
    /// Search for a locally-minimal counterexample, performing at most
    /// `shrink_limit` shrinks. Returns `None` if the root is not a
    /// counterexample.
    pub fn explore<F>(&self, shrink_limit: usize, mut is_counterexample: F) -> Option<Exploration<T>>
    where
        F: FnMut(&T) -> bool,
    {
        if !is_counterexample(self.value()) {
            return None;
        }

        let mut explorer = Explorer::new(self.clone());
        while explorer.shrinks() < shrink_limit {
            let Some(candidate) = explorer.next_candidate() else {
                break;
            };
            let failed = is_counterexample(&candidate.value);
            explorer.observe(failed);
        }

        Some(explorer.finish())
    }
}
