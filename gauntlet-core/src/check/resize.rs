//! How the size evolves over the iterations of a check run.

use crate::data::{Config, Size};

/// Runs of at least this many iterations grow the size step by step instead
/// of following a precomputed ramp.
const STRATEGIC_THRESHOLD: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeStrategy {
    /// The caller fixed the size; it never changes.
    Noop(Size),
    /// A ramp from 0 to 100 spread evenly over the run's iterations.
    Planned { iterations: usize },
    /// Grow by one per passing iteration or discard, wrapping after 99.
    /// Once a counterexample exists every step is a jump of five, clamped
    /// at 100, so the size never wraps back to 0.
    SuperStrategic,
}

impl ResizeStrategy {
    pub fn for_config(config: &Config) -> Self {
        match config.size {
            Some(size) => ResizeStrategy::Noop(size),
            None if config.iterations < STRATEGIC_THRESHOLD => ResizeStrategy::Planned {
                iterations: config.iterations,
            },
            None => ResizeStrategy::SuperStrategic,
        }
    }

    /// Size of the first iteration.
    pub fn initial(&self) -> Size {
        match self {
            ResizeStrategy::Noop(size) => *size,
            ResizeStrategy::Planned { iterations } => planned(0, *iterations),
            ResizeStrategy::SuperStrategic => Size::MIN,
        }
    }

    /// Size after `completed` iterations, the last of which passed.
    pub fn after_pass(&self, completed: usize, current: Size, found_counterexample: bool) -> Size {
        match self {
            ResizeStrategy::Noop(size) => *size,
            ResizeStrategy::Planned { iterations } => planned(completed, *iterations),
            ResizeStrategy::SuperStrategic => step(current, found_counterexample),
        }
    }

    /// Size after `completed` iterations, the last of which failed.
    pub fn after_counterexample(&self, completed: usize, current: Size) -> Size {
        match self {
            ResizeStrategy::Noop(size) => *size,
            ResizeStrategy::Planned { iterations } => planned(completed, *iterations),
            ResizeStrategy::SuperStrategic => step(current, true),
        }
    }

    pub fn after_discard(&self, current: Size, found_counterexample: bool) -> Size {
        match self {
            ResizeStrategy::Noop(size) => *size,
            ResizeStrategy::Planned { .. } => current.increment(),
            ResizeStrategy::SuperStrategic => step(current, found_counterexample),
        }
    }
}

fn step(current: Size, found_counterexample: bool) -> Size {
    if found_counterexample {
        Size::new(current.get() + 5)
    } else {
        current.increment()
    }
}

fn planned(index: usize, iterations: usize) -> Size {
    if iterations <= 1 {
        return Size::MAX;
    }
    Size::new(index.min(iterations - 1) * 100 / (iterations - 1))
}
