//! Checking properties: the driver loop and its results.

use crate::data::Config;
use crate::error::Result;
use crate::gen::Gen;
use crate::property::PropertyOutcome;
use crate::replay::Replay;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

pub mod machine;
pub mod resize;

pub use machine::{CheckMachine, CheckState, CheckStateData};
pub use resize::ResizeStrategy;

/// A predicate's verdict on one value: `Err` carries the failure message.
pub type Verdict = std::result::Result<(), String>;

/// Why a check run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationReason {
    ReachedIterationLimit,
    /// The run's total shrink budget was spent after a counterexample was found.
    FoundCounterexampleAndExhaustedShrinks,
    DeepCheckDisabled,
    /// Too many consecutive discards.
    GenExhausted,
    /// A counterexample at distance zero cannot be improved on.
    FoundTheoreticalSmallestCounterexample,
    IsReplay,
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TerminationReason::ReachedIterationLimit => "reached the iteration limit",
            TerminationReason::FoundCounterexampleAndExhaustedShrinks => {
                "found a counterexample and exhausted the shrink budget"
            }
            TerminationReason::DeepCheckDisabled => "found a counterexample with deep check off",
            TerminationReason::GenExhausted => "gave up after too many discards",
            TerminationReason::FoundTheoreticalSmallestCounterexample => {
                "found the smallest possible counterexample"
            }
            TerminationReason::IsReplay => "replayed a counterexample",
        };
        f.write_str(text)
    }
}

/// The smallest failing value a run found.
#[derive(Debug, Clone, PartialEq)]
pub struct Counterexample<T> {
    pub value: T,
    pub distance: f64,
    /// Message from the predicate's last failure on this value, if any.
    pub failure: Option<String>,
    pub replay: Replay,
}

impl<T> Counterexample<T> {
    pub fn new(value: T, distance: f64, failure: Option<String>, replay: Replay) -> Self {
        Counterexample {
            value,
            distance,
            failure,
            replay,
        }
    }

    /// Token that reproduces this counterexample via [`Config::with_replay`].
    pub fn replay_token(&self) -> String {
        self.replay.encode()
    }
}

/// Summary of a finished check run.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckResult<T> {
    pub property_name: Option<String>,
    pub iterations: usize,
    pub discards: usize,
    pub shrinks: usize,
    pub seed: u64,
    pub counterexample: Option<Counterexample<T>>,
    pub termination_reason: TerminationReason,
}

impl<T> CheckResult<T> {
    pub fn is_success(&self) -> bool {
        self.counterexample.is_none()
            && self.termination_reason != TerminationReason::GenExhausted
    }

    pub fn is_failure(&self) -> bool {
        self.counterexample.is_some()
    }
}

impl<T: fmt::Debug> fmt::Display for CheckResult<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.property_name.as_deref().unwrap_or("property");

        if let Some(counterexample) = &self.counterexample {
            writeln!(
                f,
                "  ✗ {} failed after {} iterations and {} shrinks.",
                name, self.iterations, self.shrinks
            )?;
            if let Some(failure) = &counterexample.failure {
                writeln!(f, "    === {failure} ===")?;
            }
            writeln!(f, "    Minimal counterexample: {:?}", counterexample.value)?;
            return write!(
                f,
                "    Replay with seed {}: {}",
                self.seed,
                counterexample.replay_token()
            );
        }

        match self.termination_reason {
            TerminationReason::GenExhausted => {
                write!(f, "  ⚐ {} gave up after {} discards", name, self.discards)
            }
            _ => write!(f, "  ✓ {} passed {} iterations.", name, self.iterations),
        }
    }
}

/// Check `predicate` against values from `gen`.
///
/// Panics in the predicate count as failures, with the panic message as the
/// failure message. Returns `Err` for generator errors and for replay tokens
/// that are malformed or no longer reproduce.
pub fn check<T, F, O>(gen: &Gen<T>, config: &Config, mut predicate: F) -> Result<CheckResult<T>>
where
    T: Clone + 'static,
    F: FnMut(&T) -> O,
    O: PropertyOutcome,
{
    let mut machine = CheckMachine::new(gen.clone(), config)?;
    while let Some(value) = machine.next_probe()? {
        let verdict = panic::catch_unwind(AssertUnwindSafe(|| predicate(&value).into_verdict()))
            .unwrap_or_else(|payload| Err(panic_message(payload.as_ref())));
        machine.record(verdict);
    }
    Ok(machine.finish())
}

pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("panicked: {message}")
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("panicked: {message}")
    } else {
        "panicked".to_string()
    }
}
