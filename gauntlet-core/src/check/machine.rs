//! The step-driven check state machine.
//!
//! The machine never calls the predicate itself. Drivers pull the next value
//! to test with [`CheckMachine::next_probe`] and report the verdict with
//! [`CheckMachine::record`], which lets the synchronous and asynchronous
//! drivers share one implementation.

use super::resize::ResizeStrategy;
use super::{CheckResult, Counterexample, TerminationReason, Verdict};
use crate::data::{Config, GenParameters, Size};
use crate::error::{GauntletError, Result};
use crate::example_space::{ExampleSpace, Explorer};
use crate::gen::{Gen, GenIteration};
use crate::replay::Replay;
use crate::rng::Rng;
use tracing::{debug, info};

/// Counters and settings threaded through every state.
#[derive(Debug, Clone)]
pub struct CheckStateData<T> {
    pub seed: u64,
    pub iterations: usize,
    pub discards: usize,
    pub consecutive_discards: usize,
    pub shrinks: usize,
    pub size: Size,
    pub parameters: GenParameters,
    pub resize: ResizeStrategy,
    pub counterexample: Option<Counterexample<T>>,
}

pub enum CheckState<T> {
    /// Ready to pull the next iteration from the generator.
    Generation,
    /// A freshly generated root is waiting for its verdict.
    Evaluation {
        space: ExampleSpace<T>,
        replay_parameters: GenParameters,
    },
    /// Searching below a failing root; `failure` is the latest failure message.
    Exploration {
        explorer: Explorer<T>,
        replay_parameters: GenParameters,
        failure: Option<String>,
        awaiting: bool,
    },
    /// A replay token was decoded; its value is generated on the next probe.
    Replay(Replay),
    /// The replayed value is waiting for its verdict.
    ReplayEvaluation { space: ExampleSpace<T>, replay: Replay },
    Termination(TerminationReason),
}

impl<T> CheckState<T> {
    pub fn name(&self) -> &'static str {
        match self {
            CheckState::Generation => "generation",
            CheckState::Evaluation { .. } => "evaluation",
            CheckState::Exploration { .. } => "exploration",
            CheckState::Replay(_) => "replay",
            CheckState::ReplayEvaluation { .. } => "replay evaluation",
            CheckState::Termination(_) => "termination",
        }
    }
}

pub struct CheckMachine<T> {
    gen: Gen<T>,
    config: Config,
    data: CheckStateData<T>,
    state: CheckState<T>,
}

impl<T> CheckMachine<T>
where
    T: Clone + 'static,
{
    /// Set up a run. Fails only when the configured replay token is malformed.
    pub fn new(gen: Gen<T>, config: &Config) -> Result<Self> {
        let resize = ResizeStrategy::for_config(config);

        let (seed, size, state) = match &config.replay {
            Some(token) => {
                let replay = Replay::decode(token)?;
                (replay.seed, replay.size, CheckState::Replay(replay))
            }
            None => {
                let seed = config.seed.unwrap_or_else(|| Rng::random().seed());
                (seed, resize.initial(), CheckState::Generation)
            }
        };

        Ok(CheckMachine {
            gen,
            config: config.clone(),
            data: CheckStateData {
                seed,
                iterations: 0,
                discards: 0,
                consecutive_discards: 0,
                shrinks: 0,
                size,
                parameters: GenParameters::create(seed, size),
                resize,
                counterexample: None,
            },
            state,
        })
    }

    pub fn state(&self) -> &CheckState<T> {
        &self.state
    }

    pub fn data(&self) -> &CheckStateData<T> {
        &self.data
    }

    /// Advance until a value needs evaluating, returning it, or until the run
    /// terminates, returning `None`. Calling again before [`record`] returns
    /// the same value.
    ///
    /// [`record`]: CheckMachine::record
    pub fn next_probe(&mut self) -> Result<Option<T>> {
        loop {
            match &mut self.state {
                CheckState::Termination(_) => return Ok(None),
                CheckState::Evaluation { space, .. }
                | CheckState::ReplayEvaluation { space, .. } => {
                    return Ok(Some(space.value().clone()))
                }
                CheckState::Replay(replay) => {
                    let replay = replay.clone();
                    self.start_replay(replay)?;
                }
                CheckState::Generation => self.generate()?,
                CheckState::Exploration {
                    explorer, awaiting, ..
                } => {
                    if self.data.shrinks < self.config.shrink_limit {
                        if let Some(candidate) = explorer.next_candidate() {
                            *awaiting = true;
                            return Ok(Some(candidate.value.clone()));
                        }
                    }
                    self.complete_exploration();
                }
            }
        }
    }

    /// Report the verdict for the value last returned by [`next_probe`].
    /// Without a pending probe this does nothing.
    ///
    /// [`next_probe`]: CheckMachine::next_probe
    pub fn record(&mut self, verdict: Verdict) {
        let state = std::mem::replace(&mut self.state, CheckState::Generation);
        self.state = match state {
            CheckState::Evaluation {
                space,
                replay_parameters,
            } => self.evaluate(space, replay_parameters, verdict),
            CheckState::Exploration {
                mut explorer,
                replay_parameters,
                failure,
                awaiting: true,
            } => {
                let failure = match verdict {
                    Ok(()) => {
                        explorer.observe(false);
                        failure
                    }
                    Err(message) => {
                        explorer.observe(true);
                        self.data.shrinks += 1;
                        debug!(
                            shrinks = self.data.shrinks,
                            distance = explorer.best().distance(),
                            "shrunk counterexample"
                        );
                        Some(message)
                    }
                };
                CheckState::Exploration {
                    explorer,
                    replay_parameters,
                    failure,
                    awaiting: false,
                }
            }
            CheckState::ReplayEvaluation { space, replay } => {
                self.data.iterations = 1;
                if let Err(message) = verdict {
                    self.data.counterexample = Some(Counterexample::new(
                        space.value().clone(),
                        space.distance(),
                        Some(message),
                        replay,
                    ));
                }
                self.terminate(TerminationReason::IsReplay)
            }
            other => other,
        };
    }

    /// The result of the run. Finishing before termination reports the
    /// iteration limit as the reason.
    pub fn finish(self) -> CheckResult<T> {
        let termination_reason = match self.state {
            CheckState::Termination(reason) => reason,
            _ => TerminationReason::ReachedIterationLimit,
        };
        CheckResult {
            property_name: None,
            iterations: self.data.iterations,
            discards: self.data.discards,
            shrinks: self.data.shrinks,
            seed: self.data.seed,
            counterexample: self.data.counterexample,
            termination_reason,
        }
    }

    fn generate(&mut self) -> Result<()> {
        if self.data.iterations >= self.config.iterations {
            self.state = self.terminate(TerminationReason::ReachedIterationLimit);
            return Ok(());
        }

        let parameters = self.data.parameters.with_size(self.data.size);
        let iteration = self.gen.generate(parameters);
        self.data.parameters = *iteration.next_parameters();

        match iteration {
            GenIteration::Instance {
                space,
                replay_parameters,
                ..
            } => {
                debug!(
                    iteration = self.data.iterations + 1,
                    size = self.data.size.get(),
                    "generated instance"
                );
                self.state = CheckState::Evaluation {
                    space,
                    replay_parameters,
                };
            }
            GenIteration::Discard { .. } => {
                self.data.discards += 1;
                self.data.consecutive_discards += 1;
                debug!(
                    discards = self.data.discards,
                    consecutive = self.data.consecutive_discards,
                    "discarded instance"
                );
                if self.data.consecutive_discards >= self.config.discard_limit {
                    self.state = self.terminate(TerminationReason::GenExhausted);
                } else {
                    self.data.size = self
                        .data
                        .resize
                        .after_discard(self.data.size, self.data.counterexample.is_some());
                }
            }
            GenIteration::Error {
                gen_name, message, ..
            } => {
                self.state = self.terminate(TerminationReason::ReachedIterationLimit);
                return Err(GauntletError::Generator { gen_name, message });
            }
        }
        Ok(())
    }

    fn evaluate(
        &mut self,
        space: ExampleSpace<T>,
        replay_parameters: GenParameters,
        verdict: Verdict,
    ) -> CheckState<T> {
        self.data.iterations += 1;
        self.data.consecutive_discards = 0;

        let message = match verdict {
            Ok(()) => {
                self.data.size = self.data.resize.after_pass(
                    self.data.iterations,
                    self.data.size,
                    self.data.counterexample.is_some(),
                );
                return CheckState::Generation;
            }
            Err(message) => message,
        };

        debug!(
            iteration = self.data.iterations,
            distance = space.distance(),
            "found counterexample"
        );

        CheckState::Exploration {
            explorer: Explorer::new(space),
            replay_parameters,
            failure: Some(message),
            awaiting: false,
        }
    }

    fn complete_exploration(&mut self) {
        let (explorer, replay_parameters, failure) =
            match std::mem::replace(&mut self.state, CheckState::Generation) {
                CheckState::Exploration {
                    explorer,
                    replay_parameters,
                    failure,
                    ..
                } => (explorer, replay_parameters, failure),
                other => {
                    self.state = other;
                    return;
                }
            };

        let exploration = explorer.finish();
        let candidate = Counterexample::new(
            exploration.counterexample.value,
            exploration.counterexample.distance,
            failure,
            Replay::from_parameters(&replay_parameters, exploration.path),
        );

        let replace = match &self.data.counterexample {
            Some(current) => candidate.distance < current.distance,
            None => true,
        };
        if replace {
            self.data.counterexample = Some(candidate);
        }

        let best_distance = self
            .data
            .counterexample
            .as_ref()
            .map_or(f64::INFINITY, |c| c.distance);

        self.state = if best_distance <= 0.0 {
            self.terminate(TerminationReason::FoundTheoreticalSmallestCounterexample)
        } else if !self.config.deep_check {
            self.terminate(TerminationReason::DeepCheckDisabled)
        } else if self.data.shrinks >= self.config.shrink_limit {
            self.terminate(TerminationReason::FoundCounterexampleAndExhaustedShrinks)
        } else {
            self.data.size = self
                .data
                .resize
                .after_counterexample(self.data.iterations, self.data.size);
            CheckState::Generation
        };
    }

    fn start_replay(&mut self, replay: Replay) -> Result<()> {
        match self.gen.generate(replay.parameters()) {
            GenIteration::Instance { space, .. } => match space.navigate(&replay.path) {
                Some(space) => {
                    debug!(seed = replay.seed, path = ?replay.path, "replaying counterexample");
                    self.state = CheckState::ReplayEvaluation { space, replay };
                    Ok(())
                }
                None => {
                    self.state = self.terminate(TerminationReason::IsReplay);
                    Err(GauntletError::StaleReplay {
                        reason: format!("shrink path {:?} does not exist", replay.path),
                    })
                }
            },
            GenIteration::Discard { .. } => {
                self.state = self.terminate(TerminationReason::IsReplay);
                Err(GauntletError::StaleReplay {
                    reason: "the generator discarded the replayed value".to_string(),
                })
            }
            GenIteration::Error {
                gen_name, message, ..
            } => {
                self.state = self.terminate(TerminationReason::IsReplay);
                Err(GauntletError::Generator { gen_name, message })
            }
        }
    }

    fn terminate(&self, reason: TerminationReason) -> CheckState<T> {
        info!(
            seed = self.data.seed,
            size = self.data.size.get(),
            iterations = self.data.iterations,
            shrinks = self.data.shrinks,
            reason = ?reason,
            "check finished"
        );
        CheckState::Termination(reason)
    }
}
