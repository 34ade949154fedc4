//! Property definitions for property-based testing.

use crate::check::{self, panic_message, CheckMachine, CheckResult, TerminationReason, Verdict};
use crate::{data::*, error::*, gen::*};
use futures::future::{FutureExt, LocalBoxFuture};
use std::fmt::{self, Debug};
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

/// What a predicate may return.
pub trait PropertyOutcome {
    fn into_verdict(self) -> Verdict;
}

impl PropertyOutcome for bool {
    fn into_verdict(self) -> Verdict {
        if self {
            Ok(())
        } else {
            Err("Boolean Condition".to_string())
        }
    }
}

impl PropertyOutcome for () {
    fn into_verdict(self) -> Verdict {
        Ok(())
    }
}

impl<E: fmt::Display> PropertyOutcome for std::result::Result<(), E> {
    fn into_verdict(self) -> Verdict {
        self.map_err(|error| error.to_string())
    }
}

/// A property that can be tested with generated inputs.
pub struct Property<T> {
    generator: Gen<T>,
    predicate: Rc<dyn Fn(&T) -> Verdict>,
    name: Option<String>,
}

impl<T> Property<T>
where
    T: Clone + Debug + 'static,
{
    pub fn for_all<F, O>(generator: Gen<T>, predicate: F) -> Self
    where
        F: Fn(&T) -> O + 'static,
        O: PropertyOutcome,
    {
        Property {
            generator,
            predicate: Rc::new(move |value| predicate(value).into_verdict()),
            name: None,
        }
    }

    /// Name the property in reports.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Run the property. A counterexample is reported in the result, not as
    /// an error.
    pub fn check(&self, config: &Config) -> Result<CheckResult<T>> {
        let predicate = Rc::clone(&self.predicate);
        let mut result = check::check(&self.generator, config, move |value: &T| predicate(value))?;
        result.property_name = self.name.clone();
        Ok(result)
    }

    /// Run the property, turning a counterexample or an exhausted generator
    /// into an error.
    pub fn assert(&self, config: &Config) -> Result<CheckResult<T>> {
        into_assertion(self.check(config)?)
    }
}

/// A property whose predicate is asynchronous.
///
/// Each value is awaited in turn; no two predicate futures run at once.
pub struct AsyncProperty<T> {
    generator: Gen<T>,
    predicate: Rc<dyn Fn(T) -> LocalBoxFuture<'static, Verdict>>,
    name: Option<String>,
}

impl<T> AsyncProperty<T>
where
    T: Clone + Debug + 'static,
{
    pub fn for_all<F, Fut>(generator: Gen<T>, predicate: F) -> Self
    where
        F: Fn(T) -> Fut + 'static,
        Fut: Future + 'static,
        Fut::Output: PropertyOutcome,
    {
        AsyncProperty {
            generator,
            predicate: Rc::new(move |value| {
                predicate(value)
                    .map(PropertyOutcome::into_verdict)
                    .boxed_local()
            }),
            name: None,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub async fn check(&self, config: &Config) -> Result<CheckResult<T>> {
        let mut machine = CheckMachine::new(self.generator.clone(), config)?;
        while let Some(value) = machine.next_probe()? {
            let verdict = match panic::catch_unwind(AssertUnwindSafe(|| (self.predicate)(value))) {
                Ok(future) => AssertUnwindSafe(future)
                    .catch_unwind()
                    .await
                    .unwrap_or_else(|payload| Err(panic_message(payload.as_ref()))),
                Err(payload) => Err(panic_message(payload.as_ref())),
            };
            machine.record(verdict);
        }

        let mut result = machine.finish();
        result.property_name = self.name.clone();
        Ok(result)
    }

    pub async fn assert(&self, config: &Config) -> Result<CheckResult<T>> {
        into_assertion(self.check(config).await?)
    }
}

fn into_assertion<T: Debug>(result: CheckResult<T>) -> Result<CheckResult<T>> {
    if let Some(counterexample) = &result.counterexample {
        return Err(GauntletError::PropertyFailed {
            counterexample: format!("{:?}", counterexample.value),
            iterations: result.iterations,
            shrinks: result.shrinks,
            replay: counterexample.replay_token(),
        });
    }
    if result.termination_reason == TerminationReason::GenExhausted {
        return Err(GauntletError::Exhausted {
            discards: result.discards,
        });
    }
    Ok(result)
}

/// Create a property that checks `predicate` for every generated value.
pub fn for_all<T, F, O>(generator: Gen<T>, predicate: F) -> Property<T>
where
    T: Clone + Debug + 'static,
    F: Fn(&T) -> O + 'static,
    O: PropertyOutcome,
{
    Property::for_all(generator, predicate)
}

/// Create a property with an asynchronous predicate.
pub fn for_all_async<T, F, Fut>(generator: Gen<T>, predicate: F) -> AsyncProperty<T>
where
    T: Clone + Debug + 'static,
    F: Fn(T) -> Fut + 'static,
    Fut: Future + 'static,
    Fut::Output: PropertyOutcome,
{
    AsyncProperty::for_all(generator, predicate)
}
