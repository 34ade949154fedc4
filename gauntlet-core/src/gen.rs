//! Generator combinators for property-based testing.

use crate::error::{GauntletError, Result};
use crate::{data::*, example_space::*};
use std::fmt;
use std::rc::Rc;

pub mod choice;
pub mod collection;
pub mod date;
pub mod integer;
pub mod text;

pub use collection::ListGen;
pub use integer::IntegerGen;

/// One pull from a generator.
///
/// Every variant records the parameters that produced it (for replay) and
/// the parameters to generate from next.
#[derive(Debug, Clone)]
pub enum GenIteration<T> {
    /// A value together with its shrinks.
    Instance {
        replay_parameters: GenParameters,
        next_parameters: GenParameters,
        space: ExampleSpace<T>,
    },
    /// The generated value was rejected by a precondition.
    Discard {
        replay_parameters: GenParameters,
        next_parameters: GenParameters,
    },
    /// A generator's invariant was violated.
    Error {
        replay_parameters: GenParameters,
        next_parameters: GenParameters,
        gen_name: String,
        message: String,
    },
}

impl<T> GenIteration<T>
where
    T: Clone + 'static,
{
    pub fn replay_parameters(&self) -> &GenParameters {
        match self {
            GenIteration::Instance {
                replay_parameters, ..
            }
            | GenIteration::Discard {
                replay_parameters, ..
            }
            | GenIteration::Error {
                replay_parameters, ..
            } => replay_parameters,
        }
    }

    pub fn next_parameters(&self) -> &GenParameters {
        match self {
            GenIteration::Instance {
                next_parameters, ..
            }
            | GenIteration::Discard {
                next_parameters, ..
            }
            | GenIteration::Error {
                next_parameters, ..
            } => next_parameters,
        }
    }

    pub fn is_instance(&self) -> bool {
        matches!(self, GenIteration::Instance { .. })
    }

    /// The root value of an instance.
    pub fn value(&self) -> Option<&T> {
        match self {
            GenIteration::Instance { space, .. } => Some(space.value()),
            _ => None,
        }
    }

    pub fn into_space(self) -> Option<ExampleSpace<T>> {
        match self {
            GenIteration::Instance { space, .. } => Some(space),
            _ => None,
        }
    }

    /// Split an instance into its space and parameters, or re-type a
    /// discard/error so it can be passed through unchanged.
    pub(crate) fn split<U>(
        self,
    ) -> std::result::Result<(ExampleSpace<T>, GenParameters, GenParameters), GenIteration<U>> {
        match self {
            GenIteration::Instance {
                replay_parameters,
                next_parameters,
                space,
            } => Ok((space, replay_parameters, next_parameters)),
            GenIteration::Discard {
                replay_parameters,
                next_parameters,
            } => Err(GenIteration::Discard {
                replay_parameters,
                next_parameters,
            }),
            GenIteration::Error {
                replay_parameters,
                next_parameters,
                gen_name,
                message,
            } => Err(GenIteration::Error {
                replay_parameters,
                next_parameters,
                gen_name,
                message,
            }),
        }
    }

    /// Replace the space of an instance; other variants pass through.
    pub fn map_space<U, F>(self, f: F) -> GenIteration<U>
    where
        U: Clone + 'static,
        F: FnOnce(ExampleSpace<T>) -> ExampleSpace<U>,
    {
        match self.split() {
            Ok((space, replay_parameters, next_parameters)) => GenIteration::Instance {
                replay_parameters,
                next_parameters,
                space: f(space),
            },
            Err(other) => other,
        }
    }

    /// Rewrite both recorded parameter sets.
    pub fn map_parameters<F>(self, f: F) -> Self
    where
        F: Fn(GenParameters) -> GenParameters,
    {
        match self {
            GenIteration::Instance {
                replay_parameters,
                next_parameters,
                space,
            } => GenIteration::Instance {
                replay_parameters: f(replay_parameters),
                next_parameters: f(next_parameters),
                space,
            },
            GenIteration::Discard {
                replay_parameters,
                next_parameters,
            } => GenIteration::Discard {
                replay_parameters: f(replay_parameters),
                next_parameters: f(next_parameters),
            },
            GenIteration::Error {
                replay_parameters,
                next_parameters,
                gen_name,
                message,
            } => GenIteration::Error {
                replay_parameters: f(replay_parameters),
                next_parameters: f(next_parameters),
                gen_name,
                message,
            },
        }
    }

    fn with_replay_parameters(self, replay: GenParameters) -> Self {
        match self {
            GenIteration::Instance {
                next_parameters,
                space,
                ..
            } => GenIteration::Instance {
                replay_parameters: replay,
                next_parameters,
                space,
            },
            GenIteration::Discard {
                next_parameters, ..
            } => GenIteration::Discard {
                replay_parameters: replay,
                next_parameters,
            },
            GenIteration::Error {
                next_parameters,
                gen_name,
                message,
                ..
            } => GenIteration::Error {
                replay_parameters: replay,
                next_parameters,
                gen_name,
                message,
            },
        }
    }
}

/// A generator for test data of type `T`.
///
/// Generators are explicit, first-class values composed with combinators.
/// Each generation consumes a number of rng draws fixed by the generator's
/// shape; wrapping combinators (`map`, `filter`, `no_shrink`, `resize`)
/// never change it.
pub struct Gen<T> {
    generator: Rc<dyn Fn(GenParameters) -> GenIteration<T>>,
}

impl<T> Clone for Gen<T> {
    fn clone(&self) -> Self {
        Gen {
            generator: Rc::clone(&self.generator),
        }
    }
}

impl<T> fmt::Debug for Gen<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gen")
            .field("type", &std::any::type_name::<T>())
            .finish_non_exhaustive()
    }
}

impl<T> Gen<T>
where
    T: Clone + 'static,
{
    /// Create a new generator from a function.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(GenParameters) -> GenIteration<T> + 'static,
    {
        Gen {
            generator: Rc::new(f),
        }
    }

    /// Produce one iteration. A pending waypoint is resolved first.
    pub fn generate(&self, parameters: GenParameters) -> GenIteration<T> {
        (self.generator)(parameters.resolve())
    }

    /// The infinite stream of iterations starting from `parameters`.
    pub fn run(&self, parameters: GenParameters) -> GenStream<T> {
        GenStream {
            gen: self.clone(),
            next: parameters,
        }
    }

    /// Create a generator that always produces the same value.
    pub fn constant(value: T) -> Self {
        Gen::new(move |parameters| GenIteration::Instance {
            replay_parameters: parameters,
            next_parameters: parameters,
            space: ExampleSpace::singleton(value.clone()),
        })
    }

    /// A generator that always fails with the given name and message.
    pub fn error(gen_name: impl Into<String>, message: impl Into<String>) -> Self {
        let (gen_name, message) = (gen_name.into(), message.into());
        Gen::new(move |parameters| GenIteration::Error {
            replay_parameters: parameters,
            next_parameters: parameters,
            gen_name: gen_name.clone(),
            message: message.clone(),
        })
    }

    /// Map a function over the generated values.
    pub fn map<U, F>(&self, f: F) -> Gen<U>
    where
        F: Fn(T) -> U + 'static,
        U: Clone + 'static,
    {
        let gen = self.clone();
        let f = Rc::new(f);
        Gen::new(move |parameters| {
            let f = Rc::clone(&f);
            gen.generate(parameters)
                .map_space(move |space| space.map(move |value| f(value)))
        })
    }

    /// Bind/flatmap for dependent generation.
    ///
    /// The left value is drawn first; the generator it selects then draws from
    /// the left's next parameters. When shrinking, the left value shrinks
    /// first and the right side is regenerated from the same parameters for
    /// each left shrink.
    pub fn bind<U, F>(&self, f: F) -> Gen<U>
    where
        F: Fn(&T) -> Gen<U> + 'static,
        U: Clone + 'static,
    {
        let gen = self.clone();
        let f: Rc<dyn Fn(&T) -> Gen<U>> = Rc::new(f);
        Gen::new(move |parameters| {
            let (left, replay_parameters, left_next) = match gen.generate(parameters).split() {
                Ok(parts) => parts,
                Err(other) => return other,
            };

            let (right, _, right_next) = match f(left.value()).generate(left_next).split() {
                Ok(parts) => parts,
                Err(other) => return other.with_replay_parameters(replay_parameters),
            };

            let rebind_f = Rc::clone(&f);
            let rebind: Rc<dyn Fn(&T) -> Option<ExampleSpace<U>>> =
                Rc::new(move |value| rebind_f(value).generate(left_next).into_space());

            GenIteration::Instance {
                replay_parameters,
                next_parameters: right_next,
                space: ExampleSpace::bind(&left, &right, rebind),
            }
        })
    }

    /// Filter generated values by a predicate. A root that fails the
    /// predicate turns the iteration into a discard; failing shrinks are
    /// pruned.
    pub fn filter<F>(&self, predicate: F) -> Gen<T>
    where
        F: Fn(&T) -> bool + 'static,
    {
        let gen = self.clone();
        let predicate = Rc::new(predicate);
        Gen::new(move |parameters| match gen.generate(parameters).split::<T>() {
            Ok((space, replay_parameters, next_parameters)) => {
                let predicate = Rc::clone(&predicate);
                match space.filter(move |value| predicate(value)) {
                    Some(space) => GenIteration::Instance {
                        replay_parameters,
                        next_parameters,
                        space,
                    },
                    None => GenIteration::Discard {
                        replay_parameters,
                        next_parameters,
                    },
                }
            }
            Err(other) => other,
        })
    }

    /// Pair two generators. The left is drawn first and shrinks first.
    pub fn zip<U>(left: &Gen<T>, right: &Gen<U>) -> Gen<(T, U)>
    where
        U: Clone + 'static,
    {
        let (left, right) = (left.clone(), right.clone());
        Gen::new(move |parameters| {
            let (left_space, replay_parameters, left_next) =
                match left.generate(parameters).split() {
                    Ok(parts) => parts,
                    Err(other) => return other,
                };

            let (right_space, _, right_next) = match right.generate(left_next).split() {
                Ok(parts) => parts,
                Err(other) => return other.with_replay_parameters(replay_parameters),
            };

            GenIteration::Instance {
                replay_parameters,
                next_parameters: right_next,
                space: ExampleSpace::zip(&left_space, &right_space),
            }
        })
    }

    /// Combine three generators, shrinking left to right.
    pub fn zip3<U, V>(first: &Gen<T>, second: &Gen<U>, third: &Gen<V>) -> Gen<(T, U, V)>
    where
        U: Clone + 'static,
        V: Clone + 'static,
    {
        Gen::zip(&Gen::zip(first, second), third).map(|((a, b), c)| (a, b, c))
    }

    /// Keep generated values but never shrink them.
    pub fn no_shrink(&self) -> Gen<T> {
        let gen = self.clone();
        Gen::new(move |parameters| {
            gen.generate(parameters)
                .map_space(|space| space.no_shrink())
        })
    }

    /// Generate with a fixed size, whatever size the caller passes.
    pub fn resize(&self, size: Size) -> Gen<T> {
        self.scale(move |_| size)
    }

    /// Generate with a size derived from the caller's.
    pub fn scale<F>(&self, f: F) -> Gen<T>
    where
        F: Fn(Size) -> Size + 'static,
    {
        let gen = self.clone();
        Gen::new(move |parameters| {
            let outer = parameters.size;
            gen.generate(parameters.with_size(f(outer)))
                .map_parameters(|p| p.with_size(outer))
        })
    }

    /// Draw `count` values from the stream for `seed` at a fixed size.
    ///
    /// Applies the same consecutive-discard limit as a default check run.
    pub fn sample(&self, seed: u64, size: Size, count: usize) -> Result<Vec<T>> {
        let mut values = Vec::with_capacity(count);
        let mut consecutive_discards = 0;
        let mut stream = self.run(GenParameters::create(seed, size));

        while values.len() < count {
            match stream.next() {
                Some(GenIteration::Instance { space, .. }) => {
                    consecutive_discards = 0;
                    values.push(space.value().clone());
                }
                Some(GenIteration::Discard { .. }) => {
                    consecutive_discards += 1;
                    if consecutive_discards >= DEFAULT_DISCARD_LIMIT {
                        return Err(GauntletError::Exhausted {
                            discards: consecutive_discards,
                        });
                    }
                }
                Some(GenIteration::Error {
                    gen_name, message, ..
                }) => return Err(GauntletError::Generator { gen_name, message }),
                None => break,
            }
        }

        Ok(values)
    }

    /// Draw a single value.
    pub fn sample_one(&self, seed: u64, size: Size) -> Result<T> {
        self.sample(seed, size, 1)?
            .pop()
            .ok_or(GauntletError::Exhausted { discards: 0 })
    }
}

/// Infinite stream of iterations, threading each iteration's next parameters.
pub struct GenStream<T> {
    gen: Gen<T>,
    next: GenParameters,
}

impl<T> Iterator for GenStream<T>
where
    T: Clone + 'static,
{
    type Item = GenIteration<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let iteration = self.gen.generate(self.next);
        self.next = *iteration.next_parameters();
        Some(iteration)
    }
}
