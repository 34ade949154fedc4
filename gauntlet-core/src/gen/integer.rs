//! Integer and boolean generators.

use crate::data::GenParameters;
use crate::example_space::ExampleSpace;
use crate::gen::{Gen, GenIteration};
use crate::rng::Integer;
use crate::scaling::Bias;
use crate::shrink;
use std::iter;
use std::rc::Rc;

const INTEGER_GEN: &str = "IntegerGen";

/// Builder for integer generators.
///
/// Values are drawn from `min..=max` narrowed around `origin` by the size and
/// bias, and shrink towards `origin`. Without an explicit origin, the value in
/// range closest to zero is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntegerGen<N> {
    min: N,
    max: N,
    origin: Option<N>,
    bias: Bias,
}

impl<N: Integer> Default for IntegerGen<N> {
    fn default() -> Self {
        IntegerGen {
            min: N::MIN,
            max: N::MAX,
            origin: None,
            bias: Bias::default(),
        }
    }
}

impl<N: Integer> IntegerGen<N> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn between(mut self, min: N, max: N) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    pub fn greater_than_equal(mut self, min: N) -> Self {
        self.min = min;
        self
    }

    pub fn less_than_equal(mut self, max: N) -> Self {
        self.max = max;
        self
    }

    pub fn shrink_towards(mut self, origin: N) -> Self {
        self.origin = Some(origin);
        self
    }

    pub fn with_bias(mut self, bias: Bias) -> Self {
        self.bias = bias;
        self
    }

    pub fn build(self) -> Gen<N> {
        let IntegerGen {
            min,
            max,
            origin,
            bias,
        } = self;

        Gen::new(move |parameters: GenParameters| {
            let fail = |message: String| GenIteration::Error {
                replay_parameters: parameters,
                next_parameters: parameters.next(),
                gen_name: INTEGER_GEN.to_string(),
                message,
            };

            if min > max {
                return fail(format!(
                    "'min' ({min}) cannot be greater than 'max' ({max})"
                ));
            }

            let origin = origin
                .unwrap_or_else(|| N::from_i128(0i128.clamp(min.to_i128(), max.to_i128())));
            if origin < min || origin > max {
                return fail(format!(
                    "'origin' ({origin}) must be between 'min' ({min}) and 'max' ({max})"
                ));
            }

            let (lo, hi) = bias.scale(min, max, origin, parameters.size);
            match parameters.rng.value(lo, hi) {
                Ok(value) => GenIteration::Instance {
                    replay_parameters: parameters,
                    next_parameters: parameters.next(),
                    space: ExampleSpace::unfold(
                        value,
                        shrink::towards(origin),
                        shrink::integer_distance(min, max, origin),
                    ),
                },
                Err(error) => fail(error.to_string()),
            }
        })
    }
}

impl<N: Integer> From<IntegerGen<N>> for Gen<N> {
    fn from(builder: IntegerGen<N>) -> Self {
        builder.build()
    }
}

impl<N: Integer> Gen<N> {
    /// Start building an integer generator over the type's full range.
    pub fn integer() -> IntegerGen<N> {
        IntegerGen::new()
    }

    /// Generate an integer in `min..=max`, shrinking towards the value in
    /// range closest to zero.
    pub fn between(min: N, max: N) -> Self {
        IntegerGen::new().between(min, max).build()
    }
}

impl Gen<bool> {
    /// Generate a random boolean, shrinking towards `false`.
    pub fn bool() -> Self {
        Gen::new(|parameters| {
            let value = parameters.rng.next_u64() & 1 == 1;
            GenIteration::Instance {
                replay_parameters: parameters,
                next_parameters: parameters.next(),
                space: ExampleSpace::unfold(
                    value,
                    Rc::new(|&b: &bool| -> Box<dyn Iterator<Item = bool>> {
                        if b {
                            Box::new(iter::once(false))
                        } else {
                            Box::new(iter::empty())
                        }
                    }),
                    Rc::new(|&b: &bool| if b { 100.0 } else { 0.0 }),
                ),
            }
        })
    }
}
