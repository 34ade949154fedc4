//! List, set and string generators.

use crate::data::{GenParameters, DEFAULT_DISCARD_LIMIT};
use crate::example_space::ExampleSpace;
use crate::gen::{Gen, GenIteration};
use crate::scaling::Bias;
use std::collections::BTreeSet;

const LIST_GEN: &str = "ListGen";

/// Consecutive element discards tolerated before the whole list is discarded.
const ELEMENT_DISCARD_LIMIT: usize = DEFAULT_DISCARD_LIMIT;

/// Builder for list generators.
///
/// A list consumes two draws from its caller's stream: one picks the length,
/// the other seeds an independent stream the elements are drawn from.
/// Lists shrink by dropping chunks of elements, then by shrinking the
/// remaining elements one at a time.
pub struct ListGen<T> {
    elem: Gen<T>,
    min_len: usize,
    max_len: usize,
    bias: Bias,
}

impl<T> Clone for ListGen<T> {
    fn clone(&self) -> Self {
        ListGen {
            elem: self.elem.clone(),
            min_len: self.min_len,
            max_len: self.max_len,
            bias: self.bias,
        }
    }
}

impl<T> ListGen<T>
where
    T: Clone + 'static,
{
    pub fn new(elem: Gen<T>) -> Self {
        ListGen {
            elem,
            min_len: 0,
            max_len: 20,
            bias: Bias::default(),
        }
    }

    pub fn of_length_between(mut self, min_len: usize, max_len: usize) -> Self {
        self.min_len = min_len;
        self.max_len = max_len;
        self
    }

    pub fn of_length(self, len: usize) -> Self {
        self.of_length_between(len, len)
    }

    pub fn of_min_length(mut self, min_len: usize) -> Self {
        self.min_len = min_len;
        self
    }

    pub fn of_max_length(mut self, max_len: usize) -> Self {
        self.max_len = max_len;
        self
    }

    /// How the length range grows with size.
    pub fn with_length_bias(mut self, bias: Bias) -> Self {
        self.bias = bias;
        self
    }

    pub fn build(self) -> Gen<Vec<T>> {
        let ListGen {
            elem,
            min_len,
            max_len,
            bias,
        } = self;

        Gen::new(move |parameters: GenParameters| {
            let next_parameters = parameters.next().next();
            let fail = |message: String| GenIteration::Error {
                replay_parameters: parameters,
                next_parameters,
                gen_name: LIST_GEN.to_string(),
                message,
            };

            if min_len > max_len {
                return fail(format!(
                    "'min_len' ({min_len}) cannot be greater than 'max_len' ({max_len})"
                ));
            }

            let (lo, hi) = bias.scale(min_len, max_len, min_len, parameters.size);
            let len = match parameters.rng.value(lo, hi) {
                Ok(len) => len,
                Err(error) => return fail(error.to_string()),
            };

            let mut element_parameters =
                GenParameters::new(parameters.rng.next().fork(), parameters.size);
            let mut spaces = Vec::with_capacity(len);
            let mut consecutive_discards = 0;

            while spaces.len() < len {
                let iteration = elem.generate(element_parameters);
                element_parameters = *iteration.next_parameters();
                match iteration {
                    GenIteration::Instance { space, .. } => {
                        consecutive_discards = 0;
                        spaces.push(space);
                    }
                    GenIteration::Discard { .. } => {
                        consecutive_discards += 1;
                        if consecutive_discards >= ELEMENT_DISCARD_LIMIT {
                            return GenIteration::Discard {
                                replay_parameters: parameters,
                                next_parameters,
                            };
                        }
                    }
                    GenIteration::Error {
                        gen_name, message, ..
                    } => {
                        return GenIteration::Error {
                            replay_parameters: parameters,
                            next_parameters,
                            gen_name,
                            message,
                        }
                    }
                }
            }

            GenIteration::Instance {
                replay_parameters: parameters,
                next_parameters,
                space: ExampleSpace::merge(spaces, min_len),
            }
        })
    }

    /// Build a generator of sets.
    ///
    /// Duplicate elements collapse, so lists that end up with fewer than
    /// `min_len` distinct elements are discarded.
    pub fn build_set(self) -> Gen<BTreeSet<T>>
    where
        T: Ord,
    {
        let min_len = self.min_len;
        self.build()
            .map(|values| values.into_iter().collect::<BTreeSet<T>>())
            .filter(move |set| set.len() >= min_len)
    }
}

impl ListGen<char> {
    pub fn build_string(self) -> Gen<String> {
        self.build().map(|chars| chars.into_iter().collect())
    }
}

impl<T> From<ListGen<T>> for Gen<Vec<T>>
where
    T: Clone + 'static,
{
    fn from(builder: ListGen<T>) -> Self {
        builder.build()
    }
}

impl<T> Gen<Vec<T>>
where
    T: Clone + 'static,
{
    /// Start building a list generator with elements from `elem`.
    pub fn list_of(elem: Gen<T>) -> ListGen<T> {
        ListGen::new(elem)
    }
}

impl<T> Gen<BTreeSet<T>>
where
    T: Clone + Ord + 'static,
{
    /// Generate sets of up to 20 distinct elements from `elem`.
    pub fn set_of(elem: Gen<T>) -> Self {
        ListGen::new(elem).build_set()
    }
}

impl Gen<String> {
    /// Generate strings of up to 20 characters from `chars`.
    pub fn string_of(chars: Gen<char>) -> Self {
        ListGen::new(chars).build_string()
    }
}
