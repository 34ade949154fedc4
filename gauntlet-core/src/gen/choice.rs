//! Generators that choose between values or other generators.

use crate::gen::Gen;
use crate::scaling::Bias;
use crate::weighted::WeightedList;
use std::rc::Rc;

/// Index draws are uniform at every size and shrink towards the first entry.
fn index_between(max: usize) -> Gen<usize> {
    Gen::integer()
        .between(0, max)
        .shrink_towards(0)
        .with_bias(Bias::None)
        .build()
}

impl<T> Gen<T>
where
    T: Clone + 'static,
{
    /// Pick one of `values` uniformly, shrinking towards earlier values.
    pub fn element(values: Vec<T>) -> Gen<T> {
        if values.is_empty() {
            return Gen::error("Gen::element", "cannot choose from an empty list");
        }
        let last = values.len() - 1;
        index_between(last).map(move |i| values[i].clone())
    }

    /// Pick one of `gens` uniformly and generate from it. Shrinks towards
    /// earlier generators first, then within the chosen one.
    pub fn one_of(gens: Vec<Gen<T>>) -> Gen<T> {
        if gens.is_empty() {
            return Gen::error("Gen::one_of", "cannot choose from an empty list");
        }
        let last = gens.len() - 1;
        index_between(last).bind(move |&i| gens[i].clone())
    }

    /// Pick a generator with probability proportional to its weight.
    ///
    /// Shrinks towards the generators listed first.
    pub fn frequency(weighted: Vec<(i64, Gen<T>)>) -> Gen<T> {
        let list = match WeightedList::new(weighted) {
            Ok(list) => Rc::new(list),
            Err(error) => return Gen::error("Gen::frequency", error.to_string()),
        };

        Gen::integer()
            .between(0, list.total_weight() - 1)
            .shrink_towards(0)
            .with_bias(Bias::None)
            .build()
            .bind(move |&index| match list.sample(index) {
                Ok(gen) => gen.clone(),
                Err(error) => Gen::error("Gen::frequency", error.to_string()),
            })
    }
}

impl<T> Gen<Option<T>>
where
    T: Clone + 'static,
{
    /// Generate `None` one time in five, shrinking towards `None`.
    pub fn option_of(gen: Gen<T>) -> Self {
        Gen::frequency(vec![(1, Gen::constant(None)), (4, gen.map(Some))])
    }
}
