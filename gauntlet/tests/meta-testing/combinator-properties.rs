//! Combinator law properties
//!
//! These properties ensure that generator combinators obey the expected
//! algebraic laws over whole example spaces, not just root values.

use crate::{arbitrary_seed, arbitrary_size, fast_config};
use gauntlet::*;

/// Enough of a space to compare, without walking all of it.
const TRAVERSE_LIMIT: usize = 300;

fn prefix<T: Clone + 'static>(space: &ExampleSpace<T>) -> Vec<Example<T>> {
    space.traverse().take(TRAVERSE_LIMIT).collect()
}

fn list_space(seed: u64, size: Size) -> Option<ExampleSpace<Vec<i32>>> {
    Gen::list_of(Gen::between(-50, 50))
        .of_max_length(6)
        .build()
        .generate(GenParameters::create(seed, size))
        .into_space()
}

/// Property: map(id) leaves the space unchanged
pub fn test_map_identity() {
    let prop = for_all(Gen::zip(&arbitrary_seed(), &arbitrary_size()), |&(seed, size)| {
        list_space(seed, size)
            .map(|space| prefix(&space.map(|xs| xs)) == prefix(&space))
            .unwrap_or(false)
    });

    match prop.assert(&fast_config()) {
        Ok(_) => println!("✓ Map identity property passed"),
        Err(error) => panic!("Map identity property failed: {error}"),
    }
}

/// Property: map(f).map(g) == map(g . f) over the whole traversal
pub fn test_map_composition() {
    let prop = for_all(Gen::zip(&arbitrary_seed(), &arbitrary_size()), |&(seed, size)| {
        let Some(space) = list_space(seed, size) else {
            return false;
        };
        let f = |xs: Vec<i32>| xs.iter().map(|x| *x as i64 * 3).collect::<Vec<i64>>();
        let g = |xs: Vec<i64>| xs.iter().sum::<i64>();

        let chained = prefix(&space.map(f).map(g));
        let composed = prefix(&space.map(move |xs| g(f(xs))));
        chained == composed
    });

    match prop.assert(&fast_config()) {
        Ok(_) => println!("✓ Map composition property passed"),
        Err(error) => panic!("Map composition property failed: {error}"),
    }
}

/// Property: map and filter never turn one iteration kind into another,
/// except that filter turns rejected instances into discards
pub fn test_filter_keeps_iteration_kinds() {
    let prop = for_all(Gen::zip(&arbitrary_seed(), &arbitrary_size()), |&(seed, size)| {
        let parameters = GenParameters::create(seed, size);
        let base = Gen::between(0, 100);
        let even = base.filter(|x| x % 2 == 0);

        let kinds_match = match (base.generate(parameters), even.map(|x| x * 10).generate(parameters)) {
            (GenIteration::Instance { space, .. }, GenIteration::Instance { space: mapped, .. }) => {
                space.value() % 2 == 0 && *mapped.value() == space.value() * 10
            }
            (GenIteration::Instance { space, .. }, GenIteration::Discard { .. }) => {
                space.value() % 2 == 1
            }
            _ => false,
        };

        let errors_pass_through = matches!(
            Gen::between(9, 1).filter(|_| true).map(|x| x + 1).generate(parameters),
            GenIteration::Error { .. }
        );

        kinds_match && errors_pass_through
    });

    match prop.assert(&fast_config()) {
        Ok(_) => println!("✓ Filter iteration kinds property passed"),
        Err(error) => panic!("Filter iteration kinds property failed: {error}"),
    }
}

/// Property: Paired distances are the sum of their parts
pub fn test_zip_distances_add() {
    let prop = for_all(Gen::zip(&arbitrary_seed(), &arbitrary_size()), |&(seed, size)| {
        let parameters = GenParameters::create(seed, size);
        let left = Gen::between(0, 1000);
        let right = Gen::list_of(Gen::between(0, 10)).build();

        let (Some(l), Some(r), Some(pair)) = (
            left.generate(parameters).into_space(),
            right
                .generate(*left.generate(parameters).next_parameters())
                .into_space(),
            Gen::zip(&left, &right).generate(parameters).into_space(),
        ) else {
            return false;
        };
        pair.distance() == l.distance() + r.distance()
            && *pair.value() == (*l.value(), r.value().clone())
    });

    match prop.assert(&fast_config()) {
        Ok(_) => println!("✓ Zip distance property passed"),
        Err(error) => panic!("Zip distance property failed: {error}"),
    }
}
