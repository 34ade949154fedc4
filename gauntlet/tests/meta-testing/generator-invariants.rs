//! Generator invariant properties
//!
//! These properties ensure that the rng and generators behave correctly with
//! respect to determinism, bounds and randomness consumption.

use crate::{arbitrary_seed, arbitrary_size, fast_config};
use chrono::NaiveDate;
use gauntlet::*;

fn run(name: &str, prop: Property<impl Clone + std::fmt::Debug + 'static>) {
    match prop.assert(&fast_config()) {
        Ok(_) => println!("✓ {name} property passed"),
        Err(error) => panic!("{name} property failed: {error}"),
    }
}

/// Property: Same seed, same stream
pub fn test_rng_determinism() {
    let prop = for_all(arbitrary_seed(), |&seed| {
        let (a, b) = (Rng::create(seed), Rng::create(seed));
        let forked = a.next().fork();
        a.next_u64() == b.next_u64()
            && a.next() == b.next()
            && forked == b.next().fork()
            && Rng::create(forked.seed()).next_u64() == forked.next_u64()
    });
    run("Rng determinism", prop);
}

/// Property: next() counts order within a family; fork() starts a new family at order 0
pub fn test_rng_order_and_family() {
    let prop = for_all(
        Gen::zip(&arbitrary_seed(), &Gen::between(0u64, 50)),
        |&(seed, steps)| {
            let mut rng = Rng::create(seed);
            for _ in 0..steps {
                rng = rng.next();
            }
            let forked = rng.fork();
            rng.order() == steps
                && rng.family() == seed
                && forked.order() == 0
                && forked.family() == seed.wrapping_add(1)
        },
    );
    run("Rng order and family", prop);
}

/// Property: value() stays within bounds and rejects inverted ranges
pub fn test_rng_value_bounds() {
    let prop = for_all(
        Gen::zip3(&arbitrary_seed(), &Gen::<i64>::integer().build(), &Gen::<i64>::integer().build()),
        |&(seed, a, b)| {
            let rng = Rng::create(seed);
            let (min, max) = (a.min(b), a.max(b));
            let in_range = matches!(rng.value(min, max), Ok(v) if v >= min && v <= max);
            let rejected = min == max
                || matches!(rng.value(max, min), Err(GauntletError::InvalidRange { .. }));
            in_range && rejected
        },
    );
    run("Rng value bounds", prop);
}

/// Property: Integer generators stay inside their range at every size
pub fn test_generator_range_bounds() {
    let prop = for_all(
        Gen::zip3(&arbitrary_size(), &arbitrary_seed(), &Gen::between(0i32, 500)),
        |&(size, seed, width)| {
            let gen = Gen::between(-width, width * 2);
            gen.sample(seed, size, 20)
                .map(|values| values.iter().all(|v| (-width..=width * 2).contains(v)))
                .unwrap_or(false)
        },
    );
    run("Generator range bounds", prop);
}

/// Property: Lists respect their length bounds and size zero gives the minimum
pub fn test_list_length_bounds() {
    let prop = for_all(
        Gen::zip3(&arbitrary_size(), &arbitrary_seed(), &Gen::between(0usize, 5)),
        |&(size, seed, min_len)| {
            let gen = Gen::list_of(Gen::bool())
                .of_length_between(min_len, min_len + 10)
                .build();
            let lists = match gen.sample(seed, size, 10) {
                Ok(lists) => lists,
                Err(_) => return false,
            };
            let bounded = lists
                .iter()
                .all(|xs| (min_len..=min_len + 10).contains(&xs.len()));
            let at_zero = gen
                .sample_one(seed, Size::MIN)
                .map(|xs| xs.len() == min_len)
                .unwrap_or(false);
            bounded && at_zero
        },
    );
    run("List length bounds", prop);
}

/// Property: Dates stay between their endpoints
pub fn test_date_bounds() {
    let from = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
    let to = NaiveDate::from_ymd_opt(2030, 12, 31).unwrap();
    let prop = for_all(Gen::date_between(from, to), move |date| {
        (from..=to).contains(date)
    });
    run("Date bounds", prop);
}

/// Property: n iterations of a generator that draws k times per value advance the order by n * k
pub fn test_randomness_consumption() {
    let prop = for_all(
        Gen::zip3(&arbitrary_seed(), &arbitrary_size(), &Gen::between(1usize, 40)),
        |&(seed, size, n)| {
            let int = Gen::between(-100i64, 100);
            let shapes: Vec<(Gen<i64>, u64)> = vec![
                (int.clone(), 1),
                (int.map(|x| x + 1).filter(|x| x % 3 != 0).no_shrink(), 1),
                (Gen::bool().map(|b| b as i64), 1),
                (Gen::zip3(&int, &int, &int).map(|(a, b, c)| a + b + c), 3),
                (
                    Gen::list_of(int.clone()).build().map(|xs| xs.len() as i64),
                    2,
                ),
                (Gen::zip(&Gen::list_of(int.clone()).build(), &int).map(|(_, x)| x), 3),
            ];

            shapes.into_iter().all(|(gen, draws)| {
                gen.run(GenParameters::create(seed, size))
                    .take(n)
                    .last()
                    .map(|it| it.next_parameters().rng.order() == n as u64 * draws)
                    .unwrap_or(false)
            })
        },
    );
    run("Randomness consumption", prop);
}
