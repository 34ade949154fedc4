//! Shrinking correctness properties
//!
//! These properties ensure that shrinking behaves correctly - that it always
//! produces smaller failures and converges to minimal counterexamples.

use crate::{arbitrary_seed, fast_config};
use gauntlet::*;

fn space_for<T: Clone + 'static>(gen: &Gen<T>, seed: u64) -> Option<ExampleSpace<T>> {
    gen.generate(GenParameters::create(seed, Size::MAX)).into_space()
}

/// Property: Integers failing above a threshold shrink to exactly the threshold
pub fn test_integer_shrinks_to_boundary() {
    let prop = for_all(
        Gen::zip(&arbitrary_seed(), &Gen::between(1i64, 10_000)),
        |&(seed, threshold)| {
            let Some(space) = space_for(&Gen::between(0i64, 10_000), seed) else {
                return false;
            };
            match space.explore(10_000, |x| *x >= threshold) {
                Some(exploration) => exploration.counterexample.value == threshold,
                None => *space.value() < threshold,
            }
        },
    );

    match prop.assert(&fast_config()) {
        Ok(_) => println!("✓ Integer shrink minimality property passed"),
        Err(error) => panic!("Integer shrink minimality property failed: {error}"),
    }
}

/// Property: Shrinking approaches the origin from either side
pub fn test_shrinks_towards_custom_origin() {
    let prop = for_all(
        Gen::zip3(
            &arbitrary_seed(),
            &Gen::between(-400i32, 400),
            &Gen::between(1i32, 50),
        ),
        |&(seed, origin, gap)| {
            let gen = Gen::integer()
                .between(-500, 500)
                .shrink_towards(origin)
                .build();
            let Some(space) = space_for(&gen, seed) else {
                return false;
            };
            let far = |x: &i32| (x - origin).abs() >= gap;
            match space.explore(10_000, far) {
                Some(exploration) => {
                    let value = exploration.counterexample.value;
                    value == origin + gap || value == origin - gap
                }
                None => !far(space.value()),
            }
        },
    );

    match prop.assert(&fast_config()) {
        Ok(_) => println!("✓ Custom origin shrinking property passed"),
        Err(error) => panic!("Custom origin shrinking property failed: {error}"),
    }
}

/// Property: The best distance never worsens while exploring
pub fn test_shrinks_get_closer() {
    let prop = for_all(arbitrary_seed(), |&seed| {
        let gen = Gen::list_of(Gen::between(0u32, 1000)).build();
        let Some(space) = space_for(&gen, seed) else {
            return false;
        };
        let fails = |xs: &Vec<u32>| xs.iter().sum::<u32>() > 500;
        if !fails(space.value()) {
            return true;
        }

        let mut explorer = Explorer::new(space.clone());
        let mut best = space.distance();
        while explorer.shrinks() < 200 {
            let Some(candidate) = explorer.next_candidate() else {
                break;
            };
            let failed = fails(&candidate.value);
            explorer.observe(failed);
            if explorer.best().distance() > best {
                return false;
            }
            best = explorer.best().distance();
        }
        fails(explorer.best().value())
    });

    match prop.assert(&fast_config()) {
        Ok(_) => println!("✓ Shrinks get closer property passed"),
        Err(error) => panic!("Shrinks get closer property failed: {error}"),
    }
}

/// Property: A pair shrinks its left component before its right
pub fn test_zip_shrinks_left_first() {
    let prop = for_all(arbitrary_seed(), |&seed| {
        let gen = Gen::zip(&Gen::between(0, 100), &Gen::between(0, 100));
        let Some(space) = space_for(&gen, seed) else {
            return false;
        };
        let (left, right) = *space.value();
        let children: Vec<(i32, i32)> = space.subspace().map(|c| *c.value()).collect();

        let split = children.iter().take_while(|(_, r)| *r == right).count();
        let left_first = children[..split].iter().all(|(l, _)| l < &left);
        let right_after = children[split..].iter().all(|&(l, r)| l == left && r < right);
        let starts_left = left == 0 || children.first() == Some(&(0, right));
        left_first && right_after && starts_left
    });

    match prop.assert(&fast_config()) {
        Ok(_) => println!("✓ Zip left-first property passed"),
        Err(error) => panic!("Zip left-first property failed: {error}"),
    }
}

/// Property: A bound pair shrinks its outer value first, regenerating the inner one
pub fn test_bind_shrinks_left_first() {
    let prop = for_all(arbitrary_seed(), |&seed| {
        let gen = Gen::between(1, 20).bind(|&n| Gen::between(0, n * 10).map(move |m| (n, m)));
        let Some(space) = space_for(&gen, seed) else {
            return false;
        };
        let (n, _) = *space.value();
        let children: Vec<(i32, i32)> = space.subspace().map(|c| *c.value()).collect();

        let outer = children.iter().take_while(|(cn, _)| *cn != n).count();
        let consistent = children.iter().all(|&(cn, cm)| cm <= cn * 10);
        let outer_shrink_first = children[outer..].iter().all(|(cn, _)| *cn == n);
        let starts_left = n == 1 || children.first().map(|(cn, _)| *cn) == Some(1);
        consistent && outer_shrink_first && starts_left
    });

    match prop.assert(&fast_config()) {
        Ok(_) => println!("✓ Bind left-first property passed"),
        Err(error) => panic!("Bind left-first property failed: {error}"),
    }
}
