//! Integration properties
//!
//! End-to-end workflows: checking, shrinking, discarding, generator errors,
//! the async driver and registry-built generators working together.

use crate::{arbitrary_seed, fast_config};
use futures::executor::block_on;
use gauntlet::*;

/// All ints below 50 fails at seed 0 and shrinks to exactly 50
pub fn test_small_ints_end_to_end() {
    let config = Config::default().with_seed(0).with_iterations(100);
    let result = for_all(Gen::between(0, 100), |&x| x < 50)
        .named("all ints are small")
        .check(&config)
        .expect("no generator errors");

    let counterexample = result.counterexample.as_ref().expect("a counterexample");
    assert_eq!(counterexample.value, 50);
    assert_eq!(result.seed, 0);
    assert!(result.iterations <= 100);
    assert!(result.to_string().contains("Minimal counterexample: 50"));

    let replayed = for_all(Gen::between(0, 100), |&x| x < 50)
        .check(&Config::default().with_replay(counterexample.replay_token()))
        .expect("replay is valid");
    assert_eq!(replayed.counterexample.map(|c| c.value), Some(50));

    println!("✓ End-to-end shrinking passed");
}

/// Property: A filter that rejects everything exhausts within the discard budget
pub fn test_unsatisfiable_filter_exhausts() {
    let prop = for_all(
        Gen::zip(&arbitrary_seed(), &Gen::between(1usize, 200)),
        |&(seed, limit)| {
            let gen = Gen::between(0, 10).filter(|_| false);
            let config = Config::default().with_seed(seed).with_discard_limit(limit);
            let mut evaluated = false;
            let result = check(&gen, &config, |_| {
                evaluated = true;
                true
            });
            let exhausted = matches!(
                result,
                Ok(CheckResult {
                    termination_reason: TerminationReason::GenExhausted,
                    discards,
                    iterations: 0,
                    ..
                }) if discards == limit
            );

            let asserted = for_all(gen.clone(), |_| true).assert(&config);
            exhausted
                && !evaluated
                && asserted == Err(GauntletError::Exhausted { discards: limit })
        },
    );

    match prop.assert(&fast_config()) {
        Ok(_) => println!("✓ Discard exhaustion property passed"),
        Err(error) => panic!("Discard exhaustion property failed: {error}"),
    }
}

/// Generator errors stop the run with the generator's name; nothing is retried
pub fn test_generator_errors_abort_the_run() {
    let gen = Gen::zip(
        &Gen::between(0, 10),
        &Gen::list_of(Gen::between(0, 5)).of_length_between(4, 2).build(),
    );
    let mut evaluations = 0;
    let error = check(&gen, &Config::default().with_seed(1), |_| {
        evaluations += 1;
        true
    })
    .unwrap_err();

    assert_eq!(evaluations, 0);
    assert_eq!(
        error.to_string(),
        "Error while running generator ListGen: 'min_len' (4) cannot be greater than 'max_len' (2)"
    );
    println!("✓ Generator error handling passed");
}

/// The async driver agrees with the synchronous one, panics included
pub fn test_async_driver() {
    let config = Config::default().with_seed(42).with_size(Size::MAX);
    let gen = Gen::list_of(Gen::between(0u32, 100)).build();

    let sync = for_all(gen.clone(), |xs| xs.len() < 5).check(&config).unwrap();
    let asynchronous = block_on(
        for_all_async(gen.clone(), |xs| async move { xs.len() < 5 }).check(&config),
    )
    .unwrap();
    assert_eq!(asynchronous, sync);
    assert_eq!(sync.counterexample.map(|c| c.value.len()), Some(5));

    let panicking = block_on(
        for_all_async(gen, |xs| async move {
            assert!(xs.iter().all(|x| *x < 90), "found a large element");
        })
        .assert(&config),
    );
    match panicking {
        Err(GauntletError::PropertyFailed { counterexample, .. }) => {
            assert_eq!(counterexample, "[90]");
        }
        other => panic!("expected a failure, got {other:?}"),
    }
    println!("✓ Async driver passed");
}

#[derive(Debug, Clone, PartialEq)]
struct Account {
    owner: String,
    balance: u32,
}

/// Generators assembled from a registry shrink like hand-written ones
pub fn test_registry_composition() {
    let mut registry = GenRegistry::with_defaults();
    registry.register_gen(Gen::between(0u32, 10_000));
    registry.register::<Account, _>(|resolver| {
        let owner = resolver.resolve::<String>()?;
        let balance = resolver.resolve::<u32>()?;
        Ok(Gen::zip(&owner, &balance).map(|(owner, balance)| Account { owner, balance }))
    });

    let accounts = registry.resolve::<Account>().expect("account generator");
    let result = for_all(accounts, |account| account.balance < 1_000)
        .check(&Config::default().with_seed(3).with_size(Size::MAX))
        .unwrap();
    let counterexample = result.counterexample.expect("a rich account");
    assert_eq!(
        counterexample.value,
        Account {
            owner: String::new(),
            balance: 1_000
        }
    );

    assert!(matches!(
        GenRegistry::new().resolve::<Account>(),
        Err(GauntletError::UnregisteredType { .. })
    ));
    println!("✓ Registry composition passed");
}
