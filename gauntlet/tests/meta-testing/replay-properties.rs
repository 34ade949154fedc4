//! Replay properties
//!
//! These properties ensure that replay tokens are exact inverses of their
//! encoding and reproduce counterexamples without searching.

use crate::{arbitrary_seed, arbitrary_size, fast_config};
use gauntlet::*;

/// Property: decode(encode(replay)) == replay
pub fn test_replay_round_trip() {
    let replays = Gen::zip(
        &Gen::zip3(
            &arbitrary_seed(),
            &arbitrary_size(),
            &Gen::option_of(arbitrary_seed()),
        ),
        &Gen::list_of(Gen::between(0usize, 1_000_000)).build(),
    )
    .map(|((seed, size, waypoint), path)| Replay::new(seed, size, waypoint, path));

    let prop = for_all(replays, |replay| {
        Replay::decode(&replay.encode()).as_ref() == Ok(replay)
    });

    match prop.assert(&fast_config()) {
        Ok(_) => println!("✓ Replay round trip property passed"),
        Err(error) => panic!("Replay round trip property failed: {error}"),
    }
}

/// The smallest possible token is stable across releases
pub fn test_fixed_replay_token() {
    let replay = Replay::new(0, Size::new(0), None, vec![0]);
    assert_eq!(replay.encode(), "AQAAAAEA");
    assert_eq!(Replay::decode("AQAAAAEA"), Ok(replay));

    let error = Replay::decode("AQAAAAE").unwrap_err();
    assert!(error.to_string().starts_with("Error decoding replay"));
    println!("✓ Fixed replay token passed");
}

/// Property: Replaying a counterexample's token reproduces it in one evaluation
pub fn test_replay_reproduces_counterexample() {
    let prop = for_all(arbitrary_seed(), |&seed| {
        let gen = Gen::list_of(Gen::between(0, 100)).build();
        let predicate = |xs: &Vec<i32>| xs.iter().sum::<i32>() < 150;
        let config = Config::default().with_seed(seed).with_size(Size::MAX);

        let Ok(result) = check(&gen, &config, predicate) else {
            return false;
        };
        let Some(counterexample) = result.counterexample else {
            return true;
        };

        let mut evaluations = 0;
        let replay_config = Config::default().with_replay(counterexample.replay_token());
        let replayed = check(&gen, &replay_config, |xs| {
            evaluations += 1;
            predicate(xs)
        });

        match replayed {
            Ok(replayed) => {
                evaluations == 1
                    && replayed.iterations == 1
                    && replayed.termination_reason == TerminationReason::IsReplay
                    && replayed.counterexample.map(|c| c.value) == Some(counterexample.value)
            }
            Err(_) => false,
        }
    });

    match prop.assert(&fast_config()) {
        Ok(_) => println!("✓ Replay reproduction property passed"),
        Err(error) => panic!("Replay reproduction property failed: {error}"),
    }
}

/// Tokens that no longer match their generator are rejected, not searched
pub fn test_stale_replays() {
    let gen = Gen::between(0, 100);

    // Size 0 pins the value to its origin, which has no shrinks to follow.
    let stale = check(&gen, &Config::default().with_replay("AQAAAAEA"), |_| true).unwrap_err();
    assert!(matches!(stale, GauntletError::StaleReplay { .. }));
    assert!(stale.to_string().starts_with("Replay is no longer valid"));

    let discarding = gen.filter(|_| false);
    let token = Replay::new(7, Size::MAX, None, vec![]).encode();
    let stale = check(&discarding, &Config::default().with_replay(token), |_| true).unwrap_err();
    assert!(matches!(stale, GauntletError::StaleReplay { .. }));

    let malformed = check(&gen, &Config::default().with_replay("%%%"), |_| true).unwrap_err();
    assert!(matches!(malformed, GauntletError::ReplayDecode { .. }));

    println!("✓ Stale replay handling passed");
}
