//! Runner behaviour end to end

use crate::{arbitrary_seed, meta_options};
use gentest::*;

pub fn test_sum_commutes() {
    let runner = suite(|r| {
        r.for_all((Gen::int(), Gen::int()), "sum commutes", |&(a, b)| {
            a + b == b + a
        });
    });
    let options = RunOptions::default()
        .with_seed(1)
        .with_tests(50)
        .with_max_size(10)
        .silent();
    let report = runner.run(&options).unwrap();
    assert!(report.success());
    assert_eq!(report.properties[0].outcome, Outcome::Passed { tests: 50 });
}

pub fn test_all_ints_are_even() {
    for seed in [1, 2, 3, 99, 12345] {
        let runner = suite(|r| {
            r.for_all((Gen::int(),), "all ints are even", |&(n,)| n % 2 == 0);
        });
        let report = runner
            .run(&RunOptions::default().with_seed(seed).silent())
            .unwrap();
        assert_eq!(report.failed(), 1);
        match &report.properties[0].outcome {
            Outcome::Failed { counterexample, .. } => {
                let n: i64 = counterexample
                    .trim_matches(&['(', ')', ','][..])
                    .parse()
                    .unwrap();
                assert_ne!(n % 2, 0, "seed {seed} reported {n}");
            }
            other => panic!("seed {seed}: expected a failure, got {other:?}"),
        }
    }
}

/// Property: the same seed always gives the same report
pub fn test_runs_are_reproducible() {
    let prop = for_all((arbitrary_seed(),), "runs are reproducible", |&(seed,)| {
        let build = || {
            suite(|r| {
                r.for_all((Gen::array_of(Gen::int()),), "short", |(v,): &(Vec<i64>,)| {
                    v.len() < 12
                });
                r.describe("ints", |r| {
                    r.for_all((Gen::int(), Gen::int()), "ordered", |&(a, b)| a <= b);
                });
            })
        };
        let options = RunOptions::default().with_seed(seed).with_tests(30).silent();
        match (build().run(&options), build().run(&options)) {
            (Ok(first), Ok(second)) => first == second,
            _ => false,
        }
    });
    prop.check(&meta_options().with_tests(10)).unwrap();
}

/// Shrinking never changes the number of positional arguments.
pub fn test_tuple_arguments_keep_their_arity() {
    let runner = suite(|r| {
        r.for_all(
            vec![Gen::int(), Gen::int(), Gen::int()],
            "three ints sum below ten",
            |v: &Vec<i64>| {
                assert_eq!(v.len(), 3);
                v.iter().sum::<i64>() < 10
            },
        );
    });
    let report = runner
        .run(&RunOptions::default().with_seed(5).silent())
        .unwrap();
    match &report.properties[0].outcome {
        Outcome::Failed {
            counterexample,
            error,
            ..
        } => {
            assert!(error.is_none());
            let values: Vec<i64> = counterexample
                .trim_matches(&['[', ']'][..])
                .split(", ")
                .map(|part| part.parse().unwrap())
                .collect();
            assert_eq!(values.len(), 3);
            assert_eq!(values.iter().sum::<i64>(), 10);
        }
        other => panic!("expected a failure, got {other:?}"),
    }
}
