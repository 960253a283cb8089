//! Shrinking correctness properties
//!
//! These properties ensure that shrinking behaves correctly - that it always
//! produces simpler candidates and that the search converges on minimal
//! counterexamples.

use crate::{arbitrary_seed, arbitrary_size, meta_options};
use gentest::shrink::{int_tree, shrink_int};
use gentest::*;

/// Property: every integer shrink is strictly closer to the center
pub fn test_int_shrinks_move_toward_center() {
    let prop = for_all(
        (Gen::int(), Gen::int()),
        "int shrinks move toward center",
        |&(n, center)| {
            let distance = (n - center).abs();
            let candidates = shrink_int(n, center);
            candidates.iter().all(|c| (c - center).abs() < distance)
                && (n == center || candidates.first() == Some(&center))
        },
    );
    prop.check(&meta_options().with_max_size(1000)).unwrap();
}

/// Property: an array of length n offers n single-element removals first
pub fn test_array_shrinks_cover_removals() {
    let prop = for_all(
        (arbitrary_size(), arbitrary_seed()),
        "array shrinks cover removals",
        |&(size, seed)| -> Result<bool> {
            let tree = Gen::array_of(Gen::int()).generate(&mut Random::new(seed), Size(size))?;
            let values = tree.root().clone();
            let children = tree.children();
            let removals_ok = (0..values.len()).all(|i| {
                let mut without = values.clone();
                without.remove(i);
                *children[i].root() == without
            });
            let rest_same_length = children[values.len()..]
                .iter()
                .all(|child| child.root().len() == values.len());
            Ok(removals_ok && rest_same_length)
        },
    );
    prop.check(&meta_options()).unwrap();
}

/// The greedy search stops exactly at the boundary of a threshold property.
pub fn test_search_finds_boundary() {
    for threshold in [1i64, 7, 10, 33, 100] {
        let prop = Property::new("below threshold", Gen::int(), move |&n: &i64| n < threshold);
        let outcome = prop
            .shrink_failing_test(int_tree(threshold * 3 + 5, 0))
            .run_to_end(&TestResult::fail());
        assert_eq!(outcome.minimal, threshold);
        assert!(outcome.shrinks <= outcome.attempts);
    }
}

/// Property: every node the search moves to still fails
pub fn test_search_only_adopts_failures() {
    let prop = for_all(
        (Gen::choose(0, 500), Gen::choose(1, 50)),
        "search only adopts failures",
        |&(start, modulus)| {
            let property = Property::new("not a multiple", Gen::int(), move |&n: &i64| {
                n == 0 || n % modulus != 0
            });
            let start = start * modulus;
            let mut search = property.shrink_failing_test(int_tree(start, 0));
            let mut ok = true;
            while search.next().is_some() {
                let current = *search.current().root();
                ok &= current == start || !property.run_args(&current).success;
            }
            ok
        },
    );
    prop.check(&meta_options()).unwrap();
}
